//! `application/x-www-form-urlencoded` through serde_urlencoded.

use crate::codec::{ContentType, MimeRender, MimeUnrender, NoContent};
use crate::error::{DecodeError, RenderError};
use crate::media_type::MediaType;
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// URL-encoded form bodies.
///
/// Payloads must serialize as a flat sequence of key/value pairs (a struct
/// of scalars, a map, or a list of tuples).
#[derive(Debug, Clone, Copy, Default)]
pub struct FormUrlEncoded;

impl ContentType for FormUrlEncoded {
    fn content_type(&self) -> MediaType {
        MediaType::form_urlencoded()
    }

    fn name(&self) -> String {
        "form".to_string()
    }
}

impl<T: Serialize> MimeRender<T> for FormUrlEncoded {
    fn render(&self, value: &T) -> Result<Bytes, RenderError> {
        serde_urlencoded::to_string(value)
            .map(Bytes::from)
            .map_err(|e| RenderError::new(format!("Failed to encode form data: {}", e)))
    }
}

impl MimeRender<NoContent> for FormUrlEncoded {
    fn render(&self, _value: &NoContent) -> Result<Bytes, RenderError> {
        Ok(Bytes::new())
    }
}

impl<T: DeserializeOwned> MimeUnrender<T> for FormUrlEncoded {
    fn unrender(&self, body: &[u8]) -> Result<T, DecodeError> {
        serde_urlencoded::from_bytes(body)
            .map_err(|e| DecodeError::new(format!("Failed to parse form data: {}", e)))
    }
}
