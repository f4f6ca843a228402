//! `application/json` through serde_json.

use crate::codec::{ContentType, MimeRender, MimeUnrender, NoContent};
use crate::error::{DecodeError, RenderError};
use crate::media_type::MediaType;
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// JSON content type.
///
/// Declares `application/json` and answers `application/json;charset=utf-8`
/// as well. Any top-level JSON value is accepted when decoding.
///
/// With the `simd-json` feature, bodies are encoded and parsed by simd-json
/// instead of serde_json.
///
/// ```
/// use accord_core::codec::{MimeRender, MimeUnrender};
/// use accord_core::codecs::Json;
///
/// let body = Json.render(&vec![1, 2, 3]).unwrap();
/// assert_eq!(&body[..], b"[1,2,3]");
///
/// let value: Vec<i32> = Json.unrender(&body).unwrap();
/// assert_eq!(value, vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl ContentType for Json {
    fn content_type(&self) -> MediaType {
        MediaType::json()
    }

    fn content_types(&self) -> Vec<MediaType> {
        vec![
            MediaType::json(),
            MediaType::json().with_param("charset", "utf-8"),
        ]
    }

    fn name(&self) -> String {
        "json".to_string()
    }
}

impl<T: Serialize> MimeRender<T> for Json {
    fn render(&self, value: &T) -> Result<Bytes, RenderError> {
        #[cfg(feature = "simd-json")]
        let encoded = simd_json::to_vec(value).map_err(|e| e.to_string());
        #[cfg(not(feature = "simd-json"))]
        let encoded = serde_json::to_vec(value).map_err(|e| e.to_string());

        encoded
            .map(Bytes::from)
            .map_err(|e| RenderError::new(format!("JSON serialization failed: {}", e)))
    }
}

impl MimeRender<NoContent> for Json {
    fn render(&self, _value: &NoContent) -> Result<Bytes, RenderError> {
        Ok(Bytes::new())
    }
}

impl<T: DeserializeOwned> MimeUnrender<T> for Json {
    fn unrender(&self, body: &[u8]) -> Result<T, DecodeError> {
        #[cfg(feature = "simd-json")]
        let decoded = {
            // simd-json parses in place
            let mut buf = body.to_vec();
            simd_json::from_slice(&mut buf).map_err(|e| e.to_string())
        };
        #[cfg(not(feature = "simd-json"))]
        let decoded = serde_json::from_slice(body).map_err(|e| e.to_string());

        decoded.map_err(|e| DecodeError::new(format!("invalid JSON: {}", e)))
    }
}
