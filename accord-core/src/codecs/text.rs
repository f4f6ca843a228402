//! `text/plain;charset=utf-8`.

use crate::codec::{ContentType, MimeRender, MimeUnrender, NoContent};
use crate::error::{DecodeError, RenderError};
use crate::media_type::MediaType;
use bytes::Bytes;
use std::borrow::Cow;

/// UTF-8 plain text.
///
/// Request bodies must be valid UTF-8; the diagnostic names the offending
/// byte offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl PlainText {
    fn decode(body: &[u8]) -> Result<&str, DecodeError> {
        std::str::from_utf8(body)
            .map_err(|e| DecodeError::new(format!("invalid UTF-8 at byte {}", e.valid_up_to())))
    }

    fn check_charset(media_type: &MediaType) -> Result<(), DecodeError> {
        match media_type.param("charset") {
            None => Ok(()),
            Some(charset)
                if charset.eq_ignore_ascii_case("utf-8")
                    || charset.eq_ignore_ascii_case("us-ascii") =>
            {
                Ok(())
            }
            Some(other) => Err(DecodeError::new(format!("unsupported charset '{}'", other))),
        }
    }
}

impl ContentType for PlainText {
    fn content_type(&self) -> MediaType {
        MediaType::plain_text_utf8()
    }

    fn name(&self) -> String {
        "plain text".to_string()
    }
}

impl MimeRender<String> for PlainText {
    fn render(&self, value: &String) -> Result<Bytes, RenderError> {
        Ok(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl MimeRender<Cow<'static, str>> for PlainText {
    fn render(&self, value: &Cow<'static, str>) -> Result<Bytes, RenderError> {
        Ok(match value {
            Cow::Borrowed(s) => Bytes::from_static(s.as_bytes()),
            Cow::Owned(s) => Bytes::copy_from_slice(s.as_bytes()),
        })
    }
}

impl MimeRender<NoContent> for PlainText {
    fn render(&self, _value: &NoContent) -> Result<Bytes, RenderError> {
        Ok(Bytes::new())
    }
}

impl MimeUnrender<String> for PlainText {
    fn unrender(&self, body: &[u8]) -> Result<String, DecodeError> {
        Self::decode(body).map(str::to_owned)
    }

    fn unrender_with_type(&self, media_type: &MediaType, body: &[u8]) -> Result<String, DecodeError> {
        Self::check_charset(media_type)?;
        self.unrender(body)
    }
}

impl MimeUnrender<Cow<'static, str>> for PlainText {
    fn unrender(&self, body: &[u8]) -> Result<Cow<'static, str>, DecodeError> {
        Self::decode(body).map(|s| Cow::Owned(s.to_owned()))
    }

    fn unrender_with_type(
        &self,
        media_type: &MediaType,
        body: &[u8],
    ) -> Result<Cow<'static, str>, DecodeError> {
        Self::check_charset(media_type)?;
        self.unrender(body)
    }
}
