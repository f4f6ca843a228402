//! Request decoding: match the `Content-Type` header against the registry
//! and decode the body with the matching codec.
//!
//! Two failure tiers stay distinct:
//!
//! - no declared entry accepts the header: `None` (unsupported media type);
//! - an entry accepts it but the body does not decode: `Some(Err(_))`.

use crate::error::{DecodeError, NegotiationError};
use crate::media_type::MediaType;
use crate::registry::Registry;
use tracing::{debug, trace};

impl<T> Registry<T> {
    /// Find the first unrender-capable entry whose media range admits
    /// `content_type`, returning its index.
    fn find_unrenderer(&self, content_type: &MediaType) -> Option<usize> {
        self.entries().iter().position(|entry| {
            entry.can_unrender()
                && entry
                    .media_types()
                    .iter()
                    .any(|declared| declared.matches(content_type))
        })
    }

    /// Parse a raw `Content-Type` value into a concrete media type.
    fn parse_content_type(raw: &[u8]) -> Option<MediaType> {
        let Ok(header) = std::str::from_utf8(raw) else {
            trace!("Content-Type header is not valid UTF-8");
            return None;
        };
        match MediaType::parse(header) {
            Ok(media_type) if media_type.is_wildcard() => {
                trace!(content_type = header, "Content-Type must not be a wildcard");
                None
            }
            Ok(media_type) => Some(media_type),
            Err(err) => {
                trace!(content_type = header, error = %err, "Unparseable Content-Type header");
                None
            }
        }
    }

    /// Check whether some declared entry decodes `content_type`.
    pub fn can_handle_content_type(&self, content_type: &[u8]) -> bool {
        Self::parse_content_type(content_type)
            .and_then(|media_type| self.find_unrenderer(&media_type))
            .is_some()
    }

    /// Decode `body` using the entry matching `content_type`.
    ///
    /// - `None`: the header is unparseable or no declared entry accepts it.
    /// - `Some(Err(_))`: the matching codec rejected the body.
    /// - `Some(Ok(_))`: the decoded value.
    pub fn handle_content_type(
        &self,
        content_type: &[u8],
        body: &[u8],
    ) -> Option<Result<T, DecodeError>> {
        let media_type = Self::parse_content_type(content_type)?;
        let Some(index) = self.find_unrenderer(&media_type) else {
            debug!(content_type = %media_type, "No declared content type decodes this body");
            return None;
        };

        let entry = self.entries().get(index)?;
        let result = entry.unrender_body(&media_type, body)?;
        if let Err(err) = &result {
            debug!(
                content_type = %media_type,
                codec = entry.name(),
                error = %err,
                "Request body failed to decode"
            );
        }
        Some(result)
    }

    /// Like [`handle_content_type`](Self::handle_content_type), folded into
    /// one error type.
    ///
    /// A missing `Content-Type` header is treated as
    /// `application/octet-stream`.
    pub fn decode_request(
        &self,
        content_type: Option<&[u8]>,
        body: &[u8],
    ) -> Result<T, NegotiationError> {
        let content_type = content_type.unwrap_or(b"application/octet-stream".as_slice());

        match self.handle_content_type(content_type, body) {
            Some(result) => result.map_err(NegotiationError::from),
            None => Err(NegotiationError::UnsupportedMediaType(format!(
                "'{}' is not one of: {}",
                String::from_utf8_lossy(content_type),
                self.unrender_media_types()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
