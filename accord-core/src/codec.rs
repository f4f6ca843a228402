//! Codec capabilities.
//!
//! A content type participates in negotiation by implementing
//! [`ContentType`]. It becomes usable for responses by implementing
//! [`MimeRender<T>`] and for request bodies by implementing
//! [`MimeUnrender<T>`], once per payload type it supports. Third-party
//! formats plug in the same way the built-in codecs do.
//!
//! ```
//! use accord_core::codec::{ContentType, MimeRender, MimeUnrender};
//! use accord_core::error::{DecodeError, RenderError};
//! use accord_core::media_type::MediaType;
//! use bytes::Bytes;
//!
//! /// Comma separated values for a list of integers.
//! struct Csv;
//!
//! impl ContentType for Csv {
//!     fn content_type(&self) -> MediaType {
//!         MediaType::new("text", "csv")
//!     }
//! }
//!
//! impl MimeRender<Vec<i64>> for Csv {
//!     fn render(&self, value: &Vec<i64>) -> Result<Bytes, RenderError> {
//!         let fields: Vec<String> = value.iter().map(i64::to_string).collect();
//!         Ok(Bytes::from(fields.join(",")))
//!     }
//! }
//!
//! impl MimeUnrender<Vec<i64>> for Csv {
//!     fn unrender(&self, body: &[u8]) -> Result<Vec<i64>, DecodeError> {
//!         let text = std::str::from_utf8(body).map_err(|e| DecodeError::new(e.to_string()))?;
//!         text.split(',')
//!             .map(|f| f.trim().parse().map_err(|_| DecodeError::new(format!("bad field '{f}'"))))
//!             .collect()
//!     }
//! }
//!
//! assert_eq!(Csv.render(&vec![1, 2]).unwrap(), Bytes::from_static(b"1,2"));
//! assert_eq!(Csv.unrender(b"3, 4").unwrap(), vec![3, 4]);
//! ```

use crate::error::{DecodeError, RenderError};
use crate::media_type::MediaType;
use bytes::Bytes;

/// The minimal negotiation capability: a content type names its media types.
///
/// Implementations must be pure and return the same values on every call.
pub trait ContentType: Send + Sync + 'static {
    /// The primary media type of this content type.
    fn content_type(&self) -> MediaType;

    /// Every media type this content type answers to, primary first.
    fn content_types(&self) -> Vec<MediaType> {
        vec![self.content_type()]
    }

    /// Name used in diagnostics.
    fn name(&self) -> String {
        self.content_type().to_string()
    }
}

/// Serialize values of `T` for this content type.
///
/// Implementations are expected to succeed for every value of `T`; the
/// error exists so a serializer defect surfaces as a value rather than a
/// panic.
pub trait MimeRender<T>: ContentType {
    /// Encode `value` into a response body.
    fn render(&self, value: &T) -> Result<Bytes, RenderError>;
}

/// Decode request bodies of this content type into `T`.
pub trait MimeUnrender<T>: ContentType {
    /// Decode `body`. Malformed input yields a [`DecodeError`].
    fn unrender(&self, body: &[u8]) -> Result<T, DecodeError>;

    /// Decode `body`, with access to the request's actual media type.
    fn unrender_with_type(&self, _media_type: &MediaType, body: &[u8]) -> Result<T, DecodeError> {
        self.unrender(body)
    }
}

/// A content type defined purely by its media types.
///
/// Used for closure-based entries that are not backed by a codec type.
#[derive(Debug, Clone)]
pub struct StaticContentType {
    media_types: Vec<MediaType>,
}

impl StaticContentType {
    /// Create from a list of media types, primary first.
    pub fn new(media_types: impl IntoIterator<Item = MediaType>) -> Self {
        Self {
            media_types: media_types.into_iter().collect(),
        }
    }
}

impl ContentType for StaticContentType {
    fn content_type(&self) -> MediaType {
        self.media_types
            .first()
            .cloned()
            .unwrap_or_else(MediaType::any)
    }

    fn content_types(&self) -> Vec<MediaType> {
        self.media_types.clone()
    }
}

/// Marker payload for responses without a body.
///
/// Every built-in codec renders `NoContent` as an empty body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoContent;

/// A negotiated response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The media type that was selected.
    pub media_type: MediaType,
    /// The encoded body.
    pub body: Bytes,
}

impl Rendered {
    /// Value for the response `Content-Type` header.
    pub fn content_type_header(&self) -> String {
        self.media_type.to_string()
    }

    /// Split into media type and body.
    pub fn into_parts(self) -> (MediaType, Bytes) {
        (self.media_type, self.body)
    }
}
