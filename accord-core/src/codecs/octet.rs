//! `application/octet-stream`: raw bytes in, raw bytes out.

use crate::codec::{ContentType, MimeRender, MimeUnrender, NoContent};
use crate::error::{DecodeError, RenderError};
use crate::media_type::MediaType;
use bytes::Bytes;

/// Identity codec over byte payloads. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OctetStream;

impl ContentType for OctetStream {
    fn content_type(&self) -> MediaType {
        MediaType::octet_stream()
    }

    fn name(&self) -> String {
        "octet-stream".to_string()
    }
}

impl MimeRender<Bytes> for OctetStream {
    fn render(&self, value: &Bytes) -> Result<Bytes, RenderError> {
        Ok(value.clone())
    }
}

impl MimeRender<Vec<u8>> for OctetStream {
    fn render(&self, value: &Vec<u8>) -> Result<Bytes, RenderError> {
        Ok(Bytes::copy_from_slice(value))
    }
}

impl MimeRender<NoContent> for OctetStream {
    fn render(&self, _value: &NoContent) -> Result<Bytes, RenderError> {
        Ok(Bytes::new())
    }
}

impl MimeUnrender<Bytes> for OctetStream {
    fn unrender(&self, body: &[u8]) -> Result<Bytes, DecodeError> {
        Ok(Bytes::copy_from_slice(body))
    }
}

impl MimeUnrender<Vec<u8>> for OctetStream {
    fn unrender(&self, body: &[u8]) -> Result<Vec<u8>, DecodeError> {
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_identity() {
        let payload = Bytes::from_static(&[0, 159, 146, 150, 255]);
        let body = OctetStream.render(&payload).unwrap();
        assert_eq!(body, payload);
        let back: Bytes = OctetStream.unrender(&body).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_vec_identity() {
        let payload = vec![1u8, 2, 3];
        let body = OctetStream.render(&payload).unwrap();
        let back: Vec<u8> = OctetStream.unrender(&body).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn test_empty_body() {
        let back: Vec<u8> = OctetStream.unrender(&[]).unwrap();
        assert!(back.is_empty());
        assert!(OctetStream.render(&Bytes::new()).unwrap().is_empty());
        assert!(OctetStream.render(&NoContent).unwrap().is_empty());
    }
}
