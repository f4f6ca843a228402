//! Response negotiation: pick a content type from the `Accept` header and
//! render the payload with it.
//!
//! Selection rules:
//!
//! 1. Every (entry, media type) pair of a render-capable entry is a
//!    candidate, in declaration order.
//! 2. A candidate's quality comes from the most specific `Accept` range that
//!    matches it; `q=0` rules it out.
//! 3. The highest quality wins. Equal qualities go to the candidate declared
//!    first.
//!
//! Only the selected entry renders.

use crate::accept::{quality_in, AcceptHeader, Quality};
use crate::codec::Rendered;
use crate::error::{NegotiationError, RenderError};
use crate::media_type::MediaType;
use crate::registry::Registry;
use tracing::debug;

/// The outcome of matching a registry against an `Accept` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Index of the chosen entry in declaration order.
    pub index: usize,
    /// The chosen media type, as declared by the entry.
    pub media_type: MediaType,
    /// The quality the client assigned to it.
    pub quality: Quality,
}

impl<T> Registry<T> {
    /// Choose the content type to respond with, without rendering anything.
    pub fn select(&self, accept: &AcceptHeader) -> Option<Selection> {
        let ranges = accept.ranges_in_header_order(self.config());
        let mut best: Option<Selection> = None;

        for (index, entry) in self.entries().iter().enumerate() {
            if !entry.can_render() {
                continue;
            }
            for media_type in entry.media_types() {
                let quality = quality_in(&ranges, media_type);
                if !quality.is_acceptable() {
                    continue;
                }
                if best.as_ref().is_none_or(|current| quality > current.quality) {
                    best = Some(Selection {
                        index,
                        media_type: media_type.clone(),
                        quality,
                    });
                }
            }
        }

        match &best {
            Some(selection) => debug!(
                media_type = %selection.media_type,
                quality = %selection.quality,
                "Selected response content type"
            ),
            None => debug!(
                accept = %String::from_utf8_lossy(accept.as_bytes()),
                "No declared content type satisfies the Accept header"
            ),
        }
        best
    }

    /// Check whether some declared content type satisfies `accept`.
    pub fn can_handle_accept(&self, accept: &AcceptHeader) -> bool {
        self.select(accept).is_some()
    }

    /// Negotiate and render `value`.
    ///
    /// - `None`: nothing declared is acceptable to the client.
    /// - `Some(Err(_))`: the chosen codec failed to serialize `value`. The
    ///   built-in codecs only get here on a serializer defect (for example a
    ///   JSON map with non-string keys), never as a regular outcome.
    /// - `Some(Ok(_))`: the chosen media type and the rendered body.
    pub fn handle_accept(
        &self,
        accept: &AcceptHeader,
        value: &T,
    ) -> Option<Result<Rendered, RenderError>> {
        let selection = self.select(accept)?;
        let entry = self.entries().get(selection.index)?;
        let rendered = entry.render_value(value)?;
        Some(rendered.map(|body| Rendered {
            media_type: selection.media_type,
            body,
        }))
    }

    /// Like [`handle_accept`](Self::handle_accept), folded into one error type.
    ///
    /// A missing `Accept` header accepts anything.
    pub fn negotiate_response(
        &self,
        accept: Option<&AcceptHeader>,
        value: &T,
    ) -> Result<Rendered, NegotiationError> {
        let any = AcceptHeader::any();
        let accept = accept.unwrap_or(&any);

        match self.handle_accept(accept, value) {
            Some(result) => result.map_err(NegotiationError::from),
            None => Err(NegotiationError::NotAcceptable(format!(
                "'{}' matches none of: {}",
                String::from_utf8_lossy(accept.as_bytes()),
                self.render_media_types()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::NoContent;
    use crate::codecs::{FormUrlEncoded, Json, OctetStream, PlainText};
    use crate::registry::CodecEntry;
    use bytes::Bytes;

    fn json_then_text() -> Registry<String> {
        Registry::builder().codec(Json).codec(PlainText).build().unwrap()
    }

    fn text_then_json() -> Registry<String> {
        Registry::builder().codec(PlainText).codec(Json).build().unwrap()
    }

    fn accept(s: &'static str) -> AcceptHeader {
        AcceptHeader::from_static(s)
    }

    #[test]
    fn test_wildcard_selects_first_declared() {
        let rendered = json_then_text()
            .handle_accept(&accept("*/*"), &"hi".to_string())
            .unwrap()
            .unwrap();
        assert_eq!(rendered.media_type, MediaType::json());
        assert_eq!(rendered.body, Bytes::from_static(b"\"hi\""));
    }

    #[test]
    fn test_preference_overrides_declaration_order() {
        let header = accept("text/plain, application/json;q=0.5");
        for registry in [json_then_text(), text_then_json()] {
            let rendered = registry
                .handle_accept(&header, &"hi".to_string())
                .unwrap()
                .unwrap();
            assert_eq!(rendered.media_type, MediaType::plain_text_utf8());
            assert_eq!(rendered.body, Bytes::from_static(b"hi"));
        }
    }

    #[test]
    fn test_equal_preference_defers_to_declaration_order() {
        let header = accept("text/plain, application/json");
        let a = json_then_text().select(&header).unwrap();
        let b = text_then_json().select(&header).unwrap();
        assert_eq!(a.media_type, MediaType::json());
        assert_eq!(b.media_type, MediaType::plain_text_utf8());
    }

    #[test]
    fn test_subtype_wildcard() {
        let selection = json_then_text().select(&accept("text/*")).unwrap();
        assert_eq!(selection.index, 1);
        assert_eq!(selection.media_type, MediaType::plain_text_utf8());
    }

    #[test]
    fn test_specific_range_beats_wildcard() {
        // `*/*` would pick JSON, but the exact range lowers its weight.
        let header = accept("*/*, application/json;q=0.2");
        let selection = json_then_text().select(&header).unwrap();
        assert_eq!(selection.media_type, MediaType::plain_text_utf8());
    }

    #[test]
    fn test_parameterized_range_selects_alternate() {
        let header = accept("application/json;charset=utf-8");
        let selection = json_then_text().select(&header).unwrap();
        assert_eq!(
            selection.media_type,
            MediaType::json().with_param("charset", "utf-8")
        );
    }

    #[test]
    fn test_no_match_returns_none() {
        let registry = json_then_text();
        let header = accept("image/png, application/xml");
        assert!(registry.handle_accept(&header, &"hi".to_string()).is_none());
        assert!(!registry.can_handle_accept(&header));
    }

    #[test]
    fn test_q_zero_excludes_entry() {
        let header = accept("application/json;q=0, text/plain;q=0");
        assert!(json_then_text().select(&header).is_none());
    }

    #[test]
    fn test_unrender_only_entries_are_ignored() {
        let registry = Registry::<String>::builder()
            .unrenderer(Json)
            .renderer(PlainText)
            .build()
            .unwrap();
        let selection = registry.select(&accept("*/*")).unwrap();
        assert_eq!(selection.index, 1);
    }

    #[test]
    fn test_render_failure_is_reported() {
        let registry = Registry::<String>::builder()
            .entry(
                CodecEntry::custom([MediaType::new("text", "x-failing")])
                    .with_render(|_: &String| Err(RenderError::new("boom"))),
            )
            .build()
            .unwrap();
        let result = registry.handle_accept(&accept("*/*"), &String::new()).unwrap();
        assert_eq!(result, Err(RenderError::new("boom")));

        let err = registry.negotiate_response(None, &String::new()).unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_builtin_codec_fails_only_on_serializer_defect() {
        use std::collections::BTreeMap;

        let registry = Registry::<BTreeMap<Vec<u8>, u8>>::builder()
            .renderer(Json)
            .build()
            .unwrap();

        let fine = registry.handle_accept(&accept("*/*"), &BTreeMap::new());
        assert!(matches!(fine, Some(Ok(_))));

        let mut keyed = BTreeMap::new();
        keyed.insert(vec![1u8], 1u8);
        let err = registry.handle_accept(&accept("*/*"), &keyed).unwrap().unwrap_err();
        assert!(err.message().starts_with("JSON serialization failed"));
    }

    #[test]
    fn test_negotiate_response_not_acceptable() {
        let err = json_then_text()
            .negotiate_response(Some(&accept("image/png")), &"hi".to_string())
            .unwrap_err();
        assert_eq!(err.status_code(), 406);
        assert!(err.to_string().contains("application/json"));
    }

    #[test]
    fn test_negotiate_response_without_accept_header() {
        let rendered = text_then_json()
            .negotiate_response(None, &"hi".to_string())
            .unwrap();
        assert_eq!(rendered.content_type_header(), "text/plain;charset=utf-8");
    }

    #[test]
    fn test_no_content_payload() {
        let registry = Registry::<NoContent>::builder()
            .renderer(Json)
            .renderer(OctetStream)
            .renderer(FormUrlEncoded)
            .entry(CodecEntry::no_content(MediaType::new("text", "html")))
            .build()
            .unwrap();
        let rendered = registry
            .handle_accept(&accept("text/html"), &NoContent)
            .unwrap()
            .unwrap();
        assert_eq!(rendered.media_type, MediaType::new("text", "html"));
        assert!(rendered.body.is_empty());
    }

    #[test]
    fn test_selection_is_deterministic() {
        let registry = json_then_text();
        let header = accept("text/*, application/*");
        let first = registry.select(&header);
        for _ in 0..16 {
            assert_eq!(registry.select(&header), first);
        }
    }
}
