//! Fuzz target for Content-Type dispatch and body decoding.
//!
//! Tests media type parsing and every built-in codec against arbitrary
//! bodies. Malformed input must surface as a typed error, never a panic.

#![no_main]

use accord_core::{FormUrlEncoded, Json, MediaType, OctetStream, PlainText, Registry};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

/// Arbitrary request for fuzzing.
#[derive(Debug, Arbitrary)]
struct FuzzRequest {
    /// Raw Content-Type header
    content_type: Vec<u8>,
    /// Request body
    body: Vec<u8>,
}

fuzz_target!(|data: FuzzRequest| {
    // Media type parsing round-trips through Display
    if let Ok(header) = std::str::from_utf8(&data.content_type) {
        if let Ok(media_type) = MediaType::parse(header) {
            let reparsed = MediaType::parse(&media_type.to_string());
            assert_eq!(reparsed.ok(), Some(media_type));
        }
    }

    // Structured payloads
    if let Ok(registry) = Registry::<serde_json::Value>::builder()
        .codec(Json)
        .codec(FormUrlEncoded)
        .build()
    {
        let _ = registry.handle_content_type(&data.content_type, &data.body);
        let _ = registry.decode_request(Some(data.content_type.as_slice()), &data.body);
    }

    // Text payloads
    if let Ok(registry) = Registry::<String>::builder().codec(PlainText).build() {
        if let Some(Ok(text)) = registry.handle_content_type(&data.content_type, &data.body) {
            assert_eq!(text.as_bytes(), &data.body[..]);
        }
    }

    // Raw payloads decode whenever the header matches
    if let Ok(registry) = Registry::<Vec<u8>>::builder().codec(OctetStream).build() {
        if let Some(result) = registry.handle_content_type(&data.content_type, &data.body) {
            assert_eq!(result.ok().as_deref(), Some(&data.body[..]));
        }
    }
});
