//! Fuzz target for Accept header parsing and codec selection.
//!
//! Arbitrary header bytes must never panic, and whatever is selected must be
//! one of the declared media types with a positive quality.

#![no_main]

use accord_core::{AcceptHeader, Json, NegotiationConfig, PlainText, Registry};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

/// Arbitrary negotiation input.
#[derive(Debug, Arbitrary)]
struct FuzzAccept {
    /// Raw header bytes, not necessarily UTF-8
    header: Vec<u8>,
    /// Payload to render
    value: String,
    /// Range limit
    max_media_ranges: u8,
}

fuzz_target!(|data: FuzzAccept| {
    let config = NegotiationConfig::new().max_media_ranges(usize::from(data.max_media_ranges.max(1)));
    let accept = AcceptHeader::new(data.header);

    // Parsing: bounded and sorted
    let ranges = accept.media_ranges(&config);
    assert!(ranges.len() <= config.max_media_ranges);
    for pair in ranges.windows(2) {
        assert!(pair[0].quality() >= pair[1].quality());
    }

    // Selection: always a declared type
    let Ok(registry) = Registry::<String>::builder()
        .codec(Json)
        .codec(PlainText)
        .config(config)
        .build()
    else {
        return;
    };
    if let Some(selection) = registry.select(&accept) {
        assert!(selection.quality.is_acceptable());
        assert!(registry.media_types().contains(&selection.media_type));
        let rendered = registry.handle_accept(&accept, &data.value);
        assert!(matches!(rendered, Some(Ok(_))));
    }
});
