//! `Accept` header parsing.
//!
//! The header is kept as raw bytes and only parsed when a negotiation needs
//! it. Parsing yields [`MediaRange`]s with exact, integer quality values so
//! that ordering never depends on floating point comparison.
//!
//! # Examples
//!
//! ```
//! use accord_core::accept::{AcceptHeader, Quality};
//! use accord_core::config::NegotiationConfig;
//! use accord_core::media_type::MediaType;
//!
//! let accept = AcceptHeader::from_static("text/html;q=0.9, application/json, */*;q=0.1");
//! let config = NegotiationConfig::default();
//!
//! let ranges = accept.media_ranges(&config);
//! assert_eq!(ranges.len(), 3);
//! assert_eq!(ranges[0].media_type().subtype(), "json");
//!
//! assert_eq!(accept.quality_for(&MediaType::json(), &config), Quality::ONE);
//! assert_eq!(
//!     accept.quality_for(&MediaType::octet_stream(), &config),
//!     Quality::from_millis(100).unwrap()
//! );
//! ```

use crate::config::NegotiationConfig;
use crate::error::MediaTypeError;
use crate::media_type::{parse_essence, parse_parameter, split_unquoted, MediaType};
use bytes::Bytes;
use std::fmt;
use tracing::{trace, warn};

// ============================================================================
// Quality
// ============================================================================

/// A `q` weight in thousandths, `0..=1000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u16);

impl Quality {
    /// `q=0`: explicitly not acceptable.
    pub const ZERO: Quality = Quality(0);
    /// `q=1`, the default weight.
    pub const ONE: Quality = Quality(1000);

    /// Build a quality from thousandths. Returns `None` above 1000.
    pub fn from_millis(millis: u16) -> Option<Self> {
        (millis <= 1000).then_some(Quality(millis))
    }

    /// The weight in thousandths.
    pub fn millis(self) -> u16 {
        self.0
    }

    /// Check whether this weight admits the type at all.
    pub fn is_acceptable(self) -> bool {
        self.0 > 0
    }

    /// Parse an RFC 7231 `qvalue`: `0[.ddd]` or `1[.000]`.
    pub fn parse(s: &str) -> Result<Self, MediaTypeError> {
        let invalid = || MediaTypeError::InvalidQuality(s.to_string());
        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };

        if fraction.len() > 3 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let mut millis = 0u16;
        for (i, digit) in fraction.bytes().enumerate() {
            millis += u16::from(digit - b'0') * [100, 10, 1][i];
        }

        match whole {
            "0" => Ok(Quality(millis)),
            "1" if millis == 0 => Ok(Quality::ONE),
            _ => Err(invalid()),
        }
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::ONE
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1000 => write!(f, "1"),
            0 => write!(f, "0"),
            millis => {
                let text = format!("{:03}", millis);
                write!(f, "0.{}", text.trim_end_matches('0'))
            }
        }
    }
}

// ============================================================================
// Media Range
// ============================================================================

/// One entry of an `Accept` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRange {
    media_type: MediaType,
    quality: Quality,
    position: usize,
}

impl MediaRange {
    /// Create a media range.
    pub fn new(media_type: MediaType, quality: Quality, position: usize) -> Self {
        Self {
            media_type,
            quality,
            position,
        }
    }

    /// Parse a single range such as `text/html;level=1;q=0.5`.
    ///
    /// Parameters after `q` are accept-extensions and are ignored.
    pub fn parse(s: &str, position: usize) -> Result<Self, MediaTypeError> {
        let mut segments = split_unquoted(s, ';').into_iter();
        let mut media_type = parse_essence(segments.next().unwrap_or_default())?;
        let mut quality = Quality::ONE;

        for segment in segments {
            if segment.trim().is_empty() {
                continue;
            }
            let (name, value) = parse_parameter(segment)?;
            if name == "q" {
                quality = Quality::parse(&value)?;
                break;
            }
            media_type = media_type.with_param(name, value);
        }

        Ok(Self::new(media_type, quality, position))
    }

    /// The media range pattern.
    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    /// The preference weight.
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Zero-based position of this range in the header.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Check whether `media_type` falls inside this range.
    pub fn matches(&self, media_type: &MediaType) -> bool {
        self.media_type.matches(media_type)
    }
}

impl fmt::Display for MediaRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.media_type)?;
        if self.quality != Quality::ONE {
            write!(f, ";q={}", self.quality)?;
        }
        Ok(())
    }
}

// ============================================================================
// Accept Header
// ============================================================================

/// Raw `Accept` header value, parsed on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptHeader {
    raw: Bytes,
}

impl AcceptHeader {
    /// Wrap a raw header value.
    pub fn new(raw: impl Into<Bytes>) -> Self {
        Self { raw: raw.into() }
    }

    /// Wrap a static header value without copying.
    pub fn from_static(raw: &'static str) -> Self {
        Self {
            raw: Bytes::from_static(raw.as_bytes()),
        }
    }

    /// The value to use when the request carried no `Accept` header.
    pub fn any() -> Self {
        Self::from_static("*/*")
    }

    /// The raw header bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Parse the header into media ranges, highest quality first.
    ///
    /// Sorting is stable, so ranges of equal quality keep header order.
    /// Malformed ranges are skipped. A header that is not UTF-8 or exceeds
    /// `config.max_header_len` yields no ranges at all.
    pub fn media_ranges(&self, config: &NegotiationConfig) -> Vec<MediaRange> {
        let mut ranges = self.ranges_in_header_order(config);
        ranges.sort_by(|a, b| b.quality.cmp(&a.quality));
        ranges
    }

    /// Quality the client assigns to `media_type`.
    ///
    /// The most specific matching range decides; among equally specific
    /// ranges the one appearing first in the header wins. Returns
    /// [`Quality::ZERO`] when no range matches.
    pub fn quality_for(&self, media_type: &MediaType, config: &NegotiationConfig) -> Quality {
        quality_in(&self.ranges_in_header_order(config), media_type)
    }

    /// Check whether the client accepts `media_type` at all.
    pub fn accepts(&self, media_type: &MediaType, config: &NegotiationConfig) -> bool {
        self.quality_for(media_type, config).is_acceptable()
    }

    pub(crate) fn ranges_in_header_order(&self, config: &NegotiationConfig) -> Vec<MediaRange> {
        if self.raw.len() > config.max_header_len {
            warn!(
                len = self.raw.len(),
                limit = config.max_header_len,
                "Accept header exceeds the configured limit; treating it as unacceptable"
            );
            return Vec::new();
        }

        let Ok(header) = std::str::from_utf8(&self.raw) else {
            trace!("Accept header is not valid UTF-8");
            return Vec::new();
        };

        if header.trim().is_empty() {
            return if config.blank_accept_matches_any {
                vec![MediaRange::new(MediaType::any(), Quality::ONE, 0)]
            } else {
                Vec::new()
            };
        }

        split_unquoted(header, ',')
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .enumerate()
            .filter_map(|(position, part)| match MediaRange::parse(part, position) {
                Ok(range) => Some(range),
                Err(err) => {
                    trace!(range = part.trim(), error = %err, "Skipping malformed media range");
                    None
                }
            })
            .take(config.max_media_ranges)
            .collect()
    }
}

impl Default for AcceptHeader {
    fn default() -> Self {
        Self::any()
    }
}

impl From<&'static str> for AcceptHeader {
    fn from(raw: &'static str) -> Self {
        Self::from_static(raw)
    }
}

/// Quality lookup over ranges kept in header order.
pub(crate) fn quality_in(ranges: &[MediaRange], media_type: &MediaType) -> Quality {
    let mut best: Option<&MediaRange> = None;
    for range in ranges.iter().filter(|r| r.matches(media_type)) {
        match best {
            Some(current)
                if current.media_type.specificity() >= range.media_type.specificity() => {}
            _ => best = Some(range),
        }
    }
    best.map(|r| r.quality).unwrap_or(Quality::ZERO)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn q(millis: u16) -> Quality {
        Quality::from_millis(millis).unwrap()
    }

    #[test]
    fn test_quality_parse() {
        assert_eq!(Quality::parse("1").unwrap(), Quality::ONE);
        assert_eq!(Quality::parse("1.000").unwrap(), Quality::ONE);
        assert_eq!(Quality::parse("0").unwrap(), Quality::ZERO);
        assert_eq!(Quality::parse("0.5").unwrap(), q(500));
        assert_eq!(Quality::parse("0.05").unwrap(), q(50));
        assert_eq!(Quality::parse("0.123").unwrap(), q(123));
        assert_eq!(Quality::parse("0.").unwrap(), Quality::ZERO);

        for bad in ["1.5", "2", "0.1234", "-0.1", "abc", "", ".5", "1.001"] {
            assert!(Quality::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_quality_display() {
        assert_eq!(Quality::ONE.to_string(), "1");
        assert_eq!(Quality::ZERO.to_string(), "0");
        assert_eq!(q(500).to_string(), "0.5");
        assert_eq!(q(125).to_string(), "0.125");
    }

    #[test]
    fn test_media_range_parse() {
        let range = MediaRange::parse("text/html;level=1;q=0.4;ext=x", 2).unwrap();
        assert_eq!(range.media_type().param("level"), Some("1"));
        assert_eq!(range.media_type().param("ext"), None);
        assert_eq!(range.quality(), q(400));
        assert_eq!(range.position(), 2);
        assert_eq!(range.to_string(), "text/html;level=1;q=0.4");
    }

    #[test]
    fn test_accept_parse_sorted_by_quality() {
        let config = NegotiationConfig::default();
        let accept = AcceptHeader::from_static("text/html;q=0.9, application/json, */*;q=0.1");
        let ranges = accept.media_ranges(&config);

        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0].media_type().subtype(), "json");
        assert_eq!(ranges[1].media_type().subtype(), "html");
        assert!(ranges[2].media_type().is_any());
    }

    #[test]
    fn test_equal_quality_keeps_header_order() {
        let config = NegotiationConfig::default();
        let accept = AcceptHeader::from_static("text/csv, text/plain, application/xml");
        let subtypes: Vec<_> = accept
            .media_ranges(&config)
            .iter()
            .map(|r| r.media_type().subtype().to_string())
            .collect();
        assert_eq!(subtypes, ["csv", "plain", "xml"]);
    }

    #[test]
    fn test_malformed_ranges_are_skipped() {
        let config = NegotiationConfig::default();
        let accept = AcceptHeader::from_static("garbage, text/plain;q=7, , application/json");
        let ranges = accept.media_ranges(&config);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].media_type(), &MediaType::json());
    }

    #[test]
    fn test_most_specific_range_sets_quality() {
        let config = NegotiationConfig::default();
        let accept = AcceptHeader::from_static(
            "text/*;q=0.3, text/html;q=0.7, text/html;level=1, */*;q=0.5",
        );

        let html_l1 = MediaType::new("text", "html").with_param("level", "1");
        let html = MediaType::new("text", "html");
        let plain = MediaType::new("text", "plain");
        let jpeg = MediaType::new("image", "jpeg");

        assert_eq!(accept.quality_for(&html_l1, &config), Quality::ONE);
        assert_eq!(accept.quality_for(&html, &config), q(700));
        assert_eq!(accept.quality_for(&plain, &config), q(300));
        assert_eq!(accept.quality_for(&jpeg, &config), q(500));
    }

    #[test]
    fn test_q_zero_refuses() {
        let config = NegotiationConfig::default();
        let accept = AcceptHeader::from_static("*/*, application/json;q=0");
        assert!(!accept.accepts(&MediaType::json(), &config));
        assert!(accept.accepts(&MediaType::octet_stream(), &config));
    }

    #[test]
    fn test_blank_header() {
        let accept = AcceptHeader::from_static("  ");
        let config = NegotiationConfig::default();
        assert!(accept.accepts(&MediaType::json(), &config));

        let strict = NegotiationConfig {
            blank_accept_matches_any: false,
            ..NegotiationConfig::default()
        };
        assert!(!accept.accepts(&MediaType::json(), &strict));
    }

    #[test]
    fn test_limits() {
        let config = NegotiationConfig {
            max_header_len: 8,
            ..NegotiationConfig::default()
        };
        let accept = AcceptHeader::from_static("application/json");
        assert!(accept.media_ranges(&config).is_empty());

        let config = NegotiationConfig {
            max_media_ranges: 1,
            ..NegotiationConfig::default()
        };
        let accept = AcceptHeader::from_static("text/plain, application/json");
        assert_eq!(accept.media_ranges(&config).len(), 1);
    }

    #[test]
    fn test_non_utf8_header_yields_nothing() {
        let accept = AcceptHeader::new(vec![0xFF, 0xFE]);
        assert!(accept.media_ranges(&NegotiationConfig::default()).is_empty());
    }
}
