//! Media types and media ranges.
//!
//! A [`MediaType`] is an immutable `type/subtype` pair with ordered
//! parameters. The same value doubles as a media range: `*` is accepted as a
//! wildcard for the subtype, or for both type and subtype.
//!
//! # Examples
//!
//! ```
//! use accord_core::media_type::MediaType;
//!
//! let range = MediaType::parse("text/*").unwrap();
//! let plain = MediaType::parse("Text/Plain; charset=UTF-8").unwrap();
//!
//! assert!(range.matches(&plain));
//! assert_eq!(plain.to_string(), "text/plain;charset=UTF-8");
//! assert_eq!(plain, MediaType::plain_text_utf8());
//! ```

use crate::error::MediaTypeError;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Media Type
// ============================================================================

/// A parsed MIME type: `type/subtype` plus ordered parameters.
///
/// Type, subtype and parameter names are stored lower-cased. Parameter values
/// keep their case; `charset` values compare case-insensitively.
#[derive(Debug, Clone, Eq)]
pub struct MediaType {
    type_: String,
    subtype: String,
    params: Vec<(String, String)>,
}

/// Precedence key used when several media ranges match the same type.
///
/// Field order matters: an exact type outranks an exact subtype, which
/// outranks the number of parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity {
    type_exact: bool,
    subtype_exact: bool,
    params: usize,
}

impl MediaType {
    /// Create a new media type.
    ///
    /// Both halves are lower-cased. No token validation happens here; use
    /// [`MediaType::parse`] for untrusted input.
    pub fn new(type_: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            type_: type_.into().to_ascii_lowercase(),
            subtype: subtype.into().to_ascii_lowercase(),
            params: Vec::new(),
        }
    }

    /// Add a parameter, replacing any previous value with the same name.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    /// Create `application/json` media type.
    pub fn json() -> Self {
        Self::new("application", "json")
    }

    /// Create `text/plain;charset=utf-8` media type.
    pub fn plain_text_utf8() -> Self {
        Self::new("text", "plain").with_param("charset", "utf-8")
    }

    /// Create `application/octet-stream` media type.
    pub fn octet_stream() -> Self {
        Self::new("application", "octet-stream")
    }

    /// Create `application/x-www-form-urlencoded` media type.
    pub fn form_urlencoded() -> Self {
        Self::new("application", "x-www-form-urlencoded")
    }

    /// Create `*/*` wildcard media type.
    pub fn any() -> Self {
        Self::new("*", "*")
    }

    /// Parse a media type or media range.
    ///
    /// A `q` parameter is not special here; [`crate::accept`] strips it
    /// before the remaining parameters reach a `MediaType`.
    pub fn parse(s: &str) -> Result<Self, MediaTypeError> {
        let mut segments = split_unquoted(s, ';').into_iter();
        let essence = segments.next().unwrap_or_default();
        let mut media_type = parse_essence(essence)?;

        for segment in segments {
            if segment.trim().is_empty() {
                continue;
            }
            let (name, value) = parse_parameter(segment)?;
            media_type = media_type.with_param(name, value);
        }

        Ok(media_type)
    }

    /// The top-level type, e.g. `application`.
    pub fn type_(&self) -> &str {
        &self.type_
    }

    /// The subtype, e.g. `json`.
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// Parameters in declaration order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Look up a parameter value by (case-insensitive) name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The `type/subtype` string without parameters.
    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }

    /// Check if this is a wildcard type (`*/*`).
    pub fn is_any(&self) -> bool {
        self.type_ == "*" && self.subtype == "*"
    }

    /// Check if either half is a wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.type_ == "*" || self.subtype == "*"
    }

    /// Check whether `other` falls inside this media range.
    ///
    /// `self` is the range. Every parameter on the range must be present on
    /// `other` with an equal value; extra parameters on `other` are fine.
    pub fn matches(&self, other: &MediaType) -> bool {
        let type_matches = self.type_ == "*" || self.type_ == other.type_;
        let subtype_matches = self.subtype == "*" || self.subtype == other.subtype;
        type_matches
            && subtype_matches
            && self.params.iter().all(|(name, value)| {
                other
                    .param(name)
                    .is_some_and(|theirs| param_value_eq(name, value, theirs))
            })
    }

    /// Precedence of this value when used as a media range.
    pub fn specificity(&self) -> Specificity {
        Specificity {
            type_exact: self.type_ != "*",
            subtype_exact: self.subtype != "*",
            params: self.params.len(),
        }
    }
}

impl PartialEq for MediaType {
    fn eq(&self, other: &Self) -> bool {
        self.type_ == other.type_
            && self.subtype == other.subtype
            && self.params.len() == other.params.len()
            && self.params.iter().all(|(name, value)| {
                other
                    .param(name)
                    .is_some_and(|theirs| param_value_eq(name, value, theirs))
            })
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.params {
            if is_token(value) {
                write!(f, ";{}={}", name, value)?;
            } else {
                write!(f, ";{}=\"", name)?;
                for c in value.chars() {
                    if c == '"' || c == '\\' {
                        write!(f, "\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, "\"")?;
            }
        }
        Ok(())
    }
}

impl FromStr for MediaType {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Grammar helpers
// ============================================================================

fn param_value_eq(name: &str, a: &str, b: &str) -> bool {
    if name == "charset" {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

/// RFC 7230 `tchar`.
fn is_tchar(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

pub(crate) fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_tchar)
}

/// Split on `delim`, ignoring delimiters inside double-quoted strings.
///
/// Always yields at least one segment.
pub(crate) fn split_unquoted(s: &str, delim: char) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == delim && !in_quotes => {
                segments.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    segments.push(&s[start..]);
    segments
}

/// Parse the `type/subtype` part of a media type.
pub(crate) fn parse_essence(essence: &str) -> Result<MediaType, MediaTypeError> {
    let essence = essence.trim();
    if essence.is_empty() {
        return Err(MediaTypeError::Empty);
    }

    let (type_, subtype) = essence
        .split_once('/')
        .ok_or_else(|| MediaTypeError::MissingSlash(essence.to_string()))?;
    let (type_, subtype) = (type_.trim(), subtype.trim());

    for token in [type_, subtype] {
        if !is_token(token) {
            return Err(MediaTypeError::InvalidToken(token.to_string()));
        }
    }
    if type_ == "*" && subtype != "*" {
        return Err(MediaTypeError::WildcardType(essence.to_string()));
    }

    Ok(MediaType::new(type_, subtype))
}

/// Parse one `name=value` parameter; quoted values are unescaped.
pub(crate) fn parse_parameter(segment: &str) -> Result<(String, String), MediaTypeError> {
    let segment = segment.trim();
    let (name, value) = segment
        .split_once('=')
        .ok_or_else(|| MediaTypeError::InvalidParameter(segment.to_string()))?;
    let (name, value) = (name.trim(), value.trim());

    if !is_token(name) {
        return Err(MediaTypeError::InvalidParameter(segment.to_string()));
    }

    let value = if let Some(quoted) = value.strip_prefix('"') {
        unquote(quoted).ok_or_else(|| MediaTypeError::UnterminatedQuote(segment.to_string()))?
    } else if is_token(value) {
        value.to_string()
    } else {
        return Err(MediaTypeError::InvalidParameter(segment.to_string()));
    };

    Ok((name.to_ascii_lowercase(), value))
}

/// Unescape the body of a quoted string (opening quote already removed).
/// Returns `None` unless the closing quote is the final character.
fn unquote(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            '"' => return chars.next().is_none().then_some(out),
            c => out.push(c),
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_parse() {
        let mt = MediaType::parse("application/json").unwrap();
        assert_eq!(mt.type_(), "application");
        assert_eq!(mt.subtype(), "json");
        assert!(mt.params().is_empty());
    }

    #[test]
    fn test_media_type_is_case_insensitive() {
        let mt = MediaType::parse("Application/JSON").unwrap();
        assert_eq!(mt, MediaType::json());
    }

    #[test]
    fn test_media_type_with_params() {
        let mt = MediaType::parse("text/html; Charset=\"utf-8\"; level=1").unwrap();
        assert_eq!(mt.param("charset"), Some("utf-8"));
        assert_eq!(mt.param("level"), Some("1"));
        assert_eq!(mt.params()[0].0, "charset");
    }

    #[test]
    fn test_quoted_param_with_delimiters() {
        let mt = MediaType::parse(r#"multipart/mixed; boundary="a;b,\"c""#).unwrap();
        assert_eq!(mt.param("boundary"), Some("a;b,\"c"));
        assert_eq!(
            mt.to_string(),
            r#"multipart/mixed;boundary="a;b,\"c""#
        );
    }

    #[test]
    fn test_trailing_semicolon_is_tolerated() {
        let mt = MediaType::parse("text/plain;").unwrap();
        assert_eq!(mt, MediaType::new("text", "plain"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(MediaType::parse(""), Err(MediaTypeError::Empty));
        assert!(matches!(
            MediaType::parse("json"),
            Err(MediaTypeError::MissingSlash(_))
        ));
        assert!(matches!(
            MediaType::parse("*/json"),
            Err(MediaTypeError::WildcardType(_))
        ));
        assert!(matches!(
            MediaType::parse("text/pla in"),
            Err(MediaTypeError::InvalidToken(_))
        ));
        assert!(matches!(
            MediaType::parse("text/plain; charset"),
            Err(MediaTypeError::InvalidParameter(_))
        ));
        assert!(matches!(
            MediaType::parse("text/plain; charset=\"utf-8"),
            Err(MediaTypeError::UnterminatedQuote(_))
        ));
    }

    #[test]
    fn test_equality_ignores_param_order() {
        let a = MediaType::new("text", "x").with_param("a", "1").with_param("b", "2");
        let b = MediaType::new("text", "x").with_param("b", "2").with_param("a", "1");
        assert_eq!(a, b);
        assert_ne!(a, MediaType::new("text", "x").with_param("a", "1"));
    }

    #[test]
    fn test_media_type_matches() {
        let json = MediaType::json();
        let any = MediaType::any();
        let app_any = MediaType::new("application", "*");
        let html = MediaType::new("text", "html");

        assert!(any.matches(&json));
        assert!(app_any.matches(&json));
        assert!(!app_any.matches(&html));
        assert!(!json.matches(&html));
        // The range is the receiver: a concrete type does not match a wildcard.
        assert!(!json.matches(&any));
    }

    #[test]
    fn test_range_params_must_be_present() {
        let range = MediaType::parse("text/plain;charset=UTF-8").unwrap();
        assert!(range.matches(&MediaType::plain_text_utf8()));
        assert!(!range.matches(&MediaType::new("text", "plain")));
        assert!(MediaType::new("text", "plain").matches(&MediaType::plain_text_utf8()));
    }

    #[test]
    fn test_specificity_ordering() {
        let any = MediaType::any().specificity();
        let text_any = MediaType::new("text", "*").specificity();
        let plain = MediaType::new("text", "plain").specificity();
        let plain_utf8 = MediaType::plain_text_utf8().specificity();

        assert!(any < text_any);
        assert!(text_any < plain);
        assert!(plain < plain_utf8);
    }

    #[test]
    fn test_display_round_trips() {
        let mt = MediaType::plain_text_utf8();
        assert_eq!(mt.to_string(), "text/plain;charset=utf-8");
        assert_eq!(mt.to_string().parse::<MediaType>().unwrap(), mt);
        assert_eq!(mt.essence(), "text/plain");
    }

    #[test]
    fn test_split_unquoted() {
        assert_eq!(split_unquoted("a, b", ','), vec!["a", " b"]);
        assert_eq!(split_unquoted("a=\"x,y\",b", ','), vec!["a=\"x,y\"", "b"]);
        assert_eq!(split_unquoted("", ','), vec![""]);
    }
}
