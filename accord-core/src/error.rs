// Error types for Accord content negotiation

use thiserror::Error;

/// Errors produced while parsing a media type or media range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaTypeError {
    #[error("Media type is empty")]
    Empty,

    #[error("Media type '{0}' is missing the '/' separator")]
    MissingSlash(String),

    #[error("Invalid token '{0}' in media type")]
    InvalidToken(String),

    #[error("Wildcard type requires a wildcard subtype: '{0}'")]
    WildcardType(String),

    #[error("Invalid media type parameter: '{0}'")]
    InvalidParameter(String),

    #[error("Unterminated quoted string in parameter: '{0}'")]
    UnterminatedQuote(String),

    #[error("Invalid quality value: '{0}'")]
    InvalidQuality(String),
}

/// Errors raised while declaring a codec registry.
///
/// These are programming errors: they surface once, when the endpoint builds
/// its registry, never while serving a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("A registry must declare at least one content type")]
    EmptyRegistry,

    #[error("Content type '{0}' declares neither a renderer nor an unrenderer")]
    EmptyEntry(String),

    #[error("Codec entry '{0}' declares no media types")]
    NoMediaTypes(String),

    #[error("Content type '{0}' cannot be rendered: response media types must be concrete")]
    WildcardRenderType(String),

    #[error("Invalid negotiation settings: {0}")]
    InvalidConfig(String),
}

/// Diagnostic produced when a request body cannot be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    /// Create a decode error carrying a human-readable diagnostic.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Diagnostic produced when a codec fails to serialize a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    /// Create a render error carrying a human-readable diagnostic.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Request-time negotiation failures, ready to be mapped onto a response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NegotiationError {
    #[error("Not Acceptable: {0}")]
    NotAcceptable(String),

    #[error("Unsupported Media Type: {0}")]
    UnsupportedMediaType(String),

    #[error("Malformed body: {0}")]
    MalformedBody(#[from] DecodeError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl NegotiationError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            NegotiationError::NotAcceptable(_) => 406,
            NegotiationError::UnsupportedMediaType(_) => 415,
            NegotiationError::MalformedBody(_) => 400,
            NegotiationError::Render(_) => 500,
        }
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

/// Errors raised while loading negotiation settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },

    #[error("Validation error: {0}")]
    ValidationError(String),
}
