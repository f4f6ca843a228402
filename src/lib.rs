// Accord - declarative content negotiation for Rust HTTP services
//
// This library lets an endpoint declare the media types it speaks once and
// dispatches to the matching codec from the Accept and Content-Type headers.

// Re-export core functionality
pub use accord_core::*;

// Re-export the crates codec implementations are written against
pub use bytes;
pub use serde;
pub use serde_json;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        AcceptHeader,
        CodecEntry,
        // Codec traits
        ContentType,
        DecodeError,
        FormUrlEncoded,
        Json,
        MediaType,
        MimeRender,
        MimeUnrender,
        NegotiationConfig,
        NegotiationError,
        NoContent,
        OctetStream,
        PlainText,
        Registry,
        RenderError,
        Rendered,
    };
}
