// Core library for Accord content negotiation
// Media types, Accept parsing, codec registries and render/unrender dispatch

//! Per-endpoint content negotiation.
//!
//! An endpoint declares the content types it supports for a payload type
//! once, as a [`Registry`]. At request time the registry picks a codec from
//! the `Accept` header to render the response, and from the `Content-Type`
//! header to decode the request body.
//!
//! ```
//! use accord_core::{AcceptHeader, Json, PlainText, Registry};
//!
//! let registry = Registry::<String>::builder()
//!     .codec(Json)
//!     .codec(PlainText)
//!     .build()
//!     .unwrap();
//!
//! let accept = AcceptHeader::from_static("text/plain, application/json;q=0.5");
//! let rendered = registry
//!     .handle_accept(&accept, &"hello".to_string())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(rendered.content_type_header(), "text/plain;charset=utf-8");
//! assert_eq!(&rendered.body[..], b"hello");
//!
//! let decoded = registry.handle_content_type(b"application/json", b"\"hi\"");
//! assert_eq!(decoded, Some(Ok("hi".to_string())));
//! ```

pub mod accept;
pub mod codec;
pub mod codecs;
pub mod config;
pub mod error;
pub mod logging;
pub mod media_type;
pub mod registry;
pub mod render;
pub mod unrender;

// Re-export commonly used types
pub use accept::*;
pub use codec::*;
pub use codecs::*;
pub use config::*;
pub use error::*;
pub use media_type::*;
pub use registry::*;
pub use render::*;
