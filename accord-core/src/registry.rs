//! Codec registries.
//!
//! An endpoint declares, once, the ordered list of content types it supports
//! for a payload type `T`. The resulting [`Registry`] is immutable, cheap to
//! clone, and safe to share across request handlers.
//!
//! # Examples
//!
//! ```
//! use accord_core::codecs::{Json, PlainText};
//! use accord_core::registry::Registry;
//! use accord_core::error::DeclarationError;
//!
//! let registry = Registry::<String>::builder()
//!     .codec(Json)
//!     .codec(PlainText)
//!     .build()
//!     .unwrap();
//! assert_eq!(registry.len(), 2);
//!
//! let empty = Registry::<String>::builder().build();
//! assert_eq!(empty.err(), Some(DeclarationError::EmptyRegistry));
//! ```

use crate::codec::{ContentType, MimeRender, MimeUnrender, NoContent, StaticContentType};
use crate::config::NegotiationConfig;
use crate::error::{DeclarationError, DecodeError, RenderError};
use crate::media_type::MediaType;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type RenderFn<T> = Arc<dyn Fn(&T) -> Result<Bytes, RenderError> + Send + Sync>;
type UnrenderFn<T> = Arc<dyn Fn(&MediaType, &[u8]) -> Result<T, DecodeError> + Send + Sync>;

// ============================================================================
// Codec Entry
// ============================================================================

/// One declared content type together with its render and unrender functions.
///
/// Either function may be absent: a render-only entry never takes part in
/// request decoding, an unrender-only entry never in response negotiation.
pub struct CodecEntry<T> {
    name: String,
    media_types: Vec<MediaType>,
    render: Option<RenderFn<T>>,
    unrender: Option<UnrenderFn<T>>,
}

impl<T: 'static> CodecEntry<T> {
    /// An entry that renders and unrenders through `codec`.
    pub fn codec<C>(codec: C) -> Self
    where
        C: MimeRender<T> + MimeUnrender<T>,
    {
        let codec = Arc::new(codec);
        let mut entry = Self::declare(codec.as_ref());

        let renderer = Arc::clone(&codec);
        let render: RenderFn<T> = Arc::new(move |value: &T| renderer.render(value));
        let unrender: UnrenderFn<T> = Arc::new(move |media_type: &MediaType, body: &[u8]| {
            codec.unrender_with_type(media_type, body)
        });

        entry.render = Some(render);
        entry.unrender = Some(unrender);
        entry
    }

    /// A render-only entry.
    pub fn renderer<C>(codec: C) -> Self
    where
        C: MimeRender<T>,
    {
        let mut entry = Self::declare(&codec);
        let render: RenderFn<T> = Arc::new(move |value: &T| codec.render(value));
        entry.render = Some(render);
        entry
    }

    /// An unrender-only entry.
    pub fn unrenderer<C>(codec: C) -> Self
    where
        C: MimeUnrender<T>,
    {
        let mut entry = Self::declare(&codec);
        let unrender: UnrenderFn<T> = Arc::new(move |media_type: &MediaType, body: &[u8]| {
            codec.unrender_with_type(media_type, body)
        });
        entry.unrender = Some(unrender);
        entry
    }

    /// An entry built from plain media types; attach functions with
    /// [`with_render`](Self::with_render) and [`with_unrender`](Self::with_unrender).
    pub fn custom(media_types: impl IntoIterator<Item = MediaType>) -> Self {
        Self::declare(&StaticContentType::new(media_types))
    }

    /// Attach a render function.
    pub fn with_render<F>(mut self, render: F) -> Self
    where
        F: Fn(&T) -> Result<Bytes, RenderError> + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Attach an unrender function.
    pub fn with_unrender<F>(mut self, unrender: F) -> Self
    where
        F: Fn(&[u8]) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        let unrender: UnrenderFn<T> =
            Arc::new(move |_media_type: &MediaType, body: &[u8]| unrender(body));
        self.unrender = Some(unrender);
        self
    }

    /// Override the diagnostic name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn declare<C: ContentType + ?Sized>(tag: &C) -> Self {
        let media_types = tag.content_types();
        let name = media_types
            .first()
            .map(|_| tag.name())
            .unwrap_or_else(|| "<undeclared>".to_string());
        Self {
            name,
            media_types,
            render: None,
            unrender: None,
        }
    }
}

impl CodecEntry<NoContent> {
    /// A render-only entry producing an empty body under `media_type`.
    pub fn no_content(media_type: MediaType) -> Self {
        Self::custom([media_type]).with_render(|_| Ok(Bytes::new()))
    }
}

impl<T> CodecEntry<T> {
    /// Diagnostic name of this entry.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media types, primary first.
    pub fn media_types(&self) -> &[MediaType] {
        &self.media_types
    }

    /// Check whether this entry can produce response bodies.
    pub fn can_render(&self) -> bool {
        self.render.is_some()
    }

    /// Check whether this entry can decode request bodies.
    pub fn can_unrender(&self) -> bool {
        self.unrender.is_some()
    }

    pub(crate) fn render_value(&self, value: &T) -> Option<Result<Bytes, RenderError>> {
        self.render.as_ref().map(|render| render(value))
    }

    pub(crate) fn unrender_body(
        &self,
        media_type: &MediaType,
        body: &[u8],
    ) -> Option<Result<T, DecodeError>> {
        self.unrender
            .as_ref()
            .map(|unrender| unrender(media_type, body))
    }

    fn validate(&self) -> Result<(), DeclarationError> {
        if self.media_types.is_empty() {
            return Err(DeclarationError::NoMediaTypes(self.name.clone()));
        }
        if !self.can_render() && !self.can_unrender() {
            return Err(DeclarationError::EmptyEntry(self.name.clone()));
        }
        if self.can_render() {
            if let Some(wildcard) = self.media_types.iter().find(|mt| mt.is_wildcard()) {
                return Err(DeclarationError::WildcardRenderType(wildcard.to_string()));
            }
        }
        Ok(())
    }
}

impl<T> fmt::Debug for CodecEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecEntry")
            .field("name", &self.name)
            .field("media_types", &self.media_types)
            .field("render", &self.can_render())
            .field("unrender", &self.can_unrender())
            .finish()
    }
}

// ============================================================================
// Registry
// ============================================================================

struct RegistryInner<T> {
    entries: Vec<CodecEntry<T>>,
    config: NegotiationConfig,
}

/// The ordered, non-empty set of content types an endpoint supports for `T`.
pub struct Registry<T> {
    inner: Arc<RegistryInner<T>>,
}

impl<T: 'static> Registry<T> {
    /// Start declaring a registry.
    pub fn builder() -> RegistryBuilder<T> {
        RegistryBuilder::new()
    }
}

impl<T> Registry<T> {
    /// Declared entries in declaration order.
    pub fn entries(&self) -> &[CodecEntry<T>] {
        &self.inner.entries
    }

    /// Number of declared entries. Never zero.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Settings used when parsing negotiation headers.
    pub fn config(&self) -> &NegotiationConfig {
        &self.inner.config
    }

    /// Every declared media type, in declaration order.
    pub fn media_types(&self) -> Vec<MediaType> {
        self.collect_media_types(|_| true)
    }

    /// Media types usable for responses.
    pub fn render_media_types(&self) -> Vec<MediaType> {
        self.collect_media_types(CodecEntry::can_render)
    }

    /// Media types accepted for request bodies.
    pub fn unrender_media_types(&self) -> Vec<MediaType> {
        self.collect_media_types(CodecEntry::can_unrender)
    }

    fn collect_media_types(&self, keep: impl Fn(&CodecEntry<T>) -> bool) -> Vec<MediaType> {
        self.entries()
            .iter()
            .filter(|entry| keep(*entry))
            .flat_map(|entry| entry.media_types().iter().cloned())
            .collect()
    }
}

impl<T> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.inner.entries)
            .field("config", &self.inner.config)
            .finish()
    }
}

// ============================================================================
// Registry Builder
// ============================================================================

/// Builder for [`Registry`]; validation happens in [`build`](Self::build).
pub struct RegistryBuilder<T> {
    entries: Vec<CodecEntry<T>>,
    config: NegotiationConfig,
}

impl<T: 'static> RegistryBuilder<T> {
    /// Create an empty builder with default settings.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            config: NegotiationConfig::default(),
        }
    }

    /// Declare a content type usable in both directions.
    pub fn codec<C>(self, codec: C) -> Self
    where
        C: MimeRender<T> + MimeUnrender<T>,
    {
        self.entry(CodecEntry::codec(codec))
    }

    /// Declare a response-only content type.
    pub fn renderer<C>(self, codec: C) -> Self
    where
        C: MimeRender<T>,
    {
        self.entry(CodecEntry::renderer(codec))
    }

    /// Declare a request-only content type.
    pub fn unrenderer<C>(self, codec: C) -> Self
    where
        C: MimeUnrender<T>,
    {
        self.entry(CodecEntry::unrenderer(codec))
    }

    /// Declare a prepared entry.
    pub fn entry(mut self, entry: CodecEntry<T>) -> Self {
        self.entries.push(entry);
        self
    }

    /// Use custom negotiation settings.
    pub fn config(mut self, config: NegotiationConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the declaration and freeze it.
    pub fn build(self) -> Result<Registry<T>, DeclarationError> {
        if self.entries.is_empty() {
            return Err(DeclarationError::EmptyRegistry);
        }
        for entry in &self.entries {
            entry.validate()?;
        }
        self.config
            .validate()
            .map_err(|e| DeclarationError::InvalidConfig(e.to_string()))?;

        let names: Vec<&str> = self.entries.iter().map(CodecEntry::name).collect();
        debug!(
            entries = self.entries.len(),
            content_types = %names.join(", "),
            "Declared codec registry"
        );

        Ok(Registry {
            inner: Arc::new(RegistryInner {
                entries: self.entries,
                config: self.config,
            }),
        })
    }
}

impl<T: 'static> Default for RegistryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
