//! Mushaf Core: the shared vocabulary of the e-book engine
//!
//! Scripture enters as a normalized feed, leaves as document fragments
//! and minimized fonts. Every crate in the workspace speaks through the
//! types defined here.
//!
//! ## The Flow
//!
//! 1. **Normalize** - Feed records become an immutable [`content::Book`]
//! 2. **Resolve** - A [`config::BuildConfig`] is checked against the compatibility registry
//! 3. **Assemble** - The book becomes [`fragment::DocumentFragment`]s and a [`fragment::NavModel`]
//! 4. **Subset** - Each font is cut down to its [`glyph::GlyphClosure`]
//! 5. **Package** - A [`traits::Packager`] turns the result into an artifact
//!
//! ## The Seams
//!
//! - [`traits::FontProgram`] - Your window into a font's character map
//! - [`traits::Packager`] - Where finished variants leave the engine
//!
//! ```
//! use mushaf_core::config::{BuildConfig, LayoutMode};
//! use mushaf_core::script::ScriptEncoding;
//!
//! let config = BuildConfig::new("uthmani", ScriptEncoding::TextUthmani, LayoutMode::Inline);
//! assert!(config.validate().is_ok());
//! ```

pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod fragment;
pub mod glyph;
pub mod script;
pub mod switches;
pub mod traits;

pub use config::{BuildConfig, LayoutMode, Pagination, VariantId};
pub use content::{AyahKey, Book, TranslatorId};
pub use error::{
    AssemblyError, FontLoadError, MushafError, NormalizeError, PackageError, RegistryError,
    Result, SubsetError,
};
pub use fragment::{DocumentFragment, NavModel};
pub use glyph::{FontResource, GlyphClosure, MinimizedFont};
pub use script::{FontDescriptor, FontId, FontRole, RequiredLigature, ScriptEncoding};
pub use traits::{ArtifactHandle, FontProgram, Packager};

/// Small value types shared across crates
pub mod types {
    /// Unique identifier for a glyph within a font
    pub type GlyphId = u32;
}
