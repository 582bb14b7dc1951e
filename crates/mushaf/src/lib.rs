//! Mushaf - script/font-correct content for Quran e-books
//!
//! Several digital encodings of the Quranic text only render correctly
//! with the fonts they were made for. This crate ties together the pieces
//! that keep every output variant on a verified pairing:
//!
//! 1. **Normalize** - A raw feed becomes an immutable [`Book`] ([`unicode`])
//! 2. **Resolve** - Each [`BuildConfig`] is checked by the [`CompatibilityRegistry`] ([`fontdb`])
//! 3. **Assemble** - The book becomes fragments and a navigation model ([`assemble`])
//! 4. **Subset** - Every font is cut to its verified glyph closure ([`subset`])
//! 5. **Orchestrate** - Many variants build in parallel, one report each ([`batch`])
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mushaf::prelude::*;
//!
//! let book = Arc::new(mushaf::load_book(&feed_json, ValidationMode::Complete)?);
//! let registry = Arc::new(CompatibilityRegistry::builtin()?);
//! let packager = Arc::new(MemoryPackager::new());
//!
//! let orchestrator = Orchestrator::new(registry, book, library, packager);
//! for report in orchestrator.run_manifest(&Manifest::from_json(&manifest_json)?)? {
//!     println!("{}: {}", report.variant, report.is_success());
//! }
//! ```

pub use mushaf_core::{
    cache, config, content, error, fragment, glyph, script, switches, traits, ArtifactHandle,
    Book, BuildConfig, FontId, FontProgram, LayoutMode, MushafError, Packager, Result,
    ScriptEncoding,
};

pub use mushaf_assemble as assemble;
pub use mushaf_batch as batch;
pub use mushaf_fontdb as fontdb;
pub use mushaf_subset as subset;
pub use mushaf_unicode as unicode;

pub use mushaf_assemble::Assembler;
pub use mushaf_batch::{BuildReport, Manifest, MemoryPackager, Orchestrator};
pub use mushaf_fontdb::{CompatibilityRegistry, FontLibrary};

use mushaf_core::content::SourceFeed;
use mushaf_unicode::{validate_book, TextNormalizer, ValidationMode};

/// Parse a JSON feed, normalize it and check its structure.
///
/// Structural issues are logged, not fatal: a feed with an odd page
/// number still builds. Normalization errors are.
pub fn load_book(feed_json: &str, mode: ValidationMode) -> Result<Book> {
    let feed: SourceFeed = serde_json::from_str(feed_json)
        .map_err(|e| MushafError::Config(format!("invalid source feed: {}", e)))?;
    let book = TextNormalizer::new().normalize_feed(&feed)?;

    let issues = validate_book(&book, mode);
    for issue in &issues {
        log::warn!("Source check: {}", issue);
    }
    log::info!(
        "Loaded {} surahs, {} ayat ({} issue(s))",
        book.surahs.len(),
        book.ayah_count(),
        issues.len()
    );
    Ok(book)
}

/// Common imports for typical usage
pub mod prelude {
    pub use mushaf_batch::{
        BuildReport, BuildStatus, FailureKind, Manifest, MemoryPackager, Orchestrator,
        OrchestratorOptions,
    };
    pub use mushaf_core::{
        config::{BuildConfig, Cosmetics, HeaderStyle, LayoutMode, Pagination, VariantId},
        content::{Book, SourceFeed, TranslatorId},
        error::{MushafError, Result},
        fragment::{DocumentFragment, NavModel},
        glyph::{FontResource, GlyphClosure},
        script::{FontDescriptor, FontId, ScriptEncoding},
        traits::{FontProgram, Packager},
    };
    pub use mushaf_fontdb::{CompatibilityRegistry, FontLibrary, FontSources};
    pub use mushaf_unicode::{reduce_rasm, ValidationMode};
}
