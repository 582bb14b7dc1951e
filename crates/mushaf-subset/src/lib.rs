// this_file: crates/mushaf-subset/src/lib.rs

//! Font subsetting for the Mushaf engine.
//!
//! Each font a variant uses is cut down to its glyph closure: the
//! codepoints its spans contain plus every codepoint of the required
//! ligatures those codepoints touch. The ligature step matters because a
//! form like the basmala can be one codepoint in the text while the font
//! builds it from a substitution keyed on a whole letter sequence.
//!
//! A subset is a real font file: the source is read with read-fonts and
//! the cut tables are written with write-fonts. Glyphs a substitution or
//! a composite reaches from the mapped ones are kept too.
//!
//! Nothing leaves here unverified. A subset, or a full font whose
//! license forbids subsetting, that cannot resolve every closure
//! codepoint is a [`SubsetError::LigatureClosureViolation`], never a
//! warning.

pub mod binary;
pub mod closure;
pub mod plan;

use mushaf_core::cache::{CacheMetrics, MultiLevelCache, SubsetCacheKey};
use mushaf_core::error::SubsetError;
use mushaf_core::fragment::DocumentFragment;
use mushaf_core::glyph::{FontResource, GlyphClosure, SubsetStats};
use mushaf_core::script::FontDescriptor;
use mushaf_core::switches;
use mushaf_core::traits::FontProgram;

pub use closure::closure;
pub use plan::{plan, verify};

const CACHE_L1_SIZE: usize = 16;
const CACHE_L2_SIZE: usize = 256;

/// Plans subsets, optionally remembering them by (font, closure hash)
pub struct Subsetter {
    cache: Option<MultiLevelCache<SubsetCacheKey, FontResource>>,
}

impl Default for Subsetter {
    fn default() -> Self {
        Self::with_cache(switches::is_subset_cache_enabled())
    }
}

impl Subsetter {
    /// Cache on or off according to `MUSHAF_SUBSET_CACHE`
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(enabled: bool) -> Self {
        Self {
            cache: enabled.then(|| MultiLevelCache::new(CACHE_L1_SIZE, CACHE_L2_SIZE)),
        }
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn cache_metrics(&self) -> Option<CacheMetrics> {
        self.cache.as_ref().map(|cache| cache.metrics())
    }

    /// Cut and verify one font for `closure`
    pub fn subset(
        &self,
        descriptor: &FontDescriptor,
        program: &dyn FontProgram,
        closure: &GlyphClosure,
    ) -> Result<FontResource, SubsetError> {
        let Some(cache) = &self.cache else {
            return plan(descriptor, program, closure);
        };

        let key = SubsetCacheKey {
            font: descriptor.id,
            closure_hash: closure.hash_key(),
        };
        let resource = cache.get_or_try_insert(key, || plan(descriptor, program, closure))?;
        // A hit was verified against an equal-hash closure; check this one
        verify(&resource, program, closure)?;
        Ok(resource)
    }

    /// Closure, subset and stats for one font over a variant's fragments
    pub fn subset_fragments(
        &self,
        descriptor: &FontDescriptor,
        program: &dyn FontProgram,
        fragments: &[DocumentFragment],
    ) -> Result<(FontResource, SubsetStats), SubsetError> {
        let closure = closure(descriptor, fragments);
        let resource = self.subset(descriptor, program, &closure)?;
        let stats = SubsetStats::of(&resource, &closure);
        Ok((resource, stats))
    }
}

#[cfg(test)]
mod tests;

#[cfg(test)]
mod proptests;
