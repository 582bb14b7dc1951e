//! Glyph closures and minimized font resources

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::script::{FontId, RequiredLigature};
use crate::types::GlyphId;

/// Codepoints one font must keep to render a set of fragments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphClosure {
    pub font: FontId,
    pub codepoints: BTreeSet<char>,
    /// Ligature rules whose codepoints were pulled into the closure
    pub ligatures: Vec<RequiredLigature>,
}

impl GlyphClosure {
    pub fn new(font: FontId) -> Self {
        Self {
            font,
            codepoints: BTreeSet::new(),
            ligatures: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.codepoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.codepoints.contains(&ch)
    }

    pub fn is_superset(&self, other: &GlyphClosure) -> bool {
        self.codepoints.is_superset(&other.codepoints)
    }

    /// Stable within a process; used as a cache key together with the font id
    pub fn hash_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.font.hash(&mut hasher);
        self.codepoints.hash(&mut hasher);
        hasher.finish()
    }
}

/// A cut font: the retained character map, glyph set and font bytes
///
/// Glyph ids keep their source numbering; dropped glyphs are left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimizedFont {
    pub font: FontId,
    pub cmap: BTreeMap<char, GlyphId>,
    /// Retained glyph ids, always including 0 (.notdef), plus what
    /// substitutions and composites reach from the mapped ones
    pub glyphs: BTreeSet<GlyphId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_glyph_count: Option<u32>,
    pub closure_hash: u64,
    /// The subset font file; empty for a program that had no bytes
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl MinimizedFont {
    pub fn resolves(&self, ch: char) -> bool {
        self.cmap
            .get(&ch)
            .is_some_and(|gid| *gid != 0 && self.glyphs.contains(gid))
    }

    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Font data handed to the packager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FontResource {
    Subset(MinimizedFont),
    /// License forbids modification; the full font is embedded as-is
    Full {
        font: FontId,
        glyph_count: Option<u32>,
    },
}

impl FontResource {
    pub fn font(&self) -> FontId {
        match self {
            Self::Subset(min) => min.font,
            Self::Full { font, .. } => *font,
        }
    }

    pub fn is_subset(&self) -> bool {
        matches!(self, Self::Subset(_))
    }
}

/// Per-font numbers reported for a successful variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetStats {
    pub font: FontId,
    pub subset: bool,
    pub closure_size: usize,
    pub retained_glyphs: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_glyphs: Option<u32>,
}

impl SubsetStats {
    pub fn of(resource: &FontResource, closure: &GlyphClosure) -> Self {
        match resource {
            FontResource::Subset(min) => Self {
                font: min.font,
                subset: true,
                closure_size: closure.len(),
                retained_glyphs: min.glyphs.len(),
                source_glyphs: min.source_glyph_count,
            },
            FontResource::Full { font, glyph_count } => Self {
                font: *font,
                subset: false,
                closure_size: closure.len(),
                retained_glyphs: glyph_count.unwrap_or(0) as usize,
                source_glyphs: *glyph_count,
            },
        }
    }
}
