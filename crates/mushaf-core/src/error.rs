//! Error types for the Mushaf engine
//!
//! Each component owns a small error enum; [`MushafError`] folds them
//! together so callers can use `?` across component boundaries.

use thiserror::Error;

use crate::script::{FontId, ScriptEncoding};

pub type Result<T> = std::result::Result<T, MushafError>;

/// Main error type for the Mushaf engine
#[derive(Debug, Error)]
pub enum MushafError {
    #[error("Registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("Normalization failed: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Assembly failed: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Subsetting failed: {0}")]
    Subset(#[from] SubsetError),

    #[error("Font loading failed: {0}")]
    FontLoad(#[from] FontLoadError),

    #[error("Packaging failed: {0}")]
    Package(#[from] PackageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Script/font compatibility errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("script encoding '{0}' has no verified font")]
    NotRegistered(ScriptEncoding),

    #[error("font '{font}' is not validated for script encoding '{encoding}' (verified: {verified})")]
    IncompatiblePair {
        encoding: ScriptEncoding,
        font: FontId,
        /// Comma-separated fonts that are verified for the encoding
        verified: String,
    },

    #[error("pair {encoding}/{font} has no recorded verification")]
    UnverifiedEntry {
        encoding: ScriptEncoding,
        font: FontId,
    },

    #[error("font '{0}' is described twice with different properties")]
    ConflictingDescriptor(FontId),

    #[error("font '{0}' is referenced but missing from the font catalog")]
    UnknownFont(FontId),
}

/// Source data normalization errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("{surah}:{ayah} has empty text for '{encoding}'")]
    EmptyText {
        surah: u16,
        ayah: u16,
        encoding: ScriptEncoding,
    },

    #[error("{surah}:{ayah} text for '{encoding}' is not Arabic script")]
    NotArabicScript {
        surah: u16,
        ayah: u16,
        encoding: ScriptEncoding,
    },

    #[error("ayah {surah}:{ayah} appears more than once in the feed")]
    DuplicateAyah { surah: u16, ayah: u16 },

    #[error("surah {0} is outside 1..=114")]
    UnknownSurah(u16),
}

/// Content assembly errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("book has no text in script encoding '{0}'")]
    MissingScript(ScriptEncoding),

    #[error("invalid build config: {0}")]
    InvalidConfig(String),

    #[error("translation {0} is not present in the source feed")]
    UnknownTranslation(u32),
}

/// Font subsetting errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubsetError {
    #[error("font '{font}' cannot resolve required codepoints {missing}")]
    LigatureClosureViolation {
        font: FontId,
        /// Formatted `U+XXXX` list of codepoints without a glyph
        missing: String,
    },

    #[error("no font program loaded for '{0}'")]
    FontUnavailable(FontId),

    #[error("font '{font}' could not be subset: {reason}")]
    Malformed { font: FontId, reason: String },
}

/// Font loading errors
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("Font file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid font data")]
    InvalidData,

    #[error("Font file too large: {size} bytes (max: {max})")]
    TooLarge { size: u64, max: u64 },

    #[error("Invalid font path: {0}")]
    InvalidPath(String),
}

/// Errors raised by the packaging collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackageError {
    #[error("packager rejected variant '{variant}': {reason}")]
    Rejected { variant: String, reason: String },
}
