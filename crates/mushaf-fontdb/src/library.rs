//! Loaded font programs, keyed by font identity

use std::collections::BTreeMap;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use mushaf_core::error::{FontLoadError, MushafError};
use mushaf_core::script::FontId;
use mushaf_core::traits::FontProgram;

use crate::font::Font;
use crate::security;

/// Where each font file lives on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontSources {
    paths: BTreeMap<FontId, Utf8PathBuf>,
}

impl FontSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, MushafError> {
        serde_json::from_str(json)
            .map_err(|e| MushafError::Config(format!("invalid font sources: {}", e)))
    }

    pub fn insert(&mut self, font: FontId, path: impl Into<Utf8PathBuf>) {
        self.paths.insert(font, path.into());
    }

    pub fn get(&self, font: FontId) -> Option<&Utf8Path> {
        self.paths.get(&font).map(Utf8PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FontId, &Utf8Path)> {
        self.paths.iter().map(|(id, path)| (*id, path.as_path()))
    }
}

/// The font programs available to a run
///
/// Built before any variant starts and shared read-only afterwards.
#[derive(Clone, Default)]
pub struct FontLibrary {
    fonts: BTreeMap<FontId, Arc<dyn FontProgram>>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every font named in `sources`
    ///
    /// Paths are sanitized first; relative paths resolve against `base_dir`.
    pub fn load(sources: &FontSources, base_dir: Option<&Utf8Path>) -> Result<Self, FontLoadError> {
        let mut library = Self::new();
        for (font, path) in sources.iter() {
            let path = security::sanitize_path(path, base_dir)?;
            let program = Font::from_file(&path)?;
            log::info!(
                "Loaded {} from {} ({} glyphs)",
                font,
                path,
                program
                    .glyph_count()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "?".to_string())
            );
            library.insert(font, Arc::new(program));
        }
        Ok(library)
    }

    pub fn insert(&mut self, font: FontId, program: Arc<dyn FontProgram>) {
        self.fonts.insert(font, program);
    }

    pub fn get(&self, font: FontId) -> Option<Arc<dyn FontProgram>> {
        self.fonts.get(&font).cloned()
    }

    pub fn contains(&self, font: FontId) -> bool {
        self.fonts.contains_key(&font)
    }

    pub fn fonts(&self) -> impl Iterator<Item = FontId> + '_ {
        self.fonts.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}
