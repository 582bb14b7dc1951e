//! Font programs parsed with read-fonts
//!
//! The raw bytes are kept and a `FontRef` is created on demand for each
//! query, which keeps `Font` free of self-referential borrows and
//! supports TTC collections through the face index.

use camino::Utf8Path;
use read_fonts::{FontRef as ReadFontRef, TableProvider};

use mushaf_core::error::FontLoadError;
use mushaf_core::traits::FontProgram;
use mushaf_core::types::GlyphId;

use crate::security;

pub struct Font {
    data: Vec<u8>,
    face_index: u32,
    glyph_count: Option<u32>,
}

impl Font {
    /// Read and parse a font file, enforcing the size limit
    pub fn from_file(path: &Utf8Path) -> Result<Self, FontLoadError> {
        let size = std::fs::metadata(path.as_std_path())
            .map_err(|_| FontLoadError::FileNotFound(path.to_string()))?
            .len();
        security::validate_font_size(size)?;

        let data = std::fs::read(path.as_std_path())
            .map_err(|_| FontLoadError::FileNotFound(path.to_string()))?;
        Self::from_data(data)
    }

    pub fn from_data(data: Vec<u8>) -> Result<Self, FontLoadError> {
        Self::from_data_index(data, 0)
    }

    /// Parse a specific face (for TTC collections)
    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self, FontLoadError> {
        let font = ReadFontRef::from_index(&data, face_index).map_err(|_| FontLoadError::InvalidData)?;
        font.cmap().map_err(|_| FontLoadError::InvalidData)?;
        let glyph_count = font.maxp().ok().map(|maxp| u32::from(maxp.num_glyphs()));

        Ok(Self {
            data,
            face_index,
            glyph_count,
        })
    }

    fn font_ref(&self) -> Option<ReadFontRef<'_>> {
        ReadFontRef::from_index(&self.data, self.face_index).ok()
    }
}

impl FontProgram for Font {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.font_ref()
            .and_then(|font| font.cmap().ok()?.map_codepoint(ch).map(|gid| gid.to_u32()))
    }

    fn glyph_count(&self) -> Option<u32> {
        self.glyph_count
    }

    fn face_index(&self) -> u32 {
        self.face_index
    }
}
