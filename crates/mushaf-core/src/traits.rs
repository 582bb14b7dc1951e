//! The seams between the engine and the outside world
//!
//! - [`FontProgram`] - Your window into a font's character map
//! - [`Packager`] - Where assembled fragments and fonts leave the engine

use serde::{Deserialize, Serialize};

use crate::config::BuildConfig;
use crate::error::PackageError;
use crate::fragment::{DocumentFragment, NavModel};
use crate::glyph::FontResource;
use crate::types::GlyphId;

/// Read access to one loaded font
///
/// The subsetter cuts real bytes when `data()` holds a font file. A
/// program with no bytes gets a map-only plan, so test code can stand in
/// a synthetic font with a handful of mappings.
///
/// ```ignore
/// struct MockFont(HashMap<char, GlyphId>);
///
/// impl FontProgram for MockFont {
///     fn data(&self) -> &[u8] {
///         &[]
///     }
///
///     fn glyph_id(&self, ch: char) -> Option<GlyphId> {
///         self.0.get(&ch).copied()
///     }
/// }
/// ```
pub trait FontProgram: Send + Sync {
    /// Raw font bytes as they live in the file
    fn data(&self) -> &[u8];

    /// Find the glyph that represents this character
    ///
    /// Returns None when the font doesn't map this character.
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    /// How many glyphs this font contains
    fn glyph_count(&self) -> Option<u32> {
        None
    }

    /// Face within a collection; `data()` may hold a whole TTC
    fn face_index(&self) -> u32 {
        0
    }
}

/// Opaque reference to a packaged artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactHandle {
    pub id: String,
    /// Where the artifact lives, in whatever terms the packager uses
    pub location: String,
}

/// Turns one variant's output into an artifact
///
/// Called at most once per variant, and only when every earlier step
/// succeeded; a variant that failed never reaches the packager.
pub trait Packager: Send + Sync {
    fn name(&self) -> &'static str;

    fn package(
        &self,
        config: &BuildConfig,
        fragments: &[DocumentFragment],
        nav: &NavModel,
        fonts: &[FontResource],
    ) -> std::result::Result<ArtifactHandle, PackageError>;
}
