//! The content tree: Book, Surah, Ayah, Word
//!
//! Two shapes live here. The `*Record` types mirror the normalized source
//! feed as the fetch layer delivers it; the tree types are what the
//! normalizer builds from those records. The tree is immutable once built
//! and shared read-only across every variant of a run.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::script::ScriptEncoding;

/// Number of surahs in a complete mushaf
pub const SURAH_COUNT: u16 = 114;

/// Highest page number of the Madani mushaf pagination
pub const MAX_PAGE: u16 = 604;

/// Surah that opens without a basmala
pub const SURAH_WITHOUT_BASMALA: u16 = 9;

/// Surah whose first ayah is the basmala itself
pub const SURAH_WITH_BASMALA_AYAH: u16 = 1;

/// Surah and ayah number, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AyahKey {
    pub surah: u16,
    pub ayah: u16,
}

impl AyahKey {
    pub fn new(surah: u16, ayah: u16) -> Self {
        Self { surah, ayah }
    }

    /// Anchor id used to link into an ayah from navigation and notes
    pub fn anchor(&self) -> String {
        format!("ayah-{}-{}", self.surah, self.ayah)
    }
}

impl fmt::Display for AyahKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.surah, self.ayah)
    }
}

/// Translator (translation resource) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslatorId(pub u32);

impl fmt::Display for TranslatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Source feed
// ---------------------------------------------------------------------------

/// Everything the fetch layer hands over for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceFeed {
    pub surahs: Vec<SurahRecord>,
    #[serde(default)]
    pub translators: Vec<Translator>,
    pub ayahs: Vec<AyahRecord>,
    /// Standalone basmala text per encoding; derived from 1:1 when absent
    #[serde(default)]
    pub basmala: BTreeMap<ScriptEncoding, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurahRecord {
    pub number: u16,
    pub name_arabic: String,
    pub name_simple: String,
    #[serde(default)]
    pub name_translated: Option<String>,
    #[serde(default)]
    pub revelation_place: Option<String>,
}

/// One ayah as the feed delivers it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AyahRecord {
    pub surah: u16,
    pub ayah: u16,
    pub text_by_encoding: BTreeMap<ScriptEncoding, String>,
    #[serde(default)]
    pub translations: BTreeMap<TranslatorId, String>,
    #[serde(default)]
    pub footnotes: Vec<FootnoteRecord>,
    pub page: u16,
    pub juz: u8,
    pub hizb: u8,
    pub rub_el_hizb: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sajdah: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootnoteRecord {
    pub translator: TranslatorId,
    pub id: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translator {
    pub id: TranslatorId,
    pub name: String,
    /// BCP 47 language tag
    pub language: String,
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub surahs: Vec<Surah>,
    pub translators: BTreeMap<TranslatorId, Translator>,
    pub basmala: BTreeMap<ScriptEncoding, String>,
}

impl Book {
    pub fn surah(&self, number: u16) -> Option<&Surah> {
        self.surahs.iter().find(|s| s.number == number)
    }

    pub fn ayah(&self, key: AyahKey) -> Option<&Ayah> {
        self.surah(key.surah)?
            .ayahs
            .iter()
            .find(|a| a.key.ayah == key.ayah)
    }

    pub fn ayahs(&self) -> impl Iterator<Item = &Ayah> {
        self.surahs.iter().flat_map(|s| s.ayahs.iter())
    }

    pub fn ayah_count(&self) -> usize {
        self.surahs.iter().map(|s| s.ayahs.len()).sum()
    }

    /// Does every ayah carry text in `encoding`?
    pub fn has_script(&self, encoding: ScriptEncoding) -> bool {
        let mut ayahs = self.ayahs().peekable();
        ayahs.peek().is_some() && ayahs.all(|a| a.scripts.contains_key(&encoding))
    }

    pub fn basmala(&self, encoding: ScriptEncoding) -> Option<&str> {
        self.basmala.get(&encoding).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surah {
    pub number: u16,
    pub name_arabic: String,
    pub name_simple: String,
    pub name_translated: Option<String>,
    pub revelation_place: Option<String>,
    pub ayahs: Vec<Ayah>,
}

/// Where a surah's basmala comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasmalaRule {
    /// Rendered as an ornament before ayah 1
    Preceding,
    /// Ayah 1 is the basmala (Al-Fatiha)
    FirstAyah,
    /// No basmala (At-Tawbah)
    Absent,
}

impl Surah {
    pub fn basmala_rule(&self) -> BasmalaRule {
        match self.number {
            SURAH_WITH_BASMALA_AYAH => BasmalaRule::FirstAyah,
            SURAH_WITHOUT_BASMALA => BasmalaRule::Absent,
            _ => BasmalaRule::Preceding,
        }
    }

    pub fn anchor(&self) -> String {
        format!("surah-{}", self.number)
    }

    pub fn first_page(&self) -> Option<u16> {
        self.ayahs.first().map(|a| a.position.page)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub page: u16,
    pub juz: u8,
    pub hizb: u8,
    pub rub_el_hizb: u8,
    pub sajdah: bool,
    /// The source text carried a rub-el-hizb mark (U+06DE) for this ayah
    pub hizb_marker: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ayah {
    pub key: AyahKey,
    pub scripts: BTreeMap<ScriptEncoding, ScriptText>,
    pub translations: BTreeMap<TranslatorId, Translation>,
    pub footnotes: Vec<Footnote>,
    pub position: Position,
}

impl Ayah {
    pub fn script(&self, encoding: ScriptEncoding) -> Option<&ScriptText> {
        self.scripts.get(&encoding)
    }

    pub fn footnote(&self, translator: TranslatorId, id: u32) -> Option<&Footnote> {
        self.footnotes
            .iter()
            .find(|f| f.translator == translator && f.id == id)
    }
}

/// Scripture text tagged with its encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptText {
    pub encoding: ScriptEncoding,
    pub text: String,
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// 1-based position within the ayah
    pub position: u16,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub translator: TranslatorId,
    pub pieces: Vec<TranslationPiece>,
    pub rtl: bool,
}

impl Translation {
    /// Text with note references reduced to their visible markers
    pub fn plain_text(&self) -> String {
        self.pieces
            .iter()
            .map(|piece| match piece {
                TranslationPiece::Text(text) => text.as_str(),
                TranslationPiece::NoteRef { marker, .. } => marker.as_str(),
            })
            .collect()
    }

    pub fn note_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.pieces.iter().filter_map(|piece| match piece {
            TranslationPiece::NoteRef { id, .. } => Some(*id),
            TranslationPiece::Text(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationPiece {
    Text(String),
    /// Reference to footnote `id`, shown as `marker`
    NoteRef { id: u32, marker: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footnote {
    pub translator: TranslatorId,
    pub id: u32,
    pub text: String,
}
