//! Script encodings, font identities and font descriptors
//!
//! Both identities are closed enumerations. A string that names no
//! variant fails at deserialization time instead of turning into a
//! missing-key lookup deep inside a build.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One digital representation of the Quranic Arabic text
///
/// Encodings of the same text disagree on which codepoints carry sukun,
/// small high marks and pause signs, which is why a font validated for one
/// encoding can corrupt another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptEncoding {
    QpcUthmaniHafs,
    TextQpcHafs,
    TextUthmani,
    TextUthmaniSimple,
    TextUthmaniTajweed,
    TextImlaei,
    TextImlaeiSimple,
    TextIndopak,
    TextIndopakNastaleeq,
    TextQpcNastaleeq,
    TextQpcNastaleeqHafs,
}

impl ScriptEncoding {
    pub const ALL: [ScriptEncoding; 11] = [
        Self::QpcUthmaniHafs,
        Self::TextQpcHafs,
        Self::TextUthmani,
        Self::TextUthmaniSimple,
        Self::TextUthmaniTajweed,
        Self::TextImlaei,
        Self::TextImlaeiSimple,
        Self::TextIndopak,
        Self::TextIndopakNastaleeq,
        Self::TextQpcNastaleeq,
        Self::TextQpcNastaleeqHafs,
    ];

    /// Field name used by the source feed
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QpcUthmaniHafs => "qpc_uthmani_hafs",
            Self::TextQpcHafs => "text_qpc_hafs",
            Self::TextUthmani => "text_uthmani",
            Self::TextUthmaniSimple => "text_uthmani_simple",
            Self::TextUthmaniTajweed => "text_uthmani_tajweed",
            Self::TextImlaei => "text_imlaei",
            Self::TextImlaeiSimple => "text_imlaei_simple",
            Self::TextIndopak => "text_indopak",
            Self::TextIndopakNastaleeq => "text_indopak_nastaleeq",
            Self::TextQpcNastaleeq => "text_qpc_nastaleeq",
            Self::TextQpcNastaleeqHafs => "text_qpc_nastaleeq_hafs",
        }
    }

    /// QPC encodings embed ayah numbers and rub-el-hizb marks inline
    pub fn is_qpc(&self) -> bool {
        let name = self.as_str();
        name.starts_with("qpc_") || name.starts_with("text_qpc_")
    }

    /// Display label as (English, Arabic)
    pub fn label(&self) -> (&'static str, &'static str) {
        match self {
            Self::QpcUthmaniHafs => ("QPC Uthmani Hafs", "برواية حفص عن عاصم"),
            Self::TextUthmani => ("Uthmani", "الرسم العثماني"),
            Self::TextUthmaniSimple => ("Uthmani (Simplified)", "الرسم العثماني المبسّط"),
            Self::TextImlaei => ("Imla'i", "الرسم الإملائي"),
            Self::TextImlaeiSimple => ("Imla'i (Simplified)", "الرسم الإملائي المبسّط"),
            Self::TextIndopak | Self::TextIndopakNastaleeq => ("IndoPak", "الرسم الهندي"),
            Self::TextQpcHafs => ("QPC Hafs", "برواية حفص عن عاصم"),
            Self::TextUthmaniTajweed => ("Uthmani Tajweed", "الرسم العثماني"),
            Self::TextQpcNastaleeq | Self::TextQpcNastaleeqHafs => ("QPC Nastaleeq", "الرسم الهندي"),
        }
    }

    /// Reading tradition the encoding transcribes
    ///
    /// Every encoding currently supported transcribes Hafs 'an 'Asim.
    pub fn riwayah(&self) -> Riwayah {
        Riwayah::Hafs
    }
}

impl fmt::Display for ScriptEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|encoding| encoding.as_str() == s)
            .ok_or_else(|| format!("unknown script encoding '{}'", s))
    }
}

/// Letters of the basmala, spaced as the ornament font's ligature expects
pub const BASMALA_SEQUENCE: &str = "\u{0628}\u{0633}\u{0645} \u{0627}\u{0644}\u{0644}\u{0647} \u{0627}\u{0644}\u{0631}\u{062D}\u{0645}\u{0646} \u{0627}\u{0644}\u{0631}\u{062D}\u{064A}\u{0645}";

/// ARABIC LIGATURE BISMILLAH AR-RAHMAN AR-RAHEEM
pub const BASMALA_LIGATURE: char = '\u{FDFD}';

/// ARABIC LIGATURE ALLAH ISOLATED FORM
pub const ALLAH_LIGATURE: char = '\u{FDF2}';

/// Reading tradition of a transcription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Riwayah {
    Hafs,
}

impl Riwayah {
    pub fn arabic(&self) -> &'static str {
        match self {
            Self::Hafs => "حفص",
        }
    }
}

/// Identity of an embeddable font
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontId {
    AmiriQuran,
    ScheherazadeNew,
    KfgqpcUthmanicHafs,
    MeQuran,
    NotoSansArabic,
}

impl FontId {
    pub const ALL: [FontId; 5] = [
        Self::AmiriQuran,
        Self::ScheherazadeNew,
        Self::KfgqpcUthmanicHafs,
        Self::MeQuran,
        Self::NotoSansArabic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AmiriQuran => "amiri_quran",
            Self::ScheherazadeNew => "scheherazade_new",
            Self::KfgqpcUthmanicHafs => "kfgqpc_uthmanic_hafs",
            Self::MeQuran => "me_quran",
            Self::NotoSansArabic => "noto_sans_arabic",
        }
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|font| font.as_str() == s)
            .ok_or_else(|| format!("unknown font '{}'", s))
    }
}

/// The job a font performs inside a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    /// Scripture text in the variant's encoding
    Body,
    /// Ayah numerals and hizb marks
    Symbol,
    /// Calligraphic surah headers
    Header,
    /// Ornamental basmala ligature
    Ornament,
}

/// A codepoint sequence a font must render as a single glyph
///
/// `output` is the precomposed codepoint when Unicode has one (the
/// basmala is U+FDFD); the font may still implement it through a
/// substitution keyed on `input`, so both sides belong in the closure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequiredLigature {
    pub name: String,
    pub input: String,
    #[serde(default)]
    pub output: Option<char>,
}

impl RequiredLigature {
    pub fn new(name: impl Into<String>, input: impl Into<String>, output: Option<char>) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
            output,
        }
    }

    /// Every codepoint the ligature rule reads or writes
    pub fn codepoints(&self) -> impl Iterator<Item = char> + '_ {
        self.input.chars().chain(self.output)
    }

    /// Does any non-space part of the rule occur in `used`?
    pub fn triggered_by(&self, used: &BTreeSet<char>) -> bool {
        self.codepoints()
            .filter(|ch| !ch.is_whitespace())
            .any(|ch| used.contains(&ch))
    }
}

/// Everything the engine knows about one font
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub id: FontId,
    /// CSS font-family name
    pub family: String,
    /// File name the packager embeds the font under
    pub file_name: String,
    pub license: String,
    /// Whether the license permits modifying (subsetting) the font
    pub can_subset: bool,
    /// Encodings this font has been verified against
    #[serde(default)]
    pub encodings: BTreeSet<ScriptEncoding>,
    #[serde(default)]
    pub required_ligatures: Vec<RequiredLigature>,
}

impl FontDescriptor {
    pub fn supports(&self, encoding: ScriptEncoding) -> bool {
        self.encodings.contains(&encoding)
    }
}
