//! Registry seed data
//!
//! The seed is the only place compatibility knowledge enters the engine.
//! Every pair carries the note of how it was verified; a pair without one
//! is rejected when the registry is built.

use serde::{Deserialize, Serialize};

use mushaf_core::error::MushafError;
use mushaf_core::script::{
    FontDescriptor, FontId, RequiredLigature, ScriptEncoding, ALLAH_LIGATURE, BASMALA_LIGATURE,
    BASMALA_SEQUENCE,
};

/// One font as the catalog describes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontEntry {
    pub id: FontId,
    pub family: String,
    pub file_name: String,
    pub license: String,
    pub can_subset: bool,
    #[serde(default)]
    pub required_ligatures: Vec<RequiredLigature>,
}

impl FontEntry {
    pub(crate) fn into_descriptor(self) -> FontDescriptor {
        FontDescriptor {
            id: self.id,
            family: self.family,
            file_name: self.file_name,
            license: self.license,
            can_subset: self.can_subset,
            encodings: Default::default(),
            required_ligatures: self.required_ligatures,
        }
    }
}

/// A font verified for an encoding, and how it was verified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedFont {
    pub font: FontId,
    pub verification: String,
}

/// Fonts for one encoding, recommended default first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSeed {
    pub encoding: ScriptEncoding,
    #[serde(default)]
    pub fonts: Vec<VerifiedFont>,
}

/// Fonts that serve a role independent of the body encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleFonts {
    /// Ayah numerals and hizb marks
    pub symbol: FontId,
    /// Surah headers
    pub header: FontId,
    /// Basmala ornament
    pub ornament: FontId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySeed {
    pub fonts: Vec<FontEntry>,
    pub pairs: Vec<PairSeed>,
    pub roles: RoleFonts,
}

impl RegistrySeed {
    pub fn from_json(json: &str) -> Result<Self, MushafError> {
        serde_json::from_str(json)
            .map_err(|e| MushafError::Config(format!("invalid registry seed: {}", e)))
    }

    /// The pairs verified for the shipped fonts
    pub fn builtin() -> Self {
        let allah = RequiredLigature::new("allah", "\u{0644}\u{0644}\u{0647}", Some(ALLAH_LIGATURE));
        let basmala = RequiredLigature::new("basmala", BASMALA_SEQUENCE, Some(BASMALA_LIGATURE));

        let fonts = vec![
            FontEntry {
                id: FontId::AmiriQuran,
                family: "Amiri Quran".into(),
                file_name: "AmiriQuran.ttf".into(),
                license: "SIL OFL 1.1".into(),
                can_subset: true,
                required_ligatures: vec![basmala, allah.clone()],
            },
            FontEntry {
                id: FontId::ScheherazadeNew,
                family: "Scheherazade New".into(),
                file_name: "ScheherazadeNew-Regular.ttf".into(),
                license: "SIL OFL 1.1".into(),
                can_subset: true,
                required_ligatures: vec![allah],
            },
            FontEntry {
                id: FontId::KfgqpcUthmanicHafs,
                family: "KFGQPC HAFS Uthmanic Script".into(),
                file_name: "UthmanicHafs_V22.ttf".into(),
                license: "KFGQPC".into(),
                can_subset: false,
                required_ligatures: Vec::new(),
            },
            FontEntry {
                id: FontId::MeQuran,
                family: "me_quran".into(),
                file_name: "me_quran_volt_newmet.ttf".into(),
                license: "Free".into(),
                can_subset: false,
                required_ligatures: Vec::new(),
            },
            FontEntry {
                id: FontId::NotoSansArabic,
                family: "Noto Sans Arabic".into(),
                file_name: "NotoSansArabic-Regular.ttf".into(),
                license: "SIL OFL 1.1".into(),
                can_subset: true,
                required_ligatures: Vec::new(),
            },
        ];

        let verified = |font: FontId, note: &str| VerifiedFont {
            font,
            verification: note.to_string(),
        };
        let full_text = "full mushaf rendered; sukun, small high marks and ligatures checked";

        let pairs = vec![
            PairSeed {
                encoding: ScriptEncoding::TextUthmani,
                fonts: vec![
                    verified(FontId::AmiriQuran, full_text),
                    verified(FontId::ScheherazadeNew, full_text),
                    verified(FontId::MeQuran, full_text),
                ],
            },
            PairSeed {
                encoding: ScriptEncoding::TextUthmaniSimple,
                fonts: vec![
                    verified(FontId::AmiriQuran, full_text),
                    verified(FontId::ScheherazadeNew, full_text),
                ],
            },
            PairSeed {
                encoding: ScriptEncoding::QpcUthmaniHafs,
                fonts: vec![
                    verified(FontId::KfgqpcUthmanicHafs, "reference font for the QPC encoding"),
                    verified(FontId::AmiriQuran, full_text),
                ],
            },
            PairSeed {
                encoding: ScriptEncoding::TextImlaei,
                fonts: vec![
                    verified(FontId::AmiriQuran, full_text),
                    verified(FontId::ScheherazadeNew, full_text),
                ],
            },
            PairSeed {
                encoding: ScriptEncoding::TextImlaeiSimple,
                fonts: vec![
                    verified(FontId::AmiriQuran, full_text),
                    verified(FontId::ScheherazadeNew, full_text),
                ],
            },
            // No font has been verified for IndoPak text yet
            PairSeed {
                encoding: ScriptEncoding::TextIndopak,
                fonts: Vec::new(),
            },
        ];

        Self {
            fonts,
            pairs,
            roles: RoleFonts {
                symbol: FontId::ScheherazadeNew,
                header: FontId::AmiriQuran,
                ornament: FontId::AmiriQuran,
            },
        }
    }
}
