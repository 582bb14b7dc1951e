//! Build configuration: one `BuildConfig` is one output variant

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::TranslatorId;
use crate::error::AssemblyError;
use crate::script::{FontId, ScriptEncoding};

/// Identity of a variant; reports are sorted by it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub String);

impl VariantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Scripture only, one continuous flow
    Inline,
    /// Each ayah followed by its translation
    Paired,
    /// Scripture body with translations as popups
    Interactive,
}

impl LayoutMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Paired => "paired",
            Self::Interactive => "interactive",
        }
    }

    fn default_pagination(&self) -> Pagination {
        match self {
            Self::Inline => Pagination::WholeBook,
            Self::Paired | Self::Interactive => Pagination::PerSurah,
        }
    }

    fn allows(&self, pagination: Pagination) -> bool {
        match self {
            Self::Inline => matches!(pagination, Pagination::WholeBook | Pagination::PerSurah),
            Self::Paired => true,
            Self::Interactive => pagination == Pagination::PerSurah,
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fragment granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pagination {
    WholeBook,
    PerSurah,
    PerPage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// Arabic name in the header font, transliterated name beneath
    #[default]
    Calligraphic,
    /// Arabic name only
    Plain,
}

/// Presentation knobs that do not change content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cosmetics {
    /// Arabic text size relative to the reader's base size, in percent
    pub arabic_scale: u16,
    pub translation_scale: u16,
    pub header_style: HeaderStyle,
    pub show_ayah_numbers: bool,
    pub show_basmala: bool,
    pub untranslated_placeholder: String,
}

impl Default for Cosmetics {
    fn default() -> Self {
        Self {
            arabic_scale: 150,
            translation_scale: 100,
            header_style: HeaderStyle::default(),
            show_ayah_numbers: true,
            show_basmala: true,
            untranslated_placeholder: "[untranslated]".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub id: VariantId,
    pub script: ScriptEncoding,
    /// Body font; the registry default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontId>,
    #[serde(default)]
    pub translations: Vec<TranslatorId>,
    pub layout: LayoutMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub cosmetics: Cosmetics,
}

impl BuildConfig {
    pub fn new(id: impl Into<String>, script: ScriptEncoding, layout: LayoutMode) -> Self {
        Self {
            id: VariantId::new(id),
            script,
            font: None,
            translations: Vec::new(),
            layout,
            pagination: None,
            cosmetics: Cosmetics::default(),
        }
    }

    pub fn with_font(mut self, font: FontId) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_translation(mut self, translator: TranslatorId) -> Self {
        self.translations.push(translator);
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
            .unwrap_or_else(|| self.layout.default_pagination())
    }

    /// Check the layout-dependent shape of the config
    pub fn validate(&self) -> Result<(), AssemblyError> {
        if self.id.as_str().trim().is_empty() {
            return Err(AssemblyError::InvalidConfig(
                "variant id must not be empty".to_string(),
            ));
        }

        let pagination = self.pagination();
        if !self.layout.allows(pagination) {
            return Err(AssemblyError::InvalidConfig(format!(
                "{} layout does not support {:?} pagination",
                self.layout, pagination
            )));
        }

        match self.layout {
            LayoutMode::Inline if !self.translations.is_empty() => {
                Err(AssemblyError::InvalidConfig(
                    "inline layout carries no translations".to_string(),
                ))
            },
            LayoutMode::Paired | LayoutMode::Interactive if self.translations.is_empty() => {
                Err(AssemblyError::InvalidConfig(format!(
                    "{} layout needs at least one translation",
                    self.layout
                )))
            },
            _ => Ok(()),
        }
    }
}
