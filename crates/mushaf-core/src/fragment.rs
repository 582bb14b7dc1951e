//! Assembled output: document fragments and the navigation model
//!
//! A fragment is the unit the packager turns into one content document.
//! Every span names the role that renders it, and the fragment's
//! [`FontAssignment`] maps roles to fonts, so the subsetter can compute
//! per-font codepoint sets without re-reading the content tree.

use serde::{Deserialize, Serialize};

use crate::content::AyahKey;
use crate::script::{FontId, FontRole, ScriptEncoding};

/// Which font renders each role in a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontAssignment {
    pub body: FontId,
    pub symbol: FontId,
    pub header: FontId,
    pub ornament: FontId,
}

impl FontAssignment {
    pub fn font_for(&self, role: FontRole) -> FontId {
        match role {
            FontRole::Body => self.body,
            FontRole::Symbol => self.symbol,
            FontRole::Header => self.header,
            FontRole::Ornament => self.ornament,
        }
    }

    /// Distinct fonts in role order
    pub fn fonts(&self) -> Vec<FontId> {
        let mut fonts = Vec::with_capacity(4);
        for font in [self.body, self.symbol, self.header, self.ornament] {
            if !fonts.contains(&font) {
                fonts.push(font);
            }
        }
        fonts
    }
}

/// What renders a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanRole {
    Font(FontRole),
    /// Translation text, set in the reader's own font
    Translation,
}

impl SpanRole {
    pub fn font_role(&self) -> Option<FontRole> {
        match self {
            Self::Font(role) => Some(*role),
            Self::Translation => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    Text,
    AyahNumber,
    /// Superscript reference to a note fragment
    NoteRef,
    /// Stands in for a missing translation
    Placeholder,
    /// Hizb-quarter or sajdah mark
    Marker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub role: SpanRole,
    pub kind: SpanKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    pub rtl: bool,
    /// Target anchor for note references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Span {
    pub fn new(role: SpanRole, kind: SpanKind, text: impl Into<String>) -> Self {
        let rtl = !matches!(role, SpanRole::Translation);
        Self {
            role,
            kind,
            text: text.into(),
            lang: None,
            rtl,
            link: None,
        }
    }

    pub fn font(role: FontRole, kind: SpanKind, text: impl Into<String>) -> Self {
        Self::new(SpanRole::Font(role), kind, text).with_lang("ar")
    }

    pub fn translation(kind: SpanKind, text: impl Into<String>, lang: &str, rtl: bool) -> Self {
        let mut span = Self::new(SpanRole::Translation, kind, text).with_lang(lang);
        span.rtl = rtl;
        span
    }

    pub fn with_lang(mut self, lang: &str) -> Self {
        self.lang = Some(lang.to_string());
        self
    }

    pub fn with_link(mut self, anchor: impl Into<String>) -> Self {
        self.link = Some(anchor.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AyahBlock {
    pub key: AyahKey,
    pub anchor: String,
    pub sajdah: bool,
    pub spans: Vec<Span>,
    /// Anchor of the popup note holding this ayah's translation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    SurahHeader {
        surah: u16,
        anchor: String,
        spans: Vec<Span>,
    },
    Basmala {
        surah: u16,
        spans: Vec<Span>,
    },
    PageMarker {
        page: u16,
        anchor: String,
    },
    Ayah(AyahBlock),
}

impl Block {
    pub fn spans(&self) -> &[Span] {
        match self {
            Self::SurahHeader { spans, .. } | Self::Basmala { spans, .. } => spans,
            Self::Ayah(ayah) => &ayah.spans,
            Self::PageMarker { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    /// Translator footnote, cross-linked from a note reference
    Footnote,
    /// Out-of-band translation shown on activation
    Popup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFragment {
    pub anchor: String,
    pub kind: NoteKind,
    /// Always false: notes sit outside the linear reading order
    pub linear: bool,
    /// Anchor of the span that references this note
    pub back_ref: String,
    pub spans: Vec<Span>,
}

/// Relative sizes and flags the packager turns into a stylesheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentStyle {
    pub arabic_scale: u16,
    pub translation_scale: u16,
    pub calligraphic_header: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentFragment {
    /// "book", "surah-N" or "page-P"
    pub id: String,
    pub title: String,
    pub script: ScriptEncoding,
    pub rtl: bool,
    pub linear: bool,
    pub fonts: FontAssignment,
    pub style: FragmentStyle,
    pub blocks: Vec<Block>,
    pub notes: Vec<NoteFragment>,
}

impl DocumentFragment {
    /// Id of the container the packager places notes in
    pub fn notes_id(&self) -> String {
        format!("{}-notes", self.id)
    }

    /// Every span in the fragment, body first then notes
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.blocks
            .iter()
            .flat_map(|block| block.spans().iter())
            .chain(self.notes.iter().flat_map(|note| note.spans.iter()))
    }

    pub fn ayahs(&self) -> impl Iterator<Item = &AyahBlock> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Ayah(ayah) => Some(ayah),
            _ => None,
        })
    }

    /// Spans rendered by `font` under this fragment's assignment
    pub fn spans_for_font(&self, font: FontId) -> impl Iterator<Item = &Span> {
        let fonts = self.fonts;
        self.spans().filter(move |span| {
            span.role
                .font_role()
                .is_some_and(|role| fonts.font_for(role) == font)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavPoint {
    pub label: String,
    /// "fragment-id#anchor"
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavModel {
    pub title: String,
    pub subtitle: String,
    pub toc: Vec<NavPoint>,
    pub juz: Vec<NavPoint>,
    pub page_list: Vec<NavPoint>,
}
