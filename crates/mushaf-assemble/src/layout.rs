//! The walk over the book that emits blocks and notes

use std::collections::BTreeSet;

use mushaf_core::config::{BuildConfig, HeaderStyle, LayoutMode, Pagination};
use mushaf_core::content::{Ayah, BasmalaRule, Book, Surah, TranslationPiece, TranslatorId};
use mushaf_core::fragment::{
    AyahBlock, Block, DocumentFragment, FontAssignment, FragmentStyle, NoteFragment, NoteKind,
    Span, SpanKind,
};
use mushaf_core::script::{FontRole, BASMALA_LIGATURE};
use mushaf_unicode::arabic_indic;
use mushaf_unicode::normalize::RUB_EL_HIZB;

use crate::nav::PAGE_LABEL;
use crate::Diagnostic;

/// Language tag for translators the book has no metadata for
const UNDETERMINED: &str = "und";

/// Where something landed: fragment id plus anchor inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Landmark {
    pub number: u16,
    pub fragment: String,
    pub anchor: String,
}

impl Landmark {
    pub fn target(&self) -> String {
        format!("{}#{}", self.fragment, self.anchor)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Landmarks {
    pub surahs: Vec<Landmark>,
    pub juz: Vec<Landmark>,
    pub pages: Vec<Landmark>,
}

pub(crate) fn footnote_anchor(translator: TranslatorId, id: u32) -> String {
    format!("fn-{}-{}", translator, id)
}

pub(crate) fn popup_anchor(ayah: &Ayah) -> String {
    format!("popup-{}-{}", ayah.key.surah, ayah.key.ayah)
}

pub(crate) struct FragmentBuilder<'a> {
    book: &'a Book,
    config: &'a BuildConfig,
    fonts: FontAssignment,
    title: &'a str,
    fragments: Vec<DocumentFragment>,
    /// Footnotes already emitted into the current fragment
    seen_notes: BTreeSet<(TranslatorId, u32)>,
    prev_page: Option<u16>,
    prev_juz: Option<u8>,
    prev_quarter: Option<u8>,
    diagnostics: Vec<Diagnostic>,
    landmarks: Landmarks,
}

impl<'a> FragmentBuilder<'a> {
    pub fn new(
        book: &'a Book,
        config: &'a BuildConfig,
        fonts: FontAssignment,
        title: &'a str,
    ) -> Self {
        Self {
            book,
            config,
            fonts,
            title,
            fragments: Vec::new(),
            seen_notes: BTreeSet::new(),
            prev_page: None,
            prev_juz: None,
            prev_quarter: None,
            diagnostics: Vec::new(),
            landmarks: Landmarks::default(),
        }
    }

    pub fn finish(self) -> (Vec<DocumentFragment>, Vec<Diagnostic>, Landmarks) {
        (self.fragments, self.diagnostics, self.landmarks)
    }

    pub fn surah(&mut self, surah: &'a Surah) {
        let Some(first) = surah.ayahs.first() else {
            return;
        };

        self.enter(surah, first.position.page);
        self.page_marker(first.position.page);

        let landmark = self.landmark(surah.number, surah.anchor());
        self.landmarks.surahs.push(landmark);
        let header = self.header(surah);
        self.push_block(header);

        if self.config.cosmetics.show_basmala && surah.basmala_rule() == BasmalaRule::Preceding {
            self.push_block(Block::Basmala {
                surah: surah.number,
                spans: vec![Span::font(
                    FontRole::Ornament,
                    SpanKind::Text,
                    BASMALA_LIGATURE.to_string(),
                )],
            });
        }

        for ayah in &surah.ayahs {
            self.enter(surah, ayah.position.page);
            self.page_marker(ayah.position.page);

            if self.prev_juz != Some(ayah.position.juz) {
                self.prev_juz = Some(ayah.position.juz);
                let landmark = self.landmark(u16::from(ayah.position.juz), ayah.key.anchor());
                self.landmarks.juz.push(landmark);
            }

            let block = self.ayah(surah, ayah);
            self.push_block(Block::Ayah(block));
        }
    }

    /// Switch to the fragment `surah`/`page` belongs to, opening it if needed
    fn enter(&mut self, surah: &Surah, page: u16) {
        let (id, title) = match self.config.pagination() {
            Pagination::WholeBook => ("book".to_string(), self.title.to_string()),
            Pagination::PerSurah => (surah.anchor(), surah.name_arabic.clone()),
            Pagination::PerPage => (
                format!("page-{}", page),
                format!("{} {}", PAGE_LABEL, arabic_indic(u32::from(page))),
            ),
        };

        if self.fragments.last().is_some_and(|f| f.id == id) {
            return;
        }

        let cosmetics = &self.config.cosmetics;
        self.seen_notes.clear();
        self.fragments.push(DocumentFragment {
            id,
            title,
            script: self.config.script,
            rtl: true,
            linear: true,
            fonts: self.fonts,
            style: FragmentStyle {
                arabic_scale: cosmetics.arabic_scale,
                translation_scale: cosmetics.translation_scale,
                calligraphic_header: cosmetics.header_style == HeaderStyle::Calligraphic,
            },
            blocks: Vec::new(),
            notes: Vec::new(),
        });
    }

    fn fragment_id(&self) -> String {
        self.fragments
            .last()
            .map(|f| f.id.clone())
            .unwrap_or_default()
    }

    fn landmark(&self, number: u16, anchor: String) -> Landmark {
        Landmark {
            number,
            fragment: self.fragment_id(),
            anchor,
        }
    }

    fn push_block(&mut self, block: Block) {
        if let Some(fragment) = self.fragments.last_mut() {
            fragment.blocks.push(block);
        }
    }

    fn push_note(&mut self, note: NoteFragment) {
        if let Some(fragment) = self.fragments.last_mut() {
            fragment.notes.push(note);
        }
    }

    fn page_marker(&mut self, page: u16) {
        if self.prev_page == Some(page) {
            return;
        }
        self.prev_page = Some(page);

        let anchor = format!("page-{}", page);
        let landmark = self.landmark(page, anchor.clone());
        self.landmarks.pages.push(landmark);
        self.push_block(Block::PageMarker { page, anchor });
    }

    fn header(&self, surah: &Surah) -> Block {
        let mut spans = vec![Span::font(
            FontRole::Header,
            SpanKind::Text,
            surah.name_arabic.as_str(),
        )];
        if self.config.cosmetics.header_style == HeaderStyle::Calligraphic {
            spans.push(Span::translation(
                SpanKind::Text,
                surah.name_simple.as_str(),
                "en",
                false,
            ));
        }
        Block::SurahHeader {
            surah: surah.number,
            anchor: surah.anchor(),
            spans,
        }
    }

    /// Does this ayah open a rub-el-hizb?
    fn opens_quarter(&mut self, ayah: &Ayah) -> bool {
        let quarter = ayah.position.rub_el_hizb;
        let changed = self.prev_quarter.is_some_and(|prev| prev != quarter);
        self.prev_quarter = Some(quarter);
        ayah.position.hizb_marker || changed
    }

    fn ayah(&mut self, surah: &Surah, ayah: &'a Ayah) -> AyahBlock {
        let config: &'a BuildConfig = self.config;
        let mut spans = Vec::new();

        if self.opens_quarter(ayah) {
            spans.push(Span::font(
                FontRole::Symbol,
                SpanKind::Marker,
                RUB_EL_HIZB.to_string(),
            ));
        }

        // Al-Fatiha opens with the basmala as its first ayah
        let is_basmala = surah.basmala_rule() == BasmalaRule::FirstAyah && ayah.key.ayah == 1;
        if is_basmala && config.cosmetics.show_basmala {
            spans.push(Span::font(
                FontRole::Ornament,
                SpanKind::Text,
                BASMALA_LIGATURE.to_string(),
            ));
        } else {
            let text = ayah
                .script(config.script)
                .map(|s| s.text.as_str())
                .unwrap_or_default();
            spans.push(Span::font(FontRole::Body, SpanKind::Text, text));
        }

        let mut popup = None;
        match config.layout {
            LayoutMode::Inline => {
                self.push_number(&mut spans, ayah, None);
            },
            LayoutMode::Paired => {
                self.push_number(&mut spans, ayah, None);
                self.paired_translations(ayah, &mut spans);
            },
            LayoutMode::Interactive => {
                let anchor = self.popup(ayah);
                self.push_number(&mut spans, ayah, Some(&anchor));
                popup = Some(anchor);
            },
        }

        AyahBlock {
            key: ayah.key,
            anchor: ayah.key.anchor(),
            sajdah: ayah.position.sajdah,
            spans,
            popup,
        }
    }

    /// Ayah numeral in the symbol font; carries the popup link when there is one
    fn push_number(&self, spans: &mut Vec<Span>, ayah: &Ayah, link: Option<&str>) {
        if self.config.cosmetics.show_ayah_numbers {
            let mut number = Span::font(
                FontRole::Symbol,
                SpanKind::AyahNumber,
                arabic_indic(u32::from(ayah.key.ayah)),
            );
            if let Some(anchor) = link {
                number = number.with_link(anchor);
            }
            spans.push(number);
        } else if let Some(anchor) = link {
            // Without a numeral the scripture text itself opens the popup
            if let Some(body) = spans
                .iter_mut()
                .rev()
                .find(|s| s.kind == SpanKind::Text)
            {
                body.link = Some(anchor.to_string());
            }
        }
    }

    fn language(&self, translator: TranslatorId) -> &'a str {
        let book: &'a Book = self.book;
        book.translators
            .get(&translator)
            .map(|t| t.language.as_str())
            .unwrap_or(UNDETERMINED)
    }

    fn placeholder(&mut self, ayah: &Ayah, translator: TranslatorId) -> Span {
        log::warn!(
            "{}: no translation {} for ayah {}, inserting placeholder",
            self.config.id,
            translator,
            ayah.key
        );
        self.diagnostics.push(Diagnostic::MissingTranslation {
            key: ayah.key,
            translator,
        });
        Span::translation(
            SpanKind::Placeholder,
            self.config.cosmetics.untranslated_placeholder.as_str(),
            self.language(translator),
            false,
        )
    }

    fn paired_translations(&mut self, ayah: &'a Ayah, spans: &mut Vec<Span>) {
        let config: &'a BuildConfig = self.config;
        for &translator in &config.translations {
            let lang = self.language(translator);
            let Some(translation) = ayah.translations.get(&translator) else {
                let placeholder = self.placeholder(ayah, translator);
                spans.push(placeholder);
                continue;
            };

            for piece in &translation.pieces {
                match piece {
                    TranslationPiece::Text(text) => {
                        spans.push(Span::translation(
                            SpanKind::Text,
                            text.as_str(),
                            lang,
                            translation.rtl,
                        ));
                    },
                    TranslationPiece::NoteRef { id, marker } => {
                        let anchor = footnote_anchor(translator, *id);
                        spans.push(
                            Span::translation(SpanKind::NoteRef, marker.as_str(), lang, translation.rtl)
                                .with_link(anchor.as_str()),
                        );
                        self.footnote(ayah, translator, *id, marker, anchor, translation.rtl);
                    },
                }
            }
        }
    }

    /// Emit footnote `id` as a non-linear note, once per fragment
    fn footnote(
        &mut self,
        ayah: &Ayah,
        translator: TranslatorId,
        id: u32,
        marker: &str,
        anchor: String,
        rtl: bool,
    ) {
        if !self.seen_notes.insert((translator, id)) {
            return;
        }

        let text = match ayah.footnote(translator, id) {
            Some(note) => note.text.as_str(),
            None => {
                log::warn!(
                    "{}: footnote {} of translator {} referenced at {} has no text",
                    self.config.id,
                    id,
                    translator,
                    ayah.key
                );
                ""
            },
        };

        let lang = self.language(translator);
        let back_ref = ayah.key.anchor();
        self.push_note(NoteFragment {
            anchor,
            kind: NoteKind::Footnote,
            linear: false,
            back_ref: back_ref.clone(),
            spans: vec![
                Span::translation(SpanKind::NoteRef, marker, lang, rtl).with_link(back_ref),
                Span::translation(SpanKind::Text, text, lang, rtl),
            ],
        });
    }

    /// Build the popup note holding this ayah's translations
    ///
    /// Footnotes are folded into the popup itself: note references become
    /// plain markers and the note text follows the translation.
    fn popup(&mut self, ayah: &'a Ayah) -> String {
        let anchor = popup_anchor(ayah);
        let mut spans = Vec::new();

        let config: &'a BuildConfig = self.config;
        for &translator in &config.translations {
            let lang = self.language(translator);
            let Some(translation) = ayah.translations.get(&translator) else {
                let placeholder = self.placeholder(ayah, translator);
                spans.push(placeholder);
                continue;
            };

            let mut notes = Vec::new();
            for piece in &translation.pieces {
                match piece {
                    TranslationPiece::Text(text) => {
                        spans.push(Span::translation(
                            SpanKind::Text,
                            text.as_str(),
                            lang,
                            translation.rtl,
                        ));
                    },
                    TranslationPiece::NoteRef { id, marker } => {
                        spans.push(Span::translation(
                            SpanKind::NoteRef,
                            marker.as_str(),
                            lang,
                            translation.rtl,
                        ));
                        notes.push((*id, marker.as_str()));
                    },
                }
            }

            for (id, marker) in notes {
                let text = ayah
                    .footnote(translator, id)
                    .map(|note| note.text.as_str())
                    .unwrap_or_default();
                spans.push(Span::translation(SpanKind::NoteRef, marker, lang, translation.rtl));
                spans.push(Span::translation(SpanKind::Text, text, lang, translation.rtl));
            }
        }

        self.push_note(NoteFragment {
            anchor: anchor.clone(),
            kind: NoteKind::Popup,
            linear: false,
            back_ref: ayah.key.anchor(),
            spans,
        });
        anchor
    }
}
