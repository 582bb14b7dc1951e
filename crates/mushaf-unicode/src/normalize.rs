// this_file: crates/mushaf-unicode/src/normalize.rs

//! Feed records into the content tree

use std::collections::{BTreeMap, BTreeSet};

use icu_properties::{props::Script, CodePointMapData, CodePointMapDataBorrowed};
use mushaf_core::content::{
    Ayah, AyahKey, AyahRecord, Book, Footnote, Position, ScriptText, SourceFeed, Surah,
    Translation, Word, SURAH_COUNT,
};
use mushaf_core::error::NormalizeError;
use mushaf_core::script::ScriptEncoding;

use crate::translation;

pub const NBSP: char = '\u{00A0}';
pub const HAIR_SPACE: char = '\u{200A}';
pub const RUB_EL_HIZB: char = '\u{06DE}';
pub const SAJDAH: char = '\u{06E9}';

/// Scripture text after cleaning, plus what the cleaning discovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanScript {
    pub text: String,
    /// The raw text carried an inline rub-el-hizb mark
    pub hizb_marker: bool,
}

/// Builds the immutable content tree from the source feed
pub struct TextNormalizer {
    script_map: CodePointMapDataBorrowed<'static, Script>,
}

impl TextNormalizer {
    /// Create a normalizer with ICU data baked in
    pub fn new() -> Self {
        Self {
            script_map: CodePointMapData::<Script>::new(),
        }
    }

    /// Normalize a whole feed into a book
    ///
    /// Ayahs are grouped under their surah records and sorted by number.
    /// An ayah for a surah with no record, a surah number outside
    /// 1..=114, or the same ayah twice is an error.
    pub fn normalize_feed(&self, feed: &SourceFeed) -> Result<Book, NormalizeError> {
        let mut grouped: BTreeMap<u16, Vec<Ayah>> = BTreeMap::new();
        let mut seen: BTreeSet<AyahKey> = BTreeSet::new();

        for record in &feed.ayahs {
            if record.surah == 0 || record.surah > SURAH_COUNT {
                return Err(NormalizeError::UnknownSurah(record.surah));
            }
            let key = AyahKey::new(record.surah, record.ayah);
            if !seen.insert(key) {
                return Err(NormalizeError::DuplicateAyah {
                    surah: key.surah,
                    ayah: key.ayah,
                });
            }
            grouped
                .entry(record.surah)
                .or_default()
                .push(self.normalize(record)?);
        }

        let mut surahs = Vec::with_capacity(feed.surahs.len());
        for record in &feed.surahs {
            if record.number == 0 || record.number > SURAH_COUNT {
                return Err(NormalizeError::UnknownSurah(record.number));
            }
            let mut ayahs = grouped.remove(&record.number).unwrap_or_default();
            ayahs.sort_by_key(|a| a.key.ayah);
            surahs.push(Surah {
                number: record.number,
                name_arabic: collapse_whitespace(&record.name_arabic),
                name_simple: collapse_whitespace(&record.name_simple),
                name_translated: record.name_translated.as_deref().map(collapse_whitespace),
                revelation_place: record.revelation_place.clone(),
                ayahs,
            });
        }
        if let Some(orphan) = grouped.keys().next() {
            return Err(NormalizeError::UnknownSurah(*orphan));
        }
        surahs.sort_by_key(|s| s.number);

        let translators = feed
            .translators
            .iter()
            .map(|t| (t.id, t.clone()))
            .collect();

        let mut basmala: BTreeMap<ScriptEncoding, String> = BTreeMap::new();
        for (encoding, raw) in &feed.basmala {
            basmala.insert(*encoding, self.clean_script(raw, *encoding).text);
        }
        if let Some(opening) = surahs
            .first()
            .filter(|s| s.number == 1)
            .and_then(|s| s.ayahs.first())
        {
            for (encoding, script) in &opening.scripts {
                basmala
                    .entry(*encoding)
                    .or_insert_with(|| script.text.clone());
            }
        }

        let book = Book {
            surahs,
            translators,
            basmala,
        };
        log::info!(
            "Normalized {} surahs, {} ayahs",
            book.surahs.len(),
            book.ayah_count()
        );
        Ok(book)
    }

    /// Normalize one ayah record in every encoding it carries
    pub fn normalize(&self, record: &AyahRecord) -> Result<Ayah, NormalizeError> {
        let key = AyahKey::new(record.surah, record.ayah);
        let mut scripts = BTreeMap::new();
        let mut hizb_marker = false;

        for (encoding, raw) in &record.text_by_encoding {
            let (script, marker) = self.normalize_script(key, *encoding, raw)?;
            hizb_marker |= marker;
            scripts.insert(*encoding, script);
        }

        let translations: BTreeMap<_, Translation> = record
            .translations
            .iter()
            .map(|(id, raw)| (*id, translation::normalize(*id, raw)))
            .collect();

        let footnotes = record
            .footnotes
            .iter()
            .map(|note| Footnote {
                translator: note.translator,
                id: note.id,
                text: translation::clean_text(&note.text),
            })
            .collect();

        Ok(Ayah {
            key,
            scripts,
            translations,
            footnotes,
            position: Position {
                page: record.page,
                juz: record.juz,
                hizb: record.hizb,
                rub_el_hizb: record.rub_el_hizb,
                sajdah: record.sajdah.is_some(),
                hizb_marker,
            },
        })
    }

    /// Clean and tag one scripture text
    pub fn normalize_script(
        &self,
        key: AyahKey,
        encoding: ScriptEncoding,
        raw: &str,
    ) -> Result<(ScriptText, bool), NormalizeError> {
        let clean = self.clean_script(raw, encoding);
        if clean.text.is_empty() {
            return Err(NormalizeError::EmptyText {
                surah: key.surah,
                ayah: key.ayah,
                encoding,
            });
        }
        if !self.is_arabic(&clean.text) {
            return Err(NormalizeError::NotArabicScript {
                surah: key.surah,
                ayah: key.ayah,
                encoding,
            });
        }

        let words = clean
            .text
            .split(' ')
            .enumerate()
            .map(|(idx, word)| Word {
                position: (idx + 1) as u16,
                text: word.to_string(),
            })
            .collect();

        Ok((
            ScriptText {
                encoding,
                text: clean.text,
                words,
            },
            clean.hizb_marker,
        ))
    }

    /// Encoding-aware cleanup without validation
    pub fn clean_script(&self, raw: &str, encoding: ScriptEncoding) -> CleanScript {
        let mut text = strip_format_controls(raw);
        let mut hizb_marker = false;

        if encoding.is_qpc() {
            text = strip_trailing_ayah_number(&text).to_string();
            hizb_marker = text.contains(RUB_EL_HIZB);
            if hizb_marker {
                text = strip_rub_el_hizb(&text);
            }
        }

        let text = separate_sajdah(&collapse_whitespace(&text));
        CleanScript { text, hizb_marker }
    }

    /// Rasm skeleton of a raw scripture string.
    ///
    /// The string is cleaned for its encoding first, so QPC ayah numbers
    /// and hizb marks never reach the reduction.
    pub fn reduce_rasm(&self, raw: &str, encoding: ScriptEncoding) -> String {
        crate::rasm::reduce(&self.clean_script(raw, encoding).text)
    }

    /// Arabic letters present and no letters from any other script
    pub fn is_arabic(&self, text: &str) -> bool {
        let mut saw_arabic = false;
        for ch in text.chars() {
            match self.script_map.get(ch) {
                Script::Arabic => saw_arabic = true,
                Script::Common | Script::Inherited | Script::Unknown => {},
                _ => return false,
            }
        }
        saw_arabic
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop control and format characters that carry no rendering meaning
///
/// ZWJ and ZWNJ change joining and are kept. Line breaks and tabs become
/// spaces so whitespace canonicalization sees them.
pub fn strip_format_controls(text: &str) -> String {
    text.chars()
        .filter_map(|ch| match ch {
            '\n' | '\r' | '\t' => Some(' '),
            '\u{200C}' | '\u{200D}' => Some(ch),
            '\u{00AD}' | '\u{061C}' | '\u{180E}' | '\u{200B}' | '\u{200E}' | '\u{200F}'
            | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{2066}'..='\u{2069}'
            | '\u{FEFF}' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Collapse whitespace runs to one ASCII space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split(char::is_whitespace)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove a trailing `[NBSP or space][Arabic-Indic digits]` ayah number
pub fn strip_trailing_ayah_number(text: &str) -> &str {
    let digits_start = text
        .char_indices()
        .rev()
        .take_while(|(_, ch)| ('\u{0660}'..='\u{0669}').contains(ch))
        .last()
        .map(|(idx, _)| idx);

    match digits_start {
        Some(start) => {
            let head = &text[..start];
            match head.chars().next_back() {
                Some(sep @ (NBSP | ' ')) => &head[..head.len() - sep.len_utf8()],
                _ => text,
            }
        },
        None => text,
    }
}

/// Remove every rub-el-hizb mark and the NBSP that may follow it
pub fn strip_rub_el_hizb(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == RUB_EL_HIZB {
            if chars.peek() == Some(&NBSP) {
                chars.next();
            }
            continue;
        }
        out.push(ch);
    }
    out
}

/// Put a hair space after every sajdah sign that lacks one
pub fn separate_sajdah(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 3);
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        out.push(ch);
        if ch == SAJDAH && chars.peek() != Some(&HAIR_SPACE) {
            out.push(HAIR_SPACE);
        }
    }
    out
}
