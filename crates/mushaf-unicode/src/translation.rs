// this_file: crates/mushaf-unicode/src/translation.rs

//! Translation text: NFC, whitespace, footnote markers, direction

use mushaf_core::content::{Translation, TranslationPiece, TranslatorId};
use unicode_bidi::BidiInfo;
use unicode_normalization::UnicodeNormalization;

use crate::normalize::{collapse_whitespace, strip_format_controls};

/// Normalize one raw translation string
pub fn normalize(translator: TranslatorId, raw: &str) -> Translation {
    let text = clean_text(raw);
    let rtl = is_rtl(&text);
    Translation {
        translator,
        pieces: parse_pieces(&text),
        rtl,
    }
}

/// NFC, control stripping and whitespace canonicalization
///
/// Only translations go through NFC. Scripture encodings order their
/// marks deliberately and composing them changes what the font draws.
pub fn clean_text(raw: &str) -> String {
    let composed: String = raw.nfc().collect();
    collapse_whitespace(&strip_format_controls(&composed))
}

/// Base direction of the first paragraph
pub fn is_rtl(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let bidi = BidiInfo::new(text, None);
    bidi.paragraphs
        .first()
        .map(|p| p.level.is_rtl())
        .unwrap_or(false)
}

/// Split text at `<sup foot_note=ID>N</sup>` markers
///
/// The attribute value may be quoted. Anything that does not parse as a
/// marker stays in the surrounding text.
pub fn parse_pieces(text: &str) -> Vec<TranslationPiece> {
    let mut pieces = Vec::new();
    let mut pending = String::new();
    let mut rest = text;

    while let Some(start) = rest.find("<sup") {
        match parse_marker(&rest[start..]) {
            Some((id, marker, consumed)) => {
                pending.push_str(&rest[..start]);
                if !pending.is_empty() {
                    pieces.push(TranslationPiece::Text(std::mem::take(&mut pending)));
                }
                pieces.push(TranslationPiece::NoteRef { id, marker });
                rest = &rest[start + consumed..];
            },
            None => {
                let skip = start + "<sup".len();
                pending.push_str(&rest[..skip]);
                rest = &rest[skip..];
            },
        }
    }

    pending.push_str(rest);
    if !pending.is_empty() {
        pieces.push(TranslationPiece::Text(pending));
    }
    pieces
}

/// Parse one marker at the start of `s`; returns (id, marker, bytes consumed)
fn parse_marker(s: &str) -> Option<(u32, String, usize)> {
    let mut cursor = s.strip_prefix("<sup")?;
    let trimmed = cursor.trim_start();
    if trimmed.len() == cursor.len() {
        return None;
    }
    cursor = trimmed.strip_prefix("foot_note=")?;

    let quote = cursor.chars().next().filter(|c| *c == '"' || *c == '\'');
    if let Some(q) = quote {
        cursor = &cursor[q.len_utf8()..];
    }
    let (id, after) = take_digits(cursor)?;
    cursor = after;
    if let Some(q) = quote {
        cursor = cursor.strip_prefix(q)?;
    }
    cursor = cursor.trim_start().strip_prefix('>')?;

    let (marker, after) = take_digits(cursor)?;
    cursor = after.strip_prefix("</sup>")?;

    let id = id.parse().ok()?;
    Some((id, marker.to_string(), s.len() - cursor.len()))
}

fn take_digits(s: &str) -> Option<(&str, &str)> {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(s.len());
    if end == 0 {
        None
    } else {
        Some(s.split_at(end))
    }
}
