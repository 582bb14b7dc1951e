//! Navigation model: table of contents, juz index and page list

use mushaf_core::content::Book;
use mushaf_core::fragment::{NavModel, NavPoint};
use mushaf_core::script::ScriptEncoding;
use mushaf_unicode::arabic_indic;

use crate::layout::Landmarks;

/// "The Noble Quran"
pub const BOOK_TITLE: &str = "القرآن الكريم";

/// Label placed before a juz numeral
pub const JUZ_LABEL: &str = "جزء";

/// Label placed before a page numeral in per-page fragment titles
pub const PAGE_LABEL: &str = "صفحة";

/// Subtitle naming the script and the riwayah it transcribes
pub fn subtitle(script: ScriptEncoding) -> String {
    let (_, label) = script.label();
    let riwayah = script.riwayah().arabic();
    if label.contains(riwayah) {
        label.to_string()
    } else {
        format!("{} - رواية {}", label, riwayah)
    }
}

pub(crate) fn build(
    title: &str,
    script: ScriptEncoding,
    book: &Book,
    landmarks: &Landmarks,
) -> NavModel {
    let toc = landmarks
        .surahs
        .iter()
        .map(|mark| {
            let label = book
                .surah(mark.number)
                .map(|s| format!("{} {}", arabic_indic(u32::from(s.number)), s.name_arabic))
                .unwrap_or_else(|| arabic_indic(u32::from(mark.number)));
            NavPoint {
                label,
                target: mark.target(),
            }
        })
        .collect();

    let juz = landmarks
        .juz
        .iter()
        .map(|mark| NavPoint {
            label: format!("{} {}", JUZ_LABEL, arabic_indic(u32::from(mark.number))),
            target: mark.target(),
        })
        .collect();

    let page_list = landmarks
        .pages
        .iter()
        .map(|mark| NavPoint {
            label: mark.number.to_string(),
            target: mark.target(),
        })
        .collect();

    NavModel {
        title: title.to_string(),
        subtitle: subtitle(script),
        toc,
        juz,
        page_list,
    }
}
