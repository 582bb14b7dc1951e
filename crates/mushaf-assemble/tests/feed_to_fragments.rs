//! Feed JSON through the normalizer and into every layout

use mushaf_assemble::{Assembler, Diagnostic};
use mushaf_core::config::{BuildConfig, LayoutMode, Pagination};
use mushaf_core::content::{AyahKey, Book, SourceFeed, TranslatorId};
use mushaf_core::fragment::{FontAssignment, SpanKind};
use mushaf_core::script::{FontId, ScriptEncoding};
use mushaf_unicode::TextNormalizer;
use proptest::prelude::*;

const FEED: &str = r#"{
    "surahs": [
        {"number": 1, "name_arabic": "الفاتحة", "name_simple": "Al-Fatihah"},
        {"number": 2, "name_arabic": "البقرة", "name_simple": "Al-Baqarah"}
    ],
    "translators": [{"id": 20, "name": "Saheeh International", "language": "en"}],
    "ayahs": [
        {"surah": 1, "ayah": 1, "page": 1, "juz": 1, "hizb": 1, "rub_el_hizb": 1,
         "text_by_encoding": {"qpc_uthmani_hafs": "بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ ١"},
         "translations": {"20": "In the name of Allah, the Entirely Merciful, the Especially Merciful."}},
        {"surah": 1, "ayah": 2, "page": 1, "juz": 1, "hizb": 1, "rub_el_hizb": 1,
         "text_by_encoding": {"qpc_uthmani_hafs": "ٱلْحَمْدُ لِلَّهِ رَبِّ ٱلْعَٰلَمِينَ ٢"},
         "translations": {"20": "[All] praise is [due] to Allah, Lord of the worlds"}},
        {"surah": 2, "ayah": 1, "page": 2, "juz": 1, "hizb": 1, "rub_el_hizb": 1,
         "text_by_encoding": {"qpc_uthmani_hafs": "الٓمٓ ١"},
         "translations": {"20": "Alif, Lam, Meem.<sup foot_note=1>1</sup>"},
         "footnotes": [{"translator": 20, "id": 1, "text": "See the introduction."}]},
        {"surah": 2, "ayah": 2, "page": 2, "juz": 1, "hizb": 1, "rub_el_hizb": 1,
         "text_by_encoding": {"qpc_uthmani_hafs": "ذَٰلِكَ ٱلْكِتَٰبُ لَا رَيْبَ ۛ فِيهِ ۛ هُدًى لِّلْمُتَّقِينَ ٢"}}
    ]
}"#;

fn book() -> Book {
    let feed: SourceFeed = serde_json::from_str(FEED).unwrap();
    TextNormalizer::new().normalize_feed(&feed).unwrap()
}

fn fonts() -> FontAssignment {
    FontAssignment {
        body: FontId::KfgqpcUthmanicHafs,
        symbol: FontId::ScheherazadeNew,
        header: FontId::AmiriQuran,
        ornament: FontId::AmiriQuran,
    }
}

#[test]
fn qpc_numbers_never_reach_the_body() {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = BuildConfig::new("qpc", ScriptEncoding::QpcUthmaniHafs, LayoutMode::Inline);
    let assembly = Assembler::new().assemble(&book(), &config, fonts()).unwrap();

    let fragment = &assembly.fragments[0];
    assert!(fragment
        .spans_for_font(FontId::KfgqpcUthmanicHafs)
        .all(|s| !s.text.chars().any(|c| ('\u{0660}'..='\u{0669}').contains(&c))));
    let numbers: Vec<_> = fragment
        .spans_for_font(FontId::ScheherazadeNew)
        .filter(|s| s.kind == SpanKind::AyahNumber)
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(numbers, vec!["١", "٢", "١", "٢"]);
}

#[test]
fn paired_layout_reports_the_untranslated_ayah() {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = BuildConfig::new("paired", ScriptEncoding::QpcUthmaniHafs, LayoutMode::Paired)
        .with_translation(TranslatorId(20))
        .with_pagination(Pagination::PerPage);
    let assembly = Assembler::new().assemble(&book(), &config, fonts()).unwrap();

    assert_eq!(assembly.fragments.len(), 2);
    assert_eq!(
        assembly.diagnostics,
        vec![Diagnostic::MissingTranslation {
            key: AyahKey::new(2, 2),
            translator: TranslatorId(20),
        }]
    );
    let page_two = &assembly.fragments[1];
    assert_eq!(page_two.ayahs().count(), 2);
    assert_eq!(page_two.notes.len(), 1);
    assert_eq!(page_two.notes[0].anchor, "fn-20-1");
}

#[test]
fn fragments_serialize_for_the_packager() {
    let config = BuildConfig::new("interactive", ScriptEncoding::QpcUthmaniHafs, LayoutMode::Interactive)
        .with_translation(TranslatorId(20));
    let assembly = Assembler::new().assemble(&book(), &config, fonts()).unwrap();
    let json = serde_json::to_value(&assembly.fragments).unwrap();
    assert_eq!(json[1]["id"], "surah-2");
    assert_eq!(json[1]["notes"][0]["kind"], "popup");
    assert_eq!(json[1]["notes"][0]["linear"], false);
}

proptest! {
    // Whatever translations are missing, every ayah is still emitted once
    #[test]
    fn placeholder_preserves_ayah_count(missing in proptest::collection::vec(any::<bool>(), 4)) {
        let mut book = book();
        let mut expected = 0;
        for (ayah, drop) in book.surahs.iter_mut().flat_map(|s| s.ayahs.iter_mut()).zip(&missing) {
            if *drop || !ayah.translations.contains_key(&TranslatorId(20)) {
                ayah.translations.clear();
                expected += 1;
            }
        }

        let config = BuildConfig::new("paired", ScriptEncoding::QpcUthmaniHafs, LayoutMode::Paired)
            .with_translation(TranslatorId(20));
        let assembly = Assembler::new().assemble(&book, &config, fonts()).unwrap();

        let emitted: usize = assembly.fragments.iter().map(|f| f.ayahs().count()).sum();
        prop_assert_eq!(emitted, 4);
        prop_assert_eq!(assembly.placeholder_count(), expected);
    }
}
