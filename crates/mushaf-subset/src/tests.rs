// this_file: crates/mushaf-subset/src/tests.rs

use std::collections::{BTreeMap, BTreeSet};

use super::*;
use mushaf_core::content::AyahKey;
use mushaf_core::fragment::{AyahBlock, Block, FontAssignment, FragmentStyle, Span, SpanKind};
use mushaf_core::script::{
    FontId, FontRole, RequiredLigature, ScriptEncoding, ALLAH_LIGATURE, BASMALA_LIGATURE,
    BASMALA_SEQUENCE,
};
use mushaf_core::glyph::MinimizedFont;
use mushaf_core::types::GlyphId;
use mushaf_fontdb::Font;
use read_fonts::{FontRef, TableProvider};
use write_fonts::tables::cmap::Cmap;
use write_fonts::tables::gsub::{
    Gsub, Ligature, LigatureSet, LigatureSubstFormat1, SubstitutionLookupList,
};
use write_fonts::tables::layout::{FeatureList, Lookup, LookupFlag, ScriptList};
use write_fonts::types::{GlyphId as WriteGlyphId, GlyphId16, Tag};
use write_fonts::FontBuilder;

use crate::binary;

pub(crate) const BEH: char = '\u{0628}';
pub(crate) const SEEN: char = '\u{0633}';
const MEEM: char = '\u{0645}';
/// beh + seen ligature, reachable only through GSUB
pub(crate) const LIGATURE_GID: GlyphId = 4;
/// Component of the ligature glyph, reachable only through `glyf`
pub(crate) const PART_GID: GlyphId = 5;

/// Synthetic font mapping a fixed character set to consecutive glyphs
pub(crate) struct MockFont {
    cmap: BTreeMap<char, GlyphId>,
}

impl MockFont {
    pub(crate) fn covering(chars: impl IntoIterator<Item = char>) -> Self {
        let cmap = chars
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .zip(1..)
            .collect();
        Self { cmap }
    }
}

impl FontProgram for MockFont {
    fn data(&self) -> &[u8] {
        &[]
    }

    fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.cmap.get(&ch).copied()
    }

    fn glyph_count(&self) -> Option<u32> {
        Some(self.cmap.len() as u32 + 1)
    }
}

/// One-point outline, padded to an even length for a short `loca`
fn simple_glyph(x_max: i16) -> Vec<u8> {
    let mut glyph = Vec::new();
    for value in [1i16, 0, 0, x_max, 100] {
        glyph.extend_from_slice(&value.to_be_bytes());
    }
    glyph.extend_from_slice(&[0, 0, 0, 0]); // end point 0, no instructions
    glyph.extend_from_slice(&[0x37, 10, 10, 0]);
    glyph
}

fn composite_glyph(component: u16) -> Vec<u8> {
    let mut glyph = Vec::new();
    for value in [-1i16, 0, 0, 105, 100] {
        glyph.extend_from_slice(&value.to_be_bytes());
    }
    // ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES, no more components
    glyph.extend_from_slice(&0x0003u16.to_be_bytes());
    glyph.extend_from_slice(&component.to_be_bytes());
    glyph.extend_from_slice(&[0, 0, 0, 0]);
    glyph
}

fn head_table(index_to_loc_format: i16) -> Vec<u8> {
    let mut head = Vec::new();
    head.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
    head.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // fontRevision
    head.extend_from_slice(&0u32.to_be_bytes()); // checksumAdjustment
    head.extend_from_slice(&0x5F0F_3CF5u32.to_be_bytes()); // magic
    head.extend_from_slice(&0u16.to_be_bytes()); // flags
    head.extend_from_slice(&1000u16.to_be_bytes()); // unitsPerEm
    head.extend_from_slice(&[0; 16]); // created, modified
    for value in [0i16, 0, 106, 100] {
        head.extend_from_slice(&value.to_be_bytes());
    }
    head.extend_from_slice(&[0, 0, 0, 8]); // macStyle, lowestRecPPEM
    head.extend_from_slice(&2i16.to_be_bytes());
    head.extend_from_slice(&index_to_loc_format.to_be_bytes());
    head.extend_from_slice(&0i16.to_be_bytes());
    head
}

/// A small TrueType font
///
/// Glyphs: 0 .notdef, 1 beh, 2 seen, 3 meem, 4 the beh-seen ligature (a
/// composite of 5), 5 a ligature part, 6 'x'. The outlines use a short
/// `loca` so the subset has to rewrite it.
pub(crate) fn synthetic_font_bytes() -> Vec<u8> {
    let outlines = [
        simple_glyph(100),
        simple_glyph(101),
        simple_glyph(102),
        simple_glyph(103),
        composite_glyph(PART_GID as u16),
        simple_glyph(105),
        simple_glyph(106),
    ];
    let mut glyf = Vec::new();
    let mut loca = Vec::new();
    for outline in &outlines {
        loca.extend_from_slice(&((glyf.len() / 2) as u16).to_be_bytes());
        glyf.extend_from_slice(outline);
    }
    loca.extend_from_slice(&((glyf.len() / 2) as u16).to_be_bytes());

    let mut maxp = 0x0000_5000u32.to_be_bytes().to_vec();
    maxp.extend_from_slice(&(outlines.len() as u16).to_be_bytes());

    let cmap = Cmap::from_mappings([
        (BEH, WriteGlyphId::new(1)),
        (SEEN, WriteGlyphId::new(2)),
        (MEEM, WriteGlyphId::new(3)),
        ('x', WriteGlyphId::new(6)),
    ])
    .unwrap();

    let ligature = LigatureSubstFormat1::new(
        vec![GlyphId16::new(1)].into(),
        vec![LigatureSet::new(vec![Ligature::new(
            GlyphId16::new(LIGATURE_GID as u16),
            vec![GlyphId16::new(2)],
        )])],
    );
    let gsub = Gsub::new(
        ScriptList::new(Vec::new()),
        FeatureList::new(Vec::new()),
        SubstitutionLookupList::new(vec![Lookup::new(LookupFlag::empty(), vec![ligature]).into()]),
    );

    let mut builder = FontBuilder::new();
    builder.add_table(&cmap).unwrap();
    builder.add_table(&gsub).unwrap();
    builder
        .add_raw(Tag::new(b"head"), head_table(0))
        .add_raw(Tag::new(b"maxp"), maxp)
        .add_raw(Tag::new(b"loca"), loca)
        .add_raw(Tag::new(b"glyf"), glyf);
    builder.build()
}

pub(crate) fn synthetic_font() -> Font {
    Font::from_data(synthetic_font_bytes()).unwrap()
}

fn beh_seen(font: FontId) -> GlyphClosure {
    let mut closure = GlyphClosure::new(font);
    closure.codepoints.extend([BEH, SEEN]);
    closure
}

/// Not a font at all
struct Garbage;

impl FontProgram for Garbage {
    fn data(&self) -> &[u8] {
        b"definitely not an sfnt"
    }

    fn glyph_id(&self, _ch: char) -> Option<GlyphId> {
        Some(1)
    }
}

pub(crate) fn descriptor(id: FontId, can_subset: bool) -> FontDescriptor {
    FontDescriptor {
        id,
        family: id.to_string(),
        file_name: format!("{}.ttf", id),
        license: if can_subset { "SIL OFL 1.1" } else { "Proprietary" }.to_string(),
        can_subset,
        encodings: BTreeSet::new(),
        required_ligatures: vec![
            RequiredLigature::new("basmala", BASMALA_SEQUENCE, Some(BASMALA_LIGATURE)),
            RequiredLigature::new("allah", "\u{0644}\u{0644}\u{0647}", Some(ALLAH_LIGATURE)),
        ],
    }
}

pub(crate) fn fragment(id: &str, body: &str, number: &str) -> DocumentFragment {
    DocumentFragment {
        id: id.to_string(),
        title: String::new(),
        script: ScriptEncoding::TextUthmani,
        rtl: true,
        linear: true,
        fonts: FontAssignment {
            body: FontId::AmiriQuran,
            symbol: FontId::ScheherazadeNew,
            header: FontId::AmiriQuran,
            ornament: FontId::AmiriQuran,
        },
        style: FragmentStyle {
            arabic_scale: 150,
            translation_scale: 100,
            calligraphic_header: true,
        },
        blocks: vec![Block::Ayah(AyahBlock {
            key: AyahKey::new(2, 1),
            anchor: "ayah-2-1".into(),
            sajdah: false,
            spans: vec![
                Span::font(FontRole::Body, SpanKind::Text, body),
                Span::font(FontRole::Symbol, SpanKind::AyahNumber, number),
                Span::translation(SpanKind::Text, "Alif, Lam, Meem", "en", false),
            ],
            popup: None,
        })],
        notes: Vec::new(),
    }
}

#[test]
fn test_closure_collects_only_this_fonts_spans() {
    let fragments = [fragment("surah-2", "الٓمٓ", "١")];
    let body = closure(&descriptor(FontId::AmiriQuran, true), &fragments);
    assert!(body.contains('\u{0627}'));
    assert!(!body.contains('١'));
    assert!(!body.contains('A'));

    let symbol = closure(&descriptor(FontId::ScheherazadeNew, true), &fragments);
    assert_eq!(symbol.codepoints, BTreeSet::from(['١']));
    assert!(symbol.ligatures.is_empty());
}

#[test]
fn test_closure_expands_basmala_ligature() {
    // Only the precomposed ligature appears in the text
    let fragments = [fragment("surah-2", "\u{FDFD}", "١")];
    let closure = closure(&descriptor(FontId::AmiriQuran, true), &fragments);

    for ch in BASMALA_SEQUENCE.chars() {
        assert!(closure.contains(ch), "missing U+{:04X}", u32::from(ch));
    }
    // The basmala letters contain lam-lam-heh, which pulls in the Allah ligature
    assert!(closure.contains(ALLAH_LIGATURE));
    let names: Vec<_> = closure.ligatures.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["basmala", "allah"]);
}

#[test]
fn test_closure_skips_invisible_controls() {
    let fragments = [fragment("surah-2", "ب\u{200F}ت\u{FEFF}", "١")];
    let closure = closure(&descriptor(FontId::NotoSansArabic, true), &fragments);
    assert!(closure.is_empty());

    let mut plain = descriptor(FontId::AmiriQuran, true);
    plain.required_ligatures.clear();
    let closure = super::closure(&plain, &fragments);
    assert_eq!(closure.codepoints, BTreeSet::from(['ب', 'ت']));
}

#[test]
fn test_subset_keeps_notdef_and_closure() {
    let fragments = [fragment("surah-2", "الٓمٓ", "١")];
    let desc = descriptor(FontId::AmiriQuran, true);
    let closure = closure(&desc, &fragments);
    let font = MockFont::covering(closure.codepoints.iter().copied().chain("xyz".chars()));

    let resource = plan(&desc, &font, &closure).unwrap();
    let FontResource::Subset(min) = &resource else {
        panic!("expected a subset");
    };
    assert!(min.glyphs.contains(&0));
    assert_eq!(min.cmap.len(), closure.len());
    assert_eq!(min.glyphs.len(), closure.len() + 1);
    assert!(!min.cmap.contains_key(&'x'));
    assert_eq!(min.closure_hash, closure.hash_key());
    assert!(closure.codepoints.iter().all(|ch| min.resolves(*ch)));
}

#[test]
fn test_missing_glyph_is_a_violation() {
    let _ = env_logger::builder().is_test(true).try_init();
    let fragments = [fragment("surah-2", "\u{FDFD}", "١")];
    let desc = descriptor(FontId::AmiriQuran, true);
    let closure = closure(&desc, &fragments);
    // The font maps the ligature but not the sequence it is built from
    let font = MockFont::covering(['\u{FDFD}']);

    let err = plan(&desc, &font, &closure).unwrap_err();
    let SubsetError::LigatureClosureViolation { font, missing } = err else {
        panic!("expected a closure violation");
    };
    assert_eq!(font, FontId::AmiriQuran);
    assert!(missing.contains("U+0628"));
    assert!(!missing.contains("U+FDFD"));
}

#[test]
fn test_corrupted_closure_is_rejected() {
    let fragments = [fragment("surah-2", "الٓمٓ", "١")];
    let desc = descriptor(FontId::AmiriQuran, true);
    let closure = closure(&desc, &fragments);
    let font = MockFont::covering(closure.codepoints.iter().copied());
    let resource = plan(&desc, &font, &closure).unwrap();

    let mut corrupted = closure.clone();
    corrupted.codepoints.insert('\u{06DE}');
    assert_eq!(
        verify(&resource, &font, &corrupted),
        Err(SubsetError::LigatureClosureViolation {
            font: FontId::AmiriQuran,
            missing: "U+06DE".to_string(),
        })
    );
}

#[test]
fn test_license_refusal_passes_font_through() {
    let fragments = [fragment("surah-2", "الٓمٓ", "١")];
    let desc = descriptor(FontId::KfgqpcUthmanicHafs, false);
    let mut assignment_fragment = fragments[0].clone();
    assignment_fragment.fonts.body = FontId::KfgqpcUthmanicHafs;
    let closure = closure(&desc, [&assignment_fragment]);
    let font = MockFont::covering(closure.codepoints.iter().copied());

    let resource = plan(&desc, &font, &closure).unwrap();
    assert_eq!(
        resource,
        FontResource::Full {
            font: FontId::KfgqpcUthmanicHafs,
            glyph_count: font.glyph_count(),
        }
    );
    assert!(!resource.is_subset());
}

#[test]
fn test_pass_through_font_is_still_verified() {
    let mut fragment = fragment("surah-2", "الٓمٓ", "١");
    fragment.fonts.body = FontId::MeQuran;
    let desc = descriptor(FontId::MeQuran, false);
    let closure = closure(&desc, [&fragment]);
    let font = MockFont::covering(['\u{0627}']);
    assert!(matches!(
        plan(&desc, &font, &closure),
        Err(SubsetError::LigatureClosureViolation { font: FontId::MeQuran, .. })
    ));
}

#[test]
fn test_cached_subsetter_reuses_plans() {
    let fragments = [fragment("surah-2", "الٓمٓ", "١")];
    let desc = descriptor(FontId::AmiriQuran, true);
    let closure = closure(&desc, &fragments);
    let font = MockFont::covering(closure.codepoints.iter().copied());

    let subsetter = Subsetter::with_cache(true);
    let first = subsetter.subset(&desc, &font, &closure).unwrap();
    let second = subsetter.subset(&desc, &font, &closure).unwrap();
    assert_eq!(first, second);

    let metrics = subsetter.cache_metrics().unwrap();
    assert_eq!(metrics.total_requests, 2);
    assert_eq!(metrics.l1_hits, 1);
    assert_eq!(metrics.misses, 1);
}

#[test]
fn test_cache_does_not_remember_failures() {
    let fragments = [fragment("surah-2", "الٓمٓ", "١")];
    let desc = descriptor(FontId::AmiriQuran, true);
    let closure = closure(&desc, &fragments);
    let empty = MockFont::covering(std::iter::empty());
    let full = MockFont::covering(closure.codepoints.iter().copied());

    let subsetter = Subsetter::with_cache(true);
    assert!(subsetter.subset(&desc, &empty, &closure).is_err());
    assert!(subsetter.subset(&desc, &full, &closure).is_ok());
}

#[test]
fn test_uncached_subsetter_has_no_metrics() {
    let subsetter = Subsetter::with_cache(false);
    assert!(!subsetter.cache_enabled());
    assert!(subsetter.cache_metrics().is_none());
}

#[test]
fn test_subset_fragments_reports_stats() {
    let fragments = vec![fragment("surah-2", "الٓمٓ", "١"), fragment("surah-3", "الٓمٓ", "٢")];
    let desc = descriptor(FontId::ScheherazadeNew, true);
    let font = MockFont::covering("١٢٣".chars());

    let (resource, stats) = Subsetter::with_cache(false)
        .subset_fragments(&desc, &font, &fragments)
        .unwrap();
    assert!(resource.is_subset());
    assert_eq!(stats.font, FontId::ScheherazadeNew);
    assert_eq!(stats.closure_size, 2);
    assert_eq!(stats.retained_glyphs, 3);
    assert_eq!(stats.source_glyphs, Some(4));
}

#[test]
fn test_font_file_subset_keeps_glyphs_reached_by_substitution() {
    let _ = env_logger::builder().is_test(true).try_init();
    let program = synthetic_font();
    let desc = descriptor(FontId::AmiriQuran, true);
    let closure = beh_seen(FontId::AmiriQuran);

    let resource = plan(&desc, &program, &closure).unwrap();
    let FontResource::Subset(min) = &resource else {
        panic!("expected a subset");
    };
    assert!(min.has_data());
    assert_eq!(min.glyphs, BTreeSet::from([0, 1, 2, LIGATURE_GID, PART_GID]));
    assert_eq!(min.source_glyph_count, Some(7));

    // The output is a font in its own right
    let output = FontRef::new(&min.data).unwrap();
    let cmap = output.cmap().unwrap();
    assert_eq!(cmap.map_codepoint(BEH).map(|gid| gid.to_u32()), Some(1));
    assert_eq!(cmap.map_codepoint(SEEN).map(|gid| gid.to_u32()), Some(2));
    assert_eq!(cmap.map_codepoint(MEEM), None);
    assert_eq!(cmap.map_codepoint('x'), None);
    assert!(output.gsub().is_ok());
    assert!(Font::from_data(min.data.clone()).is_ok());
}

#[test]
fn test_subset_bytes_missing_a_mapping_are_a_violation() {
    let _ = env_logger::builder().is_test(true).try_init();
    let program = synthetic_font();
    let source = binary::open(&program, FontId::AmiriQuran).unwrap();
    let glyphs = BTreeSet::from([0, 1, 2, LIGATURE_GID, PART_GID]);
    // The written cmap lost seen
    let data = binary::write_subset(
        &source,
        FontId::AmiriQuran,
        &BTreeMap::from([(BEH, 1)]),
        &glyphs,
    )
    .unwrap();

    let resource = FontResource::Subset(MinimizedFont {
        font: FontId::AmiriQuran,
        cmap: BTreeMap::from([(BEH, 1), (SEEN, 2)]),
        glyphs,
        source_glyph_count: Some(7),
        closure_hash: 0,
        data,
    });
    assert_eq!(
        verify(&resource, &program, &beh_seen(FontId::AmiriQuran)),
        Err(SubsetError::LigatureClosureViolation {
            font: FontId::AmiriQuran,
            missing: "U+0633".to_string(),
        })
    );
}

#[test]
fn test_subset_bytes_without_a_retained_outline_are_refused() {
    let program = synthetic_font();
    let source = binary::open(&program, FontId::AmiriQuran).unwrap();
    let cmap = BTreeMap::from([(BEH, 1), (SEEN, 2)]);
    // Written without the ligature glyphs the plan claims to keep
    let data = binary::write_subset(
        &source,
        FontId::AmiriQuran,
        &cmap,
        &BTreeSet::from([0, 1, 2]),
    )
    .unwrap();

    let resource = FontResource::Subset(MinimizedFont {
        font: FontId::AmiriQuran,
        cmap,
        glyphs: BTreeSet::from([0, 1, 2, LIGATURE_GID, PART_GID]),
        source_glyph_count: Some(7),
        closure_hash: 0,
        data,
    });
    assert!(matches!(
        verify(&resource, &program, &beh_seen(FontId::AmiriQuran)),
        Err(SubsetError::Malformed { font: FontId::AmiriQuran, .. })
    ));
}

#[test]
fn test_unreadable_font_bytes_are_malformed() {
    let desc = descriptor(FontId::ScheherazadeNew, true);
    let closure = beh_seen(FontId::ScheherazadeNew);
    assert!(matches!(
        plan(&desc, &Garbage, &closure),
        Err(SubsetError::Malformed { font: FontId::ScheherazadeNew, .. })
    ));
}

#[test]
fn test_cached_font_file_subset_is_verified_again() {
    let program = synthetic_font();
    let desc = descriptor(FontId::AmiriQuran, true);
    let closure = beh_seen(FontId::AmiriQuran);

    let subsetter = Subsetter::with_cache(true);
    let first = subsetter.subset(&desc, &program, &closure).unwrap();
    let second = subsetter.subset(&desc, &program, &closure).unwrap();
    assert_eq!(first, second);
    assert_eq!(subsetter.cache_metrics().unwrap().l1_hits, 1);
}
