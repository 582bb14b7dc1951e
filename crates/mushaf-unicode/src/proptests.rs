use super::*;
use proptest::prelude::*;

// Property: rasm reduction is idempotent
proptest! {
    #[test]
    fn prop_rasm_idempotent(s in "[\\x{0600}-\\x{06FF} ]{0,48}") {
        let once = rasm::reduce(&s);
        let twice = rasm::reduce(&once);
        prop_assert_eq!(once, twice);
    }
}

// Property: idempotent on mixed input with joiners, punctuation and Latin
proptest! {
    #[test]
    fn prop_rasm_idempotent_mixed(s in "[\\x{0620}-\\x{0655}\\x{06CC}\\x{200D}\\x{060C}a-z .]{0,32}") {
        let once = rasm::reduce(&s);
        prop_assert_eq!(rasm::reduce(&once), once);
    }
}

// Property: every codepoint maps to at most one codepoint, never panics
proptest! {
    #[test]
    fn prop_rasm_total_per_codepoint(ch in any::<char>()) {
        let out = rasm::reduce(&ch.to_string());
        prop_assert!(out.chars().count() <= 1);
        if !rasm::is_dropped(ch) {
            prop_assert_eq!(out.chars().count(), 1);
        }
    }
}

// Property: no dotted letter or dropped mark survives reduction
proptest! {
    #[test]
    fn prop_rasm_output_is_skeleton(s in "[\\x{0600}-\\x{06FF} ]{0,48}") {
        let out = rasm::reduce(&s);
        for ch in out.chars() {
            prop_assert!(!rasm::is_dropped(ch));
            let is_dotted = matches!(ch, '\u{0628}' | '\u{062A}' | '\u{0642}' | '\u{0646}' | '\u{064A}');
            prop_assert!(!is_dotted);
        }
    }
}

// Property: whitespace canonicalization leaves no doubled or edge spaces
proptest! {
    #[test]
    fn prop_collapse_whitespace_canonical(s in "\\PC*") {
        let out = normalize::collapse_whitespace(&s);
        prop_assert!(!out.starts_with(' '));
        prop_assert!(!out.ends_with(' '));
        prop_assert!(!out.contains("  "));
        prop_assert_eq!(normalize::collapse_whitespace(&out), out.clone());
    }
}

// Property: footnote parsing never loses visible text
proptest! {
    #[test]
    fn prop_parse_pieces_preserves_plain_text(s in "[a-zA-Z <>/=]{0,40}") {
        let pieces = translation::parse_pieces(&s);
        let rebuilt: String = pieces
            .iter()
            .map(|p| match p {
                mushaf_core::content::TranslationPiece::Text(t) => t.clone(),
                mushaf_core::content::TranslationPiece::NoteRef { marker, .. } => marker.clone(),
            })
            .collect();
        prop_assert_eq!(rebuilt, s);
    }
}

#[test]
fn rasm_total_over_arabic_blocks() {
    let blocks = [
        0x0600u32..=0x06FF,
        0x0750..=0x077F,
        0x08A0..=0x08FF,
        0xFB50..=0xFDFF,
        0xFE70..=0xFEFF,
    ];
    for block in blocks {
        for cp in block {
            if let Some(ch) = char::from_u32(cp) {
                let out = rasm::reduce(&ch.to_string());
                assert!(out.chars().count() <= 1, "U+{:04X}", cp);
            }
        }
    }
}
