use super::tests::{descriptor, fragment, MockFont};
use super::*;
use mushaf_core::script::FontId;
use proptest::prelude::*;

fn arabic_text() -> impl Strategy<Value = String> {
    "[\\x{0621}-\\x{064A}\\x{064B}-\\x{0652} \\x{FDFD}]{0,24}"
}

// Property: adding a fragment never shrinks the closure
proptest! {
    #[test]
    fn prop_closure_monotonic(
        texts in proptest::collection::vec(arabic_text(), 1..5),
        extra in arabic_text(),
    ) {
        let desc = descriptor(FontId::AmiriQuran, true);
        let mut fragments: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| fragment(&format!("f{}", i), t, "١"))
            .collect();

        let before = closure(&desc, &fragments);
        fragments.push(fragment("extra", &extra, "٢"));
        let after = closure(&desc, &fragments);

        prop_assert!(after.is_superset(&before));
    }
}

// Property: closure is independent of fragment order
proptest! {
    #[test]
    fn prop_closure_order_independent(texts in proptest::collection::vec(arabic_text(), 1..5)) {
        let desc = descriptor(FontId::AmiriQuran, true);
        let mut fragments: Vec<_> = texts.iter().map(|t| fragment("f", t, "١")).collect();
        let forward = closure(&desc, &fragments);
        fragments.reverse();
        let backward = closure(&desc, &fragments);
        prop_assert_eq!(forward.codepoints, backward.codepoints);
    }
}

// Property: a font covering the closure always yields a verified subset
proptest! {
    #[test]
    fn prop_covering_font_always_verifies(text in arabic_text()) {
        let desc = descriptor(FontId::AmiriQuran, true);
        let fragments = [fragment("f", &text, "١")];
        let closure = closure(&desc, &fragments);
        let font = MockFont::covering(closure.codepoints.iter().copied());

        let resource = plan(&desc, &font, &closure);
        prop_assert!(resource.is_ok());
    }
}

// Property: dropping any closure codepoint from the font is caught
proptest! {
    #[test]
    fn prop_dropped_codepoint_is_violation(text in "[\\x{0621}-\\x{064A}]{1,16}", pick in any::<prop::sample::Index>()) {
        let desc = descriptor(FontId::AmiriQuran, true);
        let fragments = [fragment("f", &text, "١")];
        let closure = closure(&desc, &fragments);
        let chars: Vec<char> = closure.codepoints.iter().copied().collect();
        let dropped = chars[pick.index(chars.len())];
        let font = MockFont::covering(chars.iter().copied().filter(|c| *c != dropped));

        let is_violation = matches!(
            plan(&desc, &font, &closure),
            Err(SubsetError::LigatureClosureViolation { .. })
        );
        prop_assert!(is_violation);
    }
}
