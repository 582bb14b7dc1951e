use super::*;
use mushaf_core::script::{FontId, ScriptEncoding};
use proptest::prelude::*;

fn encoding() -> impl Strategy<Value = ScriptEncoding> {
    prop::sample::select(ScriptEncoding::ALL.to_vec())
}

fn font() -> impl Strategy<Value = FontId> {
    prop::sample::select(FontId::ALL.to_vec())
}

// Property: validate is a pure function of (encoding, font)
proptest! {
    #[test]
    fn prop_validate_is_pure(pairs in prop::collection::vec((encoding(), font()), 1..32)) {
        let registry = CompatibilityRegistry::builtin().unwrap();
        for (e, f) in &pairs {
            let first = registry.validate(*e, *f);
            let second = registry.validate(*e, *f);
            prop_assert_eq!(first, second);
        }
    }
}

// Property: validate agrees with lookup and with the descriptor's encodings
proptest! {
    #[test]
    fn prop_validate_matches_lookup(e in encoding(), f in font()) {
        let registry = CompatibilityRegistry::builtin().unwrap();
        let listed = registry
            .lookup(e)
            .map(|fonts| fonts.iter().any(|d| d.id == f))
            .unwrap_or(false);
        prop_assert_eq!(registry.validate(e, f).is_ok(), listed);
        let supports = registry.descriptor(f).map(|d| d.supports(e)).unwrap_or(false);
        prop_assert_eq!(supports, listed);
    }
}
