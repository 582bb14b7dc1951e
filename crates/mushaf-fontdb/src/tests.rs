use super::*;
use mushaf_core::config::{BuildConfig, LayoutMode};
use mushaf_core::error::RegistryError;
use mushaf_core::script::{FontId, ScriptEncoding};

fn builtin() -> CompatibilityRegistry {
    CompatibilityRegistry::builtin().unwrap()
}

#[test]
fn test_builtin_defaults() {
    let registry = builtin();
    assert_eq!(
        registry.default_font(ScriptEncoding::QpcUthmaniHafs).unwrap().id,
        FontId::KfgqpcUthmanicHafs
    );
    assert_eq!(
        registry.default_font(ScriptEncoding::TextUthmani).unwrap().id,
        FontId::AmiriQuran
    );
    let ids: Vec<_> = registry
        .lookup(ScriptEncoding::TextUthmani)
        .unwrap()
        .iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(
        ids,
        vec![FontId::AmiriQuran, FontId::ScheherazadeNew, FontId::MeQuran]
    );
}

#[test]
fn test_empty_and_missing_encodings_are_not_registered() {
    let registry = builtin();
    assert_eq!(
        registry.lookup(ScriptEncoding::TextIndopak).unwrap_err(),
        RegistryError::NotRegistered(ScriptEncoding::TextIndopak)
    );
    assert_eq!(
        registry.lookup(ScriptEncoding::TextUthmaniTajweed).unwrap_err(),
        RegistryError::NotRegistered(ScriptEncoding::TextUthmaniTajweed)
    );
}

#[test]
fn test_validate_rejects_unverified_pair() {
    let registry = builtin();
    assert!(registry
        .validate(ScriptEncoding::QpcUthmaniHafs, FontId::KfgqpcUthmanicHafs)
        .is_ok());

    // the sukun/small-high-zero mismatch that motivated the registry
    let err = registry
        .validate(ScriptEncoding::TextUthmani, FontId::KfgqpcUthmanicHafs)
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::IncompatiblePair {
            encoding: ScriptEncoding::TextUthmani,
            font: FontId::KfgqpcUthmanicHafs,
            verified: "amiri_quran, scheherazade_new, me_quran".to_string(),
        }
    );
}

#[test]
fn test_descriptors_carry_encodings_and_license() {
    let registry = builtin();
    let amiri = registry.descriptor(FontId::AmiriQuran).unwrap();
    assert!(amiri.can_subset);
    assert!(amiri.supports(ScriptEncoding::QpcUthmaniHafs));
    assert!(amiri.required_ligatures.iter().any(|l| l.name == "basmala"));

    let kfgqpc = registry.descriptor(FontId::KfgqpcUthmanicHafs).unwrap();
    assert!(!kfgqpc.can_subset);
    assert!(!kfgqpc.supports(ScriptEncoding::TextUthmani));

    let noto = registry.descriptor(FontId::NotoSansArabic).unwrap();
    assert!(noto.encodings.is_empty());
    assert!(registry
        .verification(ScriptEncoding::TextUthmani, FontId::AmiriQuran)
        .is_some());
}

#[test]
fn test_resolve_uses_default_and_roles() {
    let registry = builtin();
    let config = BuildConfig::new("v", ScriptEncoding::QpcUthmaniHafs, LayoutMode::Inline);
    let fonts = registry.resolve(&config).unwrap();
    assert_eq!(fonts.body, FontId::KfgqpcUthmanicHafs);
    assert_eq!(fonts.symbol, FontId::ScheherazadeNew);
    assert_eq!(fonts.ornament, FontId::AmiriQuran);

    let explicit = config.with_font(FontId::NotoSansArabic);
    assert!(matches!(
        registry.resolve(&explicit),
        Err(RegistryError::IncompatiblePair { .. })
    ));
}

#[test]
fn test_seed_without_verification_is_rejected() {
    let mut seed = RegistrySeed::builtin();
    seed.pairs[0].fonts[0].verification = "  ".to_string();
    assert!(matches!(
        CompatibilityRegistry::from_seed(seed),
        Err(RegistryError::UnverifiedEntry { .. })
    ));
}

#[test]
fn test_seed_conflicts_and_unknown_fonts() {
    let mut conflicting = RegistrySeed::builtin();
    let mut twin = conflicting.fonts[0].clone();
    twin.can_subset = !twin.can_subset;
    conflicting.fonts.push(twin);
    assert_eq!(
        CompatibilityRegistry::from_seed(conflicting).unwrap_err(),
        RegistryError::ConflictingDescriptor(FontId::AmiriQuran)
    );

    let mut identical = RegistrySeed::builtin();
    identical.fonts.push(identical.fonts[0].clone());
    assert!(CompatibilityRegistry::from_seed(identical).is_ok());

    let mut unknown = RegistrySeed::builtin();
    unknown.fonts.retain(|f| f.id != FontId::MeQuran);
    assert_eq!(
        CompatibilityRegistry::from_seed(unknown).unwrap_err(),
        RegistryError::UnknownFont(FontId::MeQuran)
    );
}

#[test]
fn test_seed_round_trips_through_json() {
    let seed = RegistrySeed::builtin();
    let json = serde_json::to_string(&seed).unwrap();
    let parsed = RegistrySeed::from_json(&json).unwrap();
    assert_eq!(parsed, seed);
    assert!(RegistrySeed::from_json("{\"fonts\": 3}").is_err());
}
