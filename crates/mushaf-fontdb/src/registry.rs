//! The script/font compatibility registry
//!
//! Built once from a [`RegistrySeed`], validated, and never mutated
//! afterwards. Callers hold it behind an `Arc` and pass it to whatever
//! needs it; there is no global instance.
//!
//! The registry never infers anything. A pair that is not enumerated in
//! the seed is refused, whatever the font's metadata claims to cover.

use std::collections::BTreeMap;

use mushaf_core::config::BuildConfig;
use mushaf_core::error::RegistryError;
use mushaf_core::fragment::FontAssignment;
use mushaf_core::script::{FontDescriptor, FontId, ScriptEncoding};

use crate::seed::{RegistrySeed, RoleFonts};

#[derive(Debug, Clone)]
struct Pair {
    font: FontId,
    verification: String,
}

#[derive(Debug, Clone)]
pub struct CompatibilityRegistry {
    fonts: BTreeMap<FontId, FontDescriptor>,
    pairs: BTreeMap<ScriptEncoding, Vec<Pair>>,
    roles: RoleFonts,
}

impl CompatibilityRegistry {
    /// Registry over the shipped seed
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_seed(RegistrySeed::builtin())
    }

    /// Validate a seed and build the registry from it
    ///
    /// Fails on a font listed twice with different properties, a pair or
    /// role naming a font missing from the catalog, or a pair without a
    /// verification note.
    pub fn from_seed(seed: RegistrySeed) -> Result<Self, RegistryError> {
        let mut fonts: BTreeMap<FontId, FontDescriptor> = BTreeMap::new();
        for entry in seed.fonts {
            let descriptor = entry.into_descriptor();
            match fonts.get(&descriptor.id) {
                Some(existing) if *existing != descriptor => {
                    return Err(RegistryError::ConflictingDescriptor(descriptor.id));
                },
                Some(_) => {},
                None => {
                    fonts.insert(descriptor.id, descriptor);
                },
            }
        }

        let mut pairs: BTreeMap<ScriptEncoding, Vec<Pair>> = BTreeMap::new();
        for pair_seed in seed.pairs {
            let list = pairs.entry(pair_seed.encoding).or_default();
            for verified in pair_seed.fonts {
                if verified.verification.trim().is_empty() {
                    return Err(RegistryError::UnverifiedEntry {
                        encoding: pair_seed.encoding,
                        font: verified.font,
                    });
                }
                let descriptor = fonts
                    .get_mut(&verified.font)
                    .ok_or(RegistryError::UnknownFont(verified.font))?;
                descriptor.encodings.insert(pair_seed.encoding);

                if list.iter().all(|p| p.font != verified.font) {
                    list.push(Pair {
                        font: verified.font,
                        verification: verified.verification,
                    });
                }
            }
        }

        let roles = seed.roles;
        for font in [roles.symbol, roles.header, roles.ornament] {
            if !fonts.contains_key(&font) {
                return Err(RegistryError::UnknownFont(font));
            }
        }

        log::debug!(
            "Registry built: {} fonts, {} encodings with verified fonts",
            fonts.len(),
            pairs.values().filter(|list| !list.is_empty()).count()
        );

        Ok(Self {
            fonts,
            pairs,
            roles,
        })
    }

    /// Fonts verified for `encoding`, recommended default first
    pub fn lookup(&self, encoding: ScriptEncoding) -> Result<Vec<&FontDescriptor>, RegistryError> {
        let list = self
            .pairs
            .get(&encoding)
            .filter(|list| !list.is_empty())
            .ok_or(RegistryError::NotRegistered(encoding))?;

        list.iter()
            .map(|pair| {
                self.fonts
                    .get(&pair.font)
                    .ok_or(RegistryError::UnknownFont(pair.font))
            })
            .collect()
    }

    /// Is `font` verified for `encoding`?
    pub fn validate(&self, encoding: ScriptEncoding, font: FontId) -> Result<(), RegistryError> {
        let verified = self.lookup(encoding)?;
        if verified.iter().any(|d| d.id == font) {
            return Ok(());
        }
        Err(RegistryError::IncompatiblePair {
            encoding,
            font,
            verified: verified
                .iter()
                .map(|d| d.id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    pub fn default_font(&self, encoding: ScriptEncoding) -> Result<&FontDescriptor, RegistryError> {
        self.lookup(encoding)?
            .into_iter()
            .next()
            .ok_or(RegistryError::NotRegistered(encoding))
    }

    /// How the pair was verified, when it is registered
    pub fn verification(&self, encoding: ScriptEncoding, font: FontId) -> Option<&str> {
        self.pairs
            .get(&encoding)?
            .iter()
            .find(|p| p.font == font)
            .map(|p| p.verification.as_str())
    }

    pub fn descriptor(&self, font: FontId) -> Option<&FontDescriptor> {
        self.fonts.get(&font)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &FontDescriptor> {
        self.fonts.values()
    }

    pub fn roles(&self) -> RoleFonts {
        self.roles
    }

    /// Resolve a config's fonts: explicit body font or the default, plus roles
    pub fn resolve(&self, config: &BuildConfig) -> Result<FontAssignment, RegistryError> {
        let body = match config.font {
            Some(font) => {
                self.validate(config.script, font)?;
                font
            },
            None => self.default_font(config.script)?.id,
        };

        Ok(FontAssignment {
            body,
            symbol: self.roles.symbol,
            header: self.roles.header,
            ornament: self.roles.ornament,
        })
    }
}
