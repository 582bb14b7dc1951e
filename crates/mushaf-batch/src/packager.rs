// this_file: crates/mushaf-batch/src/packager.rs

//! An in-memory packager.
//!
//! Keeps every packaged variant in a map keyed by variant id. Useful for
//! dry runs, and for checking what a run would hand a real packager.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use mushaf_core::config::{BuildConfig, VariantId};
use mushaf_core::error::PackageError;
use mushaf_core::fragment::{DocumentFragment, NavModel};
use mushaf_core::glyph::FontResource;
use mushaf_core::traits::{ArtifactHandle, Packager};

/// What one variant handed to the packager
#[derive(Debug, Clone, PartialEq)]
pub struct PackagedVariant {
    pub config: BuildConfig,
    pub fragments: Vec<DocumentFragment>,
    pub nav: NavModel,
    pub fonts: Vec<FontResource>,
}

#[derive(Default)]
pub struct MemoryPackager {
    packaged: Mutex<BTreeMap<VariantId, PackagedVariant>>,
}

impl MemoryPackager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.packaged.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.packaged.lock().is_empty()
    }

    pub fn contains(&self, variant: &VariantId) -> bool {
        self.packaged.lock().contains_key(variant)
    }

    pub fn get(&self, variant: &VariantId) -> Option<PackagedVariant> {
        self.packaged.lock().get(variant).cloned()
    }

    /// Packaged variant ids, sorted
    pub fn variants(&self) -> Vec<VariantId> {
        self.packaged.lock().keys().cloned().collect()
    }
}

impl Packager for MemoryPackager {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn package(
        &self,
        config: &BuildConfig,
        fragments: &[DocumentFragment],
        nav: &NavModel,
        fonts: &[FontResource],
    ) -> Result<ArtifactHandle, PackageError> {
        let mut packaged = self.packaged.lock();
        if packaged.contains_key(&config.id) {
            return Err(PackageError::Rejected {
                variant: config.id.to_string(),
                reason: "already packaged".to_string(),
            });
        }

        packaged.insert(
            config.id.clone(),
            PackagedVariant {
                config: config.clone(),
                fragments: fragments.to_vec(),
                nav: nav.clone(),
                fonts: fonts.to_vec(),
            },
        );

        Ok(ArtifactHandle {
            id: config.id.to_string(),
            location: format!("memory://{}", config.id),
        })
    }
}
