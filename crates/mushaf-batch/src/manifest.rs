// this_file: crates/mushaf-batch/src/manifest.rs

//! Variant manifests: the list of outputs one run should build.

use std::collections::BTreeSet;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use mushaf_core::config::BuildConfig;

use crate::limits::{validate_json_size, validate_variant_count};

/// The only manifest version understood
pub const MANIFEST_VERSION: &str = "1.0";

/// Top-level manifest (JSON input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest version (must be "1.0")
    pub version: String,
    /// One entry per output variant
    pub variants: Vec<BuildConfig>,
}

impl Manifest {
    pub fn new(variants: Vec<BuildConfig>) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            variants,
        }
    }

    /// Parse and validate a manifest.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        validate_json_size(json.len())?;
        let manifest: Self =
            serde_json::from_str(json).map_err(|e| ManifestError::Parse(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn from_file(path: &Utf8Path) -> Result<Self, ManifestError> {
        let json = std::fs::read_to_string(path.as_std_path())
            .map_err(|e| ManifestError::Read(format!("{}: {}", path, e)))?;
        Self::from_json(&json)
    }

    /// Check version, size and variant identities.
    ///
    /// Per-variant content (script, font, layout) is not checked here; a
    /// bad variant fails on its own in the report without sinking the
    /// others.
    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.version != MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion(self.version.clone()));
        }

        if self.variants.is_empty() {
            return Err(ManifestError::EmptyVariantList);
        }

        validate_variant_count(self.variants.len())?;

        let mut seen = BTreeSet::new();
        for variant in &self.variants {
            if variant.id.as_str().trim().is_empty() {
                return Err(ManifestError::EmptyVariantId);
            }
            if !seen.insert(variant.id.as_str()) {
                return Err(ManifestError::DuplicateVariantId(variant.id.to_string()));
            }
        }

        Ok(())
    }
}

/// Manifest-level errors; these reject the whole run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    #[error("Unsupported manifest version: {0}, expected '1.0'")]
    UnsupportedVersion(String),

    #[error("Variant list is empty")]
    EmptyVariantList,

    #[error("Too many variants: {count} (max: {max})")]
    TooManyVariants { count: usize, max: usize },

    #[error("Variant ID is empty")]
    EmptyVariantId,

    #[error("Duplicate variant ID: {0}")]
    DuplicateVariantId(String),

    #[error("Manifest too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Invalid manifest JSON: {0}")]
    Parse(String),

    #[error("Cannot read manifest: {0}")]
    Read(String),
}
