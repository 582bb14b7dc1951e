// this_file: crates/mushaf-batch/src/report.rs

//! Per-variant build reports.
//!
//! Every manifest entry gets exactly one report. A failure names the
//! variant and a specific cause; there is no generic "build failed".

use serde::{Deserialize, Serialize};

use mushaf_core::config::VariantId;
use mushaf_core::error::{AssemblyError, MushafError, RegistryError, SubsetError};
use mushaf_core::glyph::SubsetStats;
use mushaf_core::traits::ArtifactHandle;

/// Why a variant failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The script encoding has no verified font
    NotRegistered,
    /// The requested font is not verified for the script encoding
    IncompatiblePair,
    /// A font could not render every codepoint it must
    LigatureClosureViolation,
    /// The config is malformed for its layout, or names unknown resources
    InvalidConfig,
    /// The source feed lacks the requested script encoding
    MissingScript,
    /// No font program was loaded for a font the variant needs
    FontUnavailable,
    /// A font's bytes could not be read or written back
    MalformedFont,
    /// The packager rejected the variant
    Packaging,
}

impl FailureKind {
    pub fn of(error: &MushafError) -> Self {
        match error {
            MushafError::Registry(RegistryError::NotRegistered(_)) => Self::NotRegistered,
            MushafError::Registry(RegistryError::IncompatiblePair { .. }) => Self::IncompatiblePair,
            MushafError::Registry(_) => Self::InvalidConfig,
            MushafError::Assembly(AssemblyError::MissingScript(_)) => Self::MissingScript,
            MushafError::Assembly(_) => Self::InvalidConfig,
            MushafError::Subset(SubsetError::LigatureClosureViolation { .. }) => {
                Self::LigatureClosureViolation
            },
            MushafError::Subset(SubsetError::FontUnavailable(_)) | MushafError::FontLoad(_) => {
                Self::FontUnavailable
            },
            MushafError::Subset(SubsetError::Malformed { .. }) => Self::MalformedFont,
            MushafError::Package(_) | MushafError::Io(_) => Self::Packaging,
            MushafError::Normalize(_) | MushafError::Config(_) => Self::InvalidConfig,
        }
    }
}

/// Outcome of one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildStatus {
    Success {
        artifact: ArtifactHandle,
        /// One entry per embedded font
        fonts: Vec<SubsetStats>,
        /// Untranslated placeholders inserted
        placeholders: usize,
    },
    Failure {
        kind: FailureKind,
        message: String,
    },
}

/// Report line for one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub variant: VariantId,
    #[serde(flatten)]
    pub status: BuildStatus,
}

impl BuildReport {
    pub fn success(
        variant: VariantId,
        artifact: ArtifactHandle,
        fonts: Vec<SubsetStats>,
        placeholders: usize,
    ) -> Self {
        Self {
            variant,
            status: BuildStatus::Success {
                artifact,
                fonts,
                placeholders,
            },
        }
    }

    /// Failure report; the message always names the variant
    pub fn failure(variant: VariantId, error: &MushafError) -> Self {
        let message = format!("variant '{}': {}", variant, error);
        Self {
            variant,
            status: BuildStatus::Failure {
                kind: FailureKind::of(error),
                message,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, BuildStatus::Success { .. })
    }

    pub fn artifact(&self) -> Option<&ArtifactHandle> {
        match &self.status {
            BuildStatus::Success { artifact, .. } => Some(artifact),
            BuildStatus::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.status {
            BuildStatus::Failure { kind, .. } => Some(*kind),
            BuildStatus::Success { .. } => None,
        }
    }
}

/// Write reports as JSON lines, one per variant.
pub fn to_jsonl(reports: &[BuildReport]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for report in reports {
        out.push_str(&serde_json::to_string(report)?);
        out.push('\n');
    }
    Ok(out)
}
