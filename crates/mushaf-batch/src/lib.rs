// this_file: crates/mushaf-batch/src/lib.rs

//! Multi-variant builds for the Mushaf engine.
//!
//! A [`Manifest`] lists the variants one run should produce. The
//! [`Orchestrator`] builds them in parallel against one shared book and
//! registry, and returns one [`BuildReport`] per variant, sorted by
//! variant id. A variant that fails gets a specific failure in its report
//! and never reaches the packager; the others carry on.

pub mod limits;
pub mod manifest;
pub mod orchestrator;
pub mod packager;
pub mod report;

pub use limits::{validate_json_size, validate_variant_count, MAX_JSON_SIZE, MAX_VARIANTS_PER_MANIFEST};
pub use manifest::{Manifest, ManifestError, MANIFEST_VERSION};
pub use orchestrator::{Orchestrator, OrchestratorOptions, ProgressUpdate};
pub use packager::{MemoryPackager, PackagedVariant};
pub use report::{to_jsonl, BuildReport, BuildStatus, FailureKind};
