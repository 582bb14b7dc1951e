// this_file: crates/mushaf-batch/src/limits.rs

//! Input size limits for manifests.

use crate::manifest::ManifestError;

/// Maximum accepted manifest size (10MB)
pub const MAX_JSON_SIZE: usize = 10 * 1024 * 1024;
/// Maximum number of variants in one manifest
pub const MAX_VARIANTS_PER_MANIFEST: usize = 1000;

/// Reject manifest input larger than [`MAX_JSON_SIZE`].
pub fn validate_json_size(len: usize) -> Result<(), ManifestError> {
    if len > MAX_JSON_SIZE {
        return Err(ManifestError::TooLarge {
            size: len,
            max: MAX_JSON_SIZE,
        });
    }
    Ok(())
}

/// Reject manifests with more than [`MAX_VARIANTS_PER_MANIFEST`] entries.
pub fn validate_variant_count(count: usize) -> Result<(), ManifestError> {
    if count > MAX_VARIANTS_PER_MANIFEST {
        return Err(ManifestError::TooManyVariants {
            count,
            max: MAX_VARIANTS_PER_MANIFEST,
        });
    }
    Ok(())
}
