// this_file: crates/mushaf-fontdb/src/security.rs

//! Font path sanitization and size limits.

use camino::{Utf8Path, Utf8PathBuf};

use mushaf_core::error::FontLoadError;

/// Maximum allowed font file size (50MB)
pub const MAX_FONT_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Validate and canonicalize a font path.
///
/// Relative paths resolve against `base_dir` (or the current directory);
/// with a base directory the result must stay inside it.
pub fn sanitize_path(
    path: &Utf8Path,
    base_dir: Option<&Utf8Path>,
) -> Result<Utf8PathBuf, FontLoadError> {
    let path_str = path.as_str();
    if path_str.contains("..") || path_str.contains('~') {
        return Err(FontLoadError::InvalidPath(format!(
            "{} contains .. or ~",
            path_str
        )));
    }

    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else if let Some(base) = base_dir {
        base.join(path)
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| FontLoadError::InvalidPath(format!("no current dir: {}", e)))?;
        let cwd = Utf8PathBuf::from_path_buf(cwd)
            .map_err(|_| FontLoadError::InvalidPath("non-UTF-8 current directory".to_string()))?;
        cwd.join(path)
    };

    let canonical = canonicalize(&abs)?;

    if let Some(base) = base_dir {
        let base = canonicalize(base)?;
        if !canonical.starts_with(&base) {
            return Err(FontLoadError::InvalidPath(format!(
                "{} is outside {}",
                canonical, base
            )));
        }
    }

    Ok(canonical)
}

fn canonicalize(path: &Utf8Path) -> Result<Utf8PathBuf, FontLoadError> {
    let canonical = std::fs::canonicalize(path.as_std_path()).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            FontLoadError::FileNotFound(path.to_string())
        } else {
            FontLoadError::InvalidPath(format!("cannot resolve {}: {}", path, e))
        }
    })?;
    Utf8PathBuf::from_path_buf(canonical)
        .map_err(|_| FontLoadError::InvalidPath("canonical path is not UTF-8".to_string()))
}

/// Validate font file size.
pub fn validate_font_size(size: u64) -> Result<(), FontLoadError> {
    if size > MAX_FONT_FILE_SIZE {
        return Err(FontLoadError::TooLarge {
            size,
            max: MAX_FONT_FILE_SIZE,
        });
    }
    Ok(())
}
