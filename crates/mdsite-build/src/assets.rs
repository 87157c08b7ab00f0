//! Static asset copying.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::BuildError;

/// Recursively copy `static_dir` into `output_root`, keeping its name
/// (`static/` ends up at `<output_root>/static/`).
///
/// Existing files are overwritten and unrelated files already in the target
/// are kept. Returns the number of files copied.
pub fn copy_static(static_dir: &Path, output_root: &Path) -> Result<usize, BuildError> {
    let failed = |message: String| BuildError::Assets {
        path: static_dir.to_path_buf(),
        message,
    };

    if !static_dir.is_dir() {
        return Err(failed("No such directory".to_string()));
    }

    let name = static_dir
        .file_name()
        .ok_or_else(|| failed("Directory has no name".to_string()))?;
    let target_root = output_root.join(name);

    let mut copied = 0;

    for entry in WalkDir::new(static_dir).follow_links(true) {
        let entry = entry.map_err(|e| failed(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(static_dir)
            .unwrap_or(entry.path());
        let target: PathBuf = target_root.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| failed(format!("{}: {}", target.display(), e)))?;
        } else {
            fs::copy(entry.path(), &target)
                .map_err(|e| failed(format!("{}: {}", entry.path().display(), e)))?;
            tracing::debug!("Copied {}", relative.display());
            copied += 1;
        }
    }

    Ok(copied)
}
