//! Output directory mirroring.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BuildError;

/// Ensure the output root and a mirror of every source's parent directory
/// exist under it.
///
/// Returns the ensured directories in sorted order, output root first.
/// Directories that already exist are left alone.
pub fn mirror_directories(
    output_root: &Path,
    sources: &[PathBuf],
) -> Result<Vec<PathBuf>, BuildError> {
    tracing::info!("Creating directories");

    let mut dirs = BTreeSet::new();
    dirs.insert(output_root.to_path_buf());
    for source in sources {
        if let Some(parent) = source.parent().filter(|p| !p.as_os_str().is_empty()) {
            dirs.insert(output_root.join(parent));
        }
    }

    for dir in &dirs {
        if dir.is_dir() {
            continue;
        }
        tracing::info!("Making directory {}", dir.display());
        fs::create_dir_all(dir).map_err(|source| BuildError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }

    Ok(dirs.into_iter().collect())
}
