//! Markdown source discovery.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::BuildError;

/// Find every `.md` file under `root`, as paths relative to `root`.
///
/// Entries are visited in file name order within each directory, and
/// hidden files and directories below the root are skipped. Only a failure
/// to read the root itself is an error; unreadable entries further down are
/// logged and skipped.
pub fn discover_sources(root: &Path) -> Result<Vec<PathBuf>, BuildError> {
    tracing::info!("Getting a list of markdown files");

    let mut sources = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(BuildError::Discovery {
                    root: root.to_path_buf(),
                    message: e.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        sources.push(relative);
    }

    tracing::debug!("Found {} markdown files", sources.len());

    Ok(sources)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
