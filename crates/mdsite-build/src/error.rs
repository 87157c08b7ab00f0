//! Build errors.

use std::io;
use std::path::PathBuf;

/// Errors that can occur during a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to scan {root} for markdown files: {message}")]
    Discovery { root: PathBuf, message: String },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to load template {path}: {message}")]
    Template { path: PathBuf, message: String },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to copy static assets from {path}: {message}")]
    Assets { path: PathBuf, message: String },
}
