//! Page template.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::BuildError;

/// A page template with a body marker.
///
/// Loaded once per build and shared by every page.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    content: String,
    marker: String,
}

impl Template {
    /// Load a template from disk.
    pub fn load(path: &Path, marker: &str) -> Result<Self, BuildError> {
        let content = fs::read_to_string(path).map_err(|e| BuildError::Template {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let template = Self {
            path: path.to_path_buf(),
            content,
            marker: marker.to_string(),
        };

        match template.marker_count() {
            1 => {}
            0 => tracing::warn!(
                "Template {} has no {} marker; pages will have no body",
                path.display(),
                marker
            ),
            n => tracing::warn!(
                "Template {} has {} {} markers; every one gets the page body",
                path.display(),
                n,
                marker
            ),
        }

        Ok(template)
    }

    /// Build a template from a string.
    pub fn from_string(content: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            path: PathBuf::new(),
            content: content.into(),
            marker: marker.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of markers in the template.
    pub fn marker_count(&self) -> usize {
        if self.marker.is_empty() {
            return 0;
        }
        self.content.matches(self.marker.as_str()).count()
    }

    /// Substitute `body` for the marker.
    pub fn render(&self, body: &str) -> String {
        if self.marker.is_empty() {
            return self.content.clone();
        }
        self.content.replace(&self.marker, body)
    }
}
