//! Build outcome reporting.

use std::fmt;
use std::path::PathBuf;

use crate::error::BuildError;

/// Pipeline stage a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Directories,
    Template,
    Convert,
    Assets,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discovery => "discovery",
            Stage::Directories => "directories",
            Stage::Template => "template",
            Stage::Convert => "convert",
            Stage::Assets => "assets",
        };
        f.write_str(name)
    }
}

/// A failure recorded during a build.
#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    /// Source file the failure concerns, for per-page failures
    pub source: Option<PathBuf>,
    pub error: BuildError,
}

/// Result of a build.
///
/// Every stage runs even when an earlier one failed; failures are collected
/// here instead of stopping the build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Discovered sources, relative to the source root
    pub sources: Vec<PathBuf>,

    /// Ensured output directories
    pub directories: Vec<PathBuf>,

    /// Pages written
    pub written: Vec<PathBuf>,

    /// Static files copied
    pub assets_copied: usize,

    /// Failures in the order they happened
    pub failures: Vec<StageFailure>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

impl BuildReport {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            ..Default::default()
        }
    }

    pub fn record(&mut self, stage: Stage, source: Option<PathBuf>, error: BuildError) {
        self.failures.push(StageFailure {
            stage,
            source,
            error,
        });
    }

    pub fn pages_written(&self) -> usize {
        self.written.len()
    }

    /// Sources whose page could not be produced.
    pub fn failed_sources(&self) -> Vec<&PathBuf> {
        self.failures
            .iter()
            .filter(|f| f.stage == Stage::Convert)
            .filter_map(|f| f.source.as_ref())
            .collect()
    }

    pub fn failures_in(&self, stage: Stage) -> impl Iterator<Item = &StageFailure> {
        self.failures.iter().filter(move |f| f.stage == stage)
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
