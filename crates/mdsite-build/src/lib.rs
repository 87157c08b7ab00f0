//! Static site builder for mdsite.
//!
//! Converts every Markdown file under a source root into an HTML page
//! wrapped in a shared template, mirrored under an output root, and copies
//! the static assets directory alongside.

pub mod assets;
pub mod builder;
pub mod config;
pub mod converter;
pub mod discovery;
pub mod error;
pub mod mirror;
pub mod report;
pub mod template;

pub use builder::SiteBuilder;
pub use config::SiteConfig;
pub use converter::Converter;
pub use error::BuildError;
pub use report::{BuildReport, Stage, StageFailure};
pub use template::Template;
