//! Static site builder.

use std::path::PathBuf;
use std::time::Instant;

use crate::assets::copy_static;
use crate::config::SiteConfig;
use crate::converter::Converter;
use crate::discovery::discover_sources;
use crate::error::BuildError;
use crate::mirror::mirror_directories;
use crate::report::{BuildReport, Stage};
use crate::template::Template;

/// Static site builder.
pub struct SiteBuilder {
    config: SiteConfig,
}

impl SiteBuilder {
    /// Create a new site builder.
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Build the site.
    ///
    /// A failed discovery continues with no sources, so the output root is
    /// still created and static assets are still copied.
    pub fn build(&self) -> BuildReport {
        let start = Instant::now();
        let mut report = BuildReport::new(self.config.output_dir.clone());

        let sources = match discover_sources(&self.config.source_dir) {
            Ok(sources) => sources,
            Err(e) => {
                tracing::error!("Failed to get markdown files: {}", e);
                report.record(Stage::Discovery, None, e);
                Vec::new()
            }
        };

        self.build_sources(sources, &mut report);

        report.duration_ms = start.elapsed().as_millis() as u64;
        report
    }

    /// Mirror directories for, convert, and copy assets for a given list of
    /// sources (relative to the source root).
    pub fn build_sources(&self, sources: Vec<PathBuf>, report: &mut BuildReport) {
        match mirror_directories(&self.config.output_dir, &sources) {
            Ok(dirs) => report.directories = dirs,
            Err(e) => {
                tracing::error!("Failed to create directories: {}", e);
                report.record(Stage::Directories, None, e);
            }
        }

        match Template::load(&self.config.template, &self.config.marker) {
            Ok(template) => self.convert_all(&sources, &template, report),
            Err(e) => {
                tracing::error!("{}", e);
                report.record(Stage::Template, None, e);
                for source in &sources {
                    tracing::error!("Failed to convert {}: template unavailable", source.display());
                    report.record(
                        Stage::Convert,
                        Some(source.clone()),
                        BuildError::Template {
                            path: self.config.template.clone(),
                            message: format!("template unavailable for {}", source.display()),
                        },
                    );
                }
            }
        }

        tracing::info!("Copying static directory");
        match copy_static(&self.config.static_dir, &self.config.output_dir) {
            Ok(count) => report.assets_copied = count,
            Err(e) => {
                tracing::warn!("Failed to copy static directory: {}", e);
                report.record(Stage::Assets, None, e);
            }
        }

        report.sources = sources;
    }

    fn convert_all(&self, sources: &[PathBuf], template: &Template, report: &mut BuildReport) {
        let converter = Converter::new(&self.config, template);

        for source in sources {
            match converter.convert(source) {
                Ok(written) => report.written.push(written),
                Err(e) => {
                    tracing::error!("Failed to convert {}", source.display());
                    report.record(Stage::Convert, Some(source.clone()), e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn site(root: &Path) -> SiteBuilder {
        fs::write(
            root.join("template.html"),
            "<html><body>{{ BODY }}</body></html>",
        )
        .unwrap();
        SiteBuilder::new(SiteConfig::rooted(root))
    }

    #[test]
    fn builds_simple_site() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("static")).unwrap();
        fs::write(temp.path().join("index.md"), "# Title\n\nHello **world**.").unwrap();

        let report = site(temp.path()).build();

        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(report.pages_written(), 1);
        assert_eq!(
            fs::read_to_string(temp.path().join("docs/index.html")).unwrap(),
            "<html><body></div></div><h1>Title</h1>\n<p>Hello <strong>world</strong>.</p></body></html>"
        );
    }

    #[test]
    fn readme_becomes_site_index() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/first.md"), "first").unwrap();
        fs::write(root.join("README.md"), "# Home").unwrap();

        let report = site(root).build();

        assert!(report.written.contains(&root.join("docs/index.html")));
        assert!(!root.join("docs/README.html").exists());
        assert!(fs::read_to_string(root.join("docs/index.html"))
            .unwrap()
            .contains("<h1>Home</h1>"));
    }

    #[test]
    fn mirrors_directories_for_written_pages() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("guide/advanced")).unwrap();
        fs::write(root.join("guide/intro.md"), "intro").unwrap();
        fs::write(root.join("guide/advanced/tuning.md"), "tuning").unwrap();

        let report = site(root).build();

        let mut parents: Vec<PathBuf> = report
            .written
            .iter()
            .filter_map(|p| p.parent().map(Path::to_path_buf))
            .collect();
        parents.push(root.join("docs"));
        parents.sort();
        parents.dedup();

        assert_eq!(report.directories, parents);
    }

    #[test]
    fn skips_source_that_disappeared() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("a.md"), "a").unwrap();
        fs::write(root.join("b.md"), "b").unwrap();

        let builder = site(root);
        let mut report = BuildReport::new(builder.config().output_dir.clone());
        builder.build_sources(
            vec![
                PathBuf::from("a.md"),
                PathBuf::from("gone.md"),
                PathBuf::from("b.md"),
            ],
            &mut report,
        );

        assert_eq!(report.failed_sources(), vec![&PathBuf::from("gone.md")]);
        assert_eq!(
            report.written,
            vec![root.join("docs/a.html"), root.join("docs/b.html")]
        );
        assert!(matches!(
            report.failures_in(Stage::Convert).next().map(|f| &f.error),
            Some(BuildError::Read { .. })
        ));
    }

    #[test]
    fn missing_template_fails_every_page() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("a.md"), "a").unwrap();
        fs::write(root.join("b.md"), "b").unwrap();

        let report = SiteBuilder::new(SiteConfig::rooted(root)).build();

        assert_eq!(report.pages_written(), 0);
        assert_eq!(report.failed_sources().len(), 2);
        assert_eq!(report.failures_in(Stage::Template).count(), 1);
        assert!(!root.join("docs/a.html").exists());

        let stages: Vec<Stage> = report.failures.iter().map(|f| f.stage).collect();
        assert_eq!(
            stages,
            vec![Stage::Template, Stage::Convert, Stage::Convert, Stage::Assets]
        );
    }

    #[test]
    fn copies_static_assets() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("static/img")).unwrap();
        fs::write(root.join("static/img/logo.svg"), "<svg/>").unwrap();
        fs::write(root.join("page.md"), "page").unwrap();

        let report = site(root).build();

        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(report.assets_copied, 1);
        assert!(root.join("docs/static/img/logo.svg").is_file());
    }

    #[test]
    fn missing_static_dir_is_recorded_not_fatal() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("page.md"), "page").unwrap();

        let report = site(temp.path()).build();

        assert_eq!(report.pages_written(), 1);
        assert_eq!(report.failures_in(Stage::Assets).count(), 1);
    }

    #[test]
    fn failed_discovery_still_runs_later_stages() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let builder = site(root);
        let config = SiteConfig {
            source_dir: root.join("missing"),
            ..builder.config().clone()
        };

        let report = SiteBuilder::new(config).build();

        assert_eq!(report.failures_in(Stage::Discovery).count(), 1);
        assert!(report.sources.is_empty());
        assert!(root.join("docs").is_dir());
    }
}
