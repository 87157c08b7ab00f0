//! Site build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use mdsite_build::{SiteBuilder, SiteConfig};
use mdsite_markdown::{CodeTagPolicy, HeadStitch};
use serde::Deserialize;

/// Configuration file structure (mdsite.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    site: SiteSettings,
    #[serde(default)]
    render: RenderSettings,
}

#[derive(Debug, Deserialize, Default)]
struct SiteSettings {
    source: Option<PathBuf>,
    output: Option<PathBuf>,
    template: Option<PathBuf>,
    marker: Option<String>,
    #[serde(rename = "static")]
    static_dir: Option<PathBuf>,
    index_source: Option<PathBuf>,
    index_output: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct RenderSettings {
    link_prefix: Option<String>,
    code_tags: Option<CodeTagPolicy>,
    head: Option<HeadStitch>,
}

fn parse_config(content: &str) -> Result<ConfigFile> {
    toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config = parse_config(&content)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

fn site_config(file: ConfigFile, output: Option<PathBuf>) -> SiteConfig {
    let defaults = SiteConfig::default();
    let site = file.site;
    let render = file.render;

    SiteConfig {
        source_dir: site.source.unwrap_or(defaults.source_dir),
        output_dir: output.or(site.output).unwrap_or(defaults.output_dir),
        template: site.template.unwrap_or(defaults.template),
        marker: site.marker.unwrap_or(defaults.marker),
        static_dir: site.static_dir.unwrap_or(defaults.static_dir),
        index_source: site.index_source.unwrap_or(defaults.index_source),
        index_output: site.index_output.unwrap_or(defaults.index_output),
        link_prefix: render.link_prefix,
        code_tags: render.code_tags.unwrap_or(defaults.code_tags),
        head: render.head.unwrap_or(defaults.head),
    }
}

/// Run the build command.
pub fn run(config_path: &Path, output: Option<PathBuf>, strict: bool) -> Result<()> {
    let config = site_config(load_config(config_path)?, output);

    let report = SiteBuilder::new(config).build();

    tracing::info!(
        "Built {} of {} pages in {}ms",
        report.pages_written(),
        report.sources.len(),
        report.duration_ms
    );
    tracing::info!("Output: {}", report.output_dir.display());

    if !report.is_success() {
        for failure in &report.failures {
            match &failure.source {
                Some(source) => {
                    tracing::warn!("[{}] {}: {}", failure.stage, source.display(), failure.error)
                }
                None => tracing::warn!("[{}] {}", failure.stage, failure.error),
            }
        }
        if strict {
            anyhow::bail!("Build finished with {} failure(s)", report.failures.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gives_defaults() {
        let config = site_config(parse_config("").unwrap(), None);

        assert_eq!(config.source_dir, PathBuf::from("."));
        assert_eq!(config.output_dir, PathBuf::from("docs"));
        assert_eq!(config.template, PathBuf::from("template.html"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.code_tags, CodeTagPolicy::Global);
        assert_eq!(config.head, HeadStitch::default());
    }

    #[test]
    fn reads_site_and_render_sections() {
        let file = parse_config(
            r#"
[site]
output = "public"
static = "assets"
marker = "<!-- BODY -->"

[render]
code_tags = "inline-only"

[render.head]
closing = "</div>"
"#,
        )
        .unwrap();

        let config = site_config(file, None);

        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert_eq!(config.static_dir, PathBuf::from("assets"));
        assert_eq!(config.marker, "<!-- BODY -->");
        assert_eq!(config.code_tags, CodeTagPolicy::InlineOnly);
        assert_eq!(config.head.closing, "</div>");
        assert_eq!(config.head.marker, "<!-- EndHead -->");
        assert_eq!(config.link_prefix(), "./public/");
    }

    #[test]
    fn output_flag_overrides_config() {
        let file = parse_config("[site]\noutput = \"public\"\n").unwrap();

        let config = site_config(file, Some(PathBuf::from("out")));

        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn rejects_malformed_config() {
        assert!(parse_config("[site\noutput = 1").is_err());
        assert!(parse_config("[render]\ncode_tags = \"sometimes\"").is_err());
    }

    #[test]
    fn missing_config_file_is_fine() {
        let temp = tempfile::tempdir().unwrap();

        let file = load_config(&temp.path().join("mdsite.toml")).unwrap();

        assert!(file.site.output.is_none());
    }
}
