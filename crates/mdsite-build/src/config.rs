//! Build configuration.

use std::path::{Path, PathBuf};

use mdsite_markdown::{CodeTagPolicy, Fixups, HeadStitch};

/// Configuration for building a site.
///
/// The defaults describe the conventional layout: Markdown under the
/// working directory, pages written to `docs/`, `template.html` as the page
/// template, `static/` copied to `docs/static/`, and `README.md` published
/// as `docs/index.html`.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Root scanned for Markdown sources
    pub source_dir: PathBuf,

    /// Output root
    pub output_dir: PathBuf,

    /// Page template file
    pub template: PathBuf,

    /// Marker in the template replaced by the page body
    pub marker: String,

    /// Static assets directory copied into the output root
    pub static_dir: PathBuf,

    /// Source (relative to `source_dir`) published as the site index
    pub index_source: PathBuf,

    /// Site index file name (relative to `output_dir`)
    pub index_output: PathBuf,

    /// Link prefix stripped from fragments; defaults to `./<output name>/`
    pub link_prefix: Option<String>,

    pub code_tags: CodeTagPolicy,

    pub head: HeadStitch,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("docs"),
            template: PathBuf::from("template.html"),
            marker: "{{ BODY }}".to_string(),
            static_dir: PathBuf::from("static"),
            index_source: PathBuf::from("README.md"),
            index_output: PathBuf::from("index.html"),
            link_prefix: None,
            code_tags: CodeTagPolicy::default(),
            head: HeadStitch::default(),
        }
    }
}

impl SiteConfig {
    /// Output path for a source path relative to `source_dir`.
    pub fn output_path(&self, source: &Path) -> PathBuf {
        if source == self.index_source.as_path() {
            return self.output_dir.join(&self.index_output);
        }
        self.output_dir.join(source).with_extension("html")
    }

    /// Link prefix pointing at the output root.
    pub fn link_prefix(&self) -> String {
        if let Some(prefix) = &self.link_prefix {
            return prefix.clone();
        }

        let name = self
            .output_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if name.is_empty() {
            String::new()
        } else {
            format!("./{}/", name)
        }
    }

    pub fn fixups(&self) -> Fixups {
        Fixups::new(self.link_prefix(), self.code_tags)
    }

    /// Rooted config: every path resolved against `root`.
    pub fn rooted(root: &Path) -> Self {
        let defaults = Self::default();
        Self {
            source_dir: root.to_path_buf(),
            output_dir: root.join(&defaults.output_dir),
            template: root.join(&defaults.template),
            static_dir: root.join(&defaults.static_dir),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_sources_under_output_root() {
        let config = SiteConfig::default();

        assert_eq!(
            config.output_path(Path::new("guide/intro.md")),
            PathBuf::from("docs/guide/intro.html")
        );
        assert_eq!(
            config.output_path(Path::new("notes.md")),
            PathBuf::from("docs/notes.html")
        );
    }

    #[test]
    fn root_readme_maps_to_site_index() {
        let config = SiteConfig::default();

        assert_eq!(
            config.output_path(Path::new("README.md")),
            PathBuf::from("docs/index.html")
        );
        assert_eq!(
            config.output_path(Path::new("guide/README.md")),
            PathBuf::from("docs/guide/README.html")
        );
    }

    #[test]
    fn derives_link_prefix_from_output_name() {
        let mut config = SiteConfig::default();
        assert_eq!(config.link_prefix(), "./docs/");

        config.output_dir = PathBuf::from("/tmp/site/public");
        assert_eq!(config.link_prefix(), "./public/");

        config.link_prefix = Some("../".to_string());
        assert_eq!(config.link_prefix(), "../");
    }

    #[test]
    fn rooted_config_resolves_paths() {
        let config = SiteConfig::rooted(Path::new("/work"));

        assert_eq!(config.output_dir, PathBuf::from("/work/docs"));
        assert_eq!(config.template, PathBuf::from("/work/template.html"));
        assert_eq!(config.static_dir, PathBuf::from("/work/static"));
        assert_eq!(config.index_source, PathBuf::from("README.md"));
        assert_eq!(config.link_prefix(), "./docs/");
    }
}
