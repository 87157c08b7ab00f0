//! Single page conversion.

use std::fs;
use std::path::{Path, PathBuf};

use mdsite_markdown::{render_fragment, Fixups};

use crate::config::SiteConfig;
use crate::error::BuildError;
use crate::template::Template;

/// Converts Markdown sources into finished pages.
pub struct Converter<'a> {
    config: &'a SiteConfig,
    template: &'a Template,
    fixups: Fixups,
}

impl<'a> Converter<'a> {
    pub fn new(config: &'a SiteConfig, template: &'a Template) -> Self {
        Self {
            config,
            template,
            fixups: config.fixups(),
        }
    }

    /// Convert one source (relative to the source root) and write its page.
    ///
    /// Returns the path written. A failed write may leave a partial file
    /// behind.
    pub fn convert(&self, source: &Path) -> Result<PathBuf, BuildError> {
        tracing::info!("Converting {} to HTML", source.display());

        let destination = self.config.output_path(source);

        match self.convert_to(source, &destination) {
            Ok(()) => {
                tracing::info!("{} written!", destination.display());
                Ok(destination)
            }
            Err(e) => {
                tracing::error!("Failed to convert {} to HTML: {}", source.display(), e);
                Err(e)
            }
        }
    }

    fn convert_to(&self, source: &Path, destination: &Path) -> Result<(), BuildError> {
        let input = self.config.source_dir.join(source);
        let markdown = fs::read_to_string(&input).map_err(|e| BuildError::Read {
            path: input.clone(),
            source: e,
        })?;

        let page = self.render_page(&markdown);

        fs::write(destination, page).map_err(|e| BuildError::Write {
            path: destination.to_path_buf(),
            source: e,
        })
    }

    /// Render Markdown into a complete page.
    pub fn render_page(&self, markdown: &str) -> String {
        let fragment = render_fragment(markdown);
        let fragment = self.fixups.apply(&fragment);
        let body = self.config.head.apply(&fragment);
        self.template.render(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const TEMPLATE: &str = "<html><body>{{ BODY }}</body></html>";

    #[test]
    fn renders_page_without_head_marker() {
        let config = SiteConfig::default();
        let template = Template::from_string(TEMPLATE, "{{ BODY }}");
        let converter = Converter::new(&config, &template);

        assert_eq!(
            converter.render_page("# Title\n\nHello **world**."),
            "<html><body></div></div><h1>Title</h1>\n<p>Hello <strong>world</strong>.</p></body></html>"
        );
    }

    #[test]
    fn closes_head_at_marker() {
        let config = SiteConfig::default();
        let template = Template::from_string(TEMPLATE, "{{ BODY }}");
        let converter = Converter::new(&config, &template);

        let page = converter.render_page("# Site\n\n<!-- EndHead -->\n\nBody text");

        assert_eq!(
            page,
            "<html><body><h1>Site</h1>\n</div></div>\n<p>Body text</p></body></html>"
        );
        assert_eq!(page.matches("</div></div>").count(), 1);
    }

    #[test]
    fn applies_fixups_in_order() {
        let config = SiteConfig::default();
        let template = Template::from_string("{{ BODY }}", "{{ BODY }}");
        let converter = Converter::new(&config, &template);

        let page = converter.render_page("See [intro](./docs/guide/intro.html) and `code`.");

        assert_eq!(
            page,
            "</div></div><p>See <a href=\"guide/intro.html\">intro</a> and <pre>code</pre>.</p>"
        );
    }

    #[test]
    fn writes_page_to_mirrored_path() {
        let temp = tempdir().unwrap();
        let config = SiteConfig::rooted(temp.path());
        fs::create_dir_all(temp.path().join("guide")).unwrap();
        fs::create_dir_all(config.output_dir.join("guide")).unwrap();
        fs::write(temp.path().join("guide/intro.md"), "Intro").unwrap();

        let template = Template::from_string("{{ BODY }}", "{{ BODY }}");
        let written = Converter::new(&config, &template)
            .convert(Path::new("guide/intro.md"))
            .unwrap();

        assert_eq!(written, config.output_dir.join("guide/intro.html"));
        assert_eq!(
            fs::read_to_string(&written).unwrap(),
            "</div></div><p>Intro</p>"
        );
    }

    #[test]
    fn missing_source_is_a_read_error() {
        let temp = tempdir().unwrap();
        let config = SiteConfig::rooted(temp.path());
        let template = Template::from_string("{{ BODY }}", "{{ BODY }}");

        let result = Converter::new(&config, &template).convert(Path::new("gone.md"));

        assert!(matches!(result, Err(BuildError::Read { .. })));
    }

    #[test]
    fn invalid_utf8_is_a_read_error() {
        let temp = tempdir().unwrap();
        let config = SiteConfig::rooted(temp.path());
        fs::write(temp.path().join("bad.md"), [0xffu8, 0xfe, 0x00]).unwrap();
        let template = Template::from_string("{{ BODY }}", "{{ BODY }}");

        let result = Converter::new(&config, &template).convert(Path::new("bad.md"));

        assert!(matches!(result, Err(BuildError::Read { .. })));
    }

    #[test]
    fn missing_output_directory_is_a_write_error() {
        let temp = tempdir().unwrap();
        let config = SiteConfig::rooted(temp.path());
        fs::write(temp.path().join("page.md"), "text").unwrap();
        let template = Template::from_string("{{ BODY }}", "{{ BODY }}");

        let result = Converter::new(&config, &template).convert(Path::new("page.md"));

        assert!(matches!(result, Err(BuildError::Write { .. })));
    }
}
