//! Textual fixups applied to a rendered fragment before templating.

use serde::Deserialize;

const CODE_OPEN: &str = "<code>";
const CODE_CLOSE: &str = "</code>";
const PRE_OPEN: &str = "<pre>";
const PRE_CLOSE: &str = "</pre>";

/// Where `<code>` tags are rewritten to `<pre>` tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeTagPolicy {
    /// Every occurrence, including those inside fenced code blocks, which
    /// end up as a nested `<pre>` pair.
    #[default]
    Global,
    /// Only occurrences outside an existing `<pre>` element.
    InlineOnly,
}

/// Link and code-tag rewrites applied in order to every fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixups {
    /// Relative link prefix pointing at the output root, e.g. `./docs/`.
    pub link_prefix: String,
    pub code_tags: CodeTagPolicy,
}

impl Fixups {
    pub fn new(link_prefix: impl Into<String>, code_tags: CodeTagPolicy) -> Self {
        Self {
            link_prefix: link_prefix.into(),
            code_tags,
        }
    }

    pub fn apply(&self, fragment: &str) -> String {
        let html = strip_link_prefix(fragment, &self.link_prefix);
        match self.code_tags {
            CodeTagPolicy::Global => html.replace(CODE_OPEN, PRE_OPEN).replace(CODE_CLOSE, PRE_CLOSE),
            CodeTagPolicy::InlineOnly => replace_code_outside_pre(&html),
        }
    }
}

impl Default for Fixups {
    fn default() -> Self {
        Self::new("./docs/", CodeTagPolicy::default())
    }
}

/// Closes the container elements the page template leaves open for the
/// head section of every page.
///
/// A fragment that contains `marker` has every occurrence replaced with
/// `closing`; any other fragment gets `closing` prepended once, so page
/// content always starts after the head containers are closed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeadStitch {
    pub marker: String,
    pub closing: String,
}

impl HeadStitch {
    pub fn apply(&self, fragment: &str) -> String {
        if !self.marker.is_empty() && fragment.contains(&self.marker) {
            fragment.replace(&self.marker, &self.closing)
        } else {
            format!("{}{}", self.closing, fragment)
        }
    }
}

impl Default for HeadStitch {
    fn default() -> Self {
        Self {
            marker: "<!-- EndHead -->".to_string(),
            closing: "</div></div>".to_string(),
        }
    }
}

/// Remove `prefix` until none is left, so removal cannot splice a new one.
fn strip_link_prefix(html: &str, prefix: &str) -> String {
    let mut out = html.to_string();
    if prefix.is_empty() {
        return out;
    }
    while out.contains(prefix) {
        out = out.replace(prefix, "");
    }
    out
}

fn replace_code_outside_pre(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut depth = 0usize;
    let mut rest = html;

    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        let (emit, consumed) = if depth == 0 && tail.starts_with(CODE_OPEN) {
            (PRE_OPEN, CODE_OPEN.len())
        } else if depth == 0 && tail.starts_with(CODE_CLOSE) {
            (PRE_CLOSE, CODE_CLOSE.len())
        } else if is_pre_open(tail) {
            depth += 1;
            ("<", 1)
        } else if tail.starts_with(PRE_CLOSE) {
            depth = depth.saturating_sub(1);
            (PRE_CLOSE, PRE_CLOSE.len())
        } else {
            ("<", 1)
        };

        out.push_str(emit);
        rest = &tail[consumed..];
    }

    out.push_str(rest);
    out
}

fn is_pre_open(tail: &str) -> bool {
    tail.strip_prefix("<pre")
        .and_then(|after| after.chars().next())
        .is_some_and(|c| c == '>' || c.is_whitespace())
}
