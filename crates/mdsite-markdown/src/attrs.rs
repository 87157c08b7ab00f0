//! Attribute lists.
//!
//! An attribute list is a brace block such as `{: #intro .lead data-x="1" }`
//! that sets HTML attributes on the element it is attached to:
//!
//! - at the end of a heading line: `# Title {: #intro }`
//! - on its own last line of a paragraph
//! - directly after a link, image, emphasis or strong span: `[home](/){: .nav }`
//!
//! The leading colon is optional when the list starts with an id or class.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::{Captures, Regex};

use crate::util::{escape_href, escape_html};

static TRAILING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]*\{(:)?[ \t]*([^{}\n]*?)[ \t]*\}[ \t]*$").expect("valid trailing pattern")
});

static LEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{(:)?[ \t]*([^{}\n]*?)[ \t]*\}").expect("valid leading pattern")
});

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"([A-Za-z_:][\w:.-]*)=(?:"([^"]*)"|'([^']*)'|([^\s"']+))|#([^\s"'=]+)|\.([^\s"'=]+)|([^\s"'=]+)"#,
    )
    .expect("valid token pattern")
});

static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_:][\w:.-]*$").expect("valid name pattern"));

/// Attributes parsed from an attribute list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrList {
    /// Element id (`#id` or `id=...`)
    pub id: Option<String>,
    /// Classes in declaration order
    pub classes: Vec<String>,
    /// Remaining `key=value` pairs
    pub attrs: Vec<(String, String)>,
}

impl AttrList {
    /// Parse the body of an attribute list (the text between the braces).
    pub fn parse(body: &str) -> Self {
        let mut list = Self::default();

        for caps in TOKEN.captures_iter(body) {
            if let Some(key) = caps.get(1) {
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map_or("", |m| m.as_str());
                list.set(key.as_str(), value);
            } else if let Some(id) = caps.get(5) {
                list.id = Some(id.as_str().to_string());
            } else if let Some(class) = caps.get(6) {
                list.classes.push(class.as_str().to_string());
            } else if let Some(word) = caps.get(7).filter(|m| NAME.is_match(m.as_str())) {
                list.set(word.as_str(), word.as_str());
            }
        }

        list
    }

    /// Find an attribute list at the end of `text`.
    ///
    /// Returns the byte offset where the list (including leading blanks)
    /// starts, and the parsed attributes.
    pub fn trailing(text: &str) -> Option<(usize, Self)> {
        let caps = TRAILING.captures(text)?;
        let start = caps.get(0)?.start();
        accept(&caps).map(|list| (start, list))
    }

    /// Find an attribute list at the very start of `text`.
    ///
    /// Returns the byte offset just past the closing brace, and the parsed
    /// attributes.
    pub fn leading(text: &str) -> Option<(usize, Self)> {
        let caps = LEADING.captures(text)?;
        let end = caps.get(0)?.end();
        accept(&caps).map(|list| (end, list))
    }

    /// Check whether the list sets nothing.
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    /// Render as HTML attributes, each preceded by a space.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(id) = &self.id {
            out.push_str(&format!(" id=\"{}\"", escape_html(id)));
        }
        if !self.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape_html(&self.classes.join(" "))));
        }
        for (key, value) in &self.attrs {
            out.push_str(&format!(" {}=\"{}\"", key, escape_html(value)));
        }
        out
    }

    fn set(&mut self, key: &str, value: &str) {
        match key {
            "id" => self.id = Some(value.to_string()),
            "class" => self
                .classes
                .extend(value.split_whitespace().map(str::to_string)),
            _ => self.attrs.push((key.to_string(), value.to_string())),
        }
    }
}

/// Without the colon, only lists that open with an id or class count.
fn accept(caps: &Captures<'_>) -> Option<AttrList> {
    let body = caps.get(2).map_or("", |m| m.as_str());
    let has_colon = caps.get(1).is_some();
    if !has_colon && !(body.starts_with('#') || body.starts_with('.')) {
        return None;
    }
    Some(AttrList::parse(body))
}

/// Attach attribute lists found in an event stream to their elements.
///
/// Attribute list text is removed from the stream. Headings keep their
/// start tag (pulldown-cmark renders its id, classes and attributes);
/// other decorated elements are replaced by raw HTML start tags.
pub(crate) fn apply_attr_lists<'a>(events: impl IntoIterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out: Vec<Event<'a>> = Vec::new();
    let mut blocks: Vec<usize> = Vec::new();
    let mut inlines: Vec<usize> = Vec::new();
    let mut just_closed: Option<usize> = None;

    for event in events {
        let closed = just_closed.take();

        match event {
            Event::Start(tag @ (Tag::Heading { .. } | Tag::Paragraph)) => {
                blocks.push(out.len());
                out.push(Event::Start(tag));
            }

            Event::Start(tag @ (Tag::Link { .. } | Tag::Image { .. } | Tag::Emphasis | Tag::Strong)) => {
                inlines.push(out.len());
                out.push(Event::Start(tag));
            }

            Event::End(end @ (TagEnd::Link | TagEnd::Image | TagEnd::Emphasis | TagEnd::Strong)) => {
                out.push(Event::End(end));
                just_closed = inlines.pop();
            }

            Event::End(end @ (TagEnd::Heading(_) | TagEnd::Paragraph)) => {
                if let Some(start) = blocks.pop() {
                    attach_block_attrs(&mut out, start);
                }
                out.push(Event::End(end));
            }

            Event::Text(text) => match closed.zip(AttrList::leading(&text)) {
                Some((start, (end, list))) => {
                    attach_inline_attrs(&mut out, start, &list);
                    if end < text.len() {
                        out.push(Event::Text(text[end..].to_string().into()));
                    }
                }
                None => out.push(Event::Text(text)),
            },

            other => out.push(other),
        }
    }

    out
}

fn attach_block_attrs(out: &mut Vec<Event<'_>>, start: usize) {
    let is_heading = matches!(out[start], Event::Start(Tag::Heading { .. }));

    let Some(Event::Text(text)) = out.last() else {
        return;
    };
    let Some((at, list)) = AttrList::trailing(text) else {
        return;
    };

    if is_heading {
        let kept = text[..at].to_string();
        out.pop();
        if !kept.is_empty() {
            out.push(Event::Text(kept.into()));
        }

        if let Event::Start(Tag::Heading {
            id, classes, attrs, ..
        }) = &mut out[start]
        {
            if let Some(value) = list.id {
                *id = Some(value.into());
            }
            classes.extend(list.classes.into_iter().map(CowStr::from));
            attrs.extend(
                list.attrs
                    .into_iter()
                    .map(|(key, value)| (CowStr::from(key), Some(CowStr::from(value)))),
            );
        }
        return;
    }

    // Paragraph lists must sit alone on the last line.
    if at != 0 || out.len() < start + 4 {
        return;
    }
    if !matches!(out[out.len() - 2], Event::SoftBreak) {
        return;
    }
    out.truncate(out.len() - 2);
    out[start] = Event::Html(format!("<p{}>", list.to_html()).into());
}

fn attach_inline_attrs(out: &mut Vec<Event<'_>>, start: usize, list: &AttrList) {
    let extra = list.to_html();

    let (html, collapse) = match &out[start] {
        Event::Start(Tag::Emphasis) => (format!("<em{extra}>"), false),
        Event::Start(Tag::Strong) => (format!("<strong{extra}>"), false),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            ..
        }) => {
            let scheme = if matches!(link_type, LinkType::Email) {
                "mailto:"
            } else {
                ""
            };
            (
                format!(
                    "<a href=\"{}{}\"{}{}>",
                    scheme,
                    escape_href(dest_url),
                    title_attr(title),
                    extra
                ),
                false,
            )
        }
        Event::Start(Tag::Image { dest_url, title, .. }) => {
            let alt: String = out[start + 1..]
                .iter()
                .filter_map(|event| match event {
                    Event::Text(text) | Event::Code(text) => Some(&**text),
                    _ => None,
                })
                .collect();
            (
                format!(
                    "<img src=\"{}\" alt=\"{}\"{}{} />",
                    escape_href(dest_url),
                    escape_html(&alt),
                    title_attr(title),
                    extra
                ),
                true,
            )
        }
        _ => return,
    };

    if collapse {
        out.truncate(start);
        out.push(Event::InlineHtml(html.into()));
    } else {
        out[start] = Event::InlineHtml(html.into());
    }
}

fn title_attr(title: &str) -> String {
    if title.is_empty() {
        String::new()
    } else {
        format!(" title=\"{}\"", escape_html(title))
    }
}
