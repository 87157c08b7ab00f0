//! Markdown inside HTML blocks.
//!
//! CommonMark passes an HTML block through untouched until the next blank
//! line. An opening tag carrying `markdown="1"` (or `"block"` / `"span"`)
//! asks for its content to be rendered as Markdown instead, so the tag line
//! and its matching closing tag are split onto lines of their own, separated
//! from the content by blank lines, and the attribute is dropped.

use std::sync::LazyLock;

use regex::Regex;

static MARKDOWN_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^([ \t]*)<([A-Za-z][A-Za-z0-9-]*)([^>]*?)\s+markdown\s*=\s*["']?(?:1|block|span)["']?([^>]*)>(.*)$"#,
    )
    .expect("valid markdown block pattern")
});

/// An HTML element whose content is being rendered as Markdown.
struct Frame {
    indent: String,
    depth: usize,
    open: Regex,
    close: Regex,
}

impl Frame {
    fn new(tag: &str, indent: &str) -> Option<Self> {
        let tag = regex::escape(tag);
        Some(Self {
            indent: indent.to_string(),
            depth: 1,
            open: Regex::new(&format!(r"<{tag}\b")).ok()?,
            close: Regex::new(&format!(r"</{tag}\s*>")).ok()?,
        })
    }

    /// Track nesting on one line; returns the offset of the closing tag
    /// that ends this element, if it is on this line.
    fn scan(&mut self, line: &str) -> Option<usize> {
        let mut marks: Vec<(usize, bool)> = self
            .open
            .find_iter(line)
            .map(|m| (m.start(), true))
            .chain(self.close.find_iter(line).map(|m| (m.start(), false)))
            .collect();
        marks.sort_unstable();

        for (pos, is_open) in marks {
            if is_open {
                self.depth += 1;
            } else {
                self.depth -= 1;
                if self.depth == 0 {
                    return Some(pos);
                }
            }
        }
        None
    }
}

/// Rewrite `source` so `markdown="..."` HTML blocks get their content parsed
/// as Markdown. Fenced code blocks are left untouched.
pub fn expand_markdown_blocks(source: &str) -> String {
    if !source.contains("markdown") {
        return source.to_string();
    }

    let mut out: Vec<String> = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();
    let mut fence: Option<String> = None;

    for line in source.lines() {
        let trimmed = line.trim_start();

        // Fenced code passes through verbatim.
        if let Some(marker) = &fence {
            if closes_fence(trimmed, marker) {
                fence = None;
            }
            out.push(dedent(line, &frames));
            continue;
        }
        if let Some(marker) = fence_marker(trimmed) {
            fence = Some(marker);
            out.push(dedent(line, &frames));
            continue;
        }

        if let Some(caps) = MARKDOWN_OPEN.captures(line) {
            let indent = &caps[1];
            let tag = &caps[2];
            if let Some(frame) = Frame::new(tag, indent) {
                out.push(dedent(&format!("{indent}<{tag}{}{}>", &caps[3], &caps[4]), &frames));
                out.push(String::new());
                frames.push(frame);

                let rest = caps[5].to_string();
                if !rest.trim().is_empty() {
                    close_or_push(&mut out, &mut frames, &rest);
                }
                continue;
            }
        }

        if frames.is_empty() {
            out.push(line.to_string());
        } else {
            close_or_push(&mut out, &mut frames, line);
        }
    }

    let mut expanded = out.join("\n");
    if source.ends_with('\n') {
        expanded.push('\n');
    }
    expanded
}

/// Push a content line, splitting off the closing tag of the innermost
/// frame when it appears on this line.
fn close_or_push(out: &mut Vec<String>, frames: &mut Vec<Frame>, line: &str) {
    let closed_at = frames.last_mut().and_then(|frame| frame.scan(line));

    let Some(pos) = closed_at else {
        out.push(dedent(line, frames));
        return;
    };

    let (content, closing) = line.split_at(pos);
    if !content.trim().is_empty() {
        out.push(dedent(content, frames));
    }

    if let Some(frame) = frames.pop() {
        out.push(String::new());
        out.push(dedent(&format!("{}{}", frame.indent, closing.trim_start()), frames));
        out.push(String::new());
    }
}

/// Strip the indentation of the innermost open element from a content line.
fn dedent(line: &str, frames: &[Frame]) -> String {
    match frames.last() {
        Some(frame) => line
            .strip_prefix(frame.indent.as_str())
            .unwrap_or(line)
            .to_string(),
        None => line.to_string(),
    }
}

fn fence_marker(trimmed: &str) -> Option<String> {
    for fence_char in ['`', '~'] {
        let len = trimmed.chars().take_while(|c| *c == fence_char).count();
        if len >= 3 {
            return Some(fence_char.to_string().repeat(len));
        }
    }
    None
}

/// A closing fence is a run of at least as many fence characters as the
/// opening one, with nothing after it.
fn closes_fence(trimmed: &str, marker: &str) -> bool {
    let Some(fence_char) = marker.chars().next() else {
        return false;
    };
    let rest = trimmed.trim_start_matches(fence_char);
    trimmed.len() - rest.len() >= marker.len() && rest.trim().is_empty()
}
