//! Markdown to HTML fragment rendering.

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd, TextMergeStream};

use crate::attrs::apply_attr_lists;
use crate::html_blocks::expand_markdown_blocks;
use crate::util::escape_html;

/// Render Markdown source to an HTML fragment.
///
/// Enabled syntax on top of CommonMark: attribute lists, Markdown inside
/// `markdown="1"` HTML blocks, tables, and fenced code blocks. A fence's
/// language is carried on the outer `<pre>` as `class="language-X"` and the
/// inner element is a bare `<code>`. Trailing newlines are trimmed.
pub fn render_fragment(source: &str) -> String {
    let source = expand_markdown_blocks(source);

    let parser = Parser::new_ext(&source, Options::ENABLE_TABLES);
    let events = apply_attr_lists(TextMergeStream::new(parser));

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter().map(code_block_tags));

    let trimmed = html_output.trim_end_matches('\n').len();
    html_output.truncate(trimmed);
    html_output
}

fn code_block_tags(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Start(Tag::CodeBlock(kind)) => {
            let language = match &kind {
                CodeBlockKind::Fenced(info) => info.split_whitespace().next().unwrap_or(""),
                CodeBlockKind::Indented => "",
            };
            let open = if language.is_empty() {
                "<pre><code>".to_string()
            } else {
                format!("<pre class=\"language-{}\"><code>", escape_html(language))
            };
            Event::Html(open.into())
        }
        Event::End(TagEnd::CodeBlock) => Event::Html("</code></pre>\n".into()),
        other => other,
    }
}
