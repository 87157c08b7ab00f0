//! Markdown rendering for mdsite pages.
//!
//! Renders Markdown into HTML fragments with attribute lists, Markdown inside
//! HTML blocks, tables and fenced code blocks, and applies the textual fixups
//! a fragment goes through before it is placed in the page template.

pub mod attrs;
pub mod fixups;
pub mod html_blocks;
pub mod render;
mod util;

pub use attrs::AttrList;
pub use fixups::{CodeTagPolicy, Fixups, HeadStitch};
pub use html_blocks::expand_markdown_blocks;
pub use render::render_fragment;
pub use util::escape_html;
