//! Plain-text projection of a thought's rich body.
//!
//! A thought's `formattedBody` is Markdown. Lists, previews and search work on
//! `body`, which is derived here and rewritten every time the formatted body
//! changes:
//!
//! - Text, inline code and code blocks are kept verbatim.
//! - Emphasis, links, heading markers and other markup are dropped.
//! - The end of each block (paragraph, heading, list item, code block)
//!   becomes a line break; soft and hard breaks become line breaks too.
//! - Runs of blank lines collapse and the result is trimmed.

use pulldown_cmark::{Event, Options, Parser, TagEnd};

pub fn plain_text(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());

    for event in Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock) => {
                out.push('\n')
            }
            _ => {}
        }
    }

    collapse_blank_lines(&out)
}

fn collapse_blank_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        if line.is_empty() && lines.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_inline_markup() {
        assert_eq!(
            plain_text("Some **bold** and _italic_ with `code`"),
            "Some bold and italic with code"
        );
    }

    #[test]
    fn blocks_become_lines() {
        let md = "# Title\n\nFirst paragraph.\n\n- one\n- two\n";
        assert_eq!(plain_text(md), "Title\nFirst paragraph.\none\ntwo");
    }

    #[test]
    fn links_keep_their_text() {
        assert_eq!(plain_text("see [the docs](https://example.com)"), "see the docs");
    }

    #[test]
    fn plain_input_is_unchanged() {
        assert_eq!(plain_text("Handle your thought"), "Handle your thought");
    }

    #[test]
    fn empty_input_projects_to_empty() {
        assert_eq!(plain_text(""), "");
        assert_eq!(plain_text("\n\n   \n"), "");
    }
}
