use colored::*;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

const FENCE: &str = "```";
const THEME: &str = "Solarized (dark)";

enum Block {
    Prose,
    Code {
        lang: Option<String>,
        content: String,
        shown_lines: usize,
    },
}

/// Incremental renderer for streamed markdown.
///
/// Prose passes through as soon as it arrives. Fenced code blocks are framed
/// and syntax highlighted one complete line at a time.
pub struct MarkdownStream {
    pending: String,
    block: Block,
    syntax_set: SyntaxSet,
    theme: Option<Theme>,
}

impl Default for MarkdownStream {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownStream {
    pub fn new() -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        Self {
            pending: String::new(),
            block: Block::Prose,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme: themes.remove(THEME),
        }
    }

    /// Feed a text increment and get back what can be printed now
    pub fn push(&mut self, text: &str) -> String {
        self.pending.push_str(text);
        let mut output = String::new();

        loop {
            if !matches!(self.block, Block::Code { .. }) {
                let Some(start) = self.pending.find(FENCE) else {
                    // Hold back a trailing backtick run; it may be half a fence.
                    let split = self.pending.len() - trailing_backticks(&self.pending);
                    output.push_str(&self.pending[..split]);
                    self.pending.drain(..split);
                    break;
                };
                let after_fence = start + FENCE.len();
                let Some(newline) = self.pending[after_fence..].find('\n') else {
                    // Language line incomplete
                    output.push_str(&self.pending[..start]);
                    self.pending.drain(..start);
                    break;
                };

                output.push_str(&self.pending[..start]);
                let lang = self.pending[after_fence..after_fence + newline].trim();
                let lang = (!lang.is_empty()).then(|| lang.to_string());
                output.push_str(&code_header(lang.as_deref()));
                self.pending.drain(..after_fence + newline + 1);
                self.block = Block::Code {
                    lang,
                    content: String::new(),
                    shown_lines: 0,
                };
            } else if let Some(end) = self.pending.find(FENCE) {
                let body: String = self.pending.drain(..end + FENCE.len()).collect();
                self.append_code(&body[..end]);
                output.push_str(&self.flush_code_lines(true));
                output.push_str(&code_footer());
                self.block = Block::Prose;
            } else {
                let split = self.pending.len() - trailing_backticks(&self.pending);
                let body: String = self.pending.drain(..split).collect();
                self.append_code(&body);
                output.push_str(&self.flush_code_lines(false));
                break;
            }
        }

        output
    }

    /// Emit everything still buffered, closing an unterminated code block
    pub fn finish(&mut self) -> String {
        let mut output = String::new();
        let rest = std::mem::take(&mut self.pending);

        if let Block::Code { .. } = self.block {
            self.append_code(&rest);
            output.push_str(&self.flush_code_lines(true));
            output.push_str(&code_footer());
        } else {
            output.push_str(&rest);
        }

        self.block = Block::Prose;
        output
    }

    /// Render a complete message; the stream is ready for the next one afterwards
    pub fn render(&mut self, text: &str) -> String {
        let mut output = self.push(text);
        output.push_str(&self.finish());
        output
    }

    fn append_code(&mut self, text: &str) {
        if let Block::Code { content, .. } = &mut self.block {
            content.push_str(text);
        }
    }

    /// Highlight lines not shown yet. The last line is held back unless
    /// `all` is set, since more of it may still arrive.
    fn flush_code_lines(&mut self, all: bool) -> String {
        let Block::Code {
            lang,
            content,
            shown_lines,
        } = &mut self.block
        else {
            return String::new();
        };

        let lines: Vec<&str> = content.lines().collect();
        let complete = if all || content.ends_with('\n') {
            lines.len()
        } else {
            lines.len().saturating_sub(1)
        };
        if complete <= *shown_lines {
            return String::new();
        }

        let fresh = lines[*shown_lines..complete].join("\n") + "\n";
        *shown_lines = complete;
        highlight(&self.syntax_set, self.theme.as_ref(), &fresh, lang.as_deref())
    }
}

fn trailing_backticks(text: &str) -> usize {
    text.chars().rev().take_while(|&c| c == '`').count().min(FENCE.len() - 1)
}

fn code_header(lang: Option<&str>) -> String {
    format!(
        "{}[{}]{}\n",
        "┌─".dimmed(),
        lang.unwrap_or("code").cyan(),
        "─".repeat(49).dimmed()
    )
}

fn code_footer() -> String {
    format!("{}\n", format!("└{}", "─".repeat(58)).dimmed())
}

fn highlight(syntax_set: &SyntaxSet, theme: Option<&Theme>, code: &str, lang: Option<&str>) -> String {
    let Some(theme) = theme else {
        return code.to_string();
    };

    let syntax = lang
        .and_then(|lang| {
            syntax_set
                .find_syntax_by_token(lang)
                .or_else(|| syntax_set.find_syntax_by_extension(lang))
        })
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text());

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut output = String::new();
    for line in LinesWithEndings::from(code) {
        match highlighter.highlight_line(line, syntax_set) {
            Ok(ranges) => output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false)),
            Err(_) => output.push_str(line),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn prose_passes_straight_through() {
        plain();
        let mut stream = MarkdownStream::new();
        assert_eq!(stream.push("Hello "), "Hello ");
        assert_eq!(stream.push("world"), "world");
        assert_eq!(stream.finish(), "");
    }

    #[test]
    fn split_fence_is_held_until_complete() {
        plain();
        let mut stream = MarkdownStream::new();

        let first = stream.push("see ``");
        assert_eq!(first, "see ");

        let second = stream.push("`rust\nfn main() {}\n```\ndone");
        assert!(second.contains("[rust]"));
        assert!(second.contains("main"));
        assert!(second.ends_with("done"));
    }

    #[test]
    fn unterminated_block_is_closed_on_finish() {
        plain();
        let mut stream = MarkdownStream::new();

        let mut out = stream.push("```\nlet x = 1;");
        assert!(!out.contains("let x"));
        out.push_str(&stream.finish());

        assert!(out.contains("let x = 1;"));
        assert!(out.contains('└'));
    }

    #[test]
    fn stream_is_reusable_after_unterminated_block() {
        plain();
        let mut stream = MarkdownStream::new();

        let first = stream.render("```rust\nlet x = 1;\n");
        let second = stream.render("plain text");

        assert!(first.contains("└"));
        assert_eq!(second, "plain text");
    }
}
