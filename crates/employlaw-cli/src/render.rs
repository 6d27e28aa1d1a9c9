//! Terminal rendering for report markdown.
//!
//! Covers what generated reports actually use: headings, paragraphs,
//! bullet and numbered lists, emphasis, inline and block code, block
//! quotes, links, and rules. Anything else falls through as plain text.

use colored::{ColoredString, Colorize};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};

const RULE_WIDTH: usize = 40;

/// Render markdown to a styled string ending in exactly one newline.
pub fn render_markdown(markdown: &str) -> String {
    let mut renderer = Renderer::default();
    for event in Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH) {
        renderer.event(event);
    }
    renderer.finish()
}

/// Open container, recorded on every `Start` and popped on the matching `End`.
enum Block {
    Paragraph,
    Heading,
    Quote,
    CodeBlock,
    List,
    Item,
    Emphasis,
    Strong,
    Strikethrough,
    Link(String),
    Other,
}

#[derive(Default)]
struct Renderer {
    out: String,
    stack: Vec<Block>,
    /// Next number per open list; `None` for bullets.
    lists: Vec<Option<u64>>,
    heading: Option<HeadingLevel>,
    quote_depth: usize,
    emphasis: usize,
    strong: usize,
    strike: usize,
    in_code_block: bool,
    at_line_start: bool,
    /// Set right after a list marker so the item's first block stays on its line.
    after_marker: bool,
}

impl Renderer {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => {
                if let Some(block) = self.stack.pop() {
                    self.end(block);
                }
            }
            Event::Text(text) => {
                if self.in_code_block {
                    self.code_lines(&text);
                } else {
                    self.inline(&text);
                }
            }
            Event::Code(code) => {
                let styled = code.dimmed().to_string();
                self.raw_inline(&styled);
            }
            Event::SoftBreak | Event::HardBreak => self.newline(),
            Event::Rule => {
                self.start_block();
                let rule = "─".repeat(RULE_WIDTH).dimmed().to_string();
                self.raw_inline(&rule);
                self.newline();
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let block = match tag {
            Tag::Paragraph => {
                self.start_block();
                Block::Paragraph
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                self.heading = Some(level);
                Block::Heading
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.quote_depth += 1;
                Block::Quote
            }
            Tag::CodeBlock(_) => {
                self.start_block();
                self.in_code_block = true;
                Block::CodeBlock
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.start_block();
                }
                self.lists.push(first);
                Block::List
            }
            Tag::Item => {
                self.item_marker();
                Block::Item
            }
            Tag::Emphasis => {
                self.emphasis += 1;
                Block::Emphasis
            }
            Tag::Strong => {
                self.strong += 1;
                Block::Strong
            }
            Tag::Strikethrough => {
                self.strike += 1;
                Block::Strikethrough
            }
            Tag::Link { dest_url, .. } => Block::Link(dest_url.into_string()),
            _ => Block::Other,
        };
        self.stack.push(block);
    }

    fn end(&mut self, block: Block) {
        match block {
            Block::Paragraph | Block::Item => self.ensure_newline(),
            Block::Heading => {
                self.heading = None;
                self.ensure_newline();
            }
            Block::Quote => {
                self.ensure_newline();
                self.quote_depth -= 1;
            }
            Block::CodeBlock => {
                self.in_code_block = false;
                self.ensure_newline();
            }
            Block::List => {
                self.lists.pop();
            }
            Block::Emphasis => self.emphasis -= 1,
            Block::Strong => self.strong -= 1,
            Block::Strikethrough => self.strike -= 1,
            Block::Link(url) => {
                let suffix = format!(" ({url})").dimmed().to_string();
                self.raw_inline(&suffix);
            }
            Block::Other => {}
        }
    }

    fn finish(mut self) -> String {
        let trimmed = self.out.trim_end_matches('\n').len();
        self.out.truncate(trimmed);
        self.out.push('\n');
        self.out
    }

    // ── Layout ──

    /// Separate a new block from the previous one by a blank line.
    fn start_block(&mut self) {
        if self.after_marker {
            return;
        }
        self.ensure_newline();
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn item_marker(&mut self) {
        self.ensure_newline();
        let depth = self.lists.len().saturating_sub(1);
        let marker = match self.lists.last_mut() {
            Some(Some(n)) => {
                let marker = format!("{n}. ");
                *n += 1;
                marker
            }
            _ => "• ".to_string(),
        };
        let prefix = format!("{}{}{marker}", self.quote_prefix(), "  ".repeat(depth));
        self.out.push_str(&prefix);
        self.at_line_start = false;
        self.after_marker = true;
    }

    fn quote_prefix(&self) -> String {
        "│ ".repeat(self.quote_depth)
    }

    fn line_prefix(&self) -> String {
        format!("{}{}", self.quote_prefix(), "  ".repeat(self.lists.len()))
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }

    fn ensure_newline(&mut self) {
        if !self.out.is_empty() && !self.at_line_start {
            self.newline();
        }
    }

    // ── Text ──

    fn inline(&mut self, text: &str) {
        let styled = self.style(text).to_string();
        self.raw_inline(&styled);
    }

    fn raw_inline(&mut self, text: &str) {
        if self.at_line_start || self.out.is_empty() {
            let prefix = self.line_prefix();
            self.out.push_str(&prefix);
        }
        self.out.push_str(text);
        self.at_line_start = false;
        self.after_marker = false;
    }

    fn code_lines(&mut self, text: &str) {
        for line in text.lines() {
            self.ensure_newline();
            let styled = format!("    {}", line.dimmed());
            self.raw_inline(&styled);
            self.newline();
        }
    }

    fn style(&self, text: &str) -> ColoredString {
        let mut styled = ColoredString::from(text);
        if let Some(level) = self.heading {
            styled = styled.bold();
            if level == HeadingLevel::H1 {
                styled = styled.underline();
            }
        }
        if self.strong > 0 {
            styled = styled.bold();
        }
        if self.emphasis > 0 {
            styled = styled.italic();
        }
        if self.strike > 0 {
            styled = styled.strikethrough();
        }
        styled
    }
}
