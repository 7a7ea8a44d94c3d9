//! Markdown → ratatui `Text`.
//!
//! Assistant replies are markdown. This walks the `pulldown_cmark` event
//! stream and builds styled lines: paragraphs, headings, emphasis, inline
//! code, links, block quotes, lists, rules, and fenced code blocks
//! (highlighted with syntect when the language is known).

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME: LazyLock<Theme> = LazyLock::new(|| {
    let mut themes = ThemeSet::load_defaults().themes;
    themes.remove("base16-eighties.dark").unwrap_or_default()
});

const CODE_INDENT: &str = "  ";

/// Render `content` with `base` as the style for plain text.
pub fn render(content: &str, base: Style) -> Text<'static> {
    let mut renderer = Renderer::new(base);
    for event in Parser::new_ext(content, Options::ENABLE_STRIKETHROUGH) {
        renderer.event(event);
    }
    renderer.finish()
}

struct Renderer {
    base: Style,
    lines: Vec<Line<'static>>,
    /// Spans of the line being built.
    current: Vec<Span<'static>>,
    /// Inline style stack; each entry already includes its parents.
    styles: Vec<Style>,
    quote_depth: usize,
    /// Open lists, innermost last. `Some(n)` = ordered, next number `n`.
    lists: Vec<Option<u64>>,
    /// Inside a fenced/indented code block; holds the highlighter if any.
    code: Option<Option<HighlightLines<'static>>>,
    link: Option<String>,
    /// A blank line is owed before the next block.
    gap: bool,
}

impl Renderer {
    fn new(base: Style) -> Self {
        Self {
            base,
            lines: Vec::new(),
            current: Vec::new(),
            styles: Vec::new(),
            quote_depth: 0,
            lists: Vec::new(),
            code: None,
            link: None,
            gap: false,
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.flush();
        Text::from(self.lines)
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(self.base)
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn quote_prefix(&self) -> Vec<Span<'static>> {
        (0..self.quote_depth)
            .map(|_| Span::styled("│ ", Style::default().fg(Color::DarkGray)))
            .collect()
    }

    fn emit(&mut self, spans: Vec<Span<'static>>) {
        let mut line = self.quote_prefix();
        line.extend(spans);
        self.lines.push(Line::from(line));
    }

    /// Ends the line being built, if it has anything in it.
    fn flush(&mut self) {
        if !self.current.is_empty() {
            let spans = std::mem::take(&mut self.current);
            self.emit(spans);
        }
    }

    fn start_block(&mut self) {
        // A paragraph inside a list item continues the marker's line
        if !self.lists.is_empty() && !self.current.is_empty() {
            return;
        }
        self.flush();
        if self.gap && !self.lines.is_empty() {
            self.emit(Vec::new());
        }
        self.gap = false;
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) if self.code.is_some() => self.code_text(&text),
            Event::Text(text) => {
                let style = self.style();
                self.current.push(Span::styled(text.into_string(), style));
            }
            Event::Code(code) => {
                let style = self.style().patch(Style::default().fg(Color::LightYellow));
                self.current.push(Span::styled(code.into_string(), style));
            }
            Event::SoftBreak => self.current.push(Span::raw(" ")),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.start_block();
                self.emit(vec![Span::styled(
                    "─".repeat(24),
                    Style::default().fg(Color::DarkGray),
                )]);
                self.gap = true;
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.start_block(),
            Tag::Heading { level, .. } => {
                self.start_block();
                let modifier = match level {
                    HeadingLevel::H1 => Modifier::BOLD | Modifier::UNDERLINED,
                    _ => Modifier::BOLD,
                };
                self.push_style(Style::default().add_modifier(modifier));
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.quote_depth += 1;
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                self.start_block();
                let lang = match &kind {
                    CodeBlockKind::Fenced(lang) => lang.split_whitespace().next().unwrap_or(""),
                    CodeBlockKind::Indented => "",
                };
                if !lang.is_empty() {
                    self.emit(vec![Span::styled(
                        lang.to_string(),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    )]);
                }
                let highlighter = SYNTAXES
                    .find_syntax_by_token(lang)
                    .filter(|_| !lang.is_empty())
                    .map(|syntax| HighlightLines::new(syntax, &THEME));
                self.code = Some(highlighter);
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.start_block();
                } else {
                    self.flush();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        *n += 1;
                        format!("{indent}{}. ", *n - 1)
                    }
                    _ => format!("{indent}• "),
                };
                self.current
                    .push(Span::styled(marker, Style::default().fg(Color::DarkGray)));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link = Some(dest_url.into_string());
                self.push_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                self.gap = true;
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.styles.pop();
                self.gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.styles.pop();
                self.gap = true;
            }
            TagEnd::CodeBlock => {
                self.code = None;
                self.gap = true;
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.gap = true;
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(url) = self.link.take() {
                    self.current.push(Span::styled(
                        format!(" <{url}>"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            _ => {}
        }
    }

    fn code_text(&mut self, text: &str) {
        let text = text.replace('\t', "    ");
        let plain = Style::default().fg(Color::Gray);

        for raw in LinesWithEndings::from(&text) {
            let mut spans = vec![Span::raw(CODE_INDENT)];
            let highlighted = match self.code.as_mut() {
                Some(Some(highlighter)) => highlighter.highlight_line(raw, &SYNTAXES).ok(),
                _ => None,
            };
            match highlighted {
                Some(ranges) => {
                    for (style, piece) in ranges {
                        let piece = piece.trim_end_matches(['\n', '\r']);
                        if piece.is_empty() {
                            continue;
                        }
                        let fg = style.foreground;
                        spans.push(Span::styled(
                            piece.to_string(),
                            Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                        ));
                    }
                }
                None => spans.push(Span::styled(
                    raw.trim_end_matches(['\n', '\r']).to_string(),
                    plain,
                )),
            }
            self.emit(spans);
        }
    }
}
