//! Markdown to HTML conversion.
//!
//! The converter runs pulldown-cmark twice over the prepared source: a
//! first pass collects headings and assigns anchor ids, a second pass
//! rewrites the event stream (soft breaks to `<br>`, fenced code through
//! the highlighter, `[TOC]` paragraphs into the generated contents panel)
//! before rendering it to an HTML fragment.

use std::collections::VecDeque;

use log::debug;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};

use crate::highlighting;
use crate::toc::{self, Heading};

/// Converts Markdown text into an HTML body fragment.
///
/// Behaviors beyond plain CommonMark: pipe tables, heading attribute
/// blocks (`{#id}`, `{.class}`), single newlines rendered as `<br>`,
/// syntax-highlighted fenced code, and `[TOC]` contents generation with
/// automatic marker insertion after the first top-level heading.
pub fn to_html(markdown: &str) -> String {
    let prepared = toc::ensure_marker(markdown);
    let options = conversion_options();

    let headings = collect_headings(&prepared, options);
    debug!("collected {} headings", headings.len());
    let toc_html = toc::build_html(&headings);

    let parser = Parser::new_ext(&prepared, options);
    let mut events: Vec<Event> = Vec::new();
    let mut state = EmitState::new(&headings, toc_html);
    for event in parser {
        state.handle(event, &mut events);
    }

    let mut output = String::new();
    html::push_html(&mut output, events.into_iter());
    output
}

fn conversion_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// First pass: walk the event stream and record every heading with its
/// flattened text and anchor id. Explicit `{#id}` attributes win over
/// generated slugs and are reserved first so slugs never collide with
/// them.
fn collect_headings(markdown: &str, options: Options) -> Vec<Heading> {
    let parser = Parser::new_ext(markdown, options);
    let mut collected: Vec<(u8, String, Option<String>)> = Vec::new();
    let mut current: Option<(u8, String, Option<String>)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                current = Some((
                    heading_level_to_u8(level),
                    String::new(),
                    id.map(|value| value.to_string()),
                ));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(entry) = current.take() {
                    collected.push(entry);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buffer, _)) = current.as_mut() {
                    buffer.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, buffer, _)) = current.as_mut() {
                    buffer.push(' ');
                }
            }
            _ => {}
        }
    }

    let mut slugger = toc::Slugger::new();
    for (_, _, explicit) in &collected {
        if let Some(id) = explicit {
            slugger.reserve(id);
        }
    }
    collected
        .into_iter()
        .map(|(level, text, explicit)| {
            let id = explicit.unwrap_or_else(|| slugger.slug(&text));
            Heading { level, text, id }
        })
        .collect()
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Second pass state. Heading anchor ids are consumed in document order,
/// which matches the collection pass because both walk the same stream.
struct EmitState<'a> {
    anchor_ids: VecDeque<String>,
    toc_html: String,
    code_language: Option<String>,
    code_buffer: String,
    paragraph: Option<Vec<Event<'a>>>,
}

impl<'a> EmitState<'a> {
    fn new(headings: &[Heading], toc_html: String) -> Self {
        Self {
            anchor_ids: headings.iter().map(|h| h.id.clone()).collect(),
            toc_html,
            code_language: None,
            code_buffer: String::new(),
            paragraph: None,
        }
    }

    fn handle(&mut self, event: Event<'a>, out: &mut Vec<Event<'a>>) {
        if self.code_language.is_some() {
            match event {
                Event::Text(text) => self.code_buffer.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    let language = self.code_language.take().unwrap_or_default();
                    let highlighted =
                        highlighting::highlight_block(&self.code_buffer, &language);
                    self.code_buffer.clear();
                    self.route(Event::Html(highlighted.into()), out);
                }
                _ => {}
            }
            return;
        }

        let event = match event {
            // single newlines become explicit breaks, the way study notes
            // written line by line expect to render
            Event::SoftBreak => Event::HardBreak,
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(lang) => lang.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code_language = Some(language);
                self.code_buffer.clear();
                return;
            }
            Event::Start(Tag::Heading {
                level,
                classes,
                attrs,
                ..
            }) => {
                let id = self.anchor_ids.pop_front().map(CowStr::from);
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                })
            }
            other => other,
        };

        self.route(event, out);
    }

    /// Routes an event either into the open paragraph buffer or straight
    /// to the output. Paragraphs are buffered so one made of nothing but
    /// the literal `[TOC]` text can be swapped for the contents panel.
    fn route(&mut self, event: Event<'a>, out: &mut Vec<Event<'a>>) {
        match event {
            Event::Start(Tag::Paragraph) if self.paragraph.is_none() => {
                self.paragraph = Some(Vec::new());
            }
            Event::End(TagEnd::Paragraph) if self.paragraph.is_some() => {
                let buffered = self.paragraph.take().unwrap_or_default();
                if is_toc_marker(&buffered) {
                    out.push(Event::Html(self.toc_html.clone().into()));
                } else {
                    out.push(Event::Start(Tag::Paragraph));
                    out.extend(buffered);
                    out.push(Event::End(TagEnd::Paragraph));
                }
            }
            other => match self.paragraph.as_mut() {
                Some(buffer) => buffer.push(other),
                None => out.push(other),
            },
        }
    }
}

/// A paragraph is a contents marker when its content is text events only
/// and they concatenate to exactly `[TOC]`.
fn is_toc_marker(events: &[Event]) -> bool {
    if events.is_empty() {
        return false;
    }
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(chunk) => text.push_str(chunk),
            _ => return false,
        }
    }
    text.trim() == "[TOC]"
}

/// Minimal HTML escaping for text interpolated into generated markup.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
