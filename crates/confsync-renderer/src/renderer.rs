//! Confluence storage format renderer for pulldown-cmark events.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::error::RenderError;

/// Result of rendering one markdown document.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered Confluence XHTML storage format.
    pub body: String,
    /// Local attachment references in first-seen order, as written in the
    /// markdown (relative to the referencing document).
    pub attachments: Vec<String>,
}

/// Renders markdown to Confluence XHTML storage format.
///
/// One instance renders exactly one document; [`render`](Self::render)
/// consumes the renderer together with its collected attachment list.
pub struct ConfluenceRenderer {
    output: String,
    attachments: Vec<String>,
    in_code_block: bool,
    /// Nesting depth of `Start(Image)` tags; alt-text events between an
    /// image's start and end are suppressed.
    image_depth: usize,
}

impl ConfluenceRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            attachments: Vec::new(),
            in_code_block: false,
            image_depth: 0,
        }
    }

    /// Render one markdown document.
    ///
    /// GFM tables, strikethrough, task lists and super-/subscript are
    /// enabled.
    pub fn render(mut self, markdown: &str) -> Result<RenderResult, RenderError> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SUPERSCRIPT
            | Options::ENABLE_SUBSCRIPT;
        for event in Parser::new_ext(markdown, options) {
            self.process_event(event)?;
        }
        Ok(RenderResult {
            body: self.output,
            attachments: self.attachments,
        })
    }

    fn process_event(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        // The image element is emitted at Start(Image); everything until the
        // matching End(Image) is alt text and must not reach the output.
        if self.image_depth > 0 {
            match event {
                Event::Start(Tag::Image { .. }) => self.image_depth += 1,
                Event::End(TagEnd::Image) => self.image_depth -= 1,
                _ => {}
            }
            return Ok(());
        }
        match event {
            Event::Start(tag) => self.start_tag(tag)?,
            Event::End(tag) => self.end_tag(tag)?,
            Event::Text(text) => self.text(&text),
            Event::Code(code) => write!(self.output, "<code>{}</code>", escape_xml(&code))?,
            Event::Html(html) | Event::InlineHtml(html) => self.output.push_str(&html),
            Event::SoftBreak => self.output.push('\n'),
            Event::HardBreak => self.output.push_str("<br />"),
            Event::Rule => self.output.push_str("<hr />"),
            Event::TaskListMarker(checked) => {
                if checked {
                    self.output.push_str("[x] ");
                } else {
                    self.output.push_str("[ ] ");
                }
            }
            // Not supported in Confluence storage format
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
        Ok(())
    }

    fn start_tag(&mut self, tag: Tag<'_>) -> Result<(), RenderError> {
        match tag {
            Tag::Paragraph => {
                if !self.in_code_block {
                    self.output.push_str("<p>");
                }
            }
            Tag::Heading { level, .. } => {
                write!(self.output, "<h{}>", heading_level_to_num(level))?;
            }
            Tag::BlockQuote(_) => {
                self.output.push_str(
                    r#"<ac:structured-macro ac:name="info" ac:schema-version="1"><ac:rich-text-body>"#,
                );
            }
            Tag::CodeBlock(kind) => {
                self.in_code_block = true;
                self.output
                    .push_str(r#"<ac:structured-macro ac:name="code" ac:schema-version="1">"#);
                if let CodeBlockKind::Fenced(lang) = kind
                    && let Some(lang) = lang.split_whitespace().next()
                    && !lang.is_empty()
                {
                    write!(
                        self.output,
                        r#"<ac:parameter ac:name="language">{}</ac:parameter>"#,
                        escape_xml(lang)
                    )?;
                }
                self.output
                    .push_str(r#"<ac:parameter ac:name="linenumbers">true</ac:parameter>"#);
                self.output.push_str(r"<ac:plain-text-body><![CDATA[");
            }
            Tag::List(start) => {
                self.output
                    .push_str(if start.is_some() { "<ol>" } else { "<ul>" });
            }
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(_) => self.output.push_str("<table><tbody>"),
            Tag::TableHead | Tag::TableRow => self.output.push_str("<tr>"),
            Tag::TableCell => self.output.push_str("<td>"),
            Tag::Emphasis => self.output.push_str("<em>"),
            Tag::Strong => self.output.push_str("<strong>"),
            Tag::Strikethrough => self.output.push_str("<s>"),
            Tag::Link { dest_url, .. } => {
                write!(self.output, r#"<a href="{}">"#, escape_xml(&dest_url))?;
            }
            Tag::Image { dest_url, .. } => {
                self.image(&dest_url)?;
                self.image_depth = 1;
            }
            Tag::Superscript => self.output.push_str("<sup>"),
            Tag::Subscript => self.output.push_str("<sub>"),
            Tag::FootnoteDefinition(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::HtmlBlock
            | Tag::MetadataBlock(_) => {}
        }
        Ok(())
    }

    fn end_tag(&mut self, tag: TagEnd) -> Result<(), RenderError> {
        match tag {
            TagEnd::Paragraph => {
                if !self.in_code_block {
                    self.output.push_str("</p>");
                }
            }
            TagEnd::Heading(level) => {
                write!(self.output, "</h{}>", heading_level_to_num(level))?;
            }
            TagEnd::BlockQuote(_) => {
                self.output
                    .push_str("</ac:rich-text-body></ac:structured-macro>");
            }
            TagEnd::CodeBlock => {
                self.output
                    .push_str("]]></ac:plain-text-body></ac:structured-macro>");
                self.in_code_block = false;
            }
            TagEnd::List(ordered) => {
                self.output.push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead | TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => self.output.push_str("</td>"),
            TagEnd::Emphasis => self.output.push_str("</em>"),
            TagEnd::Strong => self.output.push_str("</strong>"),
            TagEnd::Strikethrough => self.output.push_str("</s>"),
            TagEnd::Link => self.output.push_str("</a>"),
            TagEnd::Superscript => self.output.push_str("</sup>"),
            TagEnd::Subscript => self.output.push_str("</sub>"),
            // Image is self-closing in start_tag
            TagEnd::Image
            | TagEnd::FootnoteDefinition
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_) => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            // CDATA body, no escaping
            self.output.push_str(text);
        } else {
            self.output.push_str(&escape_xml(text));
        }
    }

    /// Render an image.
    ///
    /// External URLs become `<ri:url>` references. Anything else is treated
    /// as a local file that will be uploaded as an attachment: the macro
    /// references the bare filename and the reference (as written) is
    /// recorded for the caller to reconcile.
    fn image(&mut self, dest_url: &str) -> Result<(), RenderError> {
        if dest_url.starts_with("http://") || dest_url.starts_with("https://") {
            write!(
                self.output,
                r#"<ac:image><ri:url ri:value="{}" /></ac:image>"#,
                escape_xml(dest_url)
            )?;
        } else {
            let filename = dest_url.rsplit('/').next().unwrap_or(dest_url);
            write!(
                self.output,
                r#"<ac:image><ri:attachment ri:filename="{}" /></ac:image>"#,
                escape_xml(filename)
            )?;
            self.attachments.push(dest_url.to_owned());
        }
        Ok(())
    }
}

impl Default for ConfluenceRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
