//! Live preview rendering.
//!
//! Unlike the export page, the preview resolves each block's formatting
//! against the document defaults and writes it as an inline style. Text is
//! always escaped here.

use super::escape_html;
use crate::model::format::{DEFAULT_BACKGROUND, DEFAULT_COLOR, DEFAULT_FONT_SIZE};
use crate::model::{Alignment, Block, BlockContent, Dimension, Document, Formatting, Settings};

pub const EMPTY_PLACEHOLDER: &str = "Start typing to see your document preview here...";

/// A block's formatting with every fallback filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub font_family: String,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub color: String,
    pub background_color: String,
    pub alignment: Alignment,
    pub line_height: f64,
}

impl ResolvedStyle {
    pub fn resolve(formatting: Option<&Formatting>, settings: &Settings) -> Self {
        let empty = Formatting::default();
        let f = formatting.unwrap_or(&empty);
        Self {
            font_family: f
                .font_family
                .clone()
                .unwrap_or_else(|| settings.default_font.clone()),
            font_size: f.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            bold: f.bold.unwrap_or(false),
            italic: f.italic.unwrap_or(false),
            underline: f.underline.unwrap_or(false),
            strikethrough: f.strikethrough.unwrap_or(false),
            color: f.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            background_color: f
                .background_color
                .clone()
                .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
            alignment: f.alignment.unwrap_or_default(),
            line_height: settings.line_spacing,
        }
    }

    fn text_decoration(&self) -> &'static str {
        match (self.underline, self.strikethrough) {
            (true, true) => "underline line-through",
            (true, false) => "underline",
            (false, true) => "line-through",
            (false, false) => "none",
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            "font-family: {}; font-size: {}px; font-weight: {}; font-style: {}; text-decoration: {}; color: {}; background-color: {}; text-align: {}; line-height: {}",
            self.font_family,
            self.font_size,
            if self.bold { "bold" } else { "normal" },
            if self.italic { "italic" } else { "normal" },
            self.text_decoration(),
            self.color,
            self.background_color,
            self.alignment.as_css(),
            self.line_height,
        )
    }
}

pub fn render(document: &Document) -> String {
    let settings = document.settings();
    let margins = &settings.margins;

    let body = if document.blocks().is_empty() {
        format!("<p class=\"placeholder\">{EMPTY_PLACEHOLDER}</p>")
    } else {
        document
            .blocks()
            .iter()
            .filter_map(|block| render_block(block, settings))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "<div class=\"document-page\" style=\"font-family: {font}; line-height: {spacing}\">\n<div class=\"document-content\" style=\"padding-top: {top}in; padding-bottom: {bottom}in; padding-left: {left}in; padding-right: {right}in\">\n{body}\n</div>\n</div>",
        font = escape_html(&settings.default_font),
        spacing = settings.line_spacing,
        top = margins.top,
        bottom = margins.bottom,
        left = margins.left,
        right = margins.right,
    )
}

fn render_block(block: &Block, settings: &Settings) -> Option<String> {
    let style = || escape_html(&ResolvedStyle::resolve(block.formatting.as_ref(), settings).to_css());
    let id = escape_html(block.id.as_str());
    let html = match &block.content {
        BlockContent::Heading(heading) => {
            let level = heading.level.number();
            format!(
                "<h{level} data-block=\"{id}\" style=\"{}\">{}</h{level}>",
                style(),
                escape_html(&heading.text)
            )
        }
        BlockContent::Paragraph(text) => format!(
            "<p data-block=\"{id}\" style=\"{}\">{}</p>",
            style(),
            escape_html(text)
        ),
        BlockContent::Image(image) => format!(
            "<figure data-block=\"{id}\"><img src=\"{}\" alt=\"{}\" style=\"width: {}; height: {}\" /></figure>",
            escape_html(&image.src),
            escape_html(&image.alt),
            dimension_css(image.width),
            dimension_css(image.height),
        ),
        BlockContent::Table(table) => {
            let mut output = format!("<table data-block=\"{id}\" style=\"{}\"><tbody>", style());
            for row in 0..table.rows {
                output.push_str("<tr>");
                for col in 0..table.cols {
                    output.push_str("<td>");
                    output.push_str(&escape_html(table.cell(row, col)));
                    output.push_str("</td>");
                }
                output.push_str("</tr>");
            }
            output.push_str("</tbody></table>");
            output
        }
        BlockContent::Divider => format!("<hr data-block=\"{id}\" />"),
        BlockContent::List(_) | BlockContent::Unknown { .. } => return None,
    };
    Some(html)
}

fn dimension_css(dimension: Dimension) -> String {
    match dimension {
        Dimension::Auto => "auto".to_string(),
        Dimension::Pixels(px) => format!("{px}px"),
    }
}
