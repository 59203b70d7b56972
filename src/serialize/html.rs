//! Standalone HTML page for export and printing.
//!
//! The page is a structural projection of the block sequence. Per-block
//! formatting is not written into the output; only [`super::preview`] applies it.

use super::escape_html;
use crate::model::{Block, BlockContent, Document, Settings, Table};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HtmlConfig {
    /// Escape text, attribute values and the title. Off by default: text is
    /// inserted exactly as stored.
    pub escape_text: bool,
}

impl HtmlConfig {
    pub fn verbatim() -> Self {
        Self { escape_text: false }
    }

    pub fn escaped() -> Self {
        Self { escape_text: true }
    }

    fn text<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        if self.escape_text {
            Cow::Owned(escape_html(raw))
        } else {
            Cow::Borrowed(raw)
        }
    }
}

pub fn serialize(document: &Document) -> String {
    serialize_with_config(document, &HtmlConfig::default())
}

pub fn serialize_with_config(document: &Document, config: &HtmlConfig) -> String {
    let body = document
        .blocks()
        .iter()
        .map(|block| render_block(block, config))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"UTF-8\">\n  <title>{title}</title>\n  {styles}\n</head>\n<body>\n  {body}\n</body>\n</html>",
        title = config.text(&document.title),
        styles = style_block(document.settings()),
    )
}

fn style_block(settings: &Settings) -> String {
    let margins = &settings.margins;
    format!(
        "<style>
      body {{
        font-family: {font};
        line-height: {spacing};
        max-width: 8.5in;
        margin: 0 auto;
        padding: {top}in {right}in {bottom}in {left}in;
      }}
      h1 {{ font-size: 2em; font-weight: bold; margin-bottom: 0.5em; }}
      h2 {{ font-size: 1.5em; font-weight: bold; margin-bottom: 0.5em; }}
      h3 {{ font-size: 1.2em; font-weight: bold; margin-bottom: 0.5em; }}
      p {{ margin-bottom: 1em; }}
      table {{ width: 100%; border-collapse: collapse; margin: 1em 0; }}
      th, td {{ border: 1px solid #ccc; padding: 8px; text-align: left; }}
      th {{ background-color: #f5f5f5; }}
      img {{ max-width: 100%; height: auto; }}
      hr {{ margin: 2em 0; border: none; border-top: 1px solid #ccc; }}
    </style>",
        font = settings.default_font,
        spacing = settings.line_spacing,
        top = margins.top,
        right = margins.right,
        bottom = margins.bottom,
        left = margins.left,
    )
}

fn render_block(block: &Block, config: &HtmlConfig) -> String {
    match &block.content {
        BlockContent::Heading(heading) => {
            let level = heading.level.number();
            format!("<h{level}>{}</h{level}>", config.text(&heading.text))
        }
        BlockContent::Paragraph(text) => format!("<p>{}</p>", config.text(text)),
        BlockContent::Image(image) => format!(
            "<img src=\"{}\" alt=\"{}\" />",
            config.text(&image.src),
            config.text(&image.alt)
        ),
        BlockContent::Table(table) => render_table(table, config),
        BlockContent::Divider => "<hr />".to_string(),
        BlockContent::List(_) | BlockContent::Unknown { .. } => String::new(),
    }
}

fn render_table(table: &Table, config: &HtmlConfig) -> String {
    let mut output = String::from("<table>");
    for row in 0..table.rows {
        output.push_str("<tr>");
        for col in 0..table.cols {
            output.push_str("<td>");
            output.push_str(&config.text(table.cell(row, col)));
            output.push_str("</td>");
        }
        output.push_str("</tr>");
    }
    output.push_str("</table>");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockDraft, BlockId, HeadingLevel, MarginsPatch, SettingsPatch};
    use chrono::Utc;

    fn doc_with(drafts: Vec<BlockDraft>) -> Document {
        let mut doc = Document::default();
        for (index, draft) in drafts.into_iter().enumerate() {
            doc.content
                .blocks
                .push(draft.into_block(BlockId::from(format!("b{index}"))));
        }
        doc
    }

    #[test]
    fn test_block_fragments_in_order() {
        let mut table = BlockDraft::table(2, 2);
        if let BlockContent::Table(t) = &mut table.content {
            t.data = vec![vec!["a".into(), "b".into()], vec!["c".into(), "d".into()]];
        }
        let doc = doc_with(vec![
            BlockDraft::heading("Intro", HeadingLevel::H2),
            BlockDraft::paragraph("Hello"),
            table,
            BlockDraft::divider(),
        ]);
        let html = serialize(&doc);
        let body = "<h2>Intro</h2>\n<p>Hello</p>\n<table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>\n<hr />";
        assert!(html.contains(body), "{html}");
    }

    #[test]
    fn test_table_pads_missing_cells() {
        let mut draft = BlockDraft::table(2, 3);
        if let BlockContent::Table(t) = &mut draft.content {
            t.data = vec![vec!["x".into()]];
        }
        let html = serialize(&doc_with(vec![draft]));
        assert!(html.contains(
            "<table><tr><td>x</td><td></td><td></td></tr><tr><td></td><td></td><td></td></tr></table>"
        ));
    }

    #[test]
    fn test_list_contributes_empty_slot() {
        let doc = doc_with(vec![
            BlockDraft::paragraph("a"),
            BlockDraft::new(BlockContent::List(serde_json::json!(["x"]))),
            BlockDraft::paragraph("b"),
        ]);
        assert!(serialize(&doc).contains("<p>a</p>\n\n<p>b</p>"));
    }

    #[test]
    fn test_image_and_title() {
        let mut doc = doc_with(vec![BlockDraft::image("data:image/png;base64,AAA", "pic")]);
        doc.title = "Report".to_string();
        let html = serialize(&doc);
        assert!(html.contains("<title>Report</title>"));
        assert!(html.contains("<img src=\"data:image/png;base64,AAA\" alt=\"pic\" />"));
        assert!(html.starts_with("<!DOCTYPE html>\n<html>\n<head>"));
        assert!(html.ends_with("</body>\n</html>"));
    }

    #[test]
    fn test_style_uses_settings() {
        let doc = doc_with(vec![]);
        let doc = doc
            .apply(
                &crate::store::DocumentEdit::UpdateSettings(SettingsPatch {
                    default_font: Some("Inter".into()),
                    line_spacing: Some(1.5),
                    margins: Some(MarginsPatch {
                        top: Some(0.75),
                        left: Some(2.0),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                Utc::now(),
            )
            .unwrap();
        let html = serialize(&doc);
        assert!(html.contains("font-family: Inter;"));
        assert!(html.contains("line-height: 1.5;"));
        assert!(html.contains("padding: 0.75in 1in 1in 2in;"));
    }

    #[test]
    fn test_default_style_numbers() {
        let html = serialize(&doc_with(vec![]));
        assert!(html.contains("line-height: 1.15;"));
        assert!(html.contains("padding: 1in 1in 1in 1in;"));
    }

    #[test]
    fn test_text_is_verbatim_by_default() {
        let doc = doc_with(vec![BlockDraft::paragraph("<b>bold</b> & co")]);
        assert!(serialize(&doc).contains("<p><b>bold</b> & co</p>"));
    }

    #[test]
    fn test_escaped_config() {
        let mut doc = doc_with(vec![
            BlockDraft::paragraph("<script>x</script>"),
            BlockDraft::image("a\"b", "it's"),
        ]);
        doc.title = "A & B".into();
        let html = serialize_with_config(&doc, &HtmlConfig::escaped());
        assert!(html.contains("<p>&lt;script&gt;x&lt;/script&gt;</p>"));
        assert!(html.contains("<img src=\"a&quot;b\" alt=\"it&#39;s\" />"));
        assert!(html.contains("<title>A &amp; B</title>"));
    }
}
