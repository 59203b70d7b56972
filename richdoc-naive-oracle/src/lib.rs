//! A naive, simple oracle renderer for differential testing.
//!
//! It walks the JSON snapshot of a document as untyped values, the way a
//! script would, and builds the export body by string concatenation.
use richdoc::Document;
use serde_json::Value;

/// Renders the `<body>` contents of the export page: one fragment per block,
/// joined with newlines.
pub fn render_body(document: &Document) -> String {
    let snapshot = match serde_json::to_value(document) {
        Ok(value) => value,
        Err(_) => return String::new(),
    };
    let blocks = snapshot["content"]["blocks"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &Value) -> String {
    let content = &block["content"];
    match block["type"].as_str().unwrap_or("") {
        "heading" => {
            let level = content["level"].as_u64().filter(|l| *l != 0).unwrap_or(1);
            let text = content["text"].as_str().unwrap_or("");
            format!("<h{level}>{text}</h{level}>")
        }
        "paragraph" => format!("<p>{}</p>", content.as_str().unwrap_or("")),
        "image" => format!(
            "<img src=\"{}\" alt=\"{}\" />",
            content["src"].as_str().unwrap_or(""),
            content["alt"].as_str().unwrap_or("")
        ),
        "table" => {
            let rows = content["rows"].as_u64().unwrap_or(0);
            let cols = content["cols"].as_u64().unwrap_or(0);
            let mut out = String::from("<table>");
            for row in 0..rows {
                out += "<tr>";
                for col in 0..cols {
                    let cell = content["data"][row as usize][col as usize]
                        .as_str()
                        .unwrap_or("");
                    out += &format!("<td>{cell}</td>");
                }
                out += "</tr>";
            }
            out += "</table>";
            out
        }
        "divider" => "<hr />".to_string(),
        _ => String::new(),
    }
}

/// The text between `<body>\n  ` and `\n</body>` of a rendered page.
pub fn body_of(page: &str) -> Option<&str> {
    let start = page.find("<body>\n  ")? + "<body>\n  ".len();
    let end = page.rfind("\n</body>")?;
    page.get(start..end)
}
