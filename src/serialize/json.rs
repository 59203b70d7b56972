//! JSON snapshots of a whole document.

use crate::model::Document;

#[derive(Debug, thiserror::Error)]
#[error("malformed document snapshot: {0}")]
pub struct ParseError(#[from] serde_json::Error);

impl ParseError {
    /// Line and column in the input where decoding stopped.
    pub fn position(&self) -> (usize, usize) {
        (self.0.line(), self.0.column())
    }
}

/// Pretty-printed with two-space indentation.
pub fn serialize(document: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

pub fn deserialize(input: &str) -> Result<Document, ParseError> {
    Ok(serde_json::from_str(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockDraft, BlockId, HeadingLevel};

    #[test]
    fn test_round_trip_preserves_timestamp() {
        let mut doc = Document::default();
        doc.content.blocks.push(
            BlockDraft::heading("Title", HeadingLevel::H3).into_block(BlockId::from("h")),
        );
        let json = serialize(&doc).unwrap();
        let restored = deserialize(&json).unwrap();
        assert_eq!(restored, doc);
        assert_eq!(restored.last_modified, doc.last_modified);
    }

    #[test]
    fn test_round_trip_keeps_every_float_bit() {
        let mut doc = Document::default();
        doc.content.settings.line_spacing = 1.0668496574832367;
        doc.content.settings.margins.left = 2.3143408183284278;
        let json = serialize(&doc).unwrap();
        let restored = deserialize(&json).unwrap();
        assert_eq!(restored.settings().line_spacing.to_bits(), 1.0668496574832367f64.to_bits());
        assert_eq!(restored.settings().margins.left.to_bits(), 2.3143408183284278f64.to_bits());
        assert_eq!(restored, doc);
    }

    #[test]
    fn test_truncated_input_is_error() {
        let json = serialize(&Document::default()).unwrap();
        let truncated = &json[..json.len() / 2];
        let err = deserialize(truncated).unwrap_err();
        assert!(err.to_string().starts_with("malformed document snapshot"));
        assert!(err.position().0 >= 1);
    }

    #[test]
    fn test_reads_snapshot_written_by_browser_editor() {
        let input = r#"{
          "id": "V1StGXR8_Z",
          "title": "Notes",
          "content": {
            "blocks": [
              {"id": "a1", "type": "paragraph", "content": "Hi",
               "formatting": {"fontFamily": "Georgia", "fontSize": 16, "alignment": "left"}},
              {"id": "a2", "type": "divider", "content": {}}
            ],
            "settings": {
              "paperSize": "Letter", "orientation": "portrait", "defaultFont": "Georgia",
              "lineSpacing": 1.15, "margins": {"top": 1, "bottom": 1, "left": 1, "right": 1}
            }
          },
          "lastModified": "2024-05-01T12:30:00.123Z",
          "ownerId": "current-user"
        }"#;
        let doc = deserialize(input).unwrap();
        assert_eq!(doc.title, "Notes");
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.blocks()[0].text(), Some("Hi"));
        assert_eq!(
            doc.last_modified.to_rfc3339(),
            "2024-05-01T12:30:00.123+00:00"
        );
    }
}
