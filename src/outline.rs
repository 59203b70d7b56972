//! Read-only views for the sidebar structure list and the share dialog.

use crate::model::{BlockId, BlockKind, Document};
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

pub const LABEL_PREVIEW_GRAPHEMES: usize = 30;
pub const DEFAULT_SHARE_BASE: &str = "https://doceditor.app";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub id: BlockId,
    pub label: String,
}

pub fn outline(document: &Document) -> Vec<OutlineEntry> {
    document
        .blocks()
        .iter()
        .map(|block| {
            let label = match (block.kind(), block.text()) {
                (BlockKind::Heading, Some(text)) => format!("Heading: {}", preview(text)),
                (BlockKind::Paragraph, Some(text)) => format!("Paragraph: {}", preview(text)),
                (BlockKind::Table, _) => "Table".to_string(),
                (BlockKind::Image, _) => "Image".to_string(),
                _ => "Content".to_string(),
            };
            OutlineEntry {
                id: block.id.clone(),
                label,
            }
        })
        .collect()
}

fn preview(text: &str) -> String {
    text.graphemes(true).take(LABEL_PREVIEW_GRAPHEMES).collect()
}

pub fn share_link(document: &Document, base: &str) -> String {
    format!("{}/doc/{}", base.trim_end_matches('/'), document.id)
}
