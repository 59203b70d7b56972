//! Document model: settings, blocks and the document container.
//!
//! A [`Document`] is a value. Mutations in [`crate::store`] derive a new
//! document from an old one; nothing here changes a document in place once it
//! has been handed out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod block;
pub mod format;
pub mod settings;

pub use block::{
    Block, BlockContent, BlockDraft, BlockId, BlockKind, Dimension, Heading, HeadingLevel, Image,
    Table,
};
pub use format::{Alignment, FormatPatch, FormatState, Formatting};
pub use settings::{
    Margins, MarginsPatch, Orientation, PaperSize, Settings, SettingsPatch, UnknownSettingValue,
};

pub type DocumentId = String;

pub const DEFAULT_TITLE: &str = "Untitled Document";
pub const DEFAULT_OWNER: &str = "current-user";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentContent {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    #[serde(default = "default_title")]
    pub title: String,
    pub content: DocumentContent,
    pub last_modified: DateTime<Utc>,
    pub owner_id: String,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Document {
    /// A fresh, empty document stamped with `now`.
    pub fn new_at(now: DateTime<Utc>) -> Self {
        Self::with_owner(DEFAULT_OWNER, now)
    }

    pub fn with_owner(owner_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: default_title(),
            content: DocumentContent::default(),
            last_modified: now,
            owner_id: owner_id.into(),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.content.blocks
    }

    pub fn settings(&self) -> &Settings {
        &self.content.settings
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.content.blocks.iter().find(|block| &block.id == id)
    }

    pub fn contains_block(&self, id: &BlockId) -> bool {
        self.block(id).is_some()
    }

    /// True when every field except `id` and `last_modified` matches a fresh document.
    pub fn is_pristine(&self) -> bool {
        self.title == DEFAULT_TITLE
            && self.content == DocumentContent::default()
            && self.owner_id == DEFAULT_OWNER
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new_at(Utc::now())
    }
}
