//! The document store: sole owner of the current document.
//!
//! Every change is described by a [`DocumentEdit`] and applied with
//! [`Document::apply`], which derives a new document and stamps
//! `last_modified`. The store swaps its handle to the new value; snapshots
//! handed out earlier stay exactly as they were.
//!
//! Lookups that miss (unknown block id, payload of another kind) leave the
//! document untouched. They are not reported as errors.

use crate::model::{
    Block, BlockContent, BlockDraft, BlockId, Document, FormatPatch, FormatState, SettingsPatch,
};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use tracing::debug;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEdit {
    ReplaceTitle(String),
    UpdateBlock { id: BlockId, content: BlockContent },
    AddBlock(Block),
    DeleteBlock(BlockId),
    UpdateSettings(SettingsPatch),
}

impl Document {
    /// Derives the document that results from `edit` at time `now`.
    ///
    /// Returns `None` when the edit does not apply: the block id is unknown,
    /// the new payload belongs to another kind, or an added block reuses an id.
    pub fn apply(&self, edit: &DocumentEdit, now: DateTime<Utc>) -> Option<Document> {
        let mut next = match edit {
            DocumentEdit::ReplaceTitle(title) => Document {
                title: title.clone(),
                ..self.clone()
            },
            DocumentEdit::UpdateBlock { id, content } => {
                let index = self.block_index(id)?;
                if !self.content.blocks[index].content.same_kind(content) {
                    return None;
                }
                let mut next = self.clone();
                next.content.blocks[index].content = content.clone();
                next
            }
            DocumentEdit::AddBlock(block) => {
                if self.contains_block(&block.id) {
                    return None;
                }
                let mut next = self.clone();
                next.content.blocks.push(block.clone());
                next
            }
            DocumentEdit::DeleteBlock(id) => {
                let index = self.block_index(id)?;
                let mut next = self.clone();
                next.content.blocks.remove(index);
                next
            }
            DocumentEdit::UpdateSettings(patch) => {
                let mut next = self.clone();
                next.content.settings = self.content.settings.merged(patch);
                next
            }
        };
        next.last_modified = now;
        Some(next)
    }

    fn block_index(&self, id: &BlockId) -> Option<usize> {
        self.content.blocks.iter().position(|block| &block.id == id)
    }
}

pub struct DocumentStore {
    current: Arc<Document>,
    format: FormatState,
    clock: Box<dyn Clock>,
}

impl DocumentStore {
    pub fn new(document: Document) -> Self {
        Self::with_clock(document, SystemClock)
    }

    pub fn with_clock(document: Document, clock: impl Clock + 'static) -> Self {
        Self {
            current: Arc::new(document),
            format: FormatState::default(),
            clock: Box::new(clock),
        }
    }

    /// The current document. Later mutations never change the returned value.
    pub fn snapshot(&self) -> Arc<Document> {
        Arc::clone(&self.current)
    }

    pub fn document(&self) -> &Document {
        &self.current
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.current.block(id)
    }

    pub fn format_state(&self) -> &FormatState {
        &self.format
    }

    pub fn replace_title(&mut self, title: impl Into<String>) -> Arc<Document> {
        self.commit(DocumentEdit::ReplaceTitle(title.into()))
    }

    pub fn update_block(&mut self, id: &BlockId, content: BlockContent) -> Arc<Document> {
        self.commit(DocumentEdit::UpdateBlock {
            id: id.clone(),
            content,
        })
    }

    /// Replaces one table cell. Non-table blocks and cells outside the grid are left alone.
    pub fn set_table_cell(
        &mut self,
        id: &BlockId,
        row: usize,
        col: usize,
        text: impl Into<String>,
    ) -> Arc<Document> {
        let updated = match self.current.block(id).map(|block| &block.content) {
            Some(BlockContent::Table(table)) => table.with_cell(row, col, text),
            _ => None,
        };
        match updated {
            Some(table) => self.update_block(id, BlockContent::Table(table)),
            None => {
                debug!(block = %id, row, col, "table cell update skipped");
                self.snapshot()
            }
        }
    }

    /// Appends a block under a fresh id and returns that id with the new snapshot.
    pub fn add_block(&mut self, draft: BlockDraft) -> (BlockId, Arc<Document>) {
        let id = self.fresh_id();
        let snapshot = self.commit(DocumentEdit::AddBlock(draft.into_block(id.clone())));
        (id, snapshot)
    }

    pub fn delete_block(&mut self, id: &BlockId) -> Arc<Document> {
        self.commit(DocumentEdit::DeleteBlock(id.clone()))
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) -> Arc<Document> {
        self.commit(DocumentEdit::UpdateSettings(patch))
    }

    pub fn set_format_state(&mut self, patch: FormatPatch) -> &FormatState {
        self.format = self.format.merged(&patch);
        &self.format
    }

    fn commit(&mut self, edit: DocumentEdit) -> Arc<Document> {
        match self.current.apply(&edit, self.clock.now()) {
            Some(next) => {
                self.current = Arc::new(next);
            }
            None => {
                debug!(?edit, "edit did not apply; document unchanged");
            }
        }
        self.snapshot()
    }

    fn fresh_id(&self) -> BlockId {
        loop {
            let id = BlockId::generate();
            if !self.current.contains_block(&id) {
                return id;
            }
        }
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(Document::default())
    }
}
