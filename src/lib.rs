//! richdoc: a block-based rich document model with HTML/JSON serialization.
//!
//! This crate holds the state behind a rich-document editor. It includes:
//!
//! - **Document model** - ordered content blocks, formatting overrides and page settings
//! - **Document store** - the mutation API that derives a new document per change
//! - **Serializers** - export HTML, JSON snapshots and a formatted live preview
//! - **Persistence** - key-value snapshot storage with debounced autosave (optional)
//! - **Export** - `pdf`, `docx`, `html` and `json` artifacts delivered through a sink
//!
//! # Quick Start
//!
//! ```rust
//! use richdoc::{BlockDraft, DocumentStore, HeadingLevel};
//!
//! let mut store = DocumentStore::default();
//! store.replace_title("Notes");
//! store.add_block(BlockDraft::heading("Intro", HeadingLevel::H2));
//! let (id, _) = store.add_block(BlockDraft::paragraph("Hello"));
//! store.delete_block(&id);
//!
//! let html = richdoc::serialize_html(&store.snapshot());
//! assert!(html.contains("<h2>Intro</h2>"));
//! ```
//!
//! # Features
//!
//! - `storage` - Enables the file-backed snapshot store, restore and autosave

pub mod config;
pub mod export;
mod fs;
pub mod model;
pub mod outline;
pub mod serialize;
pub mod store;

// Optional: Snapshot persistence
#[cfg(feature = "storage")]
pub mod persist;

pub use config::EditorConfig;

// Re-export model types
pub use model::{
    Alignment, Block, BlockContent, BlockDraft, BlockId, BlockKind, Dimension, Document,
    DocumentContent, FormatPatch, FormatState, Formatting, Heading, HeadingLevel, Image, Margins,
    MarginsPatch, Orientation, PaperSize, Settings, SettingsPatch, Table, UnknownSettingValue,
};

pub use store::{Clock, DocumentEdit, DocumentStore, ManualClock, SystemClock};

pub use serialize::{HtmlConfig, ParseError};

pub use export::{
    Delivery, DirectorySink, ExportArtifact, ExportError, ExportFormat, ExportSink,
    export_document,
};

pub use outline::{OutlineEntry, outline, share_link};

#[cfg(feature = "storage")]
pub use persist::{
    AutosaveOutcome, Autosaver, DirectoryStore, KeyValueStore, MemoryStore, StoreError, restore,
    save,
};

/// Renders the standalone export page for `document`.
pub fn serialize_html(document: &Document) -> String {
    serialize::html::serialize(document)
}

pub fn serialize_json(document: &Document) -> Result<String, serde_json::Error> {
    serialize::json::serialize(document)
}

pub fn deserialize_json(input: &str) -> Result<Document, ParseError> {
    serialize::json::deserialize(input)
}

pub fn render_preview(document: &Document) -> String {
    serialize::preview::render(document)
}
