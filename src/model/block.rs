use super::format::{Alignment, Formatting};
use super::settings::DEFAULT_FONT;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading,
    List,
    Table,
    Image,
    Divider,
    /// A `type` this build does not know, carried through untouched.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum HeadingLevel {
    #[default]
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn number(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

// 0 reads as "unset" and levels past 3 collapse to the smallest heading.
impl From<u8> for HeadingLevel {
    fn from(value: u8) -> Self {
        match value {
            0 | 1 => HeadingLevel::H1,
            2 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.number()
    }
}

impl Serialize for HeadingLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub text: String,
    pub level: HeadingLevel,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HeadingRepr {
    Text(String),
    Full {
        #[serde(default)]
        text: String,
        #[serde(default)]
        level: Option<u8>,
    },
}

impl From<HeadingRepr> for Heading {
    fn from(repr: HeadingRepr) -> Self {
        match repr {
            HeadingRepr::Text(text) => Heading {
                text,
                level: HeadingLevel::H1,
            },
            HeadingRepr::Full { text, level } => Heading {
                text,
                level: level.map(HeadingLevel::from).unwrap_or_default(),
            },
        }
    }
}

/// Image width or height: a pixel count or the keyword `"auto"`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    #[default]
    Auto,
    Pixels(f64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DimensionRepr {
    Number(f64),
    Keyword(String),
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Dimension::Auto => serializer.serialize_str("auto"),
            Dimension::Pixels(px) => serializer.serialize_f64(*px),
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match DimensionRepr::deserialize(deserializer)? {
            DimensionRepr::Number(px) => Ok(Dimension::Pixels(px)),
            DimensionRepr::Keyword(word) if word == "auto" => Ok(Dimension::Auto),
            DimensionRepr::Keyword(word) => Err(serde::de::Error::custom(format!(
                "expected a number or \"auto\", got {word:?}"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for HeadingLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(HeadingLevel::from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub width: Dimension,
    #[serde(default)]
    pub height: Dimension,
}

/// A `rows` x `cols` grid of text cells stored row-major.
///
/// `data` may be ragged or short; missing cells read as the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub data: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![vec![String::new(); cols]; rows],
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.data
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Returns a copy with one cell replaced, or `None` when the cell lies
    /// outside the `rows` x `cols` grid.
    pub fn with_cell(&self, row: usize, col: usize, text: impl Into<String>) -> Option<Self> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let mut data = self.data.clone();
        if data.len() <= row {
            data.resize(row + 1, Vec::new());
        }
        let cells = &mut data[row];
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = text.into();
        Some(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Paragraph(String),
    Heading(Heading),
    /// List payloads are kept as raw JSON.
    List(Value),
    Table(Table),
    Image(Image),
    Divider,
    Unknown { kind: String, payload: Value },
}

impl BlockContent {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Paragraph(_) => BlockKind::Paragraph,
            BlockContent::Heading(_) => BlockKind::Heading,
            BlockContent::List(_) => BlockKind::List,
            BlockContent::Table(_) => BlockKind::Table,
            BlockContent::Image(_) => BlockKind::Image,
            BlockContent::Divider => BlockKind::Divider,
            BlockContent::Unknown { .. } => BlockKind::Unknown,
        }
    }

    pub fn kind_name(&self) -> &str {
        match self {
            BlockContent::Paragraph(_) => "paragraph",
            BlockContent::Heading(_) => "heading",
            BlockContent::List(_) => "list",
            BlockContent::Table(_) => "table",
            BlockContent::Image(_) => "image",
            BlockContent::Divider => "divider",
            BlockContent::Unknown { kind, .. } => kind,
        }
    }

    /// True when `other` may replace this payload without changing the block's kind.
    pub fn same_kind(&self, other: &BlockContent) -> bool {
        self.kind_name() == other.kind_name()
    }

    pub fn from_parts(kind: &str, payload: Value) -> Result<Self, serde_json::Error> {
        let content = match kind {
            "paragraph" => match payload {
                Value::Null => BlockContent::Paragraph(String::new()),
                other => BlockContent::Paragraph(serde_json::from_value(other)?),
            },
            "heading" => {
                BlockContent::Heading(serde_json::from_value::<HeadingRepr>(payload)?.into())
            }
            "list" => BlockContent::List(payload),
            "table" => BlockContent::Table(serde_json::from_value(payload)?),
            "image" => BlockContent::Image(serde_json::from_value(payload)?),
            "divider" => BlockContent::Divider,
            other => BlockContent::Unknown {
                kind: other.to_string(),
                payload,
            },
        };
        Ok(content)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: BlockId,
    pub content: BlockContent,
    pub formatting: Option<Formatting>,
}

#[derive(Deserialize)]
struct RawBlock {
    id: BlockId,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    formatting: Option<Formatting>,
}

impl TryFrom<RawBlock> for Block {
    type Error = serde_json::Error;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        Ok(Block {
            id: raw.id,
            content: BlockContent::from_parts(&raw.kind, raw.content)?,
            formatting: raw.formatting,
        })
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.formatting.is_some() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("Block", len)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", self.content.kind_name())?;
        match &self.content {
            BlockContent::Paragraph(text) => state.serialize_field("content", text)?,
            BlockContent::Heading(heading) => state.serialize_field("content", heading)?,
            BlockContent::List(payload) | BlockContent::Unknown { payload, .. } => {
                state.serialize_field("content", payload)?
            }
            BlockContent::Table(table) => state.serialize_field("content", table)?,
            BlockContent::Image(image) => state.serialize_field("content", image)?,
            BlockContent::Divider => {
                state.serialize_field("content", &serde_json::Map::new())?
            }
        }
        match &self.formatting {
            Some(formatting) => state.serialize_field("formatting", formatting)?,
            None => state.skip_field("formatting")?,
        }
        state.end()
    }
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    /// Text shown for paragraph and heading blocks.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            BlockContent::Paragraph(text) => Some(text),
            BlockContent::Heading(heading) => Some(&heading.text),
            _ => None,
        }
    }
}

/// A block that has not been given an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDraft {
    pub content: BlockContent,
    pub formatting: Option<Formatting>,
}

impl BlockDraft {
    pub fn new(content: BlockContent) -> Self {
        Self {
            content,
            formatting: None,
        }
    }

    pub fn with_formatting(mut self, formatting: Formatting) -> Self {
        self.formatting = Some(formatting);
        self
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockContent::Paragraph(text.into())).with_formatting(text_formatting(16.0))
    }

    pub fn heading(text: impl Into<String>, level: HeadingLevel) -> Self {
        Self::new(BlockContent::Heading(Heading {
            text: text.into(),
            level,
        }))
        .with_formatting(text_formatting(24.0))
    }

    pub fn image(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::new(BlockContent::Image(Image {
            src: src.into(),
            alt: alt.into(),
            width: Dimension::Auto,
            height: Dimension::Auto,
        }))
    }

    pub fn table(rows: usize, cols: usize) -> Self {
        Self::new(BlockContent::Table(Table::new(rows, cols)))
    }

    pub fn divider() -> Self {
        Self::new(BlockContent::Divider)
    }

    pub fn into_block(self, id: BlockId) -> Block {
        Block {
            id,
            content: self.content,
            formatting: self.formatting,
        }
    }
}

fn text_formatting(font_size: f64) -> Formatting {
    Formatting {
        font_family: Some(DEFAULT_FONT.to_string()),
        font_size: Some(font_size),
        alignment: Some(Alignment::Left),
        ..Default::default()
    }
}
