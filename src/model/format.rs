use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_COLOR: &str = "#1e1e1e";
pub const DEFAULT_BACKGROUND: &str = "transparent";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// Per-block formatting overrides. Absent fields fall back to document defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Formatting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

/// The toolbar's current formatting intent.
///
/// This is recorded only. Nothing applies it to a block or a text range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatState {
    pub font_family: String,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub color: String,
    pub background_color: String,
    pub alignment: Alignment,
}

impl Default for FormatState {
    fn default() -> Self {
        Self {
            font_family: super::settings::DEFAULT_FONT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            color: DEFAULT_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND.to_string(),
            alignment: Alignment::Left,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatPatch {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub alignment: Option<Alignment>,
}

impl FormatState {
    pub fn merged(&self, patch: &FormatPatch) -> Self {
        Self {
            font_family: patch
                .font_family
                .clone()
                .unwrap_or_else(|| self.font_family.clone()),
            font_size: patch.font_size.unwrap_or(self.font_size),
            bold: patch.bold.unwrap_or(self.bold),
            italic: patch.italic.unwrap_or(self.italic),
            underline: patch.underline.unwrap_or(self.underline),
            strikethrough: patch.strikethrough.unwrap_or(self.strikethrough),
            color: patch.color.clone().unwrap_or_else(|| self.color.clone()),
            background_color: patch
                .background_color
                .clone()
                .unwrap_or_else(|| self.background_color.clone()),
            alignment: patch.alignment.unwrap_or(self.alignment),
        }
    }
}
