use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
}

impl PaperSize {
    pub const ALL: [PaperSize; 5] = [
        PaperSize::A4,
        PaperSize::A3,
        PaperSize::A5,
        PaperSize::Letter,
        PaperSize::Legal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PaperSize::A4 => "A4",
            PaperSize::A3 => "A3",
            PaperSize::A5 => "A5",
            PaperSize::Letter => "Letter",
            PaperSize::Legal => "Legal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn name(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {setting}: {value:?}")]
pub struct UnknownSettingValue {
    pub setting: &'static str,
    pub value: String,
}

impl FromStr for PaperSize {
    type Err = UnknownSettingValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaperSize::ALL
            .into_iter()
            .find(|size| size.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSettingValue {
                setting: "paper size",
                value: s.to_string(),
            })
    }
}

impl FromStr for Orientation {
    type Err = UnknownSettingValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Orientation::Portrait, Orientation::Landscape]
            .into_iter()
            .find(|orientation| orientation.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSettingValue {
                setting: "orientation",
                value: s.to_string(),
            })
    }
}

pub const DEFAULT_MARGIN: f64 = 1.0;

/// Page margins in inches.
///
/// A side that is missing or `null` in a snapshot reads as the default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    #[serde(deserialize_with = "side_or_default")]
    pub top: f64,
    #[serde(deserialize_with = "side_or_default")]
    pub bottom: f64,
    #[serde(deserialize_with = "side_or_default")]
    pub left: f64,
    #[serde(deserialize_with = "side_or_default")]
    pub right: f64,
}

fn side_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(DEFAULT_MARGIN))
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: DEFAULT_MARGIN,
            bottom: DEFAULT_MARGIN,
            left: DEFAULT_MARGIN,
            right: DEFAULT_MARGIN,
        }
    }
}

/// Document-wide layout and typography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub paper_size: PaperSize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default = "default_font")]
    pub default_font: String,
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f64,
    #[serde(default)]
    pub margins: Margins,
}

pub const DEFAULT_FONT: &str = "Georgia";
pub const DEFAULT_LINE_SPACING: f64 = 1.15;

fn default_font() -> String {
    DEFAULT_FONT.to_string()
}

fn default_line_spacing() -> f64 {
    DEFAULT_LINE_SPACING
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::default(),
            orientation: Orientation::default(),
            default_font: default_font(),
            line_spacing: DEFAULT_LINE_SPACING,
            margins: Margins::default(),
        }
    }
}

/// Per-side margin update. Sides left as `None` keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginsPatch {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

/// Partial settings update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    pub paper_size: Option<PaperSize>,
    pub orientation: Option<Orientation>,
    pub default_font: Option<String>,
    pub line_spacing: Option<f64>,
    pub margins: Option<MarginsPatch>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Margins {
    pub fn merged(&self, patch: &MarginsPatch) -> Self {
        Self {
            top: patch.top.unwrap_or(self.top),
            bottom: patch.bottom.unwrap_or(self.bottom),
            left: patch.left.unwrap_or(self.left),
            right: patch.right.unwrap_or(self.right),
        }
    }
}

impl Settings {
    /// Returns a copy with the supplied keys replaced. `margins` merges per side.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            paper_size: patch.paper_size.unwrap_or(self.paper_size),
            orientation: patch.orientation.unwrap_or(self.orientation),
            default_font: patch
                .default_font
                .clone()
                .unwrap_or_else(|| self.default_font.clone()),
            line_spacing: patch.line_spacing.unwrap_or(self.line_spacing),
            margins: match &patch.margins {
                Some(margins) => self.margins.merged(margins),
                None => self.margins,
            },
        }
    }
}
