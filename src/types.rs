use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;
use crate::error::PaintError;

/// What a pointer-down on the canvas produces.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DrawMode {
    #[default]
    #[serde(rename = "SELECT")]
    Select,
    #[serde(rename = "RECT")]
    Rect,
    #[serde(rename = "ELLIPSE")]
    Ellipse,
    #[serde(rename = "TEXT_S", alias = "TEXT_SMALL")]
    TextSmall,
    #[serde(rename = "TEXT_L", alias = "TEXT_LARGE")]
    TextLarge,
}

impl DrawMode {
    /// The kind of shape this mode creates, `None` for `Select`.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            DrawMode::Select => None,
            DrawMode::Rect => Some(ShapeKind::Rect),
            DrawMode::Ellipse => Some(ShapeKind::Ellipse),
            DrawMode::TextSmall | DrawMode::TextLarge => Some(ShapeKind::Textbox),
        }
    }

    pub fn font_size(self) -> Option<f64> {
        match self {
            DrawMode::TextSmall => Some(16.0),
            DrawMode::TextLarge => Some(32.0),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DrawMode::Select => "SELECT",
            DrawMode::Rect => "RECT",
            DrawMode::Ellipse => "ELLIPSE",
            DrawMode::TextSmall => "TEXT_S",
            DrawMode::TextLarge => "TEXT_L",
        }
    }
}

impl FromStr for DrawMode {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SELECT" => Ok(DrawMode::Select),
            "RECT" => Ok(DrawMode::Rect),
            "ELLIPSE" => Ok(DrawMode::Ellipse),
            "TEXT_S" | "TEXT_SMALL" => Ok(DrawMode::TextSmall),
            "TEXT_L" | "TEXT_LARGE" => Ok(DrawMode::TextLarge),
            other => Err(PaintError::UnknownDrawMode(other.to_string())),
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PenColor {
    #[default]
    Orange,
    Green,
    Purple,
}

impl PenColor {
    pub fn as_str(self) -> &'static str {
        match self {
            PenColor::Orange => "ORANGE",
            PenColor::Green => "GREEN",
            PenColor::Purple => "PURPLE",
        }
    }
}

impl FromStr for PenColor {
    type Err = PaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORANGE" => Ok(PenColor::Orange),
            "GREEN" => Ok(PenColor::Green),
            "PURPLE" => Ok(PenColor::Purple),
            other => Err(PaintError::UnknownPenColor(other.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShapeKind {
    Rect,
    Ellipse,
    Textbox,
}

/// Which transform controls are shown around a selected object.
/// Names follow the usual corner/edge shorthand; `mtr` is the rotate knob.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct ControlVisibility {
    pub tl: bool, pub tr: bool, pub bl: bool, pub br: bool,
    pub ml: bool, pub mr: bool, pub mt: bool, pub mb: bool,
    pub mtr: bool,
}

impl ControlVisibility {
    pub fn all() -> Self {
        ControlVisibility {
            tl: true, tr: true, bl: true, br: true,
            ml: true, mr: true, mt: true, mb: true,
            mtr: true,
        }
    }

    pub fn without_rotation() -> Self {
        ControlVisibility { mtr: false, ..Self::all() }
    }

    /// Only the left/right edge handles; used for text, whose height follows its content.
    pub fn width_only() -> Self {
        ControlVisibility {
            tl: false, tr: false, bl: false, br: false,
            ml: true, mr: true, mt: false, mb: false,
            mtr: false,
        }
    }

    /// Handle anchors as fractions of the bounding box.
    pub fn visible_anchors(&self) -> Vec<(f64, f64)> {
        let all = [
            (self.tl, (0.0, 0.0)), (self.tr, (1.0, 0.0)),
            (self.bl, (0.0, 1.0)), (self.br, (1.0, 1.0)),
            (self.ml, (0.0, 0.5)), (self.mr, (1.0, 0.5)),
            (self.mt, (0.5, 0.0)), (self.mb, (0.5, 1.0)),
        ];
        all.iter().filter(|(on, _)| *on).map(|(_, a)| *a).collect()
    }
}

impl Default for ControlVisibility {
    fn default() -> Self {
        Self::all()
    }
}
