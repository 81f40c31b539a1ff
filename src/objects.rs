use serde::{Serialize, Deserialize};
use kurbo::{Point, Rect, Ellipse, Shape as _};
use crate::geometry::{drag_box, anchored_start};
use crate::types::{ControlVisibility, PenColor, ShapeKind};

pub const PLACEHOLDER_TEXT: &str = "Text";
pub const TEXT_LINE_HEIGHT: f64 = 1.16;
/// Rough glyph advance used to give narrow text boxes a clickable area.
const GLYPH_ADVANCE: f64 = 0.55;

/// Properties every canvas object carries.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ObjectProps {
    pub left: f64,
    pub top: f64,
    pub fill: String,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default)]
    pub stroke_uniform: bool,
    #[serde(default = "default_true")]
    pub selectable: bool,
    #[serde(default)]
    pub controls: ControlVisibility,
}

fn default_true() -> bool { true }

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RectShape {
    #[serde(flatten)]
    pub props: ObjectProps,
    pub width: f64,
    pub height: f64,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EllipseShape {
    #[serde(flatten)]
    pub props: ObjectProps,
    pub rx: f64,
    pub ry: f64,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    #[serde(flatten)]
    pub props: ObjectProps,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    pub text: String,
}

impl TextBox {
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count().max(1)
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.height = intrinsic_text_height(self.font_size, self.line_count());
    }
}

pub fn intrinsic_text_height(font_size: f64, lines: usize) -> f64 {
    font_size * TEXT_LINE_HEIGHT * lines as f64
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rect(RectShape),
    Ellipse(EllipseShape),
    Textbox(TextBox),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect(_) => ShapeKind::Rect,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Textbox(_) => ShapeKind::Textbox,
        }
    }

    pub fn props(&self) -> &ObjectProps {
        match self {
            Shape::Rect(s) => &s.props,
            Shape::Ellipse(s) => &s.props,
            Shape::Textbox(s) => &s.props,
        }
    }

    pub fn props_mut(&mut self) -> &mut ObjectProps {
        match self {
            Shape::Rect(s) => &mut s.props,
            Shape::Ellipse(s) => &mut s.props,
            Shape::Textbox(s) => &mut s.props,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(s) => Rect::new(s.props.left, s.props.top, s.props.left + s.width, s.props.top + s.height),
            Shape::Ellipse(s) => Rect::new(s.props.left, s.props.top, s.props.left + s.rx * 2.0, s.props.top + s.ry * 2.0),
            Shape::Textbox(s) => Rect::new(s.props.left, s.props.top, s.props.left + s.width, s.props.top + s.height),
        }
    }

    /// Hit test in canvas coordinates.
    pub fn contains(&self, pt: Point) -> bool {
        match self {
            Shape::Rect(_) => self.bounds().contains(pt),
            Shape::Ellipse(_) => {
                let bounds = self.bounds();
                bounds.width() > 0.0 && bounds.height() > 0.0 && Ellipse::from_rect(bounds).contains(pt)
            }
            Shape::Textbox(t) => {
                let longest = t.text.split('\n').map(|l| l.chars().count()).max().unwrap_or(0);
                let min_width = longest as f64 * t.font_size * GLYPH_ADVANCE;
                let mut area = self.bounds();
                area.x1 = area.x0 + t.width.max(min_width);
                area.contains(pt)
            }
        }
    }

    /// Applies a creation drag from `origin` to `pointer`.
    pub fn resize_to(&mut self, origin: Point, pointer: Point) {
        match self {
            Shape::Rect(s) => resize_rect(s, origin, pointer),
            Shape::Ellipse(s) => resize_ellipse(s, origin, pointer),
            Shape::Textbox(s) => resize_text(s, origin.x, pointer.x),
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        let props = self.props_mut();
        props.left += dx;
        props.top += dy;
    }

    /// Flips negative extents so the origin is the top-left corner.
    /// Imported documents may carry them; bounds and hit tests assume otherwise.
    pub fn normalize(&mut self) {
        fn flip(origin: &mut f64, extent: &mut f64, scale: f64) {
            if *extent < 0.0 {
                *origin += *extent * scale;
                *extent = -*extent;
            }
        }
        match self {
            Shape::Rect(s) => {
                flip(&mut s.props.left, &mut s.width, 1.0);
                flip(&mut s.props.top, &mut s.height, 1.0);
            }
            Shape::Ellipse(s) => {
                flip(&mut s.props.left, &mut s.rx, 2.0);
                flip(&mut s.props.top, &mut s.ry, 2.0);
            }
            Shape::Textbox(s) => {
                flip(&mut s.props.left, &mut s.width, 1.0);
                flip(&mut s.props.top, &mut s.height, 1.0);
            }
        }
    }
}

fn base_props(x: f64, y: f64, pen: PenColor, readonly: bool) -> ObjectProps {
    ObjectProps {
        left: x,
        top: y,
        fill: pen.fill(),
        stroke: Some(pen.stroke()),
        stroke_width: 1.0,
        stroke_uniform: true,
        selectable: !readonly,
        controls: ControlVisibility::without_rotation(),
    }
}

pub fn create_rect(x: f64, y: f64, pen: PenColor, readonly: bool) -> Shape {
    Shape::Rect(RectShape { props: base_props(x, y, pen, readonly), width: 0.0, height: 0.0 })
}

pub fn create_ellipse(x: f64, y: f64, pen: PenColor, readonly: bool) -> Shape {
    Shape::Ellipse(EllipseShape { props: base_props(x, y, pen, readonly), rx: 0.0, ry: 0.0 })
}

pub fn create_text(x: f64, y: f64, font_size: f64, pen: PenColor, readonly: bool) -> Shape {
    // Text is drawn in the opaque pen color and has no outline.
    let props = ObjectProps {
        fill: pen.stroke(),
        stroke: None,
        controls: ControlVisibility::width_only(),
        ..base_props(x, y, pen, readonly)
    };
    Shape::Textbox(TextBox {
        props,
        width: 0.0,
        height: intrinsic_text_height(font_size, 1),
        font_size,
        text: PLACEHOLDER_TEXT.to_string(),
    })
}

pub fn resize_rect(rect: &mut RectShape, origin: Point, pointer: Point) {
    let b = drag_box(origin, pointer);
    if let Some(left) = b.left { rect.props.left = left; }
    if let Some(top) = b.top { rect.props.top = top; }
    rect.width = b.width;
    rect.height = b.height;
}

pub fn resize_ellipse(ellipse: &mut EllipseShape, origin: Point, pointer: Point) {
    let b = drag_box(origin, pointer);
    if let Some(left) = b.left { ellipse.props.left = left; }
    if let Some(top) = b.top { ellipse.props.top = top; }
    ellipse.rx = b.width / 2.0;
    ellipse.ry = b.height / 2.0;
}

pub fn resize_text(text: &mut TextBox, orig_x: f64, x: f64) {
    if let Some(left) = anchored_start(orig_x, x) { text.props.left = left; }
    text.width = (orig_x - x).abs();
}
