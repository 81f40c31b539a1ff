use kurbo::Point;

pub const CANVAS_WIDTH: f64 = 1024.0;
pub const CANVAS_HEIGHT: f64 = 768.0;

/// True when the point lies outside `[0, width] x [0, height]`. The edges are inside.
pub fn is_out_of_bounds(x: f64, y: f64, width: f64, height: f64) -> bool {
    x < 0.0 || y < 0.0 || x > width || y > height
}

/// Result of dragging from a fixed origin to the current pointer.
///
/// `left`/`top` are only set on the axes where the pointer went behind the
/// origin; on the other axes the shape keeps its start edge.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DragBox {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: f64,
    pub height: f64,
}

pub fn anchored_start(origin: f64, current: f64) -> Option<f64> {
    if current < origin { Some(current) } else { None }
}

pub fn drag_box(origin: Point, pointer: Point) -> DragBox {
    DragBox {
        left: anchored_start(origin.x, pointer.x),
        top: anchored_start(origin.y, pointer.y),
        width: (origin.x - pointer.x).abs(),
        height: (origin.y - pointer.y).abs(),
    }
}
