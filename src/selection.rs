use kurbo::{Point, Vec2};
use crate::geometry::is_out_of_bounds;
use crate::scene::{ObjectId, Scene};

impl Scene {
    /// Topmost selectable object under the point.
    pub fn hit_test(&self, pt: Point) -> Option<ObjectId> {
        self.objects()
            .iter()
            .rev()
            .find(|o| o.shape.props().selectable && o.shape.contains(pt))
            .map(|o| o.id)
    }

    /// Makes the object under the point active, or clears the selection on a miss.
    pub fn select_at(&mut self, pt: Point) -> Option<ObjectId> {
        let hit = self.hit_test(pt);
        if hit != self.active_id() {
            self.set_active(hit);
            self.request_render();
        }
        hit
    }

    pub fn delete_active(&mut self) -> Option<ObjectId> {
        let id = self.active_id()?;
        self.remove(id)?;
        self.request_render();
        log::info!("deleted object {}", id);
        Some(id)
    }
}

#[derive(Clone, Copy, Debug)]
struct MoveDrag {
    id: ObjectId,
    last: Point,
}

/// Select-mode pointer handling: click to select, drag to move.
#[derive(Debug, Default)]
pub struct SelectionTool {
    drag: Option<MoveDrag>,
}

impl SelectionTool {
    pub fn new() -> Self {
        SelectionTool { drag: None }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn pointer_down(&mut self, scene: &mut Scene, pt: Point) -> Option<ObjectId> {
        let hit = scene.select_at(pt);
        self.drag = hit.map(|id| MoveDrag { id, last: pt });
        hit
    }

    pub fn pointer_move(&mut self, scene: &mut Scene, pt: Point, width: f64, height: f64) -> bool {
        let Some(drag) = self.drag.as_mut() else { return false };
        if is_out_of_bounds(pt.x, pt.y, width, height) {
            return false;
        }
        let Some(shape) = scene.get_mut(drag.id) else {
            self.drag = None;
            return false;
        };
        let delta: Vec2 = pt - drag.last;
        shape.translate(delta.x, delta.y);
        drag.last = pt;
        scene.request_render();
        true
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{create_rect, Shape};
    use crate::types::PenColor;

    fn rect(scene: &mut Scene, x0: f64, y0: f64, x1: f64, y1: f64, readonly: bool) -> ObjectId {
        let mut shape = create_rect(x0, y0, PenColor::Orange, readonly);
        shape.resize_to(Point::new(x0, y0), Point::new(x1, y1));
        scene.add(shape)
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let mut scene = Scene::new();
        let below = rect(&mut scene, 0.0, 0.0, 100.0, 100.0, false);
        let above = rect(&mut scene, 50.0, 50.0, 150.0, 150.0, false);
        assert_eq!(scene.hit_test(Point::new(75.0, 75.0)), Some(above));
        assert_eq!(scene.hit_test(Point::new(10.0, 10.0)), Some(below));
        assert_eq!(scene.hit_test(Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn readonly_shapes_are_skipped() {
        let mut scene = Scene::new();
        let below = rect(&mut scene, 0.0, 0.0, 100.0, 100.0, false);
        rect(&mut scene, 0.0, 0.0, 100.0, 100.0, true);
        assert_eq!(scene.hit_test(Point::new(50.0, 50.0)), Some(below));
    }

    #[test]
    fn clicking_empty_space_clears_selection() {
        let mut scene = Scene::new();
        let id = rect(&mut scene, 0.0, 0.0, 100.0, 100.0, false);
        assert_eq!(scene.select_at(Point::new(5.0, 5.0)), Some(id));
        assert_eq!(scene.select_at(Point::new(900.0, 700.0)), None);
        assert_eq!(scene.active_id(), None);
    }

    #[test]
    fn delete_removes_only_the_active_shape() {
        let mut scene = Scene::new();
        let keep = rect(&mut scene, 0.0, 0.0, 10.0, 10.0, false);
        let gone = rect(&mut scene, 20.0, 20.0, 30.0, 30.0, false);
        assert_eq!(scene.delete_active(), None);
        scene.set_active(Some(gone));
        assert_eq!(scene.delete_active(), Some(gone));
        assert_eq!(scene.len(), 1);
        assert!(scene.get(keep).is_some());
    }

    #[test]
    fn drag_moves_the_selected_shape() {
        let mut scene = Scene::new();
        let id = rect(&mut scene, 10.0, 10.0, 60.0, 60.0, false);
        let mut tool = SelectionTool::new();
        assert_eq!(tool.pointer_down(&mut scene, Point::new(20.0, 20.0)), Some(id));
        assert!(tool.pointer_move(&mut scene, Point::new(30.0, 25.0), 1024.0, 768.0));
        assert!(!tool.pointer_move(&mut scene, Point::new(-5.0, 25.0), 1024.0, 768.0));
        tool.pointer_up();
        assert!(!tool.is_dragging());
        let Some(Shape::Rect(r)) = scene.get(id) else { panic!("expected rect") };
        assert_eq!((r.props.left, r.props.top, r.width, r.height), (20.0, 15.0, 50.0, 50.0));
    }
}
