//! Pointer-driven shape creation.
//!
//! A pointer-down in a drawing mode creates a shape at the pointer, moves
//! resize it relative to that fixed origin, and the pointer-up hands it over
//! to the scene as a finished object.

use kurbo::Point;
use crate::geometry::is_out_of_bounds;
use crate::objects::{create_ellipse, create_rect, create_text, Shape};
use crate::scene::{ObjectId, Scene};
use crate::types::{DrawMode, PenColor};

/// Where the drawing machine puts and edits shapes.
pub trait DrawSurface {
    fn add_shape(&mut self, shape: Shape) -> ObjectId;
    fn set_active(&mut self, id: ObjectId);
    fn shape_mut(&mut self, id: ObjectId) -> Option<&mut Shape>;
    fn request_render(&mut self);
}

impl DrawSurface for Scene {
    fn add_shape(&mut self, shape: Shape) -> ObjectId {
        self.add(shape)
    }

    fn set_active(&mut self, id: ObjectId) {
        Scene::set_active(self, Some(id));
    }

    fn shape_mut(&mut self, id: ObjectId) -> Option<&mut Shape> {
        self.get_mut(id)
    }

    fn request_render(&mut self) {
        Scene::request_render(self);
    }
}

/// Settings read at each event; the host may change them between events.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct DrawSettings {
    pub mode: DrawMode,
    pub pen: PenColor,
    pub readonly: bool,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Drawing {
        origin: Point,
        active: ObjectId,
    },
}

/// Emitted on every pointer-up.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DrawEnd {
    /// The shape the released drag created, if there was one.
    pub shape: Option<ObjectId>,
}

#[derive(Debug, Default)]
pub struct DrawingMachine {
    state: Interaction,
}

impl DrawingMachine {
    pub fn new() -> Self {
        DrawingMachine { state: Interaction::Idle }
    }

    #[cfg(test)]
    pub fn state(&self) -> Interaction {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, Interaction::Drawing { .. })
    }

    pub fn pointer_down<S: DrawSurface>(&mut self, surface: &mut S, settings: &DrawSettings, pointer: Point) -> Option<ObjectId> {
        if self.is_drawing() {
            log::debug!("pointer-down while a shape is in progress, ignored");
            return None;
        }
        let shape = match settings.mode {
            DrawMode::Select => return None,
            DrawMode::Rect => create_rect(pointer.x, pointer.y, settings.pen, settings.readonly),
            DrawMode::Ellipse => create_ellipse(pointer.x, pointer.y, settings.pen, settings.readonly),
            DrawMode::TextSmall | DrawMode::TextLarge => {
                let font_size = settings.mode.font_size().unwrap_or(16.0);
                create_text(pointer.x, pointer.y, font_size, settings.pen, settings.readonly)
            }
        };
        let id = surface.add_shape(shape);
        surface.set_active(id);
        surface.request_render();
        log::debug!("started {} shape {} at ({}, {})", settings.mode, id, pointer.x, pointer.y);
        self.state = Interaction::Drawing { origin: pointer, active: id };
        Some(id)
    }

    /// Returns true when the in-progress shape changed.
    pub fn pointer_move<S: DrawSurface>(&mut self, surface: &mut S, settings: &DrawSettings, pointer: Point) -> bool {
        let Interaction::Drawing { origin, active } = self.state else { return false };
        if is_out_of_bounds(pointer.x, pointer.y, settings.width, settings.height) {
            return false;
        }
        let Some(shape) = surface.shape_mut(active) else { return false };
        if settings.mode.shape_kind() != Some(shape.kind()) {
            return false;
        }
        shape.resize_to(origin, pointer);
        surface.request_render();
        true
    }

    pub fn pointer_up<S: DrawSurface>(&mut self, surface: &mut S) -> DrawEnd {
        let shape = match std::mem::take(&mut self.state) {
            Interaction::Drawing { active, .. } => Some(active),
            Interaction::Idle => None,
        };
        surface.request_render();
        DrawEnd { shape }
    }

    /// Drops any in-progress interaction without signalling completion.
    pub fn reset(&mut self) {
        self.state = Interaction::Idle;
    }
}
