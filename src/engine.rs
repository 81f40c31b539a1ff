use wasm_bindgen::prelude::*;
use serde::Deserialize;
use kurbo::Point;
use web_sys::HtmlImageElement;
use crate::background::{BackgroundLoader, LoadOutcome, LoadTicket};
use crate::config::HostConfig;
use crate::drawing::{DrawEnd, DrawSettings, DrawingMachine};
use crate::error::{PaintError, Result};
use crate::io::background_from_data_url;
use crate::objects::Shape;
use crate::scene::{BackgroundImage, ObjectId, Scene};
use crate::selection::SelectionTool;
use crate::types::{DrawMode, PenColor};

/// Partial update of the values the toolbar controls.
#[derive(Deserialize, Clone, Copy, PartialEq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaintProps {
    pub draw_mode: Option<DrawMode>,
    pub pen_color: Option<PenColor>,
    pub readonly: Option<bool>,
}

/// Pure half of the host: everything except the JS handles.
#[derive(Debug)]
pub struct HostState {
    pub(crate) config: HostConfig,
    pub(crate) scene: Scene,
    pub(crate) drawing: DrawingMachine,
    pub(crate) selection: SelectionTool,
    pub(crate) loader: BackgroundLoader,
    pub(crate) draw_mode: DrawMode,
    pub(crate) pen_color: PenColor,
    pub(crate) readonly: bool,
    pub(crate) selection_enabled: bool,
    pub(crate) disposed: bool,
}

impl HostState {
    pub fn new(config: HostConfig) -> HostState {
        HostState {
            config,
            scene: Scene::new(),
            drawing: DrawingMachine::new(),
            selection: SelectionTool::new(),
            loader: BackgroundLoader::new(),
            draw_mode: DrawMode::Select,
            pen_color: PenColor::Orange,
            readonly: false,
            selection_enabled: true,
            disposed: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    fn settings(&self) -> DrawSettings {
        DrawSettings {
            mode: self.draw_mode,
            pen: self.pen_color,
            readonly: self.readonly,
            width: self.config.width,
            height: self.config.height,
        }
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        if mode != self.draw_mode {
            log::debug!("draw mode {} -> {}", self.draw_mode, mode);
        }
        self.draw_mode = mode;
        self.selection_enabled = mode == DrawMode::Select;
        if !self.selection_enabled {
            self.selection.pointer_up();
        }
    }

    pub fn apply_props(&mut self, props: PaintProps) {
        if let Some(mode) = props.draw_mode { self.set_draw_mode(mode); }
        if let Some(pen) = props.pen_color { self.pen_color = pen; }
        if let Some(readonly) = props.readonly { self.readonly = readonly; }
    }

    pub fn pointer_down(&mut self, pt: Point) -> Option<ObjectId> {
        if self.disposed { return None; }
        if self.selection_enabled && !self.drawing.is_drawing() {
            return self.selection.pointer_down(&mut self.scene, pt);
        }
        let settings = self.settings();
        self.drawing.pointer_down(&mut self.scene, &settings, pt)
    }

    pub fn pointer_move(&mut self, pt: Point) -> bool {
        if self.disposed { return false; }
        if self.drawing.is_drawing() {
            let settings = self.settings();
            return self.drawing.pointer_move(&mut self.scene, &settings, pt);
        }
        self.selection.pointer_move(&mut self.scene, pt, self.config.width, self.config.height)
    }

    /// Ends any drag and reverts to select mode, one shape per mode pick.
    pub fn pointer_up(&mut self) -> Option<DrawEnd> {
        if self.disposed { return None; }
        self.selection.pointer_up();
        let end = self.drawing.pointer_up(&mut self.scene);
        self.set_draw_mode(DrawMode::Select);
        Some(end)
    }

    pub fn key_up(&mut self, key: &str) -> Option<ObjectId> {
        if self.disposed || key != "Delete" { return None; }
        self.scene.delete_active()
    }

    pub fn edit_text(&mut self, id: ObjectId, text: &str) -> bool {
        match self.scene.get_mut(id) {
            Some(Shape::Textbox(t)) => {
                t.set_text(text);
                self.scene.request_render();
                true
            }
            _ => false,
        }
    }

    pub fn export_json(&self) -> Result<String> {
        self.scene.to_json()
    }

    pub fn import_json(&mut self, json: &str) -> Result<()> {
        if self.disposed { return Ok(()); }
        self.drawing.reset();
        self.selection.pointer_up();
        self.scene.load_json(json)?;
        log::info!("imported scene with {} objects", self.scene.len());
        Ok(())
    }

    pub fn finish_background_load(&mut self, ticket: LoadTicket, data_url: &str) -> Result<Option<BackgroundImage>> {
        match self.loader.resolve(ticket) {
            LoadOutcome::Applied => {}
            outcome => {
                log::debug!("background load {:?} dropped: {:?}", ticket, outcome);
                return Ok(None);
            }
        }
        let background = background_from_data_url(data_url)?;
        self.scene.set_background(Some(background.clone()));
        log::info!("background set ({}x{})", background.width, background.height);
        Ok(Some(background))
    }

    pub fn rotate_background(&mut self) -> bool {
        let Some(bg) = self.scene.background_mut() else { return false };
        bg.rotate_quarter();
        self.scene.request_render();
        true
    }

    pub fn dispose(&mut self) {
        if self.disposed { return; }
        self.loader.close();
        self.drawing.reset();
        self.selection.pointer_up();
        self.scene.clear();
        self.disposed = true;
        log::info!("canvas disposed");
    }
}

#[wasm_bindgen]
pub struct CanvasHost {
    pub(crate) state: HostState,
    pub(crate) background_element: Option<HtmlImageElement>,
    on_draw_end: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl CanvasHost {
    /// `config` may be `undefined` or a partial `{ width, height, exportQuality }`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> std::result::Result<CanvasHost, JsError> {
        console_error_panic_hook::set_once();
        let config = if config.is_undefined() || config.is_null() {
            HostConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| PaintError::InvalidProps(e.to_string()))?
        };
        log::info!("canvas host created ({}x{})", config.width, config.height);
        Ok(CanvasHost {
            state: HostState::new(config),
            background_element: None,
            on_draw_end: None,
        })
    }

    pub fn set_props(&mut self, props: JsValue) -> std::result::Result<(), JsError> {
        let props: PaintProps = serde_wasm_bindgen::from_value(props)
            .map_err(|e| PaintError::InvalidProps(e.to_string()))?;
        self.state.apply_props(props);
        Ok(())
    }

    pub fn set_draw_mode(&mut self, mode: &str) -> std::result::Result<(), JsError> {
        self.state.set_draw_mode(mode.parse()?);
        Ok(())
    }

    pub fn draw_mode(&self) -> String {
        self.state.draw_mode.as_str().to_string()
    }

    pub fn set_pen_color(&mut self, color: &str) -> std::result::Result<(), JsError> {
        self.state.pen_color = color.parse()?;
        Ok(())
    }

    pub fn pen_color(&self) -> String {
        self.state.pen_color.as_str().to_string()
    }

    pub fn set_readonly(&mut self, readonly: bool) {
        self.state.readonly = readonly;
    }

    pub fn readonly(&self) -> bool {
        self.state.readonly
    }

    pub fn selection_enabled(&self) -> bool {
        self.state.selection_enabled
    }

    /// Called with the finished shape id (or `null`) after every pointer-up.
    pub fn set_on_draw_end(&mut self, callback: Option<js_sys::Function>) {
        self.on_draw_end = callback;
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<u32> {
        self.state.pointer_down(Point::new(x, y))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.state.pointer_move(Point::new(x, y))
    }

    pub fn pointer_up(&mut self) {
        let Some(end) = self.state.pointer_up() else { return };
        if let Some(callback) = &self.on_draw_end {
            let arg = end.shape.map(|id| JsValue::from_f64(id as f64)).unwrap_or(JsValue::NULL);
            if let Err(e) = callback.call1(&JsValue::NULL, &arg) {
                log::warn!("draw-end callback failed: {:?}", e);
            }
        }
    }

    pub fn key_up(&mut self, key: &str) -> Option<u32> {
        self.state.key_up(key)
    }

    pub fn active_id(&self) -> Option<u32> {
        self.state.scene.active_id()
    }

    pub fn shape_count(&self) -> usize {
        self.state.scene.len()
    }

    pub fn edit_text(&mut self, id: u32, text: &str) -> bool {
        self.state.edit_text(id, text)
    }

    pub fn take_render_request(&mut self) -> bool {
        self.state.scene.take_render_request()
    }

    pub fn export_json(&self) -> std::result::Result<String, JsError> {
        Ok(self.state.export_json()?)
    }

    /// Replaces the scene. A malformed document is reported and changes nothing.
    pub fn import_json(&mut self, json: &str) -> std::result::Result<(), JsError> {
        if let Err(e) = self.state.import_json(json) {
            log::warn!("scene import rejected: {}", e);
            return Err(e.into());
        }
        self.sync_background_element()?;
        Ok(())
    }

    pub fn begin_background_load(&mut self) -> u32 {
        self.state.loader.begin().0
    }

    pub fn cancel_background_load(&mut self) -> bool {
        self.state.loader.cancel()
    }

    /// Applies the background if `ticket` is still the current load.
    pub fn finish_background_load(&mut self, ticket: u32, data_url: &str) -> std::result::Result<bool, JsError> {
        let applied = self.state.finish_background_load(LoadTicket(ticket), data_url)?;
        if applied.is_some() {
            self.sync_background_element()?;
        }
        Ok(applied.is_some())
    }

    pub fn clear_background(&mut self) {
        self.state.scene.set_background(None);
        self.background_element = None;
    }

    pub fn rotate_background(&mut self) -> bool {
        self.state.rotate_background()
    }

    pub fn dispose(&mut self) {
        self.state.dispose();
        self.background_element = None;
        self.on_draw_end = None;
    }

    fn sync_background_element(&mut self) -> std::result::Result<(), JsError> {
        self.background_element = match self.state.scene.background() {
            Some(bg) => {
                let element = HtmlImageElement::new().map_err(|e| JsError::new(&format!("{:?}", e)))?;
                element.set_src(&bg.src);
                Some(element)
            }
            None => None,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::encode_data_url;
    use image::{DynamicImage, ImageOutputFormat, RgbaImage};
    use std::io::Cursor;

    fn host() -> HostState {
        HostState::new(HostConfig::default())
    }

    fn png_url() -> String {
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::new(4, 4))
            .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
            .unwrap();
        encode_data_url("image/png", &out)
    }

    #[test]
    fn selection_follows_draw_mode() {
        let mut h = host();
        assert!(h.selection_enabled());
        h.set_draw_mode(DrawMode::Rect);
        assert!(!h.selection_enabled());
        h.set_draw_mode(DrawMode::Select);
        assert!(h.selection_enabled());
    }

    #[test]
    fn pointer_up_reverts_to_select() {
        let mut h = host();
        h.apply_props(PaintProps { draw_mode: Some(DrawMode::Ellipse), pen_color: Some(PenColor::Green), readonly: None });
        let id = h.pointer_down(Point::new(100.0, 100.0)).unwrap();
        h.pointer_move(Point::new(120.0, 140.0));
        let end = h.pointer_up().unwrap();
        assert_eq!(end.shape, Some(id));
        assert_eq!(h.draw_mode(), DrawMode::Select);
        assert!(h.selection_enabled());
        match h.scene().get(id) {
            Some(Shape::Ellipse(e)) => {
                assert_eq!((e.rx, e.ry), (10.0, 20.0));
                assert_eq!(e.props.fill, "rgba(34,197,94,0.3)");
            }
            other => panic!("expected ellipse, got {:?}", other),
        }
    }

    #[test]
    fn select_mode_pointer_up_still_signals() {
        let mut h = host();
        assert_eq!(h.pointer_up(), Some(DrawEnd { shape: None }));
        assert_eq!(h.pointer_up(), Some(DrawEnd { shape: None }));
        assert!(h.scene().is_empty());
    }

    #[test]
    fn delete_key_removes_selected_shape() {
        let mut h = host();
        h.set_draw_mode(DrawMode::Rect);
        let id = h.pointer_down(Point::new(10.0, 10.0)).unwrap();
        h.pointer_move(Point::new(50.0, 50.0));
        h.pointer_up();
        assert_eq!(h.key_up("Backspace"), None);
        assert_eq!(h.key_up("Delete"), Some(id));
        assert!(h.scene().is_empty());
    }

    #[test]
    fn readonly_drawing_is_not_selectable_afterwards() {
        let mut h = host();
        h.apply_props(PaintProps { draw_mode: Some(DrawMode::Rect), pen_color: None, readonly: Some(true) });
        h.pointer_down(Point::new(10.0, 10.0));
        h.pointer_move(Point::new(50.0, 50.0));
        h.pointer_up();
        assert_eq!(h.pointer_down(Point::new(20.0, 20.0)), None);
        assert_eq!(h.scene().active_id(), None);
    }

    #[test]
    fn select_switch_mid_draw_does_not_grab_shapes() {
        let mut h = host();
        h.set_draw_mode(DrawMode::Rect);
        let first = h.pointer_down(Point::new(10.0, 10.0)).unwrap();
        h.pointer_move(Point::new(50.0, 50.0));
        h.pointer_up();
        h.set_draw_mode(DrawMode::Rect);
        let second = h.pointer_down(Point::new(20.0, 20.0)).unwrap();
        h.set_draw_mode(DrawMode::Select);
        assert_eq!(h.pointer_down(Point::new(30.0, 30.0)), None);
        assert!(!h.selection.is_dragging());
        h.pointer_move(Point::new(45.0, 45.0));
        assert_eq!(h.scene().get(first).unwrap().bounds(), kurbo::Rect::new(10.0, 10.0, 50.0, 50.0));
        assert_eq!(h.pointer_up(), Some(DrawEnd { shape: Some(second) }));
        assert_eq!(h.scene().len(), 2);
    }

    #[test]
    fn select_mode_drag_moves_shape() {
        let mut h = host();
        h.set_draw_mode(DrawMode::Rect);
        let id = h.pointer_down(Point::new(10.0, 10.0)).unwrap();
        h.pointer_move(Point::new(50.0, 50.0));
        h.pointer_up();
        assert_eq!(h.pointer_down(Point::new(20.0, 20.0)), Some(id));
        assert!(h.pointer_move(Point::new(30.0, 40.0)));
        h.pointer_up();
        assert_eq!(h.scene().get(id).unwrap().bounds(), kurbo::Rect::new(20.0, 30.0, 60.0, 70.0));
    }

    #[test]
    fn failed_import_keeps_scene() {
        let mut h = host();
        h.set_draw_mode(DrawMode::TextSmall);
        h.pointer_down(Point::new(10.0, 10.0));
        h.pointer_up();
        let exported = h.export_json().unwrap();
        assert!(matches!(h.import_json("[1, 2"), Err(PaintError::MalformedScene(_))));
        assert_eq!(h.export_json().unwrap(), exported);
    }

    #[test]
    fn text_can_be_edited() {
        let mut h = host();
        h.set_draw_mode(DrawMode::TextLarge);
        let id = h.pointer_down(Point::new(10.0, 10.0)).unwrap();
        h.pointer_up();
        assert!(h.edit_text(id, "Hello"));
        assert!(!h.edit_text(id + 1, "nope"));
        match h.scene().get(id) {
            Some(Shape::Textbox(t)) => assert_eq!(t.text, "Hello"),
            other => panic!("expected textbox, got {:?}", other),
        }
    }

    #[test]
    fn background_load_applies_current_ticket() {
        let mut h = host();
        let stale = h.loader.begin();
        let current = h.loader.begin();
        assert_eq!(h.finish_background_load(stale, &png_url()).unwrap(), None);
        let bg = h.finish_background_load(current, &png_url()).unwrap().unwrap();
        assert_eq!((bg.width, bg.height), (4.0, 4.0));
        assert!(h.rotate_background());
        assert_eq!(h.scene().background().unwrap().angle, 90.0);
    }

    #[test]
    fn teardown_mid_load_drops_the_background() {
        let mut h = host();
        let ticket = h.loader.begin();
        h.dispose();
        assert_eq!(h.finish_background_load(ticket, &png_url()).unwrap(), None);
        assert!(h.scene().background().is_none());
        assert_eq!(h.pointer_down(Point::new(1.0, 1.0)), None);
        assert_eq!(h.pointer_up(), None);
    }

    #[test]
    fn rotate_without_background_is_noop() {
        let mut h = host();
        assert!(!h.rotate_background());
    }
}
