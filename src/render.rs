use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};
use crate::engine::CanvasHost;
use crate::error::PaintError;
use crate::io::encode_jpeg_data_url;
use crate::objects::{Shape, TEXT_LINE_HEIGHT};
use crate::scene::BackgroundImage;

const FONT_FAMILY: &str = "Times New Roman";
const SELECTION_COLOR: &str = "#4facfe";
const HANDLE_SIZE: f64 = 8.0;

fn js_error(e: PaintError) -> JsValue {
    JsError::from(e).into()
}

#[wasm_bindgen]
impl CanvasHost {
    pub fn render(&mut self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        self.draw_scene(ctx, true)
    }

    /// Flattens the scene to a JPEG data URL. The context is redrawn with the
    /// selection frame afterwards.
    pub fn export_image(&mut self, ctx: &CanvasRenderingContext2d) -> Result<String, JsValue> {
        self.draw_scene(ctx, false)?;
        let (width, height) = self.state.config.pixel_size();
        let pixels = ctx.get_image_data(0.0, 0.0, width as f64, height as f64)?;
        let url = encode_jpeg_data_url(&pixels.data(), width, height, self.state.config.jpeg_quality())
            .map_err(js_error)?;
        log::info!("exported {}x{} image ({} bytes)", width, height, url.len());
        self.draw_scene(ctx, true)?;
        Ok(url)
    }
}

impl CanvasHost {
    fn draw_scene(&mut self, ctx: &CanvasRenderingContext2d, with_selection: bool) -> Result<(), JsValue> {
        let config = self.state.config;
        ctx.save();
        ctx.clear_rect(0.0, 0.0, config.width, config.height);
        ctx.set_fill_style_str("#ffffff");
        ctx.fill_rect(0.0, 0.0, config.width, config.height);

        if let Some(img) = self.background_element.as_ref().filter(|img| img.complete()) {
            self.state.scene.size_background(img.natural_width() as f64, img.natural_height() as f64);
        }
        let background_pending = match (self.state.scene.background(), &self.background_element) {
            (Some(bg), Some(img)) if img.complete() && img.natural_width() > 0 => {
                draw_background(ctx, bg, img)?;
                false
            }
            (Some(_), Some(_)) => true,
            _ => false,
        };
        if background_pending {
            // Still decoding; try again next frame.
            self.state.scene.request_render();
        }

        for obj in self.state.scene.objects() {
            draw_shape(ctx, &obj.shape)?;
        }

        if with_selection {
            if let Some(shape) = self.state.scene.active_id().and_then(|id| self.state.scene.get(id)) {
                draw_selection(ctx, shape);
            }
        }
        ctx.restore();
        Ok(())
    }
}

fn draw_background(ctx: &CanvasRenderingContext2d, bg: &BackgroundImage, img: &HtmlImageElement) -> Result<(), JsValue> {
    ctx.save();
    ctx.translate(bg.left + bg.width / 2.0, bg.top + bg.height / 2.0)?;
    ctx.rotate(bg.angle.to_radians())?;
    ctx.draw_image_with_html_image_element_and_dw_and_dh(img, -bg.width / 2.0, -bg.height / 2.0, bg.width, bg.height)?;
    ctx.restore();
    Ok(())
}

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape) -> Result<(), JsValue> {
    let props = shape.props();
    ctx.save();
    ctx.set_fill_style_str(&props.fill);
    ctx.set_line_width(props.stroke_width);
    if let Some(stroke) = &props.stroke {
        ctx.set_stroke_style_str(stroke);
    }
    let stroked = props.stroke.is_some() && props.stroke_width > 0.0;

    match shape {
        Shape::Rect(r) => {
            ctx.fill_rect(r.props.left, r.props.top, r.width, r.height);
            if stroked { ctx.stroke_rect(r.props.left, r.props.top, r.width, r.height); }
        }
        Shape::Ellipse(e) => {
            ctx.begin_path();
            ctx.ellipse(e.props.left + e.rx, e.props.top + e.ry, e.rx, e.ry, 0.0, 0.0, std::f64::consts::TAU)?;
            ctx.fill();
            if stroked { ctx.stroke(); }
        }
        Shape::Textbox(t) => {
            ctx.set_font(&format!("{}px {}", t.font_size, FONT_FAMILY));
            ctx.set_text_baseline("top");
            let line_height = t.font_size * TEXT_LINE_HEIGHT;
            for (i, line) in t.text.split('\n').enumerate() {
                ctx.fill_text(line, t.props.left, t.props.top + i as f64 * line_height)?;
            }
        }
    }
    ctx.restore();
    Ok(())
}

fn draw_selection(ctx: &CanvasRenderingContext2d, shape: &Shape) {
    let mut frame = shape.bounds();
    if let Shape::Textbox(t) = shape {
        // Empty-width text boxes are framed around their text instead.
        if let Ok(metrics) = measure(ctx, t.font_size, &t.text) {
            frame.x1 = frame.x0 + frame.width().max(metrics);
        }
    }
    ctx.save();
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.5);
    ctx.stroke_rect(frame.x0, frame.y0, frame.width(), frame.height());
    ctx.set_fill_style_str("#ffffff");
    ctx.set_line_width(1.0);
    for (fx, fy) in shape.props().controls.visible_anchors() {
        let hx = frame.x0 + frame.width() * fx;
        let hy = frame.y0 + frame.height() * fy;
        ctx.begin_path();
        ctx.rect(hx - HANDLE_SIZE / 2.0, hy - HANDLE_SIZE / 2.0, HANDLE_SIZE, HANDLE_SIZE);
        ctx.fill();
        ctx.stroke();
    }
    ctx.restore();
}

fn measure(ctx: &CanvasRenderingContext2d, font_size: f64, text: &str) -> Result<f64, JsValue> {
    ctx.set_font(&format!("{}px {}", font_size, FONT_FAMILY));
    let widest = text
        .split('\n')
        .map(|line| ctx.measure_text(line).map(|m| m.width()))
        .collect::<Result<Vec<f64>, JsValue>>()?
        .into_iter()
        .fold(0.0, f64::max);
    Ok(widest)
}
