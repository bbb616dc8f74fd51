use glam::Vec2;
use hud_core::canvas::{Rgba, Surface2d};
use hud_core::error::{HudError, HudResult};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `Surface2d` over a canvas element and its 2d context.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn attach(canvas: web::HtmlCanvasElement) -> HudResult<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| HudError::Js(format!("{:?}", e)))?
            .ok_or(HudError::Context)?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|_| HudError::Context)?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface2d for CanvasSurface {
    fn set_backing_size(&mut self, width_px: u32, height_px: u32) {
        if self.canvas.width() != width_px {
            self.canvas.set_width(width_px);
        }
        if self.canvas.height() != height_px {
            self.canvas.set_height(height_px);
        }
    }

    fn set_scale(&mut self, scale: f64) -> HudResult<()> {
        self.ctx
            .set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0)
            .map_err(|e| HudError::Js(format!("{:?}", e)))
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn set_fill(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.css());
    }

    fn set_stroke(&mut self, color: Rgba, line_width: f32) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(line_width as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }
}
