//! Browser backend: paints the display list onto an HTML canvas.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::EditorConfig;
use crate::doc::Color;
use crate::engine::EngineCore;
use crate::input::EditorMode;
use crate::render::{DrawOp, Painter, TextAlign, paint_all};
use crate::scale::Viewport;

/// [`Painter`] over a 2D canvas context.
pub struct CanvasPainter<'a> {
    ctx: &'a CanvasRenderingContext2d,
    font_family: &'a str,
}

impl<'a> CanvasPainter<'a> {
    #[must_use]
    pub fn new(ctx: &'a CanvasRenderingContext2d, font_family: &'a str) -> Self {
        Self { ctx, font_family }
    }
}

impl Painter for CanvasPainter<'_> {
    type Error = JsValue;

    fn paint(&mut self, op: &DrawOp) -> Result<(), JsValue> {
        let ctx = self.ctx;
        match op {
            DrawOp::Path { points, closed, stroke, fill } => {
                let Some((first, rest)) = points.split_first() else {
                    return Ok(());
                };
                ctx.begin_path();
                ctx.move_to(first.x, first.y);
                for p in rest {
                    ctx.line_to(p.x, p.y);
                }
                if *closed {
                    ctx.close_path();
                }
                if let Some(color) = fill {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill();
                }
                if let Some(spec) = stroke {
                    let dash = js_sys::Array::new();
                    if let Some([on, off]) = spec.dash {
                        dash.push(&on.into());
                        dash.push(&off.into());
                    }
                    ctx.set_line_dash(&dash)?;
                    ctx.set_stroke_style_str(&css_color(spec.color));
                    ctx.set_line_width(spec.width);
                    ctx.set_line_cap("round");
                    ctx.set_line_join("round");
                    ctx.stroke();
                }
                Ok(())
            }
            DrawOp::Text { anchor, content, size, color, align, rotation, bold } => {
                ctx.save();
                ctx.translate(anchor.x, anchor.y)?;
                ctx.rotate(rotation.to_radians())?;
                let weight = if *bold { "bold " } else { "" };
                ctx.set_font(&format!("{weight}{size}px {}", self.font_family));
                ctx.set_fill_style_str(&css_color(*color));
                match align {
                    TextAlign::Start => {
                        ctx.set_text_align("left");
                        ctx.set_text_baseline("top");
                    }
                    TextAlign::Center => {
                        ctx.set_text_align("center");
                        ctx.set_text_baseline("middle");
                    }
                }
                ctx.fill_text(content, 0.0, 0.0)?;
                ctx.restore();
                Ok(())
            }
        }
    }
}

fn css_color(c: Color) -> String {
    format!("rgba({}, {}, {}, {:.3})", c.r, c.g, c.b, f64::from(c.a) / 255.0)
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
    dpr: f64,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, mode: EditorMode, config: EditorConfig) -> Self {
        let viewport = Viewport::new(f64::from(canvas.width()), f64::from(canvas.height()));
        Self { canvas, core: EngineCore::new(mode, viewport, config), dpr: 1.0 }
    }

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
        self.core.set_viewport(width_css, height_css);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (w, h) = ((width_css * self.dpr).round() as u32, (height_css * self.dpr).round() as u32);
        self.canvas.set_width(w);
        self.canvas.set_height(h);
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let viewport = self.core.viewport;

        ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)?;
        ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);

        let ops = self.core.display_list();
        let family = self.core.editor.style.font.family.clone();
        let mut painter = CanvasPainter::new(&ctx, &family);
        paint_all(&mut painter, &ops)
    }
}
