//! Raster export: tiny-skia painter, PNG encoding, and thumbnails.
//!
//! DESIGN
//! ======
//! Export paints the same display list as the screen, minus decorations, into
//! a [`Pixmap`] of `canvas size × density` device pixels. Paths go through
//! tiny-skia with a uniform scale transform; text is rasterized with ab_glyph
//! and blended per pixel. Labels always rasterize: a host font can be loaded,
//! otherwise the bundled DejaVu Sans is used.
//!
//! Thumbnails decode a PNG, fit it inside the target box preserving aspect
//! ratio, and center it on a white canvas.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use std::convert::Infallible;
use std::io::Cursor;

use ab_glyph::{Font, FontArc, FontRef, GlyphId, PxScale, ScaleFont, point};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tiny_skia::{
    FillRule, IntSize, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, PremultipliedColorU8, Stroke,
    StrokeDash, Transform,
};
use tracing::{debug, info};

use crate::doc::{Color, rotate_about};
use crate::render::{DrawOp, Painter, StrokeSpec, TextAlign, paint_all};
use crate::scale::{Point, Viewport};

/// Largest accepted export density.
const MAX_DENSITY: f64 = 8.0;

/// DejaVu Sans, used for labels when the host loads no font.
static BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Export and thumbnail failures.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("canvas not mounted ({width}x{height})")]
    NotMounted { width: f64, height: f64 },
    #[error("invalid export density {0}")]
    InvalidDensity(f64),
    #[error("could not allocate a {width}x{height} pixmap")]
    Allocation { width: u32, height: u32 },
    #[error("png encode failed: {0}")]
    Encode(String),
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("invalid thumbnail size {width}x{height}")]
    InvalidThumbnailSize { width: u32, height: u32 },
    #[error("invalid font: {0}")]
    Font(#[from] ab_glyph::InvalidFont),
}

/// Parse TrueType/OpenType bytes for label rasterization.
///
/// # Errors
///
/// [`ExportError::Font`] when the bytes are not a usable font.
pub fn load_font(bytes: Vec<u8>) -> Result<FontArc, ExportError> {
    Ok(FontArc::try_from_vec(bytes)?)
}

/// The bundled label font.
///
/// # Errors
///
/// [`ExportError::Font`] if the embedded bytes fail to parse.
pub fn bundled_font() -> Result<FontArc, ExportError> {
    Ok(FontArc::new(FontRef::try_from_slice(BUNDLED_FONT)?))
}

/// Decode a background photo.
///
/// # Errors
///
/// [`ExportError::Decode`] when the bytes are not a supported image.
pub fn decode_photo(bytes: &[u8]) -> Result<RgbaImage, ExportError> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Device-pixel size of a `viewport` exported at `density`.
///
/// # Errors
///
/// [`ExportError::NotMounted`] for a zero-sized canvas and
/// [`ExportError::InvalidDensity`] for a non-finite, non-positive, or
/// oversized density.
pub fn export_size(viewport: Viewport, density: f64) -> Result<(u32, u32), ExportError> {
    if !viewport.is_mounted() {
        return Err(ExportError::NotMounted { width: viewport.width, height: viewport.height });
    }
    if !density.is_finite() || density <= 0.0 || density > MAX_DENSITY {
        return Err(ExportError::InvalidDensity(density));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let size = ((viewport.width * density).round() as u32, (viewport.height * density).round() as u32);
    Ok(size)
}

/// Rasterize `ops` over an optional background photo and encode to PNG.
///
/// # Errors
///
/// See [`export_size`]; also [`ExportError::Allocation`] and
/// [`ExportError::Encode`].
pub fn rasterize(
    ops: &[DrawOp],
    viewport: Viewport,
    density: f64,
    background: Option<&RgbaImage>,
    font: &FontArc,
) -> Result<Vec<u8>, ExportError> {
    let (width, height) = export_size(viewport, density)?;
    let mut painter = RasterPainter::new(width, height, density, font)?;
    if let Some(photo) = background {
        painter.draw_background(photo)?;
    }
    let Ok(()) = paint_all(&mut painter, ops);
    let png = painter.encode_png()?;
    info!(width, height, density, bytes = png.len(), "canvas exported");
    Ok(png)
}

// =============================================================
// Raster painter
// =============================================================

/// tiny-skia backend. Coordinates in ops are canvas units; the painter scales
/// them by `density`.
pub struct RasterPainter<'a> {
    pixmap: Pixmap,
    density: f64,
    font: &'a FontArc,
}

impl<'a> RasterPainter<'a> {
    /// A white `width × height` canvas.
    ///
    /// # Errors
    ///
    /// [`ExportError::Allocation`] when the pixmap cannot be created.
    pub fn new(width: u32, height: u32, density: f64, font: &'a FontArc) -> Result<Self, ExportError> {
        let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Allocation { width, height })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        Ok(Self { pixmap, density, font })
    }

    /// Draw `photo` fitted inside the canvas, centered.
    ///
    /// # Errors
    ///
    /// [`ExportError::Allocation`] when the scaled photo cannot be held.
    pub fn draw_background(&mut self, photo: &RgbaImage) -> Result<(), ExportError> {
        let (w, h, x, y) = fit_within(photo.width(), photo.height(), self.pixmap.width(), self.pixmap.height());
        if w == 0 || h == 0 {
            return Ok(());
        }
        let scaled = imageops::resize(photo, w, h, FilterType::Triangle);
        let mut data = scaled.into_raw();
        for px in data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            for c in &mut px[..3] {
                #[allow(clippy::cast_possible_truncation)]
                let premul = ((u16::from(*c) * a + 127) / 255) as u8;
                *c = premul;
            }
        }
        let size = IntSize::from_wh(w, h).ok_or(ExportError::Allocation { width: w, height: h })?;
        let layer = Pixmap::from_vec(data, size).ok_or(ExportError::Allocation { width: w, height: h })?;
        let (x, y) = (i32::try_from(x).unwrap_or(i32::MAX), i32::try_from(y).unwrap_or(i32::MAX));
        self.pixmap.draw_pixmap(x, y, layer.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
        Ok(())
    }

    /// Encode the canvas as PNG.
    ///
    /// # Errors
    ///
    /// [`ExportError::Encode`] on encoder failure.
    pub fn encode_png(&self) -> Result<Vec<u8>, ExportError> {
        self.pixmap.encode_png().map_err(|e| ExportError::Encode(e.to_string()))
    }

    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn transform(&self) -> Transform {
        #[allow(clippy::cast_possible_truncation)]
        let s = self.density as f32;
        Transform::from_scale(s, s)
    }

    fn paint_path(&mut self, points: &[Point], closed: bool, stroke: Option<&StrokeSpec>, fill: Option<Color>) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(to_f32(first.x), to_f32(first.y));
        for p in rest {
            pb.line_to(to_f32(p.x), to_f32(p.y));
        }
        if closed {
            pb.close();
        }
        let Some(path) = pb.finish() else {
            debug!(points = points.len(), "raster path skipped: empty geometry");
            return;
        };
        let transform = self.transform();

        if let Some(color) = fill {
            let paint = solid(color);
            self.pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
        }
        if let Some(spec) = stroke {
            let paint = solid(spec.color);
            let stroke = Stroke {
                width: to_f32(spec.width),
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                dash: spec.dash.and_then(|[on, off]| StrokeDash::new(vec![to_f32(on), to_f32(off)], 0.0)),
                ..Stroke::default()
            };
            self.pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        }
    }

    fn paint_text(&mut self, anchor: Point, content: &str, size: f64, color: Color, align: TextAlign, rotation: f64) {
        let font = self.font;
        let px = to_f32(size * self.density);
        if px <= 0.0 || content.is_empty() {
            return;
        }
        let scaled = font.as_scaled(PxScale::from(px));
        let anchor = Point::new(anchor.x * self.density, anchor.y * self.density);

        let mut width = 0.0_f32;
        let mut prev: Option<GlyphId> = None;
        for ch in content.chars() {
            let gid = font.glyph_id(ch);
            if let Some(p) = prev {
                width += scaled.kern(p, gid);
            }
            width += scaled.h_advance(gid);
            prev = Some(gid);
        }
        let line_h = scaled.ascent() - scaled.descent();
        let (x0, top) = match align {
            TextAlign::Start => (to_f32(anchor.x), to_f32(anchor.y)),
            TextAlign::Center => (to_f32(anchor.x) - width * 0.5, to_f32(anchor.y) - line_h * 0.5),
        };
        let baseline = top + scaled.ascent();

        let mut cx = x0;
        let mut prev: Option<GlyphId> = None;
        for ch in content.chars() {
            let gid = font.glyph_id(ch);
            if let Some(p) = prev {
                cx += scaled.kern(p, gid);
            }
            let glyph = gid.with_scale_and_position(px, point(cx, baseline));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let at = Point::new(f64::from(bounds.min.x) + f64::from(gx), f64::from(bounds.min.y) + f64::from(gy));
                    let at = rotate_about(at, anchor, rotation);
                    blend_pixel(&mut self.pixmap, at, color, coverage);
                });
            }
            cx += scaled.h_advance(gid);
            prev = Some(gid);
        }
    }
}

impl Painter for RasterPainter<'_> {
    type Error = Infallible;

    fn paint(&mut self, op: &DrawOp) -> Result<(), Self::Error> {
        match op {
            DrawOp::Path { points, closed, stroke, fill } => self.paint_path(points, *closed, stroke.as_ref(), *fill),
            DrawOp::Text { anchor, content, size, color, align, rotation, .. } => {
                self.paint_text(*anchor, content, *size, *color, *align, *rotation);
            }
        }
        Ok(())
    }
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

#[allow(clippy::cast_possible_truncation)]
fn to_f32(v: f64) -> f32 {
    v as f32
}

/// Source-over blend of `color` at `coverage` into one device pixel.
fn blend_pixel(pixmap: &mut Pixmap, at: Point, color: Color, coverage: f32) {
    if at.x < 0.0 || at.y < 0.0 {
        return;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (x, y) = (at.x as u32, at.y as u32);
    let width = pixmap.width();
    if x >= width || y >= pixmap.height() {
        return;
    }
    let sa = f32::from(color.a) / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let idx = (y * width + x) as usize;
    let Some(dst) = pixmap.pixels_mut().get_mut(idx) else {
        return;
    };
    let mix = |s: u8, d: u8| {
        let v = f32::from(s) * sa + f32::from(d) * (1.0 - sa);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let v = v.round().clamp(0.0, 255.0) as u8;
        v
    };
    let a = mix(255, dst.alpha());
    let r = mix(color.r, dst.red()).min(a);
    let g = mix(color.g, dst.green()).min(a);
    let b = mix(color.b, dst.blue()).min(a);
    if let Some(px) = PremultipliedColorU8::from_rgba(r, g, b, a) {
        *dst = px;
    }
}

// =============================================================
// Thumbnails
// =============================================================

/// Fit `src` inside `dst` preserving aspect ratio. Returns the scaled size and
/// the offset that centers it: `(w, h, x, y)`.
#[must_use]
pub fn fit_within(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (u32, u32, u32, u32) {
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return (0, 0, 0, 0);
    }
    let scale = (f64::from(dst_w) / f64::from(src_w)).min(f64::from(dst_h) / f64::from(src_h));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let w = ((f64::from(src_w) * scale).round() as u32).clamp(1, dst_w);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let h = ((f64::from(src_h) * scale).round() as u32).clamp(1, dst_h);
    (w, h, (dst_w - w) / 2, (dst_h - h) / 2)
}

/// Scale a PNG to fit inside `width × height`, centered on white.
///
/// # Errors
///
/// [`ExportError::InvalidThumbnailSize`] for a zero target,
/// [`ExportError::Decode`] for unreadable input, and
/// [`ExportError::Encode`] on encoder failure.
pub fn thumbnail(png: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::InvalidThumbnailSize { width, height });
    }
    let source = image::load_from_memory(png)?.to_rgba8();
    let (w, h, x, y) = fit_within(source.width(), source.height(), width, height);
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    if w > 0 && h > 0 {
        let scaled = imageops::resize(&source, w, h, FilterType::Triangle);
        imageops::overlay(&mut canvas, &scaled, i64::from(x), i64::from(y));
    }
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    debug!(width, height, bytes = out.len(), "thumbnail encoded");
    Ok(out)
}
