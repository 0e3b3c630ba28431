//! PNG rasterization of a [`ContractLayout`] using tiny-skia for geometry
//! and ab_glyph for glyph outlines. Pages are stacked vertically on one
//! canvas, separated by a seam line, so the artifact stays a single image.

use ab_glyph::{point, Font, GlyphId, PxScale, ScaleFont};
use tiny_skia::{
    Color, FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect, Stroke, Transform,
};

use crate::error::ContractError;
use crate::fonts::ContractFont;
use crate::layout::{ContractLayout, TextRun, TextShade};

fn ink() -> Color {
    Color::from_rgba8(26, 26, 26, 255)
}

fn muted() -> Color {
    Color::from_rgba8(102, 102, 102, 255)
}

fn row_shade() -> Color {
    Color::from_rgba8(244, 244, 244, 255)
}

fn seam() -> Color {
    Color::from_rgba8(200, 200, 200, 255)
}

/// Render every page of the layout into one PNG.
pub fn rasterize(layout: &ContractLayout, font: &ContractFont) -> Result<Vec<u8>, ContractError> {
    if layout.pages.is_empty() {
        return Err(ContractError::Layout("layout has no pages".to_string()));
    }
    let width = layout.width.round() as u32;
    let page_height = layout.height.round() as u32;
    let total_height = page_height * layout.pages.len() as u32;

    let mut pixmap = Pixmap::new(width, total_height).ok_or_else(|| {
        ContractError::Raster(format!("cannot allocate a {width}x{total_height} canvas"))
    })?;
    pixmap.fill(Color::WHITE);

    for (index, page) in layout.pages.iter().enumerate() {
        let offset_y = index as f32 * layout.height;
        if index > 0 {
            stroke_line(&mut pixmap, 0.0, offset_y, layout.width, 1.0, seam());
        }
        for row in &page.boxes {
            if row.shaded {
                fill_rect(&mut pixmap, row.x, row.y + offset_y, row.w, row.h, row_shade());
            }
        }
        for divider in &page.dividers {
            stroke_line(
                &mut pixmap,
                divider.x1,
                divider.y + offset_y,
                divider.x2,
                divider.width,
                ink(),
            );
        }
        for run in &page.runs {
            draw_run(&mut pixmap, font, run, offset_y);
        }
    }

    pixmap
        .encode_png()
        .map_err(|e| ContractError::Encode(e.to_string()))
}

fn fill_rect(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, color: Color) {
    let mut builder = PathBuilder::new();
    if let Some(rect) = Rect::from_xywh(x, y, w, h) {
        builder.push_rect(rect);
    }
    if let Some(path) = builder.finish() {
        let mut paint = Paint::default();
        paint.set_color(color);
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

fn stroke_line(pixmap: &mut Pixmap, x1: f32, y: f32, x2: f32, width: f32, color: Color) {
    let mut builder = PathBuilder::new();
    builder.move_to(x1, y);
    builder.line_to(x2, y);
    if let Some(path) = builder.finish() {
        let mut paint = Paint::default();
        paint.set_color(color);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

/// Draw one text run: advance a caret across the glyphs, applying kerning,
/// and blend each glyph's coverage into the canvas. Characters the font has
/// no outline for (spaces included) advance the caret and draw nothing.
fn draw_run(pixmap: &mut Pixmap, font: &ContractFont, run: &TextRun, offset_y: f32) {
    let color = match run.shade {
        TextShade::Ink => ink(),
        TextShade::Muted => muted(),
    };
    let scaled = font.inner().as_scaled(PxScale::from(run.size));
    let baseline = run.y + offset_y;

    let mut caret = run.x;
    let mut prev: Option<GlyphId> = None;
    for ch in run.text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(previous) = prev {
            caret += scaled.kern(previous, id);
        }
        let glyph = id.with_scale_and_position(scaled.scale(), point(caret, baseline));
        if let Some(outline) = scaled.outline_glyph(glyph) {
            let bounds = outline.px_bounds();
            outline.draw(|gx, gy, coverage| {
                blend_pixel(
                    pixmap,
                    bounds.min.x as i32 + gx as i32,
                    bounds.min.y as i32 + gy as i32,
                    color,
                    coverage,
                );
            });
        }
        caret += scaled.h_advance(id);
        prev = Some(id);
    }
}

/// Alpha-blend a coverage sample over the (opaque) canvas pixel.
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: Color, coverage: f32) {
    if coverage <= 0.0 {
        return;
    }
    let width = pixmap.width() as i32;
    let height = pixmap.height() as i32;
    if x < 0 || y < 0 || x >= width || y >= height {
        return;
    }
    let alpha = coverage.min(1.0);
    let index = (y * width + x) as usize;
    let pixels = pixmap.pixels_mut();
    let dst = pixels[index];

    let mix = |src: f32, dst: u8| -> u8 {
        (src * alpha * 255.0 + f32::from(dst) * (1.0 - alpha)).round() as u8
    };
    let r = mix(color.red(), dst.red());
    let g = mix(color.green(), dst.green());
    let b = mix(color.blue(), dst.blue());
    if let Some(blended) = PremultipliedColorU8::from_rgba(r, g, b, 255) {
        pixels[index] = blended;
    }
}
