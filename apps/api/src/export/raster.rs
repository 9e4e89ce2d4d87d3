use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgb, RgbImage};
use thiserror::Error;

use crate::export::layout::{layout, Color, DrawOp, WHITE};
use crate::preview::VisualDocument;

/// JPEG, which carries the raster into the PDF, cannot encode larger images.
pub const MAX_RASTER_DIMENSION: u32 = 65_535;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("scale factor {0} is not a positive finite number")]
    InvalidScale(f32),

    #[error("raster of {width}x{height} px exceeds the 65535 px limit")]
    TooLarge { width: u64, height: u64 },
}

/// Turns a captured element into a single image covering its full extent.
/// Runs on a blocking thread.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, element: &VisualDocument, scale: f32) -> Result<RgbImage, RasterError>;
}

/// Paints the box layout with an 8x8 bitmap face, nearest-neighbour scaled.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitmapRasterizer;

impl Rasterizer for BitmapRasterizer {
    fn rasterize(&self, element: &VisualDocument, scale: f32) -> Result<RgbImage, RasterError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(RasterError::InvalidScale(scale));
        }

        let laid_out = layout(element);
        let width = (laid_out.width * scale).ceil() as u64;
        let height = (laid_out.height * scale).ceil() as u64;
        if width == 0
            || height == 0
            || width > MAX_RASTER_DIMENSION as u64
            || height > MAX_RASTER_DIMENSION as u64
        {
            return Err(RasterError::TooLarge { width, height });
        }

        let mut canvas = RgbImage::from_pixel(width as u32, height as u32, Rgb(WHITE));
        for op in &laid_out.ops {
            match op {
                DrawOp::Rect { x, y, w, h, color } => {
                    fill_rect(&mut canvas, x * scale, y * scale, w * scale, h * scale, *color)
                }
                DrawOp::Text {
                    x,
                    y,
                    size,
                    color,
                    text,
                } => draw_text(&mut canvas, x * scale, y * scale, size * scale, text, *color),
            }
        }
        Ok(canvas)
    }
}

fn glyph_for(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn fill_rect(canvas: &mut RgbImage, x: f32, y: f32, w: f32, h: f32, color: Color) {
    let x0 = x.round().max(0.0) as u32;
    let y0 = y.round().max(0.0) as u32;
    let x1 = ((x + w).round().max(0.0) as u32).min(canvas.width());
    let y1 = ((y + h).round().max(0.0) as u32).min(canvas.height());
    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px, py, Rgb(color));
        }
    }
}

fn draw_text(canvas: &mut RgbImage, x: f32, y: f32, cell: f32, text: &str, color: Color) {
    let cell_px = cell.ceil().max(1.0) as u32;
    for (i, c) in text.chars().enumerate() {
        if c == ' ' {
            continue;
        }
        let glyph = glyph_for(c);
        let origin_x = (x + i as f32 * cell).round() as i64;
        let origin_y = y.round() as i64;

        for dy in 0..cell_px {
            let row = glyph[((dy as f32 / cell * 8.0) as usize).min(7)];
            if row == 0 {
                continue;
            }
            for dx in 0..cell_px {
                let bit = ((dx as f32 / cell * 8.0) as usize).min(7);
                // font8x8 stores the leftmost pixel in the lowest bit.
                if row & (1 << bit) == 0 {
                    continue;
                }
                let px = origin_x + dx as i64;
                let py = origin_y + dy as i64;
                if px >= 0 && py >= 0 && (px as u32) < canvas.width() && (py as u32) < canvas.height() {
                    canvas.put_pixel(px as u32, py as u32, Rgb(color));
                }
            }
        }
    }
}
