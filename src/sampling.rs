//! Picks a background / text color pair for a region from the pixels around it.
//!
//! Always reads the pristine base raster. Sampling a composited frame would
//! pick up earlier overlays, and every re-sample of an already-covered region
//! would drift darker.

use egui::Color32;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Background color matching the surroundings plus a readable text color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub background: Color32,
    pub text: Color32,
}

impl ColorPair {
    /// Used when no pixel could be sampled.
    pub const FALLBACK: ColorPair = ColorPair {
        background: Color32::BLACK,
        text: Color32::WHITE,
    };

    /// Keep a chosen background and derive the text color from it.
    pub fn for_background(background: Color32) -> Self {
        Self {
            background,
            text: contrast_text_color(background),
        }
    }
}

/// Which pixels around the target rect feed the average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleMode {
    /// A ring of `width` px just outside the four edges.
    Border { width: u32 },
    /// One-pixel lines hugging each edge from outside, pulled back inside the
    /// image where the rect touches an image edge.
    Perimeter,
}

impl Default for SampleMode {
    fn default() -> Self {
        SampleMode::Border { width: 5 }
    }
}

/// Perceived brightness, 0..=255.
pub fn brightness(color: Color32) -> f32 {
    (color.r() as f32 * 299.0 + color.g() as f32 * 587.0 + color.b() as f32 * 114.0) / 1000.0
}

/// Black on bright backgrounds, white otherwise.
pub fn contrast_text_color(background: Color32) -> Color32 {
    if brightness(background) > 128.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

/// Half-open pixel span `[x0, x1) x [y0, y1)` in image space, may be out of bounds.
#[derive(Debug, Clone, Copy)]
struct Strip {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl Strip {
    fn sized(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x + w,
            y1: y + h,
        }
    }

    fn clipped(self, width: u32, height: u32) -> Option<Strip> {
        let clipped = Strip {
            x0: self.x0.max(0),
            y0: self.y0.max(0),
            x1: self.x1.min(width as i64),
            y1: self.y1.min(height as i64),
        };
        (clipped.x1 > clipped.x0 && clipped.y1 > clipped.y0).then_some(clipped)
    }
}

fn border_strips(rect: &Rect, width: u32) -> [Strip; 4] {
    let bw = width.max(1) as i64;
    let x = rect.x.floor() as i64;
    let y = rect.y.floor() as i64;
    let w = rect.w.floor() as i64;
    let h = rect.h.floor() as i64;
    [
        Strip::sized(x, y - bw, w, bw),
        Strip::sized(x, y + h, w, bw),
        Strip::sized(x - bw, y, bw, h),
        Strip::sized(x + w, y, bw, h),
    ]
}

fn perimeter_strips(rect: &Rect, width: u32, height: u32) -> [Strip; 4] {
    let (img_w, img_h) = (width as i64, height as i64);
    let x = rect.x.round() as i64;
    let y = rect.y.round() as i64;
    let w = rect.w.round() as i64;
    let h = rect.h.round() as i64;

    let top = (y - 1).max(0);
    let bottom = (y + h + 1).min(img_h - 1);
    let left = (x - 1).max(0);
    let right = (x + w + 1).min(img_w - 1);

    [
        Strip::sized(x, top, w, 1),
        Strip::sized(x, bottom, w, 1),
        Strip::sized(left, y, 1, h),
        Strip::sized(right, y, 1, h),
    ]
}

/// Average the sampled pixels and pick a contrasting text color.
///
/// Strips that fall entirely outside the image are skipped; if nothing at all
/// was sampled the result is [`ColorPair::FALLBACK`].
pub fn sample_colors(base: &RgbaImage, rect: &Rect, mode: SampleMode) -> ColorPair {
    let (width, height) = base.dimensions();
    let strips = match mode {
        SampleMode::Border { width: ring } => border_strips(rect, ring),
        SampleMode::Perimeter => perimeter_strips(rect, width, height),
    };

    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for strip in strips.iter().filter_map(|s| s.clipped(width, height)) {
        for py in strip.y0..strip.y1 {
            for px in strip.x0..strip.x1 {
                let pixel = base.get_pixel(px as u32, py as u32);
                sum[0] += pixel[0] as u64;
                sum[1] += pixel[1] as u64;
                sum[2] += pixel[2] as u64;
                count += 1;
            }
        }
    }

    if count == 0 {
        return ColorPair::FALLBACK;
    }

    let mean = |channel: u64| ((channel as f64 / count as f64).round()) as u8;
    ColorPair::for_background(Color32::from_rgb(mean(sum[0]), mean(sum[1]), mean(sum[2])))
}
