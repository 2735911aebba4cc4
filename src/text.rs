//! Text overlay rasterization.

use std::fs;
use std::path::Path;

use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use egui::Color32;
use image::RgbaImage;

use crate::error::{RedactError, Result};
use crate::geometry::Rect;

/// Horizontal room left free inside a text overlay (4 px per side).
pub const TEXT_INSET: f32 = 8.0;

/// Draws a single centred line of text into a rect.
#[derive(Clone)]
pub struct TextRasterizer {
    font: FontArc,
}

impl std::fmt::Debug for TextRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRasterizer").finish_non_exhaustive()
    }
}

impl TextRasterizer {
    /// The proportional font egui ships with.
    pub fn bundled() -> Result<Self> {
        let font = FontArc::try_from_slice(epaint_default_fonts::UBUNTU_LIGHT)
            .map_err(|e| RedactError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| RedactError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    /// Use `path` when given and loadable, otherwise the bundled font.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            match Self::from_path(path) {
                Ok(rasterizer) => {
                    log::info!("Using overlay font {}", path.display());
                    return Ok(rasterizer);
                }
                Err(err) => log::warn!("Overlay font {} unusable: {err}", path.display()),
            }
        }
        Self::bundled()
    }

    fn layout(&self, text: &str, scale: PxScale) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = self.font.as_scaled(scale);
        let mut glyphs = Vec::new();
        let mut cursor_x = 0.0f32;
        let mut last: Option<GlyphId> = None;
        for ch in text.chars().filter(|c| !c.is_control()) {
            let id = self.font.glyph_id(ch);
            if let Some(prev) = last {
                cursor_x += scaled.kern(prev, id);
            }
            glyphs.push((id, cursor_x));
            cursor_x += scaled.h_advance(id);
            last = Some(id);
        }
        (glyphs, cursor_x)
    }

    /// Advance width of `text` at `font_size`.
    pub fn measure(&self, text: &str, font_size: f32) -> f32 {
        self.layout(text, PxScale::from(font_size)).1
    }

    /// Centre `text` inside `rect`, squeezing it horizontally when it is wider
    /// than `rect.w - TEXT_INSET`. Pixels outside the rect are never touched.
    pub fn draw_centered(
        &self,
        target: &mut RgbaImage,
        rect: &Rect,
        text: &str,
        font_size: f32,
        color: Color32,
    ) {
        let max_width = rect.w - TEXT_INSET;
        if text.is_empty() || font_size <= 0.0 || max_width <= 0.0 {
            return;
        }
        let Some(clip) = rect.pixel_bounds(target.width(), target.height()) else {
            return;
        };

        let natural = self.measure(text, font_size);
        let squeeze = if natural > max_width { max_width / natural } else { 1.0 };
        let scale = PxScale {
            x: font_size * squeeze,
            y: font_size,
        };
        let (glyphs, width) = self.layout(text, scale);
        let scaled = self.font.as_scaled(scale);

        let center = rect.center();
        let left = center.x - width / 2.0;
        let baseline = center.y + (scaled.ascent() + scaled.descent()) / 2.0;

        let [r, g, b, a] = color.to_srgba_unmultiplied();
        let ink = [r as f32, g as f32, b as f32];
        let clip_x = clip.x as i64..(clip.x + clip.w) as i64;
        let clip_y = clip.y as i64..(clip.y + clip.h) as i64;

        for (id, x) in glyphs {
            let glyph = id.with_scale_and_position(scale, point(left + x, baseline));
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + gx as i64;
                let py = bounds.min.y as i64 + gy as i64;
                if !clip_x.contains(&px) || !clip_y.contains(&py) {
                    return;
                }
                let alpha = coverage.clamp(0.0, 1.0) * (a as f32 / 255.0);
                let pixel = target.get_pixel_mut(px as u32, py as u32);
                for (channel, ink) in pixel.0.iter_mut().take(3).zip(ink) {
                    let blended = *channel as f32 * (1.0 - alpha) + ink * alpha;
                    *channel = blended.round() as u8;
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn draws_inside_rect_only() {
        let text = TextRasterizer::bundled().unwrap();
        let mut target = RgbaImage::from_pixel(120, 60, Rgba([255, 255, 255, 255]));
        let rect = Rect::new(10.0, 10.0, 100.0, 40.0);
        text.draw_centered(&mut target, &rect, "secret", 16.0, Color32::BLACK);

        let mut inked = 0;
        for (x, y, pixel) in target.enumerate_pixels() {
            if pixel.0 != [255, 255, 255, 255] {
                assert!(rect.contains(egui::pos2(x as f32, y as f32)));
                inked += 1;
            }
        }
        assert!(inked > 0);
    }

    #[test]
    fn long_text_is_squeezed_into_rect() {
        let text = TextRasterizer::bundled().unwrap();
        let mut target = RgbaImage::from_pixel(60, 40, Rgba([255, 255, 255, 255]));
        let rect = Rect::new(0.0, 0.0, 60.0, 40.0);
        text.draw_centered(&mut target, &rect, "a very long overlay line", 16.0, Color32::BLACK);

        // Nothing lands in the 4 px gutters (allowing one pixel of antialiasing).
        for y in 0..40 {
            for x in (0..3).chain(57..60) {
                assert_eq!(target.get_pixel(x, y).0, [255, 255, 255, 255], "ink at {x},{y}");
            }
        }
    }

    #[test]
    fn too_narrow_rect_draws_nothing() {
        let text = TextRasterizer::bundled().unwrap();
        let mut target = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
        let before = target.clone();
        text.draw_centered(&mut target, &Rect::new(0.0, 0.0, 6.0, 20.0), "x", 16.0, Color32::BLACK);
        assert_eq!(target, before);
    }

    #[test]
    fn missing_font_path_falls_back() {
        assert!(TextRasterizer::load(Some(Path::new("/no/such/font.ttf"))).is_ok());
    }
}
