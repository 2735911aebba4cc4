//! Pixel operations behind each redaction treatment.
//!
//! Every effect reads its source pixels from the pristine base raster and
//! writes only inside the clipped rect on the target.

use egui::Color32;
use image::{imageops, Rgba, RgbaImage};

use crate::geometry::{PixelBounds, Rect};

pub(crate) fn rgba(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}

/// Flat-fill the rect.
pub fn fill_rect(target: &mut RgbaImage, rect: &Rect, color: Color32) {
    let Some(bounds) = rect.pixel_bounds(target.width(), target.height()) else {
        return;
    };
    fill_bounds(target, bounds, rgba(color));
}

pub(crate) fn fill_bounds(target: &mut RgbaImage, bounds: PixelBounds, pixel: Rgba<u8>) {
    for y in bounds.y..bounds.y + bounds.h {
        for x in bounds.x..bounds.x + bounds.w {
            target.put_pixel(x, y, pixel);
        }
    }
}

/// Gaussian blur of the base, visible only inside the rect.
///
/// The blur window extends past the rect (three sigmas) so the edges of the
/// clip blend with their real neighbours, the same as blurring the whole
/// image and clipping.
pub fn blur_rect(target: &mut RgbaImage, base: &RgbaImage, rect: &Rect, radius: f32) {
    let (width, height) = base.dimensions();
    let Some(bounds) = rect.pixel_bounds(width, height) else {
        return;
    };
    if radius <= 0.0 {
        copy_bounds(target, base, bounds);
        return;
    }

    let pad = (radius * 3.0).ceil();
    let Some(window) = rect.expand(pad).pixel_bounds(width, height) else {
        return;
    };
    let source = imageops::crop_imm(base, window.x, window.y, window.w, window.h).to_image();
    let blurred = imageops::blur(&source, radius);

    for y in bounds.y..bounds.y + bounds.h {
        for x in bounds.x..bounds.x + bounds.w {
            let pixel = *blurred.get_pixel(x - window.x, y - window.y);
            target.put_pixel(x, y, pixel);
        }
    }
}

fn copy_bounds(target: &mut RgbaImage, base: &RgbaImage, bounds: PixelBounds) {
    for y in bounds.y..bounds.y + bounds.h {
        for x in bounds.x..bounds.x + bounds.w {
            target.put_pixel(x, y, *base.get_pixel(x, y));
        }
    }
}

/// Mosaic grid for a rect: `max(1, floor(w / cell))` by `max(1, floor(h / cell))`.
pub fn mosaic_grid(w: f32, h: f32, cell_size: u32) -> (u32, u32) {
    let cell = cell_size.max(1) as f32;
    let cols = ((w / cell).floor() as u32).max(1);
    let rows = ((h / cell).floor() as u32).max(1);
    (cols, rows)
}

/// Downsample the rect into a coarse grid of area-averaged cells and paint
/// each cell back as a hard-edged block.
///
/// Returns the grid that was used.
pub fn pixelate_rect(
    target: &mut RgbaImage,
    base: &RgbaImage,
    rect: &Rect,
    cell_size: u32,
) -> (u32, u32) {
    let grid = mosaic_grid(rect.w, rect.h, cell_size);
    let (width, height) = base.dimensions();
    if rect.pixel_bounds(width, height).is_none() {
        return grid;
    }

    let (cols, rows) = grid;
    let x0 = rect.x.round() as i64;
    let y0 = rect.y.round() as i64;
    let span_w = (rect.right().round() as i64 - x0).max(1);
    let span_h = (rect.bottom().round() as i64 - y0).max(1);

    for row in 0..rows as i64 {
        let cy0 = y0 + row * span_h / rows as i64;
        let cy1 = y0 + (row + 1) * span_h / rows as i64;
        for col in 0..cols as i64 {
            let cx0 = x0 + col * span_w / cols as i64;
            let cx1 = x0 + (col + 1) * span_w / cols as i64;
            let Some(cell) = clip_span(cx0, cy0, cx1, cy1, width, height) else {
                continue;
            };
            let average = average_bounds(base, cell);
            fill_bounds(target, cell, average);
        }
    }
    grid
}

fn clip_span(x0: i64, y0: i64, x1: i64, y1: i64, width: u32, height: u32) -> Option<PixelBounds> {
    let x0 = x0.max(0);
    let y0 = y0.max(0);
    let x1 = x1.min(width as i64);
    let y1 = y1.min(height as i64);
    (x1 > x0 && y1 > y0).then(|| PixelBounds {
        x: x0 as u32,
        y: y0 as u32,
        w: (x1 - x0) as u32,
        h: (y1 - y0) as u32,
    })
}

fn average_bounds(base: &RgbaImage, bounds: PixelBounds) -> Rgba<u8> {
    let mut sum = [0u64; 4];
    for y in bounds.y..bounds.y + bounds.h {
        for x in bounds.x..bounds.x + bounds.w {
            let pixel = base.get_pixel(x, y);
            for (acc, channel) in sum.iter_mut().zip(pixel.0) {
                *acc += channel as u64;
            }
        }
    }
    let count = (bounds.w as u64 * bounds.h as u64).max(1);
    let mean = |v: u64| ((v + count / 2) / count) as u8;
    Rgba([mean(sum[0]), mean(sum[1]), mean(sum[2]), mean(sum[3])])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn gradient(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| Rgba([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 128, 255]))
    }

    #[test]
    fn grid_matches_floor_rule() {
        assert_eq!(mosaic_grid(100.0, 50.0, 12), (8, 4));
        assert_eq!(mosaic_grid(5.0, 5.0, 12), (1, 1));
        assert_eq!(mosaic_grid(24.0, 23.9, 12), (2, 1));
    }

    #[test]
    fn pixelate_produces_grid_of_blocks() {
        let base = gradient(120, 120);
        let mut target = base.clone();
        let rect = Rect::new(0.0, 0.0, 96.0, 48.0);
        let (cols, rows) = pixelate_rect(&mut target, &base, &rect, 12);
        assert_eq!((cols, rows), (8, 4));

        // Every cell is uniform.
        for row in 0..rows {
            for col in 0..cols {
                let first = *target.get_pixel(col * 12, row * 12);
                for y in row * 12..(row + 1) * 12 {
                    for x in col * 12..(col + 1) * 12 {
                        assert_eq!(*target.get_pixel(x, y), first);
                    }
                }
            }
        }
        // Outside the rect nothing changed.
        assert_eq!(target.get_pixel(100, 100), base.get_pixel(100, 100));
        assert_eq!(target.get_pixel(10, 60), base.get_pixel(10, 60));
    }

    #[test]
    fn pixelate_small_rect_is_one_cell() {
        let base = gradient(40, 40);
        let mut target = base.clone();
        pixelate_rect(&mut target, &base, &Rect::new(5.0, 5.0, 10.0, 10.0), 12);
        let colors: HashSet<_> = (5..15)
            .flat_map(|y| (5..15).map(move |x| (x, y)))
            .map(|(x, y)| target.get_pixel(x, y).0)
            .collect();
        assert_eq!(colors.len(), 1);
    }

    #[test]
    fn blur_stays_inside_rect() {
        let base = gradient(80, 80);
        let mut target = base.clone();
        let rect = Rect::new(20.0, 20.0, 30.0, 30.0);
        blur_rect(&mut target, &base, &rect, 4.0);
        for y in 0..80 {
            for x in 0..80 {
                let inside = (20..50).contains(&x) && (20..50).contains(&y);
                if !inside {
                    assert_eq!(target.get_pixel(x, y), base.get_pixel(x, y));
                }
            }
        }
        assert_ne!(target, base);
    }

    #[test]
    fn fill_clips_to_image() {
        let mut target = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        fill_rect(&mut target, &Rect::new(5.0, 5.0, 20.0, 20.0), Color32::RED);
        assert_eq!(target.get_pixel(9, 9).0, [255, 0, 0, 255]);
        assert_eq!(target.get_pixel(4, 4).0, [255, 255, 255, 255]);
    }
}
