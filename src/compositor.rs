use egui::Color32;
use image::RgbaImage;

use crate::action::Action;
use crate::effects::{self, rgba};
use crate::geometry::{PixelBounds, Rect};
use crate::text::TextRasterizer;

/// Selection highlight stroke and corner markers.
pub const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
/// Dashed outline around the rect being drawn.
pub const PREVIEW_COLOR: Color32 = Color32::from_rgb(0x22, 0xc5, 0x5e);

const STROKE_WIDTH: f32 = 2.0;
const MARKER_SIZE: f32 = 6.0;
const DASH: (i64, i64) = (6, 6);

/// Layers actions over a base raster.
///
/// Every call starts from the untouched base, so rendering the same base and
/// action list twice gives byte-identical output.
#[derive(Debug, Clone)]
pub struct Compositor {
    text: Option<TextRasterizer>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::with_font(None)
    }
}

impl Compositor {
    pub fn new(text: Option<TextRasterizer>) -> Self {
        Self { text }
    }

    /// Load the overlay font from `path` or fall back to the bundled one.
    ///
    /// Without any usable font, text overlays render as their fill only.
    pub fn with_font(path: Option<&std::path::Path>) -> Self {
        match TextRasterizer::load(path) {
            Ok(text) => Self::new(Some(text)),
            Err(err) => {
                log::warn!("No font for text overlays, drawing fills only: {err}");
                Self::new(None)
            }
        }
    }

    /// Composite `base`, then `actions` in order, then the optional preview
    /// action with its dashed outline, then the optional selection highlight.
    ///
    /// Args:
    ///     base: The pristine page raster, never modified
    ///     actions: Committed actions in z-order
    ///     preview: The in-progress draw, not part of the store
    ///     highlight: Rect of the selected action
    ///
    /// Returns:
    ///     RgbaImage: A new raster the size of `base`
    pub fn render(
        &self,
        base: &RgbaImage,
        actions: &[Action],
        preview: Option<&Action>,
        highlight: Option<&Rect>,
    ) -> RgbaImage {
        let mut frame = base.clone();
        for action in actions {
            self.apply(&mut frame, base, action);
        }
        if let Some(preview) = preview {
            self.apply(&mut frame, base, preview);
            stroke_rect(&mut frame, &preview.rect(), PREVIEW_COLOR, Some(DASH));
        }
        if let Some(rect) = highlight {
            draw_highlight(&mut frame, rect);
        }
        frame
    }

    /// What export and the clipboard get: no preview, no highlight.
    pub fn render_export(&self, base: &RgbaImage, actions: &[Action]) -> RgbaImage {
        self.render(base, actions, None, None)
    }

    /// Draw one action onto `target`, reading source pixels from `base`.
    pub fn apply(&self, target: &mut RgbaImage, base: &RgbaImage, action: &Action) {
        match action {
            Action::Blur { rect, radius } => effects::blur_rect(target, base, rect, *radius),
            Action::Pixelate { rect, cell_size } => {
                effects::pixelate_rect(target, base, rect, *cell_size);
            }
            Action::Block { rect, fill } => effects::fill_rect(target, rect, *fill),
            Action::Text(overlay) => {
                effects::fill_rect(target, &overlay.rect, overlay.fill);
                if let Some(text) = &self.text {
                    text.draw_centered(
                        target,
                        &overlay.rect,
                        &overlay.text,
                        overlay.font_size,
                        overlay.text_color,
                    );
                }
            }
        }
    }
}

fn draw_highlight(target: &mut RgbaImage, rect: &Rect) {
    stroke_rect(target, rect, HIGHLIGHT_COLOR, None);
    let half = MARKER_SIZE / 2.0;
    for corner in [rect.origin(), egui::pos2(rect.right(), rect.bottom())] {
        let marker = Rect::new(corner.x - half, corner.y - half, MARKER_SIZE, MARKER_SIZE);
        effects::fill_rect(target, &marker, HIGHLIGHT_COLOR);
    }
}

/// Stroke centred on the rect's edges, optionally dashed `(on, off)` along each edge.
fn stroke_rect(target: &mut RgbaImage, rect: &Rect, color: Color32, dash: Option<(i64, i64)>) {
    let (width, height) = target.dimensions();
    let half = STROKE_WIDTH / 2.0;
    let Some(outer) = rect.expand(half).pixel_bounds(width, height) else {
        return;
    };
    let inner = shrink(rect, half).and_then(|r| r.pixel_bounds(width, height));
    let pixel = rgba(color);
    let x0 = rect.x.round() as i64;
    let y0 = rect.y.round() as i64;

    for y in outer.y..outer.y + outer.h {
        for x in outer.x..outer.x + outer.w {
            if inner.is_some_and(|i| contains(i, x, y)) {
                continue;
            }
            if let Some((on, off)) = dash {
                // Horizontal bands dash along x, vertical bands along y.
                let on_vertical_edge = inner.is_some_and(|i| y >= i.y && y < i.y + i.h);
                let along = if on_vertical_edge { y as i64 - y0 } else { x as i64 - x0 };
                if along.rem_euclid(on + off) >= on {
                    continue;
                }
            }
            target.put_pixel(x, y, pixel);
        }
    }
}

fn shrink(rect: &Rect, amount: f32) -> Option<Rect> {
    (rect.w > 2.0 * amount && rect.h > 2.0 * amount).then(|| {
        Rect::new(
            rect.x + amount,
            rect.y + amount,
            rect.w - 2.0 * amount,
            rect.h - 2.0 * amount,
        )
    })
}

fn contains(bounds: PixelBounds, x: u32, y: u32) -> bool {
    x >= bounds.x && x < bounds.x + bounds.w && y >= bounds.y && y < bounds.y + bounds.h
}
