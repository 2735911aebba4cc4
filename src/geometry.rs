use egui::{Pos2, Vec2};

/// Axis-aligned rectangle in base-raster pixel coordinates.
///
/// Never in display coordinates: pointer positions are mapped through the
/// viewport before any rect math happens.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Integer pixel span of a rect after clipping to an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
        }
    }

    /// Bounding box of two corners, whichever direction the drag went.
    pub fn from_corners(a: Pos2, b: Pos2) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: (b.x - a.x).abs(),
            h: (b.y - a.y).abs(),
        }
    }

    pub fn origin(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn center(&self) -> Pos2 {
        Pos2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Inclusive on every edge.
    pub fn contains(&self, p: Pos2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// True when either side is below `min` (a canceled drag).
    pub fn is_degenerate(&self, min: f32) -> bool {
        self.w < min || self.h < min
    }

    /// Same size, new top-left corner.
    pub fn with_origin(&self, origin: Pos2) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            ..*self
        }
    }

    pub fn translate(&self, delta: Vec2) -> Self {
        self.with_origin(self.origin() + delta)
    }

    pub fn expand(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.w + 2.0 * amount,
            self.h + 2.0 * amount,
        )
    }

    /// Round to whole pixels and clip to a `width` x `height` image.
    ///
    /// Returns `None` when nothing of the rect lies inside the image.
    pub fn pixel_bounds(&self, width: u32, height: u32) -> Option<PixelBounds> {
        let x0 = self.x.round().max(0.0) as i64;
        let y0 = self.y.round().max(0.0) as i64;
        let x1 = (self.right().round() as i64).min(width as i64);
        let y1 = (self.bottom().round() as i64).min(height as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelBounds {
            x: x0 as u32,
            y: y0 as u32,
            w: (x1 - x0) as u32,
            h: (y1 - y0) as u32,
        })
    }
}

impl From<egui::Rect> for Rect {
    fn from(r: egui::Rect) -> Self {
        Self::new(r.min.x, r.min.y, r.width(), r.height())
    }
}

impl From<Rect> for egui::Rect {
    fn from(r: Rect) -> Self {
        egui::Rect::from_min_size(r.origin(), Vec2::new(r.w, r.h))
    }
}
