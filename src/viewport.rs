use egui::{Pos2, Vec2};

use crate::config::EditorConfig;

/// Pan/zoom state of the canvas.
///
/// Display positions are relative to the canvas origin, in egui points.
/// At scale 1 one raster pixel covers one physical screen pixel, so the
/// mapping also divides out `backing` (physical pixels per point).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub offset: Vec2,
    pub backing: f32,
    min_scale: f32,
    max_scale: f32,
    wheel_in: f32,
    wheel_out: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Viewport {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            backing: 1.0,
            min_scale: config.min_scale,
            max_scale: config.max_scale,
            wheel_in: config.wheel_zoom_in,
            wheel_out: config.wheel_zoom_out,
        }
    }

    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = self.clamp(scale);
    }

    /// Display points per raster pixel.
    fn points_per_pixel(&self) -> f32 {
        self.scale / self.backing.max(f32::EPSILON)
    }

    /// Display position to base-raster position.
    pub fn to_raster(&self, display: Pos2) -> Pos2 {
        ((display.to_vec2() - self.offset) / self.points_per_pixel()).to_pos2()
    }

    /// Base-raster position to display position.
    pub fn to_display(&self, raster: Pos2) -> Pos2 {
        (raster.to_vec2() * self.points_per_pixel() + self.offset).to_pos2()
    }

    /// Where a raster of `size` pixels lands, relative to the canvas origin.
    pub fn display_rect(&self, size: (u32, u32)) -> egui::Rect {
        egui::Rect::from_min_max(
            self.to_display(Pos2::ZERO),
            self.to_display(Pos2::new(size.0 as f32, size.1 as f32)),
        )
    }

    /// One wheel notch: scrolling up zooms in, down zooms out.
    pub fn wheel(&mut self, delta_y: f32) {
        if delta_y == 0.0 {
            return;
        }
        let step = if delta_y > 0.0 { self.wheel_in } else { self.wheel_out };
        self.set_scale(self.scale * step);
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn mapping_round_trips() {
        let mut viewport = Viewport::default();
        viewport.scale = 2.0;
        viewport.offset = vec2(30.0, -10.0);
        viewport.backing = 2.0;
        let raster = pos2(40.0, 25.0);
        let display = viewport.to_display(raster);
        assert_eq!(display, pos2(70.0, 15.0));
        assert_eq!(viewport.to_raster(display), raster);
    }

    #[test]
    fn backing_factor_scales_pointer() {
        let mut viewport = Viewport::default();
        viewport.backing = 2.0;
        assert_eq!(viewport.to_raster(pos2(10.0, 10.0)), pos2(20.0, 20.0));
    }

    #[test]
    fn wheel_steps_and_clamps() {
        let mut viewport = Viewport::default();
        viewport.wheel(1.0);
        assert!((viewport.scale - 1.1).abs() < 1e-6);
        viewport.wheel(-3.0);
        assert!((viewport.scale - 0.99).abs() < 1e-6);
        for _ in 0..100 {
            viewport.wheel(1.0);
        }
        assert_eq!(viewport.scale, 5.0);
        for _ in 0..100 {
            viewport.wheel(-1.0);
        }
        assert_eq!(viewport.scale, 0.2);
    }
}
