//! Editor configuration.

use std::fs;
use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sampling::SampleMode;

/// Tunables for the interaction controller, compositor defaults and export.
///
/// Missing fields fall back to their defaults, so partial JSON files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Drawn rects narrower or shorter than this (raster px) are discarded.
    pub min_commit_size: f32,
    /// Pointer travel below this distance on release counts as a click.
    pub drag_threshold: f32,
    /// Default blur radius for new Blur actions.
    pub blur_radius: f32,
    /// Default mosaic cell size for new Pixelate actions.
    pub pixel_size: u32,
    /// Default fill for new Block actions.
    pub block_color: Color32,
    /// Default font size for new Text actions.
    pub font_size: f32,
    /// How text background colors are sampled from the base raster.
    pub sampling: SampleMode,
    pub min_scale: f32,
    pub max_scale: f32,
    pub wheel_zoom_in: f32,
    pub wheel_zoom_out: f32,
    /// Oversampling applied when rasterizing PDF pages.
    pub pdf_scale: f32,
    pub jpeg_quality: u8,
    /// Font used for text overlays. The bundled UI font is used when unset.
    pub font_path: Option<PathBuf>,
    /// Where the desktop shell writes exported files.
    pub output_dir: PathBuf,
    /// Extra pixels added around OCR bounding boxes before blurring them.
    pub auto_redact_padding: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_commit_size: 5.0,
            drag_threshold: 5.0,
            blur_radius: 12.0,
            pixel_size: 12,
            block_color: Color32::BLACK,
            font_size: 16.0,
            sampling: SampleMode::default(),
            min_scale: 0.2,
            max_scale: 5.0,
            wheel_zoom_in: 1.1,
            wheel_zoom_out: 0.9,
            pdf_scale: 2.0,
            jpeg_quality: 92,
            font_path: None,
            output_dir: PathBuf::from("."),
            auto_redact_padding: 0.0,
        }
    }
}

impl EditorConfig {
    /// Load from a JSON file. An absent file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{ "drag_threshold": 8.0 }"#).unwrap();
        assert_eq!(config.drag_threshold, 8.0);
        assert_eq!(config.min_commit_size, 5.0);
        assert_eq!(config.jpeg_quality, 92);
    }

    #[test]
    fn missing_file_is_default() {
        let config = EditorConfig::load("/definitely/not/here/redact.json").unwrap();
        assert_eq!(config, EditorConfig::default());
    }
}
