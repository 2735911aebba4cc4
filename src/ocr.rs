//! Auto-redaction: find emails and phone numbers in recognized text and turn
//! their boxes into blur actions.
//!
//! Recognition itself sits behind [`TextDetector`]. With the `ocr` feature the
//! crate provides [`OcrsDetector`], a local neural OCR engine.

use image::RgbaImage;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::action::Action;
use crate::error::Result;
use crate::geometry::Rect;

/// A run of recognized text and where it sits on the page (raster px).
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub bounds: Rect,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, bounds: Rect) -> Self {
        Self {
            text: text.into(),
            bounds,
        }
    }
}

/// Turns a page raster into text spans.
pub trait TextDetector: Send {
    fn detect(&mut self, page: &RgbaImage) -> Result<Vec<TextSpan>>;
}

static EMAIL_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}").ok()
});

static PHONE_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    // International or local numbers with optional separators, plus 11-digit
    // mainland China mobiles.
    Regex::new(
        r"(?x)
        (?:\+\d{1,3}[\s.-]?)?
        (?:\(\d{2,4}\)[\s.-]?|\d{2,4}[\s.-])?
        \d{3,4}[\s.-]?\d{4}
        |
        \b1[3-9]\d{9}\b",
    )
    .ok()
});

fn matches(pattern: &Lazy<Option<Regex>>, text: &str) -> bool {
    pattern.iter().any(|re| re.is_match(text))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensitive {
    Email,
    Phone,
}

/// Classify a span's text, `None` when it holds nothing worth hiding.
pub fn classify(text: &str) -> Option<Sensitive> {
    if matches(&EMAIL_PATTERN, text) {
        Some(Sensitive::Email)
    } else if matches(&PHONE_PATTERN, text) {
        Some(Sensitive::Phone)
    } else {
        None
    }
}

/// Blur actions covering every sensitive span, grown by `padding` px.
pub fn redactions(spans: &[TextSpan], padding: f32, blur_radius: f32) -> Vec<Action> {
    spans
        .iter()
        .filter(|span| classify(&span.text).is_some())
        .map(|span| Action::blur(span.bounds.expand(padding), blur_radius))
        .collect()
}

#[cfg(feature = "ocr")]
pub use engine::{default_model_dir, OcrsDetector};

#[cfg(feature = "ocr")]
mod engine {
    use std::path::{Path, PathBuf};

    use image::RgbaImage;
    use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
    use rten::Model;

    use super::{TextDetector, TextSpan};
    use crate::error::{RedactError, Result};
    use crate::geometry::Rect;

    const DETECTION_MODEL: &str = "text-detection.rten";
    const RECOGNITION_MODEL: &str = "text-recognition.rten";

    /// Directory `ocrs-cli` downloads its models into.
    pub fn default_model_dir() -> PathBuf {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            PathBuf::from(xdg).join("ocrs")
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".cache").join("ocrs")
        } else {
            PathBuf::from("ocrs-models")
        }
    }

    /// Word-level OCR with the `ocrs` engine.
    pub struct OcrsDetector {
        engine: OcrEngine,
    }

    fn load_model(path: &Path) -> Result<Model> {
        Model::load_file(path)
            .map_err(|e| RedactError::Ocr(format!("loading {}: {e}", path.display())))
    }

    impl OcrsDetector {
        pub fn from_model_dir(dir: impl AsRef<Path>) -> Result<Self> {
            let dir = dir.as_ref();
            let engine = OcrEngine::new(OcrEngineParams {
                detection_model: Some(load_model(&dir.join(DETECTION_MODEL))?),
                recognition_model: Some(load_model(&dir.join(RECOGNITION_MODEL))?),
                ..Default::default()
            })
            .map_err(|e| RedactError::Ocr(e.to_string()))?;
            log::info!("OCR models loaded from {}", dir.display());
            Ok(Self { engine })
        }

        pub fn with_defaults() -> Result<Self> {
            Self::from_model_dir(default_model_dir())
        }
    }

    impl TextDetector for OcrsDetector {
        fn detect(&mut self, page: &RgbaImage) -> Result<Vec<TextSpan>> {
            let rgb = image::DynamicImage::ImageRgba8(page.clone()).to_rgb8();
            let source = ImageSource::from_bytes(rgb.as_raw(), rgb.dimensions())
                .map_err(|e| RedactError::Ocr(e.to_string()))?;
            let input = self
                .engine
                .prepare_input(source)
                .map_err(|e| RedactError::Ocr(e.to_string()))?;
            let words = self
                .engine
                .detect_words(&input)
                .map_err(|e| RedactError::Ocr(e.to_string()))?;
            let lines = self.engine.find_text_lines(&input, &words);
            let recognized = self
                .engine
                .recognize_text(&input, &lines)
                .map_err(|e| RedactError::Ocr(e.to_string()))?;

            let mut spans = Vec::new();
            for line in recognized.iter().flatten() {
                for word in line.words() {
                    let b = word.rotated_rect().bounding_rect();
                    spans.push(TextSpan::new(
                        word.to_string(),
                        Rect::new(b.left(), b.top(), b.width(), b.height()),
                    ));
                }
            }
            log::debug!("OCR found {} word(s)", spans.len());
            Ok(spans)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_emails_and_phones() {
        assert_eq!(classify("mail jane.doe@example.co.uk now"), Some(Sensitive::Email));
        assert_eq!(classify("+1 (555) 123-4567"), Some(Sensitive::Phone));
        assert_eq!(classify("555-1234"), Some(Sensitive::Phone));
        assert_eq!(classify("13812345678"), Some(Sensitive::Phone));
        assert_eq!(classify("Invoice total"), None);
        assert_eq!(classify("2024"), None);
    }

    #[test]
    fn only_sensitive_spans_become_blurs() {
        let spans = vec![
            TextSpan::new("Name:", Rect::new(0.0, 0.0, 40.0, 12.0)),
            TextSpan::new("bob@site.org", Rect::new(50.0, 0.0, 80.0, 12.0)),
        ];
        let actions = redactions(&spans, 2.0, 12.0);
        assert_eq!(actions, vec![Action::blur(Rect::new(48.0, -2.0, 84.0, 16.0), 12.0)]);
    }
}
