//! Turning dropped, pasted or opened bytes into page rasters.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use image::RgbaImage;
use uuid::Uuid;

use crate::error::{RedactError, Result};

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Image,
    Pdf,
}

/// Decide by content, not by file name.
pub fn sniff(bytes: &[u8]) -> InputKind {
    if bytes.starts_with(PDF_MAGIC) {
        InputKind::Pdf
    } else {
        InputKind::Image
    }
}

/// Renders PDF pages to rasters. `scale` is relative to 72 dpi.
pub trait PageRasterizer: Send {
    fn rasterize(&mut self, pdf: &[u8], scale: f32) -> Result<Vec<RgbaImage>>;
}

pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes)?;
    Ok(image.to_rgba8())
}

/// Decode `bytes` into an ordered list of page rasters.
///
/// Images give one page. PDFs go through `rasterizer` at `pdf_scale`; without
/// one they are rejected. An empty page list is an error too, so callers
/// never replace a document with nothing.
pub fn load_pages(
    bytes: &[u8],
    rasterizer: Option<&mut dyn PageRasterizer>,
    pdf_scale: f32,
) -> Result<Vec<RgbaImage>> {
    let pages = match sniff(bytes) {
        InputKind::Image => vec![decode_image(bytes)?],
        InputKind::Pdf => {
            let Some(rasterizer) = rasterizer else {
                return Err(RedactError::UnsupportedInput(
                    "PDF input needs a page rasterizer".to_owned(),
                ));
            };
            rasterizer.rasterize(bytes, pdf_scale)?
        }
    };
    if pages.is_empty() {
        return Err(RedactError::UnsupportedInput("document has no pages".to_owned()));
    }
    log::info!(
        "Loaded {} page(s), first {}x{}",
        pages.len(),
        pages[0].width(),
        pages[0].height()
    );
    Ok(pages)
}

/// Build a raster from the clipboard's RGBA pixels.
pub fn from_rgba(width: usize, height: usize, bytes: Vec<u8>) -> Result<RgbaImage> {
    RgbaImage::from_raw(width as u32, height as u32, bytes).ok_or_else(|| {
        RedactError::UnsupportedInput(format!("clipboard image {width}x{height} has a bad buffer"))
    })
}

/// Rasterizes through poppler's `pdftoppm` command.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    binary: PathBuf,
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("pdftoppm"),
        }
    }
}

impl PdftoppmRasterizer {
    /// Whether the binary can be started at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    fn run(&self, dir: &Path, pdf: &[u8], scale: f32) -> Result<Vec<RgbaImage>> {
        let input = dir.join("input.pdf");
        fs::write(&input, pdf)?;
        let dpi = (72.0 * scale).round().max(1.0) as u32;

        let output = Command::new(&self.binary)
            .args(["-r", &dpi.to_string(), "-png"])
            .arg(&input)
            .arg(dir.join("page"))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| RedactError::Rasterize(format!("failed to start pdftoppm: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RedactError::Rasterize(format!(
                "pdftoppm exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        // pdftoppm names pages page-1.png, page-01.png ... zero-padded to a
        // common width, so a plain sort keeps page order.
        let mut pages: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .collect();
        pages.sort();
        pages
            .iter()
            .map(|path| Ok(image::open(path)?.to_rgba8()))
            .collect()
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(&mut self, pdf: &[u8], scale: f32) -> Result<Vec<RgbaImage>> {
        let dir = std::env::temp_dir().join(format!("privacyblur-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir)?;
        let result = self.run(&dir, pdf, scale);
        if let Err(err) = fs::remove_dir_all(&dir) {
            log::warn!("Could not clean up {}: {err}", dir.display());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    struct FixedPages(usize);

    impl PageRasterizer for FixedPages {
        fn rasterize(&mut self, _pdf: &[u8], scale: f32) -> Result<Vec<RgbaImage>> {
            let side = (10.0 * scale) as u32;
            Ok((0..self.0).map(|_| RgbaImage::new(side, side)).collect())
        }
    }

    fn png_bytes() -> Vec<u8> {
        let image = RgbaImage::from_pixel(4, 3, Rgba([1, 2, 3, 255]));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn sniffs_pdf_magic() {
        assert_eq!(sniff(b"%PDF-1.7\n..."), InputKind::Pdf);
        assert_eq!(sniff(&png_bytes()), InputKind::Image);
    }

    #[test]
    fn image_is_one_page() {
        let pages = load_pages(&png_bytes(), None, 2.0).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].dimensions(), (4, 3));
    }

    #[test]
    fn pdf_goes_through_rasterizer() {
        let mut rasterizer = FixedPages(3);
        let pages = load_pages(b"%PDF-1.4", Some(&mut rasterizer), 2.0).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].dimensions(), (20, 20));
    }

    #[test]
    fn bad_input_is_an_error() {
        assert!(matches!(load_pages(b"not an image", None, 2.0), Err(RedactError::Decode(_))));
        assert!(matches!(
            load_pages(b"%PDF-1.4", None, 2.0),
            Err(RedactError::UnsupportedInput(_))
        ));
        let mut empty = FixedPages(0);
        assert!(load_pages(b"%PDF-1.4", Some(&mut empty), 2.0).is_err());
    }

    #[test]
    fn clipboard_buffer_must_match() {
        assert!(from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(from_rgba(2, 2, vec![0; 15]).is_err());
    }
}
