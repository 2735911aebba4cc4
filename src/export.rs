//! Encoding composited pages for download and the system clipboard.

use std::borrow::Cow;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use serde::{Deserialize, Serialize};

use crate::error::{RedactError, Result};

/// File stem used for every download.
pub const EXPORT_STEM: &str = "privacyblur";

/// Pages are placed at this density, so one raster pixel spans 4/3 pt.
const PDF_DPI: f32 = 54.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::Pdf];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{EXPORT_STEM}.{}", self.extension())
    }

    /// PDFs carry every page; the raster formats only the current one.
    pub fn is_multi_page(&self) -> bool {
        matches!(self, ExportFormat::Pdf)
    }
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// JPEG has no alpha, so the image is flattened to RGB first.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100)).encode_image(&rgb)?;
    Ok(out)
}

fn px_to_mm(px: u32) -> Mm {
    Mm(px as f32 * 25.4 / PDF_DPI)
}

/// One PDF page per raster, each page sized to its raster.
pub fn encode_pdf(pages: &[RgbaImage]) -> Result<Vec<u8>> {
    if pages.is_empty() {
        return Err(RedactError::Export("no pages to export".to_owned()));
    }
    let mut doc = PdfDocument::new(EXPORT_STEM);
    let mut pdf_pages = Vec::with_capacity(pages.len());
    for page in pages {
        let (width, height) = page.dimensions();
        let rgb = DynamicImage::ImageRgba8(page.clone()).to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: width as usize,
            height: height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject = doc.add_image(&raw);
        let ops = vec![Op::UseXobject {
            id: xobject,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(1.0),
                scale_y: Some(1.0),
                dpi: Some(PDF_DPI),
                rotate: None,
            },
        }];
        pdf_pages.push(PdfPage::new(px_to_mm(width), px_to_mm(height), ops));
    }
    doc.with_pages(pdf_pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        log::debug!("PDF writer reported {} warning(s)", warnings.len());
    }
    Ok(bytes)
}

/// Encode `pages` as `format`. Raster formats take the first page only.
pub fn encode(format: ExportFormat, pages: &[RgbaImage], jpeg_quality: u8) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Pdf => encode_pdf(pages),
        ExportFormat::Png | ExportFormat::Jpeg => {
            let Some(first) = pages.first() else {
                return Err(RedactError::Export("no page to export".to_owned()));
            };
            if format == ExportFormat::Png {
                encode_png(first)
            } else {
                encode_jpeg(first, jpeg_quality)
            }
        }
    }
}

/// Write an export into `dir` under its fixed name and return the path.
pub fn write_export(
    dir: &Path,
    format: ExportFormat,
    pages: &[RgbaImage],
    jpeg_quality: u8,
) -> Result<PathBuf> {
    let bytes = encode(format, pages, jpeg_quality)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format.file_name());
    std::fs::write(&path, bytes)?;
    log::info!("Exported {} page(s) to {}", pages.len(), path.display());
    Ok(path)
}

/// Put the image on the system clipboard.
pub fn copy_to_clipboard(image: &RgbaImage) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| RedactError::Clipboard(e.to_string()))?;
    let data = arboard::ImageData {
        width: image.width() as usize,
        height: image.height() as usize,
        bytes: Cow::Borrowed(image.as_raw()),
    };
    clipboard
        .set_image(data)
        .map_err(|e| RedactError::Clipboard(e.to_string()))?;
    log::info!("Copied {}x{} image to clipboard", image.width(), image.height());
    Ok(())
}

/// Read an image from the system clipboard, `None` if it holds no image.
pub fn paste_from_clipboard() -> Result<Option<RgbaImage>> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| RedactError::Clipboard(e.to_string()))?;
    match clipboard.get_image() {
        Ok(data) => {
            let image = crate::ingest::from_rgba(data.width, data.height, data.bytes.into_owned())?;
            Ok(Some(image))
        }
        Err(arboard::Error::ContentNotAvailable) => Ok(None),
        Err(e) => Err(RedactError::Clipboard(e.to_string())),
    }
}
