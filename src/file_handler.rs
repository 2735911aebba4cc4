use std::sync::Arc;

use eframe::egui;

/// Bytes of a file the user dropped on the window, ready for ingestion.
#[derive(Debug, Clone)]
pub struct DroppedInput {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up files dropped this frame.
    /// Returns true if any new files arrived
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let mut new_dropped_files = false;
        ctx.input(|i| {
            if !i.raw.dropped_files.is_empty() {
                self.dropped_files = i.raw.dropped_files.clone();
                new_dropped_files = true;
            }
        });
        new_dropped_files
    }

    /// Take the first supported file out of the queue.
    ///
    /// Only one document is open at a time, so later files in the same drop
    /// are ignored.
    pub fn take_input(&mut self) -> Option<DroppedInput> {
        let files = std::mem::take(&mut self.dropped_files);
        for file in &files {
            let name = display_name(file);
            if !is_supported(file) {
                log::warn!("Dropped file is not a supported type: {name}");
                continue;
            }
            if let Some(bytes) = read_bytes(file, &name) {
                log::info!("Dropped {name} ({} bytes)", bytes.len());
                return Some(DroppedInput { name, bytes });
            }
        }
        None
    }

    /// Darken the window and list the files while they hover over it.
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context, hint: &str) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }
        let text = ctx.input(|i| {
            let mut text = hint.to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(22.0),
            Color32::WHITE,
        );
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Images and PDFs, by MIME type or extension. Content is sniffed again on load.
fn is_supported(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/") || file.mime == "application/pdf";
    }
    let name = file
        .path
        .as_ref()
        .and_then(|p| p.extension())
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .or_else(|| {
            std::path::Path::new(&file.name)
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
        });
    matches!(
        name.as_deref(),
        Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "tif" | "tiff" | "pdf")
    )
}

fn read_bytes(file: &egui::DroppedFile, name: &str) -> Option<Arc<[u8]>> {
    if let Some(bytes) = &file.bytes {
        return Some(Arc::clone(bytes));
    }
    let Some(path) = &file.path else {
        log::warn!("Dropped file has no accessible data: {name}");
        return None;
    };
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes.into()),
        Err(err) => {
            log::error!("Failed to read dropped file {}: {err}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn dropped(name: &str, mime: &str) -> egui::DroppedFile {
        egui::DroppedFile {
            path: Some(PathBuf::from(name)),
            name: name.to_owned(),
            mime: mime.to_owned(),
            bytes: Some(Arc::from(&b"%PDF-1.4"[..])),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_images_and_pdfs() {
        assert!(is_supported(&dropped("a.PNG", "")));
        assert!(is_supported(&dropped("scan.pdf", "")));
        assert!(is_supported(&dropped("x", "image/webp")));
        assert!(!is_supported(&dropped("notes.txt", "")));
        assert!(!is_supported(&dropped("notes", "text/plain")));
    }

    #[test]
    fn takes_first_supported_file_once() {
        let mut handler = FileHandler {
            dropped_files: vec![dropped("notes.txt", ""), dropped("scan.pdf", "")],
        };
        let input = handler.take_input().unwrap();
        assert_eq!(input.name, "scan.pdf");
        assert_eq!(&input.bytes[..], b"%PDF-1.4");
        assert!(handler.take_input().is_none());
    }
}
