use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use parking_lot::Mutex;

use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::error::Result;
use crate::export::{self, ExportFormat};
use crate::file_handler::FileHandler;
use crate::i18n::{Language, Strings};
use crate::ingest::{self, PdftoppmRasterizer};
use crate::input::InputHandler;
use crate::jobs::{IngestTicket, Job, JobPoll, ScanTicket};
use crate::ocr::{TextDetector, TextSpan};
use crate::panels::{central_panel, text_dialog, tools_panel};
use crate::texture_manager::TextureManager;

/// Storage key for the UI language.
const LANGUAGE_KEY: &str = "language";

/// How long a status message stays up, in seconds.
const STATUS_SECONDS: f64 = 2.5;

/// A detector shared with the scan worker thread.
pub type SharedDetector = Arc<Mutex<Box<dyn TextDetector>>>;

#[derive(Debug, Clone)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
    until: f64,
}

pub struct PrivacyBlurApp {
    editor: Editor,
    language: Language,
    input: InputHandler,
    file_handler: FileHandler,
    textures: TextureManager,
    rasterizer: PdftoppmRasterizer,
    detector: Option<SharedDetector>,
    ingest_job: Option<(IngestTicket, Job<Result<Vec<RgbaImage>>>)>,
    scan_job: Option<(ScanTicket, Job<Result<Vec<TextSpan>>>)>,
    export_format: ExportFormat,
    status: Option<Status>,
    /// Fit the next frame's page into the canvas
    fit_pending: bool,
    pub path_input: String,
}

impl PrivacyBlurApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Self {
        let language = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, LANGUAGE_KEY))
            .unwrap_or_default();
        Self::with_editor(Editor::new(config), language)
    }

    pub fn with_editor(editor: Editor, language: Language) -> Self {
        Self {
            editor,
            language,
            input: InputHandler::new(),
            file_handler: FileHandler::new(),
            textures: TextureManager::default(),
            rasterizer: PdftoppmRasterizer::default(),
            detector: None,
            ingest_job: None,
            scan_job: None,
            export_format: ExportFormat::Png,
            status: None,
            fit_pending: false,
            path_input: String::new(),
        }
    }

    /// Enable auto-redaction with `detector`.
    pub fn with_detector(mut self, detector: Box<dyn TextDetector>) -> Self {
        self.detector = Some(Arc::new(Mutex::new(detector)));
        self
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn strings(&self) -> &'static Strings {
        self.language.strings()
    }

    pub fn export_format(&self) -> ExportFormat {
        self.export_format
    }

    pub fn set_export_format(&mut self, format: ExportFormat) {
        self.export_format = format;
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn has_detector(&self) -> bool {
        self.detector.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.ingest_job.is_some()
    }

    fn set_status(&mut self, ctx: &egui::Context, text: impl Into<String>, is_error: bool) {
        let until = ctx.input(|i| i.time) + STATUS_SECONDS;
        self.status = Some(Status {
            text: text.into(),
            is_error,
            until,
        });
    }

    fn report_error(&mut self, ctx: &egui::Context, err: impl std::fmt::Display) {
        log::error!("{err}");
        let text = format!("{}: {err}", self.strings().error);
        self.set_status(ctx, text, true);
    }

    // Loading

    /// Decode `bytes` off the UI thread. A newer load supersedes this one.
    pub fn start_ingest(&mut self, name: &str, bytes: Arc<[u8]>) {
        let ticket = self.editor.begin_ingest();
        let mut rasterizer = self.rasterizer.clone();
        let scale = self.editor.config().pdf_scale;
        let job = Job::spawn(format!("ingest {name}"), move || {
            ingest::load_pages(&bytes, Some(&mut rasterizer), scale)
        });
        self.ingest_job = Some((ticket, job));
    }

    pub fn open_path(&mut self, ctx: &egui::Context, path: &Path) {
        match std::fs::read(path) {
            Ok(bytes) => self.start_ingest(&path.display().to_string(), bytes.into()),
            Err(err) => self.report_error(ctx, format!("{}: {err}", path.display())),
        }
    }

    /// Load the clipboard image as a fresh single-page document.
    pub fn paste_from_clipboard(&mut self, ctx: &egui::Context) {
        match export::paste_from_clipboard() {
            Ok(Some(image)) => {
                let ticket = self.editor.begin_ingest();
                self.ingest_job = None;
                if self.editor.finish_ingest(ticket, Ok(vec![image])) {
                    self.loaded();
                }
            }
            Ok(None) => log::debug!("Clipboard holds no image"),
            Err(err) => self.report_error(ctx, err),
        }
    }

    fn loaded(&mut self) {
        self.textures.clear_cache();
        self.fit_pending = true;
    }

    // Auto-redaction

    /// OCR the current page in the background.
    pub fn start_scan(&mut self) {
        let Some(detector) = self.detector.clone() else {
            log::warn!("Auto-redaction requested without an OCR engine");
            return;
        };
        let Some((ticket, base)) = self.editor.begin_scan() else {
            return;
        };
        let job = Job::spawn("scan", move || detector.lock().detect(&base));
        self.scan_job = Some((ticket, job));
    }

    fn poll_jobs(&mut self, ctx: &egui::Context) {
        if let Some((ticket, mut job)) = self.ingest_job.take() {
            match job.poll() {
                JobPoll::Pending => self.ingest_job = Some((ticket, job)),
                JobPoll::Ready(Ok(pages)) => {
                    if self.editor.finish_ingest(ticket, Ok(pages)) {
                        self.loaded();
                    }
                }
                JobPoll::Ready(Err(err)) => {
                    let text = err.to_string();
                    self.editor.finish_ingest(ticket, Err(err));
                    self.report_error(ctx, text);
                }
                JobPoll::Lost => self.report_error(ctx, format!("{} stopped unexpectedly", job.name())),
            }
        }

        if let Some((ticket, mut job)) = self.scan_job.take() {
            match job.poll() {
                JobPoll::Pending => self.scan_job = Some((ticket, job)),
                JobPoll::Ready(Ok(spans)) => {
                    self.editor.finish_scan(ticket, Ok(spans));
                }
                JobPoll::Ready(Err(err)) => {
                    let text = err.to_string();
                    self.editor.finish_scan(ticket, Err(err));
                    self.report_error(ctx, text);
                }
                JobPoll::Lost => {
                    self.editor.abort_scan();
                    self.report_error(ctx, format!("{} stopped unexpectedly", job.name()));
                }
            }
        }

        if self.ingest_job.is_some() || self.scan_job.is_some() {
            ctx.request_repaint();
        }
    }

    // Export

    pub fn copy_to_clipboard(&mut self, ctx: &egui::Context) {
        let Some(image) = self.editor.render_current_export() else {
            return;
        };
        match export::copy_to_clipboard(&image) {
            Ok(()) => {
                let text = self.strings().copied;
                self.set_status(ctx, text, false);
            }
            Err(err) => self.report_error(ctx, err),
        }
    }

    /// Write the export to the configured output directory.
    pub fn download(&mut self, ctx: &egui::Context) {
        let format = self.export_format;
        let pages = if format.is_multi_page() {
            self.editor.render_all_export()
        } else {
            self.editor.render_current_export().into_iter().collect()
        };
        let config = self.editor.config();
        match export::write_export(&config.output_dir, format, &pages, config.jpeg_quality) {
            Ok(path) => {
                let text = format!("{} {}", self.strings().saved_to, path.display());
                self.set_status(ctx, text, false);
            }
            Err(err) => self.report_error(ctx, err),
        }
    }

    // Canvas

    /// Texture for the current page, re-uploaded when the editor changed.
    pub fn canvas_texture(&mut self, ctx: &egui::Context) -> Option<(egui::TextureId, (u32, u32))> {
        let page = self.editor.document().current_page()?;
        let (id, size) = (page.id(), page.size());
        let editor = &self.editor;
        let texture = self
            .textures
            .get_or_update(ctx, id, editor.revision(), || editor.render())?;
        Some((texture, size))
    }

    /// Scale the page down so it fits `canvas` after a load.
    pub fn fit_if_pending(&mut self, canvas: egui::Rect, pixels_per_point: f32) {
        if !self.fit_pending {
            return;
        }
        let Some((w, h)) = self.editor.document().current_page().map(|p| p.size()) else {
            return;
        };
        self.fit_pending = false;
        let fit_w = canvas.width() * pixels_per_point / w.max(1) as f32;
        let fit_h = canvas.height() * pixels_per_point / h.max(1) as f32;
        let viewport = self.editor.viewport_mut();
        viewport.reset();
        viewport.set_scale(fit_w.min(fit_h).min(1.0));
    }

    /// Feed this frame's canvas input to the editor.
    pub fn handle_canvas_input(&mut self, ctx: &egui::Context, canvas: egui::Rect) {
        let keyboard_free = !ctx.wants_keyboard_input();
        for event in self.input.process_input(ctx, canvas, keyboard_free) {
            self.editor.handle_event(event);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let paste = ctx.input(|i| {
            i.events.iter().any(|e| matches!(e, egui::Event::Paste(_)))
                || (i.modifiers.command && i.key_pressed(egui::Key::V))
        });
        if paste {
            self.paste_from_clipboard(ctx);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let hint = self.strings().drop_hint;
        self.file_handler.preview_files_being_dropped(ctx, hint);
        if self.file_handler.check_for_dropped_files(ctx) {
            if let Some(input) = self.file_handler.take_input() {
                self.start_ingest(&input.name, input.bytes);
            }
        }
    }

    fn show_status(&mut self, ctx: &egui::Context) {
        let Some(status) = &self.status else {
            return;
        };
        let now = ctx.input(|i| i.time);
        if now > status.until {
            self.status = None;
            return;
        }
        let color = if status.is_error {
            egui::Color32::from_rgb(220, 60, 60)
        } else {
            egui::Color32::from_rgb(34, 197, 94)
        };
        egui::Area::new(egui::Id::new("status_toast"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.colored_label(color, &status.text);
                });
            });
        ctx.request_repaint();
    }
}

impl eframe::App for PrivacyBlurApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, LANGUAGE_KEY, &self.language);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.textures.begin_frame();
        self.poll_jobs(ctx);
        self.handle_shortcuts(ctx);
        self.handle_dropped_files(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);
        text_dialog(self, ctx);
        self.show_status(ctx);
    }
}
