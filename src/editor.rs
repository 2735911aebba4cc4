//! The interaction controller: turns canvas input into store commands and
//! keeps the transient state (tool, selection, viewport, text entry, scan)
//! that lives between those commands.

use std::sync::Arc;

use egui::{Color32, Pos2};
use image::RgbaImage;

use crate::action::{hit_test, Action};
use crate::command::Command;
use crate::compositor::Compositor;
use crate::config::EditorConfig;
use crate::document::Document;
use crate::error::Result;
use crate::geometry::Rect;
use crate::input::{EditorKey, InputEvent, PinchTracker, PointerId};
use crate::jobs::{IngestTicket, ScanTicket};
use crate::ocr::{self, TextSpan};
use crate::sampling::{sample_colors, ColorPair};
use crate::tools::{Tool, ToolContext, ToolKind, ToolResponse, ToolSettings, ToolType};
use crate::viewport::Viewport;

/// Where a confirmed text entry goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    /// Append a new text action
    New,
    /// Replace the text action at this index
    Existing(usize),
}

/// An open text-entry dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub page: usize,
    pub rect: Rect,
    pub background: Color32,
    pub text: String,
    pub font_size: f32,
    pub target: TextTarget,
}

impl TextRequest {
    /// Text color that will be used, derived from the background.
    pub fn text_color(&self) -> Color32 {
        ColorPair::for_background(self.background).text
    }

    fn to_action(&self) -> Action {
        Action::text(
            self.rect,
            self.text.clone(),
            self.background,
            self.text_color(),
            self.font_size,
        )
    }
}

pub struct Editor {
    document: Document,
    config: EditorConfig,
    settings: ToolSettings,
    tool: ToolType,
    selection: Option<usize>,
    viewport: Viewport,
    pinch: PinchTracker,
    primary: Option<PointerId>,
    text_request: Option<TextRequest>,
    active_scan: Option<ScanTicket>,
    ingest_generation: u64,
    compositor: Compositor,
    revision: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let compositor = Compositor::with_font(config.font_path.as_deref());
        Self::with_compositor(config, compositor)
    }

    pub fn with_compositor(config: EditorConfig, compositor: Compositor) -> Self {
        Self {
            document: Document::default(),
            settings: ToolSettings::from_config(&config),
            viewport: Viewport::new(&config),
            config,
            tool: ToolType::for_kind(ToolKind::Select),
            selection: None,
            pinch: PinchTracker::new(),
            primary: None,
            text_request: None,
            active_scan: None,
            ingest_generation: 0,
            compositor,
            revision: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Bumped on every change that alters the rendered frame.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn current_page(&self) -> usize {
        self.document.current_index()
    }

    pub fn actions(&self) -> &[Action] {
        self.document.actions(self.current_page())
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.tool.kind()
    }

    /// Switch tools. Any interaction in progress is dropped, and the
    /// selection only survives in select mode.
    pub fn set_tool(&mut self, kind: ToolKind) {
        if kind == self.tool.kind() {
            return;
        }
        self.tool = ToolType::for_kind(kind);
        self.primary = None;
        if kind != ToolKind::Select {
            self.selection = None;
        }
        log::debug!("Tool: {}", self.tool.name());
        self.touch();
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected_action(&self) -> Option<&Action> {
        self.selection.and_then(|i| self.actions().get(i))
    }

    fn set_selection(&mut self, selection: Option<usize>) {
        let valid = selection.filter(|&i| i < self.actions().len());
        if valid != self.selection {
            self.selection = valid;
            self.touch();
        }
    }

    /// Colors for a rect on the current page, sampled from its pristine base.
    pub fn sample_colors(&self, rect: &Rect) -> ColorPair {
        match self.document.current_page() {
            Some(page) => sample_colors(page.base(), rect, self.config.sampling),
            None => ColorPair::FALLBACK,
        }
    }

    // Store mutations

    /// Run a command against the document.
    ///
    /// Structural edits clear the selection and close an entry that edits an
    /// existing text action, since its index may now name another action. A
    /// page switch also drops any interaction in progress and every entry.
    pub fn execute(&mut self, command: Command) -> bool {
        if !command.execute(&mut self.document) {
            return false;
        }
        if command.is_structural() {
            self.selection = None;
            if let Command::SetCurrentPage { .. } = command {
                self.tool.cancel();
                self.primary = None;
                self.text_request = None;
            } else {
                if self.tool.as_selection_tool().is_some() {
                    self.tool.cancel();
                }
                if self
                    .text_request
                    .as_ref()
                    .is_some_and(|request| matches!(request.target, TextTarget::Existing(_)))
                {
                    log::debug!("Closing text edit after a structural change");
                    self.text_request = None;
                }
            }
        }
        self.touch();
        true
    }

    /// Append to the current page.
    pub fn add_action(&mut self, action: Action) -> bool {
        if action.rect().is_degenerate(self.config.min_commit_size) {
            log::debug!("Ignoring degenerate {}", action.kind().name());
            return false;
        }
        let page = self.current_page();
        self.execute(Command::AddAction { page, action })
    }

    pub fn undo(&mut self) -> bool {
        let page = self.current_page();
        let changed = self.execute(Command::Undo { page });
        // Undo always drops the selection, even with nothing to undo.
        self.set_selection(None);
        changed
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(index) = self.selection else {
            return false;
        };
        let page = self.current_page();
        self.execute(Command::DeleteAt { page, index })
    }

    pub fn clear_page(&mut self) -> bool {
        let page = self.current_page();
        let changed = self.execute(Command::ClearAll { page });
        self.set_selection(None);
        changed
    }

    pub fn set_current_page(&mut self, index: usize) -> bool {
        self.execute(Command::SetCurrentPage { index })
    }

    // Loading

    /// Replace the document with `pages`. Empty input leaves everything as is.
    pub fn load_pages(&mut self, pages: Vec<RgbaImage>) -> bool {
        if pages.is_empty() {
            log::warn!("Ignoring load with no pages");
            return false;
        }
        self.document = Document::new(pages);
        self.selection = None;
        self.tool.cancel();
        self.primary = None;
        self.pinch.reset();
        self.text_request = None;
        self.active_scan = None;
        self.viewport.reset();
        self.touch();
        true
    }

    /// Reserve a slot for a background load. Later requests supersede earlier ones.
    pub fn begin_ingest(&mut self) -> IngestTicket {
        self.ingest_generation += 1;
        IngestTicket {
            generation: self.ingest_generation,
        }
    }

    /// Merge a background load. Failures and superseded loads change nothing.
    pub fn finish_ingest(&mut self, ticket: IngestTicket, result: Result<Vec<RgbaImage>>) -> bool {
        if ticket.generation != self.ingest_generation {
            log::warn!("Discarding superseded load #{}", ticket.generation);
            return false;
        }
        match result {
            Ok(pages) => self.load_pages(pages),
            Err(err) => {
                log::warn!("Load failed: {err}");
                false
            }
        }
    }

    // Auto-redaction

    pub fn is_scanning(&self) -> bool {
        self.active_scan.is_some()
    }

    /// Start an OCR pass over the current page.
    ///
    /// Returns the ticket and the raster to scan, or `None` when a scan is
    /// already running or there is no page.
    pub fn begin_scan(&mut self) -> Option<(ScanTicket, Arc<RgbaImage>)> {
        if self.active_scan.is_some() {
            return None;
        }
        let page = self.document.current_page()?;
        let ticket = ScanTicket {
            document: self.document.id(),
            page: page.id(),
            page_index: self.document.current_index(),
        };
        let base = Arc::clone(page.base());
        self.active_scan = Some(ticket);
        log::info!("Scanning page {}", ticket.page_index + 1);
        Some((ticket, base))
    }

    fn ticket_is_current(&self, ticket: &ScanTicket) -> bool {
        self.document.id() == ticket.document
            && self.document.current_page().is_some_and(|p| p.id() == ticket.page)
    }

    /// Merge OCR results as blur actions. Returns how many were added.
    ///
    /// Only the result of the running scan ends it; results of earlier scans
    /// are dropped without touching the running one.
    pub fn finish_scan(&mut self, ticket: ScanTicket, result: Result<Vec<TextSpan>>) -> usize {
        if self.active_scan != Some(ticket) {
            log::warn!("Discarding result of a superseded scan");
            return 0;
        }
        self.active_scan = None;
        if !self.ticket_is_current(&ticket) {
            log::warn!("Discarding scan result for a page that is no longer shown");
            return 0;
        }
        let spans = match result {
            Ok(spans) => spans,
            Err(err) => {
                log::warn!("Scan failed: {err}");
                return 0;
            }
        };
        let actions = ocr::redactions(
            &spans,
            self.config.auto_redact_padding,
            self.settings.blur_radius,
        );
        let added = actions
            .into_iter()
            .filter(|action| self.add_action(action.clone()))
            .count();
        log::info!("Auto-redacted {added} region(s)");
        added
    }

    /// Give up on a running scan, e.g. when its worker vanished.
    pub fn abort_scan(&mut self) {
        self.active_scan = None;
    }

    // Text entry

    pub fn text_request(&self) -> Option<&TextRequest> {
        self.text_request.as_ref()
    }

    pub fn text_request_mut(&mut self) -> Option<&mut TextRequest> {
        self.text_request.as_mut()
    }

    fn request_new_text(&mut self, rect: Rect) {
        let colors = self.sample_colors(&rect);
        self.text_request = Some(TextRequest {
            page: self.current_page(),
            rect,
            background: colors.background,
            text: String::new(),
            font_size: self.settings.font_size,
            target: TextTarget::New,
        });
        self.touch();
    }

    /// Open the edit dialog for the text action at `index`.
    pub fn edit_text(&mut self, index: usize) -> bool {
        let Some(overlay) = self.actions().get(index).and_then(Action::as_text) else {
            return false;
        };
        self.text_request = Some(TextRequest {
            page: self.current_page(),
            rect: overlay.rect,
            background: overlay.fill,
            text: overlay.text.clone(),
            font_size: overlay.font_size,
            target: TextTarget::Existing(index),
        });
        true
    }

    pub fn edit_selected_text(&mut self) -> bool {
        self.selection.is_some_and(|index| self.edit_text(index))
    }

    /// Commit the open text entry. Empty text commits nothing.
    pub fn confirm_text(&mut self) -> bool {
        let Some(request) = self.text_request.take() else {
            return false;
        };
        self.touch();
        if request.text.trim().is_empty() {
            log::debug!("Empty text entry, nothing committed");
            return false;
        }
        if let TextTarget::Existing(index) = request.target {
            let unchanged = request.page == self.current_page()
                && self
                    .actions()
                    .get(index)
                    .and_then(Action::as_text)
                    .is_some_and(|overlay| overlay.rect == request.rect);
            if !unchanged {
                log::warn!("Text action #{index} changed while it was being edited");
                return false;
            }
        }
        let action = request.to_action();
        let committed = match request.target {
            TextTarget::New => self.execute(Command::AddAction {
                page: request.page,
                action,
            }),
            TextTarget::Existing(index) => self.execute(Command::ReplaceAt {
                page: request.page,
                index,
                action,
            }),
        };
        self.set_selection(None);
        committed
    }

    pub fn cancel_text(&mut self) {
        if self.text_request.take().is_some() {
            self.touch();
        }
    }

    fn update_selected_text(&mut self, edit: impl FnOnce(&mut crate::action::TextOverlay)) -> bool {
        let Some(index) = self.selection else {
            return false;
        };
        let Some(mut overlay) = self.actions().get(index).and_then(Action::as_text).cloned() else {
            return false;
        };
        edit(&mut overlay);
        let page = self.current_page();
        self.execute(Command::ReplaceAt {
            page,
            index,
            action: Action::Text(overlay),
        })
    }

    pub fn set_text_font_size(&mut self, font_size: f32) -> bool {
        self.update_selected_text(|overlay| overlay.font_size = font_size)
    }

    /// Manual background override; the text color follows the chosen color.
    pub fn set_text_background(&mut self, background: Color32) -> bool {
        self.update_selected_text(|overlay| {
            let colors = ColorPair::for_background(background);
            overlay.fill = colors.background;
            overlay.text_color = colors.text;
        })
    }

    // Input

    /// Dispatch one canvas event. Returns whether anything visible changed.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        let before = self.revision;
        match event {
            InputEvent::PointerDown { id, pos } => self.pointer_down(id, pos),
            InputEvent::PointerMove { id, pos } => self.pointer_move(id, pos),
            InputEvent::PointerUp { id, pos } => self.pointer_up(id, pos),
            InputEvent::DoubleClick { pos } => {
                self.double_click(pos);
            }
            InputEvent::Wheel { delta_y } => {
                self.viewport.wheel(delta_y);
                self.touch();
            }
            InputEvent::Key(key) => self.key(key),
        }
        self.revision != before
    }

    fn tool_response(&mut self, raster: Pos2, phase: Phase) -> ToolResponse {
        let ctx = ToolContext {
            document: &self.document,
            page: self.document.current_index(),
            config: &self.config,
            settings: &self.settings,
        };
        match phase {
            Phase::Down => self.tool.on_pointer_down(raster, &ctx),
            Phase::Move => self.tool.on_pointer_move(raster, &ctx),
            Phase::Up => self.tool.on_pointer_up(raster, &ctx),
        }
    }

    fn pointer_down(&mut self, id: PointerId, pos: Pos2) {
        if self.document.is_empty() {
            return;
        }
        if self.pinch.pointer_down(id, pos, &self.viewport) {
            // A second finger turns the gesture into pinch-zoom.
            self.tool.cancel();
            self.primary = None;
            self.touch();
            return;
        }
        if self.pinch.is_pinching() || self.primary.is_some() || self.text_request.is_some() {
            return;
        }
        self.primary = Some(id);
        let raster = self.viewport.to_raster(pos);
        let response = self.tool_response(raster, Phase::Down);
        self.apply_response(response);
        self.touch();
    }

    fn pointer_move(&mut self, id: PointerId, pos: Pos2) {
        if self.pinch.pointer_move(id, pos, &mut self.viewport) {
            self.touch();
            return;
        }
        if self.primary != Some(id) {
            return;
        }
        let raster = self.viewport.to_raster(pos);
        let response = self.tool_response(raster, Phase::Move);
        self.apply_response(response);
        if self.tool.is_active() {
            self.touch();
        }
    }

    fn pointer_up(&mut self, id: PointerId, pos: Pos2) {
        self.pinch.pointer_up(id);
        if self.primary != Some(id) {
            return;
        }
        self.primary = None;
        let raster = self.viewport.to_raster(pos);
        let response = self.tool_response(raster, Phase::Up);
        self.apply_response(response);
        self.touch();
    }

    fn double_click(&mut self, pos: Pos2) {
        if self.tool.kind().is_draw() || self.text_request.is_some() {
            return;
        }
        let raster = self.viewport.to_raster(pos);
        if let Some(index) = hit_test(self.actions(), raster) {
            if self.edit_text(index) {
                self.touch();
            }
        }
    }

    fn key(&mut self, key: EditorKey) {
        match key {
            EditorKey::Undo => {
                self.undo();
            }
            EditorKey::Delete if self.text_request.is_none() => {
                self.delete_selected();
            }
            EditorKey::Delete => {}
            EditorKey::Escape => {
                if self.text_request.is_some() {
                    self.cancel_text();
                } else {
                    self.tool.cancel();
                    self.primary = None;
                    self.set_selection(None);
                    self.touch();
                }
            }
        }
    }

    fn apply_response(&mut self, response: ToolResponse) {
        match response {
            ToolResponse::None => {}
            ToolResponse::Command(command) => {
                self.execute(command);
            }
            ToolResponse::Select(selection) => self.set_selection(selection),
            ToolResponse::RequestText(rect) => self.request_new_text(rect),
            ToolResponse::MoveFinished {
                index,
                origin,
                distance,
            } => {
                let page = self.current_page();
                self.execute(Command::MoveTo { page, index, origin });
                self.set_selection(Some(index));
                if distance >= self.config.drag_threshold {
                    self.resample_text(index);
                }
            }
        }
    }

    /// Re-pick a moved text action's colors from the base around its new rect.
    fn resample_text(&mut self, index: usize) {
        let Some(mut overlay) = self.actions().get(index).and_then(Action::as_text).cloned() else {
            return;
        };
        let colors = self.sample_colors(&overlay.rect);
        overlay.fill = colors.background;
        overlay.text_color = colors.text;
        let page = self.current_page();
        self.execute(Command::ReplaceAt {
            page,
            index,
            action: Action::Text(overlay),
        });
    }

    // Rendering

    /// The uncommitted action being drawn, if any.
    pub fn preview(&self) -> Option<Action> {
        self.tool.preview(&self.settings)
    }

    /// The current page as shown on screen: actions, preview and highlight.
    pub fn render(&self) -> Option<RgbaImage> {
        let page = self.document.current_page()?;
        let preview = self.preview();
        let highlight = match self.tool.kind() {
            ToolKind::Select => self.selected_action().map(Action::rect),
            _ => None,
        };
        Some(
            self.compositor
                .render(page.base(), page.actions(), preview.as_ref(), highlight.as_ref()),
        )
    }

    /// A page as exported: committed actions only.
    pub fn render_export(&self, page: usize) -> Option<RgbaImage> {
        let page = self.document.page(page)?;
        Some(self.compositor.render_export(page.base(), page.actions()))
    }

    pub fn render_current_export(&self) -> Option<RgbaImage> {
        self.render_export(self.current_page())
    }

    pub fn render_all_export(&self) -> Vec<RgbaImage> {
        self.document
            .pages()
            .iter()
            .map(|page| self.compositor.render_export(page.base(), page.actions()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Down,
    Move,
    Up,
}
