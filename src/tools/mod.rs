use egui::{Color32, Pos2};

use crate::action::{Action, ActionKind};
use crate::command::Command;
use crate::config::EditorConfig;
use crate::document::Document;
use crate::geometry::Rect;

mod draw_rect_tool;
pub use draw_rect_tool::DrawRectTool;

mod selection_tool;
pub use selection_tool::{SelectionState, SelectionTool};

/// Which tool the canvas is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// Select and move existing actions
    Select,
    DrawBlur,
    DrawPixelate,
    DrawBlock,
    DrawText,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Select,
        ToolKind::DrawBlur,
        ToolKind::DrawPixelate,
        ToolKind::DrawBlock,
        ToolKind::DrawText,
    ];

    /// The action a draw tool produces, `None` for select.
    pub fn action_kind(&self) -> Option<ActionKind> {
        match self {
            ToolKind::Select => None,
            ToolKind::DrawBlur => Some(ActionKind::Blur),
            ToolKind::DrawPixelate => Some(ActionKind::Pixelate),
            ToolKind::DrawBlock => Some(ActionKind::Block),
            ToolKind::DrawText => Some(ActionKind::Text),
        }
    }

    pub fn is_draw(&self) -> bool {
        self.action_kind().is_some()
    }
}

/// Parameters the draw tools stamp into new actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSettings {
    pub blur_radius: f32,
    pub pixel_size: u32,
    pub block_color: Color32,
    pub font_size: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl ToolSettings {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            blur_radius: config.blur_radius,
            pixel_size: config.pixel_size,
            block_color: config.block_color,
            font_size: config.font_size,
        }
    }

    /// Build a ready-to-commit action. Text needs its content first, so it
    /// only gets a placeholder box here.
    pub fn build(&self, kind: ActionKind, rect: Rect) -> Action {
        match kind {
            ActionKind::Blur => Action::blur(rect, self.blur_radius),
            ActionKind::Pixelate => Action::pixelate(rect, self.pixel_size),
            ActionKind::Block => Action::block(rect, self.block_color),
            ActionKind::Text => {
                Action::text(rect, "", Color32::BLACK, Color32::WHITE, self.font_size)
            }
        }
    }
}

/// What a tool hands back to the editor after a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResponse {
    None,
    /// Run this against the store
    Command(Command),
    /// Change (or clear) the selection
    Select(Option<usize>),
    /// A text rect was drawn; ask the user for its content
    RequestText(Rect),
    /// A drag of `index` ended with its origin at `origin`; `distance` is
    /// how far the origin moved over the whole drag
    MoveFinished {
        index: usize,
        origin: Pos2,
        distance: f32,
    },
}

/// What tools can see while handling an event.
pub struct ToolContext<'a> {
    pub document: &'a Document,
    pub page: usize,
    pub config: &'a EditorConfig,
    pub settings: &'a ToolSettings,
}

/// Tool trait defines the interface for canvas tools.
///
/// Positions are in base-raster pixels.
pub trait Tool {
    fn name(&self) -> &'static str;

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolResponse;

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolResponse;

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolResponse;

    /// Drop any in-progress interaction without committing it.
    fn cancel(&mut self);

    /// True while a pointer interaction is in progress.
    fn is_active(&self) -> bool;

    /// Uncommitted action to draw on top of the page, if any.
    fn preview(&self, _settings: &ToolSettings) -> Option<Action> {
        None
    }
}

/// Enum representing all available tools, dispatched without boxing
#[derive(Debug, Clone)]
pub enum ToolType {
    Selection(SelectionTool),
    DrawRect(DrawRectTool),
}

impl ToolType {
    pub fn for_kind(kind: ToolKind) -> Self {
        match kind.action_kind() {
            None => ToolType::Selection(SelectionTool::new()),
            Some(action) => ToolType::DrawRect(DrawRectTool::new(action)),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            ToolType::Selection(_) => ToolKind::Select,
            ToolType::DrawRect(tool) => match tool.action_kind() {
                ActionKind::Blur => ToolKind::DrawBlur,
                ActionKind::Pixelate => ToolKind::DrawPixelate,
                ActionKind::Block => ToolKind::DrawBlock,
                ActionKind::Text => ToolKind::DrawText,
            },
        }
    }

    pub fn as_selection_tool(&self) -> Option<&SelectionTool> {
        match self {
            ToolType::Selection(tool) => Some(tool),
            ToolType::DrawRect(_) => None,
        }
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::Selection(tool) => tool.name(),
            Self::DrawRect(tool) => tool.name(),
        }
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolResponse {
        match self {
            Self::Selection(tool) => tool.on_pointer_down(pos, ctx),
            Self::DrawRect(tool) => tool.on_pointer_down(pos, ctx),
        }
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolResponse {
        match self {
            Self::Selection(tool) => tool.on_pointer_move(pos, ctx),
            Self::DrawRect(tool) => tool.on_pointer_move(pos, ctx),
        }
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolResponse {
        match self {
            Self::Selection(tool) => tool.on_pointer_up(pos, ctx),
            Self::DrawRect(tool) => tool.on_pointer_up(pos, ctx),
        }
    }

    fn cancel(&mut self) {
        match self {
            Self::Selection(tool) => tool.cancel(),
            Self::DrawRect(tool) => tool.cancel(),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            Self::Selection(tool) => tool.is_active(),
            Self::DrawRect(tool) => tool.is_active(),
        }
    }

    fn preview(&self, settings: &ToolSettings) -> Option<Action> {
        match self {
            Self::Selection(tool) => tool.preview(settings),
            Self::DrawRect(tool) => tool.preview(settings),
        }
    }
}
