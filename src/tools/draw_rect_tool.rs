use egui::Pos2;

use super::{Tool, ToolContext, ToolResponse, ToolSettings};
use crate::action::{Action, ActionKind};
use crate::command::Command;
use crate::geometry::Rect;

/// Draws a new rect from an anchor to the pointer and commits it as `kind`.
#[derive(Debug, Clone)]
pub struct DrawRectTool {
    kind: ActionKind,
    anchor: Option<Pos2>,
    current: Option<Rect>,
}

impl DrawRectTool {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            anchor: None,
            current: None,
        }
    }

    pub fn action_kind(&self) -> ActionKind {
        self.kind
    }
}

impl Tool for DrawRectTool {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn on_pointer_down(&mut self, pos: Pos2, _ctx: &ToolContext<'_>) -> ToolResponse {
        self.anchor = Some(pos);
        self.current = Some(Rect::from_corners(pos, pos));
        // Drawing never keeps a previous selection around.
        ToolResponse::Select(None)
    }

    fn on_pointer_move(&mut self, pos: Pos2, _ctx: &ToolContext<'_>) -> ToolResponse {
        if let Some(anchor) = self.anchor {
            self.current = Some(Rect::from_corners(anchor, pos));
        }
        ToolResponse::None
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolResponse {
        let Some(anchor) = self.anchor.take() else {
            return ToolResponse::None;
        };
        self.current = None;

        let rect = Rect::from_corners(anchor, pos);
        if rect.is_degenerate(ctx.config.min_commit_size) {
            log::debug!("Discarding {}x{} {} rect", rect.w, rect.h, self.kind.name());
            return ToolResponse::None;
        }
        match self.kind {
            ActionKind::Text => ToolResponse::RequestText(rect),
            kind => ToolResponse::Command(Command::AddAction {
                page: ctx.page,
                action: ctx.settings.build(kind, rect),
            }),
        }
    }

    fn cancel(&mut self) {
        self.anchor = None;
        self.current = None;
    }

    fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    fn preview(&self, settings: &ToolSettings) -> Option<Action> {
        self.current.map(|rect| settings.build(self.kind, rect))
    }
}
