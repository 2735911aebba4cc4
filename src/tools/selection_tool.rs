use egui::{Pos2, Vec2};

use super::{Tool, ToolContext, ToolResponse};
use crate::action::hit_test;
use crate::command::Command;

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState {
    Idle,
    /// Moving the action at `index`; `offset` is pointer minus rect origin
    /// at grab time.
    Dragging {
        index: usize,
        offset: Vec2,
        start_origin: Pos2,
    },
}

/// Picks the topmost action under the pointer and drags it around.
#[derive(Debug, Clone)]
pub struct SelectionTool {
    state: SelectionState,
}

impl Default for SelectionTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionTool {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

}

impl Tool for SelectionTool {
    fn name(&self) -> &'static str {
        "select"
    }

    fn on_pointer_down(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolResponse {
        let actions = ctx.document.actions(ctx.page);
        match hit_test(actions, pos) {
            Some(index) => {
                let origin = actions[index].rect().origin();
                self.state = SelectionState::Dragging {
                    index,
                    offset: pos - origin,
                    start_origin: origin,
                };
                ToolResponse::Select(Some(index))
            }
            None => {
                self.state = SelectionState::Idle;
                ToolResponse::Select(None)
            }
        }
    }

    fn on_pointer_move(&mut self, pos: Pos2, ctx: &ToolContext<'_>) -> ToolResponse {
        match self.state {
            SelectionState::Dragging { index, offset, .. } => ToolResponse::Command(Command::MoveTo {
                page: ctx.page,
                index,
                origin: pos - offset,
            }),
            SelectionState::Idle => ToolResponse::None,
        }
    }

    fn on_pointer_up(&mut self, pos: Pos2, _ctx: &ToolContext<'_>) -> ToolResponse {
        let state = std::mem::replace(&mut self.state, SelectionState::Idle);
        match state {
            SelectionState::Dragging {
                index,
                offset,
                start_origin,
            } => {
                let origin = pos - offset;
                ToolResponse::MoveFinished {
                    index,
                    origin,
                    distance: origin.distance(start_origin),
                }
            }
            SelectionState::Idle => ToolResponse::None,
        }
    }

    fn cancel(&mut self) {
        self.state = SelectionState::Idle;
    }

    fn is_active(&self) -> bool {
        self.state != SelectionState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::config::EditorConfig;
    use crate::document::Document;
    use crate::geometry::Rect;
    use crate::tools::ToolSettings;
    use egui::{pos2, vec2, Color32};
    use image::RgbaImage;

    #[test]
    fn grab_records_offset_and_moves_by_delta() {
        let mut document = Document::new(vec![RgbaImage::new(100, 100)]);
        document.add_action(0, Action::block(Rect::new(10.0, 10.0, 20.0, 20.0), Color32::RED));
        let config = EditorConfig::default();
        let settings = ToolSettings::default();
        let ctx = ToolContext {
            document: &document,
            page: 0,
            config: &config,
            settings: &settings,
        };

        let mut tool = SelectionTool::new();
        assert_eq!(tool.on_pointer_down(pos2(15.0, 12.0), &ctx), ToolResponse::Select(Some(0)));
        assert_eq!(
            tool.state(),
            &SelectionState::Dragging {
                index: 0,
                offset: vec2(5.0, 2.0),
                start_origin: pos2(10.0, 10.0)
            }
        );
        assert_eq!(
            tool.on_pointer_move(pos2(25.0, 22.0), &ctx),
            ToolResponse::Command(Command::MoveTo {
                page: 0,
                index: 0,
                origin: pos2(20.0, 20.0)
            })
        );
        let ToolResponse::MoveFinished { index, origin, distance } =
            tool.on_pointer_up(pos2(18.0, 12.0), &ctx)
        else {
            panic!("expected MoveFinished");
        };
        assert_eq!(index, 0);
        assert_eq!(origin, pos2(13.0, 10.0));
        assert!((distance - 3.0).abs() < 1e-6);
        assert!(!tool.is_active());
    }

    #[test]
    fn miss_clears_selection() {
        let document = Document::new(vec![RgbaImage::new(100, 100)]);
        let config = EditorConfig::default();
        let settings = ToolSettings::default();
        let ctx = ToolContext {
            document: &document,
            page: 0,
            config: &config,
            settings: &settings,
        };
        let mut tool = SelectionTool::new();
        assert_eq!(tool.on_pointer_down(pos2(50.0, 50.0), &ctx), ToolResponse::Select(None));
        assert_eq!(tool.on_pointer_up(pos2(50.0, 50.0), &ctx), ToolResponse::None);
    }
}
