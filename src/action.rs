use egui::Color32;

use crate::geometry::Rect;

pub const DEFAULT_BLUR_RADIUS: f32 = 12.0;
pub const DEFAULT_CELL_SIZE: u32 = 12;
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// The four redaction treatments, without their payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Blur,
    Pixelate,
    Block,
    Text,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Blur => "blur",
            ActionKind::Pixelate => "pixelate",
            ActionKind::Block => "block",
            ActionKind::Text => "text",
        }
    }
}

/// Payload of a text overlay: a filled box with centred text on top.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub rect: Rect,
    pub fill: Color32,
    pub text_color: Color32,
    pub text: String,
    pub font_size: f32,
}

/// One committed redaction on a page.
///
/// Actions are values: an edit builds a new action and replaces the old one
/// at its index, it never mutates a stored action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Blur { rect: Rect, radius: f32 },
    Pixelate { rect: Rect, cell_size: u32 },
    Block { rect: Rect, fill: Color32 },
    Text(TextOverlay),
}

impl Action {
    pub fn blur(rect: Rect, radius: f32) -> Self {
        Action::Blur { rect, radius }
    }

    pub fn pixelate(rect: Rect, cell_size: u32) -> Self {
        Action::Pixelate {
            rect,
            cell_size: cell_size.max(1),
        }
    }

    pub fn block(rect: Rect, fill: Color32) -> Self {
        Action::Block { rect, fill }
    }

    pub fn text(
        rect: Rect,
        text: impl Into<String>,
        fill: Color32,
        text_color: Color32,
        font_size: f32,
    ) -> Self {
        Action::Text(TextOverlay {
            rect,
            fill,
            text_color,
            text: text.into(),
            font_size,
        })
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Blur { .. } => ActionKind::Blur,
            Action::Pixelate { .. } => ActionKind::Pixelate,
            Action::Block { .. } => ActionKind::Block,
            Action::Text(_) => ActionKind::Text,
        }
    }

    pub fn rect(&self) -> Rect {
        match self {
            Action::Blur { rect, .. } | Action::Pixelate { rect, .. } | Action::Block { rect, .. } => {
                *rect
            }
            Action::Text(overlay) => overlay.rect,
        }
    }

    /// A copy of this action placed at `rect`.
    pub fn with_rect(&self, rect: Rect) -> Self {
        let mut next = self.clone();
        match &mut next {
            Action::Blur { rect: r, .. }
            | Action::Pixelate { rect: r, .. }
            | Action::Block { rect: r, .. } => *r = rect,
            Action::Text(overlay) => overlay.rect = rect,
        }
        next
    }

    pub fn as_text(&self) -> Option<&TextOverlay> {
        match self {
            Action::Text(overlay) => Some(overlay),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Action::Text(_))
    }

    pub fn hit_test(&self, pos: egui::Pos2) -> bool {
        self.rect().contains(pos)
    }
}

/// Topmost action under `pos`, scanning in reverse z-order.
pub fn hit_test(actions: &[Action], pos: egui::Pos2) -> Option<usize> {
    actions.iter().rposition(|action| action.hit_test(pos))
}
