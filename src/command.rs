use egui::Pos2;

use crate::action::Action;
use crate::document::Document;

/// Every mutation the editor can make to the page store.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append an action on top of a page
    AddAction { page: usize, action: Action },
    /// Drop the most recent action of a page
    Undo { page: usize },
    DeleteAt { page: usize, index: usize },
    /// Replace in place, used by text edits
    ReplaceAt {
        page: usize,
        index: usize,
        action: Action,
    },
    /// Live drag: move an action's top-left corner
    MoveTo {
        page: usize,
        index: usize,
        origin: Pos2,
    },
    ClearAll { page: usize },
    SetCurrentPage { index: usize },
}

impl Command {
    /// Apply to the document. Returns whether anything changed.
    pub fn execute(&self, document: &mut Document) -> bool {
        match self {
            Command::AddAction { page, action } => document.add_action(*page, action.clone()),
            Command::Undo { page } => document.undo(*page),
            Command::DeleteAt { page, index } => document.delete_at(*page, *index),
            Command::ReplaceAt {
                page,
                index,
                action,
            } => document.replace_at(*page, *index, action.clone()),
            Command::MoveTo {
                page,
                index,
                origin,
            } => document.move_action(*page, *index, *origin),
            Command::ClearAll { page } => document.clear_all(*page),
            Command::SetCurrentPage { index } => document.set_current_page(*index),
        }
    }

    /// Whether a successful execution inserts or removes actions.
    ///
    /// Such edits invalidate any selection index.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Command::AddAction { .. }
                | Command::Undo { .. }
                | Command::DeleteAt { .. }
                | Command::ClearAll { .. }
                | Command::SetCurrentPage { .. }
        )
    }
}
