use std::sync::Arc;

use egui::Pos2;
use image::RgbaImage;
use uuid::Uuid;

use crate::action::Action;

/// One page: an immutable base raster plus its ordered action list.
///
/// The action list is copy-on-write. Readers holding a snapshot from
/// [`Page::snapshot`] keep seeing the list as it was when they took it.
#[derive(Debug, Clone)]
pub struct Page {
    id: Uuid,
    base: Arc<RgbaImage>,
    actions: Arc<Vec<Action>>,
}

impl Page {
    pub fn new(base: RgbaImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            base: Arc::new(base),
            actions: Arc::new(Vec::new()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn base(&self) -> &Arc<RgbaImage> {
        &self.base
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn snapshot(&self) -> Arc<Vec<Action>> {
        Arc::clone(&self.actions)
    }

    pub fn size(&self) -> (u32, u32) {
        self.base.dimensions()
    }

    fn actions_mut(&mut self) -> &mut Vec<Action> {
        Arc::make_mut(&mut self.actions)
    }
}

/// The loaded page set and which page is being edited.
///
/// Every index-based operation tolerates bad input: an out-of-range page or
/// action index, or an empty list, leaves the document untouched and the
/// operation returns `false`.
#[derive(Debug, Clone)]
pub struct Document {
    id: Uuid,
    pages: Vec<Page>,
    current: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Document {
    /// A fresh document, one page per raster, starting on the first page.
    pub fn new(rasters: Vec<RgbaImage>) -> Self {
        let pages: Vec<Page> = rasters.into_iter().map(Page::new).collect();
        let id = Uuid::new_v4();
        log::info!("Document {id} created with {} page(s)", pages.len());
        Self {
            id,
            pages,
            current: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.current)
    }

    /// Actions of `page`, empty for an unknown page.
    pub fn actions(&self, page: usize) -> &[Action] {
        self.pages.get(page).map(Page::actions).unwrap_or(&[])
    }

    /// Append on top of the z-order (and the undo stack).
    pub fn add_action(&mut self, page: usize, action: Action) -> bool {
        let Some(target) = self.pages.get_mut(page) else {
            log::debug!("add_action: no page {page}");
            return false;
        };
        log::debug!("Page {page}: add {}", action.kind().name());
        target.actions_mut().push(action);
        true
    }

    /// Remove the most recently added action.
    pub fn undo(&mut self, page: usize) -> bool {
        let Some(target) = self.pages.get_mut(page) else {
            return false;
        };
        if target.actions.is_empty() {
            return false;
        }
        let removed = target.actions_mut().pop();
        log::debug!("Page {page}: undo {:?}", removed.map(|a| a.kind()));
        true
    }

    pub fn delete_at(&mut self, page: usize, index: usize) -> bool {
        let Some(target) = self.pages.get_mut(page) else {
            return false;
        };
        if index >= target.actions.len() {
            log::debug!("delete_at: page {page} has no action {index}");
            return false;
        }
        let removed = target.actions_mut().remove(index);
        log::debug!("Page {page}: delete {} at {index}", removed.kind().name());
        true
    }

    /// Swap in a new action at `index`, keeping its place in the z-order.
    pub fn replace_at(&mut self, page: usize, index: usize, action: Action) -> bool {
        let Some(target) = self.pages.get_mut(page) else {
            return false;
        };
        if index >= target.actions.len() {
            log::debug!("replace_at: page {page} has no action {index}");
            return false;
        }
        log::debug!("Page {page}: replace {index} with {}", action.kind().name());
        target.actions_mut()[index] = action;
        true
    }

    /// Place the action at `index` so its top-left corner is `origin`.
    pub fn move_action(&mut self, page: usize, index: usize, origin: Pos2) -> bool {
        let Some(moved) = self
            .actions(page)
            .get(index)
            .map(|a| a.with_rect(a.rect().with_origin(origin)))
        else {
            return false;
        };
        self.replace_at(page, index, moved)
    }

    pub fn clear_all(&mut self, page: usize) -> bool {
        let Some(target) = self.pages.get_mut(page) else {
            return false;
        };
        if target.actions.is_empty() {
            return false;
        }
        target.actions_mut().clear();
        log::debug!("Page {page}: cleared");
        true
    }

    pub fn set_current_page(&mut self, index: usize) -> bool {
        if index >= self.pages.len() || index == self.current {
            return false;
        }
        log::debug!("Current page {} -> {index}", self.current);
        self.current = index;
        true
    }
}
