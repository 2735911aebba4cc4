use std::collections::BTreeMap;

use egui::Pos2;

use super::PointerId;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy)]
struct PinchStart {
    distance: f32,
    scale: f32,
    last_mid: Pos2,
}

/// Tracks pointers that are down and turns two of them into pinch-zoom + pan.
///
/// Scale follows the ratio of the current to the initial finger distance,
/// relative to the scale when the pinch began. Pan follows the midpoint.
#[derive(Debug, Clone, Default)]
pub struct PinchTracker {
    pointers: BTreeMap<PointerId, Pos2>,
    start: Option<PinchStart>,
}

fn distance_and_mid(a: Pos2, b: Pos2) -> (f32, Pos2) {
    (a.distance(b), a.lerp(b, 0.5))
}

impl PinchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pinching(&self) -> bool {
        self.start.is_some()
    }

    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    fn pair(&self) -> Option<(Pos2, Pos2)> {
        let mut it = self.pointers.values().copied();
        Some((it.next()?, it.next()?))
    }

    /// Register a pointer. Returns true when this starts a pinch.
    pub fn pointer_down(&mut self, id: PointerId, pos: Pos2, viewport: &Viewport) -> bool {
        self.pointers.insert(id, pos);
        if self.start.is_some() || self.pointers.len() != 2 {
            return false;
        }
        let Some((a, b)) = self.pair() else {
            return false;
        };
        let (distance, mid) = distance_and_mid(a, b);
        self.start = Some(PinchStart {
            distance,
            scale: viewport.scale,
            last_mid: mid,
        });
        log::debug!("Pinch started at distance {distance:.1}");
        true
    }

    /// Update a pointer. Returns true when the move was consumed by the pinch.
    pub fn pointer_move(&mut self, id: PointerId, pos: Pos2, viewport: &mut Viewport) -> bool {
        if let Some(p) = self.pointers.get_mut(&id) {
            *p = pos;
        }
        let Some(start) = self.start.as_mut() else {
            return false;
        };
        let mut it = self.pointers.values().copied();
        let (Some(a), Some(b)) = (it.next(), it.next()) else {
            return true;
        };
        let (distance, mid) = distance_and_mid(a, b);
        viewport.set_scale(start.scale * distance / start.distance.max(1.0));
        viewport.pan(mid - start.last_mid);
        start.last_mid = mid;
        true
    }

    /// Forget a pointer. Returns true when it belonged to a pinch.
    pub fn pointer_up(&mut self, id: PointerId) -> bool {
        self.pointers.remove(&id);
        let was_pinching = self.start.is_some();
        if was_pinching && self.pointers.len() < 2 {
            self.start = None;
        }
        was_pinching
    }

    pub fn reset(&mut self) {
        self.pointers.clear();
        self.start = None;
    }
}
