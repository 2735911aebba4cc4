use std::collections::BTreeSet;

use egui::{Context, Event, Key, PointerButton, Pos2, Rect, TouchPhase};

pub mod gestures;
pub use gestures::PinchTracker;

/// Identifies one pointer: the mouse or a single touch.
pub type PointerId = u64;

/// Id used for mouse input. Touch ids come from egui.
pub const MOUSE_POINTER: PointerId = u64::MAX;

/// Keyboard shortcuts the editor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    /// Ctrl/Cmd+Z
    Undo,
    /// Delete or Backspace
    Delete,
    Escape,
}

/// Canvas input, already made relative to the canvas origin (display points).
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { id: PointerId, pos: Pos2 },
    PointerMove { id: PointerId, pos: Pos2 },
    PointerUp { id: PointerId, pos: Pos2 },
    DoubleClick { pos: Pos2 },
    /// Vertical scroll, positive when scrolling up
    Wheel { delta_y: f32 },
    Key(EditorKey),
}

/// Handles converting raw egui input into [`InputEvent`]s for the canvas
#[derive(Debug, Default)]
pub struct InputHandler {
    mouse_down: bool,
    touches: BTreeSet<PointerId>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect this frame's canvas events.
    ///
    /// Args:
    ///     ctx: The egui context
    ///     canvas: Screen rect of the canvas; positions are made relative to its corner
    ///     keyboard_free: False while a text field has focus, so Backspace edits text
    pub fn process_input(&mut self, ctx: &Context, canvas: Rect, keyboard_free: bool) -> Vec<InputEvent> {
        let origin = canvas.min.to_vec2();
        let mut events = Vec::new();

        ctx.input(|input| {
            let mut saw_touch = false;
            for event in &input.events {
                let Event::Touch { id, phase, pos, .. } = event else {
                    continue;
                };
                saw_touch = true;
                let id = id.0;
                let local = *pos - origin;
                match phase {
                    TouchPhase::Start if canvas.contains(*pos) => {
                        self.touches.insert(id);
                        events.push(InputEvent::PointerDown { id, pos: local });
                    }
                    TouchPhase::Start => {}
                    TouchPhase::Move if self.touches.contains(&id) => {
                        events.push(InputEvent::PointerMove { id, pos: local });
                    }
                    TouchPhase::Move => {}
                    TouchPhase::End | TouchPhase::Cancel => {
                        if self.touches.remove(&id) {
                            events.push(InputEvent::PointerUp { id, pos: local });
                        }
                    }
                }
            }

            // egui mirrors the first touch as mouse input; only use the mouse
            // when no touch is in flight.
            if !saw_touch && self.touches.is_empty() {
                let hover = input.pointer.interact_pos();
                let primary = PointerButton::Primary;
                if let Some(pos) = hover {
                    let local = pos - origin;
                    if input.pointer.button_pressed(primary) && canvas.contains(pos) {
                        self.mouse_down = true;
                        events.push(InputEvent::PointerDown { id: MOUSE_POINTER, pos: local });
                    } else if self.mouse_down && input.pointer.is_moving() {
                        events.push(InputEvent::PointerMove { id: MOUSE_POINTER, pos: local });
                    }
                    if input.pointer.button_double_clicked(primary) && canvas.contains(pos) {
                        events.push(InputEvent::DoubleClick { pos: local });
                    }
                    if self.mouse_down && input.pointer.button_released(primary) {
                        self.mouse_down = false;
                        events.push(InputEvent::PointerUp { id: MOUSE_POINTER, pos: local });
                    }
                }
            }

            let scroll = input.raw_scroll_delta.y;
            if scroll != 0.0 && input.pointer.hover_pos().is_some_and(|p| canvas.contains(p)) {
                events.push(InputEvent::Wheel { delta_y: scroll });
            }

            if keyboard_free {
                if input.modifiers.command && input.key_pressed(Key::Z) {
                    events.push(InputEvent::Key(EditorKey::Undo));
                }
                if input.key_pressed(Key::Delete) || input.key_pressed(Key::Backspace) {
                    events.push(InputEvent::Key(EditorKey::Delete));
                }
                if input.key_pressed(Key::Escape) {
                    events.push(InputEvent::Key(EditorKey::Escape));
                }
            }
        });

        events
    }
}
