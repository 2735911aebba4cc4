//! Property tests for the redaction model.
//!
//! Verifies:
//! 1. Rects smaller than the commit threshold never become actions
//! 2. Rendering is deterministic, and an empty action list renders the base
//! 3. Undo after an add restores the previous list
//! 4. Sampled colors only depend on the base raster
//! 5. Pixelation uses a floor(w/cell) x floor(h/cell) grid (at least 1x1)

use std::collections::BTreeSet;

use eframe_redact::effects::{mosaic_grid, pixelate_rect};
use eframe_redact::input::MOUSE_POINTER;
use eframe_redact::sampling::contrast_text_color;
use eframe_redact::{
    Action, Compositor, Document, Editor, InputEvent, Rect, SampleMode, ToolKind, sample_colors,
};
use egui::{pos2, Color32};
use image::{Rgba, RgbaImage};
use proptest::prelude::*;

const SIDE: u32 = 48;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_color() -> impl Strategy<Value = Color32> {
    any::<[u8; 3]>().prop_map(|[r, g, b]| Color32::from_rgb(r, g, b))
}

fn arb_rect() -> impl Strategy<Value = Rect> {
    (-8.0f32..40.0, -8.0f32..40.0, 5.0f32..30.0, 5.0f32..30.0)
        .prop_map(|(x, y, w, h)| Rect::new(x.round(), y.round(), w.round(), h.round()))
}

fn arb_tiny_rect() -> impl Strategy<Value = Rect> {
    prop_oneof![
        (0.0f32..40.0, 0.0f32..40.0, 0.0f32..4.99, 0.0f32..40.0),
        (0.0f32..40.0, 0.0f32..40.0, 0.0f32..40.0, 0.0f32..4.99),
    ]
    .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (arb_rect(), 1.0f32..10.0).prop_map(|(r, radius)| Action::blur(r, radius)),
        (arb_rect(), 2u32..12).prop_map(|(r, cell)| Action::pixelate(r, cell)),
        (arb_rect(), arb_color()).prop_map(|(r, c)| Action::block(r, c)),
        (arb_rect(), arb_color(), "[a-z]{0,6}").prop_map(|(r, c, text)| {
            Action::text(r, text, c, contrast_text_color(c), 12.0)
        }),
    ]
}

fn arb_base() -> impl Strategy<Value = RgbaImage> {
    any::<u64>().prop_map(|seed| {
        RgbaImage::from_fn(SIDE, SIDE, |x, y| {
            let v = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add((x * 131 + y * 7919) as u64);
            let [r, g, b, ..] = v.to_le_bytes();
            Rgba([r, g, b, 255])
        })
    })
}

fn editor_on(base: RgbaImage) -> Editor {
    let mut editor = Editor::default();
    editor.load_pages(vec![base]);
    editor
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn tiny_rects_are_never_committed(rect in arb_tiny_rect(), color in arb_color()) {
        let mut editor = editor_on(RgbaImage::new(SIDE, SIDE));
        for action in [
            Action::blur(rect, 8.0),
            Action::pixelate(rect, 4),
            Action::block(rect, color),
            Action::text(rect, "x", color, Color32::WHITE, 12.0),
        ] {
            prop_assert!(!editor.add_action(action));
        }
        prop_assert!(editor.actions().is_empty());

        editor.set_tool(ToolKind::DrawBlock);
        let (from, to) = (rect.origin(), pos2(rect.right(), rect.bottom()));
        editor.handle_event(InputEvent::PointerDown { id: MOUSE_POINTER, pos: from });
        editor.handle_event(InputEvent::PointerMove { id: MOUSE_POINTER, pos: to });
        editor.handle_event(InputEvent::PointerUp { id: MOUSE_POINTER, pos: to });
        prop_assert!(editor.actions().is_empty());
    }

    #[test]
    fn rendering_is_deterministic(base in arb_base(), actions in prop::collection::vec(arb_action(), 0..5)) {
        let compositor = Compositor::default();
        let first = compositor.render_export(&base, &actions);
        let second = compositor.render_export(&base, &actions);
        prop_assert_eq!(first, second);
        prop_assert_eq!(compositor.render_export(&base, &[]), base);
    }

    #[test]
    fn undo_restores_previous_list(actions in prop::collection::vec(arb_action(), 0..6), extra in arb_action()) {
        let mut document = Document::new(vec![RgbaImage::new(SIDE, SIDE)]);
        for action in &actions {
            document.add_action(0, action.clone());
        }
        let before = document.actions(0).to_vec();
        prop_assert!(document.add_action(0, extra));
        prop_assert!(document.undo(0));
        prop_assert_eq!(document.actions(0), &before[..]);
    }

    #[test]
    fn sampling_ignores_committed_actions(
        base in arb_base(),
        target in arb_rect(),
        actions in prop::collection::vec(arb_action(), 1..5),
    ) {
        let before = sample_colors(&base, &target, SampleMode::default());
        let mut editor = editor_on(base);
        prop_assert_eq!(editor.sample_colors(&target), before);
        for action in actions {
            editor.add_action(action);
        }
        prop_assert_eq!(editor.sample_colors(&target), before);
    }

    #[test]
    fn mosaic_grid_matches_cell_size(
        x in 0u32..16,
        y in 0u32..16,
        w in 1u32..48,
        h in 1u32..48,
        cell in 1u32..20,
    ) {
        let w = w.min(63 - x);
        let h = h.min(63 - y);
        let base = RgbaImage::from_fn(64, 64, |px, py| Rgba([(px * 4) as u8, (py * 4) as u8, 0, 255]));
        let rect = Rect::new(x as f32, y as f32, w as f32, h as f32);
        let expected = ((w / cell).max(1), (h / cell).max(1));
        prop_assert_eq!(mosaic_grid(rect.w, rect.h, cell), expected);

        let mut target = base.clone();
        prop_assert_eq!(pixelate_rect(&mut target, &base, &rect, cell), expected);

        // Cells average a strict gradient, so each column/row has its own value.
        let columns: BTreeSet<u8> = (x..x + w).map(|px| target.get_pixel(px, y).0[0]).collect();
        let rows: BTreeSet<u8> = (y..y + h).map(|py| target.get_pixel(x, py).0[1]).collect();
        prop_assert_eq!(columns.len() as u32, expected.0);
        prop_assert_eq!(rows.len() as u32, expected.1);
    }
}

#[test]
fn text_color_flips_at_the_brightness_threshold() {
    assert_eq!(contrast_text_color(Color32::from_rgb(255, 255, 255)), Color32::BLACK);
    assert_eq!(contrast_text_color(Color32::from_rgb(0, 0, 0)), Color32::WHITE);
}
