use eframe_redact::input::{EditorKey, MOUSE_POINTER};
use eframe_redact::jobs::Job;
use eframe_redact::{Action, ActionKind, Editor, InputEvent, RedactError, Rect, TextTarget, ToolKind};
use egui::{pos2, Color32, Pos2};
use image::{Rgba, RgbaImage};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

// Helper to create an editor showing one blank white page
fn white_editor(w: u32, h: u32) -> Editor {
    let mut editor = Editor::default();
    assert!(editor.load_pages(vec![RgbaImage::from_pixel(w, h, WHITE)]));
    editor
}

fn press(editor: &mut Editor, pos: Pos2) {
    editor.handle_event(InputEvent::PointerDown { id: MOUSE_POINTER, pos });
}

fn move_to(editor: &mut Editor, pos: Pos2) {
    editor.handle_event(InputEvent::PointerMove { id: MOUSE_POINTER, pos });
}

fn release(editor: &mut Editor, pos: Pos2) {
    editor.handle_event(InputEvent::PointerUp { id: MOUSE_POINTER, pos });
}

fn drag(editor: &mut Editor, from: Pos2, to: Pos2) {
    press(editor, from);
    move_to(editor, to);
    release(editor, to);
}

#[test]
fn drawn_block_fills_exactly_its_rect() {
    let mut editor = white_editor(200, 200);
    editor.set_tool(ToolKind::DrawBlock);
    editor.settings_mut().block_color = Color32::from_rgb(0xff, 0, 0);
    drag(&mut editor, pos2(10.0, 10.0), pos2(110.0, 60.0));

    assert_eq!(
        editor.actions(),
        &[Action::block(Rect::new(10.0, 10.0, 100.0, 50.0), Color32::from_rgb(0xff, 0, 0))]
    );
    let out = editor.render_current_export().unwrap();
    for (x, y, px) in out.enumerate_pixels() {
        let inside = (10..110).contains(&x) && (10..60).contains(&y);
        let expected = if inside { [255, 0, 0, 255] } else { [255, 255, 255, 255] };
        assert_eq!(px.0, expected, "pixel ({x}, {y})");
    }
}

#[test]
fn drawing_backwards_normalizes_the_rect() {
    let mut editor = white_editor(200, 200);
    editor.set_tool(ToolKind::DrawBlur);
    drag(&mut editor, pos2(110.0, 60.0), pos2(10.0, 10.0));
    assert_eq!(editor.actions()[0].rect(), Rect::new(10.0, 10.0, 100.0, 50.0));
}

#[test]
fn two_undos_leave_the_first_action() {
    let mut editor = white_editor(200, 200);
    let first = Action::block(Rect::new(0.0, 0.0, 20.0, 20.0), Color32::RED);
    editor.add_action(first.clone());
    editor.add_action(Action::blur(Rect::new(30.0, 30.0, 20.0, 20.0), 8.0));
    editor.add_action(Action::pixelate(Rect::new(60.0, 60.0, 20.0, 20.0), 4));

    editor.handle_event(InputEvent::Key(EditorKey::Undo));
    assert!(editor.undo());
    assert_eq!(editor.actions(), &[first]);
}

#[test]
fn dragging_the_middle_action_moves_only_it() {
    let mut editor = white_editor(200, 200);
    let rects = [
        Rect::new(0.0, 0.0, 30.0, 30.0),
        Rect::new(50.0, 50.0, 30.0, 30.0),
        Rect::new(120.0, 120.0, 30.0, 30.0),
    ];
    for rect in rects {
        editor.add_action(Action::block(rect, Color32::BLACK));
    }

    press(&mut editor, pos2(60.0, 60.0));
    assert_eq!(editor.selection(), Some(1));
    move_to(&mut editor, pos2(70.0, 70.0));
    move_to(&mut editor, pos2(80.0, 80.0));
    release(&mut editor, pos2(80.0, 80.0));

    let actions = editor.actions();
    assert_eq!(actions[0].rect(), rects[0]);
    assert_eq!(actions[1].rect(), Rect::new(70.0, 70.0, 30.0, 30.0));
    assert_eq!(actions[2].rect(), rects[2]);
}

#[test]
fn overlapping_actions_pick_the_topmost() {
    let mut editor = white_editor(200, 200);
    editor.add_action(Action::block(Rect::new(0.0, 0.0, 100.0, 100.0), Color32::BLACK));
    editor.add_action(Action::block(Rect::new(40.0, 40.0, 20.0, 20.0), Color32::RED));
    press(&mut editor, pos2(50.0, 50.0));
    release(&mut editor, pos2(50.0, 50.0));
    assert_eq!(editor.selection(), Some(1));

    press(&mut editor, pos2(150.0, 150.0));
    release(&mut editor, pos2(150.0, 150.0));
    assert_eq!(editor.selection(), None);
}

#[test]
fn pinch_doubles_then_clamps() {
    let mut editor = white_editor(200, 200);
    editor.handle_event(InputEvent::PointerDown { id: 1, pos: pos2(100.0, 100.0) });
    editor.handle_event(InputEvent::PointerDown { id: 2, pos: pos2(200.0, 100.0) });
    editor.handle_event(InputEvent::PointerMove { id: 2, pos: pos2(300.0, 100.0) });
    assert!((editor.viewport().scale - 2.0).abs() < 1e-5);

    editor.handle_event(InputEvent::PointerMove { id: 2, pos: pos2(700.0, 100.0) });
    assert_eq!(editor.viewport().scale, 5.0);

    editor.handle_event(InputEvent::PointerUp { id: 2, pos: pos2(700.0, 100.0) });
    editor.handle_event(InputEvent::PointerUp { id: 1, pos: pos2(100.0, 100.0) });
    assert!(editor.actions().is_empty());
}

#[test]
fn second_finger_cancels_a_draw() {
    let mut editor = white_editor(200, 200);
    editor.set_tool(ToolKind::DrawBlock);
    editor.handle_event(InputEvent::PointerDown { id: 1, pos: pos2(10.0, 10.0) });
    editor.handle_event(InputEvent::PointerMove { id: 1, pos: pos2(90.0, 90.0) });
    editor.handle_event(InputEvent::PointerDown { id: 2, pos: pos2(150.0, 150.0) });
    editor.handle_event(InputEvent::PointerUp { id: 1, pos: pos2(90.0, 90.0) });
    editor.handle_event(InputEvent::PointerUp { id: 2, pos: pos2(150.0, 150.0) });
    assert!(editor.actions().is_empty());
    assert!(editor.preview().is_none());
}

#[test]
fn wheel_zooms_and_drawing_maps_to_raster_space() {
    let mut editor = white_editor(200, 200);
    editor.viewport_mut().set_scale(2.0);
    editor.set_tool(ToolKind::DrawBlock);
    drag(&mut editor, pos2(20.0, 20.0), pos2(120.0, 120.0));
    assert_eq!(editor.actions()[0].rect(), Rect::new(10.0, 10.0, 50.0, 50.0));

    editor.handle_event(InputEvent::Wheel { delta_y: 1.0 });
    assert!((editor.viewport().scale - 2.2).abs() < 1e-5);
}

#[test]
fn text_request_lifecycle() {
    let mut editor = white_editor(200, 200);
    editor.set_tool(ToolKind::DrawText);
    drag(&mut editor, pos2(20.0, 20.0), pos2(120.0, 60.0));
    assert_eq!(editor.text_request().unwrap().target, TextTarget::New);

    // Canvas input is ignored while the entry is open.
    editor.set_tool(ToolKind::DrawText);
    drag(&mut editor, pos2(130.0, 130.0), pos2(190.0, 190.0));
    assert_eq!(editor.text_request().unwrap().rect, Rect::new(20.0, 20.0, 100.0, 40.0));

    editor.cancel_text();
    assert!(editor.text_request().is_none());
    assert!(editor.actions().is_empty());

    drag(&mut editor, pos2(20.0, 20.0), pos2(120.0, 60.0));
    editor.text_request_mut().unwrap().text = "ACME Corp".into();
    assert!(editor.confirm_text());
    let overlay = editor.actions()[0].as_text().unwrap();
    assert_eq!(overlay.text, "ACME Corp");
    assert_eq!(overlay.fill, Color32::WHITE);
    assert_eq!(overlay.text_color, Color32::BLACK);
}

#[test]
fn escape_drops_selection() {
    let mut editor = white_editor(100, 100);
    editor.add_action(Action::block(Rect::new(10.0, 10.0, 30.0, 30.0), Color32::RED));
    press(&mut editor, pos2(20.0, 20.0));
    release(&mut editor, pos2(20.0, 20.0));
    assert_eq!(editor.selection(), Some(0));
    editor.handle_event(InputEvent::Key(EditorKey::Escape));
    assert_eq!(editor.selection(), None);
    assert_eq!(editor.actions().len(), 1);
}

#[test]
fn pages_keep_their_own_actions() {
    let mut editor = Editor::default();
    editor.load_pages(vec![RgbaImage::from_pixel(50, 50, WHITE), RgbaImage::from_pixel(50, 50, WHITE)]);
    editor.add_action(Action::block(Rect::new(0.0, 0.0, 10.0, 10.0), Color32::RED));
    assert!(editor.set_current_page(1));
    assert!(editor.actions().is_empty());
    editor.add_action(Action::blur(Rect::new(0.0, 0.0, 10.0, 10.0), 4.0));
    editor.undo();
    assert!(editor.actions().is_empty());
    assert!(editor.set_current_page(0));
    assert_eq!(editor.actions().len(), 1);
    assert!(!editor.set_current_page(7));

    let exported = editor.render_all_export();
    assert_eq!(exported.len(), 2);
    assert_eq!(exported[0].get_pixel(5, 5).0, [255, 0, 0, 255]);
    assert_eq!(exported[1].get_pixel(5, 5).0, [255, 255, 255, 255]);
}

#[test]
fn failed_load_keeps_the_document() {
    let mut editor = white_editor(64, 64);
    editor.add_action(Action::block(Rect::new(0.0, 0.0, 10.0, 10.0), Color32::RED));
    let before = editor.document().id();

    let ticket = editor.begin_ingest();
    let result = eframe_redact::ingest::load_pages(b"definitely not an image", None, 2.0);
    assert!(!editor.finish_ingest(ticket, result));
    assert_eq!(editor.document().id(), before);
    assert_eq!(editor.actions().len(), 1);

    let ticket = editor.begin_ingest();
    assert!(!editor.finish_ingest(ticket, Ok(Vec::new())));
    assert_eq!(editor.document().id(), before);
}

#[test]
fn load_through_a_job_lands_when_current() {
    let mut editor = white_editor(64, 64);
    let ticket = editor.begin_ingest();
    let job = Job::spawn("load", || Ok::<_, RedactError>(vec![RgbaImage::new(8, 8), RgbaImage::new(8, 8)]));
    let pages = job.wait().unwrap();
    assert!(editor.finish_ingest(ticket, pages));
    assert_eq!(editor.document().page_count(), 2);
    assert_eq!(editor.current_page(), 0);
}

#[test]
fn scan_failure_clears_scanning_only() {
    let mut editor = white_editor(64, 64);
    editor.add_action(Action::block(Rect::new(0.0, 0.0, 10.0, 10.0), Color32::RED));
    let (ticket, base) = editor.begin_scan().unwrap();
    assert_eq!(base.dimensions(), (64, 64));
    assert_eq!(editor.finish_scan(ticket, Err(RedactError::Ocr("model missing".into()))), 0);
    assert!(!editor.is_scanning());
    assert_eq!(editor.actions().len(), 1);
}

#[test]
fn scan_results_for_a_replaced_document_are_dropped() {
    let mut editor = white_editor(64, 64);
    let (ticket, _) = editor.begin_scan().unwrap();
    editor.load_pages(vec![RgbaImage::from_pixel(64, 64, WHITE)]);
    let spans = vec![eframe_redact::ocr::TextSpan::new(
        "call 555-123-4567",
        Rect::new(5.0, 5.0, 40.0, 10.0),
    )];
    assert_eq!(editor.finish_scan(ticket, Ok(spans)), 0);
    assert!(editor.actions().is_empty());
}

fn block_text_blur(editor: &mut Editor) {
    editor.add_action(Action::block(Rect::new(0.0, 0.0, 30.0, 30.0), Color32::RED));
    editor.add_action(Action::text(
        Rect::new(50.0, 50.0, 60.0, 30.0),
        "old",
        Color32::WHITE,
        Color32::BLACK,
        16.0,
    ));
    editor.add_action(Action::blur(Rect::new(120.0, 120.0, 40.0, 40.0), 8.0));
}

#[test]
fn deleting_during_text_edit_keeps_other_redactions() {
    let mut editor = white_editor(200, 200);
    block_text_blur(&mut editor);
    press(&mut editor, pos2(80.0, 65.0));
    release(&mut editor, pos2(80.0, 65.0));
    assert_eq!(editor.selection(), Some(1));
    assert!(editor.edit_selected_text());

    assert!(editor.delete_selected());
    assert!(editor.text_request().is_none());
    assert!(!editor.confirm_text());

    let kinds: Vec<_> = editor.actions().iter().map(Action::kind).collect();
    assert_eq!(kinds, vec![ActionKind::Block, ActionKind::Blur]);
    assert_eq!(editor.actions()[1].rect(), Rect::new(120.0, 120.0, 40.0, 40.0));
}

#[test]
fn undo_during_text_edit_closes_the_entry() {
    let mut editor = white_editor(200, 200);
    block_text_blur(&mut editor);
    assert!(editor.edit_text(1));
    editor.text_request_mut().unwrap().text = "new".into();

    assert!(editor.undo());
    assert!(editor.text_request().is_none());
    assert!(!editor.confirm_text());
    assert_eq!(editor.actions().len(), 2);
    assert_eq!(editor.actions()[1].as_text().unwrap().text, "old");
}

#[test]
fn new_text_entry_survives_other_edits() {
    let mut editor = white_editor(200, 200);
    block_text_blur(&mut editor);
    editor.set_tool(ToolKind::DrawText);
    drag(&mut editor, pos2(10.0, 150.0), pos2(90.0, 190.0));
    editor.undo();
    editor.text_request_mut().unwrap().text = "kept".into();
    assert!(editor.confirm_text());
    assert_eq!(editor.actions().len(), 3);
    assert_eq!(editor.actions()[2].as_text().unwrap().text, "kept");
}

#[test]
fn stale_scan_result_keeps_newer_scan_running() {
    let mut editor = white_editor(64, 64);
    let (first, _) = editor.begin_scan().unwrap();
    editor.load_pages(vec![RgbaImage::from_pixel(64, 64, WHITE)]);
    let (second, _) = editor.begin_scan().unwrap();

    assert_eq!(editor.finish_scan(first, Ok(Vec::new())), 0);
    assert!(editor.is_scanning());
    assert!(editor.begin_scan().is_none());

    let spans = vec![eframe_redact::ocr::TextSpan::new(
        "a@b.com",
        Rect::new(5.0, 5.0, 40.0, 10.0),
    )];
    assert_eq!(editor.finish_scan(second, Ok(spans)), 1);
    assert!(!editor.is_scanning());
}

#[test]
fn release_position_finishes_the_drag() {
    let mut editor = white_editor(100, 100);
    editor.add_action(Action::block(Rect::new(10.0, 10.0, 30.0, 30.0), Color32::RED));
    press(&mut editor, pos2(20.0, 20.0));
    move_to(&mut editor, pos2(30.0, 30.0));
    release(&mut editor, pos2(40.0, 45.0));

    assert_eq!(editor.actions()[0].rect(), Rect::new(30.0, 35.0, 30.0, 30.0));
    assert_eq!(editor.selection(), Some(0));
}
