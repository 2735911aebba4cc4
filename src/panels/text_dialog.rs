use crate::app::PrivacyBlurApp;
use crate::editor::TextTarget;

/// Modal window for entering or editing a text overlay's content.
pub fn text_dialog(app: &mut PrivacyBlurApp, ctx: &egui::Context) {
    let strings = app.strings();
    let Some(request) = app.editor_mut().text_request_mut() else {
        return;
    };
    let title = match request.target {
        TextTarget::New => strings.enter_text,
        TextTarget::Existing(_) => strings.edit_text,
    };

    let mut confirm = false;
    let mut cancel = false;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            let edit = ui.text_edit_singleline(&mut request.text);
            edit.request_focus();
            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                confirm = true;
            }
            ui.add(egui::Slider::new(&mut request.font_size, 10.0..=80.0).text(strings.font_size));
            ui.horizontal(|ui| {
                ui.label(strings.background);
                ui.color_edit_button_srgba(&mut request.background);
                // Swatch of the resulting text color
                let (rect, _) = ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 2.0, request.text_color());
            });
            ui.horizontal(|ui| {
                if ui.button(strings.confirm).clicked() {
                    confirm = true;
                }
                if ui.button(strings.cancel).clicked() {
                    cancel = true;
                }
            });
            if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                cancel = true;
            }
        });

    if confirm {
        app.editor_mut().confirm_text();
    } else if cancel {
        app.editor_mut().cancel_text();
    }
}
