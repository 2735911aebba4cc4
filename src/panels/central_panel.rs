use crate::app::PrivacyBlurApp;

pub fn central_panel(app: &mut PrivacyBlurApp, ctx: &egui::Context) {
    let strings = app.strings();
    egui::CentralPanel::default().show(ctx, |ui| {
        if app.editor().document().is_empty() {
            ui.centered_and_justified(|ui| {
                if app.is_loading() {
                    ui.spinner();
                } else {
                    ui.label(format!("{}\n{}", strings.drop_hint, strings.paste_hint));
                }
            });
            return;
        }

        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;

        app.fit_if_pending(canvas_rect, ctx.pixels_per_point());
        app.editor_mut().viewport_mut().backing = ctx.pixels_per_point();

        // Input before drawing, so this frame already shows its effect.
        app.handle_canvas_input(ctx, canvas_rect);

        let Some((texture, size)) = app.canvas_texture(ctx) else {
            return;
        };
        let image_rect = app
            .editor()
            .viewport()
            .display_rect(size)
            .translate(canvas_rect.min.to_vec2());

        painter.rect_filled(canvas_rect, 0.0, ui.visuals().extreme_bg_color);
        painter.image(
            texture,
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        if app.editor().tool_kind().is_draw() {
            ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
        } else if response.hovered() {
            ctx.set_cursor_icon(egui::CursorIcon::Move);
        }
    });
}
