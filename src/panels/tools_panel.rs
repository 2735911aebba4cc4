use egui::Color32;

use crate::action::Action;
use crate::app::PrivacyBlurApp;
use crate::export::ExportFormat;
use crate::i18n::{Language, Strings};
use crate::tools::ToolKind;

fn tool_label(strings: &Strings, kind: ToolKind) -> &'static str {
    match kind {
        ToolKind::Select => strings.tool_select,
        ToolKind::DrawBlur => strings.tool_blur,
        ToolKind::DrawPixelate => strings.tool_pixelate,
        ToolKind::DrawBlock => strings.tool_block,
        ToolKind::DrawText => strings.tool_text,
    }
}

pub fn tools_panel(app: &mut PrivacyBlurApp, ctx: &egui::Context) {
    let strings = app.strings();
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(strings.title);
                let mut language = app.language();
                egui::ComboBox::from_id_salt("language")
                    .selected_text(language.native_name())
                    .show_ui(ui, |ui| {
                        for option in Language::ALL {
                            ui.selectable_value(&mut language, option, option.native_name());
                        }
                    });
                if language != app.language() {
                    log::info!("Language: {language:?}");
                    app.set_language(language);
                }
            });
            ui.separator();

            source_section(app, ui, ctx, strings);
            if app.editor().document().is_empty() {
                return;
            }
            ui.separator();

            tool_section(app, ui, strings);
            ui.separator();

            history_section(app, ui, strings);
            selection_section(app, ui, strings);
            ui.separator();

            export_section(app, ui, ctx, strings);
            ui.separator();

            view_section(app, ui, strings);
        });
}

fn source_section(app: &mut PrivacyBlurApp, ui: &mut egui::Ui, ctx: &egui::Context, strings: &Strings) {
    ui.horizontal(|ui| {
        ui.text_edit_singleline(&mut app.path_input);
        if ui.button(strings.open).clicked() && !app.path_input.trim().is_empty() {
            let path = std::path::PathBuf::from(app.path_input.trim());
            app.open_path(ctx, &path);
        }
    });
    if ui.button(strings.paste).clicked() {
        app.paste_from_clipboard(ctx);
    }
    if app.is_loading() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(strings.loading);
        });
    }
}

fn tool_section(app: &mut PrivacyBlurApp, ui: &mut egui::Ui, strings: &Strings) {
    let active = app.editor().tool_kind();
    for kind in ToolKind::ALL {
        if ui.selectable_label(active == kind, tool_label(strings, kind)).clicked() {
            log::info!("Tool selected from UI: {kind:?}");
            app.editor_mut().set_tool(kind);
        }
    }

    let settings = app.editor_mut().settings_mut();
    match active {
        ToolKind::DrawBlur => {
            ui.add(egui::Slider::new(&mut settings.blur_radius, 2.0..=40.0).text(strings.blur_radius));
        }
        ToolKind::DrawPixelate => {
            ui.add(egui::Slider::new(&mut settings.pixel_size, 4..=64).text(strings.pixel_size));
        }
        ToolKind::DrawBlock => {
            ui.horizontal(|ui| {
                ui.label(strings.block_color);
                ui.color_edit_button_srgba(&mut settings.block_color);
            });
        }
        ToolKind::DrawText => {
            ui.add(egui::Slider::new(&mut settings.font_size, 10.0..=80.0).text(strings.font_size));
        }
        ToolKind::Select => {}
    }
}

fn history_section(app: &mut PrivacyBlurApp, ui: &mut egui::Ui, strings: &Strings) {
    let editor = app.editor();
    let has_actions = !editor.actions().is_empty();
    let has_selection = editor.selection().is_some();
    let scanning = editor.is_scanning();

    ui.horizontal(|ui| {
        if ui.add_enabled(has_actions, egui::Button::new(strings.undo)).clicked() {
            app.editor_mut().undo();
        }
        if ui.add_enabled(has_selection, egui::Button::new(strings.delete)).clicked() {
            app.editor_mut().delete_selected();
        }
        if ui.add_enabled(has_actions, egui::Button::new(strings.clear_all)).clicked() {
            app.editor_mut().clear_page();
        }
    });

    if app.has_detector() {
        ui.horizontal(|ui| {
            if ui.add_enabled(!scanning, egui::Button::new(strings.auto_redact)).clicked() {
                app.start_scan();
            }
            if scanning {
                ui.spinner();
                ui.label(strings.scanning);
            }
        });
    }
}

/// Inspector for the selected action; text overlays can be restyled here.
fn selection_section(app: &mut PrivacyBlurApp, ui: &mut egui::Ui, strings: &Strings) {
    let Some(action) = app.editor().selected_action().cloned() else {
        return;
    };
    ui.separator();
    let rect = action.rect();
    ui.label(format!("{}: {}", strings.selected, action.kind().name()));
    ui.monospace(format!(
        "x {:.0}  y {:.0}  w {:.0}  h {:.0}",
        rect.x, rect.y, rect.w, rect.h
    ));

    let Action::Text(overlay) = action else {
        return;
    };
    let mut font_size = overlay.font_size;
    if ui
        .add(egui::Slider::new(&mut font_size, 10.0..=80.0).text(strings.font_size))
        .changed()
    {
        app.editor_mut().set_text_font_size(font_size);
    }
    ui.horizontal(|ui| {
        ui.label(strings.background);
        let mut fill: Color32 = overlay.fill;
        if ui.color_edit_button_srgba(&mut fill).changed() {
            app.editor_mut().set_text_background(fill);
        }
    });
    if ui.button(strings.edit_text).clicked() {
        app.editor_mut().edit_selected_text();
    }
}

fn export_section(app: &mut PrivacyBlurApp, ui: &mut egui::Ui, ctx: &egui::Context, strings: &Strings) {
    if ui.button(strings.copy).clicked() {
        app.copy_to_clipboard(ctx);
    }
    ui.horizontal(|ui| {
        let mut format = app.export_format();
        egui::ComboBox::from_id_salt("export_format")
            .selected_text(format.extension().to_uppercase())
            .show_ui(ui, |ui| {
                for option in ExportFormat::ALL {
                    ui.selectable_value(&mut format, option, option.extension().to_uppercase());
                }
            });
        app.set_export_format(format);
        if ui.button(strings.download).clicked() {
            app.download(ctx);
        }
    });
}

fn view_section(app: &mut PrivacyBlurApp, ui: &mut egui::Ui, strings: &Strings) {
    let scale = app.editor().viewport().scale;
    ui.horizontal(|ui| {
        ui.label(format!("{} {:.0}%", strings.zoom, scale * 100.0));
        if ui.button(strings.reset_view).clicked() {
            app.editor_mut().viewport_mut().reset();
        }
    });

    let page_count = app.editor().document().page_count();
    if page_count > 1 {
        ui.label(strings.pages);
        let current = app.editor().current_page();
        ui.horizontal_wrapped(|ui| {
            for index in 0..page_count {
                if ui
                    .selectable_label(index == current, (index + 1).to_string())
                    .clicked()
                {
                    app.editor_mut().set_current_page(index);
                }
            }
        });
    }
}
