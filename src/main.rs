#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::PathBuf;

use eframe_redact::ingest::PdftoppmRasterizer;
use eframe_redact::{EditorConfig, PrivacyBlurApp};

/// Usage: `privacyblur [--config settings.json] [file]`
struct Args {
    config: Option<PathBuf>,
    file: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args {
        config: None,
        file: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            args.config = iter.next().map(PathBuf::from);
        } else {
            args.file = Some(PathBuf::from(arg));
        }
    }
    args
}

fn load_config(path: Option<&PathBuf>) -> EditorConfig {
    let Some(path) = path else {
        return EditorConfig::default();
    };
    match EditorConfig::load(path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(err) => {
            log::warn!("Using default config, {} is unusable: {err}", path.display());
            EditorConfig::default()
        }
    }
}

#[cfg(feature = "ocr")]
fn with_ocr(app: PrivacyBlurApp) -> PrivacyBlurApp {
    match eframe_redact::ocr::OcrsDetector::with_defaults() {
        Ok(detector) => app.with_detector(Box::new(detector)),
        Err(err) => {
            log::warn!("Auto-redaction disabled: {err}");
            app
        }
    }
}

#[cfg(not(feature = "ocr"))]
fn with_ocr(app: PrivacyBlurApp) -> PrivacyBlurApp {
    app
}

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();
    let config = load_config(args.config.as_ref());
    if !PdftoppmRasterizer::default().is_available() {
        log::warn!("pdftoppm not found, PDF files cannot be opened");
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([480.0, 320.0])
            .with_drag_and_drop(true)
            .with_title("PrivacyBlur"),
        ..Default::default()
    };
    eframe::run_native(
        "privacyblur",
        native_options,
        Box::new(move |cc| {
            let mut app = with_ocr(PrivacyBlurApp::new(cc, config));
            if let Some(file) = &args.file {
                app.open_path(&cc.egui_ctx, file);
            }
            Ok(Box::new(app))
        }),
    )
}
