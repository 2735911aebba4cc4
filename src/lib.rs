#![warn(clippy::all, rust_2018_idioms)]

pub mod action;
pub mod app;
pub mod command;
pub mod compositor;
pub mod config;
pub mod document;
pub mod editor;
pub mod effects;
pub mod error;
pub mod export;
pub mod file_handler;
pub mod geometry;
pub mod i18n;
pub mod ingest;
pub mod input;
pub mod jobs;
pub mod ocr;
pub mod panels;
pub mod sampling;
pub mod text;
pub mod texture_manager;
pub mod tools;
pub mod viewport;

pub use action::{Action, ActionKind, TextOverlay};
pub use app::PrivacyBlurApp;
pub use command::Command;
pub use compositor::Compositor;
pub use config::EditorConfig;
pub use document::{Document, Page};
pub use editor::{Editor, TextRequest, TextTarget};
pub use error::{RedactError, Result};
pub use geometry::Rect;
pub use input::{InputEvent, InputHandler};
pub use sampling::{sample_colors, ColorPair, SampleMode};
pub use tools::{Tool, ToolKind, ToolType};
pub use viewport::Viewport;
