mod central_panel;
mod text_dialog;
mod tools_panel;

pub use central_panel::central_panel;
pub use text_dialog::text_dialog;
pub use tools_panel::tools_panel;
