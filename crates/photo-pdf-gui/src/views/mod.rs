mod log_panel;
mod selection;

pub use log_panel::show_log_panel;
pub use selection::{PreviewState, show_selection};
