pub mod environment;
pub mod terminal;

pub use environment::{app_config_dir, default_config_path, tui_log_path};
pub use terminal::{single_line, strip_ansi_codes};
