pub mod tui;

pub use tui::launch_tui;
