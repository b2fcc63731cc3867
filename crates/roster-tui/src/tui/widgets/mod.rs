// TUI widget modules for each screen zone.

pub mod help_bar;
pub mod quit_confirm;
pub mod selection;
pub mod sliders;
pub mod status_bar;
pub mod warnings;
