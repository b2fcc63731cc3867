// Library root: the terminal front end for roster-draw, exposed so the
// binary and the tests share one copy.

pub mod app;
pub mod protocol;
pub mod tui;
