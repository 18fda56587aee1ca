//! TUI module for the interactive catalog browser.
//!
//! Uses `ratatui` + `crossterm` for rendering.

mod browser;
/// Browser view state types.
pub mod state;
mod ui;

pub use browser::run_browser;
