//! Ratatui front-end for the FarManage dashboard, split across logical
//! submodules: central app state and drawing, per-domain form state, static
//! screen content, shared layout helpers, and the terminal event loop.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
