//! Binary entry point that glues the in-memory session stores to the TUI.
//! Summarizing the bootstrapping pipeline here keeps the intent obvious when
//! revisiting the code: we bring up logging, seed the session dataset, and
//! drive the Ratatui event loop until the user exits.
use chrono::Local;
use farmanage::{run_app, App, Stores};

/// Initialize logging, seed the session stores, and launch the event loop.
///
/// Returning a `Result` bubbles up fatal terminal-setup problems (for
/// example a backend that cannot enter raw mode) instead of crashing
/// silently. Log output goes to stderr and is only visible when redirected,
/// which keeps the alternate screen clean.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let today = Local::now().date_naive();
    let stores = Stores::seeded(today);

    let mut app = App::new(stores, today);
    run_app(&mut app)
}
