//! Core library surface for the FarManage TUI dashboard.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: the record types, the session stores, and the pure metric
//! functions are usable without ever touching the terminal layer.
pub mod metrics;
pub mod models;
pub mod store;
pub mod ui;

/// The session-scoped record stores every view reads from.
pub use store::{RecordStore, Stores};

/// The domain record types the forms construct and the stores hold.
pub use models::{Animal, AnimalKind, ProductionRecord, RevenueCalculation, Sex};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
