//! Session state module split across logical submodules.

mod records;
mod seed;

pub use records::RecordStore;
pub use seed::Stores;
