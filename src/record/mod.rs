// src/record/mod.rs

//! The persisted build record: what the previous driver invocation knew
//! about each input.
//!
//! - [`model`] holds the in-memory snapshot types ([`BuildRecord`],
//!   [`InputStatus`]).
//! - [`loader`] reads the TOML record from disk, validates it, and captures
//!   current modification times for every compilable input.

pub mod loader;
pub mod model;

pub use loader::{load_build_record, RecordError};
pub use model::{BuildRecord, InputInfo, InputStatus};
