//! Keep a key/value language file in step with the `loc("...")` calls of a
//! source file.
//!
//! New strings are appended as `key = ` lines with an empty translation, and
//! lines whose key no longer appears in the source are removed. Comments and
//! untouched lines are preserved byte for byte.

pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod fs;
pub mod language;
pub mod logging;
pub mod scanner;
pub mod sync;

pub use error::SyncError;
pub use sync::{synchronize, SyncOptions, SyncReport, Synchronizer};
