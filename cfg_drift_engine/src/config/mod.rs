//! Configuration for the audit engine
//!
//! Fixed format constants live in [`constants`]; user preferences that may
//! change per run are read from the environment in [`runtime`].

pub mod constants;
pub mod runtime;

pub use runtime::LoggingPreferences;
