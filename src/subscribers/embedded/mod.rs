//! # Built-in subscribers
//!
//! - [`LogWriter`]: forwards events to `tracing` as structured records.

mod log;

pub use log::LogWriter;
