//! Call detail record model.
//!
//! Defines the record types, the `YYYY-MM-DD HH:MM:SS` timestamp contract and
//! the error taxonomy shared by the query layer in `cdr-data`.

pub mod error;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{CdrError, Result};
pub use models::{CallRecord, CallType, InternationalRecord, Record, RecordKey};
