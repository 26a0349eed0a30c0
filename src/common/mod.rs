//! Shared error handling.

pub mod error;
pub mod result;

pub use error::{CohoError, EXIT_FATAL, EXIT_USAGE};
pub use result::{CohoResult, OptionExt, ResultExt};
