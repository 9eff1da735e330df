//! Core error types and constants shared by the `tripwire` crates.
//!
//! ## Key Components
//!
//! - **`errors`**: The workspace `Error` enum and `Result` alias. Configuration
//!   problems and failures captured from protected code both live here so
//!   callers match on a single type.
//! - **`constants`**: Environment variable names and configuration defaults.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{BoxError, Error, Result, ResultExt},
};
