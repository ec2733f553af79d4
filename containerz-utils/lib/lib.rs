//! `containerz_utils` is a library containing general utilities for the containerz project.

#![warn(missing_docs)]

mod error;

pub mod env;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use env::*;
pub use error::*;
