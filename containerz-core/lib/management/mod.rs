//! Resolution, validation and orchestration of container start requests.
//!
//! A start request flows through this module in a fixed order:
//! - [`image`] resolves the requested `image:tag` against the engine's images
//! - [`conflict`] rejects instance names and host ports already taken by running containers
//! - [`start`] builds the engine-facing [`StartConfig`]
//! - [`manager`] sequences the above and issues the engine's create and start calls

pub mod conflict;
pub mod image;
pub mod manager;
pub mod start;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use manager::*;
pub use start::*;
