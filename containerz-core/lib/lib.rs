//! `containerz` turns declarative container start requests into fully resolved engine calls.
//!
//! # Overview
//!
//! A start request names an image, a tag, a free-form command line and a set of optional
//! modifiers. Before anything reaches the container engine, containerz:
//! - Resolves the requested `image:tag` against the images the engine knows about
//! - Rejects instance names and host ports that collide with running containers
//! - Splits the command line into an argument vector
//! - Converts every modifier into the exact primitive the engine expects
//!
//! Only then are the engine's create and start calls issued.
//!
//! # Modules
//!
//! - [`config`] - Start options, restart policies, devices, volumes and manager configuration
//! - [`engine`] - The container engine seam and its adapters
//! - [`management`] - Image resolution, conflict validation, start configuration and orchestration
//! - [`utils`] - Command line tokenization

#![warn(missing_docs)]

mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod config;
pub mod engine;
pub mod management;
pub mod utils;

pub use error::*;
