//! The container engine seam.
//!
//! The engine owns image storage, process isolation and networking. This crate only reads the
//! engine's image and container lists and asks it to create and start containers, all through the
//! [`ContainerEngine`] trait so any engine, or a fake one in tests, can be plugged in.

mod types;

#[cfg(feature = "docker")]
mod docker;

use std::error::Error as StdError;

use async_trait::async_trait;
use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use types::*;

#[cfg(feature = "docker")]
pub use docker::*;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of an engine call.
pub type EngineResult<T> = Result<T, EngineError>;

/// A failure reported by a container engine.
///
/// Adapters convert their engine library's errors into this type so those types never reach
/// callers of this crate.
#[derive(pretty_error_debug::Debug, Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,

    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

/// The operations this crate needs from a container engine.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Lists the images known to the engine.
    async fn list_images(&self) -> EngineResult<Vec<ImageSummary>>;

    /// Lists the currently running containers.
    async fn list_containers(&self) -> EngineResult<Vec<ContainerSummary>>;

    /// Creates a container. The engine generates a name when the request carries none.
    async fn create_container(
        &self,
        request: &CreateContainerRequest,
    ) -> EngineResult<CreatedContainer>;

    /// Starts a previously created container.
    async fn start_container(&self, id: &str) -> EngineResult<()>;

    /// Removes a container, stopping it first if needed.
    async fn remove_container(&self, id: &str) -> EngineResult<()>;
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl EngineError {
    /// Creates an engine error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an engine error that keeps the underlying engine failure as its source.
    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
