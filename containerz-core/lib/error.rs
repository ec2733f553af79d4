use std::time::Duration;

use containerz_utils::ContainerzUtilsError;
use thiserror::Error;

use crate::engine::EngineError;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a containerz-related operation.
pub type ContainerzResult<T> = Result<T, ContainerzError>;

/// An error that occurred while translating or executing a container start request.
#[derive(pretty_error_debug::Debug, Error)]
pub enum ContainerzError {
    /// No known image carries the requested repository tag.
    #[error("image {image}:{tag} not found")]
    ImageNotFound {
        /// The requested image name.
        image: String,

        /// The requested tag.
        tag: String,
    },

    /// The requested instance name is already used by a running container.
    #[error("instance name {0} already in use")]
    InstanceNameInUse(String),

    /// The requested host port is already published by a running container.
    #[error("port {0} already in use")]
    PortInUse(u32),

    /// A run-as identity was requested without a user.
    #[error("user can not be empty in RunAs option")]
    EmptyRunAsUser,

    /// A request value cannot be translated into an engine primitive.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An engine call did not complete within the configured deadline.
    #[error("{operation} did not complete within {timeout:?}")]
    Timeout {
        /// The engine operation that timed out.
        operation: &'static str,

        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// The container engine reported a failure.
    #[error("{operation} failed: {source}")]
    Engine {
        /// The engine operation that failed.
        operation: &'static str,

        /// The failure reported by the engine.
        #[source]
        source: EngineError,
    },

    /// A configuration value could not be loaded.
    #[error(transparent)]
    Utils(#[from] ContainerzUtilsError),
}

/// The caller-facing classification of a [`ContainerzError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested image does not exist.
    NotFound,

    /// The requested instance name is taken.
    AlreadyExists,

    /// A requested resource, such as a host port, is taken.
    Unavailable,

    /// The request is well-formed but cannot be honored as stated.
    FailedPrecondition,

    /// A request value is malformed.
    InvalidArgument,

    /// A deadline expired before the engine answered.
    DeadlineExceeded,

    /// The engine failed.
    Internal,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ContainerzError {
    /// Wraps an engine failure with the name of the operation that produced it.
    pub fn engine(operation: &'static str, source: EngineError) -> Self {
        Self::Engine { operation, source }
    }

    /// Returns the caller-facing classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ImageNotFound { .. } => ErrorKind::NotFound,
            Self::InstanceNameInUse(_) => ErrorKind::AlreadyExists,
            Self::PortInUse(_) => ErrorKind::Unavailable,
            Self::EmptyRunAsUser => ErrorKind::FailedPrecondition,
            Self::InvalidArgument(_) | Self::Utils(_) => ErrorKind::InvalidArgument,
            Self::Timeout { .. } => ErrorKind::DeadlineExceeded,
            Self::Engine { .. } => ErrorKind::Internal,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
