//! Errors raised by containerz-utils.

use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a containerz-utils related operation.
pub type ContainerzUtilsResult<T> = Result<T, ContainerzUtilsError>;

/// An error that occurred in a containerz-utils operation.
#[derive(pretty_error_debug::Debug, Error)]
pub enum ContainerzUtilsError {
    /// An environment variable holds a value that cannot be parsed.
    #[error("invalid value '{value}' for environment variable {name}: {reason}")]
    InvalidEnvValue {
        /// The name of the environment variable.
        name: String,

        /// The raw value that failed to parse.
        value: String,

        /// Why the value was rejected.
        reason: String,
    },
}
