//! Utility functions for working with environment variables.

use std::time::Duration;

use crate::{ContainerzUtilsError, ContainerzUtilsResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Environment variable for the deadline, in seconds, applied to engine read calls
pub const READ_TIMEOUT_SECS_ENV_VAR: &str = "CONTAINERZ_READ_TIMEOUT_SECS";

/// Environment variable that enables removal of containers whose start failed
pub const CLEANUP_ON_START_FAILURE_ENV_VAR: &str = "CONTAINERZ_CLEANUP_ON_START_FAILURE";

/// Environment variable for the platform forwarded to the engine on create
pub const PLATFORM_ENV_VAR: &str = "CONTAINERZ_PLATFORM";

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the value of the environment variable `name`, or `None` if it is unset or empty.
pub fn get_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Returns the value of the environment variable `name` interpreted as a whole number of seconds.
///
/// Returns `Ok(None)` if the variable is unset or empty.
pub fn get_env_duration_secs(name: &str) -> ContainerzUtilsResult<Option<Duration>> {
    let Some(value) = get_env_string(name) else {
        return Ok(None);
    };

    value
        .trim()
        .parse::<u64>()
        .map(|secs| Some(Duration::from_secs(secs)))
        .map_err(|e| ContainerzUtilsError::InvalidEnvValue {
            name: name.to_string(),
            value,
            reason: e.to_string(),
        })
}

/// Returns the value of the environment variable `name` interpreted as a boolean flag.
///
/// Accepts `1`/`0`, `true`/`false`, `yes`/`no` and `on`/`off` in any case.
/// Returns `Ok(None)` if the variable is unset or empty.
pub fn get_env_bool(name: &str) -> ContainerzUtilsResult<Option<bool>> {
    let Some(value) = get_env_string(name) else {
        return Ok(None);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ContainerzUtilsError::InvalidEnvValue {
            name: name.to_string(),
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
