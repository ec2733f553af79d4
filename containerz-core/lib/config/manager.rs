//! Container manager configuration.
//!
//! Values come from [`ManagerConfig::builder`] or from `CONTAINERZ_*` environment variables.

use std::time::Duration;

use containerz_utils::{
    env, CLEANUP_ON_START_FAILURE_ENV_VAR, PLATFORM_ENV_VAR, READ_TIMEOUT_SECS_ENV_VAR,
};
use getset::Getters;
use typed_builder::TypedBuilder;

use crate::ContainerzResult;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Settings that shape how a container manager talks to the engine.
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use containerz_core::config::ManagerConfig;
///
/// let config = ManagerConfig::builder()
///     .read_timeout(Duration::from_secs(5))
///     .cleanup_on_start_failure(true)
///     .build();
///
/// assert_eq!(*config.get_read_timeout(), Some(Duration::from_secs(5)));
/// assert!(config.get_platform().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, TypedBuilder)]
#[getset(get = "pub with_prefix")]
pub struct ManagerConfig {
    /// Deadline applied to each engine read call. Create and start are never bounded.
    #[builder(default, setter(strip_option))]
    read_timeout: Option<Duration>,

    /// Whether a container that was created but failed to start is removed again.
    #[builder(default)]
    cleanup_on_start_failure: bool,

    /// Platform forwarded to the engine on create, e.g. `linux/amd64`.
    #[builder(default, setter(strip_option, into))]
    platform: Option<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ManagerConfig {
    /// Loads the configuration from `CONTAINERZ_*` environment variables.
    ///
    /// Unset variables fall back to the defaults of [`ManagerConfig::default`].
    pub fn from_env() -> ContainerzResult<Self> {
        let read_timeout = env::get_env_duration_secs(READ_TIMEOUT_SECS_ENV_VAR)?;
        let cleanup_on_start_failure =
            env::get_env_bool(CLEANUP_ON_START_FAILURE_ENV_VAR)?.unwrap_or(false);
        let platform = env::get_env_string(PLATFORM_ENV_VAR);

        tracing::debug!(
            ?read_timeout,
            cleanup_on_start_failure,
            ?platform,
            "loaded manager configuration from environment"
        );

        Ok(Self {
            read_timeout,
            cleanup_on_start_failure,
            platform,
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
