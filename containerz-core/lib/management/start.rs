//! The engine-facing start configuration and the step that builds it.
//!
//! [`StartConfig::build`] turns a command line and a [`StartOptions`] set into the exact
//! primitives the engine's create call expects. Every conversion is deterministic: maps are
//! ordered, so two builds from equal inputs are equal.

use std::collections::{BTreeMap, BTreeSet};

use getset::Getters;
use serde::{Deserialize, Serialize};

use crate::{
    config::{DeviceMapping, MountSpec, RestartPolicy, StartOptions},
    utils, ContainerzError, ContainerzResult,
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Protocol suffix given to every exposed container port.
pub const DEFAULT_PORT_PROTOCOL: &str = "tcp";

/// Network name that stands for the engine's implicit default network mode.
pub const HOST_NETWORK: &str = "host";

/// Number of nanoCPUs in one core.
pub const NANO_CPUS_PER_CPU: f64 = 1_000_000_000.0;

/// Highest valid port number.
const MAX_PORT: u32 = u16::MAX as u32;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A fully resolved description of the container to create.
///
/// Built once per start request, handed to the engine and then dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[getset(get = "pub with_prefix")]
pub struct StartConfig {
    /// The tokenized command.
    argv: Vec<String>,

    /// Environment as `KEY=VALUE` entries, ordered by key.
    env: Vec<String>,

    /// Exposed container ports as `port/proto`.
    exposed_ports: BTreeSet<String>,

    /// Host ports bound to each exposed `port/proto`.
    port_bindings: BTreeMap<String, Vec<u16>>,

    /// Mounts in request order.
    mounts: Vec<MountSpec>,

    /// Device mappings in request order.
    devices: Vec<DeviceMapping>,

    /// `user`, `user:group`, or empty for the image default.
    user: String,

    /// Restart policy, or `None` for the engine default.
    restart_policy: Option<RestartPolicy>,

    /// Capabilities to add.
    cap_add: Vec<String>,

    /// Capabilities to drop.
    cap_drop: Vec<String>,

    /// Explicit network mode, or `None` for the engine default.
    network_mode: Option<String>,

    /// Container labels.
    labels: BTreeMap<String, String>,

    /// Resource limits.
    resources: Resources,
}

/// Resource limits handed to the engine. Zero means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[getset(get = "pub with_prefix")]
pub struct Resources {
    /// CPU quota in units of 10<sup>-9</sup> CPUs.
    nano_cpus: i64,

    /// Hard memory limit in bytes.
    memory: i64,

    /// Soft memory limit in bytes.
    memory_reservation: i64,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl StartConfig {
    /// Builds the start configuration for `command` and `options`.
    ///
    /// An empty command and an empty option set produce [`StartConfig::default`].
    ///
    /// ## Errors
    ///
    /// - [`ContainerzError::EmptyRunAsUser`] if a run-as identity has no user
    /// - [`ContainerzError::InvalidArgument`] if the command cannot be tokenized, a port is out
    ///   of range, or the CPU count is negative or not finite
    pub fn build(command: &str, options: &StartOptions) -> ContainerzResult<Self> {
        let mut config = Self {
            argv: utils::tokenize(command)?,
            ..Default::default()
        };

        if let Some(ports) = options.get_ports() {
            for (&host_port, &container_port) in ports {
                let host_port = checked_port("host", host_port)?;
                let container_port = checked_port("container", container_port)?;
                let key = format!("{}/{}", container_port, DEFAULT_PORT_PROTOCOL);

                config.exposed_ports.insert(key.clone());
                config.port_bindings.entry(key).or_default().push(host_port);
            }
        }

        if let Some(env) = options.get_env() {
            config.env = env.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        }

        if let Some(run_as) = options.get_run_as() {
            config.user = run_as.to_user_spec()?;
        }

        config.restart_policy = *options.get_restart_policy();

        if let Some(cap_add) = options.get_cap_add() {
            config.cap_add = cap_add.clone();
        }

        if let Some(cap_drop) = options.get_cap_drop() {
            config.cap_drop = cap_drop.clone();
        }

        config.network_mode = options
            .get_network()
            .as_deref()
            .filter(|name| !name.is_empty() && *name != HOST_NETWORK)
            .map(str::to_string);

        if let Some(labels) = options.get_labels() {
            config.labels = labels.clone();
        }

        if let Some(volumes) = options.get_volumes() {
            config.mounts = volumes.iter().map(MountSpec::from).collect();
        }

        if let Some(devices) = options.get_devices() {
            config.devices = devices.iter().map(DeviceMapping::from).collect();
        }

        if let Some(cpus) = *options.get_cpus() {
            config.resources.nano_cpus = nano_cpus(cpus)?;
        }

        if let Some(bytes) = *options.get_soft_memory_limit() {
            config.resources.memory_reservation = bytes;
        }

        if let Some(bytes) = *options.get_hard_memory_limit() {
            config.resources.memory = bytes;
        }

        Ok(config)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Converts a core count into a nanoCPU quota, rounding to the nearest nanoCPU.
pub fn nano_cpus(cpus: f64) -> ContainerzResult<i64> {
    if !cpus.is_finite() || cpus < 0.0 {
        return Err(ContainerzError::InvalidArgument(format!(
            "cpu count must be a non-negative number, got {}",
            cpus
        )));
    }

    let nanos = (cpus * NANO_CPUS_PER_CPU).round();
    if nanos >= i64::MAX as f64 {
        return Err(ContainerzError::InvalidArgument(format!(
            "cpu count {} is too large",
            cpus
        )));
    }

    Ok(nanos as i64)
}

fn checked_port(side: &str, port: u32) -> ContainerzResult<u16> {
    if port == 0 || port > MAX_PORT {
        return Err(ContainerzError::InvalidArgument(format!(
            "{} port {} is outside 1-{}",
            side, port, MAX_PORT
        )));
    }

    Ok(port as u16)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
