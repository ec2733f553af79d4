//! Start options and the option set they accumulate into.
//!
//! Every modifier a caller can attach to a start request is a [`ContainerOption`] variant.
//! Variants are applied in order onto a [`StartOptions`] value, each writing the single field it
//! owns. No two variants share a field, so application order does not change the result except
//! when the same variant is given twice, in which case the later one wins.

use std::collections::BTreeMap;

use getset::Getters;
use serde::{Deserialize, Serialize};

use super::{Device, RestartPolicy, RestartPolicyKind, RunAs, Volume};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A single optional modifier of a start request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerOption {
    /// The name the container is created under. An empty name leaves naming to the engine.
    InstanceName(String),

    /// The identity the containerized process runs as.
    RunAs(RunAs),

    /// The engine restart policy.
    RestartPolicy(RestartPolicy),

    /// Linux capabilities to add and to drop.
    Capabilities {
        /// Capabilities to add.
        add: Vec<String>,

        /// Capabilities to drop.
        remove: Vec<String>,
    },

    /// The network the container joins.
    Network(String),

    /// Container labels.
    Labels(BTreeMap<String, String>),

    /// Environment variables.
    Env(BTreeMap<String, String>),

    /// Port mappings from host port to container port.
    Ports(BTreeMap<u32, u32>),

    /// Named volumes to mount.
    Volumes(Vec<Volume>),

    /// Host devices to expose.
    Devices(Vec<Device>),

    /// CPU limit in whole or fractional cores.
    Cpus(f64),

    /// Soft memory limit in bytes.
    SoftMemoryLimit(i64),

    /// Hard memory limit in bytes.
    HardMemoryLimit(i64),
}

/// The set of options attached to one start request.
///
/// Fields left as `None` were not requested and contribute nothing to the start configuration.
#[derive(Debug, Clone, Default, PartialEq, Getters, Serialize, Deserialize)]
#[getset(get = "pub with_prefix")]
pub struct StartOptions {
    /// The name the container is created under.
    instance_name: Option<String>,

    /// The identity the containerized process runs as.
    run_as: Option<RunAs>,

    /// The engine restart policy.
    restart_policy: Option<RestartPolicy>,

    /// Capabilities to add.
    cap_add: Option<Vec<String>>,

    /// Capabilities to drop.
    cap_drop: Option<Vec<String>>,

    /// The network the container joins.
    network: Option<String>,

    /// Container labels.
    labels: Option<BTreeMap<String, String>>,

    /// Environment variables.
    env: Option<BTreeMap<String, String>>,

    /// Port mappings from host port to container port, ordered by host port.
    ports: Option<BTreeMap<u32, u32>>,

    /// Named volumes to mount.
    volumes: Option<Vec<Volume>>,

    /// Host devices to expose.
    devices: Option<Vec<Device>>,

    /// CPU limit in cores.
    cpus: Option<f64>,

    /// Soft memory limit in bytes.
    soft_memory_limit: Option<i64>,

    /// Hard memory limit in bytes.
    hard_memory_limit: Option<i64>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ContainerOption {
    /// Sets the instance name.
    pub fn instance_name(name: impl Into<String>) -> Self {
        Self::InstanceName(name.into())
    }

    /// Sets the run-as identity.
    pub fn run_as(run_as: RunAs) -> Self {
        Self::RunAs(run_as)
    }

    /// Sets the restart policy.
    pub fn restart_policy(kind: RestartPolicyKind, max_retries: i64) -> Self {
        Self::RestartPolicy(RestartPolicy::new(kind, max_retries))
    }

    /// Sets the capabilities to add and drop.
    pub fn capabilities<A, R>(add: A, remove: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self::Capabilities {
            add: add.into_iter().map(Into::into).collect(),
            remove: remove.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the network.
    pub fn network(name: impl Into<String>) -> Self {
        Self::Network(name.into())
    }

    /// Sets the labels.
    pub fn labels<K, V>(labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Labels(
            labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Sets the environment variables.
    pub fn env<K, V>(env: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Env(env.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Sets the host-to-container port mappings.
    pub fn ports(ports: impl IntoIterator<Item = (u32, u32)>) -> Self {
        Self::Ports(ports.into_iter().collect())
    }

    /// Sets the volumes.
    pub fn volumes(volumes: impl IntoIterator<Item = Volume>) -> Self {
        Self::Volumes(volumes.into_iter().collect())
    }

    /// Sets the devices.
    pub fn devices(devices: impl IntoIterator<Item = Device>) -> Self {
        Self::Devices(devices.into_iter().collect())
    }

    /// Sets the CPU limit in cores.
    pub fn cpus(cpus: f64) -> Self {
        Self::Cpus(cpus)
    }

    /// Sets the soft memory limit in bytes.
    pub fn soft_memory_limit(bytes: i64) -> Self {
        Self::SoftMemoryLimit(bytes)
    }

    /// Sets the hard memory limit in bytes.
    pub fn hard_memory_limit(bytes: i64) -> Self {
        Self::HardMemoryLimit(bytes)
    }

    /// Writes this option into the field of `options` it owns.
    pub fn apply(self, options: &mut StartOptions) {
        match self {
            Self::InstanceName(name) => {
                options.instance_name = Some(name).filter(|name| !name.is_empty())
            }
            Self::RunAs(run_as) => options.run_as = Some(run_as),
            Self::RestartPolicy(policy) => options.restart_policy = Some(policy),
            Self::Capabilities { add, remove } => {
                options.cap_add = Some(add);
                options.cap_drop = Some(remove);
            }
            Self::Network(name) => options.network = Some(name),
            Self::Labels(labels) => options.labels = Some(labels),
            Self::Env(env) => options.env = Some(env),
            Self::Ports(ports) => options.ports = Some(ports),
            Self::Volumes(volumes) => options.volumes = Some(volumes),
            Self::Devices(devices) => options.devices = Some(devices),
            Self::Cpus(cpus) => options.cpus = Some(cpus),
            Self::SoftMemoryLimit(bytes) => options.soft_memory_limit = Some(bytes),
            Self::HardMemoryLimit(bytes) => options.hard_memory_limit = Some(bytes),
        }
    }
}

impl StartOptions {
    /// Builds an option set by applying `options` in order.
    pub fn new(options: impl IntoIterator<Item = ContainerOption>) -> Self {
        options.into_iter().collect()
    }

    /// Returns the requested host ports in ascending order.
    pub fn host_ports(&self) -> impl Iterator<Item = u32> + '_ {
        self.ports.iter().flat_map(|ports| ports.keys().copied())
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FromIterator<ContainerOption> for StartOptions {
    fn from_iter<I: IntoIterator<Item = ContainerOption>>(iter: I) -> Self {
        let mut options = Self::default();
        for option in iter {
            option.apply(&mut options);
        }
        options
    }
}

impl Extend<ContainerOption> for StartOptions {
    fn extend<I: IntoIterator<Item = ContainerOption>>(&mut self, iter: I) {
        for option in iter {
            option.apply(self);
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
