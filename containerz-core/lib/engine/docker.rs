//! [`ContainerEngine`] implementation for a Docker daemon, backed by `bollard`.

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::{
    container::{
        Config, CreateContainerOptions, ListContainersOptions, RemoveContainerOptions,
        StartContainerOptions,
    },
    image::ListImagesOptions,
    models::{
        DeviceMapping, HostConfig, Mount, MountTypeEnum, PortBinding, RestartPolicy,
        RestartPolicyNameEnum,
    },
    Docker,
};

use crate::{
    config::{MountKind, RestartPolicyKind},
    management::{StartConfig, HOST_NETWORK},
};

use super::{
    ContainerEngine, ContainerSummary, CreateContainerRequest, CreatedContainer, EngineError,
    EngineResult, ImageSummary, PortSummary,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A Docker daemon reached through its local socket.
#[derive(Debug, Clone)]
pub struct DockerEngine {
    docker: Docker,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl DockerEngine {
    /// Connects to the local Docker daemon using the platform's default socket.
    pub fn connect() -> EngineResult<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| EngineError::with_source("failed to connect to docker", e))?;

        Ok(Self { docker })
    }

    /// Wraps an existing `bollard` client.
    pub fn from_client(docker: Docker) -> Self {
        Self { docker }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl ContainerEngine for DockerEngine {
    async fn list_images(&self) -> EngineResult<Vec<ImageSummary>> {
        let images = self
            .docker
            .list_images(Some(ListImagesOptions::<String>::default()))
            .await
            .map_err(|e| EngineError::with_source("docker image list failed", e))?;

        Ok(images
            .into_iter()
            .map(|image| ImageSummary {
                id: image.id,
                repo_tags: image.repo_tags,
            })
            .collect())
    }

    async fn list_containers(&self) -> EngineResult<Vec<ContainerSummary>> {
        let containers = self
            .docker
            .list_containers(Some(ListContainersOptions::<String>::default()))
            .await
            .map_err(|e| EngineError::with_source("docker container list failed", e))?;

        Ok(containers
            .into_iter()
            .map(|container| ContainerSummary {
                id: container.id.unwrap_or_default(),
                names: container.names.unwrap_or_default(),
                ports: container
                    .ports
                    .unwrap_or_default()
                    .into_iter()
                    .map(|port| PortSummary {
                        private_port: port.private_port,
                        public_port: port.public_port,
                    })
                    .collect(),
            })
            .collect())
    }

    async fn create_container(
        &self,
        request: &CreateContainerRequest,
    ) -> EngineResult<CreatedContainer> {
        let options = CreateContainerOptions {
            name: request.name.clone().unwrap_or_default(),
            platform: request.platform.clone(),
        };

        let response = self
            .docker
            .create_container(Some(options), to_docker_config(&request.image, &request.config))
            .await
            .map_err(|e| EngineError::with_source("docker container create failed", e))?;

        Ok(CreatedContainer {
            id: response.id,
            warnings: response.warnings,
        })
    }

    async fn start_container(&self, id: &str) -> EngineResult<()> {
        self.docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await
            .map_err(|e| EngineError::with_source("docker container start failed", e))
    }

    async fn remove_container(&self, id: &str) -> EngineResult<()> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };

        self.docker
            .remove_container(id, Some(options))
            .await
            .map_err(|e| EngineError::with_source("docker container remove failed", e))
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Translates a start configuration into Docker's create payload.
///
/// Empty collections are sent as absent fields. An unset network mode is sent as `host`.
fn to_docker_config(image: &str, config: &StartConfig) -> Config<String> {
    let resources = config.get_resources();

    let host_config = HostConfig {
        port_bindings: non_empty_map(
            config
                .get_port_bindings()
                .iter()
                .map(|(container_port, host_ports)| {
                    let bindings = host_ports
                        .iter()
                        .map(|host_port| PortBinding {
                            host_ip: None,
                            host_port: Some(host_port.to_string()),
                        })
                        .collect();
                    (container_port.clone(), Some(bindings))
                })
                .collect::<HashMap<_, _>>(),
        ),
        mounts: non_empty(
            config
                .get_mounts()
                .iter()
                .map(|mount| Mount {
                    typ: Some(match mount.kind {
                        MountKind::Volume => MountTypeEnum::VOLUME,
                    }),
                    source: Some(mount.source.clone()),
                    target: Some(mount.target.clone()),
                    ..Default::default()
                })
                .collect::<Vec<_>>(),
        ),
        devices: non_empty(
            config
                .get_devices()
                .iter()
                .map(|device| DeviceMapping {
                    path_on_host: Some(device.path_on_host.clone()),
                    path_in_container: Some(device.path_in_container.clone()),
                    cgroup_permissions: Some(device.cgroup_permissions.clone()),
                })
                .collect::<Vec<_>>(),
        ),
        restart_policy: config.get_restart_policy().map(|policy| RestartPolicy {
            name: Some(match policy.kind {
                RestartPolicyKind::No => RestartPolicyNameEnum::NO,
                RestartPolicyKind::Always => RestartPolicyNameEnum::ALWAYS,
                RestartPolicyKind::OnFailure => RestartPolicyNameEnum::ON_FAILURE,
                RestartPolicyKind::UnlessStopped => RestartPolicyNameEnum::UNLESS_STOPPED,
            }),
            maximum_retry_count: Some(policy.max_retries),
        }),
        cap_add: non_empty(config.get_cap_add().clone()),
        cap_drop: non_empty(config.get_cap_drop().clone()),
        network_mode: Some(
            config
                .get_network_mode()
                .clone()
                .unwrap_or_else(|| HOST_NETWORK.to_string()),
        ),
        nano_cpus: non_zero(*resources.get_nano_cpus()),
        memory: non_zero(*resources.get_memory()),
        memory_reservation: non_zero(*resources.get_memory_reservation()),
        ..Default::default()
    };

    Config {
        image: Some(image.to_string()),
        cmd: non_empty(config.get_argv().clone()),
        env: non_empty(config.get_env().clone()),
        user: Some(config.get_user().clone()).filter(|user| !user.is_empty()),
        labels: non_empty_map(
            config
                .get_labels()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<HashMap<_, _>>(),
        ),
        exposed_ports: non_empty_map(
            config
                .get_exposed_ports()
                .iter()
                .map(|port| (port.clone(), HashMap::new()))
                .collect::<HashMap<_, _>>(),
        ),
        host_config: Some(host_config),
        ..Default::default()
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

fn non_empty_map<K, V>(map: HashMap<K, V>) -> Option<HashMap<K, V>> {
    (!map.is_empty()).then_some(map)
}

fn non_zero(value: i64) -> Option<i64> {
    (value != 0).then_some(value)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
