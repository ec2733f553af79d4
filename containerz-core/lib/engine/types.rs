use serde::{Deserialize, Serialize};

use crate::management::StartConfig;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// An image known to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    /// Engine identifier of the image.
    pub id: String,

    /// The `repository:tag` references pointing at the image.
    pub repo_tags: Vec<String>,
}

/// A running container as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    /// Engine identifier of the container.
    pub id: String,

    /// Container names, each prefixed with `/`.
    pub names: Vec<String>,

    /// Ports exposed by the container.
    pub ports: Vec<PortSummary>,
}

/// A port exposed by a running container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSummary {
    /// Port inside the container.
    pub private_port: u16,

    /// Host port the container port is published on, if any.
    pub public_port: Option<u16>,
}

/// Everything the engine needs to create a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContainerRequest {
    /// The `image:tag` reference to create the container from.
    pub image: String,

    /// The requested container name. The engine generates one when `None`.
    pub name: Option<String>,

    /// The target platform, e.g. `linux/amd64`.
    pub platform: Option<String>,

    /// The resolved start configuration.
    pub config: StartConfig,
}

/// The engine's answer to a create call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedContainer {
    /// Engine identifier of the new container.
    pub id: String,

    /// Non-fatal warnings raised while creating the container.
    pub warnings: Vec<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ImageSummary {
    /// Returns true if `reference` is one of this image's repository tags.
    pub fn has_repo_tag(&self, reference: &str) -> bool {
        self.repo_tags.iter().any(|tag| tag == reference)
    }
}

impl ContainerSummary {
    /// Returns true if the container is known under `name`.
    pub fn has_name(&self, name: &str) -> bool {
        self.names
            .iter()
            .any(|n| n.strip_prefix('/') == Some(name))
    }

    /// Returns true if the container publishes `host_port` on the host.
    pub fn publishes_host_port(&self, host_port: u32) -> bool {
        self.ports
            .iter()
            .any(|port| port.public_port.map(u32::from) == Some(host_port))
    }
}
