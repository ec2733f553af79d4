//! Named volumes and the mounts they become.

use serde::{Deserialize, Serialize};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A named volume requested for a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Name of the engine volume.
    pub name: String,

    /// Path inside the container where the volume is mounted.
    pub mount_point: String,
}

/// The kind of a mount handed to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountKind {
    /// An engine-managed named volume.
    #[default]
    Volume,
}

/// A mount as handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountSpec {
    /// The mount kind.
    pub kind: MountKind,

    /// The mount source, the volume name for [`MountKind::Volume`].
    pub source: String,

    /// Path inside the container.
    pub target: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Volume {
    /// Creates a new volume request.
    pub fn new(name: impl Into<String>, mount_point: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mount_point: mount_point.into(),
        }
    }
}

impl MountKind {
    /// Returns the engine's name for this mount kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Volume => "volume",
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<&Volume> for MountSpec {
    fn from(volume: &Volume) -> Self {
        Self {
            kind: MountKind::Volume,
            source: volume.name.clone(),
            target: volume.mount_point.clone(),
        }
    }
}
