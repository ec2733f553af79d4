//! Host devices exposed to a container and their cgroup permission strings.

use serde::{Deserialize, Serialize};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// An access right granted on a host device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePermission {
    /// Read access.
    Read,

    /// Write access.
    Write,

    /// Permission to create device nodes.
    Mknod,
}

/// A host device requested for a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Path of the device on the host.
    pub src_path: String,

    /// Path of the device inside the container.
    pub dst_path: String,

    /// Access rights granted on the device.
    pub permissions: Vec<DevicePermission>,
}

/// A device mapping as handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMapping {
    /// Path of the device on the host.
    pub path_on_host: String,

    /// Path of the device inside the container.
    pub path_in_container: String,

    /// Cgroup permission string, a subset of `rwm` in that order.
    pub cgroup_permissions: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl DevicePermission {
    /// Returns the cgroup letter for this permission.
    pub fn as_char(&self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
            Self::Mknod => 'm',
        }
    }
}

impl Device {
    /// Creates a new device request.
    pub fn new(
        src_path: impl Into<String>,
        dst_path: impl Into<String>,
        permissions: impl IntoIterator<Item = DevicePermission>,
    ) -> Self {
        Self {
            src_path: src_path.into(),
            dst_path: dst_path.into(),
            permissions: permissions.into_iter().collect(),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Renders a set of device permissions as a cgroup permission string.
///
/// Letters always appear in `r`, `w`, `m` order, each at most once, regardless of
/// the order or repetition of `permissions`.
pub fn cgroup_permissions(permissions: &[DevicePermission]) -> String {
    [
        DevicePermission::Read,
        DevicePermission::Write,
        DevicePermission::Mknod,
    ]
    .into_iter()
    .filter(|permission| permissions.contains(permission))
    .map(|permission| permission.as_char())
    .collect()
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<&Device> for DeviceMapping {
    fn from(device: &Device) -> Self {
        Self {
            path_on_host: device.src_path.clone(),
            path_in_container: device.dst_path.clone(),
            cgroup_permissions: cgroup_permissions(&device.permissions),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
