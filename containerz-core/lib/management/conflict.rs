//! Conflict validation against running containers.
//!
//! All checks run before the engine is asked to create anything, so a rejected request leaves
//! no engine state behind. Checks run in a fixed order: instance name, host ports, run-as.

use crate::{
    config::StartOptions, engine::ContainerSummary, ContainerzError, ContainerzResult,
};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Validates `options` against the currently `running` containers.
///
/// ## Errors
///
/// - [`ContainerzError::InstanceNameInUse`] if a running container already has the instance name
/// - [`ContainerzError::PortInUse`] for the lowest requested host port a running container publishes
/// - [`ContainerzError::EmptyRunAsUser`] if a run-as identity has no user
pub fn validate(options: &StartOptions, running: &[ContainerSummary]) -> ContainerzResult<()> {
    if let Some(name) = options.get_instance_name() {
        check_instance_name(name, running)?;
    }

    check_host_ports(options.host_ports(), running)?;

    if let Some(run_as) = options.get_run_as() {
        run_as.validate()?;
    }

    Ok(())
}

/// Fails if any running container is named `name`.
pub fn check_instance_name(name: &str, running: &[ContainerSummary]) -> ContainerzResult<()> {
    if running.iter().any(|container| container.has_name(name)) {
        tracing::debug!("instance name {} is taken", name);
        return Err(ContainerzError::InstanceNameInUse(name.to_string()));
    }

    Ok(())
}

/// Fails on the first of `host_ports` that a running container publishes.
///
/// Ports are checked in the order given.
pub fn check_host_ports(
    host_ports: impl IntoIterator<Item = u32>,
    running: &[ContainerSummary],
) -> ContainerzResult<()> {
    for port in host_ports {
        if running
            .iter()
            .any(|container| container.publishes_host_port(port))
        {
            tracing::debug!("host port {} is taken", port);
            return Err(ContainerzError::PortInUse(port));
        }
    }

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
