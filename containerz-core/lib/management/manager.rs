//! Start orchestration.
//!
//! [`ContainerManager`] drives a start request end to end:
//! 1. read the engine's images and running containers, concurrently
//! 2. resolve the image, then validate name, ports and run-as against the running containers
//! 3. build the [`StartConfig`]
//! 4. ask the engine to create the container, then to start it
//!
//! Steps 1 to 3 never mutate the engine, so any failure there leaves no trace. Nothing is
//! retried. Create and start run on their own task: if the caller stops waiting, an in-flight
//! create still completes and is logged rather than silently abandoned.

use std::{future::Future, sync::Arc};

use getset::Getters;
use serde::{Deserialize, Serialize};

use crate::{
    config::{ContainerOption, ManagerConfig, StartOptions},
    engine::{ContainerEngine, CreateContainerRequest, EngineError},
    ContainerzError, ContainerzResult,
};

use super::{conflict, image as images, StartConfig};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Name of the engine image listing operation, used in errors and logs.
pub const LIST_IMAGES: &str = "list images";

/// Name of the engine container listing operation, used in errors and logs.
pub const LIST_CONTAINERS: &str = "list containers";

/// Name of the engine create operation, used in errors and logs.
pub const CREATE_CONTAINER: &str = "create container";

/// Name of the engine start operation, used in errors and logs.
pub const START_CONTAINER: &str = "start container";

/// Name of the engine remove operation, used in errors and logs.
pub const REMOVE_CONTAINER: &str = "remove container";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A request to start a container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartRequest {
    /// The image name.
    pub image: String,

    /// The image tag.
    pub tag: String,

    /// The command line to run. Empty keeps the image default.
    #[serde(default)]
    pub command: String,

    /// Optional modifiers, applied in order.
    #[serde(default)]
    pub options: Vec<ContainerOption>,
}

/// Turns start requests into engine create and start calls.
///
/// The engine is injected, so a manager can be driven by any [`ContainerEngine`], including a
/// fake one in tests. A manager holds no per-request state and can serve concurrent requests.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use containerz_core::{
///     config::{ContainerOption, ManagerConfig},
///     engine::ContainerEngine,
///     management::ContainerManager,
/// };
///
/// # async fn example(engine: Arc<dyn ContainerEngine>) -> anyhow::Result<()> {
/// let manager = ContainerManager::new(engine, ManagerConfig::default());
/// let id = manager
///     .start_container(
///         "alpine",
///         "3.20",
///         r#"sh -c "echo hello""#,
///         [
///             ContainerOption::instance_name("hello"),
///             ContainerOption::ports([(8080, 80)]),
///         ],
///     )
///     .await?;
/// println!("started {}", id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Getters)]
#[getset(get = "pub with_prefix")]
pub struct ContainerManager<E: ?Sized> {
    /// The engine this manager drives.
    engine: Arc<E>,

    /// The manager configuration.
    config: ManagerConfig,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl StartRequest {
    /// Creates a request with no options.
    pub fn new(image: impl Into<String>, tag: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            tag: tag.into(),
            command: command.into(),
            options: Vec::new(),
        }
    }

    /// Appends an option to the request.
    pub fn with_option(mut self, option: ContainerOption) -> Self {
        self.options.push(option);
        self
    }
}

impl<E> ContainerManager<E>
where
    E: ContainerEngine + ?Sized + 'static,
{
    /// Creates a manager that drives `engine`.
    pub fn new(engine: Arc<E>, config: ManagerConfig) -> Self {
        Self { engine, config }
    }

    /// Starts a container from `image:tag` running `command`, and returns its engine identifier.
    ///
    /// ## Errors
    ///
    /// | Kind | Cause |
    /// |------|-------|
    /// | `NotFound` | no image carries `image:tag` |
    /// | `AlreadyExists` | a running container already has the requested instance name |
    /// | `Unavailable` | a running container already publishes a requested host port |
    /// | `FailedPrecondition` | a run-as identity has no user |
    /// | `InvalidArgument` | the command or an option value cannot be translated |
    /// | `DeadlineExceeded` | an engine read outlived the configured read timeout |
    /// | `Internal` | the engine failed |
    pub async fn start_container(
        &self,
        image: &str,
        tag: &str,
        command: &str,
        options: impl IntoIterator<Item = ContainerOption>,
    ) -> ContainerzResult<String> {
        let options = StartOptions::new(options);
        tracing::info!("starting container from {}:{}", image, tag);

        let (resolved, running) = tokio::join!(
            self.read(LIST_IMAGES, images::resolve(self.engine.as_ref(), image, tag)),
            self.read(LIST_CONTAINERS, async {
                self.engine
                    .list_containers()
                    .await
                    .map_err(|e| ContainerzError::engine(LIST_CONTAINERS, e))
            }),
        );

        let resolved = resolved?;

        if let Err(e) = conflict::validate(&options, &running?) {
            tracing::info!("rejected start of {}: {}", resolved.get_reference(), e);
            return Err(e);
        }
        tracing::debug!(
            "start of {} passed name, port and run-as checks",
            resolved.get_reference()
        );

        let config = StartConfig::build(command, &options)?;
        tracing::debug!(?config, "built start configuration");

        let request = CreateContainerRequest {
            image: resolved.get_reference().clone(),
            name: options
                .get_instance_name()
                .clone()
                .filter(|name| !name.is_empty()),
            platform: self.config.get_platform().clone(),
            config,
        };

        let engine = Arc::clone(&self.engine);
        let cleanup = *self.config.get_cleanup_on_start_failure();
        match tokio::spawn(create_and_start(engine, request, cleanup)).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => Err(ContainerzError::engine(
                CREATE_CONTAINER,
                EngineError::with_source("create and start task was cancelled", e),
            )),
        }
    }

    /// Starts the container described by `request`. See [`ContainerManager::start_container`].
    pub async fn start(&self, request: StartRequest) -> ContainerzResult<String> {
        self.start_container(&request.image, &request.tag, &request.command, request.options)
            .await
    }

    /// Awaits an engine read, bounded by the configured read timeout.
    async fn read<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = ContainerzResult<T>>,
    ) -> ContainerzResult<T> {
        match *self.config.get_read_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, call).await.map_err(|_| {
                tracing::warn!("{} timed out after {:?}", operation, timeout);
                ContainerzError::Timeout { operation, timeout }
            })?,
            None => call.await,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

async fn create_and_start<E>(
    engine: Arc<E>,
    request: CreateContainerRequest,
    cleanup_on_start_failure: bool,
) -> ContainerzResult<String>
where
    E: ContainerEngine + ?Sized,
{
    let created = engine
        .create_container(&request)
        .await
        .map_err(|e| ContainerzError::engine(CREATE_CONTAINER, e))?;

    for warning in &created.warnings {
        tracing::warn!("engine warning for container {}: {}", created.id, warning);
    }
    tracing::info!("created container {} from {}", created.id, request.image);

    if let Err(e) = engine.start_container(&created.id).await {
        tracing::error!("failed to start container {}: {}", created.id, e);

        if cleanup_on_start_failure {
            match engine.remove_container(&created.id).await {
                Ok(()) => tracing::info!("removed container {} after failed start", created.id),
                Err(remove_err) => tracing::warn!(
                    "failed to {} {} after failed start: {}",
                    REMOVE_CONTAINER,
                    created.id,
                    remove_err
                ),
            }
        }

        return Err(ContainerzError::engine(START_CONTAINER, e));
    }

    tracing::info!("started container {}", created.id);
    Ok(created.id)
}
