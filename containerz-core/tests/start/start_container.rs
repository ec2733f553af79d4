use std::{sync::Arc, time::Duration};

use containerz_core::{
    config::{
        ContainerOption, Device, DevicePermission, ManagerConfig, RestartPolicyKind, RunAs, Volume,
    },
    engine::ContainerEngine,
    management::{image, ContainerManager, StartConfig, StartRequest},
    ErrorKind,
};

use crate::fake::{container_named, container_publishing, FakeEngine};

//--------------------------------------------------------------------------------------------------
// Helpers
//--------------------------------------------------------------------------------------------------

const IMAGE: &str = "my-image";
const TAG: &str = "my-tag";

fn engine() -> FakeEngine {
    FakeEngine::with_images(&["my-image:my-tag"])
}

fn manager(engine: &Arc<FakeEngine>) -> ContainerManager<FakeEngine> {
    ContainerManager::new(Arc::clone(engine), ManagerConfig::default())
}

/// Starts a container and returns the start configuration the engine was asked to create.
async fn start_ok(
    engine: FakeEngine,
    command: &str,
    options: impl IntoIterator<Item = ContainerOption>,
) -> (String, StartConfig) {
    let engine = engine.into_arc();
    let id = manager(&engine)
        .start_container(IMAGE, TAG, command, options)
        .await
        .unwrap();

    let calls = engine.calls();
    assert_eq!(calls.started.as_deref(), Some(id.as_str()));
    (id, calls.created.unwrap().config)
}

//--------------------------------------------------------------------------------------------------
// Tests: rejections
//--------------------------------------------------------------------------------------------------

#[test_log::test(tokio::test)]
async fn test_missing_image_is_not_found() {
    let engine = FakeEngine::default().into_arc();
    let err = manager(&engine)
        .start_container("no-such-image", "no-such-tag", "", [])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "image no-such-image:no-such-tag not found");
    assert!(engine.calls().created.is_none());
}

#[test_log::test(tokio::test)]
async fn test_missing_image_wins_over_every_other_check() {
    let engine = FakeEngine::default()
        .running(container_named("my-container"))
        .running(container_publishing(1))
        .into_arc();

    let err = manager(&engine)
        .start_container(
            IMAGE,
            TAG,
            "sh -c 'unterminated",
            [
                ContainerOption::instance_name("my-container"),
                ContainerOption::ports([(1, 1)]),
                ContainerOption::run_as(RunAs::default()),
            ],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test_log::test(tokio::test)]
async fn test_instance_name_in_use() {
    let engine = engine().running(container_named("my-container")).into_arc();
    let err = manager(&engine)
        .start_container(
            IMAGE,
            TAG,
            "my-cmd",
            [ContainerOption::instance_name("my-container")],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert_eq!(err.to_string(), "instance name my-container already in use");
    assert!(engine.calls().created.is_none());
}

#[test_log::test(tokio::test)]
async fn test_empty_run_as_user() {
    let engine = engine().running(container_named("my-container")).into_arc();
    let err = manager(&engine)
        .start_container(
            IMAGE,
            TAG,
            "my-cmd",
            [ContainerOption::run_as(RunAs::default())],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FailedPrecondition);
    assert_eq!(err.to_string(), "user can not be empty in RunAs option");
    assert!(engine.calls().created.is_none());
}

#[test_log::test(tokio::test)]
async fn test_host_port_in_use() {
    let engine = engine().running(container_publishing(1)).into_arc();
    let err = manager(&engine)
        .start_container(
            IMAGE,
            TAG,
            "my-cmd",
            [
                ContainerOption::instance_name("my-container"),
                ContainerOption::ports([(1, 1)]),
            ],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert_eq!(err.to_string(), "port 1 already in use");
    assert!(engine.calls().created.is_none());
}

#[test_log::test(tokio::test)]
async fn test_malformed_command_is_rejected_before_create() {
    let engine = engine().into_arc();
    let err = manager(&engine)
        .start_container(IMAGE, TAG, r#"sh -c "echo 2"#, [])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(engine.calls().created.is_none());
}

//--------------------------------------------------------------------------------------------------
// Tests: translated options
//--------------------------------------------------------------------------------------------------

#[test_log::test(tokio::test)]
async fn test_empty_instance_name_lets_engine_pick_one() {
    let engine = engine().running(container_named("")).into_arc();
    let id = manager(&engine)
        .start_container(IMAGE, TAG, "my-cmd", [ContainerOption::instance_name("")])
        .await
        .unwrap();

    assert_eq!(id, "generated-id");
    assert_eq!(engine.calls().created.unwrap().name, None);
}

#[test_log::test(tokio::test)]
async fn test_ports() {
    let (id, config) = start_ok(
        engine(),
        "my-cmd",
        [
            ContainerOption::instance_name("my-container"),
            ContainerOption::ports([(1, 1)]),
        ],
    )
    .await;

    assert_eq!(id, "my-container");
    assert_eq!(config.get_argv(), &["my-cmd"]);
    assert!(config.get_exposed_ports().contains("1/tcp"));
    assert_eq!(config.get_port_bindings()["1/tcp"], [1]);
    assert!(config.get_mounts().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_run_as_user_without_group() {
    let (_, config) = start_ok(
        engine().running(container_named("my-container")),
        "my-cmd",
        [ContainerOption::run_as(RunAs::user("my-user"))],
    )
    .await;

    assert_eq!(config.get_user(), "my-user");
}

#[test_log::test(tokio::test)]
async fn test_run_as_user_and_group() {
    let (_, config) = start_ok(
        engine(),
        "my-cmd",
        [ContainerOption::run_as(RunAs::user_and_group(
            "my-user", "my-group",
        ))],
    )
    .await;

    assert_eq!(config.get_user(), "my-user:my-group");
}

#[test_log::test(tokio::test)]
async fn test_restart_policy_and_attempts() {
    let (_, config) = start_ok(
        engine(),
        "my-cmd",
        [ContainerOption::restart_policy(RestartPolicyKind::OnFailure, 3)],
    )
    .await;

    let policy = config.get_restart_policy().unwrap();
    assert_eq!(policy.name(), "on-failure");
    assert_eq!(policy.max_retries, 3);
}

#[test_log::test(tokio::test)]
async fn test_capabilities() {
    let (_, config) = start_ok(
        engine(),
        "my-cmd",
        [ContainerOption::capabilities(
            ["my-add-capability"],
            ["my-remove-capability"],
        )],
    )
    .await;

    assert_eq!(config.get_cap_add(), &["my-add-capability"]);
    assert_eq!(config.get_cap_drop(), &["my-remove-capability"]);
}

#[test_log::test(tokio::test)]
async fn test_network_and_labels() {
    let (_, config) = start_ok(
        engine(),
        "my-cmd",
        [
            ContainerOption::network("my-network"),
            ContainerOption::labels([("label", "value")]),
        ],
    )
    .await;

    assert_eq!(config.get_network_mode().as_deref(), Some("my-network"));
    assert_eq!(config.get_labels()["label"], "value");
}

#[test_log::test(tokio::test)]
async fn test_env_ports_volumes_and_devices() {
    let (id, config) = start_ok(
        engine(),
        "my-cmd",
        [
            ContainerOption::instance_name("my-container"),
            ContainerOption::ports([(1, 1)]),
            ContainerOption::env([("AA", "BB")]),
            ContainerOption::volumes([Volume::new("my-volume", "/tmp")]),
            ContainerOption::devices([Device::new(
                "/dev/my-device",
                "/dev/my-device",
                [
                    DevicePermission::Read,
                    DevicePermission::Write,
                    DevicePermission::Mknod,
                ],
            )]),
        ],
    )
    .await;

    assert_eq!(id, "my-container");
    assert_eq!(config.get_env(), &["AA=BB"]);
    assert!(config.get_exposed_ports().contains("1/tcp"));

    let mount = &config.get_mounts()[0];
    assert_eq!(mount.kind.as_str(), "volume");
    assert_eq!(mount.source, "my-volume");
    assert_eq!(mount.target, "/tmp");

    let device = &config.get_devices()[0];
    assert_eq!(device.path_on_host, "/dev/my-device");
    assert_eq!(device.path_in_container, "/dev/my-device");
    assert_eq!(device.cgroup_permissions, "rwm");
}

#[test_log::test(tokio::test)]
async fn test_cpu_and_memory_limits() {
    let (_, config) = start_ok(
        engine(),
        "my-cmd",
        [
            ContainerOption::instance_name("my-container"),
            ContainerOption::cpus(1.0),
            ContainerOption::soft_memory_limit(1000),
            ContainerOption::hard_memory_limit(2000),
        ],
    )
    .await;

    let resources = config.get_resources();
    assert_eq!(*resources.get_nano_cpus(), 1_000_000_000);
    assert_eq!(*resources.get_memory(), 2000);
    assert_eq!(*resources.get_memory_reservation(), 1000);
}

#[test_log::test(tokio::test)]
async fn test_commands() {
    let cases: [(&str, &[&str]); 4] = [
        ("sleep 1000", &["sleep", "1000"]),
        (r#"sh -c "echo 2""#, &["sh", "-c", "echo 2"]),
        (r#"echo 'echo "quoted"'"#, &["echo", r#"echo "quoted""#]),
        ("", &[]),
    ];

    for (command, argv) in cases {
        let (_, config) = start_ok(engine(), command, []).await;
        assert_eq!(config.get_argv(), argv, "{command}");
    }
}

#[test_log::test(tokio::test)]
async fn test_no_command_and_no_options_builds_zero_config() {
    let engine = engine().into_arc();
    let id = manager(&engine)
        .start_container(IMAGE, TAG, "", [])
        .await
        .unwrap();

    let created = engine.calls().created.unwrap();
    assert_eq!(id, "generated-id");
    assert_eq!(created.name, None);
    assert_eq!(created.image, "my-image:my-tag");
    assert_eq!(created.config, StartConfig::default());
}

#[test_log::test(tokio::test)]
async fn test_start_request_deserialized_from_json() {
    let request: StartRequest = serde_json::from_value(serde_json::json!({
        "image": "my-image",
        "tag": "my-tag",
        "command": "sleep 1000",
        "options": [
            { "instance_name": "from-json" },
            { "ports": { "8080": 80 } },
            { "cpus": 0.5 }
        ]
    }))
    .unwrap();

    let engine = engine().into_arc();
    let id = manager(&engine).start(request).await.unwrap();
    assert_eq!(id, "from-json");

    let config = engine.calls().created.unwrap().config;
    assert_eq!(config.get_port_bindings()["80/tcp"], [8080]);
    assert_eq!(*config.get_resources().get_nano_cpus(), 500_000_000);
}

//--------------------------------------------------------------------------------------------------
// Tests: engine failures and configuration
//--------------------------------------------------------------------------------------------------

#[test_log::test(tokio::test)]
async fn test_image_read_failure_is_internal() {
    let engine = FakeEngine {
        fail_list_images: true,
        ..engine()
    }
    .into_arc();

    let err = manager(&engine)
        .start_container(IMAGE, TAG, "my-cmd", [])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.to_string().starts_with("list images failed"));
    assert!(engine.calls().created.is_none());
}

#[test_log::test(tokio::test)]
async fn test_container_read_failure_is_internal() {
    let engine = FakeEngine {
        fail_list_containers: true,
        ..engine()
    }
    .into_arc();

    let err = manager(&engine)
        .start_container(IMAGE, TAG, "my-cmd", [])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.to_string().starts_with("list containers failed"));
    assert!(engine.calls().created.is_none());
}

#[test_log::test(tokio::test)]
async fn test_missing_image_wins_over_container_read_failure() {
    let engine = FakeEngine {
        fail_list_containers: true,
        ..FakeEngine::default()
    }
    .into_arc();

    let err = manager(&engine)
        .start_container("no-such-image", "no-such-tag", "", [])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test_log::test(tokio::test)]
async fn test_dropped_caller_does_not_abort_create() {
    let engine = FakeEngine {
        create_delay: Some(Duration::from_millis(100)),
        ..engine()
    }
    .into_arc();
    let manager = manager(&engine);

    let call = manager.start_container(
        IMAGE,
        TAG,
        "my-cmd",
        [ContainerOption::instance_name("kept")],
    );
    let outcome = tokio::time::timeout(Duration::from_millis(20), call).await;
    assert!(outcome.is_err());
    assert!(engine.calls().created.is_none());

    tokio::time::sleep(Duration::from_millis(500)).await;

    let calls = engine.calls();
    assert_eq!(calls.created.unwrap().name.as_deref(), Some("kept"));
    assert_eq!(calls.started.as_deref(), Some("kept"));
}

#[test_log::test(tokio::test)]
async fn test_create_failure_is_internal() {
    let engine = FakeEngine {
        fail_create: true,
        ..engine()
    }
    .into_arc();

    let err = manager(&engine)
        .start_container(IMAGE, TAG, "my-cmd", [])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.to_string().starts_with("create container failed"));
    assert!(engine.calls().started.is_none());
}

#[test_log::test(tokio::test)]
async fn test_start_failure_leaves_container_by_default() {
    let engine = FakeEngine {
        fail_start: true,
        ..engine()
    }
    .into_arc();

    let err = manager(&engine)
        .start_container(IMAGE, TAG, "my-cmd", [ContainerOption::instance_name("left")])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.to_string().starts_with("start container failed"));

    let calls = engine.calls();
    assert!(calls.created.is_some());
    assert!(calls.removed.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_start_failure_removes_container_when_configured() {
    let engine = FakeEngine {
        fail_start: true,
        ..engine()
    }
    .into_arc();

    let config = ManagerConfig::builder().cleanup_on_start_failure(true).build();
    let err = ContainerManager::new(Arc::clone(&engine), config)
        .start_container(IMAGE, TAG, "my-cmd", [ContainerOption::instance_name("gone")])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(engine.calls().removed, ["gone"]);
}

#[test_log::test(tokio::test)]
async fn test_slow_engine_read_exceeds_deadline() {
    let engine = FakeEngine {
        list_delay: Some(Duration::from_secs(5)),
        ..engine()
    }
    .into_arc();

    let config = ManagerConfig::builder()
        .read_timeout(Duration::from_millis(50))
        .build();
    let err = ContainerManager::new(Arc::clone(&engine), config)
        .start_container(IMAGE, TAG, "my-cmd", [])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DeadlineExceeded);
    assert!(engine.calls().created.is_none());
}

#[test_log::test(tokio::test)]
async fn test_platform_is_forwarded() {
    let engine = engine().into_arc();
    let config = ManagerConfig::builder().platform("linux/arm64").build();

    ContainerManager::new(Arc::clone(&engine), config)
        .start_container(IMAGE, TAG, "", [])
        .await
        .unwrap();

    let created = engine.calls().created.unwrap();
    assert_eq!(created.platform.as_deref(), Some("linux/arm64"));
}

#[test_log::test(tokio::test)]
async fn test_manager_over_trait_object() {
    let engine: Arc<dyn ContainerEngine> = engine().into_arc();
    let manager = ContainerManager::new(Arc::clone(&engine), ManagerConfig::default());
    assert!(Arc::ptr_eq(manager.get_engine(), &engine));
    assert_eq!(manager.get_config(), &ManagerConfig::default());

    let id = manager
        .start_container(IMAGE, TAG, "", [ContainerOption::instance_name("dyn")])
        .await
        .unwrap();
    assert_eq!(id, "dyn");
}

#[test_log::test(tokio::test)]
async fn test_resolve_reads_engine_images() {
    let engine = engine();

    let resolved = image::resolve(&engine, IMAGE, TAG).await.unwrap();
    assert_eq!(resolved.get_reference(), "my-image:my-tag");

    let err = image::resolve(&engine, IMAGE, "other").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

//--------------------------------------------------------------------------------------------------
// Tests: tokenizer agreement
//--------------------------------------------------------------------------------------------------

#[test]
fn test_tokenizer_agrees_with_posix_word_splitting() {
    for command in [
        "sleep 1000",
        r#"sh -c "echo 2""#,
        r#"echo 'echo "quoted"'"#,
        r#"a'b c'"d e" f"#,
        r"a\ b",
        r#"echo "" ''"#,
        "a\\\nb",
        "echo \"a\\\nb\"",
        "echo a\u{a0}b",
        "",
    ] {
        let expected = shell_words::split(command).unwrap();
        let actual = containerz_core::utils::tokenize(command).unwrap();
        assert_eq!(actual, expected, "{command}");
    }
}
