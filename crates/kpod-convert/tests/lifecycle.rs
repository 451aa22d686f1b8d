use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use kpod_convert::DefaultConverter;
use kpod_core::testing::{MemoryRuntime, Method};
use kpod_core::{HealthCheckConfig, ReconcileError, Reconciler, ReconcilerConfig};
use kpod_model::{ContainerSpec, LABEL_CONTAINER_NAME, LABEL_MANAGED_BY, WorkloadPodSpec};

type PodReconciler = Reconciler<MemoryRuntime, DefaultConverter>;

fn busybox_pod(name: &str) -> WorkloadPodSpec {
    WorkloadPodSpec::new(name).with_container(
        ContainerSpec::new("container1", "busybox")
            .with_command(["/bin/sleep"])
            .with_args(["100s"]),
    )
}

async fn connect(rt: &MemoryRuntime) -> Result<PodReconciler> {
    let pods = Reconciler::connect(rt, DefaultConverter::new(), ReconcilerConfig::default()).await?;
    Ok(pods)
}

#[tokio::test(start_paused = true)]
async fn create_get_delete_busybox_pod() -> Result<()> {
    let rt = MemoryRuntime::new();
    let pods = connect(&rt).await?;
    let cancel = CancellationToken::new();
    let spec = busybox_pod("test-pod-create");

    pods.create(&spec, &cancel).await?;
    assert_eq!(rt.is_started("test-pod-create"), Some(true));

    let got = pods.get(&spec, &cancel).await?;
    assert_eq!(got, spec);

    let by_name = pods.get_by_name("test-pod-create", &cancel).await?;
    assert_eq!(by_name, spec);

    pods.delete(&spec, &cancel).await?;
    let res = pods.get(&spec, &cancel).await;
    assert!(matches!(res, Err(ReconcileError::NotFound(_))), "got {res:?}");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn runtime_objects_carry_bookkeeping_labels() -> Result<()> {
    let rt = MemoryRuntime::new();
    let pods = connect(&rt).await?;
    let cancel = CancellationToken::new();

    pods.create(&busybox_pod("labelled").with_label("team", "infra"), &cancel)
        .await?;

    let names = rt.container_names("labelled").unwrap_or_default();
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with("-container1"), "{names:?}");

    // labels are stripped again on the way back
    let got = pods.get_by_name("labelled", &cancel).await?;
    assert_eq!(got.labels.get("team"), Some("infra"));
    assert!(got.labels.get(LABEL_MANAGED_BY).is_none());
    assert!(got.labels.get(LABEL_CONTAINER_NAME).is_none());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn same_container_name_in_two_pods() -> Result<()> {
    let rt = MemoryRuntime::new();
    let pods = connect(&rt).await?;
    let cancel = CancellationToken::new();

    pods.create(&busybox_pod("test-pod-list-1"), &cancel).await?;
    pods.create(&busybox_pod("test-pod-list-2"), &cancel).await?;

    let listed = pods.list(&cancel).await?;
    let names: Vec<_> = listed.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["test-pod-list-1", "test-pod-list-2"]);
    assert!(listed.iter().all(|p| p.containers[0].name == "container1"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn create_or_update_converges_changed_spec() -> Result<()> {
    let rt = MemoryRuntime::new();
    let pods = connect(&rt).await?;
    let cancel = CancellationToken::new();

    let v1 = busybox_pod("web");
    pods.create_or_update(&v1, &cancel).await?;
    assert_eq!(pods.get(&v1, &cancel).await?, v1);

    let v2 = v1
        .clone()
        .with_container(ContainerSpec::new("cache", "redis").with_env("MAXMEMORY", "64mb"));
    pods.create_or_update(&v2, &cancel).await?;
    assert_eq!(pods.get(&v2, &cancel).await?, v2);
    assert_eq!(rt.pod_names(), ["web"]);
    assert_eq!(rt.call_count(Method::RemovePod), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn reserved_label_is_rejected_before_any_runtime_change() -> Result<()> {
    let rt = MemoryRuntime::new();
    let pods = connect(&rt).await?;
    let cancel = CancellationToken::new();

    let spec = busybox_pod("sneaky").with_label(LABEL_MANAGED_BY, "other");
    let res = pods.create(&spec, &cancel).await;

    assert!(matches!(res, Err(ReconcileError::Conversion(_))), "got {res:?}");
    assert!(rt.pod_names().is_empty());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn slow_start_within_budget_succeeds() -> Result<()> {
    let rt = MemoryRuntime::new();
    rt.set_startup_probes(3);
    let pods = connect(&rt).await?;

    pods.create(&busybox_pod("slow"), &CancellationToken::new()).await?;
    assert_eq!(rt.call_count(Method::InspectPod), 4);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn pod_that_never_runs_times_out() -> Result<()> {
    let rt = MemoryRuntime::new();
    rt.never_ready();
    let config = ReconcilerConfig::default()
        .with_settle_delay(Duration::ZERO)
        .with_health(HealthCheckConfig::new(5, Duration::from_millis(200)));
    let pods = Reconciler::connect(&rt, DefaultConverter::new(), config).await?;

    let res = pods.create(&busybox_pod("stuck"), &CancellationToken::new()).await;

    assert!(
        matches!(res, Err(ReconcileError::Timeout { attempts: 5, .. })),
        "got {res:?}"
    );
    assert_eq!(rt.call_count(Method::InspectPod), 5);
    Ok(())
}
