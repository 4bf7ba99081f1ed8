//! LocalBackend behaviour through the command interface

use std::sync::Arc;

use async_trait::async_trait;
use group_store::{
    AppSettings, AudioDevice, DeviceId, GroupDevice, GroupId, GroupStore, NewGroup, StoreFile, ValidationError,
};
use parking_lot::Mutex;
use shortcut_codec::Shortcut;
use soundshift_backend::{CommandError, CommandInterface, LocalBackend, MemoryRegistrar, Notification};
use soundshift_state::{AudioEndpoints, CycleOutcome, EndpointError, MemoryEndpoints, SelectionError};
use tempfile::TempDir;
use tokio::sync::oneshot;

// ============================================================================
// Test Helpers
// ============================================================================

struct Fixture {
    backend: LocalBackend,
    endpoints: Arc<MemoryEndpoints>,
    registrar: Arc<MemoryRegistrar>,
    _dir: TempDir,
    file: StoreFile,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let file = StoreFile::new(dir.path().join("config.json"));
    let endpoints = Arc::new(MemoryEndpoints::demo());
    let registrar = Arc::new(MemoryRegistrar::new());
    let backend = LocalBackend::open(endpoints.clone(), registrar.clone(), Some(file.clone())).unwrap();

    Fixture { backend, endpoints, registrar, _dir: dir, file }
}

/// Endpoints whose next switch waits until released
struct GatedEndpoints {
    inner: MemoryEndpoints,
    entered: Mutex<Option<oneshot::Sender<()>>>,
    release: Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedEndpoints {
    fn new() -> Self {
        Self {
            inner: MemoryEndpoints::demo(),
            entered: Mutex::new(None),
            release: Mutex::new(None),
        }
    }

    /// Hold the next switch. The first receiver fires once the switch is
    /// waiting, the sender lets it proceed.
    fn hold_next_switch(&self) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        *self.entered.lock() = Some(entered_tx);
        *self.release.lock() = Some(release_rx);
        (entered_rx, release_tx)
    }
}

#[async_trait]
impl AudioEndpoints for GatedEndpoints {
    async fn list_devices(&self) -> Result<Vec<AudioDevice>, EndpointError> {
        self.inner.list_devices().await
    }

    async fn set_default_device(&self, id: &DeviceId) -> Result<(), EndpointError> {
        let entered = self.entered.lock().take();
        if let Some(entered) = entered {
            let _ = entered.send(());
        }
        let release = self.release.lock().take();
        if let Some(release) = release {
            let _ = release.await;
        }
        self.inner.set_default_device(id).await
    }
}

fn gated_backend() -> (Arc<LocalBackend>, Arc<GatedEndpoints>) {
    let endpoints = Arc::new(GatedEndpoints::new());
    let backend = LocalBackend::with_store(GroupStore::new(), endpoints.clone(), Arc::new(MemoryRegistrar::new()));
    (Arc::new(backend), endpoints)
}

fn movies() -> NewGroup {
    NewGroup::new(
        "Movies",
        vec![GroupDevice::new("dev-5", "LG TV (HDMI)"), GroupDevice::new("dev-1", "Speakers")],
    )
    .with_shortcut(Shortcut::parse("Ctrl+Alt+V").unwrap())
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn blank_name_issues_no_command() {
    let fx = fixture();

    let err = fx.backend.create_group(NewGroup::new("", movies().devices)).await.unwrap_err();

    assert_eq!(err, CommandError::Validation(ValidationError::EmptyName));
    assert!(fx.backend.list_groups().await.unwrap().is_empty());
    assert!(fx.registrar.registered().is_empty());
    assert!(!fx.file.path().exists());
}

#[tokio::test]
async fn mutations_are_persisted() {
    let fx = fixture();
    let group = fx.backend.create_group(movies()).await.unwrap();
    fx.backend
        .update_settings(AppSettings { run_on_startup: true, ..Default::default() })
        .await
        .unwrap();

    let saved = fx.file.load().unwrap().unwrap();
    assert_eq!(saved.groups.len(), 1);
    assert_eq!(saved.groups[0].id, group.id);
    assert!(saved.settings.run_on_startup);
}

#[tokio::test]
async fn reopen_registers_persisted_shortcuts() {
    let fx = fixture();
    fx.backend.create_group(movies()).await.unwrap();

    let registrar = Arc::new(MemoryRegistrar::new());
    let reopened = LocalBackend::open(fx.endpoints.clone(), registrar.clone(), Some(fx.file.clone())).unwrap();

    assert_eq!(reopened.list_groups().await.unwrap().len(), 1);
    assert_eq!(registrar.registered(), vec!["Ctrl+Alt+V".to_string()]);
}

#[tokio::test]
async fn shortcut_press_cycles_bound_group() {
    let fx = fixture();
    let mut notifications = fx.backend.subscribe(8);
    let group = fx.backend.create_group(movies()).await.unwrap();

    let outcome = fx.backend.handle_shortcut(&Shortcut::parse("alt+ctrl+v").unwrap()).await.unwrap();

    assert!(matches!(outcome, Some(CycleOutcome::Switched { index: 1, .. })));
    assert_eq!(fx.endpoints.switches(), vec![DeviceId::new("dev-1")]);
    assert_eq!(fx.file.load().unwrap().unwrap().groups[0].current_index, 1);
    match notifications.recv().await {
        Some(Notification::DeviceSwitched(event)) => assert_eq!(event.group_id, group.id),
        other => panic!("unexpected notification {:?}", other),
    }
}

#[tokio::test]
async fn unbound_shortcut_is_ignored() {
    let fx = fixture();
    let outcome = fx.backend.handle_shortcut(&Shortcut::parse("Ctrl+Alt+Q").unwrap()).await.unwrap();
    assert!(outcome.is_none());
    assert!(fx.endpoints.switches().is_empty());
}

#[tokio::test]
async fn failed_switch_keeps_index_and_is_retryable() {
    let fx = fixture();
    let group = fx.backend.create_group(movies()).await.unwrap();

    fx.endpoints.fail_next("device busy");
    let err = fx.backend.cycle_group(&group.id).await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(fx.backend.list_groups().await.unwrap()[0].current_index, 0);
}

#[tokio::test]
async fn select_offline_device_rejected() {
    let fx = fixture();
    let group = fx.backend.create_group(movies()).await.unwrap();
    fx.endpoints.unplug(&DeviceId::new("dev-1"));

    let err = fx.backend.select_group_device(&group.id, 1).await.unwrap_err();
    assert!(matches!(err, CommandError::InvalidSelection(SelectionError::Offline { index: 1, .. })));

    let device = fx.backend.select_group_device(&group.id, 0).await.unwrap();
    assert_eq!(device.id, DeviceId::new("dev-5"));
}

#[tokio::test]
async fn cycle_unknown_group_not_found() {
    let fx = fixture();
    let err = fx.backend.cycle_group(&GroupId::new("nope")).await.unwrap_err();
    assert_eq!(err, CommandError::NotFound(GroupId::new("nope")));
}

#[tokio::test]
async fn update_with_out_of_range_index_rejected() {
    let fx = fixture();
    let mut group = fx.backend.create_group(movies()).await.unwrap();
    group.current_index = 9;

    let err = fx.backend.update_group(group).await.unwrap_err();
    assert!(matches!(err, CommandError::Validation(ValidationError::IndexOutOfRange { .. })));
    assert_eq!(fx.registrar.registered(), vec!["Ctrl+Alt+V".to_string()]);
}

#[tokio::test]
async fn reorder_during_switch_commits_switched_device() {
    let (backend, endpoints) = gated_backend();
    let group = backend.create_group(movies()).await.unwrap();

    let (entered, release) = endpoints.hold_next_switch();
    let cycling = tokio::spawn({
        let backend = backend.clone();
        let id = group.id.clone();
        async move { backend.cycle_group(&id).await }
    });
    entered.await.unwrap();

    let mut reversed = group.clone();
    reversed.devices.reverse();
    backend.update_group(reversed).await.unwrap();

    release.send(()).unwrap();
    let outcome = cycling.await.unwrap().unwrap();

    let os_default = endpoints.inner.default_device().unwrap().id;
    let stored = backend.list_groups().await.unwrap().remove(0);
    assert_eq!(os_default, DeviceId::new("dev-1"));
    assert_eq!(stored.current_device().unwrap().id, os_default);
    assert!(matches!(outcome, CycleOutcome::Switched { index: 0, .. }));
}

#[tokio::test]
async fn device_removed_during_switch_is_retryable() {
    let (backend, endpoints) = gated_backend();
    let mut notifications = backend.subscribe(8);
    let group = backend.create_group(movies()).await.unwrap();

    let (entered, release) = endpoints.hold_next_switch();
    let cycling = tokio::spawn({
        let backend = backend.clone();
        let id = group.id.clone();
        async move { backend.cycle_group(&id).await }
    });
    entered.await.unwrap();

    let mut shrunk = group.clone();
    shrunk.devices.truncate(1);
    backend.update_group(shrunk).await.unwrap();

    release.send(()).unwrap();
    let err = cycling.await.unwrap().unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(backend.list_groups().await.unwrap()[0].current_index, 0);
    assert_eq!(notifications.recv().await, Some(Notification::DevicesChanged));
}
