//! Sequencing and rollback behaviour of the sync controller

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use group_store::{
    AppSettings, AudioDevice, DeviceGroup, DeviceId, GroupDevice, GroupId, GroupStore, NewGroup,
};
use parking_lot::Mutex;
use soundshift_backend::{CommandError, CommandInterface, LocalBackend, MemoryRegistrar};
use soundshift_state::{AudioEndpoints, CycleOutcome, EndpointError, MemoryEndpoints};
use soundshift_sync::{RefreshOutcome, RefreshTrigger, SyncConfig, SyncController, SyncError};
use tokio::sync::oneshot;

// ============================================================================
// Test Helpers
// ============================================================================

/// LocalBackend whose group listing can be held open and whose cycle can hang
struct GatedBackend {
    inner: LocalBackend,
    list_gate: Mutex<Option<oneshot::Receiver<()>>>,
    hang_cycle: AtomicBool,
}

impl GatedBackend {
    fn new(endpoints: Arc<MemoryEndpoints>) -> Self {
        Self {
            inner: LocalBackend::with_store(GroupStore::new(), endpoints, Arc::new(MemoryRegistrar::new())),
            list_gate: Mutex::new(None),
            hang_cycle: AtomicBool::new(false),
        }
    }

    /// The next group listing reads state immediately but answers only once
    /// the returned sender fires
    fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.list_gate.lock() = Some(rx);
        tx
    }
}

type CommandResult<T> = Result<T, CommandError>;

#[async_trait]
impl CommandInterface for GatedBackend {
    async fn list_devices(&self) -> CommandResult<Vec<AudioDevice>> {
        self.inner.list_devices().await
    }

    async fn set_default_device(&self, id: &DeviceId) -> CommandResult<()> {
        self.inner.set_default_device(id).await
    }

    async fn list_groups(&self) -> CommandResult<Vec<DeviceGroup>> {
        let groups = self.inner.list_groups().await?;
        let gate = self.list_gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(groups)
    }

    async fn create_group(&self, group: NewGroup) -> CommandResult<DeviceGroup> {
        self.inner.create_group(group).await
    }

    async fn update_group(&self, group: DeviceGroup) -> CommandResult<DeviceGroup> {
        self.inner.update_group(group).await
    }

    async fn delete_group(&self, id: &GroupId) -> CommandResult<()> {
        self.inner.delete_group(id).await
    }

    async fn cycle_group(&self, id: &GroupId) -> CommandResult<CycleOutcome> {
        if self.hang_cycle.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        self.inner.cycle_group(id).await
    }

    async fn select_group_device(&self, id: &GroupId, index: usize) -> CommandResult<GroupDevice> {
        self.inner.select_group_device(id, index).await
    }

    async fn get_settings(&self) -> CommandResult<AppSettings> {
        self.inner.get_settings().await
    }

    async fn update_settings(&self, settings: AppSettings) -> CommandResult<AppSettings> {
        self.inner.update_settings(settings).await
    }
}

/// Endpoints that switch immediately but take a while to acknowledge it
struct SlowAckEndpoints {
    inner: MemoryEndpoints,
    ack_delay: Duration,
}

#[async_trait]
impl AudioEndpoints for SlowAckEndpoints {
    async fn list_devices(&self) -> Result<Vec<AudioDevice>, EndpointError> {
        self.inner.list_devices().await
    }

    async fn set_default_device(&self, id: &DeviceId) -> Result<(), EndpointError> {
        self.inner.set_default_device(id).await?;
        tokio::time::sleep(self.ack_delay).await;
        Ok(())
    }
}

fn gaming() -> NewGroup {
    NewGroup::new(
        "Gaming",
        vec![GroupDevice::new("dev-2", "Headphones"), GroupDevice::new("dev-1", "Speakers")],
    )
}

async fn loaded_controller(config: SyncConfig) -> (SyncController, Arc<GatedBackend>, Arc<MemoryEndpoints>) {
    let endpoints = Arc::new(MemoryEndpoints::demo());
    let backend = Arc::new(GatedBackend::new(endpoints.clone()));
    let mut controller = SyncController::new(backend.clone(), config);
    controller.refresh(RefreshTrigger::InitialLoad).await.unwrap();
    (controller, backend, endpoints)
}

// ============================================================================
// Sequencing
// ============================================================================

#[tokio::test]
async fn slow_older_fetch_never_overwrites_newer_state() {
    let (mut controller, backend, _) = loaded_controller(SyncConfig::responsive()).await;

    // First fetch reads the empty group list, then stalls
    let release = backend.hold_next_list();
    let first = controller.request_refresh(RefreshTrigger::Manual);
    let stalled = tokio::time::timeout(Duration::from_millis(20), controller.next_completed()).await;
    assert!(stalled.is_err());

    // Backend changes, and a second fetch overtakes the first
    backend.inner.create_group(gaming()).await.unwrap();
    let second = controller.request_refresh(RefreshTrigger::DevicesChanged);

    let completed = controller.next_completed().await.unwrap();
    assert_eq!(completed.ticket, second);
    assert_eq!(controller.apply_fetch(completed).unwrap(), RefreshOutcome::Applied);
    assert_eq!(controller.state().groups.len(), 1);

    // The stale answer arrives last and is dropped
    release.send(()).unwrap();
    let completed = controller.next_completed().await.unwrap();
    assert_eq!(completed.ticket, first);
    assert!(completed.result.as_ref().unwrap().groups.is_empty());
    assert_eq!(controller.apply_fetch(completed).unwrap(), RefreshOutcome::Stale);

    assert_eq!(controller.state().groups.len(), 1);
    assert!(!controller.has_in_flight());
}

#[tokio::test]
async fn notifications_schedule_refetch() {
    let (mut controller, backend, endpoints) = loaded_controller(SyncConfig::responsive()).await;
    let mut notifications = backend.inner.subscribe(4);

    endpoints.unplug(&DeviceId::new("dev-3"));
    backend.inner.notify_devices_changed();

    let notification = notifications.recv().await.unwrap();
    controller.handle_notification(notification);
    let completed = controller.next_completed().await.unwrap();
    controller.apply_fetch(completed).unwrap();

    assert_eq!(controller.state().devices.len(), 4);
}

#[tokio::test]
async fn switch_notification_is_remembered() {
    let (mut controller, backend, _) = loaded_controller(SyncConfig::responsive()).await;
    let mut notifications = backend.inner.subscribe(4);
    let group = backend.inner.create_group(gaming()).await.unwrap();

    backend.inner.cycle_group(&group.id).await.unwrap();
    controller.handle_notification(notifications.recv().await.unwrap());

    assert_eq!(controller.view().last_switch.unwrap().message(), "Switched to Speakers (Realtek High Definition Audio)");
}

// ============================================================================
// Optimistic updates
// ============================================================================

#[tokio::test]
async fn failed_switch_rolls_back_optimistic_index() {
    let (mut controller, _, endpoints) = loaded_controller(SyncConfig::responsive()).await;
    let group = controller.create_group(gaming()).await.unwrap();

    endpoints.fail_next("device busy");
    let err = controller.cycle_group(&group.id).await.unwrap_err();

    assert!(err.is_retryable());
    assert!(!controller.has_pending());
    assert_eq!(controller.state().group(&group.id).unwrap().current_index, 0);
    assert!(controller.view().last_error.unwrap().contains("device busy"));
}

#[tokio::test]
async fn hung_command_times_out_and_rolls_back() {
    let config = SyncConfig::responsive().with_fetch_timeout(Duration::from_millis(50));
    let (mut controller, backend, endpoints) = loaded_controller(config).await;
    let group = controller.create_group(gaming()).await.unwrap();

    backend.hang_cycle.store(true, Ordering::SeqCst);
    let err = controller.cycle_group(&group.id).await.unwrap_err();

    assert!(err.to_string().contains("cycle_group timed out after 50ms"));
    assert_eq!(controller.state().group(&group.id).unwrap().current_index, 0);
    assert!(endpoints.switches().is_empty());
}

#[tokio::test]
async fn timed_out_switch_still_commits_in_background() {
    let endpoints = Arc::new(SlowAckEndpoints {
        inner: MemoryEndpoints::demo(),
        ack_delay: Duration::from_millis(150),
    });
    let backend = Arc::new(LocalBackend::with_store(
        GroupStore::new(),
        endpoints.clone(),
        Arc::new(MemoryRegistrar::new()),
    ));
    let config = SyncConfig::responsive().with_fetch_timeout(Duration::from_millis(50));
    let mut controller = SyncController::new(backend.clone(), config);
    controller.refresh(RefreshTrigger::InitialLoad).await.unwrap();
    let group = controller.create_group(gaming()).await.unwrap();

    let err = controller.cycle_group(&group.id).await.unwrap_err();
    assert!(err.to_string().contains("cycle_group timed out after 50ms"));

    // The switch already reached the OS, so the index must follow it
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(endpoints.inner.default_device().unwrap().id, DeviceId::new("dev-1"));
    assert_eq!(backend.list_groups().await.unwrap()[0].current_index, 1);

    controller.refresh(RefreshTrigger::Manual).await.unwrap();
    assert_eq!(controller.state().group(&group.id).unwrap().current_index, 1);
}

#[tokio::test]
async fn offline_selection_is_rejected_by_backend() {
    let (mut controller, _, endpoints) = loaded_controller(SyncConfig::responsive()).await;
    let group = controller.create_group(gaming()).await.unwrap();
    endpoints.unplug(&DeviceId::new("dev-1"));

    let err = controller.select_device(&group.id, 1).await.unwrap_err();

    assert!(matches!(err, SyncError::Command(CommandError::InvalidSelection(_))));
    assert_eq!(controller.state().group(&group.id).unwrap().current_index, 0);
}

#[tokio::test]
async fn successful_edit_clears_previous_error() {
    let (mut controller, _, _) = loaded_controller(SyncConfig::responsive()).await;
    assert!(controller.create_group(NewGroup::new("Empty", vec![])).await.is_err());
    assert!(controller.last_error().is_some());

    let group = controller.create_group(gaming()).await.unwrap();
    let mut renamed = group.clone();
    renamed.name = "Gaming Rig".to_string();
    controller.update_group(renamed).await.unwrap();

    assert!(controller.last_error().is_none());
    assert_eq!(controller.state().group(&group.id).unwrap().name, "Gaming Rig");

    controller.delete_group(&group.id).await.unwrap();
    assert!(controller.state().groups.is_empty());
}
