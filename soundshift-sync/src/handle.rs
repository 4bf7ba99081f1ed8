//! Sync-first handle onto the sync worker
//!
//! Every method blocks until the worker replies. The latest view is always
//! available without a round trip.

use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use group_store::{AppSettings, DeviceGroup, GroupDevice, GroupId, NewGroup};
use soundshift_backend::{CommandInterface, Notification};
use soundshift_state::CycleOutcome;
use tokio::sync::{mpsc as async_mpsc, watch};

use crate::config::SyncConfig;
use crate::controller::RefreshOutcome;
use crate::error::{Result, SyncError};
use crate::snapshot::SyncView;
use crate::worker::{spawn_sync_worker, Action, Command, Reply};

/// Blocking access to a [`SyncController`](crate::SyncController) running
/// on its own thread
///
/// # Example
///
/// ```rust,ignore
/// let notifications = backend.subscribe(16);
/// let handle = SyncHandle::spawn(backend, notifications, SyncConfig::default())?;
///
/// handle.wait_until_loaded(Duration::from_secs(1));
/// let group = handle.create_group(NewGroup::new("Gaming", devices))?;
/// let outcome = handle.cycle_group(&group.id)?;
/// ```
pub struct SyncHandle {
    /// Send commands to background worker
    command_tx: mpsc::Sender<Command>,

    /// Latest view published by the worker
    view_rx: watch::Receiver<SyncView>,

    /// Background worker handle (kept alive)
    _worker: JoinHandle<()>,
}

impl SyncHandle {
    /// Start the worker. It begins with an initial load.
    pub fn spawn(
        commands: Arc<dyn CommandInterface>,
        notifications: async_mpsc::Receiver<Notification>,
        config: SyncConfig,
    ) -> Result<Self> {
        config.validate()?;

        let (command_tx, command_rx) = mpsc::channel();
        let (view_tx, view_rx) = watch::channel(SyncView::default());

        let worker = spawn_sync_worker(commands, notifications, config, command_rx, view_tx);

        Ok(Self {
            command_tx,
            view_rx,
            _worker: worker,
        })
    }

    /// The most recently published view
    pub fn view(&self) -> SyncView {
        self.view_rx.borrow().clone()
    }

    /// Receiver that is notified on every published view
    pub fn subscribe(&self) -> watch::Receiver<SyncView> {
        self.view_rx.clone()
    }

    /// Block until the initial load has been applied
    ///
    /// Returns false if `timeout` passes first.
    pub fn wait_until_loaded(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while !self.view_rx.borrow().loaded {
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        true
    }

    pub fn create_group(&self, new: NewGroup) -> Result<DeviceGroup> {
        self.request(|reply| Command::Action(Action::CreateGroup(new, reply)))
    }

    pub fn update_group(&self, group: DeviceGroup) -> Result<DeviceGroup> {
        self.request(|reply| Command::Action(Action::UpdateGroup(group, reply)))
    }

    pub fn delete_group(&self, id: &GroupId) -> Result<()> {
        let id = id.clone();
        self.request(|reply| Command::Action(Action::DeleteGroup(id, reply)))
    }

    pub fn cycle_group(&self, id: &GroupId) -> Result<CycleOutcome> {
        let id = id.clone();
        self.request(|reply| Command::Action(Action::CycleGroup(id, reply)))
    }

    pub fn select_device(&self, id: &GroupId, index: usize) -> Result<GroupDevice> {
        let id = id.clone();
        self.request(|reply| Command::Action(Action::SelectDevice(id, index, reply)))
    }

    pub fn update_settings(&self, settings: AppSettings) -> Result<AppSettings> {
        self.request(|reply| Command::Action(Action::UpdateSettings(settings, reply)))
    }

    /// Refetch everything and wait for it to land
    pub fn refresh(&self) -> Result<RefreshOutcome> {
        self.request(Command::Refresh)
    }

    pub fn clear_error(&self) {
        let _ = self.command_tx.send(Command::ClearError);
    }

    /// Shutdown the background worker
    ///
    /// Called automatically on drop, but can be called manually for graceful shutdown.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(Command::Shutdown);
    }

    fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.command_tx
            .send(make(reply_tx))
            .map_err(|_| SyncError::WorkerDisconnected)?;
        reply_rx.recv().map_err(|_| SyncError::WorkerDisconnected)?
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        tracing::debug!("SyncHandle dropping");
        let _ = self.command_tx.send(Command::Shutdown);
    }
}
