//! The sync controller
//!
//! Keeps a local copy of backend state and decides when it is replaced:
//!
//! - every refresh fetches groups, devices and settings together and
//!   replaces local state wholesale
//! - every fetch carries a [`FetchTicket`]; only the latest may be applied
//! - user actions are validated locally, applied optimistically, sent as a
//!   command, then confirmed by a refresh or rolled back on failure

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use group_store::{validate, AppSettings, DeviceGroup, GroupDevice, GroupId, NewGroup};
use soundshift_backend::{CommandError, CommandInterface, Notification, SwitchEvent};
use soundshift_state::CycleOutcome;
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::sequence::{FetchTicket, SequenceCounter};
use crate::snapshot::{Snapshot, SyncView};
use crate::transaction::TransactionLog;

/// Why a refresh was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    InitialLoad,
    DevicesChanged,
    DeviceSwitched,
    AfterCommand,
    Manual,
}

/// What happened to a completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Local state was replaced
    Applied,
    /// A newer fetch was issued meanwhile; the response was dropped
    Stale,
}

/// A fetch that has finished, successfully or not
#[derive(Debug)]
pub struct CompletedFetch {
    pub ticket: FetchTicket,
    pub trigger: RefreshTrigger,
    pub result: Result<Snapshot>,
}

/// Local mirror of backend state
///
/// # Example
///
/// ```rust,ignore
/// let mut controller = SyncController::new(backend, SyncConfig::default());
/// controller.refresh(RefreshTrigger::InitialLoad).await?;
///
/// controller.cycle_group(&group_id).await?;
/// for group in controller.view().groups {
///     println!("{}: {}/{} online", group.group.name, group.online_count(), group.slots.len());
/// }
/// ```
pub struct SyncController {
    commands: Arc<dyn CommandInterface>,
    config: SyncConfig,
    log: TransactionLog,
    sequence: SequenceCounter,
    in_flight: FuturesUnordered<BoxFuture<'static, CompletedFetch>>,
    loaded: bool,
    last_error: Option<SyncError>,
    last_switch: Option<SwitchEvent>,
}

impl SyncController {
    pub fn new(commands: Arc<dyn CommandInterface>, config: SyncConfig) -> Self {
        Self {
            commands,
            config,
            log: TransactionLog::new(),
            sequence: SequenceCounter::new(),
            in_flight: FuturesUnordered::new(),
            loaded: false,
            last_error: None,
            last_switch: None,
        }
    }

    // ========================================================================
    // State access
    // ========================================================================

    /// Pending optimistic state if any, else authoritative state
    pub fn state(&self) -> &Snapshot {
        self.log.visible()
    }

    pub fn authoritative(&self) -> &Snapshot {
        self.log.authoritative()
    }

    pub fn has_pending(&self) -> bool {
        self.log.has_pending()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn last_error(&self) -> Option<&SyncError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn last_switch(&self) -> Option<&SwitchEvent> {
        self.last_switch.as_ref()
    }

    /// Render-ready projection of the visible state
    pub fn view(&self) -> SyncView {
        let state = self.state();
        SyncView {
            groups: state.reconciled(),
            devices: state.devices.clone(),
            settings: state.settings,
            loaded: self.loaded,
            pending: self.has_pending(),
            last_error: self.last_error.as_ref().map(SyncError::user_message),
            last_switch: self.last_switch.clone(),
        }
    }

    // ========================================================================
    // Refresh
    // ========================================================================

    /// Start a fetch without waiting for it
    pub fn request_refresh(&mut self, trigger: RefreshTrigger) -> FetchTicket {
        let ticket = self.sequence.issue();
        debug!("Refresh {} requested ({:?})", ticket, trigger);

        let commands = Arc::clone(&self.commands);
        let timeout = self.config.fetch_timeout;
        let fetch = async move {
            let fetch = async {
                let (groups, devices, settings) = tokio::try_join!(
                    commands.list_groups(),
                    commands.list_devices(),
                    commands.get_settings()
                )?;
                Ok::<_, CommandError>(Snapshot { groups, devices, settings })
            };

            let result = match tokio::time::timeout(timeout, fetch).await {
                Ok(result) => result.map_err(SyncError::from),
                Err(_) => Err(SyncError::timed_out("refresh", timeout)),
            };
            CompletedFetch { ticket, trigger, result }
        };

        self.in_flight.push(fetch.boxed());
        ticket
    }

    pub fn has_in_flight(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Wait for the next in-flight fetch to finish
    ///
    /// Returns `None` when nothing is in flight. Cancel safe.
    pub async fn next_completed(&mut self) -> Option<CompletedFetch> {
        self.in_flight.next().await
    }

    /// Apply a finished fetch if it is still the latest
    ///
    /// A failed fetch leaves local state unchanged and is recorded as the
    /// last error.
    pub fn apply_fetch(&mut self, completed: CompletedFetch) -> Result<RefreshOutcome> {
        if !self.sequence.is_latest(completed.ticket) {
            debug!(
                "Dropping stale refresh {} ({:?}), latest is {:?}",
                completed.ticket,
                completed.trigger,
                self.sequence.latest()
            );
            return Ok(RefreshOutcome::Stale);
        }

        match completed.result {
            Ok(snapshot) => {
                debug!(
                    "Applied refresh {}: {} groups, {} devices",
                    completed.ticket,
                    snapshot.groups.len(),
                    snapshot.devices.len()
                );
                self.log.adopt(snapshot);
                self.loaded = true;
                Ok(RefreshOutcome::Applied)
            }
            Err(e) => {
                warn!("Refresh {} failed: {}", completed.ticket, e);
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Fetch and wait until that fetch has been applied or dropped
    ///
    /// Other fetches that finish first are applied (or dropped) on the way.
    pub async fn refresh(&mut self, trigger: RefreshTrigger) -> Result<RefreshOutcome> {
        let ticket = self.request_refresh(trigger);

        while let Some(completed) = self.next_completed().await {
            let ours = completed.ticket == ticket;
            let outcome = self.apply_fetch(completed);
            if ours {
                return outcome;
            }
        }

        Ok(RefreshOutcome::Stale)
    }

    /// React to a backend notification by scheduling a refetch
    pub fn handle_notification(&mut self, notification: Notification) -> FetchTicket {
        debug!("Notification: {}", notification.tag());
        match notification {
            Notification::DevicesChanged => self.request_refresh(RefreshTrigger::DevicesChanged),
            Notification::DeviceSwitched(event) => {
                info!("{}", event.message());
                self.last_switch = Some(event);
                self.request_refresh(RefreshTrigger::DeviceSwitched)
            }
        }
    }

    // ========================================================================
    // User actions
    // ========================================================================

    pub async fn create_group(&mut self, new: NewGroup) -> Result<DeviceGroup> {
        self.validate(&new.name, &new.devices)?;

        let optimistic = self.state().with_created(&new);
        let commands = Arc::clone(&self.commands);
        self.run("create_group", optimistic, async move { commands.create_group(new).await })
            .await
    }

    pub async fn update_group(&mut self, group: DeviceGroup) -> Result<DeviceGroup> {
        self.validate(&group.name, &group.devices)?;

        let optimistic = self.state().with_updated(&group);
        let commands = Arc::clone(&self.commands);
        self.run("update_group", optimistic, async move { commands.update_group(group).await })
            .await
    }

    pub async fn delete_group(&mut self, id: &GroupId) -> Result<()> {
        let optimistic = self.state().with_deleted(id);
        let commands = Arc::clone(&self.commands);
        let id = id.clone();
        self.run("delete_group", optimistic, async move { commands.delete_group(&id).await })
            .await
    }

    pub async fn cycle_group(&mut self, id: &GroupId) -> Result<CycleOutcome> {
        let optimistic = self.state().with_cycled(id);
        let commands = Arc::clone(&self.commands);
        let id = id.clone();
        self.run("cycle_group", optimistic, async move { commands.cycle_group(&id).await })
            .await
    }

    pub async fn select_device(&mut self, id: &GroupId, index: usize) -> Result<GroupDevice> {
        let optimistic = self.state().with_selected(id, index);
        let commands = Arc::clone(&self.commands);
        let id = id.clone();
        self.run("select_device", optimistic, async move {
            commands.select_group_device(&id, index).await
        })
        .await
    }

    pub async fn update_settings(&mut self, settings: AppSettings) -> Result<AppSettings> {
        let optimistic = self.state().with_settings(settings);
        let commands = Arc::clone(&self.commands);
        self.run("update_settings", optimistic, async move {
            commands.update_settings(settings).await
        })
        .await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn validate(&mut self, name: &str, devices: &[GroupDevice]) -> Result<()> {
        validate::validate_group(name, devices).map(|_| ()).map_err(|e| {
            let err = SyncError::Validation(e);
            self.last_error = Some(err.clone());
            err
        })
    }

    /// Optimistic-then-reconcile around one command
    ///
    /// The command runs as its own task. An issued command cannot be
    /// cancelled: on timeout the task is detached and finishes on its own,
    /// and its late effects reach local state through later refreshes.
    async fn run<T, F>(&mut self, label: &'static str, optimistic: Snapshot, command: F) -> Result<T>
    where
        T: Send + 'static,
        F: Future<Output = std::result::Result<T, CommandError>> + Send + 'static,
    {
        self.log.begin(label, optimistic);

        let timeout = self.config.fetch_timeout;
        let mut task = tokio::spawn(command);
        let result = match tokio::time::timeout(timeout, &mut task).await {
            Ok(Ok(result)) => result.map_err(SyncError::from),
            Ok(Err(join_err)) => Err(SyncError::Command(CommandError::Failure(format!(
                "{} did not complete: {}",
                label, join_err
            )))),
            Err(_) => {
                debug!("Command '{}' left running after timeout", label);
                Err(SyncError::timed_out(label, timeout))
            }
        };

        match result {
            Ok(value) => {
                debug!("Command '{}' succeeded", label);
                self.last_error = None;
                let refreshed = self.refresh(RefreshTrigger::AfterCommand).await;
                self.log.settle();
                if let Err(e) = refreshed {
                    warn!("Refresh after '{}' failed: {}", label, e);
                }
                Ok(value)
            }
            Err(e) => {
                warn!("Command '{}' failed: {}", label, e);
                self.log.rollback();
                if let Err(refresh_err) = self.refresh(RefreshTrigger::AfterCommand).await {
                    warn!("Refresh after failed '{}' also failed: {}", label, refresh_err);
                }
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }
}
