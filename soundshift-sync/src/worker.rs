//! Background worker thread for the sync controller
//!
//! Spawns a thread with its own tokio runtime that owns the
//! [`SyncController`] and exposes it to the sync [`SyncHandle`](crate::SyncHandle)
//! through a command channel and a watch channel carrying the latest view.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use group_store::{AppSettings, DeviceGroup, GroupDevice, GroupId, NewGroup};
use soundshift_backend::{CommandInterface, Notification};
use soundshift_state::CycleOutcome;
use tokio::sync::{mpsc as async_mpsc, watch};

use crate::config::SyncConfig;
use crate::controller::{RefreshOutcome, RefreshTrigger, SyncController};
use crate::error::Result;
use crate::snapshot::SyncView;

/// Reply channel for one request
pub type Reply<T> = mpsc::Sender<Result<T>>;

/// A user action and where to send its result
#[derive(Debug)]
pub enum Action {
    CreateGroup(NewGroup, Reply<DeviceGroup>),
    UpdateGroup(DeviceGroup, Reply<DeviceGroup>),
    DeleteGroup(GroupId, Reply<()>),
    CycleGroup(GroupId, Reply<CycleOutcome>),
    SelectDevice(GroupId, usize, Reply<GroupDevice>),
    UpdateSettings(AppSettings, Reply<AppSettings>),
}

/// Commands sent from the sync handle to the background worker
#[derive(Debug)]
pub enum Command {
    /// Run a user action through the controller
    Action(Action),
    /// Refetch and reply once applied
    Refresh(Reply<RefreshOutcome>),
    /// Dismiss the last error
    ClearError,
    /// Shutdown the worker
    Shutdown,
}

/// Spawns the background sync worker thread
///
/// The worker owns its own tokio runtime and manages:
/// - The SyncController (async)
/// - Backend notifications
/// - Publishing the view after every change
pub fn spawn_sync_worker(
    commands: Arc<dyn CommandInterface>,
    notifications: async_mpsc::Receiver<Notification>,
    config: SyncConfig,
    command_rx: mpsc::Receiver<Command>,
    view_tx: watch::Sender<SyncView>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!("Failed to create tokio runtime for sync worker: {}", e);
                return;
            }
        };

        rt.block_on(async {
            run_sync_loop(commands, notifications, config, command_rx, view_tx).await;
        });
    })
}

/// Main loop running inside the tokio runtime
async fn run_sync_loop(
    commands: Arc<dyn CommandInterface>,
    mut notifications: async_mpsc::Receiver<Notification>,
    config: SyncConfig,
    command_rx: mpsc::Receiver<Command>,
    view_tx: watch::Sender<SyncView>,
) {
    let poll_interval = config.command_poll_interval;
    let mut controller = SyncController::new(commands, config);
    controller.request_refresh(RefreshTrigger::InitialLoad);

    tracing::info!("Sync worker started");

    loop {
        tokio::select! {
            Some(notification) = notifications.recv() => {
                controller.handle_notification(notification);
            }

            Some(completed) = controller.next_completed(), if controller.has_in_flight() => {
                // Failures are recorded on the controller and surface in the view
                let _ = controller.apply_fetch(completed);
                view_tx.send_replace(controller.view());
            }

            // Process commands (poll periodically)
            _ = tokio::time::sleep(poll_interval) => {
                while let Ok(cmd) = command_rx.try_recv() {
                    match cmd {
                        Command::Action(action) => {
                            run_action(&mut controller, action).await;
                            view_tx.send_replace(controller.view());
                        }
                        Command::Refresh(reply) => {
                            let outcome = controller.refresh(RefreshTrigger::Manual).await;
                            view_tx.send_replace(controller.view());
                            let _ = reply.send(outcome);
                        }
                        Command::ClearError => {
                            controller.clear_error();
                            view_tx.send_replace(controller.view());
                        }
                        Command::Shutdown => {
                            tracing::info!("Sync worker received shutdown command");
                            return;
                        }
                    }
                }
            }
        }
    }
}

async fn run_action(controller: &mut SyncController, action: Action) {
    tracing::debug!("Worker: running {:?}", action);

    // A dropped reply means the caller gave up waiting
    match action {
        Action::CreateGroup(new, reply) => {
            let _ = reply.send(controller.create_group(new).await);
        }
        Action::UpdateGroup(group, reply) => {
            let _ = reply.send(controller.update_group(group).await);
        }
        Action::DeleteGroup(id, reply) => {
            let _ = reply.send(controller.delete_group(&id).await);
        }
        Action::CycleGroup(id, reply) => {
            let _ = reply.send(controller.cycle_group(&id).await);
        }
        Action::SelectDevice(id, index, reply) => {
            let _ = reply.send(controller.select_device(&id, index).await);
        }
        Action::UpdateSettings(settings, reply) => {
            let _ = reply.send(controller.update_settings(settings).await);
        }
    }
}
