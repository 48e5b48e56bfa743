// ── Controller abstraction ──
//
// Full lifecycle management for one base-station connection.
// Handles authentication, background polling, serialized mutations,
// and reactive state publishing through the DataStore.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::{Mutex, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use solidcom_api::DeviceClient;

use crate::command::transform::{
    assign_channel, assign_role, find_role, rename_headset, set_talk_mode,
};
use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::DeviceConfig;
use crate::error::CoreError;
use crate::feedback::FeedbackInvalidation;
use crate::model::{BusLabel, ChannelTarget, HeadsetSelector, TalkMode};
use crate::poller::Poller;
use crate::status::{DeviceStatus, StatusPublisher};
use crate::store::DataStore;
use crate::variables::VariableSet;

const COMMAND_CHANNEL_SIZE: usize = 64;
const INVALIDATION_CHANNEL_SIZE: usize = 64;

// ── Controller ───────────────────────────────────────────────────────

/// The main entry point for hosts.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Manages the connection
/// lifecycle: login, background polling, the mutation queue, and status
/// publishing.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ArcSwap<DeviceConfig>,
    store: Arc<DataStore>,
    status: StatusPublisher,
    invalidation_tx: broadcast::Sender<FeedbackInvalidation>,
    /// `None` while disconnected; enqueueing then fails immediately.
    command_tx: Mutex<Option<mpsc::Sender<CommandEnvelope>>>,
    cancel: CancellationToken,
    /// Child token for the current connection. Cancelled on disconnect,
    /// replaced on connect.
    cancel_child: Mutex<CancellationToken>,
    client: Mutex<Option<Arc<DeviceClient>>>,
    poller: Mutex<Option<Poller>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Create a controller. Does NOT connect; call
    /// [`connect()`](Self::connect) to log in and start background tasks.
    pub fn new(config: DeviceConfig) -> Self {
        let (invalidation_tx, _) = broadcast::channel(INVALIDATION_CHANNEL_SIZE);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(ControllerInner {
                config: ArcSwap::from_pointee(config),
                store: Arc::new(DataStore::new()),
                status: StatusPublisher::new(),
                invalidation_tx,
                command_tx: Mutex::new(None),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                client: Mutex::new(None),
                poller: Mutex::new(None),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The configuration the next `connect()` will use.
    pub fn config(&self) -> Arc<DeviceConfig> {
        self.inner.config.load_full()
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Connection lifecycle ─────────────────────────────────────────

    /// Log in and start the command processor and poller.
    ///
    /// An existing connection is torn down first. The initial refresh is
    /// attempted but its failure does not fail the connect; the status
    /// reflects it instead.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.teardown().await;
        self.inner.status.publish(DeviceStatus::Connecting);

        let config = self.inner.config.load_full();
        let client = match login(&config).await {
            Ok(client) => Arc::new(client),
            Err(e) => {
                self.inner.status.publish_error(&e);
                return Err(e);
            }
        };
        *self.inner.client.lock().await = Some(client);
        self.inner.status.publish(DeviceStatus::Ok);
        info!(host = %config.host, "connected to base station");

        // Fresh child token for this connection (supports reconnect).
        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        *self.inner.command_tx.lock().await = Some(tx);
        self.inner
            .task_handles
            .lock()
            .await
            .push(tokio::spawn(command_processor_task(
                self.clone(),
                rx,
                child.clone(),
            )));

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "initial refresh failed (non-fatal)");
        }

        if config.poll_interval.is_zero() {
            debug!("polling disabled");
        } else {
            let ctrl = self.clone();
            let poller = Poller::spawn(config.poll_interval, &child, move || {
                let ctrl = ctrl.clone();
                async move { ctrl.poll_once().await }
            });
            *self.inner.poller.lock().await = Some(poller);
        }

        Ok(())
    }

    /// Stop background work and drop the session.
    ///
    /// Queued mutations resolve with `ControllerDisconnected`; one already
    /// running completes first. The cache is kept.
    pub async fn disconnect(&self) {
        self.teardown().await;
        self.inner.status.reset(DeviceStatus::Unknown {
            message: "disconnected".into(),
        });
        debug!("disconnected");
    }

    /// Drop the session and log in again with the current configuration.
    pub async fn reconnect(&self) -> Result<(), CoreError> {
        info!("reconnecting");
        self.connect().await
    }

    /// Swap in a new configuration, discard cached state, and connect.
    pub async fn reconfigure(&self, config: DeviceConfig) -> Result<(), CoreError> {
        self.teardown().await;
        self.inner.config.store(Arc::new(config));
        self.inner.store.clear();
        self.connect().await
    }

    async fn teardown(&self) {
        // Stop accepting commands before cancelling the worker.
        *self.inner.command_tx.lock().await = None;
        self.inner.cancel_child.lock().await.cancel();

        if let Some(poller) = self.inner.poller.lock().await.take() {
            poller.stop().await;
        }

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        if let Some(client) = self.inner.client.lock().await.take() {
            client.logout();
        }
    }

    /// Whether a logged-in session is currently held.
    pub async fn is_connected(&self) -> bool {
        self.inner
            .client
            .lock()
            .await
            .as_ref()
            .is_some_and(|c| c.is_authenticated())
    }

    async fn client(&self) -> Result<Arc<DeviceClient>, CoreError> {
        self.inner
            .client
            .lock()
            .await
            .clone()
            .ok_or(CoreError::ControllerDisconnected)
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Fetch pack info and roles and replace whichever succeeded in the
    /// cache. A failed half leaves its previous value in place.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let client = self.client().await?;
        let (pack, roles) = tokio::join!(client.fetch_pack_info(), client.fetch_roles());

        let mut failure = None;
        match pack {
            Ok(pack) => {
                self.inner.store.apply_pack(pack);
                let _ = self
                    .inner
                    .invalidation_tx
                    .send(FeedbackInvalidation::Refreshed);
            }
            Err(e) => failure = Some(CoreError::from(e)),
        }
        match roles {
            Ok(roles) => self.inner.store.apply_roles(roles),
            Err(e) => {
                let e = CoreError::from(e);
                if failure.is_some() {
                    debug!(error = %e, "role refresh also failed");
                } else {
                    failure = Some(e);
                }
            }
        }

        match failure {
            None => {
                self.inner.status.publish(DeviceStatus::Ok);
                Ok(())
            }
            Some(e) => {
                self.inner.status.publish_error(&e);
                Err(e)
            }
        }
    }

    async fn poll_once(&self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "periodic refresh failed; keeping previous snapshot");
        }
    }

    // ── Command execution ────────────────────────────────────────────

    /// Queue a mutation and wait for its outcome.
    ///
    /// Mutations run strictly in submission order, one at a time.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let command_tx = self
            .inner
            .command_tx
            .lock()
            .await
            .clone()
            .ok_or(CoreError::ControllerDisconnected)?;

        let (tx, rx) = tokio::sync::oneshot::channel();
        command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::ControllerDisconnected)?;

        rx.await.map_err(|_| CoreError::ControllerDisconnected)?
    }

    pub async fn rename_headset(
        &self,
        headset: impl Into<HeadsetSelector>,
        name: impl Into<String>,
    ) -> Result<CommandResult, CoreError> {
        self.execute(Command::RenameHeadset {
            headset: headset.into(),
            name: name.into(),
        })
        .await
    }

    pub async fn set_headset_channel(
        &self,
        headset: impl Into<HeadsetSelector>,
        bus: BusLabel,
        target: ChannelTarget,
    ) -> Result<CommandResult, CoreError> {
        self.execute(Command::SetHeadsetChannel {
            headset: headset.into(),
            bus,
            target,
        })
        .await
    }

    pub async fn set_headset_role(
        &self,
        headset: impl Into<HeadsetSelector>,
        role: impl Into<String>,
        head: bool,
    ) -> Result<CommandResult, CoreError> {
        self.execute(Command::SetHeadsetRole {
            headset: headset.into(),
            role: role.into(),
            head,
        })
        .await
    }

    pub async fn set_headset_talk_mode(
        &self,
        headset: impl Into<HeadsetSelector>,
        mode: TalkMode,
    ) -> Result<CommandResult, CoreError> {
        self.execute(Command::SetHeadsetTalkMode {
            headset: headset.into(),
            mode,
        })
        .await
    }

    // ── One-shot convenience ─────────────────────────────────────────

    /// One-shot: connect, run closure, disconnect.
    ///
    /// Polling is disabled since only a single request-response cycle is
    /// needed.
    pub async fn oneshot<F, Fut, T>(config: DeviceConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.poll_interval = Duration::ZERO;

        let controller = Controller::new(cfg);
        controller.connect().await?;
        let result = f(controller.clone()).await;
        controller.disconnect().await;
        result
    }

    // ── State observation ────────────────────────────────────────────

    pub fn status(&self) -> watch::Receiver<DeviceStatus> {
        self.inner.status.subscribe()
    }

    pub fn current_status(&self) -> DeviceStatus {
        self.inner.status.current()
    }

    pub fn variables(&self) -> watch::Receiver<Arc<VariableSet>> {
        self.inner.store.subscribe_variables()
    }

    /// Signals that feedback derived from the cache should be recomputed.
    pub fn feedback_invalidations(&self) -> broadcast::Receiver<FeedbackInvalidation> {
        self.inner.invalidation_tx.subscribe()
    }
}

async fn login(config: &DeviceConfig) -> Result<DeviceClient, CoreError> {
    config.validate()?;
    let client = DeviceClient::new(&config.host, &config.transport())?;
    client.login(&config.username, &config.password).await?;
    Ok(client)
}

// ── Background tasks ─────────────────────────────────────────────────

/// Drain the command channel one envelope at a time. Cancellation is only
/// observed between commands, so a dequeued command always completes.
async fn command_processor_task(
    controller: Controller,
    mut rx: mpsc::Receiver<CommandEnvelope>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = run_command(&controller, envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
    debug!("command processor stopped");
}

async fn run_command(controller: &Controller, cmd: Command) -> Result<CommandResult, CoreError> {
    let kind = cmd.kind();
    let selector = cmd.headset().clone();
    let result = match controller.client().await {
        Ok(client) => read_modify_write(&client, &controller.inner.store, cmd).await,
        Err(e) => Err(e),
    };

    match &result {
        Ok(outcome) => {
            controller.inner.status.publish(DeviceStatus::Ok);
            let _ = controller
                .inner
                .invalidation_tx
                .send(FeedbackInvalidation::Mutated {
                    headset_id: outcome.headset_id(),
                });
            info!(kind, headset = %selector, headset_id = outcome.headset_id(), "mutation committed");
        }
        Err(e) => {
            controller.inner.status.publish_error(e);
            warn!(kind, headset = %selector, error = %e, "mutation failed");
        }
    }
    result
}

// ── Read-modify-write ────────────────────────────────────────────────

/// Fetch the current tree, apply `cmd` to it, push it back, and cache
/// what was pushed.
async fn read_modify_write(
    client: &DeviceClient,
    store: &DataStore,
    cmd: Command,
) -> Result<CommandResult, CoreError> {
    let mut pack = client.fetch_pack_info().await?;
    store.apply_pack(pack.clone());

    match cmd {
        Command::RenameHeadset { headset, name } => {
            let id = rename_headset(&mut pack, &headset, &name)?;
            client.push_pack_info(&pack).await?;
            store.apply_pack(pack);
            Ok(CommandResult::Ok { headset_id: id })
        }
        Command::SetHeadsetChannel {
            headset,
            bus,
            target,
        } => {
            let id = assign_channel(&mut pack, &headset, bus, target)?;
            client.push_pack_info(&pack).await?;
            store.apply_pack(pack);
            Ok(CommandResult::Ok { headset_id: id })
        }
        Command::SetHeadsetTalkMode { headset, mode } => {
            let id = set_talk_mode(&mut pack, &headset, mode)?;
            client.push_pack_info(&pack).await?;
            store.apply_pack(pack);
            Ok(CommandResult::Ok { headset_id: id })
        }
        Command::SetHeadsetRole {
            headset,
            role,
            head,
        } => {
            let roles = client.fetch_roles().await?;
            store.apply_roles(roles.clone());
            let role = find_role(&roles, &role)?;

            let id = assign_role(&mut pack, &headset, role, head)?;
            client.push_pack_info(&pack).await?;
            store.apply_pack(pack);

            match client.push_role(&role.taking_effect(head)).await {
                Ok(()) => Ok(CommandResult::Ok { headset_id: id }),
                Err(e) => {
                    warn!(role = %role.name, error = %e, "role push failed after pack update");
                    Ok(CommandResult::PartialSuccess {
                        headset_id: id,
                        warning: format!("headset updated but role activation failed: {e}"),
                    })
                }
            }
        }
    }
}
