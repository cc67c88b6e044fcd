//! Session supervisor: the single task that runs the watchdog.
//!
//! Activity is written to the durable store by the caller before its
//! command is queued, and pending commands are handled before the next tick,
//! so a tick always sees activity recorded ahead of it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use classgate_core::config::AppConfig;
use classgate_core::error::AppError;
use classgate_core::traits::auth_provider::AuthProvider;
use classgate_core::traits::navigator::Navigator;

use crate::activity::{ActivityMonitor, ActivitySignal};
use crate::refresher::{Extended, RefreshFailed, SessionRefresher};
use crate::signout::{ForcedSignOut, SignOutReason};
use crate::store::SessionStore;
use crate::watchdog::{ExpiryWatchdog, TickOutcome, WatchdogState};

#[derive(Debug)]
enum Command {
    Activity,
    StaySignedIn(oneshot::Sender<Result<Extended, RefreshFailed>>),
    SignOut(oneshot::Sender<()>),
}

/// Owns the session lifecycle for one client context until it is spawned.
#[derive(Debug)]
pub struct SessionSupervisor {
    monitor: Arc<ActivityMonitor>,
    watchdog: ExpiryWatchdog,
    refresher: SessionRefresher,
    signout: ForcedSignOut,
    poll_interval: Duration,
}

impl SessionSupervisor {
    /// Wires the lifecycle components from configuration.
    pub fn new(
        store: Arc<SessionStore>,
        provider: Arc<dyn AuthProvider>,
        navigator: Arc<dyn Navigator>,
        config: &AppConfig,
    ) -> Self {
        let call_timeout = config.auth_service.request_timeout();
        Self {
            monitor: Arc::new(ActivityMonitor::new(
                store.clone(),
                config.session.activity_write_interval(),
            )),
            watchdog: ExpiryWatchdog::from_config(store.clone(), &config.session),
            refresher: SessionRefresher::new(store.clone(), provider.clone(), call_timeout),
            signout: ForcedSignOut::new(
                store,
                provider,
                navigator,
                config.routes.sign_in_path.clone(),
                call_timeout,
            ),
            poll_interval: config.session.poll_interval(),
        }
    }

    /// Starts the supervisor task.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(self) -> SupervisorHandle {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(self.watchdog.state());
        let cancel = CancellationToken::new();
        let monitor = self.monitor.clone();

        let task = tokio::spawn(self.run(command_rx, state_tx, cancel.clone()));

        SupervisorHandle {
            commands,
            state: state_rx,
            monitor,
            cancel,
            task: Some(task),
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        state: watch::Sender<WatchdogState>,
        cancel: CancellationToken,
    ) -> Option<SignOutReason> {
        if let Err(e) = self.watchdog.start() {
            warn!(error = %e, "Could not stamp initial activity");
        }

        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Session supervisor stopped");
                    return None;
                }
                Some(command) = commands.recv() => match command {
                    Command::Activity => {
                        publish(&state, self.watchdog.on_activity());
                    }
                    Command::StaySignedIn(reply) => match self.refresher.refresh().await {
                        Ok(extended) => {
                            publish(&state, self.watchdog.reset());
                            let _ = reply.send(Ok(extended));
                        }
                        Err(e) => {
                            self.signout.sign_out(SignOutReason::RefreshFailed).await;
                            let _ = reply.send(Err(e));
                            return Some(SignOutReason::RefreshFailed);
                        }
                    },
                    Command::SignOut(reply) => {
                        self.signout.sign_out(SignOutReason::UserRequested).await;
                        let _ = reply.send(());
                        return Some(SignOutReason::UserRequested);
                    }
                },
                _ = ticker.tick() => {
                    let outcome = self.watchdog.tick();
                    publish(&state, outcome);
                    if outcome.is_expiry() {
                        self.signout.sign_out(SignOutReason::Expired).await;
                        return Some(SignOutReason::Expired);
                    }
                }
            }
        }
    }
}

fn publish(state: &watch::Sender<WatchdogState>, outcome: TickOutcome) {
    if let TickOutcome::Changed(next) = outcome {
        debug!(state = ?next, "Publishing watchdog state");
        state.send_replace(next);
    }
}

/// Handle to a running supervisor. Dropping it stops the task.
#[derive(Debug)]
pub struct SupervisorHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<WatchdogState>,
    monitor: Arc<ActivityMonitor>,
    cancel: CancellationToken,
    task: Option<JoinHandle<Option<SignOutReason>>>,
}

impl SupervisorHandle {
    /// Records user activity in this context. Ignored once the supervisor
    /// has stopped.
    pub fn activity(&self, signal: ActivitySignal) {
        if self.cancel.is_cancelled() || self.commands.is_closed() {
            debug!(signal = %signal, "Supervisor stopped; activity ignored");
            return;
        }
        self.monitor.record(signal);
        let _ = self.commands.send(Command::Activity);
    }

    /// The "stay signed in" action. On failure the session is already
    /// signed out when this returns.
    pub async fn stay_signed_in(&self) -> Result<Extended, RefreshFailed> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::StaySignedIn(reply))
            .map_err(|_| RefreshFailed(AppError::session("Session supervisor has stopped")))?;
        response
            .await
            .map_err(|_| RefreshFailed(AppError::session("Session supervisor has stopped")))?
    }

    /// User-initiated sign-out. Returns once the client has been redirected.
    pub async fn sign_out(&self) {
        let (reply, done) = oneshot::channel();
        if self.commands.send(Command::SignOut(reply)).is_ok() {
            let _ = done.await;
        }
    }

    /// Latest published state.
    pub fn state(&self) -> WatchdogState {
        *self.state.borrow()
    }

    /// A receiver for state changes, for the UI.
    pub fn subscribe(&self) -> watch::Receiver<WatchdogState> {
        self.state.clone()
    }

    /// Waits for the task to finish and returns why the session ended, or
    /// `None` if it was shut down first.
    pub async fn finished(mut self) -> Option<SignOutReason> {
        let task = self.task.take()?;
        match task.await {
            Ok(reason) => reason,
            Err(e) => {
                warn!(error = %e, "Session supervisor task failed");
                None
            }
        }
    }

    /// Stops the task and waits for it. No timer fires afterwards.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SupervisorHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
