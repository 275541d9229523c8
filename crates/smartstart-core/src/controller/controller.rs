//! Delayed start/stop scheduling for the host recorder.
//!
//! A single worker task owns the timer. Callers publish the pending action
//! through a `watch` channel, which gives "latest request wins" semantics for
//! free: the worker only ever looks at the newest value, and any change while
//! it is counting down aborts the countdown. Recorder calls from the caller
//! side (immediate actions, live queries) and from the worker (delayed
//! actions) are serialized by the [`RecorderGate`].

use crate::{
    CoreError, CoreResult, RecordingAction,
    controller::{ControllerPhase, PendingAction, Recorder, RecorderGate, RecordingStatus},
};

use std::{
    panic::Location,
    sync::{Arc, Mutex},
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};
use tracing::{debug, error, info, instrument, warn};

/// How long [`RecordingController::shutdown`] waits for the worker to exit.
const WORKER_JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Starts and stops the recording, either immediately or after a delay.
///
/// # Thread Safety
///
/// Every method except [`shutdown`](Self::shutdown) is synchronous and may be
/// called from any thread, including host callback threads that are not
/// part of the tokio runtime. At most one delayed action is pending at any
/// time; each request cancels whatever was pending before it.
pub struct RecordingController {
    gate: Arc<RecorderGate>,
    pending_tx: Arc<watch::Sender<Option<PendingAction>>>,
    shutdown_tx: watch::Sender<bool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RecordingController {
    /// Create a controller whose worker runs on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoRuntime`] when called outside a tokio runtime.
    #[track_caller]
    pub fn new(recorder: Arc<dyn Recorder>) -> CoreResult<Self> {
        let handle = Handle::try_current().map_err(|e| CoreError::NoRuntime {
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self::with_handle(recorder, &handle))
    }

    /// Create a controller whose worker runs on `handle`.
    #[instrument(skip_all)]
    pub fn with_handle(recorder: Arc<dyn Recorder>, handle: &Handle) -> Self {
        let gate = Arc::new(RecorderGate::new(recorder));
        let (pending_tx, pending_rx) = watch::channel(None);
        let pending_tx = Arc::new(pending_tx);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let worker = Worker {
            gate: Arc::clone(&gate),
            pending_tx: Arc::clone(&pending_tx),
            pending_rx,
            shutdown_rx,
        };
        let join = handle.spawn(worker.run());

        info!("RecordingController initialized");

        Self {
            gate,
            pending_tx,
            shutdown_tx,
            worker: Mutex::new(Some(join)),
        }
    }

    /// Request `action` after `delay`.
    ///
    /// Any pending action is canceled first, whatever its direction. A zero
    /// delay performs the action on the calling thread before returning. A
    /// non-zero delay arms the worker unless the recorder is already in the
    /// requested state.
    #[instrument(skip(self))]
    pub fn request(&self, action: RecordingAction, delay: Duration) {
        self.cancel();

        if *self.shutdown_tx.borrow() {
            warn!(action = %action, "Controller shutting down, request ignored");
            return;
        }

        if delay.is_zero() {
            self.gate.perform(action);
            info!(action = %action, "Immediate action performed");
            return;
        }

        let status = self.gate.status();
        if status.satisfies(action) {
            debug!(action = %action, status = %status, "Recorder already in requested state");
            return;
        }

        let pending = PendingAction::new(action, delay);
        self.pending_tx.send_replace(Some(pending));

        info!(
            action_id = %pending.id,
            action = %action,
            delay_ms = delay.as_millis(),
            "Delayed action armed"
        );
    }

    /// Request a recording start after `delay`.
    pub fn request_start(&self, delay: Duration) {
        self.request(RecordingAction::Start, delay);
    }

    /// Request a recording stop after `delay`.
    pub fn request_stop(&self, delay: Duration) {
        self.request(RecordingAction::Stop, delay);
    }

    /// Cancel the pending action, if any.
    ///
    /// Returns whether something was canceled. An action whose timer already
    /// elapsed and which is being performed is not affected.
    pub fn cancel(&self) -> bool {
        let mut canceled = None;
        self.pending_tx.send_if_modified(|pending| {
            canceled = pending.take();
            canceled.is_some()
        });

        match canceled {
            Some(pending) => {
                info!(
                    action_id = %pending.id,
                    action = %pending.action,
                    remaining_ms = pending.remaining().as_millis(),
                    "Pending action canceled"
                );
                true
            }
            None => false,
        }
    }

    /// Live recorder state. Does not look at the pending action.
    pub fn current_state(&self) -> RecordingStatus {
        self.gate.status()
    }

    /// The action currently counting down, if any.
    pub fn pending(&self) -> Option<PendingAction> {
        *self.pending_tx.borrow()
    }

    /// Current scheduling phase.
    pub fn phase(&self) -> ControllerPhase {
        if *self.shutdown_tx.borrow() {
            ControllerPhase::ShuttingDown
        } else if self.pending().is_some() {
            ControllerPhase::Armed
        } else {
            ControllerPhase::Idle
        }
    }

    /// Stop the worker, discarding any pending action, and wait for it to exit.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
        self.cancel();

        let handle = self.worker.lock().unwrap_or_else(|e| e.into_inner()).take();

        if let Some(handle) = handle {
            match tokio::time::timeout(WORKER_JOIN_TIMEOUT, handle).await {
                Ok(Ok(())) => debug!("Controller worker stopped cleanly"),
                Ok(Err(e)) => error!(error = ?e, "Controller worker task panicked"),
                Err(_) => warn!("Controller worker did not stop within timeout"),
            }
        }
    }
}

impl Drop for RecordingController {
    fn drop(&mut self) {
        self.shutdown_tx.send_replace(true);
    }
}

struct Worker {
    gate: Arc<RecorderGate>,
    pending_tx: Arc<watch::Sender<Option<PendingAction>>>,
    pending_rx: watch::Receiver<Option<PendingAction>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Worker {
    async fn run(mut self) {
        debug!("Controller worker started");

        loop {
            if *self.shutdown_rx.borrow() {
                break;
            }

            let armed = *self.pending_rx.borrow_and_update();

            match armed {
                None => {
                    tokio::select! {
                        biased;
                        changed = self.shutdown_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                        changed = self.pending_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                    }
                }
                Some(pending) => {
                    tokio::select! {
                        biased;
                        changed = self.shutdown_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                        changed = self.pending_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            debug!(action_id = %pending.id, "Pending action superseded");
                        }
                        () = tokio::time::sleep_until(pending.deadline()) => {
                            self.fire(pending);
                        }
                    }
                }
            }
        }

        debug!("Controller worker exiting");
    }

    fn fire(&self, pending: PendingAction) {
        // A request may have replaced this action while we waited for the lock.
        let performed = self.gate.perform_if(pending.action, || {
            let current = *self.pending_tx.borrow();
            current.map(|p| p.id) == Some(pending.id)
        });

        if !performed {
            debug!(action_id = %pending.id, "Delayed action superseded before firing");
            return;
        }

        self.pending_tx.send_if_modified(|current| {
            if current.map(|p| p.id) == Some(pending.id) {
                *current = None;
                true
            } else {
                false
            }
        });

        info!(
            action_id = %pending.id,
            action = %pending.action,
            delay_ms = pending.delay.as_millis(),
            "Delayed action performed"
        );
    }
}
