use crate::{CoreResult, RecordingAction};

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use tracing::error;

/// Live state of the host's recording output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingStatus {
    /// Not recording.
    Stopped,
    /// Recording.
    Started,
    /// Recording, but paused.
    Paused,
}

impl RecordingStatus {
    /// Whether `action` would leave the recorder where it already is.
    pub fn satisfies(self, action: RecordingAction) -> bool {
        match action {
            RecordingAction::Start => self == RecordingStatus::Started,
            RecordingAction::Stop => self == RecordingStatus::Stopped,
        }
    }
}

impl fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingStatus::Stopped => f.write_str("stopped"),
            RecordingStatus::Started => f.write_str("started"),
            RecordingStatus::Paused => f.write_str("paused"),
        }
    }
}

/// Recording capability provided by the host application.
///
/// Start and stop are fire-and-forget at the device level: `Ok` means the
/// command was accepted, not that the output is already running.
pub trait Recorder: Send + Sync {
    /// Current device state. Must reflect the device, not a cached value.
    fn status(&self) -> RecordingStatus;

    /// Ask the host to start recording.
    fn start_recording(&self) -> CoreResult<()>;

    /// Ask the host to stop recording.
    fn stop_recording(&self) -> CoreResult<()>;
}

/// Serializes every query and command sent to the [`Recorder`].
///
/// The lock is held for exactly one recorder call.
pub(crate) struct RecorderGate {
    recorder: Arc<dyn Recorder>,
    lock: Mutex<()>,
}

impl RecorderGate {
    pub(crate) fn new(recorder: Arc<dyn Recorder>) -> Self {
        Self {
            recorder,
            lock: Mutex::new(()),
        }
    }

    pub(crate) fn status(&self) -> RecordingStatus {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.recorder.status()
    }

    /// Runs `still_wanted` and, if it agrees, the action, all under the lock.
    ///
    /// Returns whether the recorder was called. Device failures are logged
    /// and not retried.
    pub(crate) fn perform_if(
        &self,
        action: RecordingAction,
        still_wanted: impl FnOnce() -> bool,
    ) -> bool {
        let _guard = self.lock.lock().unwrap_or_else(|e| {
            error!("Recorder lock poisoned, recovering: {}", e);
            e.into_inner()
        });

        if !still_wanted() {
            return false;
        }

        let result = match action {
            RecordingAction::Start => self.recorder.start_recording(),
            RecordingAction::Stop => self.recorder.stop_recording(),
        };

        if let Err(e) = result {
            error!(action = %action, error = ?e, "Recorder rejected command");
        }

        true
    }

    pub(crate) fn perform(&self, action: RecordingAction) {
        self.perform_if(action, || true);
    }
}
