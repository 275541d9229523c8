use crate::RecordingAction;

use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

/// A delayed action waiting for its timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAction {
    /// Identity of this arming, used in logs and to detect supersession.
    pub id: Uuid,
    /// What fires when the delay elapses.
    pub action: RecordingAction,
    /// Delay requested at arming time.
    pub delay: Duration,
    /// When the action was armed.
    pub armed_at: Instant,
}

impl PendingAction {
    pub(crate) fn new(action: RecordingAction, delay: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            delay,
            armed_at: Instant::now(),
        }
    }

    /// When the action is due to fire.
    pub fn deadline(&self) -> Instant {
        self.armed_at + self.delay
    }

    /// Time left before the action fires.
    pub fn remaining(&self) -> Duration {
        self.deadline().saturating_duration_since(Instant::now())
    }
}

/// Scheduling state of a [`RecordingController`](crate::RecordingController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    /// Nothing is scheduled.
    Idle,
    /// A delayed action is counting down.
    Armed,
    /// The worker has been told to exit.
    ShuttingDown,
}
