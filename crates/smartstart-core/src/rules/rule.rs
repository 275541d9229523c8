use crate::{CoreError, CoreResult};

use std::{fmt, panic::Location, str::FromStr, time::Duration};

use error_location::ErrorLocation;

/// Largest trigger delay the settings editor accepts (milliseconds).
pub const MAX_TRIGGER_TIME_MS: u32 = 1_000_000;

/// What to do with the recording when a scene becomes active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordingAction {
    /// Start recording.
    Start,
    /// Stop recording.
    Stop,
}

impl RecordingAction {
    /// Persisted integer encoding (`0` = start, `1` = stop).
    pub fn as_persisted(self) -> i64 {
        match self {
            RecordingAction::Start => 0,
            RecordingAction::Stop => 1,
        }
    }

    /// Decode the persisted integer form.
    #[track_caller]
    pub fn from_persisted(value: i64) -> CoreResult<Self> {
        match value {
            0 => Ok(RecordingAction::Start),
            1 => Ok(RecordingAction::Stop),
            _ => Err(CoreError::InvalidAction {
                value,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl fmt::Display for RecordingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingAction::Start => f.write_str("start"),
            RecordingAction::Stop => f.write_str("stop"),
        }
    }
}

impl FromStr for RecordingAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "start" => Ok(RecordingAction::Start),
            "stop" => Ok(RecordingAction::Stop),
            other => Err(format!("expected 'start' or 'stop', got '{}'", other)),
        }
    }
}

/// Scene name to recording action mapping, with an optional trigger delay.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordingRule {
    scene_name: String,
    action: RecordingAction,
    delay_ms: u32,
}

impl RecordingRule {
    /// Create a rule. Range checks happen when the rule enters a [`RuleIndex`](crate::RuleIndex).
    pub fn new(scene_name: impl Into<String>, action: RecordingAction, delay_ms: u32) -> Self {
        Self {
            scene_name: scene_name.into(),
            action,
            delay_ms,
        }
    }

    /// Scene this rule is keyed by.
    pub fn scene_name(&self) -> &str {
        &self.scene_name
    }

    /// Action performed when the scene becomes active.
    pub fn action(&self) -> RecordingAction {
        self.action
    }

    /// Delay after the transition begins, in milliseconds.
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Delay as a [`Duration`], ready for the controller.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.delay_ms))
    }

    /// Same rule, keyed by a different scene name.
    pub fn renamed(&self, scene_name: impl Into<String>) -> Self {
        Self {
            scene_name: scene_name.into(),
            ..self.clone()
        }
    }

    #[track_caller]
    pub(crate) fn validate(&self) -> CoreResult<()> {
        if self.delay_ms > MAX_TRIGGER_TIME_MS {
            return Err(CoreError::DelayOutOfRange {
                delay_ms: self.delay_ms,
                max_ms: MAX_TRIGGER_TIME_MS,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

impl fmt::Display for RecordingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} after {}ms",
            self.scene_name, self.action, self.delay_ms
        )
    }
}
