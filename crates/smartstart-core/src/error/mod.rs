use error_location::ErrorLocation;
use thiserror::Error;

/// Rule, recorder and scheduling errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A rule for this scene is already configured.
    #[error("Scene already has a recording rule: {scene_name} {location}")]
    DuplicateScene {
        /// Scene name that is already configured.
        scene_name: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Trigger delay exceeds the supported maximum.
    #[error("Trigger time {delay_ms}ms exceeds maximum of {max_ms}ms {location}")]
    DelayOutOfRange {
        /// Requested delay in milliseconds.
        delay_ms: u32,
        /// Largest accepted delay in milliseconds.
        max_ms: u32,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Persisted action value is neither start (0) nor stop (1).
    #[error("Invalid recording action value: {value} {location}")]
    InvalidAction {
        /// Raw persisted value.
        value: i64,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder refused or failed a start/stop command.
    #[error("Recorder error: {reason} {location}")]
    RecorderFailed {
        /// Description of the device failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The controller worker needs a tokio runtime to be spawned on.
    #[error("No tokio runtime available: {reason} {location}")]
    NoRuntime {
        /// Description from the runtime lookup.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
