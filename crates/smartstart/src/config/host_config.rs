use crate::config::{default_scenes, default_transition_ms};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Scene collection and transition timing of the simulated host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Scenes in the collection, in display order. The first is on program at startup.
    #[serde(default = "default_scenes")]
    pub scenes: Vec<String>,

    /// How long a transition runs before the scene change is reported.
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
}

impl HostConfig {
    /// Transition length as a [`Duration`].
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            scenes: default_scenes(),
            transition_ms: default_transition_ms(),
        }
    }
}
