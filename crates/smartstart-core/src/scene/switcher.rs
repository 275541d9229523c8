use crate::{Activation, RecordingAction, RecordingController, RecordingRule};

use std::{sync::Mutex, time::Duration};

use tracing::{debug, info, instrument};

/// Outcome of handling one scene activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneDecision {
    /// Same scene as the last one handled; ignored.
    Duplicate,
    /// The scene has no recording rule.
    NoRule,
    /// The rule was a stop rule seen without a transition; never force-stop.
    Skipped,
    /// The controller was asked to perform `action` after `delay`.
    Requested {
        /// Requested action.
        action: RecordingAction,
        /// Requested delay.
        delay: Duration,
    },
}

/// Turns scene activations into controller requests.
///
/// The host reports a transition start and then, shortly after, a plain
/// scene change for the same destination. Remembering the last handled
/// scene absorbs that second notification.
#[derive(Debug, Default)]
pub struct SceneSwitcher {
    last_handled: Mutex<Option<String>>,
}

impl SceneSwitcher {
    /// Create a switcher that has not handled any scene yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle `scene_name` becoming active.
    ///
    /// `rule` is the scene's rule, looked up by the caller. No rule lock may
    /// be held here: an immediate action calls into the recorder, and hosts
    /// can deliver notifications from inside that call.
    #[instrument(skip(self, rule, controller))]
    pub fn on_scene_activated(
        &self,
        scene_name: &str,
        activation: Activation,
        rule: Option<&RecordingRule>,
        controller: &RecordingController,
    ) -> SceneDecision {
        {
            let mut last = self.last_handled.lock().unwrap_or_else(|e| e.into_inner());
            if last.as_deref() == Some(scene_name) {
                debug!(scene = scene_name, "Scene already handled");
                return SceneDecision::Duplicate;
            }
            *last = Some(scene_name.to_string());
        }

        let Some(rule) = rule else {
            debug!(scene = scene_name, "No recording rule for scene");
            return SceneDecision::NoRule;
        };

        let (action, delay) = match activation {
            Activation::Transition => (rule.action(), rule.delay()),
            // No transition to time against: start right away, never stop.
            Activation::Direct => match rule.action() {
                RecordingAction::Start => (RecordingAction::Start, Duration::ZERO),
                RecordingAction::Stop => {
                    debug!(scene = scene_name, "Stop rule ignored without transition");
                    return SceneDecision::Skipped;
                }
            },
        };

        info!(
            scene = scene_name,
            action = %action,
            delay_ms = delay.as_millis(),
            "Scene rule matched"
        );
        controller.request(action, delay);

        SceneDecision::Requested { action, delay }
    }

    /// Name of the last scene that was handled.
    pub fn last_handled(&self) -> Option<String> {
        self.last_handled
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
