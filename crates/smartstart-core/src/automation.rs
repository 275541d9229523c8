//! Wiring between host notifications, the rule index and the controller.
//!
//! One [`Automation`] is built at startup and shared by `Arc` with every
//! host callback. It owns the rule list, so edits from the settings side
//! and lookups from the scene side always see the same rules.

use crate::{
    Activation, CoreResult, HostEvent, RecordingController, RecordingRule, RuleIndex,
    SceneDecision, SceneSource, SceneSwitcher,
};

use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};

use tracing::{debug, info, instrument};

/// Scene-driven recording automation.
pub struct Automation {
    rules: Mutex<RuleIndex>,
    switcher: SceneSwitcher,
    controller: RecordingController,
    scenes: Arc<dyn SceneSource>,
    dirty: AtomicBool,
}

impl Automation {
    /// Build the automation over an initial, already persisted rule list.
    pub fn new(
        controller: RecordingController,
        scenes: Arc<dyn SceneSource>,
        rules: impl IntoIterator<Item = RecordingRule>,
    ) -> Self {
        let rules = RuleIndex::from_rules(rules);

        info!(rule_count = rules.len(), "Automation initialized");

        Self {
            rules: Mutex::new(rules),
            switcher: SceneSwitcher::new(),
            controller,
            scenes,
            dirty: AtomicBool::new(false),
        }
    }

    /// React to a host notification.
    ///
    /// Returns the decision taken for scene activations, `None` for
    /// bookkeeping events.
    #[instrument(skip(self))]
    pub fn handle_event(&self, event: HostEvent) -> Option<SceneDecision> {
        match event {
            HostEvent::SceneChanged => {
                let scene_name = self.scenes.current_scene_name()?;
                Some(self.activate(&scene_name, Activation::Direct))
            }
            HostEvent::TransitionStarted { destination } => {
                Some(self.activate(&destination, Activation::Transition))
            }
            HostEvent::SceneListChanged => {
                let existing = self.scenes.scene_names();
                let removed = self.lock_rules().prune(&existing);
                if !removed.is_empty() {
                    info!(removed = ?removed, "Rules for deleted scenes removed");
                    self.mark_dirty();
                }
                None
            }
            HostEvent::SceneRenamed { old_name, new_name } => {
                if self.lock_rules().rename(&old_name, &new_name) {
                    info!(old_name = %old_name, new_name = %new_name, "Rule follows renamed scene");
                    self.mark_dirty();
                }
                None
            }
        }
    }

    /// Bring the recording in line with the current scene at startup.
    pub fn reconcile(&self) -> Option<SceneDecision> {
        self.handle_event(HostEvent::SceneChanged)
    }

    /// Replace the whole rule list, as the settings editor does on save.
    #[instrument(skip(self, rules))]
    pub fn replace_rules(&self, rules: impl IntoIterator<Item = RecordingRule>) {
        self.lock_rules().rebuild(rules);
        self.mark_dirty();
    }

    /// Add or edit a single rule, returning the rule it replaced.
    #[track_caller]
    pub fn upsert_rule(&self, rule: RecordingRule) -> CoreResult<Option<RecordingRule>> {
        let replaced = self.lock_rules().upsert(rule)?;
        self.mark_dirty();
        Ok(replaced)
    }

    /// Delete the rule for `scene_name`.
    pub fn remove_rule(&self, scene_name: &str) -> Option<RecordingRule> {
        let removed = self.lock_rules().remove(scene_name);
        if removed.is_some() {
            self.mark_dirty();
        }
        removed
    }

    /// Snapshot of the rules in settings-list order.
    pub fn rules(&self) -> Vec<RecordingRule> {
        self.lock_rules().rules().to_vec()
    }

    /// Scenes that could still get a rule.
    pub fn unconfigured_scenes(&self) -> Vec<String> {
        let all = self.scenes.scene_names();
        self.lock_rules().unconfigured_scenes(&all)
    }

    /// Whether the rules changed since the last call, clearing the flag.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// The recording controller.
    pub fn controller(&self) -> &RecordingController {
        &self.controller
    }

    /// Stop the controller worker.
    pub async fn shutdown(&self) {
        self.controller.shutdown().await;
        info!("Automation shut down");
    }

    fn activate(&self, scene_name: &str, activation: Activation) -> SceneDecision {
        // Released before dispatch; the recorder may call back into us.
        let rule = self.lock_rules().lookup(scene_name).cloned();
        self.switcher
            .on_scene_activated(scene_name, activation, rule.as_ref(), &self.controller)
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
        debug!("Rule list marked dirty");
    }

    fn lock_rules(&self) -> MutexGuard<'_, RuleIndex> {
        self.rules.lock().unwrap_or_else(|e| e.into_inner())
    }
}
