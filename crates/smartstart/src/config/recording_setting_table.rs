//! Persisted form of the per-scene recording rules.

use smartstart_core::{RecordingAction, RecordingRule, RuleIndex};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// One saved rule. `action` is `0` for start and `1` for stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRule {
    /// Scene the rule is keyed by.
    pub scene_name: String,
    /// Encoded [`RecordingAction`].
    pub action: i64,
    /// Delay in milliseconds after the transition begins.
    #[serde(default)]
    pub trigger_time: u32,
}

impl From<&RecordingRule> for PersistedRule {
    fn from(rule: &RecordingRule) -> Self {
        Self {
            scene_name: rule.scene_name().to_string(),
            action: rule.action().as_persisted(),
            trigger_time: rule.delay_ms(),
        }
    }
}

/// Ordered list of saved rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingSettingTable {
    /// Rules in settings-list order.
    #[serde(default)]
    pub recording_settings: Vec<PersistedRule>,
}

impl RecordingSettingTable {
    /// Snapshot `rules` for saving.
    pub fn from_rules(rules: &[RecordingRule]) -> Self {
        Self {
            recording_settings: rules.iter().map(PersistedRule::from).collect(),
        }
    }

    /// Decode the saved rules, skipping records with an unknown action.
    ///
    /// Saved delays are taken as they are; the editor cap is not applied
    /// here, so a later save never drops a rule the file already held.
    pub fn to_rules(&self) -> Vec<RecordingRule> {
        let decoded = self.recording_settings.iter().filter_map(|record| {
            match RecordingAction::from_persisted(record.action) {
                Ok(action) => Some(RecordingRule::new(
                    record.scene_name.clone(),
                    action,
                    record.trigger_time,
                )),
                Err(e) => {
                    warn!(scene = %record.scene_name, error = %e, "Skipping saved rule");
                    None
                }
            }
        });

        RuleIndex::from_rules(decoded).rules().to_vec()
    }
}
