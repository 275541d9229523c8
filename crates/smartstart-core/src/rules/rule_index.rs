//! Ordered rule list with a scene-name lookup table.
//!
//! The index owns the rules and maps each scene name to the rule's position
//! in the ordered list. Every mutation re-derives the positions before it
//! returns, so a lookup never observes a stale entry.

use crate::{CoreError, CoreResult, RecordingRule};

use std::{
    collections::{BTreeSet, HashMap},
    panic::Location,
};

use error_location::ErrorLocation;
use tracing::{debug, instrument, warn};

/// Scene name to [`RecordingRule`] index over the ordered settings list.
#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
    rules: Vec<RecordingRule>,
    positions: HashMap<String, usize>,
}

impl RuleIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index from an ordered rule list.
    pub fn from_rules(rules: impl IntoIterator<Item = RecordingRule>) -> Self {
        let mut index = Self::new();
        index.rebuild(rules);
        index
    }

    /// Replace the whole rule set.
    ///
    /// If two rules share a scene name the later one wins and keeps the
    /// position of the first.
    #[instrument(skip(self, rules))]
    pub fn rebuild(&mut self, rules: impl IntoIterator<Item = RecordingRule>) {
        self.rules.clear();
        self.positions.clear();

        for rule in rules {
            match self.positions.get(rule.scene_name()) {
                Some(&pos) => {
                    warn!(scene = rule.scene_name(), "Duplicate rule replaced");
                    self.rules[pos] = rule;
                }
                None => {
                    self.positions
                        .insert(rule.scene_name().to_string(), self.rules.len());
                    self.rules.push(rule);
                }
            }
        }

        debug!(rule_count = self.rules.len(), "Rule index rebuilt");
    }

    /// Rule for `scene_name`, if one is configured.
    pub fn lookup(&self, scene_name: &str) -> Option<&RecordingRule> {
        self.positions
            .get(scene_name)
            .and_then(|&pos| self.rules.get(pos))
    }

    /// Whether `scene_name` has a rule.
    pub fn contains(&self, scene_name: &str) -> bool {
        self.positions.contains_key(scene_name)
    }

    /// Re-key the rule for `old_name` to `new_name`.
    ///
    /// Returns `false` when `old_name` has no rule. A rule already keyed by
    /// `new_name` is dropped so scene names stay unique.
    #[instrument(skip(self))]
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> bool {
        let Some(&pos) = self.positions.get(old_name) else {
            return false;
        };

        if old_name == new_name {
            return false;
        }

        self.rules[pos] = self.rules[pos].renamed(new_name);

        if let Some(&stale) = self.positions.get(new_name) {
            warn!(scene = new_name, "Rename replaced an existing rule");
            self.rules.remove(stale);
        }

        self.reindex();
        debug!(old_name, new_name, "Rule re-keyed");

        true
    }

    /// Remove every rule whose scene is not in `existing_scene_names`.
    ///
    /// Returns the names that were removed.
    #[instrument(skip_all)]
    pub fn prune(&mut self, existing_scene_names: &BTreeSet<String>) -> BTreeSet<String> {
        let mut removed = BTreeSet::new();

        self.rules.retain(|rule| {
            let keep = existing_scene_names.contains(rule.scene_name());
            if !keep {
                removed.insert(rule.scene_name().to_string());
            }
            keep
        });

        if !removed.is_empty() {
            self.reindex();
            debug!(removed = ?removed, "Stale rules pruned");
        }

        removed
    }

    /// Add a rule for a scene that has none yet.
    #[track_caller]
    pub fn insert(&mut self, rule: RecordingRule) -> CoreResult<()> {
        rule.validate()?;

        if self.contains(rule.scene_name()) {
            return Err(CoreError::DuplicateScene {
                scene_name: rule.scene_name().to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.positions
            .insert(rule.scene_name().to_string(), self.rules.len());
        self.rules.push(rule);

        Ok(())
    }

    /// Add or replace the rule for the rule's scene, returning the replaced one.
    #[track_caller]
    pub fn upsert(&mut self, rule: RecordingRule) -> CoreResult<Option<RecordingRule>> {
        rule.validate()?;

        match self.positions.get(rule.scene_name()) {
            Some(&pos) => Ok(Some(std::mem::replace(&mut self.rules[pos], rule))),
            None => {
                self.positions
                    .insert(rule.scene_name().to_string(), self.rules.len());
                self.rules.push(rule);
                Ok(None)
            }
        }
    }

    /// Remove the rule for `scene_name`.
    pub fn remove(&mut self, scene_name: &str) -> Option<RecordingRule> {
        let pos = self.positions.get(scene_name).copied()?;
        let rule = self.rules.remove(pos);
        self.reindex();
        Some(rule)
    }

    /// Scenes from `all_scene_names` that have no rule yet.
    pub fn unconfigured_scenes(&self, all_scene_names: &BTreeSet<String>) -> Vec<String> {
        all_scene_names
            .iter()
            .filter(|name| !self.contains(name))
            .cloned()
            .collect()
    }

    /// Rules in settings-list order.
    pub fn rules(&self) -> &[RecordingRule] {
        &self.rules
    }

    /// Number of configured rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn reindex(&mut self) {
        self.positions = self
            .rules
            .iter()
            .enumerate()
            .map(|(pos, rule)| (rule.scene_name().to_string(), pos))
            .collect();
    }
}
