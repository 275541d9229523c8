use crate::{CoreError, MAX_TRIGGER_TIME_MS, RecordingAction, RecordingRule, RuleIndex};

use std::collections::BTreeSet;

fn names(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// WHAT: Rename re-keys a rule and updates its scene name
/// WHY: Renaming a scene in the host must keep its recording rule
#[test]
fn given_rule_for_a_when_renamed_to_b_then_lookup_b_returns_rule() {
    // Given: An index with a start rule for scene A
    let mut index = RuleIndex::from_rules([RecordingRule::new("A", RecordingAction::Start, 0)]);

    // When: Scene A is renamed to B
    let renamed = index.rename("A", "B");

    // Then: B resolves to the rule with its own name updated, A is gone
    assert!(renamed);
    assert_eq!(
        index.lookup("B"),
        Some(&RecordingRule::new("B", RecordingAction::Start, 0))
    );
    assert!(index.lookup("A").is_none());
    assert_eq!(index.rules()[0].scene_name(), "B");
}

/// WHAT: Renaming an unknown scene is a no-op
/// WHY: Most renamed sources are not configured scenes
#[test]
fn given_unconfigured_scene_when_renamed_then_index_unchanged() {
    // Given: An index with a rule for A only
    let mut index = RuleIndex::from_rules([RecordingRule::new("A", RecordingAction::Stop, 100)]);

    // When: An unrelated source is renamed
    let renamed = index.rename("Camera", "Webcam");

    // Then: Nothing changed
    assert!(!renamed);
    assert_eq!(index.len(), 1);
    assert!(index.lookup("A").is_some());
    assert!(index.lookup("Webcam").is_none());
}

/// WHAT: Renaming onto a configured name keeps names unique
/// WHY: Two rules for one scene would make lookups ambiguous
#[test]
fn given_rules_for_a_and_b_when_a_renamed_to_b_then_single_rule_from_a_remains() {
    // Given: Rules for both A and B
    let mut index = RuleIndex::from_rules([
        RecordingRule::new("A", RecordingAction::Start, 10),
        RecordingRule::new("B", RecordingAction::Stop, 20),
    ]);

    // When: A takes over B's name
    assert!(index.rename("A", "B"));

    // Then: Only the renamed rule is left
    assert_eq!(index.len(), 1);
    assert_eq!(
        index.lookup("B"),
        Some(&RecordingRule::new("B", RecordingAction::Start, 10))
    );
}

/// WHAT: Prune removes rules for scenes that no longer exist
/// WHY: Deleted scenes leave stale rules that must be dropped and persisted
#[test]
fn given_rules_for_a_and_b_when_pruned_to_a_then_b_removed_and_reported() {
    // Given: Rules for A and B
    let mut index = RuleIndex::from_rules([
        RecordingRule::new("A", RecordingAction::Start, 0),
        RecordingRule::new("B", RecordingAction::Stop, 0),
    ]);

    // When: Only scene A still exists
    let removed = index.prune(&names(&["A"]));

    // Then: B is removed and reported
    assert_eq!(removed, names(&["B"]));
    assert!(index.lookup("A").is_some());
    assert!(index.lookup("B").is_none());
}

/// WHAT: Prune keeps positions consistent after removing from the middle
/// WHY: Index positions must follow the list, never point at the wrong rule
#[test]
fn given_three_rules_when_middle_pruned_then_remaining_lookups_correct() {
    // Given: Three rules in order
    let mut index = RuleIndex::from_rules([
        RecordingRule::new("A", RecordingAction::Start, 1),
        RecordingRule::new("B", RecordingAction::Start, 2),
        RecordingRule::new("C", RecordingAction::Stop, 3),
    ]);

    // When: B disappears
    index.prune(&names(&["A", "C"]));

    // Then: C still resolves to its own rule and order is kept
    assert_eq!(index.lookup("C").map(RecordingRule::delay_ms), Some(3));
    let order: Vec<&str> = index.rules().iter().map(RecordingRule::scene_name).collect();
    assert_eq!(order, vec!["A", "C"]);
}

/// WHAT: Prune with every scene present removes nothing
/// WHY: Caller only saves settings when something was removed
#[test]
fn given_all_scenes_present_when_pruned_then_nothing_removed() {
    let mut index = RuleIndex::from_rules([RecordingRule::new("A", RecordingAction::Start, 0)]);

    let removed = index.prune(&names(&["A", "B"]));

    assert!(removed.is_empty());
    assert_eq!(index.len(), 1);
}

/// WHAT: Rebuild replaces previous contents
/// WHY: Editor save hands over the full new list
#[test]
fn given_populated_index_when_rebuilt_then_old_rules_gone() {
    // Given: An index with a rule for A
    let mut index = RuleIndex::from_rules([RecordingRule::new("A", RecordingAction::Start, 0)]);

    // When: Rebuilding with a rule for B only
    index.rebuild([RecordingRule::new("B", RecordingAction::Stop, 5)]);

    // Then: Only B is present
    assert!(index.lookup("A").is_none());
    assert!(index.lookup("B").is_some());
    assert_eq!(index.len(), 1);
}

/// WHAT: Duplicate scene names in a rebuild collapse to the last rule
/// WHY: Lookup must stay unambiguous even for a hand-edited settings file
#[test]
fn given_duplicate_scene_when_rebuilt_then_later_rule_wins_in_first_position() {
    // When: Rebuilding with A twice
    let index = RuleIndex::from_rules([
        RecordingRule::new("A", RecordingAction::Start, 1),
        RecordingRule::new("B", RecordingAction::Start, 2),
        RecordingRule::new("A", RecordingAction::Stop, 3),
    ]);

    // Then: One rule per scene, A keeps its slot with the later values
    assert_eq!(index.len(), 2);
    assert_eq!(index.rules()[0], RecordingRule::new("A", RecordingAction::Stop, 3));
}

/// WHAT: Insert rejects an already configured scene
/// WHY: The editor only offers scenes without a rule
#[test]
fn given_configured_scene_when_inserting_again_then_duplicate_scene_error() {
    let mut index = RuleIndex::new();
    index
        .insert(RecordingRule::new("A", RecordingAction::Start, 0))
        .unwrap();

    let result = index.insert(RecordingRule::new("A", RecordingAction::Stop, 0));

    assert!(matches!(result, Err(CoreError::DuplicateScene { .. })));
    assert_eq!(index.len(), 1);
}

/// WHAT: Delays above the editor maximum are rejected
/// WHY: Keeps persisted settings within what the editor can display
#[test]
fn given_delay_above_maximum_when_upserting_then_delay_out_of_range_error() {
    let mut index = RuleIndex::new();

    let result = index.upsert(RecordingRule::new(
        "A",
        RecordingAction::Start,
        MAX_TRIGGER_TIME_MS + 1,
    ));

    assert!(matches!(result, Err(CoreError::DelayOutOfRange { .. })));
    assert!(index.is_empty());
}

/// WHAT: Upsert edits in place and returns the previous rule
/// WHY: Editing a rule must not move it in the settings list
#[test]
fn given_existing_rule_when_upserted_then_replaced_in_place() {
    // Given: Two rules
    let mut index = RuleIndex::from_rules([
        RecordingRule::new("A", RecordingAction::Start, 1),
        RecordingRule::new("B", RecordingAction::Start, 2),
    ]);

    // When: Editing A
    let previous = index
        .upsert(RecordingRule::new("A", RecordingAction::Stop, 9))
        .unwrap();

    // Then: Old rule returned, new one sits in the first slot
    assert_eq!(previous, Some(RecordingRule::new("A", RecordingAction::Start, 1)));
    assert_eq!(index.rules()[0], RecordingRule::new("A", RecordingAction::Stop, 9));
}

/// WHAT: Remove drops the rule and reindexes
/// WHY: Later rules must still resolve after an earlier one is deleted
#[test]
fn given_rules_when_first_removed_then_later_rule_still_resolves() {
    let mut index = RuleIndex::from_rules([
        RecordingRule::new("A", RecordingAction::Start, 1),
        RecordingRule::new("B", RecordingAction::Stop, 2),
    ]);

    let removed = index.remove("A");

    assert_eq!(removed.map(|r| r.delay_ms()), Some(1));
    assert_eq!(index.lookup("B").map(RecordingRule::action), Some(RecordingAction::Stop));
    assert!(index.remove("A").is_none());
}

/// WHAT: Unconfigured scenes exclude scenes that already have a rule
/// WHY: The editor offers only scenes that can still get a rule
#[test]
fn given_some_configured_scenes_when_listing_unconfigured_then_only_free_scenes() {
    let index = RuleIndex::from_rules([RecordingRule::new("Live", RecordingAction::Start, 0)]);

    let free = index.unconfigured_scenes(&names(&["Intro", "Live", "Outro"]));

    assert_eq!(free, vec!["Intro".to_string(), "Outro".to_string()]);
}
