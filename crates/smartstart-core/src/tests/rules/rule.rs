use crate::{CoreError, RecordingAction, RecordingRule};

use std::time::Duration;

/// WHAT: Persisted action values decode to start/stop
/// WHY: Saved settings store the action as 0 or 1
#[test]
fn given_persisted_values_when_decoding_action_then_zero_is_start_and_one_is_stop() {
    // Given/When: Decoding the two valid encodings
    let start = RecordingAction::from_persisted(0).unwrap();
    let stop = RecordingAction::from_persisted(1).unwrap();

    // Then: Each maps to its action and encodes back to the same value
    assert_eq!(start, RecordingAction::Start);
    assert_eq!(stop, RecordingAction::Stop);
    assert_eq!(start.as_persisted(), 0);
    assert_eq!(stop.as_persisted(), 1);
}

/// WHAT: Unknown persisted action values are rejected
/// WHY: A corrupted settings file must not silently become a start rule
#[test]
fn given_unknown_value_when_decoding_action_then_invalid_action_error() {
    // Given: An out-of-range action value
    let value = 7;

    // When: Decoding it
    let result = RecordingAction::from_persisted(value);

    // Then: Returns InvalidAction carrying the raw value
    assert!(matches!(result, Err(CoreError::InvalidAction { value: 7, .. })));
}

/// WHAT: Rules compare structurally on all three fields
/// WHY: Editor uses equality to detect whether a rule was changed
#[test]
fn given_rules_differing_in_one_field_when_comparing_then_not_equal() {
    // Given: A rule and variants that differ in one field each
    let rule = RecordingRule::new("Live", RecordingAction::Start, 500);

    // Then: Only the identical rule compares equal
    assert_eq!(rule, RecordingRule::new("Live", RecordingAction::Start, 500));
    assert_ne!(rule, RecordingRule::new("Intro", RecordingAction::Start, 500));
    assert_ne!(rule, RecordingRule::new("Live", RecordingAction::Stop, 500));
    assert_ne!(rule, RecordingRule::new("Live", RecordingAction::Start, 0));
}

/// WHAT: Renaming keeps action and delay
/// WHY: A scene rename must not change what the rule does
#[test]
fn given_rule_when_renamed_then_only_scene_name_changes() {
    // Given: A stop rule with a delay
    let rule = RecordingRule::new("Outro", RecordingAction::Stop, 2500);

    // When: Renaming it
    let renamed = rule.renamed("Ending");

    // Then: Action and delay survive
    assert_eq!(renamed.scene_name(), "Ending");
    assert_eq!(renamed.action(), RecordingAction::Stop);
    assert_eq!(renamed.delay(), Duration::from_millis(2500));
}

/// WHAT: Action names parse case-insensitively
/// WHY: Console commands accept "Start"/"STOP"
#[test]
fn given_mixed_case_names_when_parsing_action_then_recognized() {
    assert_eq!("Start".parse::<RecordingAction>(), Ok(RecordingAction::Start));
    assert_eq!("STOP".parse::<RecordingAction>(), Ok(RecordingAction::Stop));
    assert!("pause".parse::<RecordingAction>().is_err());
}
