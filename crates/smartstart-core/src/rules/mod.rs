mod rule;
mod rule_index;

pub use {
    rule::{MAX_TRIGGER_TIME_MS, RecordingAction, RecordingRule},
    rule_index::RuleIndex,
};
