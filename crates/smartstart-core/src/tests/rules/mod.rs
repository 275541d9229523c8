mod rule;
mod rule_index;
