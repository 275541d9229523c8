use crate::{AppError, AppResult};

use smartstart_core::RecordingAction;

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Usage text printed by `help`.
pub(crate) const HELP: &str = "\
commands:
  cut <scene>                       switch scene without a transition
  transition <scene>                switch scene with a transition
  add-scene <scene>                 add a scene to the collection
  remove-scene <scene>              delete a scene
  rename <old> <new>                rename a scene
  rule <scene> <start|stop> [ms]    add or edit the rule for a scene
  unrule <scene>                    delete the rule for a scene
  pause | resume                    pause or resume the recording
  rules | status | help | quit
scene names with spaces go in double quotes";

/// A line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Switch scene without a transition.
    Cut(String),
    /// Switch scene through a transition.
    Transition(String),
    /// Add a scene.
    AddScene(String),
    /// Remove a scene.
    RemoveScene(String),
    /// Rename a scene.
    Rename {
        /// Current name.
        old_name: String,
        /// New name.
        new_name: String,
    },
    /// Add or edit a rule.
    Rule {
        /// Scene the rule is for.
        scene_name: String,
        /// What to do.
        action: RecordingAction,
        /// Delay in milliseconds.
        delay_ms: u32,
    },
    /// Delete a rule.
    Unrule(String),
    /// Pause the recording.
    Pause,
    /// Resume the recording.
    Resume,
    /// Print the rules.
    Rules,
    /// Print host and controller state.
    Status,
    /// Print usage.
    Help,
    /// Exit.
    Quit,
    /// Blank line.
    Empty,
}

impl FromStr for ConsoleCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(line: &str) -> AppResult<Self> {
        let args = split_args(line)?;
        let Some((verb, rest)) = args.split_first() else {
            return Ok(ConsoleCommand::Empty);
        };

        let command = match (verb.as_str(), rest) {
            ("cut", [scene]) => ConsoleCommand::Cut(scene.clone()),
            ("transition", [scene]) => ConsoleCommand::Transition(scene.clone()),
            ("add-scene", [scene]) => ConsoleCommand::AddScene(scene.clone()),
            ("remove-scene", [scene]) => ConsoleCommand::RemoveScene(scene.clone()),
            ("rename", [old_name, new_name]) => ConsoleCommand::Rename {
                old_name: old_name.clone(),
                new_name: new_name.clone(),
            },
            ("rule", [scene, action]) => ConsoleCommand::Rule {
                scene_name: scene.clone(),
                action: parse_action(action)?,
                delay_ms: 0,
            },
            ("rule", [scene, action, delay]) => ConsoleCommand::Rule {
                scene_name: scene.clone(),
                action: parse_action(action)?,
                delay_ms: delay.parse().map_err(|e| AppError::InvalidCommand {
                    reason: format!("Invalid delay '{}': {}", delay, e),
                    location: ErrorLocation::from(Location::caller()),
                })?,
            },
            ("unrule", [scene]) => ConsoleCommand::Unrule(scene.clone()),
            ("pause", []) => ConsoleCommand::Pause,
            ("resume", []) => ConsoleCommand::Resume,
            ("rules", []) => ConsoleCommand::Rules,
            ("status", []) => ConsoleCommand::Status,
            ("help", []) => ConsoleCommand::Help,
            ("quit" | "exit", []) => ConsoleCommand::Quit,
            (verb, _) => {
                return Err(AppError::InvalidCommand {
                    reason: format!("Unknown command or wrong arguments: '{}' (try 'help')", verb),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(command)
    }
}

#[track_caller]
fn parse_action(value: &str) -> AppResult<RecordingAction> {
    value.parse().map_err(|reason| AppError::InvalidCommand {
        reason,
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Split on whitespace, keeping double-quoted runs together.
#[track_caller]
pub(crate) fn split_args(line: &str) -> AppResult<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(AppError::InvalidCommand {
            reason: "Unterminated quote".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    if has_token {
        args.push(current);
    }

    Ok(args)
}
