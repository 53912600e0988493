use std::fmt::Write as _;

use kswitcher_core::{KeyClass, VirtualKey};

use crate::config::{
    Config,
    constants::{CHORD, CORRECTION_KEY, MAX_REPLAY_DELAY_MS, REPLAY_DELAY},
};

/// The trigger is swallowed, so it must not be a key the user types with
/// or edits with.
fn trigger_problem(key: VirtualKey) -> Option<&'static str> {
    if key.code() == 0 {
        return Some("is not set");
    }
    if key.is_modifier() {
        return Some("is a modifier key");
    }
    match key.class() {
        KeyClass::Character => Some("produces a character"),
        KeyClass::Backspace => Some("is Backspace"),
        KeyClass::Navigation => Some("moves the caret"),
        KeyClass::Other => None,
    }
}

pub fn find_config_problems(config: &Config) -> Vec<(&'static str, String)> {
    let mut problems = Vec::new();

    if let Some(problem) = trigger_problem(config.correction_key) {
        problems.push((
            CORRECTION_KEY,
            format!("0x{:02X} {problem}", config.correction_key.code()),
        ));
    }

    if config.replay_delay_ms > MAX_REPLAY_DELAY_MS {
        problems.push((
            REPLAY_DELAY,
            format!(
                "{} ms exceeds the {MAX_REPLAY_DELAY_MS} ms limit",
                config.replay_delay_ms
            ),
        ));
    }

    if config.chord_first == config.chord_second {
        problems.push((
            CHORD,
            format!("both chord keys are {}", config.chord_first.as_str()),
        ));
    }

    problems
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        let problems = find_config_problems(self);
        if problems.is_empty() {
            return Ok(());
        }

        let mut error = String::from("Invalid configuration:\n\n");
        for (field, problem) in &problems {
            let _ = writeln!(error, "- '{field}': {problem}");
        }
        Err(error)
    }
}
