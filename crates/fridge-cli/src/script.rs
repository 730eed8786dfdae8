//! Event scripts for deterministic replay.
//!
//! One step per line: `<seconds> <event> [arg]`, where seconds are relative
//! to the replay start and never decrease. `#` starts a comment.
//!
//! ```text
//! 0    rotate +1
//! 0.5  click
//! 2.6  tick
//! ```

use fridge_core::events::Direction;
use fridge_core::events::Event;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptError {
    #[error("line {line}: expected `<seconds> <event> [arg]`")]
    MissingEvent { line: usize },
    #[error("line {line}: bad timestamp `{raw}`")]
    BadTimestamp { line: usize, raw: String },
    #[error("line {line}: timestamp goes backwards ({at_ms}ms after {previous_ms}ms)")]
    OutOfOrder {
        line: usize,
        at_ms: u64,
        previous_ms: u64,
    },
    #[error("line {line}: unknown event `{name}`")]
    UnknownEvent { line: usize, name: String },
    #[error("line {line}: `{name}` takes +1 or -1, got `{raw}`")]
    BadDirection {
        line: usize,
        name: String,
        raw: String,
    },
    #[error("line {line}: unexpected argument `{raw}`")]
    UnexpectedArgument { line: usize, raw: String },
}

/// What a line asks for; `tick` is resolved against the replay start later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptAction {
    Input(Event),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep {
    /// Offset from the replay start.
    pub at_ms: u64,
    pub action: ScriptAction,
}

impl ScriptStep {
    /// Absolute timestamp and the reducer event for this step.
    pub fn resolve(&self, start_ms: u64) -> (u64, Event) {
        let at_ms = start_ms.saturating_add(self.at_ms);
        match self.action {
            ScriptAction::Input(event) => (at_ms, event),
            ScriptAction::Tick => (at_ms, Event::Tick(at_ms)),
        }
    }
}

pub fn parse_script(source: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    let mut previous_ms = 0;

    for (idx, raw_line) in source.lines().enumerate() {
        let line = idx + 1;
        let content = raw_line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }

        let mut words = content.split_whitespace();
        let (Some(stamp), Some(name)) = (words.next(), words.next()) else {
            return Err(ScriptError::MissingEvent { line });
        };
        let at_ms = parse_seconds(stamp).ok_or_else(|| ScriptError::BadTimestamp {
            line,
            raw: stamp.to_string(),
        })?;
        if at_ms < previous_ms {
            return Err(ScriptError::OutOfOrder {
                line,
                at_ms,
                previous_ms,
            });
        }
        previous_ms = at_ms;

        let arg = words.next();
        if let Some(extra) = words.next() {
            return Err(ScriptError::UnexpectedArgument {
                line,
                raw: extra.to_string(),
            });
        }

        let action = parse_action(line, name, arg)?;
        steps.push(ScriptStep { at_ms, action });
    }

    Ok(steps)
}

fn parse_action(line: usize, name: &str, arg: Option<&str>) -> Result<ScriptAction, ScriptError> {
    let no_arg = |action: ScriptAction| match arg {
        None => Ok(action),
        Some(raw) => Err(ScriptError::UnexpectedArgument {
            line,
            raw: raw.to_string(),
        }),
    };

    match name.to_ascii_lowercase().as_str() {
        "rotate" => parse_direction(line, name, arg).map(|d| ScriptAction::Input(Event::Rotate(d))),
        "memo" => parse_direction(line, name, arg).map(|d| ScriptAction::Input(Event::MemoDelta(d))),
        "click" => no_arg(ScriptAction::Input(Event::Click)),
        "long" => no_arg(ScriptAction::Input(Event::LongPress)),
        "back" => no_arg(ScriptAction::Input(Event::Back)),
        "tick" => no_arg(ScriptAction::Tick),
        _ => Err(ScriptError::UnknownEvent {
            line,
            name: name.to_string(),
        }),
    }
}

fn parse_direction(line: usize, name: &str, arg: Option<&str>) -> Result<Direction, ScriptError> {
    let raw = arg.unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(delta) if delta != 0 => Ok(Direction::from_delta(delta)),
        _ => Err(ScriptError::BadDirection {
            line,
            name: name.to_string(),
            raw: raw.to_string(),
        }),
    }
}

fn parse_seconds(raw: &str) -> Option<u64> {
    let secs = raw.parse::<f64>().ok()?;
    (secs.is_finite() && secs >= 0.0).then(|| (secs * 1000.0).round() as u64)
}
