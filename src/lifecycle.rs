//! Domain types for application lifecycle transitions.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Host application lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// In the foreground and receiving input.
    #[default]
    Active,
    /// Transient state: app switcher, system dialogs, incoming calls.
    Inactive,
    /// Not visible.
    Background,
}

impl LifecycleState {
    /// Get the state as the host platform spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Background => "background",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a lifecycle state name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown lifecycle state: {0}")]
pub struct UnknownState(pub String);

impl FromStr for LifecycleState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("active") {
            Ok(Self::Active)
        } else if s.eq_ignore_ascii_case("inactive") {
            Ok(Self::Inactive)
        } else if s.eq_ignore_ascii_case("background") {
            Ok(Self::Background)
        } else {
            Err(UnknownState(s.to_string()))
        }
    }
}

/// A lifecycle notification from the host.
///
/// Some hosts report only the new state; `previous` is `None` for those and
/// the monitor falls back to the state it last tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub previous: Option<LifecycleState>,
    pub next: LifecycleState,
}

impl LifecycleEvent {
    /// Event carrying only the new state.
    pub fn to(next: LifecycleState) -> Self {
        Self {
            previous: None,
            next,
        }
    }

    /// Event carrying an explicit `(previous, next)` pair.
    pub fn transition(previous: LifecycleState, next: LifecycleState) -> Self {
        Self {
            previous: Some(previous),
            next,
        }
    }
}

/// Parse one line of textual lifecycle input.
///
/// Accepted forms: `next`, `previous -> next`, `previous next`.
/// Blank lines, `#` comments and unknown state names yield `None`.
pub fn parse_event_line(line: &str) -> Option<LifecycleEvent> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let tokens: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == '>' || c == '-')
        .filter(|t| !t.is_empty())
        .collect();

    match tokens.as_slice() {
        [next] => next.parse().ok().map(LifecycleEvent::to),
        [previous, next] => {
            let previous = previous.parse().ok()?;
            let next = next.parse().ok()?;
            Some(LifecycleEvent::transition(previous, next))
        }
        _ => None,
    }
}
