//! Events emitted by a running tool process

use serde::Serialize;

/// Line-oriented output and lifecycle events from a child process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ToolEvent {
    /// A line from standard output
    Stdout { line: String },
    /// A line from standard error
    Stderr { line: String },
    /// The process could not be started
    SpawnFailed { reason: String },
    /// The process exited. `code` is `None` when it was terminated by a signal.
    Exited { code: Option<i32> },
}

impl ToolEvent {
    pub fn stdout(line: impl Into<String>) -> Self {
        Self::Stdout { line: line.into() }
    }

    pub fn stderr(line: impl Into<String>) -> Self {
        Self::Stderr { line: line.into() }
    }

    /// Output text carried by this event, if any
    pub fn line(&self) -> Option<&str> {
        match self {
            ToolEvent::Stdout { line } | ToolEvent::Stderr { line } => Some(line),
            _ => None,
        }
    }

    /// Whether this event ends the event stream
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ToolEvent::Exited { .. } | ToolEvent::SpawnFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_accessor() {
        assert_eq!(ToolEvent::stdout("hi").line(), Some("hi"));
        assert_eq!(ToolEvent::stderr("oops").line(), Some("oops"));
        assert_eq!(ToolEvent::Exited { code: Some(0) }.line(), None);
    }

    #[test]
    fn test_terminal_events() {
        assert!(ToolEvent::Exited { code: None }.is_terminal());
        assert!(ToolEvent::SpawnFailed {
            reason: "denied".to_string()
        }
        .is_terminal());
        assert!(!ToolEvent::stdout("x").is_terminal());
    }

    #[test]
    fn test_serializes_tagged() {
        let json = serde_json::to_string(&ToolEvent::Exited { code: Some(127) }).unwrap();
        assert_eq!(json, r#"{"event":"exited","code":127}"#);
    }
}
