//! Job status definitions shared by the quest engine and the status updater
//!
//! The driver reads these to decide whether a background pass may start.

use std::fmt;

/// Represents the lifecycle state of a background job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuestJobStatus {
    /// Job has not run since construction or the last reset
    #[default]
    None,

    /// Job is currently running
    Busy,

    // ===== Terminal States =====
    /// Job finished its work
    Done,

    /// Job finished but something deserves attention
    Warning,

    /// Job stopped on an unrecoverable condition
    Error,
}

impl QuestJobStatus {
    /// Returns true if the job is running
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }

    /// Returns true if this is a terminal state
    ///
    /// `None` and `Busy` are not terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Warning | Self::Error)
    }

    /// Returns true if this represents an error outcome
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Busy => "busy",
            Self::Done => "done",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for QuestJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
