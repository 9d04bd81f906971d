//! Per-work progress and the summary of a whole run.

use std::fmt;

use tracing::debug;

/// Where a single work is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkState {
    Pending,
    DirReady,
    DetailLoaded,
    Fetching { current: usize, total: usize },
    Done,
    Aborted,
}

impl WorkState {
    /// Move to the next state, logging the transition
    pub fn advance(&mut self, next: WorkState) {
        debug!(from = %self, to = %next, "Work state transition");
        *self = next;
    }
}

impl fmt::Display for WorkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkState::Pending => write!(f, "pending"),
            WorkState::DirReady => write!(f, "dir_ready"),
            WorkState::DetailLoaded => write!(f, "detail_loaded"),
            WorkState::Fetching { current, total } => write!(f, "fetching({}/{})", current, total),
            WorkState::Done => write!(f, "done"),
            WorkState::Aborted => write!(f, "aborted"),
        }
    }
}

/// A work that could not be mirrored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkFailure {
    pub slug: String,
    pub error: String,
}

/// Outcome of a mirror run
#[derive(Debug, Clone, Default)]
pub struct MirrorReport {
    /// Works in the listing
    pub total: usize,
    /// Works fully mirrored
    pub done: usize,
    /// Format files present after the run (cached or downloaded)
    pub files: usize,
    pub failures: Vec<WorkFailure>,
}

impl MirrorReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record_done(&mut self, files: usize) {
        self.done += 1;
        self.files += files;
    }

    pub fn record_failure(&mut self, failure: WorkFailure) {
        self.failures.push(failure);
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(WorkState::Pending.to_string(), "pending");
        assert_eq!(
            WorkState::Fetching { current: 2, total: 7 }.to_string(),
            "fetching(2/7)"
        );
    }

    #[test]
    fn test_advance() {
        let mut state = WorkState::Pending;
        state.advance(WorkState::DirReady);
        assert_eq!(state, WorkState::DirReady);
        state.advance(WorkState::Done);
        assert_eq!(state, WorkState::Done);
    }

    #[test]
    fn test_report_counts() {
        let mut report = MirrorReport::new(3);
        report.record_done(2);
        report.record_done(1);
        assert!(report.is_success());

        report.record_failure(WorkFailure {
            slug: "lalka".to_string(),
            error: "HTTP 404".to_string(),
        });
        assert_eq!(report.done, 2);
        assert_eq!(report.files, 3);
        assert!(!report.is_success());
    }
}
