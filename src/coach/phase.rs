//! Per-request pipeline phases
//!
//! Every orchestrator operation walks the same linear pipeline. The phase
//! is tracing context only: nothing in-flight is ever persisted, and each
//! request is independent of every other.

use tracing::debug;
use uuid::Uuid;

use crate::errors::CoachError;

/// Pipeline position of a single coaching request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Pending,
    Assembling,
    Prompting,
    AwaitingModel,
    Parsing,
    Succeeded,
    Failed,
}

impl RequestPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestPhase::Succeeded | RequestPhase::Failed)
    }

    /// The one legal forward step, None from terminal phases
    pub fn next(&self) -> Option<RequestPhase> {
        match self {
            RequestPhase::Pending => Some(RequestPhase::Assembling),
            RequestPhase::Assembling => Some(RequestPhase::Prompting),
            RequestPhase::Prompting => Some(RequestPhase::AwaitingModel),
            RequestPhase::AwaitingModel => Some(RequestPhase::Parsing),
            RequestPhase::Parsing => Some(RequestPhase::Succeeded),
            RequestPhase::Succeeded | RequestPhase::Failed => None,
        }
    }

    /// Valid moves: the linear successor, or Failed from any live phase
    pub fn can_advance_to(&self, to: RequestPhase) -> bool {
        if self.is_terminal() {
            return false;
        }
        if to == RequestPhase::Failed {
            return true;
        }
        self.next() == Some(to)
    }
}

/// Tracks one request through the pipeline, correlated by a request id
#[derive(Debug)]
pub struct PhaseTracker {
    request_id: Uuid,
    operation: &'static str,
    phase: RequestPhase,
}

impl PhaseTracker {
    pub fn new(operation: &'static str) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            operation,
            phase: RequestPhase::Pending,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    /// Move to the given phase; illegal moves are a programming error
    pub fn enter(&mut self, phase: RequestPhase) {
        debug_assert!(
            self.phase.can_advance_to(phase),
            "illegal phase move {:?} -> {:?}",
            self.phase,
            phase
        );
        debug!(
            request_id = %self.request_id,
            operation = self.operation,
            from = ?self.phase,
            to = ?phase,
            "phase transition"
        );
        self.phase = phase;
    }

    pub fn succeed(&mut self) {
        self.enter(RequestPhase::Succeeded);
    }

    pub fn fail(&mut self, err: &CoachError) {
        debug!(
            request_id = %self.request_id,
            operation = self.operation,
            from = ?self.phase,
            kind = err.machine_tag(),
            "request failed"
        );
        self.phase = RequestPhase::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_pipeline_order() {
        let mut phase = RequestPhase::Pending;
        let expected = [
            RequestPhase::Assembling,
            RequestPhase::Prompting,
            RequestPhase::AwaitingModel,
            RequestPhase::Parsing,
            RequestPhase::Succeeded,
        ];
        for next in expected {
            assert!(phase.can_advance_to(next));
            phase = phase.next().unwrap();
            assert_eq!(phase, next);
        }
        assert!(phase.is_terminal());
        assert!(phase.next().is_none());
    }

    #[test]
    fn test_failure_reachable_from_any_live_phase() {
        for phase in [
            RequestPhase::Pending,
            RequestPhase::Assembling,
            RequestPhase::Prompting,
            RequestPhase::AwaitingModel,
            RequestPhase::Parsing,
        ] {
            assert!(phase.can_advance_to(RequestPhase::Failed));
        }
    }

    #[test]
    fn test_no_skipping_and_no_leaving_terminal() {
        assert!(!RequestPhase::Pending.can_advance_to(RequestPhase::AwaitingModel));
        assert!(!RequestPhase::Succeeded.can_advance_to(RequestPhase::Failed));
        assert!(!RequestPhase::Failed.can_advance_to(RequestPhase::Pending));
    }

    #[test]
    fn test_tracker_walks_and_terminates() {
        let mut tracker = PhaseTracker::new("daily_advice");
        assert_eq!(tracker.phase(), RequestPhase::Pending);

        tracker.enter(RequestPhase::Assembling);
        tracker.enter(RequestPhase::Prompting);
        tracker.enter(RequestPhase::AwaitingModel);
        tracker.enter(RequestPhase::Parsing);
        tracker.succeed();
        assert_eq!(tracker.phase(), RequestPhase::Succeeded);
    }

    #[test]
    fn test_tracker_failure_records_terminal_state() {
        let mut tracker = PhaseTracker::new("weekly_report");
        tracker.enter(RequestPhase::Assembling);
        tracker.fail(&CoachError::Unavailable("down".into()));
        assert_eq!(tracker.phase(), RequestPhase::Failed);
    }
}
