//! Coaching orchestration: the request pipeline, its phases, and feedback

pub mod feedback;
pub mod orchestrator;
pub mod phase;

pub use feedback::{FeedbackOutcome, FeedbackRecorder};
pub use orchestrator::CoachOrchestrator;
pub use phase::{PhaseTracker, RequestPhase};
