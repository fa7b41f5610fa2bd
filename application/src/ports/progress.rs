//! Progress notification port
//!
//! Defines the interface for reporting progress while a submission is graded.

use gradewise_domain::{GradingOutcome, GradingState, Tier};

/// Callback for progress updates during grading
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log lines, etc.)
pub trait GradingProgressNotifier: Send + Sync {
    /// Called when the orchestrator enters a state
    fn on_state(&self, state: GradingState, item_count: usize);

    /// Called once extraction has finished, with the winning tier if any
    fn on_extraction(&self, _tier: Option<Tier>) {}

    /// Called when grading completes
    fn on_complete(&self, _outcome: &GradingOutcome) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl GradingProgressNotifier for NoProgress {
    fn on_state(&self, _state: GradingState, _item_count: usize) {}
}
