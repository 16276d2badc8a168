//! Outcome types for reconcile passes.

use std::time::Duration;

/// How a reconcile pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// The resource was deleted between trigger and fetch; nothing was
    /// measured or mutated.
    Skipped,
    /// The observed count already matched the target; status untouched.
    InSync { observed: u64 },
    /// Drift was corrected and the pre-correction observation persisted.
    Corrected { observed: u64, target: u64 },
}

/// Result of one reconcile pass, as reported to the dispatcher.
///
/// A `None` requeue hint means "wait for the next triggering event".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// How the pass ended.
    pub pass: Pass,
    /// Optional hint for the dispatcher to run another pass later.
    pub requeue_after: Option<Duration>,
}

impl ReconcileOutcome {
    /// Outcome for a resource deleted before the pass could start.
    pub fn skipped() -> Self {
        Self {
            pass: Pass::Skipped,
            requeue_after: None,
        }
    }

    /// Outcome for a directory already at its target count.
    pub fn in_sync(observed: u64) -> Self {
        Self {
            pass: Pass::InSync { observed },
            requeue_after: None,
        }
    }

    /// Outcome for a corrected pass.
    pub fn corrected(observed: u64, target: u64, requeue_after: Option<Duration>) -> Self {
        Self {
            pass: Pass::Corrected { observed, target },
            requeue_after,
        }
    }

    /// Whether the pass found nothing left to do.
    pub fn converged(&self) -> bool {
        matches!(self.pass, Pass::Skipped | Pass::InSync { .. })
    }
}
