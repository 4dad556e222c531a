use serde::{Deserialize, Serialize};

/// Lifecycle class of an orchestrator task.
///
/// Every reported task state maps to exactly one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskLifecycle {
    /// Task existed but no longer does (finished, failed, killed, ...).
    Terminated,
    /// The task's agent lost contact with the master (lost, dropped, unreachable).
    Unreachable,
    /// Task currently exists and is addressable (staging, starting, running, killing).
    Active,
}

impl TaskLifecycle {
    /// Returns `true` only for [`TaskLifecycle::Active`].
    ///
    /// Unreachable tasks cannot be verified and are not treated as active.
    pub fn is_active(&self) -> bool {
        matches!(self, TaskLifecycle::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_is_active() {
        assert!(TaskLifecycle::Active.is_active());
        assert!(!TaskLifecycle::Terminated.is_active());
        assert!(!TaskLifecycle::Unreachable.is_active());
    }

    #[test]
    fn active_outranks_the_rest() {
        assert!(TaskLifecycle::Active > TaskLifecycle::Unreachable);
        assert!(TaskLifecycle::Unreachable > TaskLifecycle::Terminated);
    }
}
