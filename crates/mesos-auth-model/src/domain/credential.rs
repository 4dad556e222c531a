use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{TaskId, domain::duration_secs};

/// Key under which the logged-in task id is stashed in [`Credential::internal_data`].
pub const INTERNAL_TASK_ID: &str = "task-id";

/// Credential descriptor handed to the hosting environment's lease scheduler.
///
/// The backend never stores credentials; once issued they belong to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub policies: Vec<String>,
    #[serde(rename = "period_secs", with = "duration_secs")]
    pub period: Duration,
    pub renewable: bool,
    /// Opaque bookkeeping carried through renewals; never shown to the task.
    #[serde(default)]
    pub internal_data: BTreeMap<String, Value>,
}

impl Credential {
    /// Build a renewable credential for a freshly logged-in task.
    pub fn issue(policies: Vec<String>, period: Duration, task_id: &TaskId) -> Self {
        let mut internal_data = BTreeMap::new();
        internal_data.insert(
            INTERNAL_TASK_ID.to_string(),
            Value::String(task_id.as_str().to_string()),
        );
        Self {
            policies,
            period,
            renewable: true,
            internal_data,
        }
    }

    /// Task id stashed at login, if present and a non-empty string.
    pub fn task_id(&self) -> Option<TaskId> {
        match self.internal_data.get(INTERNAL_TASK_ID) {
            Some(Value::String(id)) if !id.is_empty() => Some(TaskId::from(id.as_str())),
            _ => None,
        }
    }

    /// Copy of this credential with a new period; everything else is carried over.
    pub fn with_period(&self, period: Duration) -> Self {
        Self {
            period,
            ..self.clone()
        }
    }
}
