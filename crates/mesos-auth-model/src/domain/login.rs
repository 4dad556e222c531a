use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::TaskId;

/// Task ids that have already logged in under one application prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRecord {
    #[serde(default)]
    pub task_ids: BTreeSet<TaskId>,
}

impl LoginRecord {
    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.task_ids.contains(task_id)
    }

    /// Insert a task id; returns `false` if it was already present.
    pub fn insert(&mut self, task_id: TaskId) -> bool {
        self.task_ids.insert(task_id)
    }

    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_duplicates() {
        let mut rec = LoginRecord::default();
        assert!(rec.insert(TaskId::from("app.1")));
        assert!(!rec.insert(TaskId::from("app.1")));
        assert!(rec.insert(TaskId::from("app.2")));
        assert_eq!(rec.len(), 2);
        assert!(rec.contains(&TaskId::from("app.2")));
    }

    #[test]
    fn decodes_missing_field_as_empty() {
        let rec: LoginRecord = serde_json::from_str("{}").unwrap();
        assert!(rec.is_empty());
    }
}
