use serde::{Deserialize, Serialize};

/// Policies granted to every task under one application prefix.
///
/// Order and duplicates are kept exactly as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPolicies {
    pub policies: Vec<String>,
}

impl TaskPolicies {
    pub fn new<I, S>(policies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            policies: policies.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
