use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Orchestrator-assigned task identifier, e.g. `"billing.7f3c2a1e-..."`.
///
/// Mesos (Marathon) task ids are `<application>.<uniqueness suffix>`; everything
/// before the last `.` names the application the task belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Application prefix this task id belongs to.
    pub fn prefix(&self) -> Result<AppPrefix, ModelError> {
        derive_prefix(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Application prefix policies and logins are registered under.
///
/// Always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppPrefix(String);

impl AppPrefix {
    pub fn new(prefix: impl Into<String>) -> Result<Self, ModelError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(ModelError::EmptyPrefix);
        }
        Ok(Self(prefix))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AppPrefix {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AppPrefix> for String {
    fn from(prefix: AppPrefix) -> Self {
        prefix.0
    }
}

impl AsRef<str> for AppPrefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the application prefix from a task id.
///
/// The prefix is everything before the last `.`; the suffix after it is discarded.
/// Ids without a `.`, or whose last `.` is the first character, have no prefix.
pub fn derive_prefix(task_id: &str) -> Result<AppPrefix, ModelError> {
    match task_id.rfind('.') {
        Some(idx) if idx > 0 => Ok(AppPrefix(task_id[..idx].to_string())),
        _ => Err(ModelError::MalformedTaskId(task_id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn prefix_is_everything_before_last_dot() {
        assert_eq!(derive_prefix("app.abc-123").unwrap().as_str(), "app");
        assert_eq!(derive_prefix("my.nested.app.xyz").unwrap().as_str(), "my.nested.app");
        assert_eq!(derive_prefix("app.").unwrap().as_str(), "app");
    }

    #[test]
    fn ids_without_prefix_are_malformed() {
        for id in ["", "nodot", ".leading", "."] {
            assert_eq!(
                derive_prefix(id),
                Err(ModelError::MalformedTaskId(id.to_string())),
                "id {id:?}"
            );
        }
    }

    #[test]
    fn task_id_prefix_delegates() {
        let id = TaskId::from("billing.abc-1");
        assert_eq!(id.prefix().unwrap(), AppPrefix::new("billing").unwrap());
    }

    #[test]
    fn app_prefix_rejects_empty() {
        assert_eq!(AppPrefix::new(""), Err(ModelError::EmptyPrefix));
        assert!(serde_json::from_str::<AppPrefix>(r#""""#).is_err());
        let p: AppPrefix = serde_json::from_str(r#""billing""#).unwrap();
        assert_eq!(p.as_str(), "billing");
    }

    proptest! {
        #[test]
        fn prefix_and_suffix_split_at_last_dot(prefix in "[a-z0-9./-]{0,12}[a-z0-9-]", suffix in "[a-z0-9-]{0,12}") {
            let id = format!("{prefix}.{suffix}");
            let derived = derive_prefix(&id).unwrap();
            prop_assert_eq!(derived.as_str(), prefix.as_str());
        }

        #[test]
        fn ids_without_dot_never_have_prefix(id in "[a-z0-9-]{0,24}") {
            prop_assert!(derive_prefix(&id).is_err());
        }

        #[test]
        fn leading_dot_only_never_has_prefix(rest in "[a-z0-9-]{0,24}") {
            let id = format!(".{rest}");
            prop_assert!(derive_prefix(&id).is_err());
        }
    }
}
