//! Typed access to the records the backend keeps in [`Storage`](crate::Storage).

mod config;
pub use config::ConfigStore;

mod policies;
pub use policies::PolicyStore;

pub(crate) const CONFIG_KEY: &str = "config";
pub(crate) const TASK_POLICIES_PREFIX: &str = "task-policies/";
pub(crate) const LOGINS_PREFIX: &str = "logins/";

pub(crate) fn task_policies_key(prefix: &str) -> String {
    format!("{TASK_POLICIES_PREFIX}{prefix}")
}

pub(crate) fn logins_key(prefix: &str) -> String {
    format!("{LOGINS_PREFIX}{prefix}")
}
