mod task_id;
pub use task_id::{AppPrefix, TaskId, derive_prefix};

mod lifecycle;
pub use lifecycle::TaskLifecycle;

mod config;
pub use config::{AuthConfig, ConfigPatch, DEFAULT_PERIOD, format_period, parse_period};

mod policies;
pub use policies::TaskPolicies;

mod login;
pub use login::LoginRecord;

mod credential;
pub use credential::{Credential, INTERNAL_TASK_ID};

pub(crate) mod duration_secs;
