pub mod error;
pub use error::AuthError;

pub mod storage;
pub use storage::{InmemStorage, Storage, StorageEntry, StorageError};

pub mod store;
pub use store::{ConfigStore, PolicyStore};

pub mod ledger;
pub use ledger::{Claim, LoginLedger};

pub mod metrics;
pub use metrics::{AuthMetrics, NoopMetrics, Outcome};

pub mod backend;
pub use backend::MesosAuthBackend;
