//! Domain types shared by the Mesos task-identity auth backend.
//!
//! Nothing in here performs I/O: the types describe tasks, application prefixes,
//! stored records and the credentials handed back to the hosting environment.

mod domain;
pub use domain::*;

mod error;
pub use error::ModelError;
