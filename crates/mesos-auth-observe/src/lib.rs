//! Logger initialisation for the mesos auth daemon.

mod logger;
pub use logger::*;
