//! Client for the Mesos master v1 operator API.
//!
//! Only `GET_TASKS` is implemented: enough to check whether a task is live.
//! Requests follow "not the leader" redirects across a multi-master cluster.

pub mod proto {
    pub mod mesos {
        pub mod v1 {
            tonic::include_proto!("mesos.v1");

            pub mod master {
                tonic::include_proto!("mesos.v1.master");
            }
        }
    }
}
pub use proto::mesos::v1::{Task, TaskState};
pub use proto::mesos::v1::master::{Call, Response, call, response};

mod client;
pub use client::{MesosClient, MesosConnector, PROTOBUF_CONTENT_TYPE};

mod config;
pub use config::{ClientConfig, DEFAULT_MAX_REDIRECTS};

mod errors;
pub use errors::ClientError;

mod location;
pub use location::resolve_location;

mod registry;
pub use registry::{RegisteredTask, TaskRegistry, lifecycle_of};

#[cfg(any(test, feature = "testing"))]
pub mod testing;
