//! In-process stand-ins for a Mesos master, for tests.
//!
//! [`FakeMesos`] speaks the protobuf `GET_TASKS` call; [`Redirector`] answers every
//! request with a leader redirect. Both listen on `127.0.0.1` on an ephemeral port
//! and stop when dropped.

use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header},
    response::{IntoResponse, Response as HttpResponse},
    routing::post,
};
use prost::Message;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::{
    Call, PROTOBUF_CONTENT_TYPE, Response, Task, TaskState, call,
    proto::mesos::v1::TaskId as ProtoTaskId, registry::lifecycle_of, response,
};
use mesos_auth_model::TaskLifecycle;

/// Build a task with the given name, id and state.
pub fn mk_task(name: &str, id: &str, state: TaskState) -> Task {
    Task {
        name: Some(name.to_string()),
        task_id: Some(ProtoTaskId {
            value: id.to_string(),
        }),
        state: Some(state as i32),
        ..Default::default()
    }
}

/// A spawned axum server that shuts down when dropped.
pub struct TestServer {
    base_url: String,
    shutdown: CancellationToken,
}

impl TestServer {
    pub async fn serve(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no local addr");
        let shutdown = CancellationToken::new();
        let stop = shutdown.clone().cancelled_owned();

        tokio::spawn(async move {
            let _ = axum::serve(listener, router)
                .with_graceful_shutdown(stop)
                .await;
        });

        Self {
            base_url: format!("http://{addr}"),
            shutdown,
        }
    }

    /// `"http://127.0.0.1:port"`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL without the scheme: `"//127.0.0.1:port"`.
    pub fn scheme_relative_url(&self) -> &str {
        self.base_url.trim_start_matches("http:")
    }

    pub fn api_url(&self) -> String {
        format!("{}/api/v1", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[derive(Default)]
struct FakeState {
    tasks: Mutex<BTreeMap<String, Task>>,
    calls: AtomicUsize,
}

/// Pretends to be the subset of the Mesos v1 master API this crate uses.
///
/// Only protobuf payloads are accepted. Tasks in `TASK_UNKNOWN` are never returned,
/// and the pending and orphan collections are always empty.
pub struct FakeMesos {
    server: TestServer,
    state: Arc<FakeState>,
}

impl FakeMesos {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let router = Router::new()
            .route("/api/v1", post(handle_api))
            .with_state(Arc::clone(&state));
        Self {
            server: TestServer::serve(router).await,
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        self.server.base_url()
    }

    pub fn scheme_relative_url(&self) -> &str {
        self.server.scheme_relative_url()
    }

    pub fn api_url(&self) -> String {
        self.server.api_url()
    }

    /// Number of API calls received so far.
    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    /// Add tasks. Panics if a task id already exists.
    pub fn add_task(&self, tasks: impl IntoIterator<Item = Task>) {
        let mut map = self.state.tasks.lock().expect("fake mesos lock poisoned");
        for task in tasks {
            let id = task_id_of(&task);
            assert!(!map.contains_key(&id), "duplicate task: {id}");
            map.insert(id, task);
        }
    }

    /// Remove tasks by id; missing ids are ignored.
    pub fn remove_task(&self, ids: &[&str]) {
        let mut map = self.state.tasks.lock().expect("fake mesos lock poisoned");
        for id in ids {
            map.remove(*id);
        }
    }

    /// Change the state of existing tasks. Panics if a task does not exist.
    pub fn update_state(&self, state: TaskState, ids: &[&str]) {
        let mut map = self.state.tasks.lock().expect("fake mesos lock poisoned");
        for id in ids {
            let task = map
                .get_mut(*id)
                .unwrap_or_else(|| panic!("unknown task: {id}"));
            task.state = Some(state as i32);
        }
    }
}

fn task_id_of(task: &Task) -> String {
    task.task_id
        .as_ref()
        .map(|t| t.value.clone())
        .unwrap_or_default()
}

async fn handle_api(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResponse {
    state.calls.fetch_add(1, Ordering::SeqCst);

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    if content_type != Some(PROTOBUF_CONTENT_TYPE) {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }

    // Garbage happily decodes to a zero-value call; treat it as one.
    let req = Call::decode(body).unwrap_or_default();
    match call::Type::try_from(req.r#type.unwrap_or_default()) {
        Ok(call::Type::GetTasks) => respond_get_tasks(&state),
        other => (
            StatusCode::BAD_REQUEST,
            format!("invalid operation: {other:?}"),
        )
            .into_response(),
    }
}

fn respond_get_tasks(state: &FakeState) -> HttpResponse {
    let mut get_tasks = response::GetTasks::default();
    {
        let map = state.tasks.lock().expect("fake mesos lock poisoned");
        for task in map.values() {
            match task.state.and_then(lifecycle_of) {
                Some(TaskLifecycle::Active) => get_tasks.tasks.push(task.clone()),
                Some(TaskLifecycle::Terminated) => get_tasks.completed_tasks.push(task.clone()),
                Some(TaskLifecycle::Unreachable) => get_tasks.unreachable_tasks.push(task.clone()),
                None => {}
            }
        }
    }

    let resp = Response {
        r#type: Some(response::Type::GetTasks as i32),
        get_tasks: Some(get_tasks),
    };
    (
        [(header::CONTENT_TYPE, PROTOBUF_CONTENT_TYPE)],
        resp.encode_to_vec(),
    )
        .into_response()
}

/// Where a [`Redirector`] sends its callers.
#[derive(Debug, Clone)]
pub enum RedirectTarget {
    /// Always the same location.
    Fixed(String),
    /// Back to itself via a scheme-relative location, forever.
    SelfLoop,
}

/// A master that is never the leader: every request gets a `307`.
pub struct Redirector {
    server: TestServer,
}

impl Redirector {
    pub async fn start(target: RedirectTarget) -> Self {
        let target = Arc::new(target);
        let router = Router::new()
            .fallback(redirect)
            .with_state(target);
        Self {
            server: TestServer::serve(router).await,
        }
    }

    pub fn base_url(&self) -> &str {
        self.server.base_url()
    }
}

async fn redirect(
    State(target): State<Arc<RedirectTarget>>,
    headers: HeaderMap,
    uri: Uri,
) -> HttpResponse {
    let location = match target.as_ref() {
        RedirectTarget::Fixed(location) => location.clone(),
        RedirectTarget::SelfLoop => {
            let host = headers
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            format!("//{host}{uri}")
        }
    };
    (
        StatusCode::TEMPORARY_REDIRECT,
        [(header::LOCATION, location)],
    )
        .into_response()
}
