use bytes::Bytes;
use prost::Message;
use reqwest::{
    StatusCode,
    header::{ACCEPT, CONTENT_TYPE, LOCATION},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use crate::{
    Call, Response, call,
    config::ClientConfig,
    errors::ClientError,
    location::resolve_location,
    registry::TaskRegistry,
    response::GetTasks,
};

pub const PROTOBUF_CONTENT_TYPE: &str = "application/x-protobuf";

const API_PATH: &str = "/api/v1";

/// Mesos master operator API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MesosClient {
    http: reqwest::Client,
    api_url: String,
    max_redirects: usize,
}

/// Hands out [`MesosClient`]s for arbitrary base URLs over one connection pool.
///
/// The base URL is configuration that can change between requests, so callers
/// connect per request instead of holding a client.
#[derive(Debug, Clone)]
pub struct MesosConnector {
    http: reqwest::Client,
    max_redirects: usize,
}

impl MesosConnector {
    pub fn new(max_redirects: usize) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            http,
            max_redirects,
        })
    }

    pub fn connect(&self, base_url: &str) -> MesosClient {
        let cfg = ClientConfig::new(base_url).with_max_redirects(self.max_redirects);
        MesosClient::with_http(self.http.clone(), &cfg)
    }
}

/// Outcome of a single HTTP exchange.
enum Hop {
    Done(Bytes),
    Redirect(String),
}

impl MesosClient {
    /// Build a client with its own connection pool.
    pub fn new(cfg: &ClientConfig) -> Result<Self, ClientError> {
        let connector = MesosConnector::new(cfg.max_redirects)?;
        Ok(connector.connect(&cfg.base_url))
    }

    /// Build a client on top of an existing `reqwest::Client`.
    ///
    /// The client must not follow redirects itself, or leader redirects are
    /// swallowed before this client sees them.
    pub fn with_http(http: reqwest::Client, cfg: &ClientConfig) -> Self {
        Self {
            http,
            api_url: format!("{}{}", cfg.base_url.trim_end_matches('/'), API_PATH),
            max_redirects: cfg.max_redirects,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Make a `GET_TASKS` call and return the task collections.
    #[instrument(level = "debug", skip(self, ctx), fields(url = %self.api_url))]
    pub async fn get_tasks(&self, ctx: &CancellationToken) -> Result<GetTasks, ClientError> {
        let req = Call {
            r#type: Some(call::Type::GetTasks as i32),
        };

        let resp = self.call(&req, ctx).await?;
        Ok(resp.get_tasks.unwrap_or_default())
    }

    /// Fresh snapshot of the tasks known to the master.
    pub async fn task_registry(&self, ctx: &CancellationToken) -> Result<TaskRegistry, ClientError> {
        let tasks = self.get_tasks(ctx).await?;
        Ok(TaskRegistry::from_get_tasks(tasks))
    }

    /// Send one call, following leader redirects, and decode the response.
    pub async fn call(&self, req: &Call, ctx: &CancellationToken) -> Result<Response, ClientError> {
        let body = Bytes::from(req.encode_to_vec());
        let mut url = self.api_url.clone();

        for hop in 0..self.max_redirects {
            if ctx.is_cancelled() {
                return Err(ClientError::Cancelled);
            }

            let outcome = tokio::select! {
                biased;
                _ = ctx.cancelled() => return Err(ClientError::Cancelled),
                outcome = self.send(&url, body.clone()) => outcome?,
            };

            match outcome {
                Hop::Done(data) => {
                    trace!(hop, bytes = data.len(), "response received");
                    return Ok(Response::decode(data)?);
                }
                Hop::Redirect(location) => {
                    let next = resolve_location(&url, &location)?;
                    debug!(hop, from = %url, to = %next, "following leader redirect");
                    url = next;
                }
            }
        }

        Err(ClientError::TooManyRedirects(self.max_redirects))
    }

    async fn send(&self, url: &str, body: Bytes) -> Result<Hop, ClientError> {
        let resp = self
            .http
            .post(url)
            .header(CONTENT_TYPE, PROTOBUF_CONTENT_TYPE)
            .header(ACCEPT, PROTOBUF_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TEMPORARY_REDIRECT {
            let location = resp
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or(ClientError::MissingLocation)?;
            return Ok(Hop::Redirect(location.to_string()));
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        Ok(Hop::Done(resp.bytes().await?))
    }
}
