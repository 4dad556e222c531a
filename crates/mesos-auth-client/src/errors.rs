use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("http request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("mesos responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("leader redirect without a location header")]
    MissingLocation,

    #[error("too many redirects (limit {0})")]
    TooManyRedirects(usize),

    #[error("request cancelled")]
    Cancelled,
}
