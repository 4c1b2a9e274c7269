use thiserror::Error;

/// Failure of an HTTP call after the client has given up retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} returned an empty body")]
    EmptyBody { url: String },
}

impl TransportError {
    pub fn url(&self) -> &str {
        match self {
            TransportError::Request { url, .. }
            | TransportError::Status { url, .. }
            | TransportError::EmptyBody { url } => url,
        }
    }
}

/// The payload was not well-formed JSON of the expected shape.
#[derive(Error, Debug)]
#[error("Malformed payload: {0}")]
pub struct DecodeError(#[from] pub serde_json::Error);

/// Failure of a single fetch-then-decode step.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] eyre::Report),
}

impl From<TransportError> for SyncError {
    fn from(err: TransportError) -> Self {
        SyncError::Fetch(err.into())
    }
}

impl From<DecodeError> for SyncError {
    fn from(err: DecodeError) -> Self {
        SyncError::Fetch(err.into())
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
