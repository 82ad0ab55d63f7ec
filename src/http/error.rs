use thiserror::Error;

/// Failure of a single request to a remote service
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<ureq::Error> for RequestError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => RequestError::Status(code),
            ureq::Error::Transport(transport) => RequestError::Transport(transport.to_string()),
        }
    }
}

impl From<std::io::Error> for RequestError {
    fn from(err: std::io::Error) -> Self {
        RequestError::Decode(err.to_string())
    }
}

impl RequestError {
    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status(code) => Some(*code),
            RequestError::Transport(_) | RequestError::Decode(_) => None,
        }
    }
}
