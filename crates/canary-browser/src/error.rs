use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

impl From<Error> for canary_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Navigation { url, message } => canary_core::Error::Navigation { url, message },
            other => canary_core::Error::Driver(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
