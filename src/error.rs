use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodeTimeError>;

#[derive(Error, Debug)]
pub enum CodeTimeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}: {stderr}")]
    Exit {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
    #[error("Output of `{0}` is not valid UTF-8")]
    Utf8(String),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Other: {0}")]
    Other(String),
}

// Large foreign errors are stored boxed
impl From<gix::discover::Error> for CodeTimeError {
    fn from(err: gix::discover::Error) -> Self {
        CodeTimeError::GitDiscover(Box::new(err))
    }
}

impl From<ureq::Error> for CodeTimeError {
    fn from(err: ureq::Error) -> Self {
        CodeTimeError::Http(Box::new(err))
    }
}
