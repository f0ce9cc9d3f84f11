use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("diff session has been disposed")]
    Disposed,

    #[error("invalid session configuration: {0}")]
    Config(String),
}

pub type SessionResult<T> = Result<T, SessionError>;
