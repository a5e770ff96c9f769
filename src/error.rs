use thiserror::Error;

pub type Result<T> = std::result::Result<T, SahayakError>;

#[derive(Error, Debug)]
pub enum SahayakError {
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Other error: {0}")]
    Other(String),
}
