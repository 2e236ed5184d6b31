use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocGenomeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("Expression error: {0}")]
    Expression(String),

    #[error("Runner error: {0}")]
    Runner(String),

    #[error("TOML error: {0}")]
    Toml(String),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DocGenomeError>;
