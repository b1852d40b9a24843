use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The semantic collaborator failed or timed out. The lexical index is
    /// not consulted when this is returned.
    #[error("Semantic retrieval failed: {0}")]
    SemanticRetrieval(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
