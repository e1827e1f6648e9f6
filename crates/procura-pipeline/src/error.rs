use procura_client::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("backend call failed: {0}")]
    Api(#[from] ApiError),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("email must not be empty")]
    EmptyEmail,
}
