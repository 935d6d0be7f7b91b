use megasena_db::models::DrawError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A draw breaks the history invariants. The whole history is rejected.
    #[error("invalid draw data in contest {contest}: {source}")]
    InvalidDrawData {
        contest: u32,
        #[source]
        source: DrawError,
    },

    #[error("contest {contest} is not after contest {previous}")]
    UnorderedHistory { previous: u32, contest: u32 },

    /// Rejected before any generation attempt.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Recoverable: retry with another focus or a higher attempt cap.
    #[error("unable to satisfy constraints after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    #[error("cannot read config {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl EngineError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, EngineError::GenerationExhausted { .. })
    }
}
