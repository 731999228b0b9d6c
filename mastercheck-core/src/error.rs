use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} not found in PATH")]
    ToolNotFound(String),

    #[error("{tool} command timed out after {secs}s")]
    ToolTimeout { tool: String, secs: u64 },

    #[error("{0} not responding properly")]
    ToolUnresponsive(String),

    #[error("Encoding support ({0}) not found")]
    CapabilityMissing(String),

    #[error("Fixture synthesis failed: {0}")]
    FixtureSynthesisFailed(String),

    #[error("Decode failure: {0}")]
    DecodeAdapterFailure(String),

    #[error("Processing failed: {0}")]
    PipelineProcessingFailure(String),

    #[error("Result file was not created: {0}")]
    ArtifactNotProduced(String),

    #[error("Invalid artifact: {0}")]
    ArtifactInvalid(String),

    #[error("Failed to publish sample: {0}")]
    PublishIOFailure(String),

    #[error("Outcome already recorded for unit '{0}'")]
    DuplicateOutcome(String),
}

pub type Result<T> = std::result::Result<T, CheckError>;
