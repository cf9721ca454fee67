/// Error types for the risk engine.
/// Core failures are fatal for a run: the engine either returns statistics
/// or one of these. Display failures are the only ones recovered locally.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid market parameters: {0}")]
    InvalidMarket(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("invalid simulation config: {0}")]
    InvalidSimulation(String),

    #[error("model computation error: {0}")]
    Model(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("unable to display: {0}")]
    Display(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialize(String),
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Serialize(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
