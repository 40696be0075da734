use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Unknown team: {team} has no recorded games")]
    UnknownTeam { team: String },

    #[error("No game data available for either {home} or {away}")]
    NoData { home: String, away: String },

    #[error("Model expects {expected} features but schema lists {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("Invalid probability: {prob}, must be between 0.0 and 1.0")]
    InvalidProbability { prob: f64 },

    #[error("Game log is empty")]
    EmptyDataset,

    #[error("Required column missing from dataset: {column}")]
    MissingColumn { column: String },

    #[error("Malformed game record: {0}")]
    InvalidRecord(String),

    #[error("Invalid feature schema: {0}")]
    InvalidSchema(String),

    #[error("Training failed: {0}")]
    Training(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PredictError>;
