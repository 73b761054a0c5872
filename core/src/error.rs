use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cannot connect to data store '{path}': {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Unknown scenario '{label}'")]
    UnknownScenario { label: String },

    #[error("Unknown display mode '{label}'")]
    UnknownMode { label: String },

    #[error("Unknown registration filter '{label}'")]
    UnknownFilterMode { label: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DashResult<T> = Result<T, DashError>;
