use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid site spec: {0}")]
    InvalidSite(String),

    #[error("malformed transition weights: {0}")]
    InvalidWeights(String),

    #[error("identity pool exhausted after {attempts} IP allocation attempts")]
    IdentityExhausted { attempts: u32 },

    #[error("dwell sampling failed: {0}")]
    Sampling(String),

    #[error("parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
