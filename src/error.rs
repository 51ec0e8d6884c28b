// ===== chromaforge/src/error.rs =====
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChromaForgeError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Solver Error: {0}")]
    Solver(String),
}

pub type CfResult<T> = Result<T, ChromaForgeError>;
