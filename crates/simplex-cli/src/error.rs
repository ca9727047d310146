use simplex_solver::{ParseOpError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Error reading {0}: {1}")]
    Io(String, std::io::Error),
    #[error("Invalid problem file {0}: {1}")]
    Json(String, serde_json::Error),
    #[error("Invalid config file {0}: {1}")]
    Config(String, serde_yaml::Error),
    #[error("{0}")]
    Operator(#[from] ParseOpError),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Error writing output: {0}")]
    Output(#[from] serde_json::Error),
}
