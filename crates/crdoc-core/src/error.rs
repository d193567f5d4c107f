//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid resource catalog: {message}")]
    InvalidCatalog { message: String },

    #[error("Resource '{name}' is declared {count} times in group '{group}'")]
    DuplicateResource {
        group: String,
        name: String,
        count: usize,
    },

    #[error("Invalid release configuration: {message}")]
    InvalidReleases { message: String },

    #[error("Invalid resource document: {message}")]
    InvalidDocument { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
