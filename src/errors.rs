//! Unified application error type.
//! Every stage (fetch, parse, compact, render, publish, db) returns AppError
//! so a failing run always ends in the same place: `main` prints it and exits.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Run log database
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Source data
    // ---------------------------
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid time range on row {row}: '{value}'")]
    InvalidTimeRange { row: usize, value: String },

    #[error("Missing field '{field}' on row {row}")]
    MissingField { row: usize, field: String },

    // ---------------------------
    // Network
    // ---------------------------
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} while requesting {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Response from {url} is not valid UTF-8: {source}")]
    InvalidEncoding {
        url: String,
        source: std::string::FromUtf8Error,
    },

    // ---------------------------
    // Rendering
    // ---------------------------
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    // ---------------------------
    // Publishing
    // ---------------------------
    #[error("Publish authentication failed: {0}")]
    PublishAuth(String),

    #[error("Publish target not found: {0}")]
    PublishNotFound(String),

    #[error("Publish conflict: {0}")]
    PublishConflict(String),

    #[error("Publish error: {0}")]
    Publish(String),

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

pub type AppResult<T> = Result<T, AppError>;
