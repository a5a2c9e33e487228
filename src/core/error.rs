//! Errors raised while migrating rows

use miette::Diagnostic;
use thiserror::Error;

/// Every variant is fatal: the run stops at the first one.
#[derive(Debug, Error, Diagnostic)]
pub enum MigrationError {
    #[error("Could not create test '{name}'")]
    #[diagnostic(
        code(octane_migrate::create_failed),
        help("The server accepted the request but returned no created entity")
    )]
    CreateFailed { name: String },

    #[error("Failed to create parameters table '{name}'")]
    #[diagnostic(code(octane_migrate::table_create_failed))]
    TableCreateFailed { name: String },

    #[error("Failed to update test {test_id}: no entity was updated")]
    #[diagnostic(code(octane_migrate::update_failed))]
    UpdateFailed { test_id: String },

    #[error("Record {record} has no column {column}")]
    #[diagnostic(
        code(octane_migrate::missing_column),
        help("Each data row needs 9 columns: name, description, (unused), steps, 4 parameter columns, expected result")
    )]
    MissingColumn { record: u64, column: usize },

    #[error("CSV error: {0}")]
    #[diagnostic(code(octane_migrate::csv))]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(octane_migrate::http))]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} failed with status {status}: {body}")]
    #[diagnostic(code(octane_migrate::status))]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Sign-in rejected with status {status}")]
    #[diagnostic(
        code(octane_migrate::auth),
        help("Check the API key (client_id/client_secret) or user/password")
    )]
    Auth { status: u16 },

    #[error("Invalid response from {url}: {message}")]
    #[diagnostic(code(octane_migrate::invalid_response))]
    InvalidResponse { url: String, message: String },
}
