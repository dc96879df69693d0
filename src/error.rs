//! Error types for the client and the workbook exporter.
//!
//! Everything the library can fail with is folded into [`Error`] so callers
//! can match on the failure kind. A login that ends in an MFA challenge is
//! not an error; see [`crate::robinhood::LoginOutcome`].

use std::io;

use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Quote lookup returned an empty or undecodable body.
    #[error("Invalid Symbol: {0}")]
    InvalidSymbol(String),

    /// Response body from `url` was not valid JSON.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A projection addressed a key absent from the payload.
    #[error("field '{0}' missing from response")]
    MissingField(String),

    /// A projection found a value it could not coerce.
    #[error("field '{field}' cannot be coerced: {value}")]
    Coercion { field: String, value: String },

    /// Network, DNS, TLS or timeout failure from the transport.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Access token could not be turned into a header value.
    #[error("invalid header value: {0}")]
    Header(#[from] InvalidHeaderValue),

    /// The input provider failed to read from the terminal.
    #[error("input error: {0}")]
    Input(#[from] io::Error),

    /// Environment configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Sheet already exists: [{0}]")]
    SheetExists(String),

    #[error("Sheet doesn't exist: [{0}]")]
    UnknownSheet(String),

    /// Workbook could not be built or written.
    #[error("workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Crate-wide `Result` alias with [`Error`] as the default error.
pub type Result<T, E = Error> = std::result::Result<T, E>;
