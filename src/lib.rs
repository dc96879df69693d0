// Library crate - Robinhood API client and spreadsheet export

pub mod config;
pub mod error;
pub mod export;
pub mod robinhood;

// Re-export commonly used types
pub use config::{ClientConfig, ProxyMode};
pub use error::{Error, Result};
pub use export::{Table, WorkbookWriter};
pub use robinhood::{Bounds, LoginOutcome, RobinhoodClient};
