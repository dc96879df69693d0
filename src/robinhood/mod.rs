//! Robinhood API Integration
//!
//! This module wraps the private Robinhood REST API used by the mobile app.
//!
//! # Components
//!
//! - [`client`] - HTTP session with bearer-token authentication
//! - [`endpoints`] - Fixed catalog of named endpoint URLs
//! - [`models`] - Login form, login outcome and field names
//! - [`fields`] - Projection of single values out of JSON payloads
//! - [`input`] - Prompt capability for symbols and credentials
//!
//! # Environment Variables
//!
//! - `ROBINHOOD_BASE_URL` (optional) - API host, defaults to production
//! - `ROBINHOOD_TIMEOUT_SECS` (optional) - Request timeout, defaults to 30
//! - `ROBINHOOD_PROXY` (optional) - `none`, or a proxy URL; by default the
//!   usual `HTTP(S)_PROXY` variables are honoured
//!
//! # Usage
//!
//! ```rust,ignore
//! use robinhood_client::robinhood::{LoginOutcome, RobinhoodClient};
//!
//! let mut client = RobinhoodClient::from_env()?;
//!
//! match client.login("user", "pass", None).await? {
//!     LoginOutcome::LoggedIn => {}
//!     challenge if challenge.mfa_required() => {
//!         client.login("user", "pass", Some("123456")).await?;
//!     }
//!     LoginOutcome::Challenge(payload) => anyhow::bail!("login failed: {}", payload),
//! }
//!
//! let owned = client.securities_owned().await?;
//! let price = client.last_trade_price("AAPL").await?;
//! ```
//!
//! # API Endpoints Used
//!
//! - `POST /oauth2/token/` - Authentication
//! - `GET /quotes/{symbol}/` - Quotes (sent without the session)
//! - `GET /quotes/historicals/` - Historical bars
//! - `GET /positions/`, `/portfolios/`, `/accounts/` - Account state
//! - `GET /orders/`, `/dividends/`, `/user/investment_profile/`
//! - `GET /instruments/` - Instrument search and lookup
//! - `GET /midlands/news/{symbol}/` - News

pub mod client;
pub mod endpoints;
pub mod fields;
pub mod input;
pub mod models;

// Re-export commonly used types
pub use client::RobinhoodClient;
pub use endpoints::{Endpoint, EndpointCatalog};
pub use input::{InputProvider, TerminalInput};
pub use models::{Bounds, LoginOutcome, PortfolioField, QuoteField};
