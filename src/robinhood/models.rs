//! Robinhood API Data Models
//!
//! Request types and the few response shapes the client interprets. Most
//! responses are handed back as raw `serde_json::Value`.

use serde::Serialize;
use serde_json::Value;

/// OAuth client id the mobile app authenticates with
pub const CLIENT_ID: &str = "c82SH0WZOsabOXGP2sxqcj34FxkvfnWRZBKlBjFS";

/// Requested token lifetime in seconds
pub const TOKEN_EXPIRES_IN: u64 = 86400;

// ============================================================================
// Authentication
// ============================================================================

/// Form body for the password grant
#[derive(Debug, Serialize)]
pub struct LoginForm<'a> {
    pub client_id: &'a str,
    pub expires_in: u64,
    pub grant_type: &'a str,
    pub password: &'a str,
    pub scope: &'a str,
    pub username: &'a str,
    /// Only sent when the caller has a non-empty code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfa_code: Option<&'a str>,
}

impl<'a> LoginForm<'a> {
    pub fn new(username: &'a str, password: &'a str, mfa_code: Option<&'a str>) -> Self {
        Self {
            client_id: CLIENT_ID,
            expires_in: TOKEN_EXPIRES_IN,
            grant_type: "password",
            password,
            scope: "internal",
            username,
            mfa_code: mfa_code.filter(|code| !code.is_empty()),
        }
    }
}

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Token stored and bearer header installed
    LoggedIn,
    /// No token in the response: MFA challenge or server error payload
    Challenge(Value),
}

impl LoginOutcome {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, LoginOutcome::LoggedIn)
    }

    /// True when the server asked for a second factor
    pub fn mfa_required(&self) -> bool {
        match self {
            LoginOutcome::LoggedIn => false,
            LoginOutcome::Challenge(payload) => payload
                .get("mfa_required")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            LoginOutcome::LoggedIn => None,
            LoginOutcome::Challenge(payload) => Some(payload),
        }
    }
}

// ============================================================================
// Historicals
// ============================================================================

/// Trading session bounds for historical quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bounds {
    /// Regular trading hours
    #[default]
    Regular,
    /// Include pre and post market
    Extended,
}

impl Bounds {
    pub fn as_str(self) -> &'static str {
        match self {
            Bounds::Regular => "regular",
            Bounds::Extended => "extended",
        }
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Bounds {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regular" => Ok(Bounds::Regular),
            "extended" => Ok(Bounds::Extended),
            other => Err(format!("unknown bounds '{}', expected regular or extended", other)),
        }
    }
}

// ============================================================================
// Projected fields
// ============================================================================

/// Numeric quote fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteField {
    AskPrice,
    AskSize,
    BidPrice,
    BidSize,
    LastTradePrice,
    PreviousClose,
    AdjustedPreviousClose,
}

impl QuoteField {
    pub fn key(self) -> &'static str {
        match self {
            QuoteField::AskPrice => "ask_price",
            QuoteField::AskSize => "ask_size",
            QuoteField::BidPrice => "bid_price",
            QuoteField::BidSize => "bid_size",
            QuoteField::LastTradePrice => "last_trade_price",
            QuoteField::PreviousClose => "previous_close",
            QuoteField::AdjustedPreviousClose => "adjusted_previous_close",
        }
    }
}

/// Numeric portfolio fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioField {
    AdjustedEquityPreviousClose,
    Equity,
    EquityPreviousClose,
    ExcessMargin,
    ExtendedHoursEquity,
    ExtendedHoursMarketValue,
    LastCoreEquity,
    LastCoreMarketValue,
    MarketValue,
}

impl PortfolioField {
    pub const ALL: [PortfolioField; 9] = [
        PortfolioField::AdjustedEquityPreviousClose,
        PortfolioField::Equity,
        PortfolioField::EquityPreviousClose,
        PortfolioField::ExcessMargin,
        PortfolioField::ExtendedHoursEquity,
        PortfolioField::ExtendedHoursMarketValue,
        PortfolioField::LastCoreEquity,
        PortfolioField::LastCoreMarketValue,
        PortfolioField::MarketValue,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PortfolioField::AdjustedEquityPreviousClose => "adjusted_equity_previous_close",
            PortfolioField::Equity => "equity",
            PortfolioField::EquityPreviousClose => "equity_previous_close",
            PortfolioField::ExcessMargin => "excess_margin",
            PortfolioField::ExtendedHoursEquity => "extended_hours_equity",
            PortfolioField::ExtendedHoursMarketValue => "extended_hours_market_value",
            PortfolioField::LastCoreEquity => "last_core_equity",
            PortfolioField::LastCoreMarketValue => "last_core_market_value",
            PortfolioField::MarketValue => "market_value",
        }
    }
}
