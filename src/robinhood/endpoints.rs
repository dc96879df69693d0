//! Endpoint catalog
//!
//! Fixed table of named REST endpoints. The table is built once from a base
//! URL and exposes no way to change it afterwards.

use std::collections::BTreeMap;

/// Logical endpoint names understood by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Endpoint {
    Login,
    InvestmentProfile,
    Accounts,
    AchIavAuth,
    AchRelationships,
    AchTransfers,
    Applications,
    Dividends,
    Edocuments,
    Instruments,
    MarginUpgrades,
    Markets,
    Notifications,
    Orders,
    PasswordReset,
    Portfolios,
    Positions,
    Quotes,
    Historicals,
    DocumentRequests,
    User,
    Watchlists,
    News,
}

impl Endpoint {
    pub const ALL: [Endpoint; 23] = [
        Endpoint::Login,
        Endpoint::InvestmentProfile,
        Endpoint::Accounts,
        Endpoint::AchIavAuth,
        Endpoint::AchRelationships,
        Endpoint::AchTransfers,
        Endpoint::Applications,
        Endpoint::Dividends,
        Endpoint::Edocuments,
        Endpoint::Instruments,
        Endpoint::MarginUpgrades,
        Endpoint::Markets,
        Endpoint::Notifications,
        Endpoint::Orders,
        Endpoint::PasswordReset,
        Endpoint::Portfolios,
        Endpoint::Positions,
        Endpoint::Quotes,
        Endpoint::Historicals,
        Endpoint::DocumentRequests,
        Endpoint::User,
        Endpoint::Watchlists,
        Endpoint::News,
    ];

    /// Catalog key, e.g. `"quotes"`
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Login => "login",
            Endpoint::InvestmentProfile => "investment_profile",
            Endpoint::Accounts => "accounts",
            Endpoint::AchIavAuth => "ach_iav_auth",
            Endpoint::AchRelationships => "ach_relationships",
            Endpoint::AchTransfers => "ach_transfers",
            Endpoint::Applications => "applications",
            Endpoint::Dividends => "dividends",
            Endpoint::Edocuments => "edocuments",
            Endpoint::Instruments => "instruments",
            Endpoint::MarginUpgrades => "margin_upgrades",
            Endpoint::Markets => "markets",
            Endpoint::Notifications => "notifications",
            Endpoint::Orders => "orders",
            Endpoint::PasswordReset => "password_reset",
            Endpoint::Portfolios => "portfolios",
            Endpoint::Positions => "positions",
            Endpoint::Quotes => "quotes",
            Endpoint::Historicals => "historicals",
            Endpoint::DocumentRequests => "document_requests",
            Endpoint::User => "user",
            Endpoint::Watchlists => "watchlists",
            Endpoint::News => "news",
        }
    }

    /// Path relative to the API base, always with a trailing slash
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Login => "/oauth2/token/",
            Endpoint::InvestmentProfile => "/user/investment_profile/",
            Endpoint::Accounts => "/accounts/",
            Endpoint::AchIavAuth => "/ach/iav/auth/",
            Endpoint::AchRelationships => "/ach/relationships/",
            Endpoint::AchTransfers => "/ach/transfers/",
            Endpoint::Applications => "/applications/",
            Endpoint::Dividends => "/dividends/",
            Endpoint::Edocuments => "/documents/",
            Endpoint::Instruments => "/instruments/",
            Endpoint::MarginUpgrades => "/margin/upgrades/",
            Endpoint::Markets => "/markets/",
            Endpoint::Notifications => "/notifications/",
            Endpoint::Orders => "/orders/",
            Endpoint::PasswordReset => "/password_reset/request/",
            Endpoint::Portfolios => "/portfolios/",
            Endpoint::Positions => "/positions/",
            Endpoint::Quotes => "/quotes/",
            Endpoint::Historicals => "/quotes/historicals/",
            Endpoint::DocumentRequests => "/upload/document_requests/",
            Endpoint::User => "/user/",
            Endpoint::Watchlists => "/watchlists/",
            Endpoint::News => "/midlands/news/",
        }
    }

    /// Reverse of [`Endpoint::name`]
    pub fn from_name(name: &str) -> Option<Endpoint> {
        Self::ALL.iter().copied().find(|e| e.name() == name)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Immutable name -> URL table
#[derive(Debug, Clone)]
pub struct EndpointCatalog {
    urls: BTreeMap<Endpoint, String>,
}

impl EndpointCatalog {
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let urls = Endpoint::ALL
            .iter()
            .map(|endpoint| (*endpoint, format!("{}{}", base, endpoint.path())))
            .collect();
        Self { urls }
    }

    /// Full URL for an endpoint
    pub fn url(&self, endpoint: Endpoint) -> &str {
        // every variant is inserted in `new`
        self.urls.get(&endpoint).map(String::as_str).unwrap_or_default()
    }

    /// Look an endpoint up by its catalog key
    pub fn get(&self, name: &str) -> Option<&str> {
        Endpoint::from_name(name).map(|endpoint| self.url(endpoint))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Endpoint, &str)> {
        self.urls.iter().map(|(endpoint, url)| (*endpoint, url.as_str()))
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
