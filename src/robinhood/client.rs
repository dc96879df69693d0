//! Robinhood API Client
//!
//! HTTP client for the Robinhood REST API with bearer-token authentication.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, AUTHORIZATION,
    CONNECTION, CONTENT_TYPE, USER_AGENT,
};
use reqwest::{Client, Proxy, RequestBuilder};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::endpoints::{Endpoint, EndpointCatalog};
use super::fields;
use super::input::{InputProvider, TerminalInput};
use super::models::*;
use crate::config::{ClientConfig, ProxyMode};
use crate::error::{Error, Result};

/// User agent of the iOS app the API expects
pub const USER_AGENT_VALUE: &str = "Robinhood/823 (iPhone; iOS 7.1.2; Scale/2.00)";

/// API version header name
pub const API_VERSION_HEADER: &str = "x-robinhood-api-version";

/// Robinhood API client holding one session
pub struct RobinhoodClient {
    client: Client,
    endpoints: EndpointCatalog,
    headers: HeaderMap,
    token: Option<String>,
    input: Box<dyn InputProvider>,
}

impl RobinhoodClient {
    /// Create a new client from environment variables
    ///
    /// See [`ClientConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Create a new client with explicit configuration
    ///
    /// No request is sent until the first API call.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Self::build_transport(&config)?;

        debug!(
            "Robinhood client ready: base={} timeout={:?} proxy={}",
            config.base_url, config.timeout, config.proxy
        );

        Ok(Self {
            client,
            endpoints: EndpointCatalog::new(&config.base_url),
            headers: default_headers(),
            token: None,
            input: Box::new(TerminalInput),
        })
    }

    /// Replace the terminal prompt with another input source
    pub fn with_input(mut self, input: impl InputProvider + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    fn build_transport(config: &ClientConfig) -> Result<Client> {
        let builder = Client::builder().timeout(config.timeout);

        let builder = match &config.proxy {
            ProxyMode::FromEnvironment => builder,
            ProxyMode::Disabled => builder.no_proxy(),
            ProxyMode::Url(url) => builder.proxy(Proxy::all(url.as_str())?),
        };

        Ok(builder.build()?)
    }

    pub fn endpoints(&self) -> &EndpointCatalog {
        &self.endpoints
    }

    /// Headers sent with every session request
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Current `Authorization` header value, if logged in
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Log in with the password grant
    ///
    /// A response without `access_token` (MFA challenge, bad credentials) is
    /// returned as [`LoginOutcome::Challenge`] and leaves the session as it
    /// was. The HTTP status is not checked; only an undecodable body fails.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        mfa_code: Option<&str>,
    ) -> Result<LoginOutcome> {
        info!("Logging in to Robinhood as {}...", username);

        let url = self.endpoints.url(Endpoint::Login).to_string();
        let form = LoginForm::new(username, password, mfa_code);

        // session headers go last so their charset-qualified content type wins
        let response = self
            .client
            .post(&url)
            .form(&form)
            .headers(self.headers.clone())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!("Login returned status {}", status);
        }

        let payload = decode(&url, &body)?;
        let token = payload
            .get("access_token")
            .and_then(Value::as_str)
            .map(str::to_owned);

        match token {
            Some(token) => {
                let mut header = HeaderValue::from_str(&format!("Bearer {}", token))?;
                header.set_sensitive(true);
                self.headers.insert(AUTHORIZATION, header);
                self.token = Some(token);

                info!("Successfully logged in to Robinhood");
                Ok(LoginOutcome::LoggedIn)
            }
            None => {
                let outcome = LoginOutcome::Challenge(payload);
                if outcome.mfa_required() {
                    info!("Login requires an MFA code");
                } else {
                    warn!("Login response carried no access token");
                }
                Ok(outcome)
            }
        }
    }

    /// Ask the input provider for credentials, then log in without MFA
    pub async fn login_prompt(&mut self) -> Result<LoginOutcome> {
        let username = self.input.read_line("Username: ")?;
        let password = self.input.read_secret("Password: ")?;
        self.login(&username, &password, None).await
    }

    // ========================================================================
    // Transport helpers
    // ========================================================================

    /// GET with the session headers
    async fn session_get(&self, url: &str) -> Result<Value> {
        let request = self.client.get(url).headers(self.headers.clone());
        fetch(url, request).await
    }

    /// GET with the session headers and a query string
    async fn session_get_query(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let request = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .query(query);
        fetch(url, request).await
    }

    /// GET outside the session: no default headers, no bearer token
    async fn public_get(&self, url: &str) -> Result<Value> {
        fetch(url, self.client.get(url)).await
    }

    /// Authenticated GET of an arbitrary URL
    pub async fn get_url(&self, url: &str) -> Result<Value> {
        self.session_get(url).await
    }

    // ========================================================================
    // Quotes
    // ========================================================================

    /// Fetch the quote object for `symbol`
    ///
    /// An empty symbol is asked for through the input provider and used as
    /// typed. The request goes out without the session headers.
    pub async fn quote_data(&self, symbol: &str) -> Result<Value> {
        let symbol = if symbol.trim().is_empty() {
            self.input.read_line("Symbol: ")?
        } else {
            symbol.to_string()
        };

        let url = format!("{}{}/", self.endpoints.url(Endpoint::Quotes), symbol);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let body = response.text().await?;

        match serde_json::from_str::<Value>(&body) {
            Ok(quote) if !fields::is_empty(&quote) => Ok(quote),
            _ => Err(Error::InvalidSymbol(symbol)),
        }
    }

    /// Numeric quote field, re-fetched on every call
    pub async fn quote_field(&self, symbol: &str, field: QuoteField) -> Result<f64> {
        let quote = self.quote_data(symbol).await?;
        fields::float_field(&quote, field.key())
    }

    pub async fn get_quote(&self, symbol: &str) -> Result<String> {
        let quote = self.quote_data(symbol).await?;
        fields::string_field(&quote, "symbol")
    }

    pub async fn ask_price(&self, symbol: &str) -> Result<f64> {
        self.quote_field(symbol, QuoteField::AskPrice).await
    }

    pub async fn ask_size(&self, symbol: &str) -> Result<f64> {
        self.quote_field(symbol, QuoteField::AskSize).await
    }

    pub async fn bid_price(&self, symbol: &str) -> Result<f64> {
        self.quote_field(symbol, QuoteField::BidPrice).await
    }

    pub async fn bid_size(&self, symbol: &str) -> Result<f64> {
        self.quote_field(symbol, QuoteField::BidSize).await
    }

    pub async fn last_trade_price(&self, symbol: &str) -> Result<f64> {
        self.quote_field(symbol, QuoteField::LastTradePrice).await
    }

    pub async fn previous_close(&self, symbol: &str) -> Result<f64> {
        self.quote_field(symbol, QuoteField::PreviousClose).await
    }

    pub async fn adjusted_previous_close(&self, symbol: &str) -> Result<f64> {
        self.quote_field(symbol, QuoteField::AdjustedPreviousClose).await
    }

    pub async fn previous_close_date(&self, symbol: &str) -> Result<String> {
        let quote = self.quote_data(symbol).await?;
        fields::string_field(&quote, "previous_close_date")
    }

    pub async fn symbol(&self, symbol: &str) -> Result<String> {
        self.get_quote(symbol).await
    }

    /// `updated_at` timestamp of the quote, as sent by the server
    pub async fn last_updated_at(&self, symbol: &str) -> Result<String> {
        let quote = self.quote_data(symbol).await?;
        fields::string_field(&quote, "updated_at")
    }

    /// Historical bars for several symbols
    ///
    /// Accepted combinations are decided by the server:
    /// - `5minute` or `10minute` with span `day` or `week`
    /// - `day` with span `year`
    /// - `week` with any span
    ///
    /// Nothing is validated here; a rejection comes back as the decoded body.
    pub async fn get_historical_quotes<S: AsRef<str>>(
        &self,
        symbols: &[S],
        interval: &str,
        span: &str,
        bounds: Bounds,
    ) -> Result<Value> {
        let symbols = symbols
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(",")
            .to_uppercase();

        debug!(
            "Fetching historicals for {} ({} / {} / {})",
            symbols, interval, span, bounds
        );

        self.session_get_query(
            self.endpoints.url(Endpoint::Historicals),
            &[
                ("symbols", symbols.as_str()),
                ("interval", interval),
                ("span", span),
                ("bounds", bounds.as_str()),
            ],
        )
        .await
    }

    pub async fn get_news(&self, symbol: &str) -> Result<Value> {
        let url = format!(
            "{}{}/",
            self.endpoints.url(Endpoint::News),
            symbol.to_uppercase()
        );
        self.session_get(&url).await
    }

    // ========================================================================
    // Instruments
    // ========================================================================

    /// Search instruments, returns the `results` listing
    pub async fn instruments(&self, query: &str) -> Result<Vec<Value>> {
        let query = query.to_uppercase();
        let payload = self
            .session_get_query(
                self.endpoints.url(Endpoint::Instruments),
                &[("query", query.as_str())],
            )
            .await?;
        Ok(fields::results(&payload)?.clone())
    }

    /// Ticker for an instrument URL (fetched outside the session)
    pub async fn get_symbol_by_instrument(&self, url: &str) -> Result<String> {
        let instrument = self.public_get(url).await?;
        fields::string_field(&instrument, "symbol")
    }

    /// Company name for an instrument URL (fetched outside the session)
    pub async fn get_name_by_instrument(&self, url: &str) -> Result<String> {
        let instrument = self.public_get(url).await?;
        fields::string_field(&instrument, "name")
    }

    // ========================================================================
    // Account Methods
    // ========================================================================

    pub async fn investment_profile(&self) -> Result<Value> {
        self.session_get(self.endpoints.url(Endpoint::InvestmentProfile))
            .await
    }

    /// First account of the user
    pub async fn get_account(&self) -> Result<Value> {
        let payload = self.session_get(self.endpoints.url(Endpoint::Accounts)).await?;
        fields::first_result(payload)
    }

    pub async fn order_history(&self) -> Result<Value> {
        self.session_get(self.endpoints.url(Endpoint::Orders)).await
    }

    pub async fn dividends(&self) -> Result<Value> {
        self.session_get(self.endpoints.url(Endpoint::Dividends)).await
    }

    // ========================================================================
    // Portfolio Methods
    // ========================================================================

    /// The user's portfolio record
    pub async fn portfolios(&self) -> Result<Value> {
        let payload = self
            .session_get(self.endpoints.url(Endpoint::Portfolios))
            .await?;
        fields::first_result(payload)
    }

    /// Numeric portfolio field, re-fetched on every call
    pub async fn portfolio_field(&self, field: PortfolioField) -> Result<f64> {
        let portfolio = self.portfolios().await?;
        fields::float_field(&portfolio, field.key())
    }

    pub async fn adjusted_equity_previous_close(&self) -> Result<f64> {
        self.portfolio_field(PortfolioField::AdjustedEquityPreviousClose)
            .await
    }

    pub async fn equity(&self) -> Result<f64> {
        self.portfolio_field(PortfolioField::Equity).await
    }

    pub async fn equity_previous_close(&self) -> Result<f64> {
        self.portfolio_field(PortfolioField::EquityPreviousClose)
            .await
    }

    pub async fn excess_margin(&self) -> Result<f64> {
        self.portfolio_field(PortfolioField::ExcessMargin).await
    }

    pub async fn extended_hours_equity(&self) -> Result<f64> {
        self.portfolio_field(PortfolioField::ExtendedHoursEquity)
            .await
    }

    pub async fn extended_hours_market_value(&self) -> Result<f64> {
        self.portfolio_field(PortfolioField::ExtendedHoursMarketValue)
            .await
    }

    pub async fn last_core_equity(&self) -> Result<f64> {
        self.portfolio_field(PortfolioField::LastCoreEquity).await
    }

    pub async fn last_core_market_value(&self) -> Result<f64> {
        self.portfolio_field(PortfolioField::LastCoreMarketValue)
            .await
    }

    pub async fn market_value(&self) -> Result<f64> {
        self.portfolio_field(PortfolioField::MarketValue).await
    }

    // ========================================================================
    // Position Methods
    // ========================================================================

    /// Raw positions listing
    pub async fn positions(&self) -> Result<Value> {
        self.session_get(self.endpoints.url(Endpoint::Positions)).await
    }

    /// Tickers of every position with a positive quantity, in listing order
    ///
    /// Resolves each owned position's instrument with its own request, one
    /// after the other. Any failed lookup fails the whole call.
    pub async fn securities_owned(&self) -> Result<Vec<String>> {
        let positions = self.positions().await?;
        let mut securities = Vec::new();

        for position in fields::results(&positions)? {
            let quantity = fields::float_field(position, "quantity")?;
            if quantity <= 0.0 {
                continue;
            }

            let instrument_url = fields::string_field(position, "instrument")?;
            let instrument = self.session_get(&instrument_url).await?;
            securities.push(fields::string_field(&instrument, "symbol")?);
        }

        debug!("Found {} owned securities", securities.len());
        Ok(securities)
    }
}

/// Headers the mobile app sends on every request
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en;q=1, fr;q=0.9, de;q=0.8, ja;q=0.7, nl;q=0.6"),
    );
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded; charset=utf-8"),
    );
    headers.insert(
        HeaderName::from_static(API_VERSION_HEADER),
        HeaderValue::from_static("1.0.0"),
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    headers
}

/// Send a GET and decode the body regardless of status
async fn fetch(url: &str, request: RequestBuilder) -> Result<Value> {
    debug!("GET {}", url);

    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("GET {} returned {}", url, status);
    }

    decode(url, &body)
}

fn decode(url: &str, body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|source| Error::Decode {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;
    use std::io;

    struct StubInput {
        answer: &'static str,
    }

    impl InputProvider for StubInput {
        fn read_line(&self, _prompt: &str) -> io::Result<String> {
            Ok(self.answer.to_string())
        }

        fn read_secret(&self, _prompt: &str) -> io::Result<String> {
            Ok("secret".to_string())
        }
    }

    fn client_for(server: &ServerGuard) -> RobinhoodClient {
        let config = ClientConfig::default()
            .with_base_url(server.url())
            .with_proxy(ProxyMode::Disabled);
        RobinhoodClient::new(config).unwrap()
    }

    async fn logged_in_client(server: &mut ServerGuard, token: &str) -> RobinhoodClient {
        server
            .mock("POST", "/oauth2/token/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"access_token": token, "token_type": "Bearer"}).to_string())
            .create_async()
            .await;

        let mut client = client_for(server);
        let outcome = client.login("alice", "hunter2", None).await.unwrap();
        assert_eq!(outcome, LoginOutcome::LoggedIn);
        client
    }

    fn quote_payload() -> Value {
        json!({
            "ask_price": "182.3400",
            "ask_size": 300,
            "bid_price": "182.3100",
            "bid_size": 100,
            "last_trade_price": "182.3250",
            "previous_close": "180.0000",
            "adjusted_previous_close": "180.0000",
            "previous_close_date": "2026-10-16",
            "symbol": "AAPL",
            "updated_at": "2026-10-17T20:00:00Z"
        })
    }

    #[test]
    fn test_new_sets_default_headers_without_authorization() {
        let client = RobinhoodClient::new(
            ClientConfig::default().with_proxy(ProxyMode::Disabled),
        )
        .unwrap();

        let headers = client.headers();
        assert_eq!(headers[ACCEPT], "*/*");
        assert_eq!(headers[ACCEPT_ENCODING], "gzip, deflate");
        assert_eq!(
            headers[ACCEPT_LANGUAGE],
            "en;q=1, fr;q=0.9, de;q=0.8, ja;q=0.7, nl;q=0.6"
        );
        assert_eq!(
            headers[CONTENT_TYPE],
            "application/x-www-form-urlencoded; charset=utf-8"
        );
        assert_eq!(headers[API_VERSION_HEADER], "1.0.0");
        assert_eq!(headers[CONNECTION], "keep-alive");
        assert_eq!(headers[USER_AGENT], USER_AGENT_VALUE);
        assert!(client.authorization().is_none());
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_installs_bearer_header() {
        let mut server = Server::new_async().await;

        let login = server
            .mock("POST", "/oauth2/token/")
            .match_header(
                "content-type",
                "application/x-www-form-urlencoded; charset=utf-8",
            )
            .match_header("x-robinhood-api-version", "1.0.0")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("client_id".into(), CLIENT_ID.into()),
                Matcher::UrlEncoded("expires_in".into(), "86400".into()),
                Matcher::UrlEncoded("grant_type".into(), "password".into()),
                Matcher::UrlEncoded("scope".into(), "internal".into()),
                Matcher::UrlEncoded("username".into(), "alice".into()),
                Matcher::UrlEncoded("password".into(), "hunter2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"access_token": "T", "expires_in": 86400}).to_string())
            .create_async()
            .await;

        let mut client = client_for(&server);
        let outcome = client.login("alice", "hunter2", None).await.unwrap();

        assert_eq!(outcome, LoginOutcome::LoggedIn);
        assert_eq!(client.authorization(), Some("Bearer T"));
        assert!(client.is_authenticated());
        login.assert_async().await;

        let positions = server
            .mock("GET", "/positions/")
            .match_header("authorization", "Bearer T")
            .with_status(200)
            .with_body(json!({"results": []}).to_string())
            .create_async()
            .await;

        let listing = client.positions().await.unwrap();
        assert_eq!(listing, json!({"results": []}));
        positions.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_sends_mfa_code_when_given() {
        let mut server = Server::new_async().await;

        let login = server
            .mock("POST", "/oauth2/token/")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("username".into(), "alice".into()),
                Matcher::UrlEncoded("mfa_code".into(), "123456".into()),
            ]))
            .with_status(200)
            .with_body(json!({"access_token": "T2"}).to_string())
            .create_async()
            .await;

        let mut client = client_for(&server);
        let outcome = client
            .login("alice", "hunter2", Some("123456"))
            .await
            .unwrap();

        assert!(outcome.is_logged_in());
        assert_eq!(client.authorization(), Some("Bearer T2"));
        login.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_omits_empty_mfa_code() {
        let mut server = Server::new_async().await;

        let login = server
            .mock("POST", "/oauth2/token/")
            .match_body(Matcher::Exact(format!(
                "client_id={}&expires_in=86400&grant_type=password&password=hunter2&scope=internal&username=alice",
                CLIENT_ID
            )))
            .with_status(200)
            .with_body(json!({"access_token": "T3"}).to_string())
            .create_async()
            .await;

        let mut client = client_for(&server);
        let outcome = client.login("alice", "hunter2", Some("")).await.unwrap();

        assert!(outcome.is_logged_in());
        login.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_challenge_returns_payload_and_keeps_session_anonymous() {
        let mut server = Server::new_async().await;
        let challenge = json!({"mfa_required": true, "mfa_type": "sms"});

        server
            .mock("POST", "/oauth2/token/")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(challenge.to_string())
            .create_async()
            .await;

        let mut client = client_for(&server);
        let outcome = client.login("alice", "hunter2", None).await.unwrap();

        assert_eq!(outcome, LoginOutcome::Challenge(challenge));
        assert!(outcome.mfa_required());
        assert!(client.authorization().is_none());
        assert!(!client.is_authenticated());

        let positions = server
            .mock("GET", "/positions/")
            .match_header("authorization", Matcher::Missing)
            .with_status(401)
            .with_body(json!({"detail": "Authentication credentials were not provided."}).to_string())
            .create_async()
            .await;

        let listing = client.positions().await.unwrap();
        assert_eq!(
            listing["detail"],
            "Authentication credentials were not provided."
        );
        positions.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_with_undecodable_body_fails() {
        let mut server = Server::new_async().await;

        server
            .mock("POST", "/oauth2/token/")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let mut client = client_for(&server);
        let result = client.login("alice", "hunter2", None).await;

        assert!(matches!(result, Err(Error::Decode { .. })));
        assert!(client.authorization().is_none());
    }

    #[tokio::test]
    async fn test_login_prompt_reads_credentials_from_input() {
        let mut server = Server::new_async().await;

        let login = server
            .mock("POST", "/oauth2/token/")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("username".into(), "bob".into()),
                Matcher::UrlEncoded("password".into(), "secret".into()),
            ]))
            .with_status(200)
            .with_body(json!({"access_token": "T"}).to_string())
            .create_async()
            .await;

        let mut client = client_for(&server).with_input(StubInput { answer: "bob" });
        let outcome = client.login_prompt().await.unwrap();

        assert!(outcome.is_logged_in());
        login.assert_async().await;
    }

    #[tokio::test]
    async fn test_quote_data_prompts_for_empty_symbol() {
        let mut server = Server::new_async().await;

        let quote = server
            .mock("GET", "/quotes/msft/")
            .with_status(200)
            .with_body(json!({"symbol": "MSFT", "last_trade_price": "410.00"}).to_string())
            .create_async()
            .await;

        let client = client_for(&server).with_input(StubInput { answer: "msft" });
        let data = client.quote_data("").await.unwrap();

        assert_eq!(data["symbol"], "MSFT");
        quote.assert_async().await;
    }

    #[tokio::test]
    async fn test_quote_data_empty_body_is_invalid_symbol() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/quotes/ZZZZINVALID/")
            .with_status(404)
            .with_body("")
            .create_async()
            .await;

        let client = client_for(&server);
        match client.quote_data("ZZZZINVALID").await {
            Err(Error::InvalidSymbol(symbol)) => assert_eq!(symbol, "ZZZZINVALID"),
            other => panic!("expected InvalidSymbol, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_quote_data_empty_object_is_invalid_symbol() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/quotes/NOPE/")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.ask_price("NOPE").await,
            Err(Error::InvalidSymbol(_))
        ));
    }

    #[tokio::test]
    async fn test_quote_data_skips_session_headers() {
        let mut server = Server::new_async().await;
        let client = logged_in_client(&mut server, "T").await;

        let quote = server
            .mock("GET", "/quotes/AAPL/")
            .match_header("authorization", Matcher::Missing)
            .match_header("x-robinhood-api-version", Matcher::Missing)
            .with_status(200)
            .with_body(quote_payload().to_string())
            .create_async()
            .await;

        client.quote_data("AAPL").await.unwrap();
        quote.assert_async().await;
    }

    #[tokio::test]
    async fn test_quote_projections_match_payload() {
        let mut server = Server::new_async().await;
        let payload = quote_payload();

        server
            .mock("GET", "/quotes/AAPL/")
            .with_status(200)
            .with_body(payload.to_string())
            .expect_at_least(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let float = |key: &str| match &payload[key] {
            Value::String(s) => s.parse::<f64>().unwrap(),
            other => other.as_f64().unwrap(),
        };

        assert_eq!(client.ask_price("AAPL").await.unwrap(), float("ask_price"));
        assert_eq!(client.ask_size("AAPL").await.unwrap(), float("ask_size"));
        assert_eq!(client.bid_price("AAPL").await.unwrap(), float("bid_price"));
        assert_eq!(client.bid_size("AAPL").await.unwrap(), float("bid_size"));
        assert_eq!(
            client.last_trade_price("AAPL").await.unwrap(),
            float("last_trade_price")
        );
        assert_eq!(
            client.previous_close("AAPL").await.unwrap(),
            float("previous_close")
        );
        assert_eq!(
            client.adjusted_previous_close("AAPL").await.unwrap(),
            float("adjusted_previous_close")
        );
        assert_eq!(
            client.previous_close_date("AAPL").await.unwrap(),
            "2026-10-16"
        );
        assert_eq!(client.symbol("AAPL").await.unwrap(), "AAPL");
        assert_eq!(client.get_quote("AAPL").await.unwrap(), "AAPL");
        assert_eq!(
            client.last_updated_at("AAPL").await.unwrap(),
            "2026-10-17T20:00:00Z"
        );
    }

    #[tokio::test]
    async fn test_quote_projection_missing_field() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/quotes/AAPL/")
            .with_status(200)
            .with_body(json!({"symbol": "AAPL"}).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        match client.bid_price("AAPL").await {
            Err(Error::MissingField(field)) => assert_eq!(field, "bid_price"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_historical_quotes_query() {
        let mut server = Server::new_async().await;
        let client = logged_in_client(&mut server, "T").await;

        let historicals = server
            .mock("GET", "/quotes/historicals/")
            .match_header("authorization", "Bearer T")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("symbols".into(), "AAPL,MSFT".into()),
                Matcher::UrlEncoded("interval".into(), "5minute".into()),
                Matcher::UrlEncoded("span".into(), "day".into()),
                Matcher::UrlEncoded("bounds".into(), "extended".into()),
            ]))
            .with_status(200)
            .with_body(json!({"results": [{"symbol": "AAPL"}, {"symbol": "MSFT"}]}).to_string())
            .create_async()
            .await;

        let data = client
            .get_historical_quotes(&["aapl", "msft"], "5minute", "day", Bounds::Extended)
            .await
            .unwrap();

        assert_eq!(data["results"].as_array().unwrap().len(), 2);
        historicals.assert_async().await;
    }

    #[tokio::test]
    async fn test_historical_quotes_rejection_is_returned() {
        let mut server = Server::new_async().await;
        let client = logged_in_client(&mut server, "T").await;
        let rejection = json!({"interval": ["Select a valid choice."]});

        server
            .mock("GET", "/quotes/historicals/")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(rejection.to_string())
            .create_async()
            .await;

        let data = client
            .get_historical_quotes(&["AAPL"], "hour", "day", Bounds::Regular)
            .await
            .unwrap();
        assert_eq!(data, rejection);
    }

    #[tokio::test]
    async fn test_news_upper_cases_symbol() {
        let mut server = Server::new_async().await;
        let client = logged_in_client(&mut server, "T").await;

        let news = server
            .mock("GET", "/midlands/news/TSLA/")
            .match_header("authorization", "Bearer T")
            .with_status(200)
            .with_body(json!({"results": [{"title": "Headline"}]}).to_string())
            .create_async()
            .await;

        let data = client.get_news("tsla").await.unwrap();
        assert_eq!(data["results"][0]["title"], "Headline");
        news.assert_async().await;
    }

    #[tokio::test]
    async fn test_instruments_search() {
        let mut server = Server::new_async().await;
        let client = logged_in_client(&mut server, "T").await;

        server
            .mock("GET", "/instruments/")
            .match_query(Matcher::UrlEncoded("query".into(), "APPLE".into()))
            .with_status(200)
            .with_body(json!({"results": [{"symbol": "AAPL"}]}).to_string())
            .create_async()
            .await;

        let results = client.instruments("apple").await.unwrap();
        assert_eq!(results, vec![json!({"symbol": "AAPL"})]);
    }

    #[tokio::test]
    async fn test_instrument_lookups() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/instruments/abc/")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(json!({"symbol": "AAPL", "name": "Apple Inc."}).to_string())
            .expect(2)
            .create_async()
            .await;

        let client = client_for(&server);
        let url = format!("{}/instruments/abc/", server.url());

        assert_eq!(client.get_symbol_by_instrument(&url).await.unwrap(), "AAPL");
        assert_eq!(
            client.get_name_by_instrument(&url).await.unwrap(),
            "Apple Inc."
        );
    }

    #[tokio::test]
    async fn test_get_account_returns_first_result() {
        let mut server = Server::new_async().await;
        let client = logged_in_client(&mut server, "T").await;

        server
            .mock("GET", "/accounts/")
            .with_status(200)
            .with_body(
                json!({"results": [{"account_number": "5RY00000"}, {"account_number": "other"}]})
                    .to_string(),
            )
            .create_async()
            .await;

        let account = client.get_account().await.unwrap();
        assert_eq!(account["account_number"], "5RY00000");
    }

    #[tokio::test]
    async fn test_portfolio_projections() {
        let mut server = Server::new_async().await;
        let client = logged_in_client(&mut server, "T").await;

        server
            .mock("GET", "/portfolios/")
            .match_header("authorization", "Bearer T")
            .with_status(200)
            .with_body(
                json!({"results": [{
                    "equity": "1234.5600",
                    "market_value": "1000.0000",
                    "extended_hours_equity": null
                }]})
                .to_string(),
            )
            .expect_at_least(1)
            .create_async()
            .await;

        assert_eq!(client.equity().await.unwrap(), 1234.56);
        assert_eq!(client.market_value().await.unwrap(), 1000.0);
        assert!(matches!(
            client.extended_hours_equity().await,
            Err(Error::Coercion { .. })
        ));
        assert!(matches!(
            client.excess_margin().await,
            Err(Error::MissingField(_))
        ));
    }

    #[tokio::test]
    async fn test_passthrough_getters() {
        let mut server = Server::new_async().await;
        let client = logged_in_client(&mut server, "T").await;

        for path in ["/orders/", "/dividends/", "/user/investment_profile/"] {
            server
                .mock("GET", path)
                .match_header("authorization", "Bearer T")
                .with_status(200)
                .with_body(json!({"path": path}).to_string())
                .create_async()
                .await;
        }

        assert_eq!(client.order_history().await.unwrap()["path"], "/orders/");
        assert_eq!(client.dividends().await.unwrap()["path"], "/dividends/");
        assert_eq!(
            client.investment_profile().await.unwrap()["path"],
            "/user/investment_profile/"
        );
    }

    #[tokio::test]
    async fn test_securities_owned_resolves_each_owned_position() {
        let mut server = Server::new_async().await;
        let client = logged_in_client(&mut server, "T").await;
        let base = server.url();

        server
            .mock("GET", "/positions/")
            .with_status(200)
            .with_body(
                json!({"results": [
                    {"quantity": "10.0000", "instrument": format!("{}/instruments/aapl/", base)},
                    {"quantity": "0.0000", "instrument": format!("{}/instruments/gme/", base)},
                    {"quantity": "2.5000", "instrument": format!("{}/instruments/tsla/", base)}
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let aapl = server
            .mock("GET", "/instruments/aapl/")
            .match_header("authorization", "Bearer T")
            .with_status(200)
            .with_body(json!({"symbol": "AAPL"}).to_string())
            .expect(1)
            .create_async()
            .await;
        let gme = server
            .mock("GET", "/instruments/gme/")
            .with_status(200)
            .with_body(json!({"symbol": "GME"}).to_string())
            .expect(0)
            .create_async()
            .await;
        let tsla = server
            .mock("GET", "/instruments/tsla/")
            .match_header("authorization", "Bearer T")
            .with_status(200)
            .with_body(json!({"symbol": "TSLA"}).to_string())
            .expect(1)
            .create_async()
            .await;

        let owned = client.securities_owned().await.unwrap();

        assert_eq!(owned, vec!["AAPL".to_string(), "TSLA".to_string()]);
        aapl.assert_async().await;
        gme.assert_async().await;
        tsla.assert_async().await;
    }

    #[tokio::test]
    async fn test_securities_owned_fails_as_a_whole() {
        let mut server = Server::new_async().await;
        let client = logged_in_client(&mut server, "T").await;
        let base = server.url();

        server
            .mock("GET", "/positions/")
            .with_status(200)
            .with_body(
                json!({"results": [
                    {"quantity": "1", "instrument": format!("{}/instruments/ok/", base)},
                    {"quantity": "1", "instrument": format!("{}/instruments/broken/", base)}
                ]})
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/instruments/ok/")
            .with_status(200)
            .with_body(json!({"symbol": "OK"}).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/instruments/broken/")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        assert!(matches!(
            client.securities_owned().await,
            Err(Error::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_url_uses_session() {
        let mut server = Server::new_async().await;
        let client = logged_in_client(&mut server, "T").await;

        let markets = server
            .mock("GET", "/markets/")
            .match_header("authorization", "Bearer T")
            .with_status(200)
            .with_body(json!({"results": []}).to_string())
            .create_async()
            .await;

        let url = client.endpoints().url(Endpoint::Markets).to_string();
        client.get_url(&url).await.unwrap();
        markets.assert_async().await;
    }
}
