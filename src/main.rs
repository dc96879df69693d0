use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use robinhood_client::export::{Table, WorkbookWriter};
use robinhood_client::robinhood::{
    Bounds, InputProvider, LoginOutcome, RobinhoodClient, TerminalInput,
};
use serde_json::Value;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "robinhood")]
#[command(author, version, about = "Query a Robinhood account from the terminal")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Account username (prompted for when missing)
    #[arg(short, long, env = "ROBINHOOD_USERNAME", global = true)]
    username: Option<String>,

    /// Account password (prompted for when missing)
    #[arg(short, long, env = "ROBINHOOD_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// MFA code, if you already have one
    #[arg(long, env = "ROBINHOOD_MFA_CODE", global = true)]
    mfa_code: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the last trade price of each symbol (prompts when none given)
    Quote { symbols: Vec<String> },

    /// Historical bars as JSON
    Historicals {
        /// Symbols to fetch
        #[arg(required = true)]
        symbols: Vec<String>,

        /// 5minute, 10minute, day or week
        #[arg(short, long, default_value = "day")]
        interval: String,

        /// day, week, year, ...
        #[arg(short, long, default_value = "year")]
        span: String,

        /// regular or extended hours
        #[arg(short, long, default_value = "regular")]
        bounds: Bounds,
    },

    /// News for a symbol
    News { symbol: String },

    /// Raw positions listing
    Positions,

    /// Symbols with a positive quantity
    Owned,

    /// Portfolio values
    Portfolio,

    /// Account record
    Account,

    /// Order history
    Orders,

    /// Dividend history
    Dividends,

    /// Convert a CSV table into a formatted workbook
    Export {
        /// CSV file whose first column is the row index
        #[arg(short, long)]
        input: PathBuf,

        /// Output name, `.xlsx` is appended
        #[arg(short, long, default_value = "report")]
        output: PathBuf,

        /// Sheet name
        #[arg(short, long, default_value = "Sheet1")]
        sheet: String,

        /// Skip freezing and highlighting
        #[arg(long)]
        no_formatting: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("robinhood_client=info".parse()?)
                .add_directive("robinhood=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut client = RobinhoodClient::from_env().context("Failed to create Robinhood client")?;

    match &args.command {
        Commands::Quote { symbols } => {
            if symbols.is_empty() {
                print_quote(&client, "").await?;
            }
            for symbol in symbols {
                print_quote(&client, symbol).await?;
            }
        }
        Commands::Historicals {
            symbols,
            interval,
            span,
            bounds,
        } => {
            authenticate(&mut client, &args).await?;
            let data = client
                .get_historical_quotes(symbols, interval, span, *bounds)
                .await?;
            print_json(&data)?;
        }
        Commands::News { symbol } => {
            authenticate(&mut client, &args).await?;
            print_json(&client.get_news(symbol).await?)?;
        }
        Commands::Positions => {
            authenticate(&mut client, &args).await?;
            print_json(&client.positions().await?)?;
        }
        Commands::Owned => {
            authenticate(&mut client, &args).await?;
            for symbol in client.securities_owned().await? {
                println!("{}", symbol);
            }
        }
        Commands::Portfolio => {
            authenticate(&mut client, &args).await?;
            let portfolio = client.portfolios().await?;
            print_json(&portfolio)?;
        }
        Commands::Account => {
            authenticate(&mut client, &args).await?;
            print_json(&client.get_account().await?)?;
        }
        Commands::Orders => {
            authenticate(&mut client, &args).await?;
            print_json(&client.order_history().await?)?;
        }
        Commands::Dividends => {
            authenticate(&mut client, &args).await?;
            print_json(&client.dividends().await?)?;
        }
        Commands::Export {
            input,
            output,
            sheet,
            no_formatting,
        } => {
            export(input, output, sheet, *no_formatting)?;
        }
    }

    Ok(())
}

/// Log in, asking for anything missing and retrying once with an MFA code
async fn authenticate(client: &mut RobinhoodClient, args: &Args) -> Result<()> {
    let input = TerminalInput;

    let username = match &args.username {
        Some(username) => username.clone(),
        None => input.read_line("Username: ")?,
    };
    let password = match &args.password {
        Some(password) => password.clone(),
        None => input.read_secret("Password: ")?,
    };

    let mut outcome = client
        .login(&username, &password, args.mfa_code.as_deref())
        .await
        .context("Login request failed")?;

    if outcome.mfa_required() {
        let code = input.read_line("MFA code: ")?;
        outcome = client
            .login(&username, &password, Some(code.trim()))
            .await
            .context("Login request failed")?;
    }

    match outcome {
        LoginOutcome::LoggedIn => Ok(()),
        LoginOutcome::Challenge(payload) => bail!("Login failed: {}", payload),
    }
}

async fn print_quote(client: &RobinhoodClient, symbol: &str) -> Result<()> {
    let quote = client.quote_data(symbol).await?;
    println!("{}", format_quote(&quote)?);
    Ok(())
}

/// `SYMBOL: $<last trade price>` as sent by the server
fn format_quote(quote: &Value) -> Result<String> {
    let symbol = quote["symbol"]
        .as_str()
        .context("quote has no symbol")?;
    let price = match &quote["last_trade_price"] {
        Value::String(price) => price.clone(),
        Value::Number(price) => price.to_string(),
        _ => bail!("quote for {} has no last_trade_price", symbol),
    };
    Ok(format!("{}: ${}", symbol, price))
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn export(input: &Path, output: &Path, sheet: &str, no_formatting: bool) -> Result<()> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let table = Table::from_csv(file)
        .with_context(|| format!("Failed to read table from {}", input.display()))?;
    debug!("Read {} rows from {}", table.height(), input.display());

    let mut writer = WorkbookWriter::new(output);
    writer.add_sheet(sheet, &table)?;
    if !no_formatting {
        writer.default_formatting(sheet)?;
    }
    writer.save()?;

    info!("Wrote {}", writer.path().display());
    Ok(())
}
