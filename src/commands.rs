// Command handlers. Each one runs against an explicit `Session` built at
// startup; handlers that change credentials consume the session and hand
// back a new one.

use crate::api::BifrostApi;
use crate::config::{self, Config};
use crate::ui::{self, Prompt};
use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;

/// Asset every offer is denominated in.
pub const BASE_ASSET: &str = "BTC";
pub const SELL: &str = "SELL";

/// Loaded config, where it lives, and a client built from it.
#[derive(Debug)]
pub struct Session<A> {
    config: Config,
    config_path: PathBuf,
    api: A,
}

impl<A: BifrostApi> Session<A> {
    /// Load (or create) the config at `config_path` and build a client.
    pub fn open(config_path: PathBuf) -> Result<Self> {
        let config = config::load(&config_path)?;
        let api = A::from_config(&config)?;
        Ok(Session::new(config, config_path, api))
    }

    pub fn new(config: Config, config_path: PathBuf, api: A) -> Self {
        Session {
            config,
            config_path,
            api,
        }
    }

    /// Persist `config` and return a session with a client built from it.
    fn replace_config(self, config: Config) -> Result<Self> {
        config::save(&self.config_path, &config)?;
        let api = A::from_config(&config)?;
        Ok(Session::new(config, self.config_path, api))
    }
}

/// Point the CLI at a new service. The stored token belongs to the old
/// service, so it is dropped.
pub fn connect<A: BifrostApi>(session: Session<A>, url: &str) -> Result<Session<A>> {
    reqwest::Url::parse(url).with_context(|| format!("Invalid service URL '{}'", url))?;

    let config = Config {
        service: url.trim_end_matches('/').to_string(),
        token: String::new(),
    };
    info!("Connecting to {}", config.service);
    session.replace_config(config)
}

/// Prompt for credentials, log in and store the returned token.
pub fn auth<A: BifrostApi>(
    session: Session<A>,
    prompt: &dyn Prompt,
    out: &mut dyn Write,
) -> Result<Session<A>> {
    let username = prompt.input("Enter your username")?;
    let password = prompt.password("Enter your password")?;

    let res = remote("Logging in...", || session.api.auth(&username, &password))?;
    let token = res
        .get("token")
        .and_then(Value::as_str)
        .context("Authentication response did not include a token")?
        .to_string();

    let config = Config {
        service: session.config.service.clone(),
        token,
    };
    let session = session.replace_config(config)?;
    ui::render(out, &json!({"message": "You have successfully logged in."}))?;
    Ok(session)
}

pub fn balances<A: BifrostApi>(session: &Session<A>, out: &mut dyn Write) -> Result<()> {
    let res = remote("Fetching balances...", || session.api.balances())?;
    ui::render(out, &res)
}

pub fn invoice<A: BifrostApi>(
    session: &Session<A>,
    amount: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    let amount = match amount {
        Some(a) => parse_amount(a)?,
        None => anyhow::bail!("You did not specify an amount."),
    };
    let res = remote("Creating invoice...", || session.api.create_invoice(amount))?;
    ui::render(out, &res)
}

pub fn address<A: BifrostApi>(session: &Session<A>, out: &mut dyn Write) -> Result<()> {
    let res = remote("Fetching address...", || session.api.address())?;
    ui::render(out, &res)
}

pub fn tickets<A: BifrostApi>(session: &Session<A>, out: &mut dyn Write) -> Result<()> {
    let res = remote("Fetching tickets...", || session.api.tickets())?;
    ui::render(out, &res)
}

/// Create a sell offer and, once confirmed, execute it. A declined offer
/// is left as created. `pair` goes to the service as the quote unchanged.
pub fn sell<A: BifrostApi>(
    session: &Session<A>,
    amount: &str,
    pair: &str,
    assume_yes: bool,
    prompt: &dyn Prompt,
    out: &mut dyn Write,
) -> Result<()> {
    let amount = parse_amount(amount)?;
    let quote = pair.trim();
    if quote.is_empty() {
        anyhow::bail!("You did not specify a currency pair.");
    }

    let offer = remote("Creating offer...", || {
        session.api.create_offer(amount, BASE_ASSET, quote, SELL)
    })?;
    ui::render(out, &offer)?;

    let confirmed = assume_yes || prompt.confirm(&format!("Do you want to sell {}", amount))?;
    if !confirmed {
        info!("Offer abandoned");
        return Ok(());
    }

    let id = offer_id(&offer)?;
    let res = remote("Confirming offer...", || session.api.confirm_offer(&id))?;
    ui::render(out, &res)
}

/// Parse a user supplied amount. Anything that is not a finite,
/// non-negative number is rejected, `-0` included.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let amount: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid amount '{}'", raw))?;
    if !amount.is_finite() || amount.is_sign_negative() {
        anyhow::bail!("Invalid amount '{}'", raw);
    }
    Ok(amount)
}

fn offer_id(offer: &Value) -> Result<String> {
    match offer.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => anyhow::bail!("Offer response did not include an id"),
    }
}

/// Run one remote call behind a spinner.
fn remote<T>(message: &str, call: impl FnOnce() -> Result<T>) -> Result<T> {
    debug!("{}", message);
    let spinner = ui::spinner(message);
    let res = call();
    spinner.finish_and_clear();
    res
}
