// API client module: a small blocking HTTP client for a Bifrost service.
// Responses are passed around as raw `serde_json::Value` documents; the
// CLI only renders them and picks out the odd field (`token`, `id`).

use crate::config::Config;
use anyhow::{Context, Result};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

/// Remote operations offered by a Bifrost service.
pub trait BifrostApi {
    /// Build a client for the service and token stored in `config`.
    fn from_config(config: &Config) -> Result<Self>
    where
        Self: Sized;

    fn auth(&self, username: &str, password: &str) -> Result<Value>;
    fn balances(&self) -> Result<Value>;
    fn create_invoice(&self, amount: f64) -> Result<Value>;
    fn address(&self) -> Result<Value>;
    fn tickets(&self) -> Result<Value>;
    fn create_offer(&self, amount: f64, base: &str, quote: &str, side: &str) -> Result<Value>;
    fn confirm_offer(&self, id: &str) -> Result<Value>;
}

/// Holds a reqwest blocking client, the service base URL and the bearer
/// token (if any) sent with every request.
#[derive(Clone)]
pub struct BifrostClient {
    client: Client,
    service: String,
    token: Option<String>,
}

/// Login request payload.
#[derive(Serialize, Debug)]
pub struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Serialize, Debug)]
pub struct InvoiceRequest {
    pub amount: f64,
}

#[derive(Serialize, Debug)]
pub struct OfferRequest<'a> {
    pub amount: f64,
    pub base: &'a str,
    pub quote: &'a str,
    pub side: &'a str,
}

impl BifrostClient {
    pub fn new(service: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(BifrostClient {
            client,
            service: service.trim_end_matches('/').to_string(),
            token: (!token.is_empty()).then(|| token.to_string()),
        })
    }

    /// `<service>/api/<segments...>`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if self.service.is_empty() {
            anyhow::bail!("No Bifrost service configured, run `bifrost-cli connect <URL>` first");
        }
        let mut url = Url::parse(&self.service)
            .with_context(|| format!("Invalid service URL '{}'", self.service))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Service URL '{}' cannot have a path", self.service))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    /// Authorization header map, empty when no token is stored.
    fn auth_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(t) = &self.token {
            let val = HeaderValue::from_str(&format!("Bearer {}", t))
                .context("Stored token is not a valid header value")?;
            headers.insert(AUTHORIZATION, val);
        }
        Ok(headers)
    }

    fn get(&self, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!("GET {}", url);
        Ok(self.client.get(url).headers(self.auth_headers()?))
    }

    fn post<T: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: Option<&T>,
    ) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!("POST {}", url);
        let req = self.client.post(url).headers(self.auth_headers()?);
        Ok(match body {
            Some(body) => req.json(body),
            None => req,
        })
    }

    /// Send a request and decode the JSON body, turning non-2xx statuses
    /// into errors that carry the server response.
    fn send(&self, req: RequestBuilder, what: &str) -> Result<Value> {
        let res = req
            .send()
            .with_context(|| format!("Failed to send {} request", what))?;
        let status = res.status();
        debug!("{} -> {}", what, status);
        if !status.is_success() {
            let txt = res.text().unwrap_or_else(|_| "".into());
            anyhow::bail!("{} failed: {} - {}", what, status, txt);
        }
        res.json()
            .with_context(|| format!("Parsing {} response json", what))
    }
}

impl BifrostApi for BifrostClient {
    fn from_config(config: &Config) -> Result<Self> {
        BifrostClient::new(&config.service, &config.token)
    }

    fn auth(&self, username: &str, password: &str) -> Result<Value> {
        let body = AuthRequest { username, password };
        self.send(self.post(&["auth"], Some(&body))?, "auth")
    }

    fn balances(&self) -> Result<Value> {
        self.send(self.get(&["balances"])?, "balances")
    }

    fn create_invoice(&self, amount: f64) -> Result<Value> {
        let body = InvoiceRequest { amount };
        self.send(self.post(&["invoice"], Some(&body))?, "invoice")
    }

    fn address(&self) -> Result<Value> {
        self.send(self.get(&["address"])?, "address")
    }

    fn tickets(&self) -> Result<Value> {
        self.send(self.get(&["tickets"])?, "tickets")
    }

    fn create_offer(&self, amount: f64, base: &str, quote: &str, side: &str) -> Result<Value> {
        let body = OfferRequest {
            amount,
            base,
            quote,
            side,
        };
        self.send(self.post(&["offer"], Some(&body))?, "create offer")
    }

    fn confirm_offer(&self, id: &str) -> Result<Value> {
        self.send(
            self.post::<Value>(&["offer", id, "confirm"], None)?,
            "confirm offer",
        )
    }
}
