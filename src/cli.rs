//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bifrost-cli",
    version,
    about = "Command-line client for Bifrost services",
    long_about = None
)]
pub struct Cli {
    /// Config file to use (default: ~/.bifrost/config.json)
    #[arg(long, global = true, env = "BIFROST_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to the Bifrost service of your choice
    Connect {
        /// Base URL of the service
        url: String,
    },

    /// Authenticate to the connected Bifrost service
    Auth,

    /// Show the balance sheet of all assets
    Balances,

    /// Generate a new Lightning invoice
    Invoice {
        /// Amount to invoice
        amount: Option<String>,
    },

    /// Get a Bitcoin address
    Address,

    /// List the price of bitcoin in fiat currencies
    Tickets,

    /// Sell bitcoin for fiat currency
    Sell {
        /// Amount of bitcoin to sell
        amount: String,

        /// Currency pair, e.g. BTCUSD, BTC/USD or USD
        pair: String,

        /// Confirm the offer without asking
        #[arg(short, long)]
        yes: bool,
    },
}
