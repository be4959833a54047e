// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, open the session and hand the
//   command to its handler.
// - Any error is logged and ends the process with exit code 1.

use bifrost_cli::api::BifrostClient;
use bifrost_cli::cli::{Cli, Commands};
use bifrost_cli::commands::{self, Session};
use bifrost_cli::config;
use bifrost_cli::ui::TerminalPrompt;
use clap::Parser;
use std::io;
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let path = cli.config.unwrap_or_else(config::default_config_path);
    let session: Session<BifrostClient> = Session::open(path)?;

    let prompt = TerminalPrompt::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Connect { url } => commands::connect(session, &url).map(|_| ()),
        Commands::Auth => commands::auth(session, &prompt, &mut out).map(|_| ()),
        Commands::Balances => commands::balances(&session, &mut out),
        Commands::Invoice { amount } => commands::invoice(&session, amount.as_deref(), &mut out),
        Commands::Address => commands::address(&session, &mut out),
        Commands::Tickets => commands::tickets(&session, &mut out),
        Commands::Sell { amount, pair, yes } => {
            commands::sell(&session, &amount, &pair, yes, &prompt, &mut out)
        }
    }
}
