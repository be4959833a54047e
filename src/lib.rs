// Library root
// -----------
// This crate exposes the pieces the `bifrost-cli` binary is built from.
//
// Module responsibilities:
// - `api`: HTTP interactions with a Bifrost service (auth, balances,
//   invoices, addresses, tickets, offers) behind the `BifrostApi` trait.
// - `cli`: the clap definition of the command surface.
// - `commands`: one handler per subcommand, operating on a `Session`.
// - `config`: the `~/.bifrost/config.json` file holding service and token.
// - `ui`: JSON rendering, prompts and the progress spinner.
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod ui;
