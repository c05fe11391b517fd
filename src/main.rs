pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod host;
pub mod hostname;
pub mod inspect;
pub mod issue;
pub mod known_hosts;
pub mod lock;
pub mod log;
pub mod prompt;
pub mod record;
pub mod report;
pub mod serial;
pub mod signing;
pub mod time;
pub mod validity;

use clap::Parser;

use cli::{Cli, Command};

fn main() {
    let cli_args = Cli::parse();
    if let Err(e) = log::init_logger(&cli_args) {
        app::exit_with_error_message(&format!("failed to initialize logger: {}", e));
    }

    let result = match &cli_args.command {
        Command::Issue(args) => handler::issue::handle_issue(&cli_args, args),
        Command::List(args) => handler::list::handle_list(&cli_args, args),
        Command::KnownHosts => handler::known_hosts::handle_known_hosts(&cli_args),
    };

    if let Err(e) = result {
        app::exit_with_error_message(&e.to_string());
    }
}
