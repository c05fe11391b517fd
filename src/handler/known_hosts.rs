use anyhow::Result;
use tracing::info;

use crate::cli::Cli;
use crate::config::AuthorityRoot;
use crate::known_hosts;

pub fn handle_known_hosts(cli_args: &Cli) -> Result<()> {
    let root = AuthorityRoot::new(&cli_args.root);
    known_hosts::generate(&root)?;
    info!("known_hosts files rebuilt under '{}'", root.path().display());
    Ok(())
}
