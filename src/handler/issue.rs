use anyhow::Result;
use tracing::info;

use crate::cli::{Cli, IssueArgs};
use crate::config::AuthorityRoot;
use crate::inspect::SshKeygenInspector;
use crate::issue::{issue_certificate, IssuanceDeps};
use crate::prompt::{Approver, AutoApprover, ConsoleApprover};
use crate::signing::SshKeygenSigner;

pub fn handle_issue(cli_args: &Cli, args: &IssueArgs) -> Result<()> {
    let root = AuthorityRoot::new(&cli_args.root);

    let console = ConsoleApprover;
    let auto = AutoApprover;
    let approver: &dyn Approver = if args.yes { &auto } else { &console };

    let deps = IssuanceDeps {
        inspector: &SshKeygenInspector,
        approver,
        signer: &SshKeygenSigner,
    };
    let outcome = issue_certificate(&root, &args.host_dir, &deps)?;
    info!(
        "certificate serial {} for {} ({}) recorded; expires {}",
        outcome.serial,
        outcome.host_id,
        outcome.principals,
        outcome.window.expiration_stamp()
    );
    Ok(())
}
