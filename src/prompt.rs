use inquire::error::InquireError;
use inquire::Confirm;

use crate::error::{CertError, Result};

/// Human-approval checkpoint before the irreversible signing step.
/// Injected into the orchestrator so non-interactive runs and tests can
/// supply their own gate.
pub trait Approver {
    /// Present the exact command about to run; returns whether to
    /// proceed. Blocks indefinitely for interactive implementations.
    fn approve(&self, command: &str) -> Result<bool>;
}

/// Interactive gate: prints the replayable command and waits for
/// explicit acknowledgment. Ctrl-C / Esc count as a decline.
pub struct ConsoleApprover;

impl Approver for ConsoleApprover {
    fn approve(&self, command: &str) -> Result<bool> {
        println!("{}", command);
        match Confirm::new("Execute this signing command?")
            .with_default(false)
            .prompt()
        {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                Ok(false)
            }
            Err(e) => Err(CertError::InputValidation(format!(
                "confirmation prompt failed: {}",
                e
            ))),
        }
    }
}

/// Non-interactive gate used by `--yes`; still prints the command so
/// the invocation stays auditable from the terminal scrollback.
pub struct AutoApprover;

impl Approver for AutoApprover {
    fn approve(&self, command: &str) -> Result<bool> {
        println!("{}", command);
        Ok(true)
    }
}
