use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use chrono::Utc;

use crate::error::{CertError, Result};
use crate::time;
use crate::validity::ValidityWindow;

/// Fully assembled signing command for one issuance attempt.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    pub authority_key: PathBuf,
    /// Certificate identity (`-I`), the host directory name.
    pub identity: String,
    /// Comma-separated canonical principals (`-n`).
    pub principals: String,
    /// Validity interval (`-V`), grace-backdated start included.
    pub validity_spec: String,
    pub serial: u64,
    pub public_keys: Vec<PathBuf>,
}

impl SigningRequest {
    pub fn new(
        authority_key: PathBuf,
        identity: String,
        principals: String,
        window: &ValidityWindow,
        serial: u64,
        public_keys: Vec<PathBuf>,
    ) -> Self {
        Self {
            authority_key,
            identity,
            principals,
            validity_spec: window.signing_spec(),
            serial,
            public_keys,
        }
    }

    /// Arguments for ssh-keygen, in the exact order the operator sees.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-s".to_string(),
            self.authority_key.to_string_lossy().into_owned(),
            "-I".to_string(),
            self.identity.clone(),
            "-h".to_string(),
            "-n".to_string(),
            self.principals.clone(),
            "-V".to_string(),
            self.validity_spec.clone(),
            "-z".to_string(),
            self.serial.to_string(),
        ];
        args.extend(
            self.public_keys
                .iter()
                .map(|key| key.to_string_lossy().into_owned()),
        );
        args
    }

    /// Shell-quoted rendition, safe to copy back into a shell.
    pub fn display_command(&self) -> String {
        std::iter::once("ssh-keygen".to_string())
            .chain(self.to_args())
            .map(|arg| shell_quote(&arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote one argument for POSIX shell replay.
pub fn shell_quote(arg: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c);
    if !arg.is_empty() && arg.chars().all(safe) {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Executes one confirmed signing command. A trait so tests can assert
/// that a declined or invalid attempt never reaches the signing tool.
pub trait Signer {
    fn sign(&self, request: &SigningRequest, log_path: &Path) -> Result<()>;
}

/// Runs ssh-keygen exactly once, with all of its output appended to the
/// per-host audit log. Non-zero exit is terminal for the attempt; no
/// retry, no persistent writes.
pub struct SshKeygenSigner;

impl Signer for SshKeygenSigner {
    fn sign(&self, request: &SigningRequest, log_path: &Path) -> Result<()> {
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;
        writeln!(log, "\n** {} **\n", time::audit_stamp(Utc::now()))?;
        writeln!(log, "executing: {}", request.display_command())?;
        log.flush()?;

        let stdout = log.try_clone()?;
        let stderr = log.try_clone()?;
        let status = Command::new("ssh-keygen")
            .args(request.to_args())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(CertError::ExternalTool {
                status: status.code().unwrap_or(-1),
                log_path: log_path.to_path_buf(),
            })
        }
    }
}
