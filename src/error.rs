use std::path::PathBuf;
use thiserror::Error;

/// Error taxonomy for certificate authority operations.
/// Every variant is fatal to the current attempt; nothing is retried.
#[derive(Debug, Error)]
pub enum CertError {
    #[error("mandatory file '{}' is missing", .path.display())]
    Configuration { path: PathBuf },

    #[error("{0}")]
    InputValidation(String),

    #[error("declining to certify weak key with algorithm {algorithm} and size of {bits} bits located at '{}'", .path.display())]
    PolicyViolation {
        path: PathBuf,
        algorithm: String,
        bits: u32,
    },

    #[error("signing command returned non-zero status {status}. See log file '{}' for details", .log_path.display())]
    ExternalTool { status: i32, log_path: PathBuf },

    #[error("ssh-keygen -H returned non-zero status {status} while hashing '{}'", .path.display())]
    Hashing { status: i32, path: PathBuf },

    #[error("another issuance appears to be in progress (lock file '{}' exists)", .path.display())]
    Locked { path: PathBuf },

    #[error("unable to inspect key '{}': {message}", .path.display())]
    KeyInspect { path: PathBuf, message: String },

    #[error("issuance aborted by operator")]
    Aborted,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CertError>;
