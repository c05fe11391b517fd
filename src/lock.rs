use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use crate::error::{CertError, Result};

/// Advisory lock making the one-operator-at-a-time assumption explicit.
/// Held across the allocate -> sign -> record span and released on
/// every exit path, including unwinding on error.
pub struct AuthorityLock {
    path: PathBuf,
}

impl AuthorityLock {
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                // PID helps the operator identify a stale lock.
                let _ = writeln!(file, "{}", std::process::id());
                Ok(Self { path })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(CertError::Locked { path }),
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for AuthorityLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
