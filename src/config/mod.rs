pub mod default;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CertError, Result};

/// The directory holding all authority state: the domain file, the
/// serial counter, the CA key, the global audit log, and one
/// subdirectory per managed host.
#[derive(Debug, Clone)]
pub struct AuthorityRoot {
    path: PathBuf,
}

impl AuthorityRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn domain_path(&self) -> PathBuf {
        self.path.join(default::DOMAIN_FILE)
    }

    pub fn serial_path(&self) -> PathBuf {
        self.path.join(default::SERIAL_FILE)
    }

    pub fn global_log_path(&self) -> PathBuf {
        self.path.join(default::GLOBAL_LOG_FILE)
    }

    pub fn authority_key_path(&self) -> PathBuf {
        self.path.join(default::AUTHORITY_KEY_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.path.join(default::LOCK_FILE)
    }

    pub fn known_hosts_unhashed(&self) -> PathBuf {
        self.path.join(default::KNOWN_HOSTS_UNHASHED)
    }

    pub fn known_hosts_hashed(&self) -> PathBuf {
        self.path.join(default::KNOWN_HOSTS_HASHED)
    }

    pub fn known_hosts_unhashed_full(&self) -> PathBuf {
        self.path.join(default::KNOWN_HOSTS_UNHASHED_FULL)
    }

    pub fn known_hosts_hashed_full(&self) -> PathBuf {
        self.path.join(default::KNOWN_HOSTS_HASHED_FULL)
    }

    /// Read the mandatory domain suffix. Its absence is a fatal
    /// configuration error for every subcommand that needs it.
    pub fn load_domain(&self) -> Result<String> {
        let path = self.domain_path();
        if !path.exists() {
            return Err(CertError::Configuration { path });
        }
        Ok(fs::read_to_string(&path)?.trim().to_string())
    }

    /// All host directories under the root, sorted by name.
    pub fn host_dirs(&self) -> Result<Vec<PathBuf>> {
        let mut dirs: Vec<PathBuf> = fs::read_dir(&self.path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();
        Ok(dirs)
    }
}
