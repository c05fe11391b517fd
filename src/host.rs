use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::config::default::{
    DEFAULT_VALIDITY_DAYS, EXPIRATION_DATE_FILE, HOSTNAMES_FILE, ISSUE_DATE_FILE, PUBLIC_KEY_SUFFIX,
    VALIDITY_FILE,
};
use crate::error::{CertError, Result};
use crate::{hostname, time};

/// Lifecycle state of one managed host directory, re-read from disk on
/// every invocation so it always reflects the on-disk truth.
#[derive(Debug, Clone)]
pub struct HostRecord {
    pub dir: PathBuf,
    /// Directory name, used as the certificate identity (`-I`).
    pub id: String,
    pub hostnames: Vec<String>,
    pub public_keys: Vec<PathBuf>,
    pub validity_days: i64,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl HostRecord {
    /// Load a host directory, validating that it is issuable: a
    /// non-empty hostname list and at least one candidate public key.
    pub fn load(dir: &Path) -> Result<Self> {
        let id = host_id(dir)?;

        let hostnames_path = dir.join(HOSTNAMES_FILE);
        if !hostnames_path.exists() {
            return Err(CertError::InputValidation(format!(
                "hostname list '{}' is missing",
                hostnames_path.display()
            )));
        }
        let hostnames = hostname::read_hostnames(&hostnames_path)?;
        if hostnames.is_empty() {
            return Err(CertError::InputValidation(format!(
                "no hostnames found in '{}'",
                hostnames_path.display()
            )));
        }

        let public_keys = public_key_files(dir)?;
        if public_keys.is_empty() {
            return Err(CertError::InputValidation(format!(
                "no public keys found in '{}'",
                dir.display()
            )));
        }

        let validity_days = match fs::read_to_string(dir.join(VALIDITY_FILE)) {
            Ok(text) => text.trim().parse::<i64>().map_err(|e| {
                CertError::InputValidation(format!(
                    "invalid validity value in '{}': {}",
                    dir.join(VALIDITY_FILE).display(),
                    e
                ))
            })?,
            Err(_) => DEFAULT_VALIDITY_DAYS,
        };

        Ok(Self {
            dir: dir.to_path_buf(),
            id,
            hostnames,
            public_keys,
            validity_days,
            issued_at: read_stamp(&dir.join(ISSUE_DATE_FILE)),
            expires_at: read_stamp(&dir.join(EXPIRATION_DATE_FILE)),
        })
    }
}

/// Candidate public key files (`*_key.pub`) in a host directory,
/// sorted for a stable signing command.
pub fn public_key_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut keys: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.ends_with(PUBLIC_KEY_SUFFIX))
                .unwrap_or(false)
        })
        .collect();
    keys.sort();
    Ok(keys)
}

/// Read an optional metadata timestamp file.
pub fn read_stamp(path: &Path) -> Option<DateTime<Utc>> {
    fs::read_to_string(path)
        .ok()
        .and_then(|text| time::parse_metadata(&text))
}

fn host_id(dir: &Path) -> Result<String> {
    // Trailing separators are common when the path comes from shell
    // completion; components() already normalizes them away.
    dir.components()
        .last()
        .and_then(|c| c.as_os_str().to_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            CertError::InputValidation(format!("invalid host directory '{}'", dir.display()))
        })
}
