use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::default::{EXPIRATION_DATE_FILE, HOSTNAMES_FILE, ISSUE_DATE_FILE};
use crate::config::AuthorityRoot;
use crate::error::Result;
use crate::{host, hostname};

/// One row of the certificate inventory.
#[derive(Debug, Clone, Serialize)]
pub struct HostStatus {
    pub host: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub hostname_count: usize,
    pub key_count: usize,
}

impl HostStatus {
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at.map(|e| (e - now).num_days())
    }
}

/// Inventory across every host directory under the authority root.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryReport {
    pub hosts: Vec<HostStatus>,
}

impl InventoryReport {
    pub fn total_hostnames(&self) -> usize {
        self.hosts.iter().map(|h| h.hostname_count).sum()
    }

    pub fn total_keys(&self) -> usize {
        self.hosts.iter().map(|h| h.key_count).sum()
    }

    /// Hashed known_hosts entries the aggregation step would emit:
    /// one per (hostname, key) pair.
    pub fn total_entries(&self) -> usize {
        self.hosts
            .iter()
            .map(|h| h.hostname_count * h.key_count)
            .sum()
    }
}

/// Scan the root and build the inventory, sorted by expiration date
/// then host name, with never-issued hosts first.
pub fn collect(root: &AuthorityRoot) -> Result<InventoryReport> {
    let mut hosts: Vec<HostStatus> = root
        .host_dirs()?
        .iter()
        .map(|dir| status_for(dir))
        .collect();

    hosts.sort_by_key(|h| {
        (
            h.expires_at.unwrap_or(DateTime::<Utc>::MIN_UTC),
            h.host.clone(),
        )
    });
    Ok(InventoryReport { hosts })
}

fn status_for(dir: &Path) -> HostStatus {
    // Tolerant by design: the report covers half-initialized
    // directories too, showing unknown dates and zero counts.
    let host = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    let hostname_count = hostname::read_hostnames(&dir.join(HOSTNAMES_FILE))
        .map(|names| names.len())
        .unwrap_or(0);
    let key_count = host::public_key_files(dir).map(|k| k.len()).unwrap_or(0);
    HostStatus {
        host,
        issued_at: host::read_stamp(&dir.join(ISSUE_DATE_FILE)),
        expires_at: host::read_stamp(&dir.join(EXPIRATION_DATE_FILE)),
        hostname_count,
        key_count,
    }
}
