use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::config::default::{EXPIRATION_DATE_FILE, ISSUE_DATE_FILE};
use crate::error::Result;
use crate::host::HostRecord;
use crate::serial::SerialStore;
use crate::time;
use crate::validity::ValidityWindow;

/// Durable bookkeeping for a confirmed, successful signing run.
///
/// Four independent writes against four distinct files, no transaction.
/// Ordered so the purely additive global audit line goes last (it can
/// be reconstructed from the other three). A crash mid-sequence leaves
/// a partially updated but uncorrupted state that requires manual
/// reconciliation; no repair logic exists.
pub struct IssuanceRecorder<'a> {
    store: &'a dyn SerialStore,
    global_log: PathBuf,
}

impl<'a> IssuanceRecorder<'a> {
    pub fn new(store: &'a dyn SerialStore, global_log: PathBuf) -> Self {
        Self { store, global_log }
    }

    pub fn record(
        &self,
        host: &HostRecord,
        serial: u64,
        window: &ValidityWindow,
        principals: &str,
    ) -> Result<()> {
        self.store.commit(serial)?;
        fs::write(
            host.dir.join(ISSUE_DATE_FILE),
            format!("{}\n", window.issue_stamp()),
        )?;
        fs::write(
            host.dir.join(EXPIRATION_DATE_FILE),
            format!("{}\n", window.expiration_stamp()),
        )?;

        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.global_log)?;
        writeln!(
            log,
            "{} - serial: {:3}, host: {}, validity: {} days, hostnames: {}",
            time::audit_stamp(window.issued_at),
            serial,
            host.id,
            window.validity_days,
            principals
        )?;
        Ok(())
    }
}
