use chrono::{DateTime, Duration, Local, Utc};

use crate::config::default::SIGNING_GRACE;
use crate::time;

/// Validity window for one issuance attempt. Every derived timestamp
/// comes from the single captured instant, so the recorded expiration
/// always equals the recorded issue time plus the validity period.
#[derive(Debug, Clone, Copy)]
pub struct ValidityWindow {
    pub issued_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub validity_days: i64,
}

impl ValidityWindow {
    pub fn starting_now(validity_days: i64) -> Self {
        Self::at(Utc::now(), validity_days)
    }

    pub fn at(issued_at: DateTime<Utc>, validity_days: i64) -> Self {
        Self {
            issued_at,
            valid_until: issued_at + Duration::days(validity_days),
            validity_days,
        }
    }

    /// `-V` argument for ssh-keygen: start backdated by the grace
    /// window, end in local wall-clock form. The grace window applies
    /// only inside the signed certificate, never to recorded metadata.
    pub fn signing_spec(&self) -> String {
        format!(
            "{}:{}",
            SIGNING_GRACE,
            self.valid_until.with_timezone(&Local).format("%Y%m%d%H%M%S")
        )
    }

    /// UTC timestamp written to the host's issue_date file.
    pub fn issue_stamp(&self) -> String {
        time::format_metadata(self.issued_at)
    }

    /// UTC timestamp written to the host's expiration_date file.
    pub fn expiration_stamp(&self) -> String {
        time::format_metadata(self.valid_until)
    }
}
