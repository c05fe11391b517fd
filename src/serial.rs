use std::fs;
use std::path::PathBuf;

use crate::error::{CertError, Result};

/// Single-writer persistence for the global monotonic serial counter.
///
/// `read` must be side-effect free; `commit` is called at most once per
/// issuance and only after the external signing run succeeded. A failed
/// attempt discards its candidate, leaving a gap rather than a
/// collision.
pub trait SerialStore {
    fn read(&self) -> Result<u64>;
    fn commit(&self, serial: u64) -> Result<()>;
}

/// Counter stored as a plain integer, newline-terminated. An absent
/// file reads as zero.
pub struct FileSerialStore {
    path: PathBuf,
}

impl FileSerialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SerialStore for FileSerialStore {
    fn read(&self) -> Result<u64> {
        if !self.path.exists() {
            return Ok(0);
        }
        let text = fs::read_to_string(&self.path)?;
        text.trim().parse::<u64>().map_err(|e| {
            CertError::InputValidation(format!(
                "invalid serial counter in '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    fn commit(&self, serial: u64) -> Result<()> {
        fs::write(&self.path, format!("{}\n", serial))?;
        Ok(())
    }
}

/// Reserve the next serial as a candidate without persisting anything.
pub fn next_serial(store: &dyn SerialStore) -> Result<u64> {
    Ok(store.read()? + 1)
}
