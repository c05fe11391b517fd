use std::path::Path;

use tracing::{debug, info};

use crate::config::default::HOST_LOG_FILE;
use crate::config::AuthorityRoot;
use crate::error::{CertError, Result};
use crate::host::HostRecord;
use crate::hostname;
use crate::inspect::{self, KeyInspector};
use crate::lock::AuthorityLock;
use crate::prompt::Approver;
use crate::record::IssuanceRecorder;
use crate::serial::{self, FileSerialStore};
use crate::signing::{Signer, SigningRequest};
use crate::validity::ValidityWindow;

/// Injected collaborators for one issuance. Process-backed in
/// production, stubbed in tests.
pub struct IssuanceDeps<'a> {
    pub inspector: &'a dyn KeyInspector,
    pub approver: &'a dyn Approver,
    pub signer: &'a dyn Signer,
}

/// What a completed issuance produced.
#[derive(Debug, Clone)]
pub struct IssuanceOutcome {
    pub host_id: String,
    pub serial: u64,
    pub principals: String,
    pub window: ValidityWindow,
}

/// Drive one end-to-end issuance for one host directory:
/// load record, validate keys, allocate a candidate serial, compute the
/// validity window, confirm and sign, then record the outcome.
///
/// Nothing is persisted unless the external signing run exits zero; a
/// failed attempt discards its candidate serial (a gap, never a
/// collision) and leaves the counter file byte-identical.
pub fn issue_certificate(
    root: &AuthorityRoot,
    host_dir: &Path,
    deps: &IssuanceDeps,
) -> Result<IssuanceOutcome> {
    let domain = root.load_domain()?;
    let host = HostRecord::load(host_dir)?;
    let principals = hostname::cert_principals(&host.hostnames, &domain);
    debug!("principals for {}: {}", host.id, principals);
    if let (Some(issued), Some(expires)) = (host.issued_at, host.expires_at) {
        debug!(
            "replacing certificate issued {} (expires {})",
            crate::time::format_metadata(issued),
            crate::time::format_metadata(expires)
        );
    }

    inspect::check_weak_keys(deps.inspector, &host.public_keys)?;

    let _lock = AuthorityLock::acquire(root.lock_path())?;
    let store = FileSerialStore::new(root.serial_path());
    let candidate = serial::next_serial(&store)?;
    let window = ValidityWindow::starting_now(host.validity_days);

    let request = SigningRequest::new(
        root.authority_key_path(),
        host.id.clone(),
        principals.clone(),
        &window,
        candidate,
        host.public_keys.clone(),
    );

    if !deps.approver.approve(&request.display_command())? {
        return Err(CertError::Aborted);
    }
    deps.signer.sign(&request, &host.dir.join(HOST_LOG_FILE))?;

    IssuanceRecorder::new(&store, root.global_log_path()).record(
        &host,
        candidate,
        &window,
        &principals,
    )?;
    info!(
        "issued certificate serial {} for {} (valid until {})",
        candidate,
        host.id,
        window.expiration_stamp()
    );

    Ok(IssuanceOutcome {
        host_id: host.id,
        serial: candidate,
        principals,
        window,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::KeyInfo;
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct FixedInspector(KeyInfo);

    impl KeyInspector for FixedInspector {
        fn inspect(&self, _key: &Path) -> Result<KeyInfo> {
            Ok(self.0.clone())
        }
    }

    fn ed25519() -> FixedInspector {
        FixedInspector(KeyInfo {
            bits: 256,
            algorithm: "ED25519".to_string(),
        })
    }

    struct StubApprover(bool);

    impl Approver for StubApprover {
        fn approve(&self, _command: &str) -> Result<bool> {
            Ok(self.0)
        }
    }

    #[derive(Default)]
    struct StubSigner {
        calls: Cell<usize>,
        fail_status: Cell<Option<i32>>,
        serials_seen: RefCell<Vec<u64>>,
    }

    impl Signer for StubSigner {
        fn sign(&self, request: &SigningRequest, log_path: &Path) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            self.serials_seen.borrow_mut().push(request.serial);
            if let Some(status) = self.fail_status.get() {
                return Err(CertError::ExternalTool {
                    status,
                    log_path: log_path.to_path_buf(),
                });
            }
            Ok(())
        }
    }

    struct Fixture {
        root_dir: TempDir,
        host_dir: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let root_dir = TempDir::new().unwrap();
            fs::write(root_dir.path().join("domain"), "example.com\n").unwrap();
            let host_dir = root_dir.path().join("web");
            fs::create_dir(&host_dir).unwrap();
            fs::write(host_dir.join("hostnames"), "web\nweb:2222\n").unwrap();
            fs::write(host_dir.join("ssh_host_ed25519_key.pub"), "ssh-ed25519 AAAA").unwrap();
            Self { root_dir, host_dir }
        }

        fn root(&self) -> AuthorityRoot {
            AuthorityRoot::new(self.root_dir.path())
        }

        fn serial_file(&self) -> PathBuf {
            self.root_dir.path().join("serial")
        }
    }

    #[test]
    fn n_successful_issuances_advance_the_counter_by_n() {
        let fx = Fixture::new();
        let inspector = ed25519();
        let approver = StubApprover(true);
        let signer = StubSigner::default();
        let deps = IssuanceDeps {
            inspector: &inspector,
            approver: &approver,
            signer: &signer,
        };

        for _ in 0..3 {
            issue_certificate(&fx.root(), &fx.host_dir, &deps).unwrap();
        }

        assert_eq!(fs::read_to_string(fx.serial_file()).unwrap(), "3\n");
        let seen = signer.serials_seen.borrow();
        assert_eq!(*seen, vec![1, 2, 3]);
        let mut deduped = seen.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), seen.len());
    }

    #[test]
    fn principals_carry_the_domain_with_ports_stripped() {
        let fx = Fixture::new();
        let inspector = ed25519();
        let approver = StubApprover(true);
        let signer = StubSigner::default();
        let deps = IssuanceDeps {
            inspector: &inspector,
            approver: &approver,
            signer: &signer,
        };

        let outcome = issue_certificate(&fx.root(), &fx.host_dir, &deps).unwrap();
        assert_eq!(outcome.principals, "web.example.com");
        assert_eq!(outcome.host_id, "web");
    }

    #[test]
    fn signing_failure_leaves_the_counter_byte_identical() {
        let fx = Fixture::new();
        fs::write(fx.serial_file(), "7\n").unwrap();
        let inspector = ed25519();
        let approver = StubApprover(true);
        let signer = StubSigner::default();
        signer.fail_status.set(Some(255));
        let deps = IssuanceDeps {
            inspector: &inspector,
            approver: &approver,
            signer: &signer,
        };

        match issue_certificate(&fx.root(), &fx.host_dir, &deps) {
            Err(CertError::ExternalTool { status, .. }) => assert_eq!(status, 255),
            other => panic!("expected ExternalTool, got {:?}", other),
        }
        assert_eq!(fs::read_to_string(fx.serial_file()).unwrap(), "7\n");
        assert!(!fx.host_dir.join("issue_date").exists());
        assert!(!fx.host_dir.join("expiration_date").exists());
        assert!(!fx.root_dir.path().join("log").exists());
    }

    #[test]
    fn weak_key_aborts_before_the_signing_tool_is_ever_invoked() {
        let fx = Fixture::new();
        let inspector = FixedInspector(KeyInfo {
            bits: 1024,
            algorithm: "RSA".to_string(),
        });
        let approver = StubApprover(true);
        let signer = StubSigner::default();
        let deps = IssuanceDeps {
            inspector: &inspector,
            approver: &approver,
            signer: &signer,
        };

        assert!(matches!(
            issue_certificate(&fx.root(), &fx.host_dir, &deps),
            Err(CertError::PolicyViolation { bits: 1024, .. })
        ));
        assert_eq!(signer.calls.get(), 0);
        assert!(!fx.serial_file().exists());
    }

    #[test]
    fn short_non_rsa_keys_are_accepted() {
        let fx = Fixture::new();
        let inspector = ed25519();
        let approver = StubApprover(true);
        let signer = StubSigner::default();
        let deps = IssuanceDeps {
            inspector: &inspector,
            approver: &approver,
            signer: &signer,
        };

        issue_certificate(&fx.root(), &fx.host_dir, &deps).unwrap();
        assert_eq!(signer.calls.get(), 1);
    }

    #[test]
    fn empty_hostname_file_aborts_before_any_allocation() {
        let fx = Fixture::new();
        fs::write(fx.host_dir.join("hostnames"), "# comments\n\n").unwrap();
        let inspector = ed25519();
        let approver = StubApprover(true);
        let signer = StubSigner::default();
        let deps = IssuanceDeps {
            inspector: &inspector,
            approver: &approver,
            signer: &signer,
        };

        assert!(matches!(
            issue_certificate(&fx.root(), &fx.host_dir, &deps),
            Err(CertError::InputValidation(_))
        ));
        assert_eq!(signer.calls.get(), 0);
        assert!(!fx.serial_file().exists());
        assert!(!fx.root_dir.path().join("hostca.lock").exists());
    }

    #[test]
    fn declined_confirmation_persists_nothing() {
        let fx = Fixture::new();
        let inspector = ed25519();
        let approver = StubApprover(false);
        let signer = StubSigner::default();
        let deps = IssuanceDeps {
            inspector: &inspector,
            approver: &approver,
            signer: &signer,
        };

        assert!(matches!(
            issue_certificate(&fx.root(), &fx.host_dir, &deps),
            Err(CertError::Aborted)
        ));
        assert_eq!(signer.calls.get(), 0);
        assert!(!fx.serial_file().exists());
    }

    #[test]
    fn missing_domain_file_is_fatal_before_anything_else() {
        let fx = Fixture::new();
        fs::remove_file(fx.root_dir.path().join("domain")).unwrap();
        let inspector = ed25519();
        let approver = StubApprover(true);
        let signer = StubSigner::default();
        let deps = IssuanceDeps {
            inspector: &inspector,
            approver: &approver,
            signer: &signer,
        };

        assert!(matches!(
            issue_certificate(&fx.root(), &fx.host_dir, &deps),
            Err(CertError::Configuration { .. })
        ));
        assert_eq!(signer.calls.get(), 0);
    }

    #[test]
    fn concurrent_invocation_is_refused_by_the_lock() {
        let fx = Fixture::new();
        let _held = AuthorityLock::acquire(fx.root().lock_path()).unwrap();
        let inspector = ed25519();
        let approver = StubApprover(true);
        let signer = StubSigner::default();
        let deps = IssuanceDeps {
            inspector: &inspector,
            approver: &approver,
            signer: &signer,
        };

        assert!(matches!(
            issue_certificate(&fx.root(), &fx.host_dir, &deps),
            Err(CertError::Locked { .. })
        ));
        assert_eq!(signer.calls.get(), 0);
    }

    #[test]
    fn recorded_expiration_roundtrips_to_issue_plus_validity() {
        let fx = Fixture::new();
        fs::write(fx.host_dir.join("validity"), "365\n").unwrap();
        let inspector = ed25519();
        let approver = StubApprover(true);
        let signer = StubSigner::default();
        let deps = IssuanceDeps {
            inspector: &inspector,
            approver: &approver,
            signer: &signer,
        };

        issue_certificate(&fx.root(), &fx.host_dir, &deps).unwrap();

        let issued = crate::host::read_stamp(&fx.host_dir.join("issue_date")).unwrap();
        let expires = crate::host::read_stamp(&fx.host_dir.join("expiration_date")).unwrap();
        assert_eq!(expires - issued, chrono::Duration::days(365));
    }
}
