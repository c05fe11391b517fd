use std::path::{Path, PathBuf};
use std::process::Command;

use regex::Regex;

use crate::error::{CertError, Result};

/// Algorithm and size reported for one public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    pub bits: u32,
    pub algorithm: String,
}

/// Seam over `ssh-keygen -l` so the strength policy is testable
/// without real key material.
pub trait KeyInspector {
    fn inspect(&self, key: &Path) -> Result<KeyInfo>;
}

/// Inspector backed by the installed ssh-keygen binary.
pub struct SshKeygenInspector;

impl KeyInspector for SshKeygenInspector {
    fn inspect(&self, key: &Path) -> Result<KeyInfo> {
        let output = Command::new("ssh-keygen")
            .arg("-l")
            .arg("-f")
            .arg(key)
            .output()?;
        if !output.status.success() {
            return Err(CertError::KeyInspect {
                path: key.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let text = String::from_utf8_lossy(&output.stdout);
        parse_fingerprint_line(&text).ok_or_else(|| CertError::KeyInspect {
            path: key.to_path_buf(),
            message: format!("unrecognized fingerprint output: {}", text.trim()),
        })
    }
}

/// Parse a `ssh-keygen -l` line such as
/// `2048 SHA256:A1b2... comment (RSA)`.
pub fn parse_fingerprint_line(line: &str) -> Option<KeyInfo> {
    let re = Regex::new(r"^(\d+) .*\(([^(]+)\)$").unwrap();
    let caps = re.captures(line.trim())?;
    Some(KeyInfo {
        bits: caps[1].parse().ok()?,
        algorithm: caps[2].to_string(),
    })
}

/// Reject the whole batch on the first key below the minimum-strength
/// policy. DSA never passes; RSA needs at least 2048 bits; any other
/// algorithm is accepted at any reported size.
pub fn check_weak_keys(inspector: &dyn KeyInspector, keys: &[PathBuf]) -> Result<()> {
    for key in keys {
        let info = inspector.inspect(key)?;
        let weak =
            info.algorithm == "DSA" || (info.algorithm == "RSA" && info.bits < 2048);
        if weak {
            return Err(CertError::PolicyViolation {
                path: key.clone(),
                algorithm: info.algorithm,
                bits: info.bits,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedInspector(KeyInfo);

    impl KeyInspector for FixedInspector {
        fn inspect(&self, _key: &Path) -> Result<KeyInfo> {
            Ok(self.0.clone())
        }
    }

    fn info(bits: u32, algorithm: &str) -> KeyInfo {
        KeyInfo {
            bits,
            algorithm: algorithm.to_string(),
        }
    }

    #[test]
    fn parses_fingerprint_output() {
        let parsed = parse_fingerprint_line(
            "2048 SHA256:nThbg6kXUpJWGl7E1IGOCspRomTxdCARLviKw6E5SY8 root@web (RSA)\n",
        )
        .unwrap();
        assert_eq!(parsed, info(2048, "RSA"));

        let parsed =
            parse_fingerprint_line("256 SHA256:abcdef ed25519 host key (ED25519)").unwrap();
        assert_eq!(parsed, info(256, "ED25519"));
    }

    #[test]
    fn parse_rejects_malformed_lines() {
        assert!(parse_fingerprint_line("garbage").is_none());
        assert!(parse_fingerprint_line("").is_none());
    }

    #[test]
    fn rsa_below_2048_is_rejected() {
        let keys = vec![PathBuf::from("web/ssh_host_rsa_key.pub")];
        match check_weak_keys(&FixedInspector(info(1024, "RSA")), &keys) {
            Err(CertError::PolicyViolation {
                path,
                algorithm,
                bits,
            }) => {
                assert_eq!(path, keys[0]);
                assert_eq!(algorithm, "RSA");
                assert_eq!(bits, 1024);
            }
            other => panic!("expected PolicyViolation, got {:?}", other),
        }
    }

    #[test]
    fn dsa_is_rejected_regardless_of_size() {
        let keys = vec![PathBuf::from("web/ssh_host_dsa_key.pub")];
        assert!(matches!(
            check_weak_keys(&FixedInspector(info(4096, "DSA")), &keys),
            Err(CertError::PolicyViolation { .. })
        ));
    }

    #[test]
    fn rsa_2048_and_up_passes() {
        let keys = vec![PathBuf::from("web/ssh_host_rsa_key.pub")];
        assert!(check_weak_keys(&FixedInspector(info(2048, "RSA")), &keys).is_ok());
        assert!(check_weak_keys(&FixedInspector(info(4096, "RSA")), &keys).is_ok());
    }

    #[test]
    fn non_rsa_dsa_algorithms_have_no_size_floor() {
        let keys = vec![PathBuf::from("web/ssh_host_ed25519_key.pub")];
        assert!(check_weak_keys(&FixedInspector(info(256, "ED25519")), &keys).is_ok());
        assert!(check_weak_keys(&FixedInspector(info(256, "ECDSA")), &keys).is_ok());
    }
}
