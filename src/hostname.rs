use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::Result;

/// Canonical hostname for a certificate principal. Port numbers are not
/// supported in certificates, so `web:2222` becomes `web.<domain>`.
pub fn cert_principal(name: &str, domain: &str) -> String {
    match name.split_once(':') {
        Some((host, _port)) => format!("{}.{}", host, domain),
        None => format!("{}.{}", name, domain),
    }
}

/// Canonical hostname for a known_hosts entry. Ports survive in the
/// bracket notation sshd clients expect: `[web.<domain>]:2222`.
pub fn known_hosts_name(name: &str, domain: &str) -> String {
    match name.split_once(':') {
        Some((host, port)) => format!("[{}.{}]:{}", host, domain, port),
        None => format!("{}.{}", name, domain),
    }
}

/// Comma-separated certificate principals for a hostname list.
/// Canonicalization can collapse distinct entries (`web` and
/// `web:2222` both map to `web.<domain>`), so duplicates are dropped
/// here, preserving first-seen order.
pub fn cert_principals(names: &[String], domain: &str) -> String {
    join_unique(names.iter().map(|name| cert_principal(name, domain)))
}

/// Comma-separated known_hosts names for a hostname list.
pub fn known_hosts_names(names: &[String], domain: &str) -> String {
    join_unique(names.iter().map(|name| known_hosts_name(name, domain)))
}

fn join_unique(names: impl Iterator<Item = String>) -> String {
    let mut seen: Vec<String> = Vec::new();
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen.join(",")
}

/// Read a hostnames file: one name per line, blank lines and `#`
/// comments ignored, order preserved.
pub fn read_hostnames(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    let skip = Regex::new(r"^\s*($|#)").unwrap();
    Ok(contents
        .lines()
        .filter(|line| !skip.is_match(line))
        .map(|line| line.trim().to_string())
        .collect())
}
