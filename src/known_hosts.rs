use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Local;
use tracing::debug;

use crate::config::default::HOSTNAMES_FILE;
use crate::config::AuthorityRoot;
use crate::error::{CertError, Result};
use crate::{host, hostname};

/// Rebuild the distributable trust material: the hashed copy of the
/// curated known_hosts file, plus the "full" unhashed and hashed
/// variants covering every certified host directory.
pub fn generate(root: &AuthorityRoot) -> Result<()> {
    let domain = root.load_domain()?;
    let stamp = format!("### generated on {} ###", Local::now().to_rfc3339());

    create_hashed_copy(
        &root.known_hosts_unhashed(),
        &root.known_hosts_hashed(),
        Some(&stamp),
    )?;

    write_unhashed_full(root, &domain, &stamp)?;

    create_hashed_copy(
        &root.known_hosts_unhashed_full(),
        &root.known_hosts_hashed_full(),
        None,
    )?;
    Ok(())
}

/// Curated entries followed by one line per (canonical hostnames, key)
/// pair for every host directory that has a hostname list.
pub fn write_unhashed_full(root: &AuthorityRoot, domain: &str, stamp: &str) -> Result<()> {
    let mut out = File::create(root.known_hosts_unhashed_full())?;
    writeln!(out, "{}\n", stamp)?;
    append_file(&root.known_hosts_unhashed(), &mut out)?;

    writeln!(out, "\n# Hosts with certificates")?;
    for dir in root.host_dirs()? {
        write_host_entries(&mut out, &dir, domain)?;
    }
    Ok(())
}

fn write_host_entries(out: &mut impl Write, dir: &Path, domain: &str) -> Result<()> {
    let hostnames_path = dir.join(HOSTNAMES_FILE);
    if !hostnames_path.exists() {
        debug!("skipping '{}': no hostname list", dir.display());
        return Ok(());
    }
    let names = hostname::read_hostnames(&hostnames_path)?;
    if names.is_empty() {
        return Ok(());
    }
    let entry_names = hostname::known_hosts_names(&names, domain);
    for key in host::public_key_files(dir)? {
        let contents = fs::read_to_string(&key)?;
        writeln!(out, "{} {}", entry_names, contents.trim())?;
    }
    Ok(())
}

fn append_file(src: &Path, dst: &mut impl Write) -> Result<()> {
    let mut reader = File::open(src)?;
    std::io::copy(&mut reader, dst)?;
    Ok(())
}

/// Copy `src` to `dst` (optionally prefixed with the generation stamp)
/// and hash it in place with `ssh-keygen -H`, discarding the `.old`
/// backup the tool leaves behind.
fn create_hashed_copy(src: &Path, dst: &Path, stamp: Option<&str>) -> Result<()> {
    {
        let mut out = File::create(dst)?;
        if let Some(stamp) = stamp {
            writeln!(out, "{}\n", stamp)?;
        }
        append_file(src, &mut out)?;
    }

    let status = Command::new("ssh-keygen")
        .arg("-H")
        .arg("-f")
        .arg(dst)
        .status()?;
    if !status.success() {
        return Err(CertError::Hashing {
            status: status.code().unwrap_or(-1),
            path: dst.to_path_buf(),
        });
    }

    let backup = PathBuf::from(format!("{}.old", dst.display()));
    match fs::remove_file(&backup) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn full_unhashed_combines_curated_and_per_host_entries() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("domain"), "example.com\n").unwrap();
        fs::write(
            tmp.path().join("known_hosts_unhashed"),
            "bastion.example.com ssh-ed25519 CURATED\n",
        )
        .unwrap();

        let web = tmp.path().join("web");
        fs::create_dir(&web).unwrap();
        fs::write(web.join("hostnames"), "web\nweb:2222\n").unwrap();
        fs::write(web.join("ssh_host_ed25519_key.pub"), "ssh-ed25519 WEBKEY\n").unwrap();

        // directory without a hostname list is skipped, not fatal
        fs::create_dir(tmp.path().join("scratch")).unwrap();

        let root = AuthorityRoot::new(tmp.path());
        write_unhashed_full(&root, "example.com", "### generated on test ###").unwrap();

        let full = fs::read_to_string(tmp.path().join("known_hosts_unhashed_full")).unwrap();
        assert!(full.starts_with("### generated on test ###\n"));
        assert!(full.contains("bastion.example.com ssh-ed25519 CURATED"));
        assert!(full.contains("# Hosts with certificates"));
        assert!(full.contains(
            "web.example.com,[web.example.com]:2222 ssh-ed25519 WEBKEY"
        ));
    }

    #[test]
    fn hosts_with_multiple_keys_get_one_line_each() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("known_hosts_unhashed"), "").unwrap();
        let db = tmp.path().join("db");
        fs::create_dir(&db).unwrap();
        fs::write(db.join("hostnames"), "db\n").unwrap();
        fs::write(db.join("a_key.pub"), "ssh-ed25519 KEYA\n").unwrap();
        fs::write(db.join("b_key.pub"), "ssh-rsa KEYB\n").unwrap();

        let root = AuthorityRoot::new(tmp.path());
        write_unhashed_full(&root, "example.com", "### generated on test ###").unwrap();

        let full = fs::read_to_string(tmp.path().join("known_hosts_unhashed_full")).unwrap();
        let entries: Vec<&str> = full
            .lines()
            .filter(|l| l.starts_with("db.example.com "))
            .collect();
        assert_eq!(
            entries,
            vec![
                "db.example.com ssh-ed25519 KEYA",
                "db.example.com ssh-rsa KEYB"
            ]
        );
    }
}
