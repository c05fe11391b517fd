use anyhow::Result;
use chrono::Utc;

use crate::cli::{Cli, ListArgs};
use crate::config::AuthorityRoot;
use crate::report::{self, InventoryReport};

pub fn handle_list(cli_args: &Cli, args: &ListArgs) -> Result<()> {
    let root = AuthorityRoot::new(&cli_args.root);
    let report = report::collect(&root)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    print_report(&report);
    Ok(())
}

fn print_report(report: &InventoryReport) {
    let now = Utc::now();
    println!(
        "{:<16} {:<11} {:<11} {:>9} {:>5} {:>5}",
        "HOST / DIR", "ISSUED ON", "EXPIRES ON", "EXP. IN", "FQDNs", "KEYS"
    );
    for host in &report.hosts {
        let issued = host
            .issued_at
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let expires = host
            .expires_at
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let remaining = host
            .days_until_expiry(now)
            .map(|days| format!("{} days", days))
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "{:<16} {:<11} {:<11} {:>9} {:>5} {:>5}",
            host.host, issued, expires, remaining, host.hostname_count, host.key_count
        );
    }

    println!();
    println!("{:-^40}", " SUMMARY ");
    println!("{:6} {:<25}", report.hosts.len(), "hosts / directories");
    println!("{:6} {:<25}", report.total_hostnames(), "FQDNs / hostnames");
    println!("{:6} {:<25}", report.total_keys(), "keys (public keys)");
    println!(
        "{:6} {:<25}",
        report.total_entries(),
        "hashed known_hosts entries"
    );
    println!("{}", "-".repeat(40));
}
