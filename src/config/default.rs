/// Certificate validity period in days when a host has no validity file
pub const DEFAULT_VALIDITY_DAYS: i64 = 730;
/// Backdated start of validity passed to ssh-keygen, tolerating clock
/// skew between the issuer and the verifying host
pub const SIGNING_GRACE: &str = "-15m";

// Authority root files
pub const DOMAIN_FILE: &str = "domain";
pub const SERIAL_FILE: &str = "serial";
pub const GLOBAL_LOG_FILE: &str = "log";
pub const AUTHORITY_KEY_FILE: &str = "authority";
pub const LOCK_FILE: &str = "hostca.lock";
pub const KNOWN_HOSTS_UNHASHED: &str = "known_hosts_unhashed";
pub const KNOWN_HOSTS_HASHED: &str = "known_hosts_hashed";
pub const KNOWN_HOSTS_UNHASHED_FULL: &str = "known_hosts_unhashed_full";
pub const KNOWN_HOSTS_HASHED_FULL: &str = "known_hosts_hashed_full";

// Per-host directory files
pub const HOSTNAMES_FILE: &str = "hostnames";
pub const VALIDITY_FILE: &str = "validity";
pub const ISSUE_DATE_FILE: &str = "issue_date";
pub const EXPIRATION_DATE_FILE: &str = "expiration_date";
pub const HOST_LOG_FILE: &str = "log";
pub const PUBLIC_KEY_SUFFIX: &str = "_key.pub";
