pub mod issue;
pub mod known_hosts;
pub mod list;
