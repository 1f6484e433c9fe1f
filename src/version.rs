// Build-time identity from Cargo.toml

/// Package version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name (from Cargo.toml); upper-cased as the status line prefix.
pub const NAME: &str = env!("CARGO_PKG_NAME");
