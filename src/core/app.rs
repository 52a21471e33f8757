//! Application identity from Cargo.toml.

/// Application name (from Cargo.toml `package.name`).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Application version (from Cargo.toml `package.version`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Human-facing title used in report and banner headers.
pub const SITE_TITLE: &str = "Red Panda Site";
