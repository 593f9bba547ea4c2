// Exporter identity baked in at compile time

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `name/version`, as logged at startup.
pub fn banner() -> String {
    format!("{}/{}", NAME, VERSION)
}
