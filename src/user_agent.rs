//! User-Agent header sent with every admin API and proxied API request.

use std::sync::OnceLock;

const SDK_NAME: &str = "threescale-rust";

const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

static USER_AGENT: OnceLock<String> = OnceLock::new();

/// Returns the User-Agent string, e.g. `threescale-rust/0.1.0 (rust/1.92; linux/x86_64)`.
///
/// Computed once and cached.
pub fn user_agent() -> &'static str {
    USER_AGENT.get_or_init(|| {
        let os = match std::env::consts::OS {
            "macos" => "darwin",
            os => os,
        };
        format!(
            "{}/{} (rust/{}; {}/{})",
            SDK_NAME,
            SDK_VERSION,
            env!("CARGO_PKG_RUST_VERSION"),
            os,
            std::env::consts::ARCH,
        )
    })
}
