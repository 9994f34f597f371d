//! Build-time information
//!
//! Metadata captured at compile time by the build script: timestamps, cargo
//! configuration, compiler version and, when available, git state.

pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build timestamp (when the binary was compiled)
pub const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

/// Cargo optimization level (0, 1, 2, 3, s, z)
pub const CARGO_OPT_LEVEL: &str = env!("VERGEN_CARGO_OPT_LEVEL");

/// Target triple (e.g., x86_64-unknown-linux-gnu, x86_64-apple-darwin)
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

/// Rust compiler version (e.g., 1.85.0)
pub const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");

/// Rust channel (stable, beta, or nightly)
pub const RUSTC_CHANNEL: &str = env!("VERGEN_RUSTC_CHANNEL");

/// Git commit SHA, absent when built outside a git checkout
pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

/// First 8 characters of the git SHA
pub fn git_sha_short() -> Option<&'static str> {
    GIT_SHA
        .filter(|sha| sha.chars().all(|c| c.is_ascii_hexdigit()) && !sha.is_empty())
        .map(|sha| &sha[..sha.len().min(8)])
}

/// Format: `{version}-{target_triple}-opt{opt_level}`
pub fn version_string() -> String {
    format!("{}-{}-opt{}", PKG_VERSION, CARGO_TARGET_TRIPLE, CARGO_OPT_LEVEL)
}

/// Multi-line build summary for `--version` style output
pub fn detailed_info() -> String {
    format!(
        "{} {}\nBuilt: {}\nTarget: {}\nOptimization: {}\nRustc: {} ({})\nGit: {}",
        PKG_NAME,
        PKG_VERSION,
        BUILD_TIMESTAMP,
        CARGO_TARGET_TRIPLE,
        CARGO_OPT_LEVEL,
        RUSTC_SEMVER,
        RUSTC_CHANNEL,
        git_sha_short().unwrap_or("unknown")
    )
}
