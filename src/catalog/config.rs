//! Build configuration profiles

use std::sync::Arc;

use super::platform::PlatformProfile;

/// Immutable build profile layered on top of a platform.
///
/// The platform reference is shared read-only with every other config that
/// targets it; configs add flags on top, they never edit the platform.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Human-readable label, written to the run manifest
    pub name: String,
    /// Target platform
    pub platform: Arc<PlatformProfile>,
    /// Command-line tokens that select this config
    pub aliases: Vec<String>,
    /// Compiler flags appended after the platform baseline
    pub compiler_flags: Vec<String>,
    /// Linker flags appended after the platform baseline
    pub linker_flags: Vec<String>,
}

impl BuildConfig {
    /// Whether `token` selects this config (exact, case-sensitive match)
    pub fn matches(&self, token: &str) -> bool {
        self.aliases.iter().any(|alias| alias == token)
    }
}
