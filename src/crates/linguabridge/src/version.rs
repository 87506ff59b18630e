//! Build metadata injected by `build.rs`.

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build number (from CI or default to 0)
pub const BUILD_NUMBER: &str = env!("BUILD_NUMBER");

/// Git commit hash (short form)
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");

/// Build timestamp (RFC3339 format)
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");

/// Full version string, e.g. `linguabridge v0.1.0 (build 42, commit abc123)`
pub fn full_version() -> String {
    format!(
        "linguabridge v{} (build {}, commit {})",
        VERSION, BUILD_NUMBER, GIT_COMMIT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants() {
        assert!(!VERSION.is_empty());
        assert!(!BUILD_NUMBER.is_empty());
        assert!(!GIT_COMMIT.is_empty());
        assert!(!BUILD_TIMESTAMP.is_empty());
    }

    #[test]
    fn test_full_version() {
        let version = full_version();
        assert!(version.starts_with("linguabridge v"));
        assert!(version.contains(VERSION));
    }
}
