//! Persistence configuration for one registered `base_directory` on a
//! `FilesystemServer`.

/// How one storage backend registered under a `FilesystemServer` persists
/// and guards writes under its `base_directory`.
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Virtual path prefix this config owns, with no leading or trailing
    /// slash (e.g. `"user_files"`). A virtual path is owned by this config
    /// when it equals `/{base_directory}` or starts with `/{base_directory}/`;
    /// that prefix is stripped before the backend ever sees the path.
    pub base_directory: String,
    /// Idle time after the last write to a path before it's flushed to the backend.
    pub debounce_ms: u64,
    /// When true, every mutation under this `base_directory` is rejected.
    pub readonly: bool,
}

impl PersistenceConfig {
    pub fn new(base_directory: impl Into<String>) -> Self {
        Self {
            base_directory: base_directory.into(),
            debounce_ms: 500,
            readonly: false,
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            base_directory: String::new(),
            debounce_ms: 500,
            readonly: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_to_writable_with_the_standard_debounce() {
        let config = PersistenceConfig::new("user_files");
        assert_eq!(config.base_directory, "user_files");
        assert!(!config.readonly);
        assert_eq!(config.debounce_ms, 500);
    }
}
