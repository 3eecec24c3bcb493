/// Build options for metadata caches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Build a case-insensitive name index. Without it, ignore-case parsing
    /// scans the declared names linearly.
    pub ignore_case_index: bool,
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_case_index(mut self, enabled: bool) -> Self {
        self.ignore_case_index = enabled;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ignore_case_index: true,
        }
    }
}
