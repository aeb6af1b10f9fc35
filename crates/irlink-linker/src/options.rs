//! Closure driver configuration.

/// Options for [`ExternalDependenciesGenerator`](crate::ExternalDependenciesGenerator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureOptions {
    /// How many descriptors to list per category when symbols stay unbound.
    pub diagnostic_sample_limit: usize,
}

impl ClosureOptions {
    pub const DEFAULT_DIAGNOSTIC_SAMPLE_LIMIT: usize = 10;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diagnostic_sample_limit(mut self, limit: usize) -> Self {
        self.diagnostic_sample_limit = limit;
        self
    }
}

impl Default for ClosureOptions {
    fn default() -> Self {
        Self {
            diagnostic_sample_limit: Self::DEFAULT_DIAGNOSTIC_SAMPLE_LIMIT,
        }
    }
}
