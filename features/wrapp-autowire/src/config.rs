/// Tunables of a wiring session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirerConfig {
    /// Maximum length of a single resolution chain
    pub max_resolution_depth: usize,
}

impl Default for WirerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: 64,
        }
    }
}

impl WirerConfig {
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }
}
