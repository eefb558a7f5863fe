//! Event bus configuration.

/// Configuration for an [`crate::EventBus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Label attached to log records from this bus.
    pub name: String,
    /// Maximum number of dispatch passes active at once on one thread.
    ///
    /// A handler that publishes starts a nested pass. `None` means unbounded.
    pub max_dispatch_depth: Option<usize>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            max_dispatch_depth: None,
        }
    }
}

impl BusConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bus name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the maximum nested dispatch depth.
    pub fn with_max_dispatch_depth(mut self, depth: usize) -> Self {
        self.max_dispatch_depth = Some(depth);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BusConfig::default();

        assert_eq!(config.name, "default");
        assert_eq!(config.max_dispatch_depth, None);
    }

    #[test]
    fn test_config_builder() {
        let config = BusConfig::new()
            .with_name("game")
            .with_max_dispatch_depth(4);

        assert_eq!(config.name, "game");
        assert_eq!(config.max_dispatch_depth, Some(4));
    }
}
