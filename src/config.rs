//! Client configuration
//!
//! Deserializable so hosts can load it from their own config files; every
//! field has a sensible default and absent fields fall back to it.

use serde::{Deserialize, Serialize};

/// Configuration for [`HealthClient`](crate::client::HealthClient)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Hard cap on raw query result counts
    ///
    /// Applied on top of the per-query limit: the effective limit is the
    /// smaller of the two. `None` leaves caller limits untouched.
    #[serde(default)]
    pub max_raw_results: Option<usize>,
}

impl ClientConfig {
    /// Effective raw-query limit given the caller's requested limit
    pub fn effective_limit(&self, requested: Option<usize>) -> Option<usize> {
        match (self.max_raw_results, requested) {
            (Some(cap), Some(limit)) => Some(cap.min(limit)),
            (Some(cap), None) => Some(cap),
            (None, limit) => limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_raw_results, None);
    }

    #[test]
    fn test_effective_limit() {
        let unlimited = ClientConfig::default();
        assert_eq!(unlimited.effective_limit(None), None);
        assert_eq!(unlimited.effective_limit(Some(10)), Some(10));

        let capped = ClientConfig {
            max_raw_results: Some(100),
        };
        assert_eq!(capped.effective_limit(None), Some(100));
        assert_eq!(capped.effective_limit(Some(10)), Some(10));
        assert_eq!(capped.effective_limit(Some(500)), Some(100));
    }
}
