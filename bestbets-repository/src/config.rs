//! Configuration types for the OpenSearch index manager.

use serde::Deserialize;

/// Connection settings for an `IndexManager` backed by OpenSearch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexManagerConfig {
    /// Node URLs. One URL uses a single-node pool, several use round robin.
    pub hosts: Vec<String>,
    /// Maximum number of requests in flight at once.
    /// Set to None to leave concurrency unbounded.
    #[serde(default)]
    pub socket_limit: Option<usize>,
}

impl IndexManagerConfig {
    /// Create a config for the given hosts with no socket limit.
    pub fn new(hosts: Vec<String>) -> Self {
        Self {
            hosts,
            socket_limit: None,
        }
    }

    /// Cap the number of in-flight requests.
    pub fn with_socket_limit(mut self, socket_limit: usize) -> Self {
        self.socket_limit = Some(socket_limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize() {
        let config: IndexManagerConfig =
            serde_json::from_str(r#"{"hosts": ["http://localhost:9200"], "socketLimit": 80}"#)
                .unwrap();

        assert_eq!(
            config,
            IndexManagerConfig::new(vec!["http://localhost:9200".to_string()])
                .with_socket_limit(80)
        );
    }
}
