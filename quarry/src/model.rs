//! Models: the index a builder targets and the connection it uses

use std::sync::Arc;

use crate::config::{default_connection_name, Config, ConnectionConfig};
use crate::error::Result;
use crate::search::SearchBuilder;
use crate::transport::{HttpTransport, Transport};

/// A searchable entity.
///
/// Implementors name an index; everything else has defaults. Override
/// [`Model::transport`] to route requests somewhere other than HTTP.
pub trait Model: Send + Sync {
    fn index(&self) -> &str;

    /// Explicit connection name, if any
    fn connection(&self) -> Option<&str> {
        None
    }

    /// Explicit connection, else `QUARRY_CONNECTION`, else `elasticsearch`
    fn connection_name(&self) -> String {
        match self.connection() {
            Some(name) => name.to_string(),
            None => default_connection_name(),
        }
    }

    fn config(&self) -> Result<ConnectionConfig> {
        Config::load()?.connection(&self.connection_name())
    }

    /// Transport used by [`SearchBuilder::get`].
    ///
    /// The default builds a new [`HttpTransport`] (and HTTP client) on every
    /// call. Override it to return a shared transport when connection reuse
    /// matters.
    fn transport(&self) -> Result<Arc<dyn Transport>> {
        let config = self.config()?;
        Ok(Arc::new(HttpTransport::new(&config)?))
    }

    /// Fresh builder bound to this model
    fn query(&self) -> SearchBuilder<'_>
    where
        Self: Sized,
    {
        SearchBuilder::new(self)
    }
}

/// Model for an index known only by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexModel {
    index: String,
    connection: Option<String>,
    config: Option<ConnectionConfig>,
}

impl IndexModel {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            connection: None,
            config: None,
        }
    }

    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    /// Use `config` directly instead of looking it up in the config file
    pub fn with_config(mut self, config: ConnectionConfig) -> Self {
        self.config = Some(config);
        self
    }
}

impl Model for IndexModel {
    fn index(&self) -> &str {
        &self.index
    }

    fn connection(&self) -> Option<&str> {
        self.connection.as_deref()
    }

    fn config(&self) -> Result<ConnectionConfig> {
        match &self.config {
            Some(config) => Ok(config.clone()),
            None => Config::load()?.connection(&self.connection_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_connection_wins() {
        let model = IndexModel::new("logs").with_connection("analytics");
        assert_eq!(model.connection_name(), "analytics");
        assert_eq!(model.index(), "logs");
    }

    #[test]
    fn test_inline_config_skips_file_lookup() {
        let config = ConnectionConfig {
            host: "search.local".to_string(),
            ..ConnectionConfig::default()
        };
        let model = IndexModel::new("logs").with_config(config.clone());
        assert_eq!(model.config().unwrap(), config);
    }

    #[test]
    fn test_query_binds_model() {
        let model = IndexModel::new("logs");
        let q = model.query();
        assert_eq!(q.model().index(), "logs");
        assert_eq!(q.request().index(), "logs");
    }
}
