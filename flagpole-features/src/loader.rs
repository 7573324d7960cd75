//! Startup sources for feature definitions.

use crate::definition::FeatureDefinition;
use crate::error::LoaderError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Source of previously stored feature definitions.
///
/// The registry calls [`load`](DefinitionLoader::load) once while it is
/// built (when caching is enabled) and again on every
/// [`reload`](crate::FlagRegistry::reload). A failed load is reported but
/// never stops the registry from starting.
#[async_trait]
pub trait DefinitionLoader: Send + Sync {
    /// Load every stored definition, in order.
    async fn load(&self) -> Result<Vec<FeatureDefinition>, LoaderError>;
}

/// Loader that hands out a fixed list.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    definitions: Vec<FeatureDefinition>,
}

impl StaticLoader {
    pub fn new(definitions: Vec<FeatureDefinition>) -> Self {
        Self { definitions }
    }
}

#[async_trait]
impl DefinitionLoader for StaticLoader {
    async fn load(&self) -> Result<Vec<FeatureDefinition>, LoaderError> {
        Ok(self.definitions.clone())
    }
}

/// Loader reading a JSON array of definitions from a file.
///
/// ```json
/// [
///   { "name": "new-ui", "enabled": true,
///     "condition": { "supported_levels": [">=29"], "supported_versions": [">=2.0.0"] } },
///   { "name": "legacy-sync", "enabled": false }
/// ]
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode definitions from JSON text.
    pub fn parse(content: &str) -> Result<Vec<FeatureDefinition>, LoaderError> {
        Ok(serde_json::from_str(content)?)
    }
}

#[async_trait]
impl DefinitionLoader for JsonFileLoader {
    async fn load(&self) -> Result<Vec<FeatureDefinition>, LoaderError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Self::parse(&content)
    }
}
