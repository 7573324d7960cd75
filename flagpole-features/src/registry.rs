//! The feature registry facade.

use crate::config::RegistryConfig;
use crate::definition::FeatureDefinition;
use crate::error::{RegistryError, Result};
use crate::loader::DefinitionLoader;
use crate::store::{FlagStore, InMemoryFlagStore};
use crate::subscription::{FlagSubscription, SubscriptionHub};
use flagpole_conditions::{level, version};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to stored definitions while the registry was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    /// Caching was turned off in the configuration
    Disabled,
    /// Caching was on but no loader was supplied
    NoLoader,
    /// The loader returned this many definitions
    Loaded(usize),
    /// The loader failed; the registry started without its definitions
    Failed(String),
}

/// Feature flag registry.
///
/// Cheap to clone; clones share the same flags and subscriptions. Create
/// one at startup and pass it to whatever needs it.
///
/// Missing flags read as disabled, but as *supported* by level and version
/// checks: a flag nobody defined places no restriction.
///
/// # Examples
///
/// ```
/// use flagpole_features::{FeatureDefinition, FlagRegistry};
///
/// let registry = FlagRegistry::new();
/// registry.save(FeatureDefinition::new("new-ui", true).with_levels([">=29"]));
///
/// assert!(registry.is_enabled("new-ui"));
/// assert!(registry.is_supported_level("new-ui", 33));
/// assert!(!registry.is_supported_level("new-ui", 28));
///
/// assert!(!registry.is_enabled("ghost"));
/// assert!(registry.is_supported_level("ghost", 28));
/// ```
#[derive(Clone)]
pub struct FlagRegistry {
    store: Arc<dyn FlagStore>,
    hub: Arc<SubscriptionHub>,
    loader: Option<Arc<dyn DefinitionLoader>>,
    config: Arc<RegistryConfig>,
    cache_status: Arc<RwLock<CacheStatus>>,
    /// Keeps store writes and publishes in the same order for `update`
    update_lock: Arc<Mutex<()>>,
}

impl FlagRegistry {
    /// Create an empty in-memory registry with caching disabled.
    pub fn new() -> Self {
        Self::from_parts(
            RegistryConfig::default().with_cache_enabled(false),
            Arc::new(InMemoryFlagStore::new()),
            None,
        )
    }

    pub fn builder() -> FlagRegistryBuilder {
        FlagRegistryBuilder::new()
    }

    fn from_parts(
        config: RegistryConfig,
        store: Arc<dyn FlagStore>,
        loader: Option<Arc<dyn DefinitionLoader>>,
    ) -> Self {
        Self {
            store,
            hub: Arc::new(SubscriptionHub::new()),
            loader,
            config: Arc::new(config),
            cache_status: Arc::new(RwLock::new(CacheStatus::Disabled)),
            update_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Add a definition. Does not notify observers.
    pub fn save(&self, definition: FeatureDefinition) {
        debug!("Saving feature flag: {}", definition.name);
        self.store.insert(definition);
    }

    /// Add several definitions in order. Does not notify observers.
    pub fn save_many(&self, definitions: impl IntoIterator<Item = FeatureDefinition>) {
        let definitions: Vec<_> = definitions.into_iter().collect();
        debug!("Saving {} feature flags", definitions.len());
        self.store.insert_many(definitions);
    }

    /// Replace the first definition with the same name (or add it) and push
    /// its enabled state to observers.
    pub fn update(&self, definition: FeatureDefinition) {
        let _guard = self.update_lock.lock();

        let name = definition.name.clone();
        let enabled = definition.enabled;
        let outcome = self.store.upsert(definition);
        self.hub.publish(&name, enabled);

        debug!(
            flag = %name,
            enabled,
            outcome = ?outcome,
            "Updated feature flag"
        );
    }

    /// Remove every definition. Subscriptions keep their last value.
    pub fn clear_all(&self) {
        debug!("Clearing all feature flags");
        self.store.clear_all();
    }

    /// `false` when the flag is unknown.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.store.is_enabled(name)
    }

    /// Enabled state, or `default` when the flag is unknown.
    pub fn get(&self, name: &str, default: bool) -> bool {
        self.store
            .get(name)
            .map(|d| d.enabled)
            .unwrap_or(default)
    }

    /// Full definition of the first flag with this name.
    pub fn definition(&self, name: &str) -> Option<FeatureDefinition> {
        self.store.get(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.store.exists(name)
    }

    pub fn get_all(&self) -> Vec<FeatureDefinition> {
        self.store.list_all()
    }

    pub fn get_enabled(&self) -> Vec<FeatureDefinition> {
        self.store.list_enabled()
    }

    pub fn get_disabled(&self) -> Vec<FeatureDefinition> {
        self.store.list_disabled()
    }

    pub fn has_enabled(&self) -> bool {
        self.store.has_any_enabled()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Observe a flag's enabled state.
    ///
    /// Yields the current value immediately, then the value of every later
    /// [`update`](Self::update) of that name. An unknown flag starts at
    /// `false`.
    pub fn observe(&self, name: &str) -> FlagSubscription {
        let initial = self.store.is_enabled(name);
        self.hub.observe(name, initial)
    }

    /// Level rules of a flag; empty when the flag is unknown.
    pub fn get_supported_levels(&self, name: &str) -> Vec<String> {
        self.store
            .get(name)
            .map(|d| d.condition.supported_levels)
            .unwrap_or_default()
    }

    /// Whether `current_level` satisfies any of the flag's level rules.
    pub fn is_supported_level(&self, name: &str, current_level: u32) -> bool {
        level::evaluate_any(&self.get_supported_levels(name), current_level)
    }

    /// Version rules of a flag; empty when the flag is unknown.
    pub fn get_supported_versions(&self, name: &str) -> Vec<String> {
        self.store
            .get(name)
            .map(|d| d.condition.supported_versions)
            .unwrap_or_default()
    }

    /// Whether `current_version` satisfies any of the flag's version rules.
    pub fn is_supported_version(&self, name: &str, current_version: &str) -> bool {
        version::evaluate_any(&self.get_supported_versions(name), current_version)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn cache_status(&self) -> CacheStatus {
        self.cache_status.read().clone()
    }

    /// Load definitions again and apply each one as an [`update`](Self::update).
    ///
    /// Returns the number of definitions applied.
    pub async fn reload(&self) -> Result<usize> {
        let loader = self.loader.as_ref().ok_or(RegistryError::NoLoader)?;

        let definitions = match loader.load().await {
            Ok(definitions) => definitions,
            Err(e) => {
                warn!("Reloading feature flags failed: {}", e);
                *self.cache_status.write() = CacheStatus::Failed(e.to_string());
                return Err(e.into());
            }
        };

        let count = definitions.len();
        for definition in definitions {
            self.update(definition);
        }

        info!("Reloaded {} feature flags", count);
        *self.cache_status.write() = CacheStatus::Loaded(count);
        Ok(count)
    }

    async fn load_initial(&self) -> CacheStatus {
        if !self.config.cache_enabled {
            return CacheStatus::Disabled;
        }

        let Some(loader) = self.loader.as_ref() else {
            warn!("Flag caching is enabled but no definition loader was configured");
            return CacheStatus::NoLoader;
        };

        match loader.load().await {
            Ok(definitions) => {
                let count = definitions.len();
                let names: Vec<String> = definitions.iter().map(|d| d.name.clone()).collect();
                self.store.insert_many(definitions);
                self.seed_cells(names);
                info!("Loaded {} stored feature flags", count);
                CacheStatus::Loaded(count)
            }
            Err(e) => {
                warn!("Loading stored feature flags failed, starting empty: {}", e);
                CacheStatus::Failed(e.to_string())
            }
        }
    }

    /// Give every loaded name a cell holding its first-match value.
    fn seed_cells(&self, names: Vec<String>) {
        let mut seen = HashSet::new();
        for name in names {
            if seen.insert(name.clone()) {
                self.hub.publish(&name, self.store.is_enabled(&name));
            }
        }
    }
}

impl Default for FlagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FlagRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagRegistry")
            .field("flags", &self.store.len())
            .field("subscriptions", &self.hub.cell_count())
            .field("config", &self.config)
            .field("cache_status", &*self.cache_status.read())
            .finish()
    }
}

/// Builder for [`FlagRegistry`].
///
/// ```
/// use flagpole_features::{CacheStatus, FeatureDefinition, FlagRegistry, StaticLoader};
///
/// # tokio_test::block_on(async {
/// let registry = FlagRegistry::builder()
///     .cache_enabled(true)
///     .loader(StaticLoader::new(vec![FeatureDefinition::new("stored", true)]))
///     .build()
///     .await;
///
/// assert!(registry.is_enabled("stored"));
/// assert_eq!(registry.cache_status(), CacheStatus::Loaded(1));
/// # });
/// ```
pub struct FlagRegistryBuilder {
    config: RegistryConfig,
    store: Option<Arc<dyn FlagStore>>,
    loader: Option<Arc<dyn DefinitionLoader>>,
}

impl FlagRegistryBuilder {
    pub fn new() -> Self {
        Self {
            config: RegistryConfig::default(),
            store: None,
            loader: None,
        }
    }

    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.config.cache_enabled = enabled;
        self
    }

    /// Use a different storage backend. Defaults to [`InMemoryFlagStore`].
    pub fn store(mut self, store: Arc<dyn FlagStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn loader(mut self, loader: impl DefinitionLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Build the registry, loading stored definitions first when caching
    /// is enabled. Never fails; see [`FlagRegistry::cache_status`].
    pub async fn build(self) -> FlagRegistry {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryFlagStore::new()));
        let registry = FlagRegistry::from_parts(self.config, store, self.loader);

        let status = registry.load_initial().await;
        *registry.cache_status.write() = status;
        registry
    }
}

impl Default for FlagRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
