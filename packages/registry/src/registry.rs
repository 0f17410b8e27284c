use crate::plugin::CellPlugin;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Ordered, read-only collection of plugin descriptors
///
/// Cloning is cheap; scoped registries share descriptors with their parent.
/// Duplicate ids are reported once, when the registry is built, and the first
/// descriptor with a given id wins.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    plugins: Vec<Arc<CellPlugin>>,
    index: HashMap<String, usize>,
    aliases: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl PluginRegistry {
    pub fn new(plugins: impl IntoIterator<Item = CellPlugin>) -> Self {
        Self::from_shared(plugins.into_iter().map(Arc::new))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from descriptors that are already shared
    pub fn from_shared(plugins: impl IntoIterator<Item = Arc<CellPlugin>>) -> Self {
        let mut inner = RegistryInner::default();

        for plugin in plugins {
            if inner.index.contains_key(&plugin.id) {
                if !inner.duplicates.contains(&plugin.id) {
                    warn!(plugin_id = %plugin.id, "Duplicate plugin id in registry - first registration wins");
                    inner.duplicates.push(plugin.id.clone());
                }
                continue;
            }

            let position = inner.plugins.len();
            inner.index.insert(plugin.id.clone(), position);
            for alias in &plugin.aliases {
                inner.aliases.entry(alias.clone()).or_insert(position);
            }
            inner.plugins.push(plugin);
        }

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Look up a descriptor by its id
    pub fn resolve(&self, plugin_id: &str) -> Option<&Arc<CellPlugin>> {
        self.inner
            .index
            .get(plugin_id)
            .map(|&position| &self.inner.plugins[position])
    }

    /// Look up a descriptor by its id or one of its deprecated aliases
    pub fn resolve_alias(&self, plugin_id: &str) -> Option<&Arc<CellPlugin>> {
        self.resolve(plugin_id).or_else(|| {
            self.inner
                .aliases
                .get(plugin_id)
                .map(|&position| &self.inner.plugins[position])
        })
    }

    pub fn contains(&self, plugin_id: &str) -> bool {
        self.inner.index.contains_key(plugin_id)
    }

    /// Descriptors in registration order
    pub fn plugins(&self) -> &[Arc<CellPlugin>] {
        &self.inner.plugins
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.inner.plugins.iter().map(|plugin| plugin.id.as_str())
    }

    /// Ids that were registered more than once
    pub fn duplicates(&self) -> &[String] {
        &self.inner.duplicates
    }

    pub fn len(&self) -> usize {
        self.inner.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.plugins.is_empty()
    }

    /// New registry holding the descriptors accepted by `predicate`, in order
    pub fn filter<P>(&self, mut predicate: P) -> PluginRegistry
    where
        P: FnMut(&CellPlugin) -> bool,
    {
        Self::from_shared(
            self.inner
                .plugins
                .iter()
                .filter(|plugin| predicate(plugin))
                .cloned(),
        )
    }

    /// Whether both registries share the same storage
    pub fn ptr_eq(&self, other: &PluginRegistry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.ids().collect::<Vec<_>>())
            .field("duplicates", &self.inner.duplicates)
            .finish()
    }
}

impl FromIterator<CellPlugin> for PluginRegistry {
    fn from_iter<I: IntoIterator<Item = CellPlugin>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_id() {
        let registry = PluginRegistry::new(vec![CellPlugin::new("text"), CellPlugin::new("image")]);

        assert_eq!(registry.resolve("image").map(|p| p.id.as_str()), Some("image"));
        assert!(registry.resolve("video").is_none());
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["text", "image"]);
    }

    #[test]
    fn test_duplicates_reported_once_first_wins() {
        let registry = PluginRegistry::new(vec![
            CellPlugin::new("text").with_title("first"),
            CellPlugin::new("text").with_title("second"),
            CellPlugin::new("text").with_title("third"),
        ]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.duplicates(), &["text".to_string()]);
        assert_eq!(
            registry.resolve("text").and_then(|p| p.title.as_deref()),
            Some("first")
        );
    }

    #[test]
    fn test_alias_lookup() {
        let registry = PluginRegistry::new(vec![
            CellPlugin::new("text").with_alias("ory/editor/core/content/slate"),
            CellPlugin::new("ory/editor/core/content/slate"),
        ]);

        // A real id always beats an alias
        assert_eq!(
            registry
                .resolve_alias("ory/editor/core/content/slate")
                .map(|p| p.id.as_str()),
            Some("ory/editor/core/content/slate")
        );

        let only_alias = PluginRegistry::new(vec![CellPlugin::new("text").with_alias("legacy-text")]);
        assert_eq!(
            only_alias.resolve_alias("legacy-text").map(|p| p.id.as_str()),
            Some("text")
        );
        assert!(only_alias.resolve("legacy-text").is_none());
    }

    #[test]
    fn test_filter_keeps_order_and_shares_descriptors() {
        let registry = PluginRegistry::new(vec![
            CellPlugin::new("a"),
            CellPlugin::new("b"),
            CellPlugin::new("c"),
        ]);
        let subset = registry.filter(|plugin| plugin.id != "b");

        assert_eq!(subset.ids().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(Arc::ptr_eq(
            subset.resolve("a").unwrap(),
            registry.resolve("a").unwrap()
        ));
        assert_eq!(registry.len(), 3);
    }
}
