use crate::plugin::ChildPlugins;
use crate::registry::PluginRegistry;
use serde_json::Value;
use tracing::trace;

/// Registry permitted beneath a plugin-owned cell
///
/// Applies the parent descriptor's child-plugin rule to `registry`. Without a
/// rule, or when the parent id does not resolve, the registry passes through
/// unchanged. The rule sees the parent's current data, so the result must be
/// recomputed per cell.
pub fn scope_children(
    registry: &PluginRegistry,
    parent_plugin_id: &str,
    parent_data: &Value,
) -> PluginRegistry {
    let Some(parent) = registry.resolve(parent_plugin_id) else {
        return registry.clone();
    };
    let Some(rule) = &parent.child_plugins else {
        return registry.clone();
    };

    match rule(parent_data) {
        ChildPlugins::All => registry.clone(),
        restriction => {
            let scoped = registry.filter(|plugin| restriction.allows(&plugin.id));
            trace!(
                parent = parent_plugin_id,
                before = registry.len(),
                after = scoped.len(),
                "Scoped child plugins"
            );
            scoped
        }
    }
}
