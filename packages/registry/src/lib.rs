//! # Folio Registry
//!
//! Plugin descriptors and the two lookups the pipeline performs against them:
//! resolving a cell's plugin by id, and narrowing the registry to the plugins a
//! parent cell permits beneath it.

pub mod plugin;
pub mod registry;
pub mod scope;

pub use plugin::{
    BottomToolbarHints, CellPlugin, CellStyleFn, ChildPlugins, ChildPluginsFn, ControlsFn,
    DataMigrateFn, PluginControls, PluginMigration, PluginProps, ProviderFn, RendererFn,
};
pub use registry::PluginRegistry;
pub use scope::scope_children;
