//! Plugin registry: name-to-factory resolution for the constructible
//! capability set.
//!
//! There is no ambient reflection in Rust, so "dynamic instantiation" is an
//! explicit table: a [`PluginModule`] registers factory functions for the
//! types it exports, keyed by fully-qualified name, and the daemon resolves
//! a settings string to an instance by looking the name up under the
//! requested [`Capability`].
//!
//! Resolution failure is a diagnostic, not an error: an unknown name, a
//! name registered under a different capability, or a module that exports
//! nothing all degrade to "feature absent" (`None`) with a logged warning.
//!
//! Module import is idempotent **by identity** (the module's resolved path),
//! not by content: importing the same path twice is a successful no-op.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{OutputMode, ReportFilter};

/// The fixed set of constructible plugin capabilities.
///
/// `AbsoluteMode`/`RelativeMode`/`BindingHandler` are *queried* on a
/// constructed [`OutputMode`] instance rather than resolved by name, so they
/// do not appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    OutputMode,
    Filter,
}

/// Factory for a named output-mode implementation.
pub type OutputModeFactory = fn() -> Box<dyn OutputMode>;
/// Factory for a named filter implementation.
pub type FilterFactory = fn() -> Box<dyn ReportFilter>;

/// A loadable plugin module: a set of exported factories plus a stable
/// identity used for idempotent import.
///
/// The built-in plugin crate implements this for its standard set; an
/// external module source yields one implementation per loadable location.
pub trait PluginModule {
    /// The module's resolved identity.  Two imports with equal identity are
    /// the same module regardless of content.
    fn identity(&self) -> &Path;

    /// Registers every exported type with `registry`.
    fn register(&self, registry: &mut PluginRegistry);
}

/// Outcome of a module import.  Both variants are success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The module was new and its exports are now registered.
    Imported,
    /// The module identity was already loaded; nothing changed.
    AlreadyLoaded,
}

/// The registry of every constructible plugin type currently known to the
/// daemon.
#[derive(Default)]
pub struct PluginRegistry {
    output_modes: HashMap<String, OutputModeFactory>,
    filters: HashMap<String, FilterFactory>,
    loaded: HashSet<PathBuf>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports a plugin module, registering its exported factories.
    ///
    /// Idempotent by module identity: re-importing an already-loaded path is
    /// a no-op reported as [`ImportOutcome::AlreadyLoaded`].
    pub fn import(&mut self, module: &dyn PluginModule) -> ImportOutcome {
        let identity = module.identity().to_path_buf();
        if self.loaded.contains(&identity) {
            debug!(module = %identity.display(), "plugin module already loaded");
            return ImportOutcome::AlreadyLoaded;
        }
        module.register(self);
        self.loaded.insert(identity.clone());
        info!(module = %identity.display(), "plugin module imported");
        ImportOutcome::Imported
    }

    /// Registers an output-mode factory under `name`.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register_output_mode(&mut self, name: impl Into<String>, factory: OutputModeFactory) {
        self.output_modes.insert(name.into(), factory);
    }

    /// Registers a filter factory under `name`.
    pub fn register_filter(&mut self, name: impl Into<String>, factory: FilterFactory) {
        self.filters.insert(name.into(), factory);
    }

    /// Constructs the named output mode, or `None` (logged) when the name is
    /// not registered under the [`Capability::OutputMode`] capability.
    pub fn resolve_output_mode(&self, name: &str) -> Option<Box<dyn OutputMode>> {
        match self.output_modes.get(name) {
            Some(factory) => Some(factory()),
            None => {
                warn!(plugin = name, "no output mode registered under this name");
                None
            }
        }
    }

    /// Constructs the named filter, or `None` (logged) when the name is not
    /// registered under the [`Capability::Filter`] capability.
    pub fn resolve_filter(&self, name: &str) -> Option<Box<dyn ReportFilter>> {
        match self.filters.get(name) {
            Some(factory) => Some(factory()),
            None => {
                warn!(plugin = name, "no filter registered under this name");
                None
            }
        }
    }

    /// Enumerates the names of every registered implementation of
    /// `capability`, sorted for stable listing.
    ///
    /// The list is a snapshot: finite, restartable, and unaffected by later
    /// registrations.
    pub fn list_implementations(&self, capability: Capability) -> Vec<String> {
        let mut names: Vec<String> = match capability {
            Capability::OutputMode => self.output_modes.keys().cloned().collect(),
            Capability::Filter => self.filters.keys().cloned().collect(),
        };
        names.sort();
        names
    }

    /// Returns `true` when a module with `identity` has been imported.
    pub fn is_loaded(&self, identity: &Path) -> bool {
        self.loaded.contains(identity)
    }

    /// The number of distinct module identities imported so far.
    pub fn loaded_module_count(&self) -> usize {
        self.loaded.len()
    }
}

/// A resolved plugin handle: a fully-qualified name paired with the
/// capability it was requested for.
///
/// Construction checks the capability tag, so a reference created for
/// [`Capability::Filter`] can never yield an output mode even when the same
/// name exists under both capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginReference {
    name: String,
    capability: Capability,
}

impl PluginReference {
    pub fn new(name: impl Into<String>, capability: Capability) -> Self {
        Self {
            name: name.into(),
            capability,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Constructs the referenced output mode, or `None` when the reference
    /// was made for a different capability or the name does not resolve.
    pub fn construct_output_mode(&self, registry: &PluginRegistry) -> Option<Box<dyn OutputMode>> {
        if self.capability != Capability::OutputMode {
            warn!(
                plugin = self.name.as_str(),
                "plugin reference does not carry the OutputMode capability"
            );
            return None;
        }
        registry.resolve_output_mode(&self.name)
    }

    /// Constructs the referenced filter, or `None` on capability mismatch or
    /// unresolvable name.
    pub fn construct_filter(&self, registry: &PluginRegistry) -> Option<Box<dyn ReportFilter>> {
        if self.capability != Capability::Filter {
            warn!(
                plugin = self.name.as_str(),
                "plugin reference does not carry the Filter capability"
            );
            return None;
        }
        registry.resolve_filter(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::descriptor::TabletDescriptor;
    use crate::domain::report::Report;
    use crate::plugin::{FilterChain, OutputContext};

    // ── Test plugin types ─────────────────────────────────────────────────────

    struct NullMode {
        filters: FilterChain,
    }

    impl NullMode {
        fn boxed() -> Box<dyn OutputMode> {
            Box::new(NullMode {
                filters: FilterChain::new(),
            })
        }
    }

    impl OutputMode for NullMode {
        fn set_descriptor(&mut self, _descriptor: &TabletDescriptor) {}
        fn filters_mut(&mut self) -> &mut FilterChain {
            &mut self.filters
        }
        fn handle_report(&mut self, _report: Report, _ctx: &mut OutputContext<'_>) {}
    }

    struct PassFilter;

    impl ReportFilter for PassFilter {
        fn filter(&mut self, report: Report) -> Option<Report> {
            Some(report)
        }
    }

    fn pass_filter() -> Box<dyn ReportFilter> {
        Box::new(PassFilter)
    }

    struct TestModule;

    impl PluginModule for TestModule {
        fn identity(&self) -> &Path {
            Path::new("test/plugins/standard")
        }
        fn register(&self, registry: &mut PluginRegistry) {
            registry.register_output_mode("NullMode", NullMode::boxed);
            registry.register_filter("Pass", pass_filter);
        }
    }

    // ── Import ────────────────────────────────────────────────────────────────

    #[test]
    fn test_import_registers_exports() {
        let mut registry = PluginRegistry::new();

        let outcome = registry.import(&TestModule);

        assert_eq!(outcome, ImportOutcome::Imported);
        assert!(registry.resolve_output_mode("NullMode").is_some());
        assert!(registry.resolve_filter("Pass").is_some());
    }

    #[test]
    fn test_reimport_is_idempotent_by_identity() {
        let mut registry = PluginRegistry::new();

        registry.import(&TestModule);
        let outcome = registry.import(&TestModule);

        assert_eq!(outcome, ImportOutcome::AlreadyLoaded);
        assert_eq!(registry.loaded_module_count(), 1);
    }

    // ── Resolution ────────────────────────────────────────────────────────────

    #[test]
    fn test_unknown_name_resolves_to_none() {
        let mut registry = PluginRegistry::new();
        registry.import(&TestModule);

        assert!(registry.resolve_output_mode("Nonexistent").is_none());
        assert!(registry.resolve_filter("Nonexistent").is_none());
    }

    #[test]
    fn test_capability_mismatch_resolves_to_none() {
        let mut registry = PluginRegistry::new();
        registry.import(&TestModule);

        // "Pass" is a filter, not an output mode (and vice versa).
        assert!(registry.resolve_output_mode("Pass").is_none());
        assert!(registry.resolve_filter("NullMode").is_none());
    }

    #[test]
    fn test_plugin_reference_enforces_its_capability_tag() {
        let mut registry = PluginRegistry::new();
        registry.import(&TestModule);

        let as_filter = PluginReference::new("NullMode", Capability::Filter);
        assert!(as_filter.construct_output_mode(&registry).is_none());
        assert!(as_filter.construct_filter(&registry).is_none());

        let as_mode = PluginReference::new("NullMode", Capability::OutputMode);
        assert!(as_mode.construct_output_mode(&registry).is_some());
    }

    // ── Listing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_list_implementations_is_sorted_and_per_capability() {
        let mut registry = PluginRegistry::new();
        registry.register_output_mode("Zeta", NullMode::boxed);
        registry.register_output_mode("Alpha", NullMode::boxed);
        registry.register_filter("Pass", pass_filter);

        assert_eq!(
            registry.list_implementations(Capability::OutputMode),
            vec!["Alpha".to_string(), "Zeta".to_string()]
        );
        assert_eq!(
            registry.list_implementations(Capability::Filter),
            vec!["Pass".to_string()]
        );
    }

    #[test]
    fn test_list_implementations_empty_registry() {
        let registry = PluginRegistry::new();
        assert!(registry.list_implementations(Capability::OutputMode).is_empty());
    }
}
