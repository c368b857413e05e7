//! Fan-out dispatcher presenting many fact providers as one.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use tracing::debug;

use crate::{
    facts::{DeclRef, Selector, SourceLocation, VtableUse, WeakInfo},
    lookup::{Scope, UnqualifiedLookup},
    session::AnalysisContext,
};

use super::provider::FactProvider;

/// Dispatches every [`FactProvider`] query to an ordered list of providers.
///
/// The engine is built to talk to a single provider handle; the multiplexer
/// removes that limitation by implementing the whole capability surface
/// itself and forwarding each call to every registered provider in
/// registration order. Accumulating queries concatenate contributions in
/// that order; the unqualified-lookup query stops at the first provider that
/// answers; lifecycle and method-pool notifications are broadcast to all.
///
/// The list holds shared handles: the multiplexer never initializes or tears
/// down a provider and the embedding system must keep providers alive for as
/// long as the engine queries through the facade. Registration order is the
/// only ordering guarantee: providers are never removed or reordered, and
/// no deduplication is performed, so a provider registered twice is
/// consulted twice and overlapping answers from different providers stay
/// duplicated in the output.
pub struct ProviderMultiplexer {
    sources: RwLock<Vec<Arc<dyn FactProvider>>>,
}

impl ProviderMultiplexer {
    /// Create a multiplexer over two providers, consulted in that order.
    pub fn new(first: Arc<dyn FactProvider>, second: Arc<dyn FactProvider>) -> Self {
        Self {
            sources: RwLock::new(vec![first, second]),
        }
    }

    /// Append one more provider to the end of the consultation order.
    ///
    /// May be called after the engine has started querying, but never
    /// concurrently with an in-flight query.
    #[tracing::instrument(level = "debug", skip(self, source), fields(source = source.name()))]
    pub fn add_source(&self, source: Arc<dyn FactProvider>) {
        self.sources
            .write()
            .expect("provider list lock poisoned")
            .push(source);
    }

    pub fn len(&self) -> usize {
        self.sources().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sources(&self) -> RwLockReadGuard<'_, Vec<Arc<dyn FactProvider>>> {
        self.sources.read().expect("provider list lock poisoned")
    }
}

impl FactProvider for ProviderMultiplexer {
    fn name(&self) -> &str {
        "multiplex"
    }

    fn begin_session(&self, context: &Arc<AnalysisContext>) {
        let sources = self.sources();
        debug!(providers = sources.len(), "binding providers to analysis context");
        for source in sources.iter() {
            source.begin_session(context);
        }
    }

    fn end_session(&self) {
        for source in self.sources().iter() {
            source.end_session();
        }
    }

    fn read_method_pool(&self, selector: &Selector) {
        for source in self.sources().iter() {
            source.read_method_pool(selector);
        }
    }

    fn read_known_namespaces(&self, namespaces: &mut Vec<DeclRef>) {
        for source in self.sources().iter() {
            source.read_known_namespaces(namespaces);
        }
    }

    // First provider that answers wins; the rest are not consulted.
    fn lookup_unqualified(&self, lookup: &mut UnqualifiedLookup, scope: &Scope) -> bool {
        for source in self.sources().iter() {
            if source.lookup_unqualified(lookup, scope) {
                debug!(
                    source = source.name(),
                    name = lookup.name(),
                    "unqualified lookup recovered"
                );
                return true;
            }
        }
        false
    }

    fn read_tentative_definitions(&self, defs: &mut Vec<DeclRef>) {
        for source in self.sources().iter() {
            source.read_tentative_definitions(defs);
        }
    }

    fn read_unused_file_scope_decls(&self, decls: &mut Vec<DeclRef>) {
        for source in self.sources().iter() {
            source.read_unused_file_scope_decls(decls);
        }
    }

    fn read_delegating_constructors(&self, ctors: &mut Vec<DeclRef>) {
        for source in self.sources().iter() {
            source.read_delegating_constructors(ctors);
        }
    }

    fn read_ext_vector_decls(&self, decls: &mut Vec<DeclRef>) {
        for source in self.sources().iter() {
            source.read_ext_vector_decls(decls);
        }
    }

    fn read_dynamic_classes(&self, classes: &mut Vec<DeclRef>) {
        for source in self.sources().iter() {
            source.read_dynamic_classes(classes);
        }
    }

    fn read_locally_scoped_external_decls(&self, decls: &mut Vec<DeclRef>) {
        for source in self.sources().iter() {
            source.read_locally_scoped_external_decls(decls);
        }
    }

    fn read_referenced_selectors(&self, selectors: &mut Vec<(Selector, SourceLocation)>) {
        for source in self.sources().iter() {
            source.read_referenced_selectors(selectors);
        }
    }

    fn read_weak_undeclared_identifiers(&self, identifiers: &mut Vec<(String, WeakInfo)>) {
        for source in self.sources().iter() {
            source.read_weak_undeclared_identifiers(identifiers);
        }
    }

    fn read_used_vtables(&self, vtables: &mut Vec<VtableUse>) {
        for source in self.sources().iter() {
            source.read_used_vtables(vtables);
        }
    }

    fn read_pending_instantiations(&self, pending: &mut Vec<(DeclRef, SourceLocation)>) {
        for source in self.sources().iter() {
            source.read_pending_instantiations(pending);
        }
    }
}
