//! Engine-side analysis session and the shared context providers bind to.
//!
//! [`AnalysisContext`] is the slice of engine state that external providers
//! are allowed to populate directly, currently the global method pool.
//! [`AnalysisSession`] couples a provider facade to one analysis run: the
//! provider is bound when the session is created and told the context is no
//! longer valid when the session is dropped.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, RwLock},
};

use tracing::debug;

use crate::{
    facts::{DeclRef, MethodRecord, Selector, SourceLocation, VtableUse, WeakInfo},
    lookup::{Scope, UnqualifiedLookup},
    provider::provider::FactProvider,
};

/// Shared analysis state external providers may populate once bound.
#[derive(Default)]
pub struct AnalysisContext {
    method_pool: RwLock<HashMap<Selector, Vec<MethodRecord>>>,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append method records to the pool, grouped by their selector.
    pub fn record_methods<I>(&self, methods: I)
    where
        I: IntoIterator<Item = MethodRecord>,
    {
        let mut pool = self.method_pool.write().expect("method pool lock poisoned");
        for method in methods {
            pool.entry(method.selector.clone()).or_default().push(method);
        }
    }

    /// Pool contents for a selector, in the order they were recorded.
    pub fn methods_for(&self, selector: &Selector) -> Vec<MethodRecord> {
        self.method_pool
            .read()
            .expect("method pool lock poisoned")
            .get(selector)
            .cloned()
            .unwrap_or_default()
    }
}

/// One analysis run bound to a provider facade.
///
/// The session holds a single provider-shaped handle; whether that handle is
/// one concrete provider or a multiplexer over many is invisible here. The
/// provider must outlive the session, which the shared handle guarantees.
pub struct AnalysisSession {
    context: Arc<AnalysisContext>,
    provider: Arc<dyn FactProvider>,
    loaded_selectors: RwLock<HashSet<Selector>>,
}

impl AnalysisSession {
    /// Start a session: binds the provider to a fresh context.
    pub fn new(provider: Arc<dyn FactProvider>) -> Self {
        let context = Arc::new(AnalysisContext::new());
        debug!(provider = provider.name(), "starting analysis session");
        provider.begin_session(&context);
        Self {
            context,
            provider,
            loaded_selectors: RwLock::new(HashSet::new()),
        }
    }

    pub fn context(&self) -> &Arc<AnalysisContext> {
        &self.context
    }

    /// Ask providers to fill the global method pool for a selector.
    ///
    /// Each selector is loaded at most once per session; later calls for the
    /// same selector are answered from the already-populated pool.
    pub fn load_method_pool(&self, selector: &Selector) {
        {
            let mut loaded = self
                .loaded_selectors
                .write()
                .expect("loaded selector lock poisoned");
            if !loaded.insert(selector.clone()) {
                return;
            }
        }
        self.provider.read_method_pool(selector);
    }

    /// Recover a name the engine failed to resolve on its own.
    pub fn lookup_unqualified(&self, lookup: &mut UnqualifiedLookup, scope: &Scope) -> bool {
        self.provider.lookup_unqualified(lookup, scope)
    }

    pub fn known_namespaces(&self) -> Vec<DeclRef> {
        let mut out = Vec::new();
        self.provider.read_known_namespaces(&mut out);
        out
    }

    pub fn tentative_definitions(&self) -> Vec<DeclRef> {
        let mut out = Vec::new();
        self.provider.read_tentative_definitions(&mut out);
        out
    }

    pub fn unused_file_scope_decls(&self) -> Vec<DeclRef> {
        let mut out = Vec::new();
        self.provider.read_unused_file_scope_decls(&mut out);
        out
    }

    pub fn delegating_constructors(&self) -> Vec<DeclRef> {
        let mut out = Vec::new();
        self.provider.read_delegating_constructors(&mut out);
        out
    }

    pub fn ext_vector_decls(&self) -> Vec<DeclRef> {
        let mut out = Vec::new();
        self.provider.read_ext_vector_decls(&mut out);
        out
    }

    pub fn dynamic_classes(&self) -> Vec<DeclRef> {
        let mut out = Vec::new();
        self.provider.read_dynamic_classes(&mut out);
        out
    }

    pub fn locally_scoped_external_decls(&self) -> Vec<DeclRef> {
        let mut out = Vec::new();
        self.provider.read_locally_scoped_external_decls(&mut out);
        out
    }

    pub fn referenced_selectors(&self) -> Vec<(Selector, SourceLocation)> {
        let mut out = Vec::new();
        self.provider.read_referenced_selectors(&mut out);
        out
    }

    pub fn weak_undeclared_identifiers(&self) -> Vec<(String, WeakInfo)> {
        let mut out = Vec::new();
        self.provider.read_weak_undeclared_identifiers(&mut out);
        out
    }

    pub fn used_vtables(&self) -> Vec<VtableUse> {
        let mut out = Vec::new();
        self.provider.read_used_vtables(&mut out);
        out
    }

    pub fn pending_instantiations(&self) -> Vec<(DeclRef, SourceLocation)> {
        let mut out = Vec::new();
        self.provider.read_pending_instantiations(&mut out);
        out
    }
}

impl Drop for AnalysisSession {
    fn drop(&mut self) {
        debug!(provider = self.provider.name(), "ending analysis session");
        self.provider.end_session();
    }
}
