//! In-memory fact provider for embedding layers.
//!
//! A REPL or incremental-compilation layer creates one of these, keeps its
//! own handle, and pushes facts into it as they come into existence; the
//! engine sees them on its next query. All tables are interior-mutable so
//! pushing never needs exclusive access to the provider handle.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    facts::{DeclRef, MethodRecord, Selector, SourceLocation, VtableUse, WeakInfo},
    lookup::{Scope, UnqualifiedLookup},
    provider::provider::FactProvider,
    session::AnalysisContext,
};

use super::index::FactIndex;

/// Provider over fact tables the embedder fills at runtime.
pub struct MemoryProvider {
    name: String,
    facts: RwLock<FactIndex>,
    context: RwLock<Option<Arc<AnalysisContext>>>,
}

impl MemoryProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            facts: RwLock::new(FactIndex::default()),
            context: RwLock::new(None),
        }
    }

    fn facts(&self) -> RwLockReadGuard<'_, FactIndex> {
        self.facts.read().expect("fact table lock poisoned")
    }

    fn facts_mut(&self) -> RwLockWriteGuard<'_, FactIndex> {
        self.facts.write().expect("fact table lock poisoned")
    }

    pub fn add_tentative_definition(&self, decl: DeclRef) {
        self.facts_mut().tentative_definitions.push(decl);
    }

    pub fn add_unused_file_scope_decl(&self, decl: DeclRef) {
        self.facts_mut().unused_file_scope_decls.push(decl);
    }

    pub fn add_delegating_constructor(&self, ctor: DeclRef) {
        self.facts_mut().delegating_constructors.push(ctor);
    }

    pub fn add_ext_vector_decl(&self, decl: DeclRef) {
        self.facts_mut().ext_vector_decls.push(decl);
    }

    pub fn add_dynamic_class(&self, class: DeclRef) {
        self.facts_mut().dynamic_classes.push(class);
    }

    pub fn add_locally_scoped_external_decl(&self, decl: DeclRef) {
        self.facts_mut().locally_scoped_external_decls.push(decl);
    }

    pub fn add_referenced_selector(&self, selector: Selector, location: SourceLocation) {
        self.facts_mut().referenced_selectors.push((selector, location));
    }

    pub fn add_weak_undeclared_identifier(&self, name: &str, info: WeakInfo) {
        self.facts_mut()
            .weak_undeclared_identifiers
            .push((name.to_string(), info));
    }

    pub fn add_used_vtable(&self, vtable: VtableUse) {
        self.facts_mut().used_vtables.push(vtable);
    }

    pub fn add_pending_instantiation(&self, decl: DeclRef, location: SourceLocation) {
        self.facts_mut().pending_instantiations.push((decl, location));
    }

    pub fn add_known_namespace(&self, namespace: DeclRef) {
        self.facts_mut().known_namespaces.push(namespace);
    }

    /// Register a method pool entry, keyed by its selector.
    pub fn add_method(&self, method: MethodRecord) {
        self.facts_mut()
            .methods
            .entry(method.selector.clone())
            .or_default()
            .push(method);
    }

    /// Make `decl` an answer for unqualified lookups of `name`.
    pub fn add_name(&self, name: &str, decl: DeclRef) {
        self.facts_mut()
            .names
            .entry(name.to_string())
            .or_default()
            .push(decl);
    }
}

impl FactProvider for MemoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn begin_session(&self, context: &Arc<AnalysisContext>) {
        *self.context.write().expect("context lock poisoned") = Some(context.clone());
    }

    fn end_session(&self) {
        *self.context.write().expect("context lock poisoned") = None;
    }

    fn read_method_pool(&self, selector: &Selector) {
        let context = self.context.read().expect("context lock poisoned");
        let Some(context) = context.as_ref() else {
            return;
        };
        if let Some(methods) = self.facts().methods.get(selector) {
            context.record_methods(methods.iter().cloned());
        }
    }

    fn read_known_namespaces(&self, namespaces: &mut Vec<DeclRef>) {
        namespaces.extend(self.facts().known_namespaces.iter().cloned());
    }

    fn lookup_unqualified(&self, lookup: &mut UnqualifiedLookup, _scope: &Scope) -> bool {
        match self.facts().names.get(lookup.name()) {
            Some(decls) if !decls.is_empty() => {
                for decl in decls {
                    lookup.add(decl.clone());
                }
                true
            }
            _ => false,
        }
    }

    fn read_tentative_definitions(&self, defs: &mut Vec<DeclRef>) {
        defs.extend(self.facts().tentative_definitions.iter().cloned());
    }

    fn read_unused_file_scope_decls(&self, decls: &mut Vec<DeclRef>) {
        decls.extend(self.facts().unused_file_scope_decls.iter().cloned());
    }

    fn read_delegating_constructors(&self, ctors: &mut Vec<DeclRef>) {
        ctors.extend(self.facts().delegating_constructors.iter().cloned());
    }

    fn read_ext_vector_decls(&self, decls: &mut Vec<DeclRef>) {
        decls.extend(self.facts().ext_vector_decls.iter().cloned());
    }

    fn read_dynamic_classes(&self, classes: &mut Vec<DeclRef>) {
        classes.extend(self.facts().dynamic_classes.iter().cloned());
    }

    fn read_locally_scoped_external_decls(&self, decls: &mut Vec<DeclRef>) {
        decls.extend(self.facts().locally_scoped_external_decls.iter().cloned());
    }

    fn read_referenced_selectors(&self, selectors: &mut Vec<(Selector, SourceLocation)>) {
        selectors.extend(self.facts().referenced_selectors.iter().cloned());
    }

    fn read_weak_undeclared_identifiers(&self, identifiers: &mut Vec<(String, WeakInfo)>) {
        identifiers.extend(self.facts().weak_undeclared_identifiers.iter().cloned());
    }

    fn read_used_vtables(&self, vtables: &mut Vec<VtableUse>) {
        vtables.extend(self.facts().used_vtables.iter().cloned());
    }

    fn read_pending_instantiations(&self, pending: &mut Vec<(DeclRef, SourceLocation)>) {
        pending.extend(self.facts().pending_instantiations.iter().cloned());
    }
}
