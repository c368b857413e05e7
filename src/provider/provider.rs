use std::sync::Arc;

use crate::{
    facts::{DeclRef, Selector, SourceLocation, VtableUse, WeakInfo},
    lookup::{Scope, UnqualifiedLookup},
    session::AnalysisContext,
};

/// # Fact Provider Interface
///
/// The `FactProvider` trait is the contract between the analysis engine and
/// an external source of semantic facts that the engine does not hold in
/// its primary program model, such as declarations loaded from a precompiled
/// index or injected by a debugging/REPL layer.
///
/// ## Lifecycle
///
/// Providers follow a defined lifecycle:
/// 1. Creation - the embedder constructs and registers the provider
/// 2. Binding - [`begin_session`](FactProvider::begin_session) hands the
///    provider the live [`AnalysisContext`]
/// 3. Consultation - the engine issues queries for the duration of the run
/// 4. Release - [`end_session`](FactProvider::end_session) marks the context
///    invalid; the provider must not touch it afterwards
///
/// ## Query contract
///
/// Accumulating queries (`read_*` taking a `&mut Vec`) pass a caller-owned
/// accumulator; the provider appends its own entries and never inspects,
/// reorders, or removes what is already there. A query may be issued several
/// times over the life of a session, each time with a fresh accumulator; a
/// provider must take care not to repeat entries it already reported within
/// one accumulator, but no deduplication happens across providers.
///
/// The lookup query is different: exactly one resolution may win, so a
/// provider returns `true` only when it filled the accumulator with its
/// answer, and callers stop consulting further providers at the first
/// success.
///
/// Every query has a no-op default so a provider implements only the
/// questions it can answer.
pub trait FactProvider: Send + Sync {
    /// Identifies the provider in logs and diagnostics.
    fn name(&self) -> &str;

    /// Binds the provider to the live analysis context.
    fn begin_session(&self, _context: &Arc<AnalysisContext>) {}

    /// Tells the provider the analysis context is no longer valid.
    fn end_session(&self) {}

    /// Load the contents of the global method pool for a selector.
    ///
    /// Results go directly into the bound [`AnalysisContext`], not to the
    /// caller; a provider that was never bound has nowhere to write and
    /// should do nothing.
    fn read_method_pool(&self, _selector: &Selector) {}

    /// Append the namespaces this provider knows, used for typo correction.
    fn read_known_namespaces(&self, _namespaces: &mut Vec<DeclRef>) {}

    /// Last-resort unqualified lookup for a name the engine cannot resolve.
    ///
    /// Returns `true` to tell the engine to recover using the accumulator's
    /// contents. A provider that cannot resolve the name must leave the
    /// accumulator untouched and return `false`.
    fn lookup_unqualified(&self, _lookup: &mut UnqualifiedLookup, _scope: &Scope) -> bool {
        false
    }

    /// Append variable declarations that are tentatively defined.
    fn read_tentative_definitions(&self, _defs: &mut Vec<DeclRef>) {}

    /// Append file-scope declarations that were never used.
    fn read_unused_file_scope_decls(&self, _decls: &mut Vec<DeclRef>) {}

    /// Append constructors that delegate to another constructor.
    fn read_delegating_constructors(&self, _ctors: &mut Vec<DeclRef>) {}

    /// Append extended-vector type aliases.
    fn read_ext_vector_decls(&self, _decls: &mut Vec<DeclRef>) {}

    /// Append classes that require dynamic dispatch metadata.
    fn read_dynamic_classes(&self, _classes: &mut Vec<DeclRef>) {}

    /// Append declarations with external linkage introduced in local scope.
    fn read_locally_scoped_external_decls(&self, _decls: &mut Vec<DeclRef>) {}

    /// Append selectors referenced so far, with the referencing location.
    fn read_referenced_selectors(&self, _selectors: &mut Vec<(Selector, SourceLocation)>) {}

    /// Append weak identifiers that were used before being declared.
    fn read_weak_undeclared_identifiers(&self, _identifiers: &mut Vec<(String, WeakInfo)>) {}

    /// Append virtual tables the analyzed program requires.
    fn read_used_vtables(&self, _vtables: &mut Vec<VtableUse>) {}

    /// Append template instantiations still waiting to be performed, with
    /// their point of instantiation.
    fn read_pending_instantiations(&self, _pending: &mut Vec<(DeclRef, SourceLocation)>) {}
}
