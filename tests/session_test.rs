//! End-to-end tests: an analysis session querying mixed providers through
//! the multiplexer facade.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use pretty_assertions::assert_eq;

use kasane::{
    facts::{DeclKind, DeclRef, MethodRecord, Selector, SourceLocation, WeakInfo},
    lookup::{Scope, ScopeKind, UnqualifiedLookup},
    provider::{
        providers::{FactIndex, IndexProvider, MemoryProvider},
        FactProvider, ProviderMultiplexer,
    },
    session::{AnalysisContext, AnalysisSession},
};

struct LifecycleProbe {
    begin_calls: AtomicUsize,
    end_calls: AtomicUsize,
}

impl LifecycleProbe {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            begin_calls: AtomicUsize::new(0),
            end_calls: AtomicUsize::new(0),
        })
    }
}

impl FactProvider for LifecycleProbe {
    fn name(&self) -> &str {
        "probe"
    }

    fn begin_session(&self, _context: &Arc<AnalysisContext>) {
        self.begin_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn end_session(&self) {
        self.end_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Index provider prepared from an index file on disk, the way a prior
/// compilation would hand facts to this one.
fn index_provider_from_disk() -> IndexProvider {
    let mut index = FactIndex::default();
    index
        .tentative_definitions
        .push(DeclRef::new(10, "shared_buffer", DeclKind::Var));
    index
        .known_namespaces
        .push(DeclRef::new(11, "core", DeclKind::Namespace));
    index.names.insert(
        "shared_buffer".to_string(),
        vec![DeclRef::new(10, "shared_buffer", DeclKind::Var)],
    );
    index.methods.insert(
        Selector::new("count"),
        vec![MethodRecord {
            selector: Selector::new("count"),
            owner: DeclRef::new(12, "Collection", DeclKind::Class),
            is_instance: true,
        }],
    );
    index
        .pending_instantiations
        .push((
            DeclRef::new(13, "Vec<Row>", DeclKind::Class),
            SourceLocation::new("table.cc", 88, 1),
        ));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prior.json");
    index.save(&path).unwrap();
    IndexProvider::open("prior-run", &path).unwrap()
}

fn repl_provider() -> MemoryProvider {
    let provider = MemoryProvider::new("repl");
    provider.add_tentative_definition(DeclRef::new(20, "repl_counter", DeclKind::Var));
    provider.add_known_namespace(DeclRef::new(21, "repl", DeclKind::Namespace));
    provider.add_method(MethodRecord {
        selector: Selector::new("count"),
        owner: DeclRef::new(22, "ReplArray", DeclKind::Class),
        is_instance: true,
    });
    provider.add_weak_undeclared_identifier(
        "legacy_hook",
        WeakInfo {
            alias: Some("hook_impl".to_string()),
            location: SourceLocation::new("repl_input", 3, 9),
            used: true,
        },
    );
    provider.add_referenced_selector(
        Selector::new("description"),
        SourceLocation::new("repl_input", 4, 1),
    );
    provider
}

#[test]
fn test_session_drop_releases_every_provider_once() {
    let probe = LifecycleProbe::new();
    let multiplex = ProviderMultiplexer::new(probe.clone(), Arc::new(repl_provider()));

    let session = AnalysisSession::new(Arc::new(multiplex));
    assert_eq!(probe.begin_calls.load(Ordering::SeqCst), 1);
    assert_eq!(probe.end_calls.load(Ordering::SeqCst), 0);

    drop(session);
    assert_eq!(probe.begin_calls.load(Ordering::SeqCst), 1);
    assert_eq!(probe.end_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_session_cannot_tell_one_provider_from_many() {
    // Directly over a single provider: the facade shape is the same.
    let session = AnalysisSession::new(Arc::new(repl_provider()));
    let names: Vec<_> = session
        .tentative_definitions()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, ["repl_counter"]);
}

#[test]
fn test_facts_from_all_providers_arrive_in_registration_order() {
    let multiplex = ProviderMultiplexer::new(
        Arc::new(index_provider_from_disk()),
        Arc::new(repl_provider()),
    );
    let session = AnalysisSession::new(Arc::new(multiplex));

    let names: Vec<_> = session
        .tentative_definitions()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, ["shared_buffer", "repl_counter"]);

    let namespaces: Vec<_> = session
        .known_namespaces()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(namespaces, ["core", "repl"]);

    // Categories only one provider knows about still come through.
    let pending = session.pending_instantiations();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].0.name, "Vec<Row>");

    let weak = session.weak_undeclared_identifiers();
    assert_eq!(weak.len(), 1);
    assert_eq!(weak[0].0, "legacy_hook");
    assert_eq!(weak[0].1.alias.as_deref(), Some("hook_impl"));

    let selectors = session.referenced_selectors();
    assert_eq!(selectors.len(), 1);
    assert_eq!(selectors[0].0.as_str(), "description");
}

#[test]
fn test_method_pool_loads_once_per_selector() {
    let multiplex = ProviderMultiplexer::new(
        Arc::new(index_provider_from_disk()),
        Arc::new(repl_provider()),
    );
    let session = AnalysisSession::new(Arc::new(multiplex));
    let selector = Selector::new("count");

    session.load_method_pool(&selector);
    let owners: Vec<_> = session
        .context()
        .methods_for(&selector)
        .into_iter()
        .map(|m| m.owner.name)
        .collect();
    assert_eq!(owners, ["Collection", "ReplArray"]);

    // A second engine request for the same selector is served from the
    // already-populated pool instead of re-consulting providers.
    session.load_method_pool(&selector);
    assert_eq!(session.context().methods_for(&selector).len(), 2);
}

#[test]
fn test_unqualified_lookup_recovers_from_index() {
    let multiplex = ProviderMultiplexer::new(
        Arc::new(repl_provider()),
        Arc::new(index_provider_from_disk()),
    );
    let session = AnalysisSession::new(Arc::new(multiplex));

    let scope = Scope::nested(ScopeKind::Function, 1);
    let mut lookup = UnqualifiedLookup::new("shared_buffer");
    assert!(session.lookup_unqualified(&mut lookup, &scope));
    assert_eq!(lookup.results().len(), 1);
    assert_eq!(lookup.results()[0].id.0, 10);

    let mut miss = UnqualifiedLookup::new("never_declared");
    assert!(!session.lookup_unqualified(&mut miss, &scope));
    assert!(!miss.is_resolved());
}
