//! File-backed fact provider.
//!
//! An earlier compilation (or an external indexer) serializes the facts it
//! wants to make available as a [`FactIndex`]; the provider loads that file
//! once at open time and serves every query from the in-memory tables. Load
//! problems surface as [`IndexError`] at open time so the query surface
//! stays infallible.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    facts::{DeclRef, MethodRecord, Selector, SourceLocation, VtableUse, WeakInfo},
    lookup::{Scope, UnqualifiedLookup},
    provider::provider::FactProvider,
    session::AnalysisContext,
};

/// Format version this build reads and writes.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// Error type for index loading and saving.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("failed to read index file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed index file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported index format version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
}

pub type IndexResult<T> = Result<T, IndexError>;

/// Descriptive header of an index file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub producer: String,
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
}

impl Default for IndexMetadata {
    fn default() -> Self {
        Self {
            producer: "unknown".to_string(),
            format_version: INDEX_FORMAT_VERSION,
            created_at: Utc::now(),
        }
    }
}

/// Serialized fact tables, one per query category.
///
/// `methods` keys the global method pool by selector; `names` backs
/// unqualified-lookup recovery. Absent tables deserialize as empty so
/// producers only write what they know.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FactIndex {
    pub metadata: IndexMetadata,
    pub tentative_definitions: Vec<DeclRef>,
    pub unused_file_scope_decls: Vec<DeclRef>,
    pub delegating_constructors: Vec<DeclRef>,
    pub ext_vector_decls: Vec<DeclRef>,
    pub dynamic_classes: Vec<DeclRef>,
    pub locally_scoped_external_decls: Vec<DeclRef>,
    pub referenced_selectors: Vec<(Selector, SourceLocation)>,
    pub weak_undeclared_identifiers: Vec<(String, WeakInfo)>,
    pub used_vtables: Vec<VtableUse>,
    pub pending_instantiations: Vec<(DeclRef, SourceLocation)>,
    pub known_namespaces: Vec<DeclRef>,
    pub methods: HashMap<Selector, Vec<MethodRecord>>,
    pub names: HashMap<String, Vec<DeclRef>>,
}

impl FactIndex {
    /// Load and version-check an index file.
    pub fn load(path: impl AsRef<Path>) -> IndexResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let index: FactIndex =
            serde_json::from_str(&raw).map_err(|source| IndexError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        if index.metadata.format_version != INDEX_FORMAT_VERSION {
            return Err(IndexError::UnsupportedVersion {
                found: index.metadata.format_version,
                expected: INDEX_FORMAT_VERSION,
            });
        }
        Ok(index)
    }

    /// Write the index for a later compilation to pick up.
    pub fn save(&self, path: impl AsRef<Path>) -> IndexResult<()> {
        let path = path.as_ref();
        let raw = serde_json::to_string_pretty(self).map_err(|source| IndexError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, raw).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Provider serving facts from a loaded [`FactIndex`].
pub struct IndexProvider {
    name: String,
    index: FactIndex,
    context: RwLock<Option<Arc<AnalysisContext>>>,
}

impl IndexProvider {
    /// Open an index file and build a provider over it.
    pub fn open(name: &str, path: impl AsRef<Path>) -> IndexResult<Self> {
        let index = FactIndex::load(&path)?;
        debug!(
            provider = name,
            path = %path.as_ref().display(),
            producer = %index.metadata.producer,
            "loaded fact index"
        );
        Ok(Self::from_index(name, index))
    }

    /// Build a provider over an already-deserialized index.
    pub fn from_index(name: &str, index: FactIndex) -> Self {
        Self {
            name: name.to_string(),
            index,
            context: RwLock::new(None),
        }
    }
}

impl FactProvider for IndexProvider {
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
        if let Some(methods) = self.index.methods.get(selector) {
            context.record_methods(methods.iter().cloned());
        }
    }

    fn read_known_namespaces(&self, namespaces: &mut Vec<DeclRef>) {
        namespaces.extend(self.index.known_namespaces.iter().cloned());
    }

    fn lookup_unqualified(&self, lookup: &mut UnqualifiedLookup, _scope: &Scope) -> bool {
        match self.index.names.get(lookup.name()) {
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
        defs.extend(self.index.tentative_definitions.iter().cloned());
    }

    fn read_unused_file_scope_decls(&self, decls: &mut Vec<DeclRef>) {
        decls.extend(self.index.unused_file_scope_decls.iter().cloned());
    }

    fn read_delegating_constructors(&self, ctors: &mut Vec<DeclRef>) {
        ctors.extend(self.index.delegating_constructors.iter().cloned());
    }

    fn read_ext_vector_decls(&self, decls: &mut Vec<DeclRef>) {
        decls.extend(self.index.ext_vector_decls.iter().cloned());
    }

    fn read_dynamic_classes(&self, classes: &mut Vec<DeclRef>) {
        classes.extend(self.index.dynamic_classes.iter().cloned());
    }

    fn read_locally_scoped_external_decls(&self, decls: &mut Vec<DeclRef>) {
        decls.extend(self.index.locally_scoped_external_decls.iter().cloned());
    }

    fn read_referenced_selectors(&self, selectors: &mut Vec<(Selector, SourceLocation)>) {
        selectors.extend(self.index.referenced_selectors.iter().cloned());
    }

    fn read_weak_undeclared_identifiers(&self, identifiers: &mut Vec<(String, WeakInfo)>) {
        identifiers.extend(self.index.weak_undeclared_identifiers.iter().cloned());
    }

    fn read_used_vtables(&self, vtables: &mut Vec<VtableUse>) {
        vtables.extend(self.index.used_vtables.iter().cloned());
    }

    fn read_pending_instantiations(&self, pending: &mut Vec<(DeclRef, SourceLocation)>) {
        pending.extend(self.index.pending_instantiations.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::facts::DeclKind;

    use super::*;

    fn sample_index() -> FactIndex {
        let mut index = FactIndex {
            metadata: IndexMetadata {
                producer: "indexer-test".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        index
            .tentative_definitions
            .push(DeclRef::new(1, "buffer", DeclKind::Var));
        index
            .known_namespaces
            .push(DeclRef::new(2, "std", DeclKind::Namespace));
        index.names.insert(
            "buffer".to_string(),
            vec![DeclRef::new(1, "buffer", DeclKind::Var)],
        );
        index.methods.insert(
            Selector::new("count"),
            vec![MethodRecord {
                selector: Selector::new("count"),
                owner: DeclRef::new(3, "NSArray", DeclKind::Class),
                is_instance: true,
            }],
        );
        index
    }

    #[test]
    fn test_open_serves_saved_facts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.json");
        sample_index().save(&path).unwrap();

        let provider = IndexProvider::open("pch", &path).unwrap();
        assert_eq!(provider.name(), "pch");

        let mut defs = Vec::new();
        provider.read_tentative_definitions(&mut defs);
        assert_eq!(defs, vec![DeclRef::new(1, "buffer", DeclKind::Var)]);

        let mut namespaces = Vec::new();
        provider.read_known_namespaces(&mut namespaces);
        assert_eq!(namespaces.len(), 1);
    }

    #[test]
    fn test_lookup_hits_name_table_only() {
        let provider = IndexProvider::from_index("pch", sample_index());

        let mut lookup = UnqualifiedLookup::new("buffer");
        assert!(provider.lookup_unqualified(&mut lookup, &Scope::global()));
        assert_eq!(lookup.results().len(), 1);

        let mut miss = UnqualifiedLookup::new("no_such_name");
        assert!(!provider.lookup_unqualified(&mut miss, &Scope::global()));
        assert!(!miss.is_resolved());
    }

    #[test]
    fn test_method_pool_needs_bound_context() {
        let provider = IndexProvider::from_index("pch", sample_index());
        let selector = Selector::new("count");

        // Unbound: nowhere to write, nothing happens.
        provider.read_method_pool(&selector);

        let context = Arc::new(AnalysisContext::new());
        provider.begin_session(&context);
        provider.read_method_pool(&selector);
        assert_eq!(context.methods_for(&selector).len(), 1);

        provider.end_session();
        provider.read_method_pool(&selector);
        assert_eq!(context.methods_for(&selector).len(), 1);
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FactIndex::load(&path).unwrap_err();
        assert!(matches!(err, IndexError::Malformed { .. }));

        let missing = FactIndex::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, IndexError::Io { .. }));
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.json");
        let mut index = sample_index();
        index.metadata.format_version = INDEX_FORMAT_VERSION + 1;
        // save() does not version-check; only load() does.
        index.save(&path).unwrap();

        let err = FactIndex::load(&path).unwrap_err();
        assert!(matches!(
            err,
            IndexError::UnsupportedVersion { found, expected }
                if found == INDEX_FORMAT_VERSION + 1 && expected == INDEX_FORMAT_VERSION
        ));
    }
}
