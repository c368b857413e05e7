//! Lightweight, serializable handles for the semantic facts that external
//! knowledge providers report to the analysis engine.
//!
//! The engine keeps its own full program model; the types here are only the
//! currency exchanged across the provider boundary. They carry enough
//! identity (a stable id, a name, a kind) to let the engine re-associate a
//! reported fact with its own declarations, and nothing more.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Stable numeric handle for a declaration owned by an external provider.
///
/// Ids are assigned by whichever backing store produced the fact and are
/// only required to be stable within that store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct DeclId(pub u64);

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Broad classification of a referenced declaration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    Default,
)]
pub enum DeclKind {
    Var,
    Function,
    Constructor,
    Typedef,
    Class,
    Namespace,
    #[default]
    Unknown,
}

/// Reference to a declaration held by an external provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclRef {
    pub id: DeclId,
    pub name: String,
    pub kind: DeclKind,
}

impl DeclRef {
    pub fn new(id: u64, name: &str, kind: DeclKind) -> Self {
        Self {
            id: DeclId(id),
            name: name.to_string(),
            kind,
        }
    }
}

impl fmt::Display for DeclRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.kind, self.name, self.id)
    }
}

/// Key into the global method pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Selector(String);

impl Selector {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a fact in its originating source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: &str, line: u32, column: u32) -> Self {
        Self {
            file: file.to_string(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// What a provider knows about a weak, not-yet-declared identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WeakInfo {
    /// Alias the identifier redirects to, when the weak declaration named one.
    pub alias: Option<String>,
    pub location: SourceLocation,
    pub used: bool,
}

/// Record of a virtual table the analyzed program requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VtableUse {
    pub class: DeclRef,
    pub location: SourceLocation,
    /// Whether the use forces the full definition to be emitted.
    pub definition_required: bool,
}

/// One entry of the global method pool for a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRecord {
    pub selector: Selector,
    pub owner: DeclRef,
    pub is_instance: bool,
}
