//! Shapes exchanged during last-resort unqualified lookup.
//!
//! When the engine fails to resolve a name on its own it hands providers a
//! mutable [`UnqualifiedLookup`] accumulator together with the lexical
//! [`Scope`] of the identifier occurrence. A provider that recognizes the
//! name fills the accumulator and reports success; providers that do not are
//! expected to leave it untouched.

use serde::{Deserialize, Serialize};

use crate::facts::DeclRef;

/// Kind of lexical scope an identifier occurrence appeared in.
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
pub enum ScopeKind {
    #[default]
    Global,
    Function,
    Block,
}

/// Handle describing the lexical scope of an identifier occurrence.
///
/// The engine owns the real scope chain; providers only see where in it the
/// unresolved name occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub kind: ScopeKind,
    pub depth: usize,
}

impl Scope {
    /// The outermost scope of a translation unit.
    pub fn global() -> Self {
        Self {
            kind: ScopeKind::Global,
            depth: 0,
        }
    }

    pub fn nested(kind: ScopeKind, depth: usize) -> Self {
        Self { kind, depth }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::global()
    }
}

/// Mutable accumulator for a name the engine could not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnqualifiedLookup {
    name: String,
    results: Vec<DeclRef>,
}

impl UnqualifiedLookup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            results: Vec::new(),
        }
    }

    /// The identifier being recovered.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record one candidate resolution.
    pub fn add(&mut self, decl: DeclRef) {
        self.results.push(decl);
    }

    pub fn is_resolved(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn results(&self) -> &[DeclRef] {
        &self.results
    }

    pub fn into_results(self) -> Vec<DeclRef> {
        self.results
    }
}
