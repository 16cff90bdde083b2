//! The unified automaton representation produced by the linker and consumed
//! by the executor: a tagged union over every reachable state-space and a
//! tagged union over every reachable alphabet, with lookup helpers. Pure
//! data; construction happens in the analyzer.

use serde::{Deserialize, Serialize};

use crate::types::{Action, ResolvedRef, ScopeId, StateId};

/// Identifies an alphabet variant within a [`Linked`].
pub type AlphabetId = usize;

/// One alphabet variant: its ordered symbol names and the indices of its
/// empty and any symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    pub symbols: Vec<String>,
    pub empty: usize,
    pub any: usize,
}

/// A symbol value of the unified alphabet union. The discriminant is the
/// alphabet id; two symbols of different alphabets never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sym {
    pub alphabet: AlphabetId,
    pub index: usize,
}

/// A fully resolved transition rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub read: Sym,
    pub write: Sym,
    pub action: Action,
    /// Resolved target. Never followed when `action` is `Halt`.
    pub target: ResolvedRef,
}

/// A resolved state with its ordered rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    pub rules: Vec<Rule>,
}

/// One reachable scope: a concrete automaton or a template instantiation.
///
/// Instantiated scopes carry display names of the form
/// `Template(Scope::State, ...)` naming their resolved arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub name: String,
    pub alphabet: AlphabetId,
    pub start: StateId,
    /// This scope's empty symbol, as a unified symbol value.
    pub empty: Sym,
    /// This scope's any (wildcard) symbol, as a unified symbol value.
    pub any: Sym,
    pub states: Vec<State>,
}

/// The closed, immutable result of linking one entry automaton: every
/// reachable scope and alphabet in first-seen traversal order. Reusable
/// across any number of executions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Linked {
    /// Reachable scopes; the entry scope is always index 0.
    pub scopes: Vec<Scope>,
    /// Reachable alphabet variants in first-seen order.
    pub alphabets: Vec<Alphabet>,
    pub entry: ScopeId,
}

impl Linked {
    /// Returns the entry scope.
    pub fn entry_scope(&self) -> &Scope {
        &self.scopes[self.entry]
    }

    /// Returns a reference to the entry scope's start state.
    pub fn entry_start(&self) -> ResolvedRef {
        ResolvedRef {
            scope: self.entry,
            state: self.entry_scope().start,
        }
    }

    /// Finds a scope by display name.
    pub fn scope_named(&self, name: &str) -> Option<(ScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .find(|(_, scope)| scope.name == name)
    }

    /// Resolves `(scope display name, state name)` to a reference.
    pub fn state_ref(&self, scope: &str, state: &str) -> Option<ResolvedRef> {
        let (id, scope) = self.scope_named(scope)?;
        let state = scope.states.iter().position(|s| s.name == state)?;
        Some(ResolvedRef { scope: id, state })
    }

    /// Returns the rule list of the referenced state.
    pub fn rules(&self, at: ResolvedRef) -> &[Rule] {
        &self.scopes[at.scope].states[at.state].rules
    }

    /// Returns `(scope display name, state name)` for a reference.
    pub fn location(&self, at: ResolvedRef) -> (&str, &str) {
        let scope = &self.scopes[at.scope];
        (&scope.name, &scope.states[at.state].name)
    }

    /// Looks up a symbol by name within a scope's alphabet.
    pub fn symbol(&self, scope: ScopeId, name: &str) -> Option<Sym> {
        let alphabet = self.scopes[scope].alphabet;
        let index = self.alphabets[alphabet]
            .symbols
            .iter()
            .position(|s| s == name)?;
        Some(Sym { alphabet, index })
    }

    /// Looks up a symbol by name in the entry scope's alphabet.
    pub fn entry_symbol(&self, name: &str) -> Option<Sym> {
        self.symbol(self.entry, name)
    }

    /// Builds a tape from symbol names of the entry scope's alphabet.
    /// Returns `None` if any name is unknown.
    pub fn entry_tape(&self, names: &[&str]) -> Option<Vec<Sym>> {
        names.iter().map(|name| self.entry_symbol(name)).collect()
    }

    /// Returns the display name of a unified symbol value.
    pub fn symbol_name(&self, sym: Sym) -> &str {
        &self.alphabets[sym.alphabet].symbols[sym.index]
    }

    /// Renders a tape as its alphabet-specific symbol names.
    pub fn tape_names(&self, tape: &[Sym]) -> Vec<&str> {
        tape.iter().map(|&sym| self.symbol_name(sym)).collect()
    }
}
