//! This module defines the core data structures used throughout the automaton
//! engine: build-time definitions (programs, automata, templates, rules),
//! state references with parameterized call expressions, and the error types
//! for the two failure phases (linking and execution).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The maximum template-instantiation depth the linker will follow before
/// declaring a progress-free cyclic instantiation.
pub const MAX_INSTANTIATION_DEPTH: usize = 64;

/// Identifies a linked automaton (scope) within a registry or a [`crate::Linked`].
pub type ScopeId = usize;
/// Identifies a state within its owning scope.
pub type StateId = usize;

/// The head action a rule performs after writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    None,
    /// Stop execution and return the tape.
    Halt,
}

/// An unresolved reference to a state, as written in automaton definitions.
///
/// The linker turns every `StateRef` into a concrete [`ResolvedRef`]. The
/// variants mirror the ways a transition target can be written: a plain name
/// in the current scope, an explicit cross-scope pair, a template formal
/// parameter, or a call expression instantiating a parameterized automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateRef {
    /// A state name resolved in the current automaton's scope.
    Name(String),
    /// An explicit `(automaton, state)` pair. Linking the referenced
    /// automaton is forced if it has not been linked yet.
    Scoped { automaton: String, state: String },
    /// A template formal parameter. Only meaningful inside a template body;
    /// instantiation substitutes the caller's resolved argument.
    Param(String),
    /// A call expression: instantiate `template` with the given arguments and
    /// resolve to the instantiation's start state. A zero-argument call
    /// naming a concrete automaton resolves to that automaton's start state.
    Call { template: String, args: Vec<StateRef> },
}

impl StateRef {
    pub fn name(name: impl Into<String>) -> Self {
        StateRef::Name(name.into())
    }

    pub fn scoped(automaton: impl Into<String>, state: impl Into<String>) -> Self {
        StateRef::Scoped {
            automaton: automaton.into(),
            state: state.into(),
        }
    }

    pub fn param(name: impl Into<String>) -> Self {
        StateRef::Param(name.into())
    }

    pub fn call(template: impl Into<String>, args: Vec<StateRef>) -> Self {
        StateRef::Call {
            template: template.into(),
            args,
        }
    }
}

/// A single transition rule: match a symbol, write a symbol, act, transfer.
///
/// `read` and `write` are symbol names of the owning automaton's alphabet.
/// Using the automaton's *any* symbol in `read` matches whatever is under the
/// head; using it in `write` leaves the cell unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDef {
    pub read: String,
    pub write: String,
    pub action: Action,
    /// The transition target. Present (and resolved by the linker) even for
    /// `Halt` rules, where it is never followed.
    pub target: StateRef,
}

impl RuleDef {
    pub fn new(
        read: impl Into<String>,
        write: impl Into<String>,
        action: Action,
        target: StateRef,
    ) -> Self {
        Self {
            read: read.into(),
            write: write.into(),
            action,
            target,
        }
    }
}

/// A named state and its ordered rule list. Rule order is semantically
/// significant: the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDef {
    pub name: String,
    pub rules: Vec<RuleDef>,
}

impl StateDef {
    pub fn new(name: impl Into<String>, rules: Vec<RuleDef>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }
}

/// A concrete automaton definition: one alphabet, one start state, one empty
/// symbol (used to initialize and extend the tape) and one any symbol (the
/// wildcard), plus an ordered list of states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonDef {
    pub name: String,
    /// Ordered symbol names of the alphabet.
    pub alphabet: Vec<String>,
    /// The symbol written to fresh tape cells. Must be in `alphabet`.
    pub empty: String,
    /// The wildcard symbol. Must be in `alphabet` and distinct from `empty`.
    pub any: String,
    /// Name of the start state.
    pub start: String,
    pub states: Vec<StateDef>,
}

impl AutomatonDef {
    pub fn new(
        name: impl Into<String>,
        alphabet: &[&str],
        empty: impl Into<String>,
        any: impl Into<String>,
        start: impl Into<String>,
        states: Vec<StateDef>,
    ) -> Self {
        Self {
            name: name.into(),
            alphabet: alphabet.iter().map(|s| s.to_string()).collect(),
            empty: empty.into(),
            any: any.into(),
            start: start.into(),
            states,
        }
    }
}

/// A parameterized automaton family. The body may reference the formal
/// parameters as [`StateRef::Param`] targets or call arguments; each distinct
/// resolved argument list produces one instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDef {
    pub name: String,
    /// Ordered formal parameter names.
    pub params: Vec<String>,
    pub alphabet: Vec<String>,
    pub empty: String,
    pub any: String,
    pub start: String,
    pub states: Vec<StateDef>,
}

impl TemplateDef {
    pub fn new(
        name: impl Into<String>,
        params: &[&str],
        alphabet: &[&str],
        empty: impl Into<String>,
        any: impl Into<String>,
        start: impl Into<String>,
        states: Vec<StateDef>,
    ) -> Self {
        Self {
            name: name.into(),
            params: params.iter().map(|s| s.to_string()).collect(),
            alphabet: alphabet.iter().map(|s| s.to_string()).collect(),
            empty: empty.into(),
            any: any.into(),
            start: start.into(),
            states,
        }
    }
}

/// A complete build-time program: concrete automata, templates, and the name
/// of the entry automaton. Immutable once defined; the linker consumes it to
/// produce a [`crate::Linked`] representation reusable across executions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub automata: Vec<AutomatonDef>,
    pub templates: Vec<TemplateDef>,
    /// Name of the concrete automaton execution starts in.
    pub entry: String,
}

impl Program {
    /// Looks up a concrete automaton definition by name.
    pub fn automaton(&self, name: &str) -> Option<&AutomatonDef> {
        self.automata.iter().find(|a| a.name == name)
    }

    /// Looks up a template definition by name.
    pub fn template(&self, name: &str) -> Option<&TemplateDef> {
        self.templates.iter().find(|t| t.name == name)
    }
}

/// A fully resolved state reference: `(owning scope, state)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedRef {
    pub scope: ScopeId,
    pub state: StateId,
}

/// Errors raised while linking a program, before any tape is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// A reference names a state absent from its scope.
    #[error("state '{state}' is not defined in scope '{scope}'")]
    UnresolvedState { scope: String, state: String },
    /// A state declares no rules; the machine could never leave it.
    #[error("state '{state}' in scope '{scope}' has no rule list")]
    MissingRuleList { scope: String, state: String },
    /// An automaton's configuration (alphabet, empty/any symbols, start) is
    /// incomplete or inconsistent.
    #[error("invalid configuration for '{scope}': {reason}")]
    InvalidConfig { scope: String, reason: String },
    /// A reference names an automaton the program does not define.
    #[error("unknown automaton '{0}'")]
    UnknownAutomaton(String),
    /// A call expression names a template the program does not define.
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),
    /// A call expression supplies the wrong number of arguments.
    #[error("call to '{template}' expects {expected} argument(s), got {got}")]
    CallArity {
        template: String,
        expected: usize,
        got: usize,
    },
    /// A parameter reference with no binding in the current instantiation.
    #[error("parameter '{param}' is not bound in scope '{scope}'")]
    UnboundParameter { scope: String, param: String },
    /// Two states in one scope share a name.
    #[error("duplicate state '{state}' in scope '{scope}'")]
    DuplicateState { scope: String, state: String },
    /// An automaton and a template share a name.
    #[error("name '{0}' is defined as both an automaton and a template")]
    DuplicateName(String),
    /// A rule uses a symbol absent from its scope's alphabet.
    #[error("symbol '{symbol}' is not in the alphabet of scope '{scope}'")]
    UnknownSymbol { scope: String, symbol: String },
    /// Two reachable scopes declare identical alphabets with conflicting
    /// empty/any designations.
    #[error("scopes '{left}' and '{right}' declare the same alphabet with conflicting empty/any symbols")]
    AmbiguousAlphabetMerge { left: String, right: String },
    /// Template instantiation recursed past [`MAX_INSTANTIATION_DEPTH`]
    /// without reaching an already-instantiated argument combination.
    #[error("instantiation of template '{template}' exceeded depth {depth}")]
    InstantiationOverflow { template: String, depth: usize },
}

/// Errors raised while executing a linked machine. Fatal to the run; the
/// machine's tape and position remain inspectable for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The symbol under the head matches no rule of the current state and the
    /// state has no wildcard rule.
    #[error("no rule in {scope}::{state} matches symbol '{symbol}'")]
    NoMatchingRule {
        scope: String,
        state: String,
        symbol: String,
    },
    /// A `Left` action was taken at tape position 0.
    #[error("head moved left of tape position 0 in {scope}::{state}")]
    LeftOfTapeBoundary { scope: String, state: String },
}
