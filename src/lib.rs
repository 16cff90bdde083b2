//! This crate provides a composable Turing Machine engine.
//! It includes modules for defining automata and parameterized templates,
//! linking them into a single executable representation, analyzing state
//! reachability, simulating tape execution, and a collection of built-in
//! demonstration programs.

mod analyzer;

pub mod linker;
pub mod machine;
pub mod programs;
pub mod types;
pub mod unified;

/// Re-exports the `link` entry point from the linker module.
pub use linker::link;
/// Re-exports the `Machine` interpreter and its `Step` outcome from the machine module.
pub use machine::{Machine, Step};
/// Re-exports the built-in program constructors and registry from the programs module.
pub use programs::{flip_least_significant, unary_to_binary, ProgramLibrary, PROGRAMS};
/// Re-exports the definition and error types from the types module.
pub use types::{
    Action, AutomatonDef, ExecError, LinkError, Program, ResolvedRef, RuleDef, StateDef, StateRef,
    TemplateDef, MAX_INSTANTIATION_DEPTH,
};
/// Re-exports the linked representation from the unified module.
pub use unified::{Alphabet, Linked, Rule, Scope, State, Sym};
