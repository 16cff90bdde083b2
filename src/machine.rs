//! This module defines the `Machine` struct, the tape-walking interpreter for
//! a linked automaton. It holds the tape, head position, and current state,
//! and runs the read/write/move/transition loop until a `Halt` action.
//!
//! The interpreter dispatches over whatever scope owns the current state, so
//! a single loop executes cross-scope compositions produced by the linker.

use tracing::debug;

use crate::types::{Action, ExecError, ResolvedRef};
use crate::unified::{Linked, Sym};

/// The outcome of a single interpreter step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A rule was applied and execution continues.
    Continue,
    /// A `Halt` rule was applied (its write included); the tape is final.
    Halted,
}

/// The interpreter for one execution of a linked automaton.
///
/// A `Machine` borrows an immutable [`Linked`] representation and owns the
/// mutable run state: tape, head, current state, and step count. Execution is
/// unbounded by design; callers wanting a step limit drive [`Machine::step`]
/// themselves. After a run-time error the tape, head, and location remain
/// inspectable for diagnosis.
pub struct Machine<'a> {
    linked: &'a Linked,
    tape: Vec<Sym>,
    head: usize,
    current: ResolvedRef,
    step_count: usize,
    halted: bool,
}

impl<'a> Machine<'a> {
    /// Creates a machine positioned at the entry automaton's start state with
    /// a single-cell tape holding the entry automaton's empty symbol.
    pub fn new(linked: &'a Linked) -> Self {
        let mut machine = Self {
            linked,
            tape: Vec::new(),
            head: 0,
            current: linked.entry_start(),
            step_count: 0,
            halted: false,
        };
        machine.reset();
        machine
    }

    /// Resets to the initial configuration: start state, head at 0, and a
    /// single-cell tape holding the entry automaton's empty symbol.
    pub fn reset(&mut self) {
        self.current = self.linked.entry_start();
        self.tape.clear();
        self.tape.push(self.linked.entry_scope().empty);
        self.head = 0;
        self.step_count = 0;
        self.halted = false;
    }

    /// Executes a single step: select the first matching rule of the current
    /// state, apply its write, apply its action, and transfer to its target.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if a rule was applied and the machine moved on.
    /// * `Ok(Step::Halted)` if the applied rule's action was `Halt` (or the
    ///   machine had already halted).
    /// * `Err(ExecError)` if no rule matches or the head would leave the tape.
    pub fn step(&mut self) -> Result<Step, ExecError> {
        if self.halted {
            return Ok(Step::Halted);
        }

        let scope = &self.linked.scopes[self.current.scope];
        let state = &scope.states[self.current.state];
        let cell = self.tape[self.head];

        // First match wins; the scope's any symbol matches whatever is under
        // the head.
        let rule = state
            .rules
            .iter()
            .find(|rule| rule.read == cell || rule.read == scope.any)
            .ok_or_else(|| ExecError::NoMatchingRule {
                scope: scope.name.clone(),
                state: state.name.clone(),
                symbol: self.linked.symbol_name(cell).to_string(),
            })?;

        // Writing the any symbol leaves the cell unchanged.
        if rule.write != scope.any {
            self.tape[self.head] = rule.write;
        }

        match rule.action {
            Action::Left => {
                if self.head == 0 {
                    return Err(ExecError::LeftOfTapeBoundary {
                        scope: scope.name.clone(),
                        state: state.name.clone(),
                    });
                }
                self.head -= 1;
            }
            Action::Right => {
                self.head += 1;
                if self.head == self.tape.len() {
                    // The tape grows to the right with the entry automaton's
                    // empty symbol; it never shrinks.
                    self.tape.push(self.linked.entry_scope().empty);
                }
            }
            Action::None => {}
            Action::Halt => {
                self.halted = true;
                self.step_count += 1;
                debug!(steps = self.step_count, "machine halted");
                return Ok(Step::Halted);
            }
        }

        self.current = rule.target;
        self.step_count += 1;

        Ok(Step::Continue)
    }

    /// Runs a fresh execution to completion and returns the final tape.
    ///
    /// `input` replaces the default single-empty-cell tape; `None` or an
    /// empty vector keeps the default. The loop only ends on a `Halt` action
    /// or a run-time error; a definition that never halts runs forever.
    pub fn execute(&mut self, input: Option<Vec<Sym>>) -> Result<&[Sym], ExecError> {
        self.execute_with(input, |_, _| {})?;
        Ok(&self.tape)
    }

    /// Like [`Machine::execute`], but invokes `observer(scope, state)` for
    /// every visited state, the initial state included, before its rule is
    /// applied. This is the per-transition trace surface; it has no effect on
    /// control flow.
    pub fn execute_with(
        &mut self,
        input: Option<Vec<Sym>>,
        mut observer: impl FnMut(&str, &str),
    ) -> Result<&[Sym], ExecError> {
        self.reset();
        if let Some(tape) = input {
            if !tape.is_empty() {
                self.tape = tape;
            }
        }

        loop {
            let (scope, state) = self.linked.location(self.current);
            observer(scope, state);

            if self.step()? == Step::Halted {
                return Ok(&self.tape);
            }
        }
    }

    /// Returns the current tape contents.
    pub fn tape(&self) -> &[Sym] {
        &self.tape
    }

    /// Renders the current tape as symbol display names.
    pub fn tape_names(&self) -> Vec<&str> {
        self.linked.tape_names(&self.tape)
    }

    /// Returns the current head position.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns `(scope display name, state name)` of the current state.
    pub fn location(&self) -> (&str, &str) {
        self.linked.location(self.current)
    }

    /// Returns the number of rules applied so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Whether the machine has applied a `Halt` rule.
    pub fn is_halted(&self) -> bool {
        self.halted
    }
}
