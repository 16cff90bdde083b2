//! This module implements the reference resolver ("linker"): it turns the
//! named, cross-referencing state definitions of a [`Program`], including
//! parameterized call expressions, into a closed registry of concrete scopes
//! with every transition target resolved to a `(scope, state)` pair.
//!
//! Resolution is recursive and memoized on `(template, resolved arguments)`:
//! repeated calls with identical arguments share one instantiation. A scope
//! is registered before its rule bodies are resolved, so mutually recursive
//! automata and self-recursive instantiations terminate through the memo
//! rather than looping.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::debug;

use crate::analyzer::analyze;
use crate::types::{
    Action, LinkError, Program, ResolvedRef, ScopeId, StateDef, StateId, StateRef,
    MAX_INSTANTIATION_DEPTH,
};
use crate::unified::Linked;

/// A scope's alphabet as registered at link time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegAlphabet {
    pub symbols: Vec<String>,
    pub empty: usize,
    pub any: usize,
}

/// A resolved rule over alphabet-local symbol indices.
#[derive(Debug, Clone)]
pub(crate) struct RegRule {
    pub read: usize,
    pub write: usize,
    pub action: Action,
    pub target: ResolvedRef,
}

#[derive(Debug, Clone)]
pub(crate) struct RegState {
    pub name: String,
    pub rules: Vec<RegRule>,
}

/// One linked scope in the registry: a concrete automaton or one template
/// instantiation.
#[derive(Debug, Clone)]
pub(crate) struct RegScope {
    pub name: String,
    pub alphabet: RegAlphabet,
    pub start: StateId,
    pub states: Vec<RegState>,
}

/// The linker's output: every scope instantiated while resolving the entry
/// automaton, in registration order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Registry {
    pub scopes: Vec<RegScope>,
}

/// Links `program` starting from its entry automaton and builds the unified
/// representation over everything reachable from it.
///
/// This is the one-shot build-time pipeline of the crate: resolution, then
/// reachability analysis. The returned [`Linked`] is immutable and may back
/// any number of executions.
pub fn link(program: &Program) -> Result<Linked, LinkError> {
    let mut seen = HashSet::new();
    for name in program
        .automata
        .iter()
        .map(|a| &a.name)
        .chain(program.templates.iter().map(|t| &t.name))
    {
        if !seen.insert(name) {
            return Err(LinkError::DuplicateName(name.clone()));
        }
    }

    let mut linker = Linker::new(program);
    let entry = linker.link_automaton(&program.entry, 0)?;

    debug!(
        program = %program.name,
        scopes = linker.registry.scopes.len(),
        "resolved entry automaton"
    );

    analyze(linker.registry, entry.scope)
}

type InstanceKey = (String, Vec<ResolvedRef>);

struct Linker<'a> {
    program: &'a Program,
    registry: Registry,
    /// Concrete automata already linked, keyed by name.
    concrete: HashMap<String, ScopeId>,
    /// Template instantiations, keyed by `(template, resolved arguments)`.
    /// Insertion-ordered so registration order is deterministic.
    instances: IndexMap<InstanceKey, ScopeId>,
}

impl<'a> Linker<'a> {
    fn new(program: &'a Program) -> Self {
        Self {
            program,
            registry: Registry::default(),
            concrete: HashMap::new(),
            instances: IndexMap::new(),
        }
    }

    /// Links a concrete automaton (at most once) and returns its start state.
    fn link_automaton(&mut self, name: &str, depth: usize) -> Result<ResolvedRef, LinkError> {
        if let Some(&scope) = self.concrete.get(name) {
            return Ok(self.start_of(scope));
        }

        let program = self.program;
        let def = program
            .automaton(name)
            .ok_or_else(|| LinkError::UnknownAutomaton(name.to_string()))?;

        let scope = self.begin_scope(
            def.name.clone(),
            &def.alphabet,
            &def.empty,
            &def.any,
            &def.start,
            &def.states,
        )?;
        // Registered before the body resolves, so cross-references back into
        // this automaton (including self-references) find it.
        self.concrete.insert(name.to_string(), scope);
        self.finish_scope(scope, &def.states, &HashMap::new(), depth)?;

        Ok(self.start_of(scope))
    }

    /// Instantiates a template with resolved arguments, memoized on the
    /// `(template, arguments)` combination, and returns its start state.
    fn instantiate(
        &mut self,
        template: &str,
        args: Vec<ResolvedRef>,
        depth: usize,
    ) -> Result<ResolvedRef, LinkError> {
        if depth > MAX_INSTANTIATION_DEPTH {
            return Err(LinkError::InstantiationOverflow {
                template: template.to_string(),
                depth: MAX_INSTANTIATION_DEPTH,
            });
        }

        let key = (template.to_string(), args.clone());
        if let Some(&scope) = self.instances.get(&key) {
            return Ok(self.start_of(scope));
        }

        let program = self.program;
        let tpl = match program.template(template) {
            Some(tpl) => tpl,
            None => return Err(LinkError::UnknownTemplate(template.to_string())),
        };

        let display_name = self.instance_name(&tpl.name, &args);
        let scope = self.begin_scope(
            display_name.clone(),
            &tpl.alphabet,
            &tpl.empty,
            &tpl.any,
            &tpl.start,
            &tpl.states,
        )?;
        self.instances.insert(key, scope);
        debug!(scope = %display_name, "registered template instantiation");

        let bindings: HashMap<String, ResolvedRef> = tpl
            .params
            .iter()
            .cloned()
            .zip(args.iter().copied())
            .collect();
        self.finish_scope(scope, &tpl.states, &bindings, depth)?;

        Ok(self.start_of(scope))
    }

    /// Resolves one reference in the context of `scope`, instantiating
    /// templates and linking automata as needed.
    fn resolve(
        &mut self,
        reference: &StateRef,
        scope: ScopeId,
        bindings: &HashMap<String, ResolvedRef>,
        depth: usize,
    ) -> Result<ResolvedRef, LinkError> {
        match reference {
            StateRef::Name(name) => {
                let state = self.state_index(scope, name).ok_or_else(|| {
                    LinkError::UnresolvedState {
                        scope: self.registry.scopes[scope].name.clone(),
                        state: name.clone(),
                    }
                })?;
                Ok(ResolvedRef { scope, state })
            }
            StateRef::Param(param) => {
                bindings
                    .get(param)
                    .copied()
                    .ok_or_else(|| LinkError::UnboundParameter {
                        scope: self.registry.scopes[scope].name.clone(),
                        param: param.clone(),
                    })
            }
            StateRef::Scoped { automaton, state } => {
                let target = self.link_automaton(automaton, depth)?;
                let state_id = self.state_index(target.scope, state).ok_or_else(|| {
                    LinkError::UnresolvedState {
                        scope: automaton.clone(),
                        state: state.clone(),
                    }
                })?;
                Ok(ResolvedRef {
                    scope: target.scope,
                    state: state_id,
                })
            }
            StateRef::Call { template, args } => {
                let program = self.program;
                let Some(tpl) = program.template(template) else {
                    // A zero-argument call naming a concrete automaton enters
                    // that automaton's start state.
                    if program.automaton(template).is_some() {
                        if !args.is_empty() {
                            return Err(LinkError::CallArity {
                                template: template.clone(),
                                expected: 0,
                                got: args.len(),
                            });
                        }
                        return self.link_automaton(template, depth);
                    }
                    return Err(LinkError::UnknownTemplate(template.clone()));
                };

                if args.len() != tpl.params.len() {
                    return Err(LinkError::CallArity {
                        template: template.clone(),
                        expected: tpl.params.len(),
                        got: args.len(),
                    });
                }

                // Arguments resolve in the caller's scope before the template
                // is instantiated; nested calls recurse here.
                let mut resolved = Vec::with_capacity(args.len());
                for arg in args {
                    resolved.push(self.resolve(arg, scope, bindings, depth)?);
                }

                self.instantiate(template, resolved, depth + 1)
            }
        }
    }

    /// Validates a scope's configuration and registers it with empty rule
    /// lists. Rule resolution happens in [`Self::finish_scope`].
    fn begin_scope(
        &mut self,
        name: String,
        alphabet: &[String],
        empty: &str,
        any: &str,
        start: &str,
        states: &[StateDef],
    ) -> Result<ScopeId, LinkError> {
        let invalid = |reason: String| LinkError::InvalidConfig {
            scope: name.clone(),
            reason,
        };

        if alphabet.is_empty() {
            return Err(invalid("alphabet is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for symbol in alphabet {
            if !seen.insert(symbol) {
                return Err(invalid(format!("duplicate symbol '{}'", symbol)));
            }
        }
        let empty_index = alphabet
            .iter()
            .position(|s| s == empty)
            .ok_or_else(|| invalid(format!("empty symbol '{}' is not in the alphabet", empty)))?;
        let any_index = alphabet
            .iter()
            .position(|s| s == any)
            .ok_or_else(|| invalid(format!("any symbol '{}' is not in the alphabet", any)))?;
        if empty_index == any_index {
            return Err(invalid(format!(
                "empty and any symbols are both '{}'",
                empty
            )));
        }

        let mut names = HashSet::new();
        for state in states {
            if !names.insert(&state.name) {
                return Err(LinkError::DuplicateState {
                    scope: name,
                    state: state.name.clone(),
                });
            }
        }
        let start_index = states
            .iter()
            .position(|s| s.name == start)
            .ok_or_else(|| LinkError::UnresolvedState {
                scope: name.clone(),
                state: start.to_string(),
            })?;

        let scope = RegScope {
            name,
            alphabet: RegAlphabet {
                symbols: alphabet.to_vec(),
                empty: empty_index,
                any: any_index,
            },
            start: start_index,
            states: states
                .iter()
                .map(|s| RegState {
                    name: s.name.clone(),
                    rules: Vec::new(),
                })
                .collect(),
        };
        self.registry.scopes.push(scope);
        Ok(self.registry.scopes.len() - 1)
    }

    /// Resolves every rule of a registered scope. Targets are resolved even
    /// for `Halt` rules; the executor checks the action only after rule
    /// selection, so a halt rule's target must still be well formed.
    fn finish_scope(
        &mut self,
        scope: ScopeId,
        states: &[StateDef],
        bindings: &HashMap<String, ResolvedRef>,
        depth: usize,
    ) -> Result<(), LinkError> {
        for (index, state) in states.iter().enumerate() {
            if state.rules.is_empty() {
                return Err(LinkError::MissingRuleList {
                    scope: self.registry.scopes[scope].name.clone(),
                    state: state.name.clone(),
                });
            }

            let mut rules = Vec::with_capacity(state.rules.len());
            for rule in &state.rules {
                let read = self.symbol_index(scope, &rule.read)?;
                let write = self.symbol_index(scope, &rule.write)?;
                let target = self.resolve(&rule.target, scope, bindings, depth)?;
                rules.push(RegRule {
                    read,
                    write,
                    action: rule.action,
                    target,
                });
            }
            self.registry.scopes[scope].states[index].rules = rules;
        }

        Ok(())
    }

    fn symbol_index(&self, scope: ScopeId, symbol: &str) -> Result<usize, LinkError> {
        let record = &self.registry.scopes[scope];
        record
            .alphabet
            .symbols
            .iter()
            .position(|s| s == symbol)
            .ok_or_else(|| LinkError::UnknownSymbol {
                scope: record.name.clone(),
                symbol: symbol.to_string(),
            })
    }

    fn state_index(&self, scope: ScopeId, state: &str) -> Option<StateId> {
        self.registry.scopes[scope]
            .states
            .iter()
            .position(|s| s.name == state)
    }

    fn start_of(&self, scope: ScopeId) -> ResolvedRef {
        ResolvedRef {
            scope,
            state: self.registry.scopes[scope].start,
        }
    }

    /// Display name for an instantiation: `Template(Scope::State, ...)`.
    fn instance_name(&self, template: &str, args: &[ResolvedRef]) -> String {
        let parts: Vec<String> = args
            .iter()
            .map(|arg| {
                let scope = &self.registry.scopes[arg.scope];
                format!("{}::{}", scope.name, scope.states[arg.state].name)
            })
            .collect();
        format!("{}({})", template, parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AutomatonDef, RuleDef, TemplateDef};

    const ALPHABET: &[&str] = &["E", "_", "0", "1"];

    fn rule(read: &str, write: &str, action: Action, target: StateRef) -> RuleDef {
        RuleDef::new(read, write, action, target)
    }

    fn halt_state(name: &str) -> StateDef {
        StateDef::new(name, vec![rule("_", "_", Action::Halt, StateRef::name(name))])
    }

    fn forward_template(name: &str) -> TemplateDef {
        // One state that immediately transfers to its single continuation.
        TemplateDef::new(
            name,
            &["s"],
            ALPHABET,
            "E",
            "_",
            "Start",
            vec![StateDef::new(
                "Start",
                vec![rule("_", "_", Action::None, StateRef::param("s"))],
            )],
        )
    }

    fn program(automata: Vec<AutomatonDef>, templates: Vec<TemplateDef>, entry: &str) -> Program {
        Program {
            name: "Fixture".to_string(),
            automata,
            templates,
            entry: entry.to_string(),
        }
    }

    #[test]
    fn test_identical_calls_share_one_instantiation() {
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![
                StateDef::new(
                    "A",
                    vec![rule(
                        "0",
                        "_",
                        Action::None,
                        StateRef::call("T", vec![StateRef::name("Done")]),
                    )],
                ),
                StateDef::new(
                    "B",
                    vec![rule(
                        "1",
                        "_",
                        Action::None,
                        StateRef::call("T", vec![StateRef::name("Done")]),
                    )],
                ),
                halt_state("Done"),
            ],
        );

        let linked = link(&program(vec![main], vec![forward_template("T")], "Main")).unwrap();

        // Main plus exactly one instantiation of T.
        assert_eq!(linked.scopes.len(), 2);
        assert_eq!(linked.scopes[1].name, "T(Main::Done)");

        let a = linked.state_ref("Main", "A").unwrap();
        let b = linked.state_ref("Main", "B").unwrap();
        assert_eq!(linked.rules(a)[0].target, linked.rules(b)[0].target);
    }

    #[test]
    fn test_distinct_arguments_produce_distinct_instantiations() {
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![
                StateDef::new(
                    "A",
                    vec![
                        rule(
                            "0",
                            "_",
                            Action::None,
                            StateRef::call("T", vec![StateRef::name("Done")]),
                        ),
                        rule(
                            "1",
                            "_",
                            Action::None,
                            StateRef::call("T", vec![StateRef::name("Other")]),
                        ),
                    ],
                ),
                halt_state("Done"),
                halt_state("Other"),
            ],
        );

        let linked = link(&program(vec![main], vec![forward_template("T")], "Main")).unwrap();

        assert_eq!(linked.scopes.len(), 3);
        assert_eq!(linked.scopes[1].name, "T(Main::Done)");
        assert_eq!(linked.scopes[2].name, "T(Main::Other)");
    }

    #[test]
    fn test_nested_call_arguments_resolve_first() {
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![
                StateDef::new(
                    "A",
                    vec![rule(
                        "_",
                        "_",
                        Action::None,
                        StateRef::call(
                            "T",
                            vec![StateRef::call("U", vec![StateRef::name("Done")])],
                        ),
                    )],
                ),
                halt_state("Done"),
            ],
        );

        let linked = link(&program(
            vec![main],
            vec![forward_template("T"), forward_template("U")],
            "Main",
        ))
        .unwrap();

        // The inner call instantiates first, so the outer instantiation's
        // name embeds the inner one. Scope order follows reachability from
        // the entry, which reaches the outer instantiation first.
        let names: Vec<&str> = linked.scopes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Main", "T(U(Main::Done)::Start)", "U(Main::Done)"]
        );

        let inner = linked.state_ref("U(Main::Done)", "Start").unwrap();
        let outer = linked.state_ref("T(U(Main::Done)::Start)", "Start").unwrap();
        assert_eq!(linked.rules(outer)[0].target, inner);
    }

    #[test]
    fn test_self_recursive_instantiation_with_identical_arguments_terminates() {
        // L's body re-calls L with its own parameter: the memo entry is
        // registered before the body resolves, so the inner call folds back
        // onto the same instantiation.
        let looping = TemplateDef::new(
            "L",
            &["s"],
            ALPHABET,
            "E",
            "_",
            "Start",
            vec![StateDef::new(
                "Start",
                vec![
                    rule("0", "_", Action::None, StateRef::param("s")),
                    rule(
                        "_",
                        "_",
                        Action::None,
                        StateRef::call("L", vec![StateRef::param("s")]),
                    ),
                ],
            )],
        );
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![
                StateDef::new(
                    "A",
                    vec![rule(
                        "_",
                        "_",
                        Action::None,
                        StateRef::call("L", vec![StateRef::name("Done")]),
                    )],
                ),
                halt_state("Done"),
            ],
        );

        let linked = link(&program(vec![main], vec![looping], "Main")).unwrap();

        assert_eq!(linked.scopes.len(), 2);
        let start = linked.state_ref("L(Main::Done)", "Start").unwrap();
        assert_eq!(linked.rules(start)[1].target, start);
    }

    #[test]
    fn test_progress_free_recursion_overflows() {
        // Each level resolves "Start" in its own fresh instantiation, so the
        // argument list is new every time and the memo never hits.
        let runaway = TemplateDef::new(
            "R",
            &["s"],
            ALPHABET,
            "E",
            "_",
            "Start",
            vec![StateDef::new(
                "Start",
                vec![rule(
                    "_",
                    "_",
                    Action::None,
                    StateRef::call("R", vec![StateRef::name("Start")]),
                )],
            )],
        );
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![StateDef::new(
                "A",
                vec![rule(
                    "_",
                    "_",
                    Action::None,
                    StateRef::call("R", vec![StateRef::name("A")]),
                )],
            )],
        );

        let result = link(&program(vec![main], vec![runaway], "Main"));
        assert!(matches!(
            result,
            Err(LinkError::InstantiationOverflow { .. })
        ));
    }

    #[test]
    fn test_concrete_zero_argument_call() {
        let sink = AutomatonDef::new("Sink", ALPHABET, "E", "_", "End", vec![halt_state("End")]);
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![StateDef::new(
                "A",
                vec![rule("_", "_", Action::None, StateRef::call("Sink", vec![]))],
            )],
        );

        let linked = link(&program(vec![main, sink], vec![], "Main")).unwrap();

        let a = linked.state_ref("Main", "A").unwrap();
        let sink_start = linked.state_ref("Sink", "End").unwrap();
        assert_eq!(linked.rules(a)[0].target, sink_start);
    }

    #[test]
    fn test_arguments_to_concrete_automaton_are_rejected() {
        let sink = AutomatonDef::new("Sink", ALPHABET, "E", "_", "End", vec![halt_state("End")]);
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![StateDef::new(
                "A",
                vec![rule(
                    "_",
                    "_",
                    Action::None,
                    StateRef::call("Sink", vec![StateRef::name("A")]),
                )],
            )],
        );

        let result = link(&program(vec![main, sink], vec![], "Main"));
        assert_eq!(
            result,
            Err(LinkError::CallArity {
                template: "Sink".to_string(),
                expected: 0,
                got: 1,
            })
        );
    }

    #[test]
    fn test_call_arity_mismatch() {
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![StateDef::new(
                "A",
                vec![rule("_", "_", Action::None, StateRef::call("T", vec![]))],
            )],
        );

        let result = link(&program(vec![main], vec![forward_template("T")], "Main"));
        assert_eq!(
            result,
            Err(LinkError::CallArity {
                template: "T".to_string(),
                expected: 1,
                got: 0,
            })
        );
    }

    #[test]
    fn test_unknown_template() {
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![StateDef::new(
                "A",
                vec![rule(
                    "_",
                    "_",
                    Action::None,
                    StateRef::call("Nope", vec![StateRef::name("A")]),
                )],
            )],
        );

        let result = link(&program(vec![main], vec![], "Main"));
        assert_eq!(result, Err(LinkError::UnknownTemplate("Nope".to_string())));
    }

    #[test]
    fn test_mutually_recursive_automata() {
        let ping = AutomatonDef::new(
            "Ping",
            ALPHABET,
            "E",
            "_",
            "Go",
            vec![StateDef::new(
                "Go",
                vec![rule("_", "_", Action::None, StateRef::scoped("Pong", "Go"))],
            )],
        );
        let pong = AutomatonDef::new(
            "Pong",
            ALPHABET,
            "E",
            "_",
            "Go",
            vec![StateDef::new(
                "Go",
                vec![rule("_", "_", Action::None, StateRef::scoped("Ping", "Go"))],
            )],
        );

        let linked = link(&program(vec![ping, pong], vec![], "Ping")).unwrap();

        let ping_go = linked.state_ref("Ping", "Go").unwrap();
        let pong_go = linked.state_ref("Pong", "Go").unwrap();
        assert_eq!(linked.rules(ping_go)[0].target, pong_go);
        assert_eq!(linked.rules(pong_go)[0].target, ping_go);
    }

    #[test]
    fn test_unresolved_state() {
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![StateDef::new(
                "A",
                vec![rule("_", "_", Action::Halt, StateRef::name("Missing"))],
            )],
        );

        // Halt rules still carry a target that must resolve.
        let result = link(&program(vec![main], vec![], "Main"));
        assert_eq!(
            result,
            Err(LinkError::UnresolvedState {
                scope: "Main".to_string(),
                state: "Missing".to_string(),
            })
        );
    }

    #[test]
    fn test_scoped_reference_errors() {
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![StateDef::new(
                "A",
                vec![rule("_", "_", Action::None, StateRef::scoped("Ghost", "X"))],
            )],
        );
        let result = link(&program(vec![main], vec![], "Main"));
        assert_eq!(result, Err(LinkError::UnknownAutomaton("Ghost".to_string())));

        let sink = AutomatonDef::new("Sink", ALPHABET, "E", "_", "End", vec![halt_state("End")]);
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![StateDef::new(
                "A",
                vec![rule("_", "_", Action::None, StateRef::scoped("Sink", "X"))],
            )],
        );
        let result = link(&program(vec![main, sink], vec![], "Main"));
        assert_eq!(
            result,
            Err(LinkError::UnresolvedState {
                scope: "Sink".to_string(),
                state: "X".to_string(),
            })
        );
    }

    #[test]
    fn test_unbound_parameter_outside_template() {
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![StateDef::new(
                "A",
                vec![rule("_", "_", Action::None, StateRef::param("s"))],
            )],
        );

        let result = link(&program(vec![main], vec![], "Main"));
        assert_eq!(
            result,
            Err(LinkError::UnboundParameter {
                scope: "Main".to_string(),
                param: "s".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_rule_list() {
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![StateDef::new("A", vec![])],
        );

        let result = link(&program(vec![main], vec![], "Main"));
        assert_eq!(
            result,
            Err(LinkError::MissingRuleList {
                scope: "Main".to_string(),
                state: "A".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_config() {
        // Empty symbol absent from the alphabet.
        let main = AutomatonDef::new("Main", &["0", "1"], "E", "_", "A", vec![halt_state("A")]);
        assert!(matches!(
            link(&program(vec![main], vec![], "Main")),
            Err(LinkError::InvalidConfig { .. })
        ));

        // Empty and any must be distinct symbols.
        let main = AutomatonDef::new("Main", ALPHABET, "E", "E", "A", vec![halt_state("A")]);
        assert!(matches!(
            link(&program(vec![main], vec![], "Main")),
            Err(LinkError::InvalidConfig { .. })
        ));

        // Start state must exist.
        let main = AutomatonDef::new("Main", ALPHABET, "E", "_", "Nowhere", vec![halt_state("A")]);
        assert_eq!(
            link(&program(vec![main], vec![], "Main")),
            Err(LinkError::UnresolvedState {
                scope: "Main".to_string(),
                state: "Nowhere".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_symbol_in_rule() {
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![StateDef::new(
                "A",
                vec![rule("Q", "_", Action::Halt, StateRef::name("A"))],
            )],
        );

        let result = link(&program(vec![main], vec![], "Main"));
        assert_eq!(
            result,
            Err(LinkError::UnknownSymbol {
                scope: "Main".to_string(),
                symbol: "Q".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_definitions() {
        let main = AutomatonDef::new(
            "Main",
            ALPHABET,
            "E",
            "_",
            "A",
            vec![halt_state("A"), halt_state("A")],
        );
        assert_eq!(
            link(&program(vec![main], vec![], "Main")),
            Err(LinkError::DuplicateState {
                scope: "Main".to_string(),
                state: "A".to_string(),
            })
        );

        let main = AutomatonDef::new("Main", ALPHABET, "E", "_", "A", vec![halt_state("A")]);
        let shadow = forward_template("Main");
        assert_eq!(
            link(&program(vec![main], vec![shadow], "Main")),
            Err(LinkError::DuplicateName("Main".to_string()))
        );
    }

    #[test]
    fn test_unknown_entry_automaton() {
        let result = link(&program(vec![], vec![], "Ghost"));
        assert_eq!(result, Err(LinkError::UnknownAutomaton("Ghost".to_string())));
    }
}
