//! This module implements the reachability analyzer: a breadth-first
//! traversal of the linker's registry that computes the closed set of scopes
//! and alphabets reachable from the entry automaton, and builds the unified
//! representation from them.
//!
//! Both accumulating sets are de-duplicating and insertion-ordered; first-seen
//! order becomes the discriminant order of the unified tagged unions, so
//! relinking the same definition always yields the same layout.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::linker::Registry;
use crate::types::{LinkError, ResolvedRef, ScopeId};
use crate::unified::{Alphabet, Linked, Rule, Scope, State, Sym};

/// Builds the unified representation for everything reachable from `entry`.
///
/// Scopes are visited breadth-first following resolved rule targets; a scope
/// is never re-visited, so traversal terminates. Alphabets merge only when
/// structurally identical: the same ordered symbol list with the same empty
/// and any designations. An identical symbol list with conflicting
/// designations is an [`LinkError::AmbiguousAlphabetMerge`].
pub(crate) fn analyze(registry: Registry, entry: ScopeId) -> Result<Linked, LinkError> {
    let mut visited: IndexSet<ScopeId> = IndexSet::new();
    let mut queue = VecDeque::new();
    visited.insert(entry);
    queue.push_back(entry);

    while let Some(scope) = queue.pop_front() {
        for state in &registry.scopes[scope].states {
            for rule in &state.rules {
                if visited.insert(rule.target.scope) {
                    queue.push_back(rule.target.scope);
                }
            }
        }
    }

    // Collect reachable alphabets in first-seen order, merging structurally
    // identical ones.
    let mut alphabets: Vec<Alphabet> = Vec::new();
    let mut by_symbols: IndexMap<Vec<String>, (usize, String)> = IndexMap::new();
    let mut scope_alphabets: Vec<usize> = Vec::with_capacity(visited.len());

    for &scope_id in &visited {
        let record = &registry.scopes[scope_id];
        match by_symbols.get(&record.alphabet.symbols) {
            Some(&(id, ref first)) => {
                let alphabet = &alphabets[id];
                if alphabet.empty != record.alphabet.empty || alphabet.any != record.alphabet.any {
                    return Err(LinkError::AmbiguousAlphabetMerge {
                        left: first.clone(),
                        right: record.name.clone(),
                    });
                }
                scope_alphabets.push(id);
            }
            None => {
                let id = alphabets.len();
                alphabets.push(Alphabet {
                    symbols: record.alphabet.symbols.clone(),
                    empty: record.alphabet.empty,
                    any: record.alphabet.any,
                });
                by_symbols.insert(record.alphabet.symbols.clone(), (id, record.name.clone()));
                scope_alphabets.push(id);
            }
        }
    }

    // Renumber scopes to first-seen order and remap every rule target.
    let mut remap = vec![usize::MAX; registry.scopes.len()];
    for (new_id, &old_id) in visited.iter().enumerate() {
        remap[old_id] = new_id;
    }

    let scopes: Vec<Scope> = visited
        .iter()
        .zip(&scope_alphabets)
        .map(|(&old_id, &alphabet)| {
            let record = &registry.scopes[old_id];
            Scope {
                name: record.name.clone(),
                alphabet,
                start: record.start,
                empty: Sym {
                    alphabet,
                    index: record.alphabet.empty,
                },
                any: Sym {
                    alphabet,
                    index: record.alphabet.any,
                },
                states: record
                    .states
                    .iter()
                    .map(|state| State {
                        name: state.name.clone(),
                        rules: state
                            .rules
                            .iter()
                            .map(|rule| Rule {
                                read: Sym {
                                    alphabet,
                                    index: rule.read,
                                },
                                write: Sym {
                                    alphabet,
                                    index: rule.write,
                                },
                                action: rule.action,
                                target: ResolvedRef {
                                    scope: remap[rule.target.scope],
                                    state: rule.target.state,
                                },
                            })
                            .collect(),
                    })
                    .collect(),
            }
        })
        .collect();

    debug!(
        scopes = scopes.len(),
        alphabets = alphabets.len(),
        "reachability analysis complete"
    );

    Ok(Linked {
        scopes,
        alphabets,
        entry: 0,
    })
}

#[cfg(test)]
mod tests {
    use crate::linker::link;
    use crate::types::{Action, AutomatonDef, LinkError, Program, RuleDef, StateDef, StateRef};

    fn rule(read: &str, write: &str, action: Action, target: StateRef) -> RuleDef {
        RuleDef::new(read, write, action, target)
    }

    fn halt_state(name: &str) -> StateDef {
        StateDef::new(name, vec![rule("_", "_", Action::Halt, StateRef::name(name))])
    }

    fn program(automata: Vec<AutomatonDef>, entry: &str) -> Program {
        Program {
            name: "Fixture".to_string(),
            automata,
            templates: Vec::new(),
            entry: entry.to_string(),
        }
    }

    fn hopper(name: &str, first: &str, second: &str) -> AutomatonDef {
        AutomatonDef::new(
            name,
            &["E", "_"],
            "E",
            "_",
            "Go",
            vec![StateDef::new(
                "Go",
                vec![
                    rule("E", "_", Action::None, StateRef::scoped(first, "End")),
                    rule("_", "_", Action::None, StateRef::scoped(second, "End")),
                ],
            )],
        )
    }

    #[test]
    fn test_scope_order_follows_rule_order() {
        let main = hopper("Main", "B", "C");
        let b = AutomatonDef::new("B", &["E", "_"], "E", "_", "End", vec![halt_state("End")]);
        let c = AutomatonDef::new("C", &["E", "_"], "E", "_", "End", vec![halt_state("End")]);

        let linked = link(&program(vec![main, b, c], "Main")).unwrap();

        let names: Vec<&str> = linked.scopes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Main", "B", "C"]);
        assert_eq!(linked.entry, 0);
    }

    #[test]
    fn test_relinking_is_deterministic() {
        let build = || {
            let main = hopper("Main", "C", "B");
            let b = AutomatonDef::new("B", &["E", "_"], "E", "_", "End", vec![halt_state("End")]);
            let c = AutomatonDef::new("C", &["E", "_"], "E", "_", "End", vec![halt_state("End")]);
            program(vec![main, b, c], "Main")
        };

        let first = link(&build()).unwrap();
        let second = link(&build()).unwrap();

        assert_eq!(first, second);
        let names: Vec<&str> = first.scopes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Main", "C", "B"]);
    }

    #[test]
    fn test_identical_alphabets_share_one_variant() {
        let main = hopper("Main", "B", "C");
        let b = AutomatonDef::new("B", &["E", "_"], "E", "_", "End", vec![halt_state("End")]);
        let c = AutomatonDef::new("C", &["E", "_"], "E", "_", "End", vec![halt_state("End")]);

        let linked = link(&program(vec![main, b, c], "Main")).unwrap();

        assert_eq!(linked.alphabets.len(), 1);
        assert!(linked.scopes.iter().all(|s| s.alphabet == 0));
    }

    #[test]
    fn test_distinct_alphabets_stay_distinct() {
        let main = AutomatonDef::new(
            "Main",
            &["E", "_"],
            "E",
            "_",
            "Go",
            vec![StateDef::new(
                "Go",
                vec![rule("_", "_", Action::None, StateRef::scoped("Sub", "End"))],
            )],
        );
        let sub = AutomatonDef::new(
            "Sub",
            &["E", "-", "Q"],
            "E",
            "-",
            "End",
            vec![StateDef::new(
                "End",
                vec![rule("-", "-", Action::Halt, StateRef::name("End"))],
            )],
        );

        let linked = link(&program(vec![main, sub], "Main")).unwrap();

        assert_eq!(linked.alphabets.len(), 2);

        // Same name, different alphabet variant: never equal.
        let (sub_id, _) = linked.scope_named("Sub").unwrap();
        let main_e = linked.entry_symbol("E").unwrap();
        let sub_e = linked.symbol(sub_id, "E").unwrap();
        assert_ne!(main_e, sub_e);
    }

    #[test]
    fn test_conflicting_roles_on_identical_alphabet_are_rejected() {
        let main = AutomatonDef::new(
            "Main",
            &["E", "_", "Q"],
            "E",
            "_",
            "Go",
            vec![StateDef::new(
                "Go",
                vec![rule("_", "_", Action::None, StateRef::scoped("Sub", "End"))],
            )],
        );
        // Same symbol list, but "Q" plays the wildcard role here.
        let sub = AutomatonDef::new(
            "Sub",
            &["E", "_", "Q"],
            "E",
            "Q",
            "End",
            vec![StateDef::new(
                "End",
                vec![rule("Q", "Q", Action::Halt, StateRef::name("End"))],
            )],
        );

        let result = link(&program(vec![main, sub], "Main"));
        assert_eq!(
            result,
            Err(LinkError::AmbiguousAlphabetMerge {
                left: "Main".to_string(),
                right: "Sub".to_string(),
            })
        );
    }

    #[test]
    fn test_unreferenced_automata_are_not_linked() {
        let main = AutomatonDef::new("Main", &["E", "_"], "E", "_", "End", vec![halt_state("End")]);
        let orphan =
            AutomatonDef::new("Orphan", &["E", "_"], "E", "_", "End", vec![halt_state("End")]);

        let linked = link(&program(vec![main, orphan], "Main")).unwrap();

        assert_eq!(linked.scopes.len(), 1);
        assert!(linked.scope_named("Orphan").is_none());
    }
}
