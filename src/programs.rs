//! Built-in demonstration programs.
//!
//! Two programs ship with the crate: a single-automaton bit flipper and a
//! unary-to-binary converter assembled from parameterized templates. The
//! converter is the showcase for the linker: its `Cr0` and `Cr1` templates
//! both call `End` with the same continuation, so the linked output contains
//! a single shared `End` instantiation.

use crate::types::{Action, AutomatonDef, Program, RuleDef, StateDef, StateRef, TemplateDef};

lazy_static::lazy_static! {
    /// The library of built-in programs, in a fixed order.
    pub static ref PROGRAMS: Vec<Program> = vec![flip_least_significant(), unary_to_binary()];
}

/// Lookup surface over [`struct@PROGRAMS`].
pub struct ProgramLibrary;

impl ProgramLibrary {
    /// Number of built-in programs.
    pub fn program_count() -> usize {
        PROGRAMS.len()
    }

    /// Returns a built-in program by position.
    pub fn by_index(index: usize) -> Option<&'static Program> {
        PROGRAMS.get(index)
    }

    /// Returns a built-in program by name.
    pub fn by_name(name: &str) -> Option<&'static Program> {
        PROGRAMS.iter().find(|program| program.name == name)
    }

    /// Lists the names of all built-in programs.
    pub fn program_names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|program| program.name.as_str()).collect()
    }
}

fn rule(read: &str, write: &str, action: Action, target: StateRef) -> RuleDef {
    RuleDef::new(read, write, action, target)
}

fn state(name: &str, rules: Vec<RuleDef>) -> StateDef {
    StateDef::new(name, rules)
}

/// Flips the least significant binary digit of the tape.
///
/// The input is most-significant-digit first. The automaton shifts the whole
/// string one cell to the right (leaving an empty cell at the front), then
/// scans back from the end and rewrites the first `1` it meets to `0`.
pub fn flip_least_significant() -> Program {
    let automaton = AutomatonDef::new(
        "FlipLeastSignificant",
        &["_", "E", "0", "1"],
        "E",
        "_",
        "PrependEmpty",
        vec![
            state(
                "PrependEmpty",
                vec![
                    rule("0", "E", Action::Right, StateRef::name("ShiftRight0")),
                    rule("1", "E", Action::Right, StateRef::name("ShiftRight1")),
                    rule("E", "_", Action::Halt, StateRef::name("PrependEmpty")),
                ],
            ),
            state(
                "ShiftRight0",
                vec![
                    rule("0", "0", Action::Right, StateRef::name("ShiftRight0")),
                    rule("1", "0", Action::Right, StateRef::name("ShiftRight1")),
                    rule("E", "0", Action::Left, StateRef::name("ReverseScan")),
                ],
            ),
            state(
                "ShiftRight1",
                vec![
                    rule("0", "1", Action::Right, StateRef::name("ShiftRight0")),
                    rule("1", "1", Action::Right, StateRef::name("ShiftRight1")),
                    rule("E", "1", Action::Left, StateRef::name("ReverseScan")),
                ],
            ),
            state(
                "ReverseScan",
                vec![
                    rule("1", "0", Action::Halt, StateRef::name("ReverseScan")),
                    rule("E", "_", Action::Halt, StateRef::name("ReverseScan")),
                    rule("_", "_", Action::Left, StateRef::name("ReverseScan")),
                ],
            ),
        ],
    );

    Program {
        name: "Flip least significant".to_string(),
        entry: automaton.name.clone(),
        automata: vec![automaton],
        templates: Vec::new(),
    }
}

/// Converts a unary number (a run of `0` cells) to its binary representation
/// by repeated halving, then copies the binary digits to the front of the
/// tape and erases the working area.
///
/// The algorithm is expressed as nine small templates composed by the entry
/// automaton `Main`, with `Term` performing the final copy-back and `Sink`
/// absorbing the empty input case.
pub fn unary_to_binary() -> Program {
    const ALPHABET: &[&str] = &["E", "_", "0", "1", "X", "Y", "Z", "C"];

    // Return to the X marker at the start of the string, then continue at s.
    let return_to_start = TemplateDef::new(
        "St",
        &["s"],
        ALPHABET,
        "E",
        "_",
        "Start",
        vec![state(
            "Start",
            vec![
                rule("X", "_", Action::Right, StateRef::param("s")),
                rule("_", "_", Action::Left, StateRef::name("Start")),
            ],
        )],
    );

    // Rewind to the start, then find the first 0 or Y.
    let find_first = TemplateDef::new(
        "Ff",
        &["s0", "sY"],
        ALPHABET,
        "E",
        "_",
        "ReturnToStart",
        vec![
            state(
                "ReturnToStart",
                vec![rule(
                    "_",
                    "_",
                    Action::None,
                    StateRef::call("St", vec![StateRef::name("ScanRight")]),
                )],
            ),
            state(
                "ScanRight",
                vec![
                    rule("0", "_", Action::None, StateRef::param("s0")),
                    rule("Y", "_", Action::None, StateRef::param("sY")),
                    rule("_", "_", Action::Right, StateRef::name("ScanRight")),
                ],
            ),
        ],
    );

    // Find the next 0 or Y to the right of the head.
    let find_next = TemplateDef::new(
        "Fn",
        &["s0", "sY"],
        ALPHABET,
        "E",
        "_",
        "ScanRight",
        vec![state(
            "ScanRight",
            vec![
                rule("0", "_", Action::None, StateRef::param("s0")),
                rule("Y", "_", Action::None, StateRef::param("sY")),
                rule("_", "_", Action::Right, StateRef::name("ScanRight")),
            ],
        )],
    );

    // Find the Z marker at the end of the string.
    let find_end = TemplateDef::new(
        "End",
        &["s"],
        ALPHABET,
        "E",
        "_",
        "ScanRight",
        vec![state(
            "ScanRight",
            vec![
                rule("Z", "_", Action::None, StateRef::param("s")),
                rule("_", "_", Action::Right, StateRef::name("ScanRight")),
            ],
        )],
    );

    // Append a binary digit at the end marker and restore the marker.
    let write_one = TemplateDef::new(
        "W1",
        &["s"],
        ALPHABET,
        "E",
        "_",
        "FindEnd",
        vec![
            state(
                "FindEnd",
                vec![rule(
                    "_",
                    "_",
                    Action::None,
                    StateRef::call("End", vec![StateRef::name("Write1")]),
                )],
            ),
            state(
                "Write1",
                vec![rule("Z", "1", Action::Right, StateRef::name("WriteZ"))],
            ),
            state(
                "WriteZ",
                vec![rule("_", "Z", Action::None, StateRef::param("s"))],
            ),
        ],
    );

    let write_zero = TemplateDef::new(
        "W0",
        &["s"],
        ALPHABET,
        "E",
        "_",
        "FindEnd",
        vec![
            state(
                "FindEnd",
                vec![rule(
                    "_",
                    "_",
                    Action::None,
                    StateRef::call("End", vec![StateRef::name("Write0")]),
                )],
            ),
            state(
                "Write0",
                vec![rule("Z", "0", Action::Right, StateRef::name("WriteZ"))],
            ),
            state(
                "WriteZ",
                vec![rule("_", "Z", Action::None, StateRef::param("s"))],
            ),
        ],
    );

    // Consume a 0 digit: mark it, copy it over the front marker, and return.
    let copy_zero = TemplateDef::new(
        "Cr0",
        &["s"],
        ALPHABET,
        "E",
        "_",
        "WriteZ",
        vec![
            state(
                "WriteZ",
                vec![rule("0", "Z", Action::None, StateRef::name("Copy"))],
            ),
            state(
                "Copy",
                vec![
                    rule("C", "0", Action::Right, StateRef::name("WriteC")),
                    rule("X", "0", Action::Right, StateRef::name("WriteC")),
                    rule("_", "_", Action::Left, StateRef::name("Copy")),
                ],
            ),
            state(
                "WriteC",
                vec![rule(
                    "_",
                    "C",
                    Action::None,
                    StateRef::call("End", vec![StateRef::param("s")]),
                )],
            ),
        ],
    );

    let copy_one = TemplateDef::new(
        "Cr1",
        &["s"],
        ALPHABET,
        "E",
        "_",
        "WriteZ",
        vec![
            state(
                "WriteZ",
                vec![rule("1", "Z", Action::None, StateRef::name("Copy"))],
            ),
            state(
                "Copy",
                vec![
                    rule("C", "1", Action::Right, StateRef::name("WriteC")),
                    rule("X", "1", Action::Right, StateRef::name("WriteC")),
                    rule("_", "_", Action::Left, StateRef::name("Copy")),
                ],
            ),
            state(
                "WriteC",
                vec![rule(
                    "_",
                    "C",
                    Action::None,
                    StateRef::call("End", vec![StateRef::param("s")]),
                )],
            ),
        ],
    );

    // Scan left for the C marker.
    let find_copy_reverse = TemplateDef::new(
        "Fcr",
        &["s"],
        ALPHABET,
        "E",
        "_",
        "ScanLeft",
        vec![state(
            "ScanLeft",
            vec![
                rule("C", "_", Action::None, StateRef::param("s")),
                rule("_", "_", Action::Left, StateRef::name("ScanLeft")),
            ],
        )],
    );

    // Copy the computed digits to the front of the tape and erase the rest.
    let terminate = AutomatonDef::new(
        "Term",
        ALPHABET,
        "E",
        "_",
        "FindEnd",
        vec![
            state(
                "FindEnd",
                vec![rule(
                    "_",
                    "_",
                    Action::None,
                    StateRef::call("End", vec![StateRef::name("Copy")]),
                )],
            ),
            state(
                "Copy",
                vec![
                    rule(
                        "Y",
                        "_",
                        Action::None,
                        StateRef::call("Fcr", vec![StateRef::name("Overwrite")]),
                    ),
                    rule(
                        "0",
                        "_",
                        Action::None,
                        StateRef::call("Cr0", vec![StateRef::name("Copy")]),
                    ),
                    rule(
                        "1",
                        "_",
                        Action::None,
                        StateRef::call("Cr1", vec![StateRef::name("Copy")]),
                    ),
                    rule("Z", "_", Action::Left, StateRef::name("Copy")),
                ],
            ),
            state(
                "Overwrite",
                vec![
                    rule("Z", "E", Action::Right, StateRef::name("End")),
                    rule("_", "E", Action::Right, StateRef::name("Overwrite")),
                ],
            ),
            state(
                "End",
                vec![
                    rule("E", "_", Action::Halt, StateRef::name("End")),
                    rule("_", "E", Action::Right, StateRef::name("End")),
                ],
            ),
        ],
    );

    // Absorbing halt state for the zero input.
    let sink = AutomatonDef::new(
        "Sink",
        ALPHABET,
        "E",
        "_",
        "End",
        vec![state(
            "End",
            vec![rule("_", "_", Action::Halt, StateRef::name("End"))],
        )],
    );

    let main = AutomatonDef::new(
        "Main",
        ALPHABET,
        "E",
        "_",
        "Prelude0",
        vec![
            // Mark the first unary cell with X; an empty input is already its
            // own binary representation, so just write a 0 and stop.
            state(
                "Prelude0",
                vec![
                    rule("0", "X", Action::Right, StateRef::name("Prelude1")),
                    rule("E", "0", Action::None, StateRef::call("Sink", Vec::new())),
                ],
            ),
            // Extend the string by one 0 and append the Y and Z markers.
            state(
                "Prelude1",
                vec![
                    rule("0", "_", Action::Right, StateRef::name("Prelude1")),
                    rule("E", "0", Action::Right, StateRef::name("WriteY")),
                ],
            ),
            state(
                "WriteY",
                vec![rule("_", "Y", Action::Right, StateRef::name("WriteZ"))],
            ),
            state(
                "WriteZ",
                vec![rule("_", "Z", Action::None, StateRef::name("Step1"))],
            ),
            // Halve the unary string, appending one binary digit per pass,
            // until no unmarked 0 remains before the Y marker.
            state(
                "Step1",
                vec![rule(
                    "_",
                    "_",
                    Action::None,
                    StateRef::call(
                        "Ff",
                        vec![StateRef::name("Step23"), StateRef::call("Term", Vec::new())],
                    ),
                )],
            ),
            state(
                "Step23",
                vec![rule(
                    "0",
                    "E",
                    Action::None,
                    StateRef::call(
                        "Fn",
                        vec![
                            StateRef::name("Step4"),
                            StateRef::call("W1", vec![StateRef::name("Step1")]),
                        ],
                    ),
                )],
            ),
            state(
                "Step4",
                vec![rule(
                    "0",
                    "_",
                    Action::Right,
                    StateRef::call(
                        "Fn",
                        vec![
                            StateRef::name("Step23"),
                            StateRef::call("W0", vec![StateRef::name("Step1")]),
                        ],
                    ),
                )],
            ),
        ],
    );

    Program {
        name: "Unary to binary".to_string(),
        entry: "Main".to_string(),
        automata: vec![main, terminate, sink],
        templates: vec![
            return_to_start,
            find_first,
            find_next,
            find_end,
            write_one,
            write_zero,
            copy_zero,
            copy_one,
            find_copy_reverse,
        ],
    }
}
