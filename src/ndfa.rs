/* The transition relation of a non-deterministic finite automaton. An Ndfa can only be built
 * through an NdfaBuilder, once finalized it is read-only for the rest of the run. */

use color_eyre::eyre::{Report, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Write};

use crate::fa::{Input, ReachableSet, State, FA};
use crate::parser::parse_ndfa_line;

static NO_TARGETS: ReachableSet = BTreeSet::new();

/// List of possible errors while reading an automaton or its simulation requests
#[derive(Debug, PartialEq, Eq)]
pub enum NdfaError {
    /// The given file could not be opened
    FileOpenError(String),
    /// A line of the given file could not be read
    FileReadError(String),
    /// A line does not have a valid number of semicolon separated tokens
    MalformedLine {
        line_number: usize,
        line: String,
        reason: String,
    },
    /// A JSON snapshot of an automaton could not be written or read back
    SnapshotError(String),
}

impl std::fmt::Display for NdfaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NdfaError::FileOpenError(err_line) => write!(f, "{}", err_line),
            NdfaError::FileReadError(err_line) => write!(f, "{}", err_line),
            NdfaError::MalformedLine {
                line_number,
                line,
                reason,
            } => write!(
                f,
                "Error: Malformed line {} \"{}\": {}",
                line_number, line, reason
            ),
            NdfaError::SnapshotError(err_line) => write!(f, "{}", err_line),
        }
    }
}

impl std::error::Error for NdfaError {}

/// The transition table of a single state, mapping every input to the set of states it leads to
pub type TransitionTable = BTreeMap<Input, ReachableSet>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ndfa {
    states: BTreeMap<State, TransitionTable>,
}

/// Accumulates states and transitions. Repeating a transition for the same state and input adds
/// the target to the existing set instead of replacing it.
#[derive(Debug, Default)]
pub struct NdfaBuilder {
    states: BTreeMap<State, TransitionTable>,
}

impl NdfaBuilder {
    pub fn new() -> Self {
        NdfaBuilder {
            states: BTreeMap::new(),
        }
    }

    /// Register a state, keeping any transitions it already has
    pub fn add_state(&mut self, state: &str) {
        if !self.states.contains_key(state) {
            self.states.insert(state.to_string(), TransitionTable::new());
        }
    }

    pub fn add_transition(&mut self, from: &str, input: &str, to: &str) {
        self.states
            .entry(from.to_string())
            .or_default()
            .entry(input.to_string())
            .or_default()
            .insert(to.to_string());
    }

    /// Parse one description line and apply it. A malformed line is rejected before any of its
    /// transitions are added.
    pub fn add_line(&mut self, line_number: usize, line: &str) -> Result<(), NdfaError> {
        let parsed = parse_ndfa_line(line_number, line)?;
        trace!(
            "Line {}: state {} with {} transitions",
            line_number,
            parsed.state,
            parsed.transitions.len()
        );

        self.add_state(parsed.state);
        for (input, target) in parsed.transitions {
            self.add_transition(parsed.state, input, target);
        }
        Ok(())
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    /// Freeze the accumulated transitions into an immutable automaton
    pub fn finalize(self) -> Ndfa {
        debug!("Finalized automaton with {} states", self.states.len());
        Ndfa {
            states: self.states,
        }
    }
}

impl Ndfa {
    /// Returns true if the state was registered as the source of some description line
    pub fn has_state(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    /// Returns the transition table of the given state, None for states that were only ever a
    /// transition target or that never appeared at all.
    pub fn get_transitions(&self, state: &str) -> Option<&TransitionTable> {
        self.states.get(state)
    }

    /// Returns the states reachable from `state` by consuming `input`. Undefined states and inputs
    /// both lead to the empty set.
    pub fn get_targets(&self, state: &str, input: &str) -> &ReachableSet {
        match self.states.get(state) {
            None => &NO_TARGETS,
            Some(table) => table.get(input).unwrap_or(&NO_TARGETS),
        }
    }

    /// Iterate over the registered states and their transition tables in sorted order
    pub fn get_states(&self) -> impl Iterator<Item = (&State, &TransitionTable)> {
        self.states.iter()
    }

    /// Save the automaton as a pretty printed json file
    pub fn save_ndfa(&self, file_name: &str) -> Result<()> {
        let json_string = match serde_json::to_string_pretty(self) {
            Ok(json_string) => json_string,
            Err(error) => {
                let err_line = format!("Error: Failed to serialize the automaton {}", error);
                return Err(Report::new(NdfaError::SnapshotError(err_line)));
            }
        };

        let mut file = match File::create(file_name) {
            Ok(file) => file,
            Err(error) => {
                let err_line = format!("Error: Failed to create the file {} {}", file_name, error);
                return Err(Report::new(NdfaError::SnapshotError(err_line)));
            }
        };

        writeln!(file, "{}", json_string)?;
        debug!("Saved automaton snapshot to {}", file_name);
        Ok(())
    }
}

impl FA for Ndfa {
    fn get_num_states(&self) -> usize {
        self.states.len()
    }

    fn get_alphabet(&self) -> BTreeSet<&str> {
        self.states
            .values()
            .flat_map(|table| table.keys())
            .map(|input| input.as_str())
            .collect()
    }

    fn get_all_states(&self) -> BTreeSet<&str> {
        let mut all_states: BTreeSet<&str> = BTreeSet::new();
        for (state, table) in &self.states {
            all_states.insert(state.as_str());
            for targets in table.values() {
                all_states.extend(targets.iter().map(|target| target.as_str()));
            }
        }
        all_states
    }

    fn get_state_transitions(&self, state: &str) -> Vec<(&str, &str)> {
        let mut transition_list: Vec<(&str, &str)> = Vec::new();
        if let Some(table) = self.states.get(state) {
            for (input, targets) in table {
                for target in targets {
                    transition_list.push((input.as_str(), target.as_str()));
                }
            }
        }
        transition_list
    }
}

/// Load an automaton from a json file written by `Ndfa::save_ndfa`
pub fn load_ndfa(file_name: &str) -> Result<Ndfa> {
    let file = match File::open(file_name) {
        Ok(file) => file,
        Err(error) => {
            let err_line = format!("Error: Failed to open the snapshot file {}", error);
            return Err(Report::new(NdfaError::FileOpenError(err_line)));
        }
    };

    let buf_reader = BufReader::new(file);

    let ndfa: Ndfa = match serde_json::from_reader(buf_reader) {
        Ok(ndfa) => ndfa,
        Err(error) => {
            let err_line = format!("Error: Failed to read the snapshot file {}", error);
            return Err(Report::new(NdfaError::SnapshotError(err_line)));
        }
    };
    debug!(
        "Loaded automaton snapshot {} with {} states",
        file_name,
        ndfa.states.len()
    );
    Ok(ndfa)
}

#[cfg(test)]
mod ndfa_tests {
    use super::*;

    fn sample_ndfa() -> Ndfa {
        let mut builder = NdfaBuilder::new();
        builder.add_transition("A", "0", "A");
        builder.add_transition("A", "1", "B");
        builder.add_transition("B", "0", "C");
        builder.finalize()
    }

    #[test]
    fn test_state_without_transitions() {
        let mut builder = NdfaBuilder::new();
        builder.add_state("lonely");
        let ndfa = builder.finalize();

        assert!(ndfa.has_state("lonely"));
        assert_eq!(ndfa.get_transitions("lonely").unwrap().len(), 0);
        assert!(ndfa.get_targets("lonely", "0").is_empty());
        assert!(ndfa.get_targets("lonely", "").is_empty());
    }

    #[test]
    fn test_target_only_state_is_not_registered() {
        let ndfa = sample_ndfa();

        assert!(!ndfa.has_state("C"));
        assert!(ndfa.get_transitions("C").is_none());
        assert!(ndfa.get_targets("C", "0").is_empty());
    }

    #[test]
    fn test_repeated_transitions_accumulate() {
        let mut builder = NdfaBuilder::new();
        builder.add_transition("S", "x", "A");
        builder.add_transition("S", "x", "B");
        builder.add_transition("S", "x", "A");
        let ndfa = builder.finalize();

        let expected: ReachableSet = ["A", "B"].iter().map(|s| s.to_string()).collect();
        assert_eq!(ndfa.get_targets("S", "x"), &expected);
    }

    #[test]
    fn test_add_state_keeps_existing_transitions() {
        let mut builder = NdfaBuilder::new();
        builder.add_transition("S", "x", "A");
        builder.add_state("S");
        let ndfa = builder.finalize();

        assert_eq!(ndfa.get_targets("S", "x").len(), 1);
    }

    #[test]
    fn test_add_line() {
        let mut builder = NdfaBuilder::new();
        assert!(builder.add_line(1, "A;0;B;0;C").is_ok());
        assert!(builder.add_line(2, "B").is_ok());
        let ndfa = builder.finalize();

        let expected: ReachableSet = ["B", "C"].iter().map(|s| s.to_string()).collect();
        assert_eq!(ndfa.get_targets("A", "0"), &expected);
        assert!(ndfa.has_state("B"));
        assert!(!ndfa.has_state("C"));
    }

    #[test]
    fn test_add_line_rejects_dangling_input() {
        let mut builder = NdfaBuilder::new();
        builder.add_transition("A", "0", "A");

        let result = builder.add_line(2, "A;1;B;0");
        match result {
            Err(NdfaError::MalformedLine { line_number, .. }) => assert_eq!(line_number, 2),
            other => panic!("Expected MalformedLine, got {:?}", other),
        }

        // Nothing from the rejected line is applied, earlier transitions remain
        let ndfa = builder.finalize();
        assert!(ndfa.get_targets("A", "1").is_empty());
        assert_eq!(ndfa.get_targets("A", "0").len(), 1);
    }

    #[test]
    fn test_states_are_case_and_whitespace_sensitive() {
        let mut builder = NdfaBuilder::new();
        builder.add_transition("a", "0", "b");
        let ndfa = builder.finalize();

        assert!(ndfa.has_state("a"));
        assert!(!ndfa.has_state("A"));
        assert!(!ndfa.has_state(" a"));
        assert!(ndfa.get_targets("a", " 0").is_empty());
    }

    #[test]
    fn test_fa_trait_implementation_for_ndfa() {
        let ndfa = sample_ndfa();

        assert_eq!(ndfa.get_num_states(), 2);

        let alphabet: Vec<&str> = ndfa.get_alphabet().into_iter().collect();
        assert_eq!(alphabet, vec!["0", "1"]);

        let all_states: Vec<&str> = ndfa.get_all_states().into_iter().collect();
        assert_eq!(all_states, vec!["A", "B", "C"]);

        let transitions = ndfa.get_state_transitions("A");
        assert_eq!(transitions, vec![("0", "A"), ("1", "B")]);
        assert!(ndfa.get_state_transitions("C").is_empty());
    }

    #[test]
    fn test_save_and_load_ndfa() {
        let ndfa = sample_ndfa();

        let mut path = std::env::temp_dir();
        path.push(format!("ndfasim_snapshot_{}.json", std::process::id()));
        let file_name = path.to_str().unwrap().to_string();

        let result = ndfa.save_ndfa(&file_name);
        assert!(result.is_ok());

        let loaded = load_ndfa(&file_name);
        assert!(loaded.is_ok());
        assert_eq!(loaded.unwrap(), ndfa);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_snapshot() {
        let result = load_ndfa("test_data/does_not_exist.json");
        assert!(result.is_err());

        match result.unwrap_err().downcast_ref::<NdfaError>().unwrap() {
            NdfaError::FileOpenError(_) => {}
            err => panic!("Expected FileOpenError, got {:?}", err),
        }
    }
}
