/* Forward simulation of an NDFA. Non-determinism is handled by carrying the set of all states the
 * automaton could be in, an input with no transition from any current state leads to the empty
 * set and the simulation keeps going from there. */

use log::trace;

use crate::fa::{Input, ReachableSet, State};
use crate::ndfa::Ndfa;

/// A start state and the inputs to feed the automaton, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest {
    start: State,
    inputs: Vec<Input>,
}

impl SimulationRequest {
    pub fn new(start: State, inputs: Vec<Input>) -> Self {
        SimulationRequest { start, inputs }
    }

    pub fn get_start(&self) -> &str {
        &self.start
    }

    pub fn get_inputs(&self) -> &[Input] {
        &self.inputs
    }
}

/// One entry of a simulation trace. The first entry of every trace has no input and holds the
/// start state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    input: Option<Input>,
    states: ReachableSet,
}

impl Transition {
    /// The input consumed to reach this entry, None for the start entry
    pub fn get_input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn get_states(&self) -> &ReachableSet {
        &self.states
    }
}

/// Always holds at least the start entry, `process` is the only constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationTrace {
    transitions: Vec<Transition>,
}

impl SimulationTrace {
    pub fn iter(&self) -> std::slice::Iter<'_, Transition> {
        self.transitions.iter()
    }

    /// Number of entries, including the start entry
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn get_start_states(&self) -> &ReachableSet {
        &self.transitions[0].states
    }

    /// The states the automaton is in after the last input
    pub fn get_stop_states(&self) -> &ReachableSet {
        &self.transitions[self.transitions.len() - 1].states
    }

    /// True when no state is reachable after the last input
    pub fn is_dead(&self) -> bool {
        self.get_stop_states().is_empty()
    }
}

impl<'a> IntoIterator for &'a SimulationTrace {
    type Item = &'a Transition;
    type IntoIter = std::slice::Iter<'a, Transition>;

    fn into_iter(self) -> Self::IntoIter {
        self.transitions.iter()
    }
}

/// Returns the set of states reachable from any state in `current` by consuming `input`
pub fn step(ndfa: &Ndfa, current: &ReachableSet, input: &str) -> ReachableSet {
    let mut next = ReachableSet::new();
    for state in current {
        next.extend(ndfa.get_targets(state, input).iter().cloned());
    }
    next
}

/// Run the automaton from `start` over `inputs`, recording the reachable states after each input
pub fn process<S: AsRef<str>>(ndfa: &Ndfa, start: &str, inputs: &[S]) -> SimulationTrace {
    let mut current = ReachableSet::new();
    current.insert(start.to_string());

    let mut transitions = Vec::with_capacity(inputs.len() + 1);
    transitions.push(Transition {
        input: None,
        states: current.clone(),
    });

    for input in inputs {
        let input = input.as_ref();
        let next = step(ndfa, &current, input);
        trace!("Input {}: {:?} -> {:?}", input, current, next);

        transitions.push(Transition {
            input: Some(input.to_string()),
            states: next.clone(),
        });
        current = next;
    }

    SimulationTrace { transitions }
}

/// Run a parsed simulation request against the automaton
pub fn process_request(ndfa: &Ndfa, request: &SimulationRequest) -> SimulationTrace {
    process(ndfa, request.get_start(), request.get_inputs())
}
