use std::collections::BTreeSet;

/// A state of the automaton. States are compared by exact string equality.
pub type State = String;

/// An input symbol consumed by a transition.
pub type Input = String;

/// The set of states the automaton could currently be in.
pub type ReachableSet = BTreeSet<State>;

pub trait FA {
    fn get_num_states(&self) -> usize;
    fn get_alphabet(&self) -> BTreeSet<&str>;
    fn get_all_states(&self) -> BTreeSet<&str>;
    fn get_state_transitions(&self, state: &str) -> Vec<(&str, &str)>;
}
