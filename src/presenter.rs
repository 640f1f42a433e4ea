/* Text rendering of automata and simulation traces. Sets print as set[A,B] and transition tables
 * as map[0->set[A],1->set[B]], both in sorted order. */

use std::fmt;

use crate::fa::ReachableSet;
use crate::ndfa::{Ndfa, TransitionTable};
use crate::simulator::SimulationTrace;

pub fn format_states(states: &ReachableSet) -> String {
    let states: Vec<&str> = states.iter().map(|state| state.as_str()).collect();
    format!("set[{}]", states.join(","))
}

pub fn format_transition_table(table: &TransitionTable) -> String {
    let entries: Vec<String> = table
        .iter()
        .map(|(input, targets)| format!("{}->{}", input, format_states(targets)))
        .collect();
    format!("map[{}]", entries.join(","))
}

impl fmt::Display for Ndfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The Non-Deterministic Finite Automaton's Description")?;
        for (state, table) in self.get_states() {
            writeln!(
                f,
                "  {} transitions: {}",
                state,
                format_transition_table(table)
            )?;
        }
        Ok(())
    }
}

// The stop line repeats the states of the last entry, which were already printed as the last
// input line.
impl fmt::Display for SimulationTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Start state = {}", format_states(self.get_start_states()))?;
        for transition in self.iter().skip(1) {
            writeln!(
                f,
                "  Input = {}; new states = {}",
                transition.get_input().unwrap_or_default(),
                format_states(transition.get_states())
            )?;
        }
        writeln!(f, "Stop state(s) = {}", format_states(self.get_stop_states()))
    }
}
