//! # ndfasim
//!
//! A simulator for non-deterministic finite automata.
//!
//! This library provides functionality to:
//! - Parse a semicolon separated automaton description into an immutable NDFA
//! - Simulate the NDFA over a sequence of inputs, tracking every reachable state
//! - Render the automaton and the simulation traces as text
//! - Save the automaton as a JSON snapshot or as a Graphviz DOT graph

pub mod driver;
pub mod fa;
pub mod ndfa;
pub mod parser;
pub mod presenter;
pub mod simulator;
pub mod visualizer;

// Re-export commonly used functions for convenience
pub use driver::{run, run_and_report, DriverConfig};
pub use ndfa::{load_ndfa, Ndfa, NdfaBuilder, NdfaError};
pub use parser::{parse_ndfa_lines, parse_request_line, read_ndfa_file, read_request_file};
pub use simulator::{process, process_request, step, SimulationRequest, SimulationTrace};
pub use visualizer::save_dot;
