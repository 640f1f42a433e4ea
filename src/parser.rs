/* Reads the semicolon separated automaton description and simulation request files. Tokens are
 * used verbatim, nothing is trimmed and semicolons cannot be escaped. */

use color_eyre::eyre::Result;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::ndfa::{Ndfa, NdfaBuilder, NdfaError};
use crate::simulator::SimulationRequest;

const SEPARATOR: char = ';';

/// A single parsed description line: the source state followed by its (input, target) pairs
#[derive(Debug, PartialEq, Eq)]
pub struct NdfaLine<'a> {
    pub state: &'a str,
    pub transitions: Vec<(&'a str, &'a str)>,
}

fn malformed(line_number: usize, line: &str, reason: String) -> NdfaError {
    NdfaError::MalformedLine {
        line_number,
        line: line.to_string(),
        reason,
    }
}

/// Parse one line of the form `STATE;INPUT_1;TARGET_1;INPUT_2;TARGET_2;...`
pub fn parse_ndfa_line(line_number: usize, line: &str) -> Result<NdfaLine<'_>, NdfaError> {
    if line.is_empty() {
        return Err(malformed(
            line_number,
            line,
            "missing source state".to_string(),
        ));
    }

    let mut tokens = line.split(SEPARATOR);
    let state = tokens.next().unwrap_or_default();
    let rest: Vec<&str> = tokens.collect();

    if rest.len() % 2 != 0 {
        let dangling = rest[rest.len() - 1];
        return Err(malformed(
            line_number,
            line,
            format!("input \"{}\" has no target state", dangling),
        ));
    }

    let transitions = rest.chunks(2).map(|pair| (pair[0], pair[1])).collect();

    Ok(NdfaLine { state, transitions })
}

/// Apply every description line to the builder in order. A malformed line is rejected as a whole
/// and stops the parse, the lines before it stay applied to the builder.
pub fn apply_ndfa_lines<I, S>(builder: &mut NdfaBuilder, lines: I) -> Result<(), NdfaError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (index, line) in lines.into_iter().enumerate() {
        builder.add_line(index + 1, line.as_ref())?;
    }
    Ok(())
}

/// Build an automaton from a list of description lines
pub fn parse_ndfa_lines<I, S>(lines: I) -> Result<Ndfa, NdfaError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = NdfaBuilder::new();
    apply_ndfa_lines(&mut builder, lines)?;
    Ok(builder.finalize())
}

/// Parse one simulation request of the form `START;INPUT_1;INPUT_2;...;INPUT_n`
pub fn parse_request_line(line_number: usize, line: &str) -> Result<SimulationRequest, NdfaError> {
    if line.is_empty() {
        return Err(malformed(line_number, line, "missing start state".to_string()));
    }

    let mut tokens = line.split(SEPARATOR);
    let start = tokens.next().unwrap_or_default();
    let inputs = tokens.map(|input| input.to_string()).collect();

    Ok(SimulationRequest::new(start.to_string(), inputs))
}

fn read_lines(file_path: &str, description: &str) -> Result<Vec<String>, NdfaError> {
    let file_path = PathBuf::from(file_path);

    let file = match File::open(&file_path) {
        Ok(file) => file,
        Err(error) => {
            let err_line = format!(
                "Error: Failed to open the {} file {}: {}",
                description,
                file_path.display(),
                error
            );
            return Err(NdfaError::FileOpenError(err_line));
        }
    };
    let reader = BufReader::new(file);

    let mut line_list: Vec<String> = Vec::new();

    for (line_number, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                let err_line = format!(
                    "Error: Failed to read line number {} in the {} file {}",
                    line_number + 1,
                    description,
                    error
                );
                return Err(NdfaError::FileReadError(err_line));
            }
        };
        line_list.push(line);
    }

    debug!(
        "Read {} lines from the {} file {}",
        line_list.len(),
        description,
        file_path.display()
    );
    Ok(line_list)
}

/// Read an automaton description file and build the automaton it describes
pub fn read_ndfa_file(file_path: &str) -> Result<Ndfa> {
    let lines = read_lines(file_path, "automaton")?;
    let ndfa = parse_ndfa_lines(lines)?;
    debug!("Parsed automaton {} with {} states", file_path, ndfa.get_states().count());
    Ok(ndfa)
}

/// Read a simulation request file. The raw lines are returned so they can be echoed before each
/// simulation, parse them with `parse_request_line`.
pub fn read_request_file(file_path: &str) -> Result<Vec<String>> {
    let lines = read_lines(file_path, "simulation request")?;
    Ok(lines)
}
