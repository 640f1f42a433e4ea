/* Orchestrates one run: read the automaton, print it, then simulate every request line of the
 * request file. File paths that are not configured are prompted for on the input stream. */

use clap::{Arg, ArgMatches, Command};
use color_eyre::eyre::Result;
use log::{debug, info};
use std::io::{BufRead, Write};

use crate::ndfa::NdfaError;
use crate::parser::{parse_request_line, read_ndfa_file, read_request_file};
use crate::simulator::process_request;
use crate::visualizer::save_dot;

const NDFA_PROMPT: &str = "Enter a non-deterministic finite automaton's file: ";
const REQUEST_PROMPT: &str = "Enter the name of a file with the start-states and input: ";
const DOT_FILE_NAME: &str = "constructed_ndfa";

#[derive(Debug, Default, Clone)]
pub struct DriverConfig {
    /// Automaton description file, prompted for when None
    pub automaton_file: Option<String>,
    /// Simulation request file, prompted for when None
    pub request_file: Option<String>,
    /// Write the automaton as a DOT graph after reading it
    pub save_dot: bool,
    /// Write a JSON snapshot of the automaton to this file after reading it
    pub save_json: Option<String>,
    /// Exit with a failure status when an error was reported
    pub strict: bool,
}

/// The command line interface of the ndfasim binary
pub fn build_command() -> Command {
    Command::new("ndfasim")
                        .version("1.0")
                        .about("Simulate a non-deterministic finite automaton over a list of inputs and report the reachable states after every input")
                        .arg(
                            Arg::new("automaton")
                                .short('a')
                                .long("automaton")
                                .value_name("AUTOMATON FILE")
                                .value_parser(clap::value_parser!(String))
                                .help("The automaton description file. Each line holds a state followed by input and target state pairs, all separated by semicolons. Prompted for when not provided")
                        )
                        .arg(
                            Arg::new("requests")
                                .short('r')
                                .long("requests")
                                .value_name("REQUEST FILE")
                                .value_parser(clap::value_parser!(String))
                                .help("The simulation request file. Each line holds a start state followed by its inputs, all separated by semicolons. Prompted for when not provided")
                        )
                        .arg(
                            Arg::new("save-dot")
                                .short('d')
                                .long("save-dot")
                                .help("Save the automaton as a Graphviz graph in constructed_ndfa.dot")
                                .action(clap::ArgAction::SetTrue)
                        )
                        .arg(
                            Arg::new("save-json")
                                .short('j')
                                .long("save-json")
                                .value_name("JSON FILE")
                                .value_parser(clap::value_parser!(String))
                                .help("Save a JSON snapshot of the automaton to the given file")
                        )
                        .arg(
                            Arg::new("strict")
                                .short('s')
                                .long("strict")
                                .help("Exit with a non-zero status when an error is reported")
                                .action(clap::ArgAction::SetTrue)
                        )
}

impl DriverConfig {
    pub fn from_matches(args: &ArgMatches) -> Self {
        DriverConfig {
            automaton_file: args.get_one::<String>("automaton").cloned(),
            request_file: args.get_one::<String>("requests").cloned(),
            save_dot: args.get_flag("save-dot"),
            save_json: args.get_one::<String>("save-json").cloned(),
            strict: args.get_flag("strict"),
        }
    }

    /// The process exit status for a run. Reported errors only fail the process in strict mode.
    pub fn exit_status(&self, success: bool) -> u8 {
        if success || !self.strict {
            0
        } else {
            1
        }
    }
}

fn prompt_for_path<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut path = String::new();
    if let Err(error) = input.read_line(&mut path) {
        let err_line = format!("Error: Failed to read the file name {}", error);
        return Err(NdfaError::FileReadError(err_line).into());
    }

    let path = path.trim_end_matches(['\n', '\r']).to_string();
    Ok(path)
}

fn get_path<R: BufRead, W: Write>(
    configured: &Option<String>,
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    match configured {
        Some(path) => Ok(path.clone()),
        None => prompt_for_path(prompt, input, output),
    }
}

/// Run the whole read, print and simulate pipeline. The first error stops the run.
pub fn run<R: BufRead, W: Write>(config: &DriverConfig, input: &mut R, output: &mut W) -> Result<()> {
    let ndfa_path = get_path(&config.automaton_file, NDFA_PROMPT, input, output)?;
    let ndfa = read_ndfa_file(&ndfa_path)?;
    info!("Loaded automaton {}", ndfa_path);

    write!(output, "{}", ndfa)?;
    writeln!(output)?;

    if config.save_dot {
        save_dot(&ndfa, DOT_FILE_NAME)?;
    }

    if let Some(json_path) = &config.save_json {
        ndfa.save_ndfa(json_path)?;
    }

    let request_path = get_path(&config.request_file, REQUEST_PROMPT, input, output)?;
    let requests = read_request_file(&request_path)?;
    writeln!(output)?;

    for (index, line) in requests.iter().enumerate() {
        writeln!(output, "Starting new simulation with description: {}", line)?;

        let request = parse_request_line(index + 1, line)?;
        let trace = process_request(&ndfa, &request);
        debug!(
            "Request {} finished with {} reachable states",
            index + 1,
            trace.get_stop_states().len()
        );

        write!(output, "{}", trace)?;
        writeln!(output)?;
    }

    Ok(())
}

/// Run the pipeline and print any error to the output instead of returning it. Returns false when
/// an error was reported.
pub fn run_and_report<R: BufRead, W: Write>(
    config: &DriverConfig,
    input: &mut R,
    output: &mut W,
) -> bool {
    match run(config, input, output) {
        Ok(()) => true,
        Err(error) => {
            debug!("Run stopped: {:?}", error);
            if writeln!(output, "{}", error).is_err() {
                eprintln!("{}", error);
            }
            false
        }
    }
}
