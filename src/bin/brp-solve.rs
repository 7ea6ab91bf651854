//! Command-line entry point: reads an instance, runs the solver, and
//! prints its report. Grounded on `original_source/main/solve.c`'s
//! `main()` (the `--input`/`--time_limit` option pair, the instance grid
//! printed before solving, the solution path printed after), rebuilt on
//! `clap::Parser` in the style of the pack's CLI examples, with
//! `tracing-subscriber` driving the `[start]/[running]/[deepen]/[update]/
//! [goal]/[end]` progress lines that `debug_info` used to print directly.

use brp::config::constant;
use brp::{io, solve, BrpError};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Solve a block relocation / container pre-marshalling instance by
/// iterative-deepening branch-and-bound.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input instance file.
    #[arg(short, long, default_value = constant::DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Time limit in seconds.
    #[arg(short, long, default_value_t = constant::DEFAULT_TIME_LIMIT_SECS)]
    time_limit: u64,

    /// Emit the report as JSON instead of the human-readable summary.
    #[arg(long)]
    json: bool,

    /// Suppress the instance grid and progress log; print only the result.
    #[arg(short, long)]
    quiet: bool,
}

fn run(args: Args) -> Result<(), BrpError> {
    let file = File::open(&args.input)?;
    let inst = io::read_instance(BufReader::new(file))?;

    if !args.quiet {
        let mut grid = String::new();
        inst.print_grid(&mut grid).expect("writing to a String never fails");
        print!("{grid}");
    }

    let report = solve(&inst, Duration::from_secs(args.time_limit));

    match report {
        None => {
            println!("{}", "no feasible solution exists for this instance".red());
        }
        Some(report) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let status = if report.is_optimal() {
                    "optimal".green()
                } else {
                    "time limit reached".yellow()
                };
                println!("{status}");
                println!("{report}");
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("error: {err}").red());
            ExitCode::FAILURE
        }
    }
}
