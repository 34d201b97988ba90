// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! `shuttle`: solves a JSON shuttle request read from a file or stdin and
//! prints the JSON response on stdout.

use clap::{Parser, ValueEnum};
use shuttle_model::{err::MalformedInput, objective::TieBreak};
use shuttle_solver::{
    api::{SolveRequest, SolveResponse, solve_request},
    config::{SolverBuilder, SolverConfig},
};
use std::{
    fs::File,
    io::{BufReader, Read, Write},
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_TIME_LIMIT_MS: u64 = 15_000;
const MAX_DEFAULT_WORKERS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TieBreakArg {
    FewerTrips,
    WaitOnly,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::FewerTrips => TieBreak::FewerTrips,
            TieBreakArg::WaitOnly => TieBreak::WaitOnly,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "shuttle",
    version,
    about = "Assign arriving guests to shuttle trips with minimum total waiting time"
)]
struct Args {
    /// Path to a JSON solve request. Reads stdin when omitted or `-`.
    #[arg(value_name = "path")]
    request: Option<PathBuf>,
    /// Wall-clock budget for the search in milliseconds.
    #[arg(long, value_name = "ms", default_value_t = DEFAULT_TIME_LIMIT_MS)]
    time_limit_ms: u64,
    /// Number of search workers. Defaults to the available parallelism, capped at 8.
    #[arg(long, value_name = "n")]
    workers: Option<usize>,
    /// Secondary criterion among plans with equal total waiting time.
    /// A `tie_break` in the request takes precedence.
    #[arg(long, value_enum)]
    tie_break: Option<TieBreakArg>,
    /// Pretty-print the JSON response.
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn solver_config(&self) -> SolverConfig {
        let workers = self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                .min(MAX_DEFAULT_WORKERS)
        });
        let mut builder = SolverBuilder::new()
            .with_time_limit(Duration::from_millis(self.time_limit_ms))
            .with_num_workers(workers);
        if let Some(tie_break) = self.tie_break {
            builder = builder.with_tie_break(tie_break.into());
        }
        builder.build()
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read request: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse request: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed input in `{}`: {}", .0.field(), .0)]
    MalformedInput(#[from] MalformedInput),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Io(_) => 1,
            CliError::Json(_) | CliError::MalformedInput(_) => 2,
        }
    }
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn read_request(path: Option<&PathBuf>) -> Result<SolveRequest, CliError> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let reader = BufReader::new(File::open(path)?);
            Ok(serde_json::from_reader(reader)?)
        }
        _ => {
            let mut raw = String::new();
            std::io::stdin().lock().read_to_string(&mut raw)?;
            Ok(serde_json::from_str(&raw)?)
        }
    }
}

fn write_response(response: &SolveResponse, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{payload}")?;
    Ok(())
}

fn run(args: &Args) -> Result<(), CliError> {
    let request = read_request(args.request.as_ref())?;
    let config = args.solver_config();
    tracing::info!(
        guests = request.guests.len(),
        vehicles = request.num_vehicles,
        "solving request with {config}"
    );
    let response = solve_request(&request, &config)?;
    write_response(&response, args.pretty)
}

fn main() -> ExitCode {
    let args = Args::parse();
    enable_tracing();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("shuttle: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
