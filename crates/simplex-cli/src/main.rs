mod config;
mod error;
mod input;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use simplex_solver::format::{format_value, render_table, step_table};
use simplex_solver::{ConstraintOp, LpProblem, Solution, SolutionStatus, SolveReport, Solver, Step};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use config::{CliConfig, OutputFormat};
use error::CliError;
use input::ProblemInput;

#[derive(Parser)]
#[command(name = "simplex")]
#[command(version, about = "Solve linear programs with the tableau simplex method", long_about = None)]
struct Cli {
    /// YAML file with default settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a JSON problem file and print the solution
    Solve {
        /// The problem file
        file: PathBuf,
        /// Maximum number of pivots
        #[arg(short = 'n', long)]
        max_iterations: Option<usize>,
        /// Allow >=, = and negative right-hand sides (two-phase simplex)
        #[arg(long)]
        two_phase: bool,
        /// Print every tableau of the solve
        #[arg(short, long)]
        steps: bool,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Check a problem file for errors
    Check {
        /// The file to check
        file: PathBuf,
        /// Validate as a two-phase problem
        #[arg(long)]
        two_phase: bool,
    },
    /// Solve the built-in sandal factory example
    Demo {
        /// Print every tableau of the solve
        #[arg(short, long)]
        steps: bool,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

/// JSON shape printed by `--format json`
#[derive(Serialize)]
struct JsonOutput<'a> {
    variables: &'a [String],
    solution: &'a Solution,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<&'a [Step]>,
}

/// Maximize 12000 x1 + 10000 x2 subject to sponge and glue limits
fn sandal_factory() -> LpProblem {
    let mut problem = LpProblem::maximize(vec![12000.0, 10000.0]);
    problem.add_constraint("sponge", vec![908.0, 910.0], ConstraintOp::Le, 2_000_000.0);
    problem.add_constraint("glue", vec![67.0, 80.0], ConstraintOp::Le, 150_000.0);
    problem
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(CliConfig::load).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    let level = config.log_level(cli.quiet, cli.verbose);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}

fn run(command: Commands, config: &CliConfig) -> Result<ExitCode, CliError> {
    match command {
        Commands::Solve {
            file,
            max_iterations,
            two_phase,
            steps,
            format,
        } => {
            let problem = read_problem(&file)?;
            let solver = Solver::new()
                .with_max_iterations(config.max_iterations(max_iterations))
                .with_two_phase(config.two_phase(two_phase));
            info!(
                file = %file.display(),
                max_iterations = solver.max_iterations(),
                two_phase = solver.two_phase(),
                "solving"
            );
            let report = solver.solve(&problem)?;
            print_report(&problem, &report, steps, config.format(format))
        }
        Commands::Check { file, two_phase } => {
            let problem = read_problem(&file)?;
            match problem.validate(config.two_phase(two_phase)) {
                Ok(()) => {
                    println!("✓ {} is valid", file.display());
                    println!("  {} variables", problem.num_variables());
                    println!("  {} constraints", problem.num_constraints());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("✗ {} has errors:", file.display());
                    eprintln!("  {}", e);
                    Ok(ExitCode::from(1))
                }
            }
        }
        Commands::Demo { steps, format } => {
            let problem = sandal_factory();
            let solver = Solver::new().with_max_iterations(config.max_iterations(None));
            let report = solver.solve(&problem)?;
            print_report(&problem, &report, steps, config.format(format))
        }
    }
}

fn read_problem(path: &Path) -> Result<LpProblem, CliError> {
    let source = std::fs::read_to_string(path).map_err(|e| CliError::Io(path.display().to_string(), e))?;
    let input = ProblemInput::from_json(&source).map_err(|e| CliError::Json(path.display().to_string(), e))?;
    Ok(input.into_problem()?)
}

fn print_report(
    problem: &LpProblem,
    report: &SolveReport,
    steps: bool,
    format: OutputFormat,
) -> Result<ExitCode, CliError> {
    let solution = &report.solution;

    match format {
        OutputFormat::Json => {
            let output = JsonOutput {
                variables: &problem.variables,
                solution,
                steps: steps.then_some(report.steps.as_slice()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Pretty => {
            if steps {
                for step in &report.steps {
                    println!("Step {}: {}", step.number, step.description);
                    print!("{}", render_table(&step_table(step)));
                    println!();
                }
            }

            match solution.status {
                SolutionStatus::Optimal => println!("Status: OPTIMAL"),
                SolutionStatus::Unbounded => {
                    println!("Status: UNBOUNDED");
                    println!("The objective can be improved without limit.");
                }
                SolutionStatus::Infeasible => {
                    println!("Status: INFEASIBLE");
                    println!("No solution exists that satisfies all constraints.");
                }
                SolutionStatus::IterationLimitReached => {
                    println!("Status: ITERATION LIMIT REACHED");
                    println!("Stopped after {} pivots; the values below are not optimal.", solution.iterations);
                }
            }
            println!("Objective: {}", format_value(solution.objective_value));
            println!("Iterations: {}", solution.iterations);
            println!();
            println!("Variables:");
            for (name, value) in problem.variables.iter().zip(&solution.values) {
                println!("  {:10} {:>14}", name, format_value(*value));
            }
        }
    }

    if solution.is_optimal() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}
