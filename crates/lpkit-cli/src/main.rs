use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use lpkit_solver::table::{linear_expression, short};
use lpkit_solver::wire::{ProblemInput, SolutionOutput};
use lpkit_solver::{plot, LpProblem, Method, Solver};

#[derive(Parser)]
#[command(name = "lpkit")]
#[command(about = "Solve small linear programs and show the work", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a model and print the solution with its tableau trace
    Solve {
        /// A text model, or a .json problem record
        file: PathBuf,
        /// graphical, simplex or general
        #[arg(short, long, default_value = "graphical")]
        method: Method,
        /// Output format
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: Format,
        /// Iteration cap of the simplex method
        #[arg(long, default_value_t = 100)]
        max_iterations: usize,
    },
    /// Check a model for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
    /// Parse a model and print the compiled problem
    Parse {
        /// The file to parse
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: Format,
    },
    /// Print the vertices of a two-variable feasible region
    Region {
        /// The file containing the model
        file: PathBuf,
    },
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

/// `.json` files hold a problem record, anything else is a text model
fn load_problem(file: &Path) -> LpProblem {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => fail(format!("Error reading file: {}", e)),
    };

    let is_json = file.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let input: ProblemInput = match serde_json::from_str(&source) {
            Ok(input) => input,
            Err(e) => fail(format!("Invalid problem record: {}", e)),
        };
        match LpProblem::try_from(input) {
            Ok(problem) => problem,
            Err(e) => fail(format!("Invalid problem record: {}", e)),
        }
    } else {
        match lpkit_lang::parse_problem(&source) {
            Ok(problem) => problem,
            Err(e) => fail(format!("Error: {}", e)),
        }
    }
}

fn print_problem(problem: &LpProblem) {
    let sense = match problem.objective.sense {
        lpkit_solver::Sense::Max => "max",
        lpkit_solver::Sense::Min => "min",
    };
    println!("{}: {}", sense, linear_expression(&problem.objective.coefficients, &problem.variables));
    for c in &problem.constraints {
        println!(
            "{}: {} {} {}",
            c.name,
            linear_expression(&c.coefficients, &problem.variables),
            c.op.symbol(),
            short(c.rhs)
        );
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            method,
            format,
            max_iterations,
        } => {
            let problem = load_problem(&file);
            info!(
                "loaded {} variables, {} constraints from {}",
                problem.num_variables(),
                problem.num_constraints(),
                file.display()
            );

            let solver = Solver::new().with_max_iterations(max_iterations);
            let solution = solver.solve(&problem, method);

            match format {
                Format::Json => match serde_json::to_string_pretty(&SolutionOutput::from(&solution)) {
                    Ok(json) => println!("{}", json),
                    Err(e) => fail(format!("Error: {}", e)),
                },
                Format::Pretty => {
                    if let Some(used) = solution.method {
                        println!("Method: {}", used);
                    }
                    println!("Status: {}", solution.status.as_str().to_uppercase());
                    if solution.is_valid() {
                        println!("Objective value: {:.4}", solution.value);
                        println!();
                        for (name, value) in problem.variables.iter().zip(&solution.coordinates) {
                            println!("  {:10} {:12.4}", name, value);
                        }
                        println!();
                        print!("{}", solution.table);
                    }
                }
            }

            if !solution.is_valid() {
                std::process::exit(1);
            }
        }
        Commands::Check { file } => {
            let problem = load_problem(&file);
            if let Err(e) = problem.validate() {
                fail(format!("Error: {}", e));
            }
            println!(
                "OK: {} variables, {} constraints",
                problem.num_variables(),
                problem.num_constraints()
            );
        }
        Commands::Parse { file, format } => {
            let problem = load_problem(&file);
            match format {
                Format::Json => match serde_json::to_string_pretty(&ProblemInput::from(&problem)) {
                    Ok(json) => println!("{}", json),
                    Err(e) => fail(format!("Error: {}", e)),
                },
                Format::Pretty => print_problem(&problem),
            }
        }
        Commands::Region { file } => {
            let problem = load_problem(&file).normalized();
            if problem.num_variables() != 2 {
                fail(format!(
                    "Error: a feasible region needs exactly 2 variables, got {}",
                    problem.num_variables()
                ));
            }
            let vertices = plot::feasible_region(&problem);
            if vertices.is_empty() {
                fail("The feasible region is empty");
            }
            for v in vertices {
                println!("({}, {})", short(v.x), short(v.y));
            }
        }
    }
}
