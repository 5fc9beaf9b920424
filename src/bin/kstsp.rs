//! kstsp CLI: solve a k-similar two-instance TSP from a coordinate file.

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use env_logger::{Builder, Target, WriteStyle};
use log::{Level, LevelFilter};
use serde::Serialize;

use u_kstsp::formulation::{DualCycleFormulation, Similarity, SimilaritySense};
use u_kstsp::lagrangian::{SubgradientConfig, SubgradientSolver, SubgradientState};
use u_kstsp::milp::{MilpModel, SolverConfig};
use u_kstsp::models::{DualTourSolution, Instance, Side};

/// Exit code used when the watchdog fires.
const TIMEOUT_EXIT_CODE: i32 = 124;

#[derive(Parser)]
#[command(name = "kstsp")]
#[command(about = "Two Hamiltonian cycles with at least k shared edges")]
#[command(version)]
struct Cli {
    /// Coordinate file, one `x1 y1 x2 y2` line per vertex
    file: PathBuf,

    /// Use only the first N vertices
    #[arg(short = 'n', long = "vertices", default_value_t = 250)]
    vertices: usize,

    /// Similarity threshold
    #[arg(short, default_value_t = 0)]
    k: usize,

    /// Direction of the similarity constraint
    #[arg(long, value_enum, default_value_t = SenseArg::AtLeast)]
    similarity: SenseArg,

    /// Direct dual-cycle MILP or Lagrangian subgradient bounds
    #[arg(short, long, value_enum, default_value_t = Mode::Lagrangian)]
    mode: Mode,

    /// Step multiplier of the subgradient method
    #[arg(long, default_value_t = 1.0)]
    pi: f64,

    /// Initial value of every multiplier
    #[arg(long, default_value_t = 1.0)]
    l0: f64,

    /// Subgradient iteration cap
    #[arg(long = "max-iter", default_value_t = 1000)]
    max_iter: usize,

    /// Largest multiplier change counted as converged
    #[arg(long, default_value_t = 1e-5)]
    tolerance: f64,

    /// Factor applied to pi after every iteration
    #[arg(long = "pi-decay", default_value_t = 1.0)]
    pi_decay: f64,

    /// Wall-clock budget in minutes; 0 disables it
    #[arg(long, default_value_t = 30.0)]
    timeout: f64,

    /// Print both tours
    #[arg(long)]
    tour: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log every solve round at info level
    #[arg(short, long)]
    verbose: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum Mode {
    Direct,
    Lagrangian,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SenseArg {
    AtLeast,
    AtMost,
    Exactly,
}

impl From<SenseArg> for SimilaritySense {
    fn from(arg: SenseArg) -> Self {
        match arg {
            SenseArg::AtLeast => Self::AtLeast,
            SenseArg::AtMost => Self::AtMost,
            SenseArg::Exactly => Self::Exactly,
        }
    }
}

#[derive(Debug, Serialize)]
struct Report {
    mode: Mode,
    vertices: usize,
    similarity: Similarity,
    min_cost: f64,
    num_vars: usize,
    num_constraints: usize,
    num_lazy_constraints: usize,
    elapsed_secs: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    lower_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upper_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iterations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<SubgradientState>,
    solution: Option<DualTourSolution>,
}

impl Report {
    fn new(mode: Mode, instance: &Instance, similarity: Similarity, model: &MilpModel) -> Self {
        Self {
            mode,
            vertices: instance.len(),
            similarity,
            min_cost: f64::NAN,
            num_vars: model.num_vars(),
            num_constraints: model.num_constraints(),
            num_lazy_constraints: model.num_lazy_constraints(),
            elapsed_secs: 0.0,
            lower_bound: None,
            upper_bound: None,
            iterations: None,
            state: None,
            solution: None,
        }
    }

    fn print(&self, show_tours: bool) {
        println!("Minimum Cost: {}", self.min_cost);
        if let (Some(lb), Some(ub)) = (self.lower_bound, self.upper_bound) {
            println!("Bounds: {lb} <= z <= {ub}");
        }
        if let (Some(iterations), Some(state)) = (self.iterations, self.state) {
            println!("Iterations: {iterations} ({state:?})");
        }
        println!("Num Vars: {}", self.num_vars);
        println!("Num Consts: {}", self.num_constraints);
        println!("Lazy Cuts: {}", self.num_lazy_constraints);
        println!("Execution time: {:.3} s", self.elapsed_secs);

        let Some(solution) = &self.solution else {
            return;
        };
        for (i, side) in Side::BOTH.into_iter().enumerate() {
            println!("Tour {} cost: {}", i + 1, solution.cost(side));
        }
        println!("Shared edges: {}", solution.shared_edges());
        if show_tours {
            for (i, side) in Side::BOTH.into_iter().enumerate() {
                let order: Vec<String> = solution
                    .tour(side)
                    .vertices()
                    .iter()
                    .map(|v| v.to_string())
                    .collect();
                println!("Tour {}: {}", i + 1, order.join(" "));
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level)?;
    spawn_watchdog(cli.timeout);

    let instance = Instance::from_file(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?
        .truncate(cli.vertices);
    let similarity = Similarity::new(cli.k, cli.similarity.into());
    let solver = SolverConfig::new("ksTSP")
        .with_verbose(cli.verbose)
        .with_time_limit_secs(cli.timeout * 60.0);

    log::info!(
        "{} vertices, similarity {similarity}, mode {:?}",
        instance.len(),
        cli.mode
    );

    let start = Instant::now();
    let mut report = match cli.mode {
        Mode::Direct => solve_direct(&instance, similarity, &solver)?,
        Mode::Lagrangian => {
            let config = SubgradientConfig::default()
                .with_pi(cli.pi)
                .with_initial_multiplier(cli.l0)
                .with_max_iterations(cli.max_iter)
                .with_tolerance(cli.tolerance)
                .with_pi_decay(cli.pi_decay);
            solve_lagrangian(&instance, similarity, &solver, config)?
        }
    };
    report.elapsed_secs = start.elapsed().as_secs_f64();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print(cli.tour);
    }
    Ok(())
}

fn solve_direct(
    instance: &Instance,
    similarity: Similarity,
    solver: &SolverConfig,
) -> anyhow::Result<Report> {
    let mut problem = DualCycleFormulation::build(instance, similarity, solver)?;
    let cost = problem.solve()?;

    let mut report = Report::new(Mode::Direct, instance, similarity, problem.model());
    report.min_cost = cost;
    report.solution = problem.solution();
    Ok(report)
}

fn solve_lagrangian(
    instance: &Instance,
    similarity: Similarity,
    solver: &SolverConfig,
    config: SubgradientConfig,
) -> anyhow::Result<Report> {
    let mut subgradient = SubgradientSolver::new(instance, similarity, solver, config)?;
    let outcome = subgradient.run()?;

    let mut report = Report::new(
        Mode::Lagrangian,
        instance,
        similarity,
        subgradient.problem().model(),
    );
    report.min_cost = outcome.lower_bound;
    report.lower_bound = Some(outcome.lower_bound);
    report.upper_bound = Some(outcome.upper_bound);
    report.iterations = Some(outcome.iterations);
    report.state = Some(outcome.state);
    report.solution = outcome.best_primal;
    Ok(report)
}

/// Terminates the process once `minutes` have elapsed, whatever the solver
/// is doing.
fn spawn_watchdog(minutes: f64) {
    if !(minutes.is_finite() && minutes > 0.0) {
        return;
    }
    let limit = Duration::from_secs_f64(minutes * 60.0);
    std::thread::spawn(move || {
        std::thread::sleep(limit);
        log::error!("timeout after {minutes} min");
        eprintln!("kstsp: timeout after {minutes} min");
        std::process::exit(TIMEOUT_EXIT_CODE);
    });
}

fn init_logger(level: LevelFilter) -> anyhow::Result<()> {
    Builder::new()
        .filter_level(level)
        .write_style(WriteStyle::Never)
        .target(Target::Stderr)
        .format(|buf, record| writeln!(buf, "{} {}", level_tag(record.level()), record.args()))
        .try_init()
        .context("logger init failed")
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
