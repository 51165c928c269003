use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bf_blocks::Signal;
use bf_core::NodeId;
use bf_graph::Graph;
use bf_lti::design::{self, FirBand, Response, Window};
use bf_lti::{LtiError, TransferFunction};
use bf_project::{Diagram, NodeIndex, ProjectError};
use bf_reduce::ReduceError;
use bf_sim::{SimError, SimOptions, SimPhase, SimProgress, Simulator};

#[derive(Parser)]
#[command(name = "bf-cli")]
#[command(about = "blockflow CLI - block diagram simulation and reduction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate diagram file syntax and structure
    Validate {
        /// Path to the diagram YAML or JSON file
        diagram_path: PathBuf,
    },
    /// Run a discrete-time simulation
    Simulate {
        /// Path to the diagram YAML or JSON file
        diagram_path: PathBuf,
        /// Step period in seconds (overrides the file)
        #[arg(long)]
        ts: Option<f64>,
        /// Number of steps (overrides the file)
        #[arg(long)]
        steps: Option<usize>,
        /// Noise seed (overrides the file)
        #[arg(long)]
        seed: Option<u64>,
        /// Print the full signal history of this node instead of sink summaries
        #[arg(long)]
        node: Option<String>,
        /// Write `time_s,value` CSV for --node (or every sink) to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Reduce a subsystem to one transfer function with Mason's gain formula
    Reduce {
        /// Path to the diagram YAML or JSON file
        diagram_path: PathBuf,
        /// Start node id (overrides the file)
        #[arg(long)]
        start: Option<String>,
        /// End node id (overrides the file)
        #[arg(long)]
        end: Option<String>,
    },
    /// Design a digital filter and print its coefficients
    Design {
        #[command(subcommand)]
        method: DesignMethod,
    },
}

#[derive(Subcommand)]
enum DesignMethod {
    /// FIR taps by the window method (cutoffs in rad/sample)
    Windowed {
        #[arg(value_enum)]
        band: BandArg,
        #[arg(value_enum)]
        window: WindowArg,
        /// Number of taps
        taps: usize,
        cutoff: f64,
        /// Upper edge for bandpass and bandstop
        cutoff2: Option<f64>,
    },
    /// Butterworth IIR through the bilinear transform
    Butterworth {
        #[arg(value_enum)]
        response: ResponseArg,
        order: usize,
        /// Cutoff in rad/sample
        cutoff: f64,
    },
    /// Chebyshev type I IIR through the bilinear transform
    Chebyshev {
        #[arg(value_enum)]
        response: ResponseArg,
        order: usize,
        /// Cutoff in rad/sample
        cutoff: f64,
        /// Passband ripple parameter
        #[arg(long, default_value_t = 0.2)]
        epsilon: f64,
    },
    /// Weighted least-squares linear-phase FIR
    LeastSquares {
        /// Odd number of taps
        taps: usize,
        /// Band edges as fractions of Nyquist, e.g. 0,0.4,0.5,1
        #[arg(long, value_delimiter = ',', required = true)]
        bands: Vec<f64>,
        /// Desired gain at each band edge
        #[arg(long, value_delimiter = ',', required = true)]
        amplitudes: Vec<f64>,
        /// One weight per band
        #[arg(long, value_delimiter = ',', required = true)]
        weights: Vec<f64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BandArg {
    Lowpass,
    Highpass,
    Bandpass,
    Bandstop,
}

#[derive(Clone, Copy, ValueEnum)]
enum WindowArg {
    Rectangular,
    Bartlett,
    Hann,
    Hamming,
}

impl From<WindowArg> for Window {
    fn from(w: WindowArg) -> Self {
        match w {
            WindowArg::Rectangular => Window::Rectangular,
            WindowArg::Bartlett => Window::Bartlett,
            WindowArg::Hann => Window::Hann,
            WindowArg::Hamming => Window::Hamming,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ResponseArg {
    Lowpass,
    Highpass,
}

impl From<ResponseArg> for Response {
    fn from(r: ResponseArg) -> Self {
        match r {
            ResponseArg::Lowpass => Response::Lowpass,
            ResponseArg::Highpass => Response::Highpass,
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Reduce(#[from] ReduceError),

    #[error(transparent)]
    Design(#[from] LtiError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Unknown node id '{0}'")]
    UnknownNode(String),

    #[error("Missing {0}: give it on the command line or in the diagram file")]
    Missing(&'static str),

    #[error("{0}")]
    Usage(&'static str),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { diagram_path } => cmd_validate(&diagram_path),
        Commands::Simulate {
            diagram_path,
            ts,
            steps,
            seed,
            node,
            output,
        } => cmd_simulate(
            &diagram_path,
            ts,
            steps,
            seed,
            node.as_deref(),
            output.as_deref(),
        ),
        Commands::Reduce {
            diagram_path,
            start,
            end,
        } => cmd_reduce(&diagram_path, start, end),
        Commands::Design { method } => cmd_design(method),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_validate(diagram_path: &Path) -> CliResult<()> {
    println!("Validating diagram: {}", diagram_path.display());
    let diagram = bf_project::load(diagram_path)?;
    let (graph, _) = diagram.to_graph()?;
    bf_graph::validate_for_simulation(&graph).map_err(ProjectError::from)?;
    println!(
        "✓ Diagram '{}' is valid ({} nodes, {} edges)",
        diagram.name,
        graph.nodes().len(),
        graph.edges().len()
    );
    Ok(())
}

fn cmd_simulate(
    diagram_path: &Path,
    ts: Option<f64>,
    steps: Option<usize>,
    seed: Option<u64>,
    node: Option<&str>,
    output: Option<&Path>,
) -> CliResult<()> {
    let diagram = bf_project::load(diagram_path)?;
    let opts = sim_options(&diagram, ts, steps, seed);
    let (mut graph, index) = diagram.to_graph()?;
    let focus = node.map(|id| resolve(&index, id)).transpose()?;
    tracing::info!(
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        "diagram loaded"
    );

    println!(
        "Simulating '{}': ts={}s, steps={}, seed={}",
        diagram.name, opts.ts, opts.steps, opts.seed
    );

    let mut sim = Simulator::new(opts)?;
    let mut last_decile = usize::MAX;
    let mut on_progress = |p: SimProgress| {
        let decile = p.step * 10 / p.steps.max(1);
        if p.phase == SimPhase::Stepping && decile != last_decile {
            render_progress(&p);
            last_decile = decile;
        }
    };
    let outcome = sim.run_with_progress(
        &mut graph,
        Some(&mut on_progress as &mut dyn FnMut(SimProgress)),
    )?;
    clear_progress_line();
    println!("✓ Simulation completed: {} steps", outcome.steps);

    let series: Vec<(String, Vec<(f64, f64)>)> = match focus {
        Some(id) => vec![(
            graph.name(id).to_string(),
            signal_series(outcome.history_of(id)),
        )],
        None => sink_traces(&graph),
    };

    if let Some(path) = output {
        std::fs::write(path, to_csv(&series))?;
        println!("✓ Exported {} series to {}", series.len(), path.display());
        return Ok(());
    }

    if focus.is_some() {
        print!("{}", to_csv(&series));
        return Ok(());
    }

    if series.is_empty() {
        println!("No sinks in diagram");
    }
    for (name, points) in &series {
        match points.last() {
            Some((t, v)) => println!("  {name}: {} samples, final y({t:.2}) = {v:.6}", points.len()),
            None => println!("  {name}: no samples"),
        }
    }
    Ok(())
}

fn cmd_reduce(diagram_path: &Path, start: Option<String>, end: Option<String>) -> CliResult<()> {
    let diagram = bf_project::load(diagram_path)?;
    let section = diagram.reduction.clone();
    let start = start
        .or_else(|| section.as_ref().map(|r| r.start.clone()))
        .ok_or(CliError::Missing("start node"))?;
    let end = end
        .or_else(|| section.as_ref().map(|r| r.end.clone()))
        .ok_or(CliError::Missing("end node"))?;

    let (graph, index) = diagram.to_graph()?;
    let reduction = bf_reduce::reduce(&graph, resolve(&index, &start)?, resolve(&index, &end)?)?;

    println!("{reduction}");
    println!();
    println!("T({start} -> {end}) = {}", reduction.transfer_function);
    Ok(())
}

fn cmd_design(method: DesignMethod) -> CliResult<()> {
    match method {
        DesignMethod::Windowed {
            band,
            window,
            taps,
            cutoff,
            cutoff2,
        } => {
            let band = match (band, cutoff2) {
                (BandArg::Lowpass, None) => FirBand::Lowpass(cutoff),
                (BandArg::Highpass, None) => FirBand::Highpass(cutoff),
                (BandArg::Bandpass, Some(hi)) => FirBand::Bandpass(cutoff, hi),
                (BandArg::Bandstop, Some(hi)) => FirBand::Bandstop(cutoff, hi),
                (BandArg::Lowpass | BandArg::Highpass, Some(_)) => {
                    return Err(CliError::Usage(
                        "lowpass and highpass take a single cutoff",
                    ));
                }
                (BandArg::Bandpass | BandArg::Bandstop, None) => {
                    return Err(CliError::Usage("bandpass and bandstop need two cutoffs"));
                }
            };
            let h = design::windowed_fir(band, window.into(), taps)?;
            println!("taps: {}", join(&h));
        }
        DesignMethod::Butterworth {
            response,
            order,
            cutoff,
        } => print_iir(&design::butterworth(order, cutoff, response.into())?),
        DesignMethod::Chebyshev {
            response,
            order,
            cutoff,
            epsilon,
        } => print_iir(&design::chebyshev1(order, cutoff, epsilon, response.into())?),
        DesignMethod::LeastSquares {
            taps,
            bands,
            amplitudes,
            weights,
        } => {
            let h = design::least_squares_fir(&bands, &amplitudes, &weights, taps)?;
            println!("taps: {}", join(&h));
        }
    }
    Ok(())
}

fn print_iir(tf: &TransferFunction) {
    println!("num: {}", join(tf.num()));
    println!("den: {}", join(tf.den()));
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// File values first, then command-line overrides.
fn sim_options(
    diagram: &Diagram,
    ts: Option<f64>,
    steps: Option<usize>,
    seed: Option<u64>,
) -> SimOptions {
    let mut opts = SimOptions::default();
    if let Some(sim) = &diagram.simulation {
        opts.ts = sim.ts;
        opts.steps = sim.steps;
        opts.seed = sim.seed;
    }
    if let Some(ts) = ts {
        opts.ts = ts;
    }
    if let Some(steps) = steps {
        opts.steps = steps;
    }
    if let Some(seed) = seed {
        opts.seed = seed;
    }
    opts
}

fn resolve(index: &NodeIndex, id: &str) -> CliResult<NodeId> {
    index
        .get(id)
        .copied()
        .ok_or_else(|| CliError::UnknownNode(id.to_string()))
}

fn signal_series(history: &[Signal]) -> Vec<(f64, f64)> {
    history.iter().map(|s| (s.time_or_zero(), s.value)).collect()
}

fn sink_traces(graph: &Graph) -> Vec<(String, Vec<(f64, f64)>)> {
    graph
        .nodes()
        .iter()
        .filter_map(|n| n.block.trace().map(|t| (n.name.clone(), t.to_vec())))
        .collect()
}

fn to_csv(series: &[(String, Vec<(f64, f64)>)]) -> String {
    let mut csv = String::from("node,time_s,value\n");
    for (name, points) in series {
        for (t, v) in points {
            csv.push_str(&format!("{},{},{}\n", name, t, v));
        }
    }
    csv
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(60));
    let _ = io::stdout().flush();
}

fn render_progress(p: &SimProgress) {
    let width = 28usize;
    let fraction = p.step as f64 / p.steps.max(1) as f64;
    let filled = ((fraction * width as f64).round() as usize).min(width);
    print!(
        "\r[{}{}] {:>6.2}%  step={}/{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled)),
        fraction * 100.0,
        p.step,
        p.steps
    );
    let _ = io::stdout().flush();
}
