//! `cardiacsim`: run an Aliev–Panfilov simulation from the command line.
//!
//! # Examples
//!
//! ```bash
//! # 400x400 tissue to t = 100 on a 2x2 worker grid, four threads each
//! cardiacsim -t 100 -n 400 -x 2 -y 2 -o 4 --init planar-wave
//!
//! # Plot every 500 steps (requires gnuplot on PATH)
//! cardiacsim -t 200 -n 200 -p 500 --init planar-wave
//! ```

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use panfilov::prelude::*;

mod gnuplot;

use gnuplot::GnuplotHook;

/// Domain-decomposed Aliev–Panfilov cardiac simulator
#[derive(Parser, Debug)]
#[command(name = "cardiacsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Simulated end time
    #[arg(short = 't', long = "t-final", default_value_t = 1000.0)]
    t_final: f64,

    /// Global grid size (the tissue is n x n)
    #[arg(short = 'n', long = "size", default_value_t = 400)]
    n: usize,

    /// Plot every this many steps (0 disables plotting)
    #[arg(short = 'p', long = "plot-freq", default_value_t = 0)]
    plot_freq: u64,

    /// Worker columns
    #[arg(short = 'x', long = "px", default_value_t = 1)]
    px: usize,

    /// Worker rows
    #[arg(short = 'y', long = "py", default_value_t = 1)]
    py: usize,

    /// Disable inter-worker communication
    #[arg(short = 'k', long = "no-comm")]
    no_comm: bool,

    /// Threads per worker
    #[arg(short = 'o', long = "threads", default_value_t = 1)]
    threads: usize,

    /// Timestep
    #[arg(long, default_value_t = DEFAULT_DT)]
    dt: f64,

    /// Initial condition
    #[arg(long, value_enum, default_value_t = Init::Quiescent)]
    init: Init,

    /// Abort when a worker waits longer than this for a peer (not with -p)
    #[arg(long = "recv-timeout-ms", conflicts_with = "plot_freq")]
    recv_timeout_ms: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Init {
    /// Everything at rest
    Quiescent,
    /// Excited right half, refractory bottom half
    PlanarWave,
}

impl From<Init> for InitialCondition {
    fn from(init: Init) -> Self {
        match init {
            Init::Quiescent => InitialCondition::Quiescent,
            Init::PlanarWave => InitialCondition::PlanarWave,
        }
    }
}

impl Cli {
    fn config(&self) -> SimConfig {
        SimConfig {
            t_final: self.t_final,
            n: self.n,
            px: self.px,
            py: self.py,
            plot_freq: self.plot_freq,
            no_comm: self.no_comm,
            threads: self.threads,
            dt: self.dt,
            initial: self.init.into(),
            recv_timeout: self.recv_timeout_ms.map(Duration::from_millis),
            ..SimConfig::default()
        }
    }
}

/// `RUST_LOG` wins unless `-v` or `-q` is given.
fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(report: &RunReport) {
    println!("Workers:           {}", report.workers);
    println!("Grid:              {} x {}", report.n, report.n);
    println!("Steps:             {}", report.niter);
    println!("Final time:        {}", report.t);
    println!("Max excitation:    {}", report.stats.max);
    println!("L2 norm:           {}", report.stats.l2_norm());
    println!("Wall time:         {:.3} s", report.wall.as_secs_f64());
    println!("Mean step:         {:.1} us", report.metrics.mean_step_us());
    println!(
        "Communication:     {:.1} %",
        100.0 * report.metrics.communication_fraction()
    );
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = cli.config();
    let result = if config.plot_freq > 0 {
        Cluster::run(&config, &mut GnuplotHook::default())
    } else {
        Cluster::run(&config, &mut NoSnapshots)
    };

    match result {
        Ok(report) => {
            if !cli.quiet {
                print_summary(&report);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
