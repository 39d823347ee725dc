mod bench;
mod config;
mod ext;
mod extract;
mod format;
mod gen;
mod plot;
mod run;
mod spline;
mod stats;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use self::{
  bench::Bench,
  config::{Config, SET_EXE, TREE_EXE},
  plot::{Comparison, PngChart, Render},
};

#[derive(Parser)]
struct Args {
  /// Project root containing `tests/`, `build/` and `statistics/`.
  #[arg(long, global = true, default_value = ".")]
  root: PathBuf,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Run both benchmarks over every test, write the summary and plot it.
  Run {
    /// Red-black tree benchmark, looked up in `build/`.
    #[arg(long, default_value = TREE_EXE)]
    tree_exe: String,
    /// `std::set` benchmark, looked up in `build/`.
    #[arg(long, default_value = SET_EXE)]
    set_exe: String,
    /// Kill a benchmark run after this many seconds.
    #[arg(long)]
    timeout: Option<u64>,
  },
  /// Plot an existing summary without running anything.
  Plot {
    /// Summary to read. Defaults to `statistics/time_comparison.txt`.
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Image to write. Defaults to `statistics/tree_vs_set_performance.png`.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
  /// Generate the test inputs.
  Gen {
    /// Seed for reproducible inputs.
    #[arg(long)]
    seed: Option<u64>,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tree_bench=info")))
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let mut config = Config::new(&args.root);

  match args.command {
    Command::Run {
      tree_exe,
      set_exe,
      timeout,
    } => {
      config.tree_exe = tree_exe;
      config.set_exe = set_exe;
      config.timeout = timeout.map(Duration::from_secs);

      let bench = Bench::new(config).context("Bench::new")?;
      let artifacts = bench.bench(&PngChart::default()).context("bench")?;

      println!("Results saved to {}", artifacts.summary.display());
      println!("Plot saved to {}", artifacts.plot.display());
    }
    Command::Plot { summary, output } => {
      let summary = summary.unwrap_or_else(|| config.summary_path());
      let output = output.unwrap_or_else(|| config.plot_path());

      let text = fs::read_to_string(&summary).with_context(|| format!("read {summary:?}"))?;
      let (tree, set) = format::parse(&text).with_context(|| format!("parse {summary:?}"))?;

      info!("plotting {summary:?}");
      let comparison = Comparison::new(&config.sizes, &tree, &set).context("Comparison::new")?;
      PngChart::default().render(&comparison, &output).context("render")?;

      println!("Plot saved to {}", output.display());
    }
    Command::Gen { seed } => {
      info!("generating inputs in {:?}", config.tests_dir());
      gen::generate(&config, seed).context("generate")?;
    }
  }

  Ok(())
}
