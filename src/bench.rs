use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
  config::Config,
  extract, format,
  plot::{Comparison, Render},
  run,
  stats::{Kind, Results},
};

/// Files produced by a full pass.
pub struct Artifacts {
  pub summary: PathBuf,
  pub plot: PathBuf,
}

/// Drives one pass of the suite: run both executables over every test case,
/// collect their timings into the summary, then chart them.
pub struct Bench {
  config: Config,
}

impl Bench {
  /// Creates the output directories if they are missing.
  pub fn new(config: Config) -> Result<Self> {
    for kind in Kind::ALL {
      let dir = config.output_dir(kind);
      fs::create_dir_all(&dir).with_context(|| format!("create_dir {dir:?}"))?;
    }

    Ok(Self { config })
  }

  pub fn bench<R: Render>(&self, renderer: &R) -> Result<Artifacts> {
    self.run_all().context("run all")?;
    let results = self.collect().context("collect")?;
    let plot = self.plot(&results, renderer).context("plot")?;

    Ok(Artifacts {
      summary: self.config.summary_path(),
      plot,
    })
  }

  /// Runs every tree test, then every set test.
  fn run_all(&self) -> Result<()> {
    for kind in Kind::ALL {
      run::run_benchmark(&self.config, kind).with_context(|| format!("{kind:?}"))?;
    }

    Ok(())
  }

  /// Extracts the timing of every captured run and writes the summary.
  pub fn collect(&self) -> Result<Results> {
    let summary_path = self.config.summary_path();
    info!("collecting results into {summary_path:?}");

    let mut results = Results::default();
    for case in self.config.test_cases() {
      for kind in Kind::ALL {
        let timing = extract::read_time(self.config.output_dir(kind).join(case.output_name()));
        if let Err(err) = &timing {
          warn!("{kind:?} {}: {err:#}", case.name());
        }

        results.push(kind, timing);
      }
    }

    if results.failures() > 0 {
      warn!("{} run(s) without a timing, counted as 0 s", results.failures());
    }

    let summary = format::format(&results).context("format")?;
    fs::write(&summary_path, summary).with_context(|| format!("write {summary_path:?}"))?;

    Ok(results)
  }

  pub fn plot<R: Render>(&self, results: &Results, renderer: &R) -> Result<PathBuf> {
    let path = self.config.plot_path();
    info!("plotting to {path:?}");

    let comparison = Comparison::new(
      &self.config.sizes,
      &results.seconds(Kind::Tree),
      &results.seconds(Kind::Set),
    )?;
    renderer.render(&comparison, &path)?;

    Ok(path)
  }
}

#[cfg(all(test, unix))]
mod tests {
  use std::{cell::RefCell, os::unix::fs::symlink, path::Path};

  use tempfile::TempDir;

  use super::*;

  /// Remembers what it was asked to draw instead of drawing it.
  #[derive(Default)]
  struct Recorder {
    drawn: RefCell<Vec<(Vec<(f64, f64)>, Vec<(f64, f64)>, PathBuf)>>,
  }

  impl Render for Recorder {
    fn render(&self, comparison: &Comparison, path: &Path) -> Result<()> {
      self.drawn.borrow_mut().push((
        comparison.tree.points.clone(),
        comparison.set.points.clone(),
        path.to_path_buf(),
      ));

      Ok(())
    }
  }

  /// A project whose "benchmarks" are `cat`, so each input file is its own
  /// output.
  fn project(inputs: &[Option<&str>]) -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    let config = Config::new(dir.path());

    fs::create_dir_all(config.build_dir()).unwrap();
    symlink("/bin/cat", config.executable(Kind::Tree)).unwrap();
    symlink("/bin/cat", config.executable(Kind::Set)).unwrap();

    fs::create_dir_all(config.tests_dir()).unwrap();
    for (case, input) in config.test_cases().iter().zip(inputs) {
      if let Some(input) = input {
        fs::write(&case.input, input).unwrap();
      }
    }

    (dir, config)
  }

  #[test]
  fn full_pass() {
    let inputs = [
      Some("Time: 0.002 s\n"),
      Some("Time: 0.02 s\n"),
      None,
      Some("garbage\n"),
      Some("1 2 3\n\nTime: 0.147 s\n"),
      Some("Time: 0.375 s\n"),
      Some("Time: 0.772 s\n"),
      Some("Time: 1.634 s\n"),
    ];
    let (_dir, config) = project(&inputs);
    let recorder = Recorder::default();

    let artifacts = Bench::new(config.clone()).unwrap().bench(&recorder).unwrap();

    let expected = [0.002, 0.02, 0.0, 0.0, 0.147, 0.375, 0.772, 1.634];
    let drawn = recorder.drawn.borrow();
    assert_eq!(drawn.len(), 1);
    let (tree, set, path) = &drawn[0];
    assert_eq!(tree.iter().map(|&(_, y)| y).collect::<Vec<_>>(), expected);
    assert_eq!(set, tree);
    assert_eq!(tree[7].0, 1e6);
    assert_eq!(path, &config.plot_path());
    assert_eq!(artifacts.plot, config.plot_path());

    let summary = fs::read_to_string(&artifacts.summary).unwrap();
    let section = "test1: 0.002 s\ntest2: 0.020 s\ntest3: 0.000 s\ntest4: 0.000 s\n\
      test5: 0.147 s\ntest6: 0.375 s\ntest7: 0.772 s\ntest8: 1.634 s\n";
    assert_eq!(
      summary,
      format!("==========RB_TREE==========\n{section}\n============SET============\n{section}")
    );

    for kind in Kind::ALL {
      let raw = fs::read_to_string(config.output_dir(kind).join("test5.txt")).unwrap();
      assert_eq!(raw, "1 2 3\n\nTime: 0.147 s\n");
    }
  }

  #[test]
  fn rerun_reproduces_summary() {
    let inputs = [Some("Time: 1.5 s\n"); 8];
    let (_dir, config) = project(&inputs);
    let bench = Bench::new(config.clone()).unwrap();

    bench.bench(&Recorder::default()).unwrap();
    let first = fs::read(config.summary_path()).unwrap();
    bench.bench(&Recorder::default()).unwrap();

    assert_eq!(fs::read(config.summary_path()).unwrap(), first);
  }

  #[test]
  fn missing_everything_still_completes() {
    let dir = TempDir::new().unwrap();
    let config = Config::new(dir.path());
    let bench = Bench::new(config.clone()).unwrap();

    bench.bench(&Recorder::default()).unwrap();
    let results = bench.collect().unwrap();

    assert_eq!(results.tree.len(), 8);
    assert_eq!(results.set.len(), 8);
    assert_eq!(results.seconds(Kind::Set), vec![0.0; 8]);
    assert_eq!(results.failures(), 16);
  }
}
