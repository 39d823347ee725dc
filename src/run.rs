use std::{
  fs::File,
  io::Write,
  path::Path,
  process::Command,
  time::Duration,
};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
  config::Config,
  ext::{ChildExt, CommandExt},
  stats::Kind,
};

/// Runs the `kind` executable once per test case, one at a time, capturing
/// each run's output in its own file under [`Config::output_dir`].
///
/// A run that fails to start, exits non-zero or times out still leaves an
/// output file behind; it will simply lack a timing line.
///
/// # Errors
///
/// This will return an error if an output file cannot be created.
pub fn run_benchmark(config: &Config, kind: Kind) -> Result<()> {
  let exe = config.executable(kind);
  let output_dir = config.output_dir(kind);

  info!("running benchmarks for {exe:?}");
  for case in config.test_cases() {
    let output = output_dir.join(case.output_name());

    run_case(&exe, &case.input, &output, config.timeout).with_context(|| case.name())?;

    info!("  {} --> {}", case.input.display(), output.display());
  }

  Ok(())
}

/// Runs `exe < input > output 2>&1` and waits for it.
fn run_case(exe: &Path, input: &Path, output: &Path, timeout: Option<Duration>) -> Result<()> {
  let mut sink = File::create(output).with_context(|| format!("create {output:?}"))?;

  let spawned = File::open(input)
    .with_context(|| format!("open {input:?}"))
    .and_then(|input| Command::new(exe).spawn_redirected(input, &sink))
    .with_context(|| format!("launch {exe:?}"));

  let mut child = match spawned {
    Ok(child) => child,
    Err(err) => return record_failure(&mut sink, &err),
  };

  match child.wait_for(timeout).with_context(|| format!("wait {exe:?}")) {
    Ok(Some(status)) if !status.success() => warn!("{exe:?} < {input:?} exited with {status}"),
    Ok(Some(_)) => {}
    Ok(None) => warn!("{exe:?} < {input:?} killed after {timeout:?}"),
    Err(err) => return record_failure(&mut sink, &err),
  }

  Ok(())
}

/// Logs a failed run and leaves the error in its output file in place of a
/// timing.
fn record_failure<W: Write>(sink: &mut W, err: &anyhow::Error) -> Result<()> {
  warn!("{err:#}");
  writeln!(sink, "{err:#}").context("write")?;

  Ok(())
}
