use std::{
  fs::{self, File},
  io::{BufWriter, Write},
  path::Path,
};

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::Config;

/// Keys and query bounds are drawn from `0..KEY_RANGE`.
const KEY_RANGE: u32 = 1_000_000;

/// Writes a workload of `ops` operations: each is either an insert `k KEY` or
/// a range query `q LOW HIGH` with `LOW <= HIGH`, with equal probability.
pub fn write_workload<W: Write, R: Rng>(out: &mut W, ops: u64, rng: &mut R) -> Result<()> {
  for _ in 0..ops {
    if rng.gen_bool(0.5) {
      write!(out, "k {} ", rng.gen_range(0..KEY_RANGE))?;
    } else {
      let (low, high) = loop {
        let (a, b) = (rng.gen_range(0..KEY_RANGE), rng.gen_range(0..KEY_RANGE));
        if a <= b {
          break (a, b);
        }
      };
      write!(out, "q {low} {high} ")?;
    }
  }
  writeln!(out)?;

  Ok(())
}

/// Writes one input file per test case, sized by the case's operation count.
pub fn generate(config: &Config, seed: Option<u64>) -> Result<()> {
  let dir = config.tests_dir();
  fs::create_dir_all(&dir).with_context(|| format!("create_dir {dir:?}"))?;

  let mut rng = match seed {
    Some(seed) => ChaCha8Rng::seed_from_u64(seed),
    None => ChaCha8Rng::from_entropy(),
  };

  for case in config.test_cases() {
    write_file(&case.input, case.size, &mut rng).with_context(|| case.name())?;
    info!("  {} ({} ops)", case.input.display(), case.size);
  }

  Ok(())
}

fn write_file<R: Rng>(path: &Path, ops: u64, rng: &mut R) -> Result<()> {
  let file = File::create(path).with_context(|| format!("create {path:?}"))?;
  let mut out = BufWriter::new(file);

  write_workload(&mut out, ops, rng)?;
  out.flush().context("flush")?;

  Ok(())
}
