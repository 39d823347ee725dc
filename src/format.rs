use std::fmt::Write;

use anyhow::{Context, Result};

use crate::stats::{Kind, Results};

const TITLE_WIDTH: usize = 27;

fn format_title(kind: Kind) -> String {
  format!("{:=^TITLE_WIDTH$}", kind.title())
}

fn format_section(summary: &mut String, kind: Kind, seconds: &[f64]) -> Result<()> {
  writeln!(summary, "{}", format_title(kind))?;
  for (i, t) in seconds.iter().enumerate() {
    writeln!(summary, "test{}: {t:.3} s", i + 1)?;
  }

  Ok(())
}

/// Renders the summary document: the tree section, a blank line, then the
/// set section. Failed runs are listed as `0.000 s`.
pub fn format(results: &Results) -> Result<String> {
  let mut summary = String::new();

  format_section(&mut summary, Kind::Tree, &results.seconds(Kind::Tree))?;
  writeln!(summary)?;
  format_section(&mut summary, Kind::Set, &results.seconds(Kind::Set))?;

  Ok(summary)
}

/// Reads back a summary written by [`format`], returning the tree and set
/// seconds in test order.
pub fn parse(summary: &str) -> Result<(Vec<f64>, Vec<f64>)> {
  let mut tree = Vec::new();
  let mut set = Vec::new();
  let mut section = None;

  for (n, line) in summary.lines().enumerate() {
    let line = line.trim();
    if line.is_empty() {
      continue;
    }

    if let Some(kind) = Kind::ALL.into_iter().find(|&kind| line == format_title(kind)) {
      section = Some(kind);
      continue;
    }

    let seconds = parse_row(line).with_context(|| format!("line {}: {line:?}", n + 1))?;
    match section {
      Some(Kind::Tree) => tree.push(seconds),
      Some(Kind::Set) => set.push(seconds),
      None => anyhow::bail!("line {}: row before any section title", n + 1),
    }
  }

  Ok((tree, set))
}

/// Parses `testN: X s`, returning `X`.
fn parse_row(line: &str) -> Result<f64> {
  let (_, value) = line.split_once(':').context("missing ':'")?;
  let value = value.trim();
  let value = value.strip_suffix('s').unwrap_or(value).trim();

  value.parse().with_context(|| format!("parse {value:?}"))
}
