use std::{fs, path::Path};

use anyhow::{Context, Result};

/// Token that precedes the elapsed time in a benchmark's output.
pub const TIME_MARKER: &str = "Time:";

/// Returns the number following the first whitespace-separated `Time:` token
/// in `output`. Only the first line carrying the token is considered.
///
/// # Errors
///
/// This will return an error if:
/// - no line has a `Time:` token,
/// - the token is the last one on its line,
/// - the next token is not a finite, non-negative number.
pub fn parse_time(output: &str) -> Result<f64> {
  for line in output.lines() {
    let mut tokens = line.split_whitespace();
    if tokens.by_ref().any(|token| token == TIME_MARKER) {
      let value = tokens.next().with_context(|| format!("nothing after {TIME_MARKER:?} in {line:?}"))?;
      let seconds: f64 = value.parse().with_context(|| format!("parse {value:?}"))?;

      if !seconds.is_finite() || seconds < 0.0 {
        anyhow::bail!("{value:?} is not a valid duration");
      }

      return Ok(seconds);
    }
  }

  anyhow::bail!("no line with {TIME_MARKER:?} found")
}

/// Reads a captured benchmark output file and parses its timing.
pub fn read_time<P: AsRef<Path>>(path: P) -> Result<f64> {
  let path = path.as_ref();
  let bytes = fs::read(path).with_context(|| format!("read {path:?}"))?;

  parse_time(&String::from_utf8_lossy(&bytes)).with_context(|| format!("{path:?}"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn value_after_marker() {
    assert_eq!(parse_time("Computed. Time: 0.123 s\n").unwrap(), 0.123);
  }

  #[test]
  fn ignores_surrounding_output() {
    let output = "3 0 17 4 2 \n\nTime: 1017.316 s\n";

    assert_eq!(parse_time(output).unwrap(), 1017.316);
  }

  #[test]
  fn first_marker_wins() {
    let output = "Time: 1.5 s\nTime: 2.5 s\n";

    assert_eq!(parse_time(output).unwrap(), 1.5);
  }

  #[test]
  fn marker_must_be_a_whole_token() {
    let output = "RunTime: 9 s\nTime: 0.25 s\n";

    assert_eq!(parse_time(output).unwrap(), 0.25);
  }

  #[test]
  fn first_marker_line_is_final_even_if_broken() {
    assert!(parse_time("Time: soon\nTime: 2.0 s\n").is_err());
  }

  #[test]
  fn missing_or_malformed() {
    assert!(parse_time("").is_err());
    assert!(parse_time("Bad input format: 5 > 3\n").is_err());
    assert!(parse_time("Time:\n").is_err());
    assert!(parse_time("Time: -1 s\n").is_err());
    assert!(parse_time("Time: NaN s\n").is_err());
  }

  #[test]
  fn reads_files() {
    let dir = tempfile::TempDir::new().unwrap();
    let good = dir.path().join("good.txt");
    let empty = dir.path().join("empty.txt");
    fs::write(&good, "Computed. Time: 0.123 s\n").unwrap();
    fs::write(&empty, "").unwrap();

    assert_eq!(read_time(&good).unwrap(), 0.123);
    assert!(read_time(&empty).is_err());
    assert!(read_time(dir.path().join("missing.txt")).is_err());
  }
}
