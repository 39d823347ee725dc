use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use crate::stats::Kind;

pub const TREE_EXE: &str = "tree_bench";
pub const SET_EXE: &str = "set_bench";

/// Number of operations in each test input, in test order.
pub const SIZES: [u64; 8] = [1_000, 10_000, 25_000, 50_000, 100_000, 250_000, 500_000, 1_000_000];

const SUMMARY_FILE: &str = "time_comparison.txt";
const PLOT_FILE: &str = "tree_vs_set_performance.png";

/// Everything the pipeline needs to know about where things live. All paths
/// hang off a single project root.
#[derive(Clone, Debug)]
pub struct Config {
  pub root: PathBuf,
  pub tree_exe: String,
  pub set_exe: String,
  pub sizes: Vec<u64>,
  /// Kill a benchmark that is still running after this long. `None` waits
  /// forever.
  pub timeout: Option<Duration>,
}

/// One input file of the suite.
#[derive(Clone, Debug, PartialEq)]
pub struct TestCase {
  /// 1-based.
  pub index: usize,
  pub size: u64,
  pub input: PathBuf,
}

impl TestCase {
  pub fn name(&self) -> String {
    format!("test{}", self.index)
  }

  /// File name of the captured output, e.g. `test3.txt`.
  pub fn output_name(&self) -> String {
    format!("{}.txt", self.name())
  }
}

impl Config {
  pub fn new<P: AsRef<Path>>(root: P) -> Self {
    Self {
      root: root.as_ref().to_path_buf(),
      tree_exe: TREE_EXE.to_string(),
      set_exe: SET_EXE.to_string(),
      sizes: SIZES.to_vec(),
      timeout: None,
    }
  }

  pub fn tests_dir(&self) -> PathBuf {
    self.root.join("tests")
  }

  pub fn build_dir(&self) -> PathBuf {
    self.root.join("build")
  }

  pub fn stats_dir(&self) -> PathBuf {
    self.root.join("statistics")
  }

  pub fn summary_path(&self) -> PathBuf {
    self.stats_dir().join(SUMMARY_FILE)
  }

  pub fn plot_path(&self) -> PathBuf {
    self.stats_dir().join(PLOT_FILE)
  }

  pub fn executable(&self, kind: Kind) -> PathBuf {
    let name = match kind {
      Kind::Tree => &self.tree_exe,
      Kind::Set => &self.set_exe,
    };

    self.build_dir().join(name)
  }

  /// Directory holding the raw output of every run of `kind`.
  pub fn output_dir(&self, kind: Kind) -> PathBuf {
    self.stats_dir().join(format!("{}-time-results", kind.dir_prefix()))
  }

  pub fn test_cases(&self) -> Vec<TestCase> {
    self
      .sizes
      .iter()
      .enumerate()
      .map(|(i, &size)| TestCase {
        index: i + 1,
        size,
        input: self.tests_dir().join(format!("test{}.dat", i + 1)),
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_layout() {
    let config = Config::new("/proj");

    assert_eq!(config.executable(Kind::Tree), PathBuf::from("/proj/build/tree_bench"));
    assert_eq!(config.executable(Kind::Set), PathBuf::from("/proj/build/set_bench"));
    assert_eq!(
      config.output_dir(Kind::Tree),
      PathBuf::from("/proj/statistics/tree-time-results")
    );
    assert_eq!(
      config.output_dir(Kind::Set),
      PathBuf::from("/proj/statistics/set-time-results")
    );
    assert_eq!(
      config.summary_path(),
      PathBuf::from("/proj/statistics/time_comparison.txt")
    );
    assert_eq!(config.timeout, None);
  }

  #[test]
  fn test_cases_follow_size_table() {
    let cases = Config::new("/proj").test_cases();

    assert_eq!(cases.len(), 8);
    assert_eq!(cases[0].index, 1);
    assert_eq!(cases[0].size, 1_000);
    assert_eq!(cases[0].input, PathBuf::from("/proj/tests/test1.dat"));
    assert_eq!(cases[7].size, 1_000_000);
    assert_eq!(cases[7].output_name(), "test8.txt");
    assert!(cases.windows(2).all(|w| w[0].size < w[1].size));
  }
}
