use anyhow::Result;

/// Elapsed seconds reported by one benchmark run, or why none could be read.
pub type Timing = Result<f64>;

/// Which of the two benchmarked executables a result belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
  Tree,
  Set,
}

impl Kind {
  pub const ALL: [Kind; 2] = [Kind::Tree, Kind::Set];

  /// Section title in the summary document.
  pub fn title(self) -> &'static str {
    match self {
      Kind::Tree => "RB_TREE",
      Kind::Set => "SET",
    }
  }

  /// Legend label on the charts.
  pub fn label(self) -> &'static str {
    match self {
      Kind::Tree => "RB-tree (O(log n) distance)",
      Kind::Set => "std::set (O(k) distance)",
    }
  }

  pub fn dir_prefix(self) -> &'static str {
    match self {
      Kind::Tree => "tree",
      Kind::Set => "set",
    }
  }
}

/// Timings of both executables, one entry per test case, in test order.
#[derive(Default)]
pub struct Results {
  pub tree: Vec<Timing>,
  pub set: Vec<Timing>,
}

impl Results {
  pub fn timings(&self, kind: Kind) -> &[Timing] {
    match kind {
      Kind::Tree => &self.tree,
      Kind::Set => &self.set,
    }
  }

  pub fn push(&mut self, kind: Kind, timing: Timing) {
    match kind {
      Kind::Tree => self.tree.push(timing),
      Kind::Set => self.set.push(timing),
    }
  }

  /// Seconds for every test of `kind`, with failed runs counted as zero.
  pub fn seconds(&self, kind: Kind) -> Vec<f64> {
    self
      .timings(kind)
      .iter()
      .map(|timing| timing.as_ref().copied().unwrap_or(0.0))
      .collect()
  }

  pub fn failures(&self) -> usize {
    Kind::ALL
      .into_iter()
      .map(|kind| self.timings(kind).iter().filter(|t| t.is_err()).count())
      .sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn failed_timings_read_as_zero() {
    let mut results = Results::default();
    results.push(Kind::Tree, Ok(0.5));
    results.push(Kind::Tree, Err(anyhow::anyhow!("no marker")));
    results.push(Kind::Set, Ok(2.0));

    assert_eq!(results.seconds(Kind::Tree), vec![0.5, 0.0]);
    assert_eq!(results.seconds(Kind::Set), vec![2.0]);
    assert_eq!(results.failures(), 1);
  }
}
