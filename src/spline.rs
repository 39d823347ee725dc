//! Quadratic interpolating B-splines, used to draw smooth curves through the
//! measured points.

use anyhow::{Context, Result};

const DEGREE: usize = 2;

/// A degree-2 B-spline passing through every sample it was built from.
///
/// The knot vector repeats each end point `DEGREE + 1` times and places the
/// interior knots halfway between consecutive samples, skipping the first and
/// last such midpoint so that there are exactly as many basis functions as
/// samples.
#[derive(Debug)]
pub struct QuadraticSpline {
  knots: Vec<f64>,
  coeffs: Vec<f64>,
}

impl QuadraticSpline {
  /// Fits the spline through `(xs[i], ys[i])`.
  ///
  /// # Errors
  ///
  /// This will return an error if:
  /// - `xs` and `ys` differ in length,
  /// - there are fewer than three samples,
  /// - `xs` is not strictly increasing or any value is not finite.
  pub fn interpolate(xs: &[f64], ys: &[f64]) -> Result<Self> {
    if xs.len() != ys.len() {
      anyhow::bail!("{} x values but {} y values", xs.len(), ys.len());
    }
    if xs.len() <= DEGREE {
      anyhow::bail!("need at least {} points, got {}", DEGREE + 1, xs.len());
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
      anyhow::bail!("non-finite sample");
    }
    if xs.windows(2).any(|w| w[0] >= w[1]) {
      anyhow::bail!("x values must be strictly increasing");
    }

    let n = xs.len();
    let (first, last) = (xs[0], xs[n - 1]);

    let mut knots = vec![first; DEGREE + 1];
    knots.extend(xs.windows(2).skip(1).take(n - 3).map(|w| (w[0] + w[1]) / 2.0));
    knots.extend([last; DEGREE + 1]);

    let mut spline = Self {
      knots,
      coeffs: vec![0.0; n],
    };

    let mut matrix = vec![vec![0.0; n]; n];
    for (row, &x) in matrix.iter_mut().zip(xs) {
      let span = spline.span(x);
      for (r, b) in spline.basis(span, x).into_iter().enumerate() {
        row[span - DEGREE + r] = b;
      }
    }

    spline.coeffs = solve(matrix, ys.to_vec()).context("collocation system")?;

    Ok(spline)
  }

  /// Evaluates the spline at `x`, clamped to the fitted range.
  pub fn eval(&self, x: f64) -> f64 {
    let x = x.clamp(self.knots[0], self.knots[self.knots.len() - 1]);
    let span = self.span(x);

    self
      .basis(span, x)
      .iter()
      .enumerate()
      .map(|(r, b)| b * self.coeffs[span - DEGREE + r])
      .sum()
  }

  /// Index `s` of the knot interval `[knots[s], knots[s + 1])` holding `x`,
  /// restricted to the intervals that carry a full set of basis functions.
  fn span(&self, x: f64) -> usize {
    let n = self.coeffs.len();

    let mut span = DEGREE;
    while span + 1 < n && self.knots[span + 1] <= x {
      span += 1;
    }

    span
  }

  /// Values at `x` of the `DEGREE + 1` basis functions that are non-zero on
  /// `span`, i.e. `B[span - DEGREE] ..= B[span]` (Cox-de Boor).
  fn basis(&self, span: usize, x: f64) -> [f64; DEGREE + 1] {
    let t = &self.knots;
    let mut values = [0.0; DEGREE + 1];
    let mut left = [0.0; DEGREE + 1];
    let mut right = [0.0; DEGREE + 1];

    values[0] = 1.0;
    for j in 1..=DEGREE {
      left[j] = x - t[span + 1 - j];
      right[j] = t[span + j] - x;

      let mut saved = 0.0;
      for r in 0..j {
        let temp = values[r] / (right[r + 1] + left[j - r]);
        values[r] = saved + right[r + 1] * temp;
        saved = left[j - r] * temp;
      }
      values[j] = saved;
    }

    values
  }
}

/// Solves `a * x = b` by Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
  let n = b.len();

  for col in 0..n {
    let pivot = (col..n)
      .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
      .context("empty system")?;
    if a[pivot][col].abs() < f64::EPSILON {
      anyhow::bail!("singular matrix");
    }

    a.swap(col, pivot);
    b.swap(col, pivot);

    for row in col + 1..n {
      let factor = a[row][col] / a[col][col];
      if factor == 0.0 {
        continue;
      }
      for k in col..n {
        a[row][k] -= factor * a[col][k];
      }
      b[row] -= factor * b[col];
    }
  }

  let mut x = vec![0.0; n];
  for row in (0..n).rev() {
    let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
    x[row] = (b[row] - tail) / a[row][row];
  }

  Ok(x)
}

/// `count` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
  match count {
    0 => Vec::new(),
    1 => vec![start],
    _ => {
      let step = (end - start) / (count - 1) as f64;
      (0..count)
        .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
        .collect()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
  }

  #[test]
  fn passes_through_samples() {
    let xs = [1e3, 1e4, 2.5e4, 5e4, 1e5, 2.5e5, 5e5, 1e6];
    let ys = [0.002, 0.043, 0.21, 1.082, 5.309, 39.862, 182.375, 1017.316];

    let spline = QuadraticSpline::interpolate(&xs, &ys).unwrap();

    for (&x, &y) in xs.iter().zip(&ys) {
      assert!(close(spline.eval(x), y), "{x}: {} != {y}", spline.eval(x));
    }
  }

  #[test]
  fn reproduces_quadratics() {
    let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
    let ys = xs.map(|x| 3.0 * x * x - 2.0 * x + 1.0);

    let spline = QuadraticSpline::interpolate(&xs, &ys).unwrap();

    for x in linspace(0.0, 5.0, 41) {
      assert!(close(spline.eval(x), 3.0 * x * x - 2.0 * x + 1.0), "{x}");
    }
  }

  #[test]
  fn three_points_is_enough() {
    let spline = QuadraticSpline::interpolate(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();

    assert!(close(spline.eval(1.5), 2.25));
  }

  #[test]
  fn rejects_degenerate_input() {
    assert!(QuadraticSpline::interpolate(&[0.0, 1.0], &[0.0, 1.0]).is_err());
    assert!(QuadraticSpline::interpolate(&[0.0, 1.0, 2.0], &[0.0, 1.0]).is_err());
    assert!(QuadraticSpline::interpolate(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).is_err());
    assert!(QuadraticSpline::interpolate(&[0.0, 1.0, 2.0], &[0.0, f64::NAN, 2.0]).is_err());
  }

  #[test]
  fn linspace_endpoints() {
    let xs = linspace(1e3, 1e6, 300);

    assert_eq!(xs.len(), 300);
    assert_eq!(xs[0], 1e3);
    assert_eq!(xs[299], 1e6);
    assert!(xs.windows(2).all(|w| w[0] < w[1]));
  }
}
