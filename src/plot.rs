use std::{ops::Range, path::Path};

use anyhow::{Context, Result};
use plotters::{
  coord::{ranged1d::ValueFormatter, types::RangedCoordf64, Shift},
  prelude::*,
};

use crate::{
  spline::{linspace, QuadraticSpline},
  stats::Kind,
};

/// Points on each smoothed curve.
const SMOOTH_POINTS: usize = 300;

const TREE_COLOR: RGBColor = RGBColor(31, 119, 180);
const SET_COLOR: RGBColor = RGBColor(214, 39, 40);
const TREE_CALLOUT: RGBColor = RGBColor(173, 216, 230);
const SET_CALLOUT: RGBColor = RGBColor(240, 128, 128);

const FONT: &str = "sans-serif";

/// Something that can draw a [`Comparison`] to a file.
pub trait Render {
  fn render(&self, comparison: &Comparison, path: &Path) -> Result<()>;
}

/// Measured and smoothed timings of one executable.
#[derive(Debug)]
pub struct Curve {
  pub kind: Kind,
  /// `(size, seconds)` as measured.
  pub points: Vec<(f64, f64)>,
  /// Spline through `points`, floored at zero.
  pub smooth: Vec<(f64, f64)>,
}

impl Curve {
  pub fn new(kind: Kind, sizes: &[f64], seconds: &[f64]) -> Result<Self> {
    let spline = QuadraticSpline::interpolate(sizes, seconds).with_context(|| format!("{kind:?} spline"))?;

    let (min, max) = (sizes[0], sizes[sizes.len() - 1]);
    let smooth = linspace(min, max, SMOOTH_POINTS)
      .into_iter()
      .map(|x| (x, spline.eval(x).max(0.0)))
      .collect();

    Ok(Self {
      kind,
      points: sizes.iter().copied().zip(seconds.iter().copied()).collect(),
      smooth,
    })
  }

  pub fn last(&self) -> (f64, f64) {
    self.points[self.points.len() - 1]
  }

  fn values(&self) -> impl Iterator<Item = f64> + '_ {
    self.points.iter().chain(&self.smooth).map(|&(_, y)| y)
  }
}

/// Everything drawn on the chart: one curve per executable over a shared
/// size axis.
#[derive(Debug)]
pub struct Comparison {
  pub tree: Curve,
  pub set: Curve,
}

impl Comparison {
  /// Fits both curves.
  ///
  /// # Errors
  ///
  /// This will return an error if the sizes cannot carry a spline (fewer than
  /// three, not strictly increasing) or a sequence has the wrong length.
  pub fn new(sizes: &[u64], tree: &[f64], set: &[f64]) -> Result<Self> {
    let sizes: Vec<f64> = sizes.iter().map(|&s| s as f64).collect();

    Ok(Self {
      tree: Curve::new(Kind::Tree, &sizes, tree)?,
      set: Curve::new(Kind::Set, &sizes, set)?,
    })
  }

  fn curves(&self) -> [&Curve; 2] {
    [&self.tree, &self.set]
  }

  fn size_range(&self) -> Range<f64> {
    let (first, last) = (self.tree.points[0].0, self.tree.last().0);

    first..last
  }

  fn linear_range(&self) -> Range<f64> {
    let max = self.curves().iter().flat_map(|c| c.values()).fold(0.0, f64::max);

    0.0..if max > 0.0 { max * 1.05 } else { 1.0 }
  }

  /// Range of the log axis. Non-positive values cannot be shown on it and
  /// are left out.
  fn log_range(&self) -> Range<f64> {
    let positive = || self.curves().into_iter().flat_map(|c| c.values()).filter(|&y| y > 0.0);

    match (positive().reduce(f64::min), positive().reduce(f64::max)) {
      (Some(min), Some(max)) if min < max => min / 2.0..max * 2.0,
      (Some(v), Some(_)) => v / 10.0..v * 10.0,
      _ => 1e-3..1.0,
    }
  }
}

/// Two stacked charts in one PNG: log time axis on top, linear below.
pub struct PngChart {
  pub width: u32,
  pub height: u32,
}

impl Default for PngChart {
  /// 12x10 inches at 300 dpi.
  fn default() -> Self {
    Self {
      width: 3600,
      height: 3000,
    }
  }
}

impl Render for PngChart {
  fn render(&self, comparison: &Comparison, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
    root.fill(&WHITE).context("fill")?;

    let (upper, lower) = root.split_vertically(self.height / 2);
    self.draw_log(&upper, comparison).context("log chart")?;
    self.draw_linear(&lower, comparison).context("linear chart")?;

    root.present().with_context(|| format!("write {path:?}"))?;

    Ok(())
  }
}

impl PngChart {
  /// Scale factor for line widths and fonts, relative to a 1200 px wide chart.
  fn scale(&self) -> f64 {
    f64::from(self.width) / 1200.0
  }

  fn px(&self, base: f64) -> u32 {
    (base * self.scale()).round() as u32
  }

  fn draw_log<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, comparison: &Comparison) -> Result<()>
  where
    DB::ErrorType: 'static,
  {
    let mut chart = ChartBuilder::on(area)
      .caption("RB-tree vs std::set (log scale)", (FONT, self.px(20.0)))
      .margin(self.px(10.0))
      .x_label_area_size(self.px(50.0))
      .y_label_area_size(self.px(80.0))
      .build_cartesian_2d(comparison.size_range(), comparison.log_range().log_scale())
      .context("build")?;

    self.draw_mesh(&mut chart)?;

    for curve in comparison.curves() {
      let positive = |&&(_, y): &&(f64, f64)| y > 0.0;
      let smooth = curve.smooth.iter().filter(positive).copied().collect::<Vec<_>>();
      let points = curve.points.iter().filter(positive).copied().collect::<Vec<_>>();

      self.draw_curve(&mut chart, curve.kind, smooth, points)?;
    }

    self.draw_legend(&mut chart)
  }

  fn draw_linear<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, comparison: &Comparison) -> Result<()>
  where
    DB::ErrorType: 'static,
  {
    let mut chart = ChartBuilder::on(area)
      .caption("RB-tree vs std::set (linear scale)", (FONT, self.px(20.0)))
      .margin(self.px(10.0))
      .x_label_area_size(self.px(50.0))
      .y_label_area_size(self.px(80.0))
      .build_cartesian_2d(comparison.size_range(), comparison.linear_range())
      .context("build")?;

    self.draw_mesh(&mut chart)?;

    for curve in comparison.curves() {
      self.draw_curve(&mut chart, curve.kind, curve.smooth.clone(), curve.points.clone())?;
    }

    let (x, tree_last) = comparison.tree.last();
    self.draw_callout(&mut chart, (x, tree_last), format!("{tree_last:.3} s"), TREE_CALLOUT, -1)?;
    let (x, set_last) = comparison.set.last();
    self.draw_callout(&mut chart, (x, set_last), format!("{} s", set_last as i64), SET_CALLOUT, 1)?;

    self.draw_legend(&mut chart)
  }

  fn draw_mesh<DB, Y>(&self, chart: &mut ChartContext<DB, Cartesian2d<RangedCoordf64, Y>>) -> Result<()>
  where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
  {
    chart
      .configure_mesh()
      .x_desc("Number of operations")
      .y_desc("Time, s")
      .label_style((FONT, self.px(12.0)))
      .axis_desc_style((FONT, self.px(14.0)))
      .x_label_formatter(&|x| format!("{x:.0}"))
      .light_line_style(&BLACK.mix(0.05))
      .bold_line_style(&BLACK.mix(0.2))
      .draw()
      .context("mesh")?;

    Ok(())
  }

  fn draw_curve<DB, Y>(
    &self,
    chart: &mut ChartContext<DB, Cartesian2d<RangedCoordf64, Y>>,
    kind: Kind,
    smooth: Vec<(f64, f64)>,
    points: Vec<(f64, f64)>,
  ) -> Result<()>
  where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    Y: Ranged<ValueType = f64>,
  {
    let color = match kind {
      Kind::Tree => TREE_COLOR,
      Kind::Set => SET_COLOR,
    };
    let line = color.stroke_width(self.px(2.5));
    let legend_len = self.px(20.0) as i32;

    chart
      .draw_series(LineSeries::new(smooth, line))
      .context("line")?
      .label(kind.label())
      .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + legend_len, y)], line));

    let r = self.px(5.0) as i32;
    match kind {
      Kind::Tree => chart
        .draw_series(points.into_iter().map(|p| Circle::new(p, r, color.filled())))
        .context("markers")?,
      Kind::Set => chart
        .draw_series(
          points
            .into_iter()
            .map(|p| EmptyElement::at(p) + Rectangle::new([(-r, -r), (r, r)], color.filled())),
        )
        .context("markers")?,
    };

    Ok(())
  }

  /// Labels the point at `at` with `text` in a filled box, above the point
  /// when `side` is negative and below otherwise.
  fn draw_callout<DB, Y>(
    &self,
    chart: &mut ChartContext<DB, Cartesian2d<RangedCoordf64, Y>>,
    at: (f64, f64),
    text: String,
    fill: RGBColor,
    side: i32,
  ) -> Result<()>
  where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    Y: Ranged<ValueType = f64>,
  {
    let font_size = self.px(10.0) as i32;
    let pad = self.px(3.0) as i32;
    let offset = self.px(10.0) as i32;
    // Rough glyph width; good enough to size the box.
    let width = text.chars().count() as i32 * font_size * 6 / 10 + 2 * pad;
    let height = font_size + 2 * pad;

    // The box sits to the left of the point so it stays inside the plot.
    let left = -offset - width;
    let top = if side < 0 { -offset - height } else { offset };

    chart
      .draw_series(std::iter::once(
        EmptyElement::at(at)
          + Rectangle::new([(left, top), (left + width, top + height)], fill.mix(0.7).filled())
          + Rectangle::new([(left, top), (left + width, top + height)], BLACK.mix(0.5).stroke_width(1))
          + Text::new(text, (left + pad, top + pad), (FONT, font_size).into_font()),
      ))
      .context("callout")?;

    Ok(())
  }

  fn draw_legend<'a, DB, Y>(&self, chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>) -> Result<()>
  where
    DB: DrawingBackend + 'a,
    DB::ErrorType: 'static,
    Y: Ranged<ValueType = f64>,
  {
    chart
      .configure_series_labels()
      .position(SeriesLabelPosition::UpperLeft)
      .label_font((FONT, self.px(12.0)))
      .background_style(&WHITE.mix(0.8))
      .border_style(&BLACK)
      .draw()
      .context("legend")?;

    Ok(())
  }
}
