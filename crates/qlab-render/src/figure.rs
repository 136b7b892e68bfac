//! Chart figures rasterized to PNG.

use crate::draw::{self, GRID, INK, SERIES_BLUE, SERIES_ORANGE};
use crate::error::RenderResult;

const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;
const MARGIN: i32 = 48;

/// One plotted series.
#[derive(Debug, Clone)]
enum Series {
    /// Categorical bars, x is the index.
    Bars(Vec<f64>),
    /// A polyline through (x, y) points.
    Line { xs: Vec<f64>, ys: Vec<f64> },
}

/// A figure under construction: series accumulate until the figure is
/// flushed to PNG (the executor's `show()` does this) or dropped.
#[derive(Debug, Clone, Default)]
pub struct Figure {
    series: Vec<Series>,
}

impl Figure {
    /// Create an empty figure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been plotted yet.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Add a bar series.
    pub fn bar(&mut self, values: Vec<f64>) -> &mut Self {
        self.series.push(Series::Bars(values));
        self
    }

    /// Add a line series. Point count is the shorter of the two inputs.
    pub fn line(&mut self, xs: Vec<f64>, ys: Vec<f64>) -> &mut Self {
        self.series.push(Series::Line { xs, ys });
        self
    }

    /// Rasterize to PNG at the default size.
    pub fn render_png(&self) -> RenderResult<Vec<u8>> {
        self.render_png_sized(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Rasterize to PNG.
    pub fn render_png_sized(&self, width: u32, height: u32) -> RenderResult<Vec<u8>> {
        let mut img = draw::canvas(width, height);
        let w = width as i32;
        let h = height as i32;

        // Plot area frame
        let (x0, y0) = (MARGIN, MARGIN / 2);
        let (x1, y1) = (w - MARGIN / 2, h - MARGIN);
        for frac in [0.25, 0.5, 0.75] {
            let gy = y1 - ((y1 - y0) as f64 * frac) as i32;
            draw::line(&mut img, x0, gy, x1, gy, GRID);
        }
        draw::line(&mut img, x0, y0, x0, y1, INK);
        draw::line(&mut img, x0, y1, x1, y1, INK);

        let (lo, hi) = self.value_range();
        let span = (hi - lo).max(1e-12);

        for (idx, series) in self.series.iter().enumerate() {
            let color = if idx % 2 == 0 {
                SERIES_BLUE
            } else {
                SERIES_ORANGE
            };
            match series {
                Series::Bars(values) => {
                    if values.is_empty() {
                        continue;
                    }
                    let slot = (x1 - x0) / values.len() as i32;
                    let bar_w = (slot * 3 / 4).max(1);
                    for (i, v) in values.iter().enumerate() {
                        let bar_h = (((v - lo) / span) * (y1 - y0) as f64) as i32;
                        let bx = x0 + slot * i as i32 + (slot - bar_w) / 2;
                        draw::fill_rect(&mut img, bx, y1 - bar_h, bar_w, bar_h, color);
                    }
                }
                Series::Line { xs, ys } => {
                    let n = xs.len().min(ys.len());
                    if n < 2 {
                        continue;
                    }
                    let (xmin, xmax) = min_max(&xs[..n]);
                    let xspan = (xmax - xmin).max(1e-12);
                    let mut prev: Option<(i32, i32)> = None;
                    for i in 0..n {
                        let px = x0 + (((xs[i] - xmin) / xspan) * (x1 - x0) as f64) as i32;
                        let py = y1 - (((ys[i] - lo) / span) * (y1 - y0) as f64) as i32;
                        if let Some((lx, ly)) = prev {
                            draw::line(&mut img, lx, ly, px, py, color);
                        }
                        prev = Some((px, py));
                    }
                }
            }
        }

        Ok(draw::encode_png(&img)?)
    }

    /// Value range across all series, zero-anchored for bar charts.
    fn value_range(&self) -> (f64, f64) {
        let mut lo = f64::MAX;
        let mut hi = f64::MIN;
        for series in &self.series {
            let values = match series {
                Series::Bars(v) => {
                    lo = lo.min(0.0);
                    v
                }
                Series::Line { ys, .. } => ys,
            };
            for v in values {
                lo = lo.min(*v);
                hi = hi.max(*v);
            }
        }
        if lo > hi {
            (0.0, 1.0)
        } else {
            (lo, hi)
        }
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::MAX, f64::MIN), |(lo, hi), v| {
        (lo.min(*v), hi.max(*v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_figure_still_renders() {
        let png = Figure::new().render_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 640);
    }

    #[test]
    fn test_bar_chart_paints_series_pixels() {
        let mut figure = Figure::new();
        figure.bar(vec![0.5, 0.5]);
        let png = figure.render_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        let blue = decoded
            .pixels()
            .filter(|p| p.0 == [56, 116, 203, 255])
            .count();
        assert!(blue > 100, "expected bar pixels, found {blue}");
    }

    #[test]
    fn test_line_chart_renders() {
        let mut figure = Figure::new();
        let xs: Vec<f64> = (0..50).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| (x / 5.0).sin()).collect();
        figure.line(xs, ys);
        let png = figure.render_png_sized(320, 200).unwrap();
        assert!(image::load_from_memory(&png).is_ok());
    }

    #[test]
    fn test_deterministic_output() {
        let mut a = Figure::new();
        a.bar(vec![0.25, 0.75]);
        let mut b = Figure::new();
        b.bar(vec![0.25, 0.75]);
        assert_eq!(a.render_png().unwrap(), b.render_png().unwrap());
    }
}
