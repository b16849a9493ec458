//! Histogram of a single numeric column.

use super::{DEFAULT_BINS, RenderingStrategy, draw_empty, style, unexpected_series};
use crate::error::RenderError;
use crate::shape::{NormalizedResultSet, Series};
use plotters::prelude::*;
use std::path::Path;

/// One equal-width bin. `upper` is exclusive except on the last bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// Splits `samples` into `bins` equal-width bins over `[min, max]`.
///
/// Every sample lands in exactly one bin: the last bin is closed on both
/// ends. When all samples are equal the range is widened by 0.5 each side.
/// Non-finite samples are ignored.
pub fn histogram_bins(samples: &[f64], bins: usize) -> Vec<HistogramBin> {
    let bins = bins.max(1);
    let finite = samples.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() {
        return Vec::new();
    }
    let (min, max) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for sample in samples.iter().copied().filter(|v| v.is_finite()) {
        let index = (((sample - min) / width) as usize).min(bins - 1);
        out[index].count += 1;
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramRenderer {
    pub bins: usize,
}

impl HistogramRenderer {
    pub fn new(bins: usize) -> Self {
        Self { bins }
    }
}

impl Default for HistogramRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_BINS)
    }
}

impl RenderingStrategy for HistogramRenderer {
    fn draw(
        &self,
        data: &NormalizedResultSet,
        title: &str,
        destination: &Path,
    ) -> Result<(), RenderError> {
        let Series::Samples(samples) = &data.series else {
            return Err(unexpected_series("histogram", data));
        };

        let root = SVGBackend::new(destination, style::CANVAS).into_drawing_area();
        root.fill(&WHITE)?;

        let bins = histogram_bins(samples, self.bins);
        let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
            draw_empty(&root, title)?;
            root.present()?;
            return Ok(());
        };
        let tallest = bins.iter().map(|b| b.count).max().unwrap_or(0);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, style::title_style())
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(
                first.lower..last.upper,
                0.0..style::value_ceiling(tallest as f64),
            )?;

        let x_label = |v: &f64| format!("{:.1}", v);
        let count_label = |v: &f64| format!("{:.0}", v);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&x_label)
            .y_label_formatter(&count_label)
            .label_style(style::tick_style())
            .x_desc(data.axis.x.as_str())
            .y_desc(data.axis.y.as_str())
            .axis_desc_style(style::label_style())
            .draw()?;

        let fill = style::primary().filled();
        chart.draw_series(bins.iter().map(|bin| {
            Rectangle::new([(bin.lower, 0.0), (bin.upper, bin.count as f64)], fill)
        }))?;
        chart.draw_series(bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.lower, 0.0), (bin.upper, bin.count as f64)],
                WHITE.stroke_width(1),
            )
        }))?;

        root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sample_lands_in_one_bin() {
        let samples: Vec<f64> = (0..=100).map(f64::from).collect();
        let bins = histogram_bins(&samples, 20);
        assert_eq!(bins.len(), 20);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), 101);
        // the maximum falls into the closed last bin
        assert_eq!(bins[19].count, 6);
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[19].upper, 100.0);
    }

    #[test]
    fn constant_samples_widen_the_range() {
        let bins = histogram_bins(&[7.0, 7.0, 7.0], 2);
        assert_eq!(bins[0].lower, 6.5);
        assert_eq!(bins[1].upper, 7.5);
        assert_eq!(bins[1].count, 3);
    }

    #[test]
    fn no_finite_samples_means_no_bins() {
        assert!(histogram_bins(&[], 20).is_empty());
        assert!(histogram_bins(&[f64::NAN], 20).is_empty());
    }
}
