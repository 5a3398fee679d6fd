use crate::types::variable::Variable;
use ordered_float::OrderedFloat;
use serde::Serialize;

/// Input of a histogram: the observed values of one variable and the bin count to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramData {
    pub variable: Variable,
    pub values: Vec<f64>,
    pub bins: usize,
}

/// One bar of a histogram, covering `[start, end)`; the last bar also includes `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramData {
    /// `true` when there is nothing to draw; the renderer shows an empty chart.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Splits `[min, max]` of the finite values into `bins` equal-width bins and counts the
    /// values falling in each.
    ///
    /// When every value is equal the range is widened to `value ± 0.5`. Without finite
    /// values the result is empty.
    pub fn bin_counts(&self) -> Vec<HistogramBin> {
        let finite = || self.values.iter().copied().filter(|v| v.is_finite());
        let (Some(min), Some(max)) = (
            finite().map(OrderedFloat).min().map(|v| v.0),
            finite().map(OrderedFloat).max().map(|v| v.0),
        ) else {
            return Vec::new();
        };
        let (low, high) = if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };

        let bins = self.bins.max(1);
        let width = (high - low) / bins as f64;
        let mut counts = vec![0usize; bins];
        for value in finite() {
            let idx = (((value - low) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: low + width * i as f64,
                end: if i + 1 == bins {
                    high
                } else {
                    low + width * (i + 1) as f64
                },
                count,
            })
            .collect()
    }
}
