use std::sync::Arc;

use serde::Serialize;

use crate::series::Series;

mod accumulate;
mod buckets;
mod cards;
mod equal;
mod histogram;
pub mod scale;
mod zero;

pub use accumulate::convert_to_heatmap;
pub use buckets::BucketMap;
pub use cards::{Card, CardStats, convert_to_cards};
pub use equal::is_heatmap_data_equal;
pub use histogram::{bucket_labels, histogram_to_heatmap};
pub use zero::merge_zero_buckets;

/// Full bucket grid: time buckets in insertion order, keyed by their lower bound.
pub type Heatmap = BucketMap<XBucket>;

/// Half-open `[bottom, top)` interval covered by a bucket.
///
/// `top` is unknown for buckets merged from histogram series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub bottom: f64,
    pub top: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub value: f64,
    pub time: f64,
    pub series: Arc<str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_count: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YBucket {
    pub y: f64,
    pub bounds: Bounds,
    pub count: f64,
    pub values: Vec<f64>,
    pub points: Vec<Point>,
}

impl YBucket {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            y: bounds.bottom,
            bounds,
            count: 0.0,
            values: Vec::new(),
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XBucket {
    pub x: f64,
    pub buckets: BucketMap<YBucket>,
}

impl XBucket {
    pub fn new(x: f64) -> Self {
        Self {
            x,
            buckets: BucketMap::new(),
        }
    }
}

/// Extrema of the raw series values, used to size the value axis before bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapStats {
    pub min: f64,
    pub max: f64,
    #[serde(rename = "minLog")]
    pub min_log: Option<f64>,
}

impl Default for HeatmapStats {
    /// Range used when the series carry no usable value.
    fn default() -> Self {
        Self {
            min: -1.0,
            max: 1.0,
            min_log: Some(1.0),
        }
    }
}

impl HeatmapStats {
    /// `None` when no series holds a usable value, or every value is zero.
    pub fn from_series(series: &[Series]) -> Option<Self> {
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        let mut min_log: Option<f64> = None;

        for stats in series.iter().map(Series::stats) {
            if let Some(value) = stats.min {
                min = Some(min.map_or(value, |m| m.min(value)));
            }
            if let Some(value) = stats.max {
                max = Some(max.map_or(value, |m| m.max(value)));
            }
            if let Some(value) = stats.log_min {
                min_log = Some(min_log.map_or(value, |m| m.min(value)));
            }
        }

        match (min, max) {
            (Some(min), Some(max)) if min != 0.0 || max != 0.0 => Some(Self { min, max, min_log }),
            _ => None,
        }
    }
}
