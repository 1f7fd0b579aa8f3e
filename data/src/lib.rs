pub mod chart;
pub mod config;
pub mod series;

pub use chart::heatmap::{
    BucketMap, Bounds, Card, CardStats, Heatmap, HeatmapStats, Point, XBucket, YBucket,
    bucket_labels, convert_to_cards, convert_to_heatmap, histogram_to_heatmap,
    is_heatmap_data_equal, merge_zero_buckets,
    scale::{self, ScaleKind},
};
pub use config::{BoundSemantics, BucketSize, Config, DataFormat, YAxis};
pub use series::{DataPoint, Series, SeriesStats};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unsupported log base: {0}")]
    LogBase(u32),
    #[error("Invalid bucket size: {0}")]
    BucketSize(f64),
    #[error("Invalid interval: {0}")]
    Interval(String),
    #[error("Error parsing histogram label: {0} is not a number")]
    HistogramLabel(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
