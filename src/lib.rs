pub mod logger;
pub mod panel;

pub use data::{
    BoundSemantics, BucketSize, Card, CardStats, Config, DataFormat, DataPoint, Heatmap,
    HeatmapStats, Series, YAxis,
};
pub use panel::{HeatmapData, TimeRange, build};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Heatmap error: {0}")]
    Data(#[from] data::Error),
    #[error("Logger error: {0}")]
    Logger(#[from] logger::Error),
}
