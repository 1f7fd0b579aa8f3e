use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Error;
use data::chart::heatmap::scale::{ScaleKind, infer_bucket_size, log_axis_min};
use data::series::{cumulative_to_ordinary, sort_series_by_label};
use data::{
    Card, CardStats, Config, DataFormat, Heatmap, HeatmapStats, Series, bucket_labels,
    convert_to_cards, convert_to_heatmap, histogram_to_heatmap, is_heatmap_data_equal,
    merge_zero_buckets,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    pub fn from_millis(from: i64, to: i64) -> Option<Self> {
        Some(Self {
            from: DateTime::from_timestamp_millis(from)?,
            to: DateTime::from_timestamp_millis(to)?,
        })
    }

    pub fn span_ms(&self) -> f64 {
        (self.to - self.from).num_milliseconds() as f64
    }
}

/// Everything the renderer needs for one frame of the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapData {
    /// Kept for tooltip lookups by cell.
    pub buckets: Heatmap,
    pub cards: Vec<Card>,
    pub card_stats: CardStats,
    pub heatmap_stats: HeatmapStats,
    pub x_bucket_size: f64,
    pub y_bucket_size: f64,
    /// Axis labels when the series were histogram buckets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts_buckets: Option<Vec<String>>,
}

impl HeatmapData {
    /// Whether `other` would render the same cells, so a redraw can be skipped.
    ///
    /// Histogram cells carry no values, so their counts and axis labels are compared too.
    pub fn is_same_grid(&self, other: &HeatmapData) -> bool {
        is_heatmap_data_equal(&self.buckets, &other.buckets)
            && self.ts_buckets == other.ts_buckets
            && same_counts(&self.buckets, &other.buckets)
    }
}

fn same_counts(a: &Heatmap, b: &Heatmap) -> bool {
    a.iter().all(|(x, column_a)| {
        b.get(x).is_some_and(|column_b| {
            column_a.buckets.iter().all(|(y, bucket_a)| {
                column_b
                    .buckets
                    .get(y)
                    .is_some_and(|bucket_b| bucket_a.count == bucket_b.count)
            })
        })
    })
}

/// Buckets `series` according to `config`, sizing time buckets against `range`.
pub fn build(series: Vec<Series>, config: &Config, range: TimeRange) -> Result<HeatmapData, Error> {
    let scale = config.scale()?;

    match config.data_format {
        DataFormat::TimeSeries => build_time_series(&series, config, scale, range),
        DataFormat::TsBuckets => Ok(build_ts_buckets(series, config)),
    }
}

fn build_time_series(
    series: &[Series],
    config: &Config,
    scale: ScaleKind,
    range: TimeRange,
) -> Result<HeatmapData, Error> {
    let stats = HeatmapStats::from_series(series);
    let heatmap_stats = stats.unwrap_or_default();

    let x_bucket_size = checked_size(config.x_bucket_size_ms(range.span_ms()))?;
    let y_bucket_size = match (stats, scale) {
        (None, ScaleKind::Linear) => 1.0,
        _ => checked_size(config.y_bucket_size(&heatmap_stats, scale))?,
    };

    log::debug!(
        "Bucketing {} series, x bucket {x_bucket_size}ms, y bucket {y_bucket_size}",
        series.len()
    );

    let mut buckets = convert_to_heatmap(series, y_bucket_size, x_bucket_size, scale);

    if let ScaleKind::Log { base, .. } = scale {
        let min_tick_value = config
            .y_axis
            .min_tick_value
            .unwrap_or_else(|| log_axis_min(heatmap_stats.min_log, base));
        merge_zero_buckets(&mut buckets, min_tick_value);
    }

    let (cards, card_stats) = convert_to_cards(&buckets, config.hide_zero_buckets);

    Ok(HeatmapData {
        buckets,
        cards,
        card_stats,
        heatmap_stats,
        x_bucket_size,
        y_bucket_size,
        ts_buckets: None,
    })
}

fn build_ts_buckets(mut series: Vec<Series>, config: &Config) -> HeatmapData {
    if config.sort_by_label {
        sort_series_by_label(&mut series);
    }
    if config.cumulative_buckets {
        cumulative_to_ordinary(&mut series);
    }
    if config.reverse_buckets {
        series.reverse();
    }

    let heatmap_stats = HeatmapStats::from_series(&series).unwrap_or_default();
    let buckets = histogram_to_heatmap(&series);
    let ts_buckets = bucket_labels(&series, config.bound_semantics);

    let x_bounds = buckets.keys().collect::<Vec<_>>();
    let x_bucket_size = infer_bucket_size(&x_bounds, ScaleKind::Linear);

    let (cards, card_stats) = convert_to_cards(&buckets, config.hide_zero_buckets);

    HeatmapData {
        buckets,
        cards,
        card_stats,
        heatmap_stats,
        x_bucket_size,
        y_bucket_size: 1.0,
        ts_buckets: Some(ts_buckets),
    }
}

fn checked_size(size: f64) -> Result<f64, Error> {
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(data::Error::BucketSize(size).into())
    }
}
