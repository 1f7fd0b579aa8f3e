use serde::{Deserialize, Serialize};

use crate::Error;
use crate::chart::heatmap::HeatmapStats;
use crate::chart::heatmap::scale::ScaleKind;

pub mod interval;

pub use interval::interval_to_ms;

pub const X_BUCKET_NUMBER_DEFAULT: u32 = 30;
pub const Y_BUCKET_NUMBER_DEFAULT: u32 = 10;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// Raw samples, bucketed by value.
    #[default]
    TimeSeries,
    /// One pre-aggregated series per histogram bucket, named by its bound.
    TsBuckets,
}

/// Which edge of a histogram bucket its series label names.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundSemantics {
    #[default]
    Upper,
    Lower,
}

impl std::fmt::Display for BoundSemantics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundSemantics::Upper => write!(f, "Upper"),
            BoundSemantics::Lower => write!(f, "Lower"),
        }
    }
}

/// Time bucket width, either in milliseconds or as an interval string like `"1m"`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum BucketSize {
    Millis(f64),
    Interval(String),
}

impl BucketSize {
    pub fn to_millis(&self) -> Result<f64, Error> {
        match self {
            BucketSize::Millis(ms) => Ok(*ms),
            BucketSize::Interval(text) if interval::is_interval(text) => interval_to_ms(text),
            BucketSize::Interval(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::Interval(text.clone())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct YAxis {
    pub log_base: u32,
    pub split_factor: Option<u32>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Lowest tick the renderer draws on a log axis; derived from the data when unset.
    pub min_tick_value: Option<f64>,
}

impl Default for YAxis {
    fn default() -> Self {
        YAxis {
            log_base: 1,
            split_factor: None,
            min: None,
            max: None,
            min_tick_value: None,
        }
    }
}

impl YAxis {
    pub fn scale(&self) -> Result<ScaleKind, Error> {
        ScaleKind::from_log_base(self.log_base, self.split_factor)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub data_format: DataFormat,
    pub x_bucket_size: Option<BucketSize>,
    pub x_bucket_number: Option<u32>,
    pub y_bucket_size: Option<f64>,
    pub y_bucket_number: Option<u32>,
    pub y_axis: YAxis,
    pub hide_zero_buckets: bool,
    pub sort_by_label: bool,
    pub reverse_buckets: bool,
    pub cumulative_buckets: bool,
    pub bound_semantics: BoundSemantics,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn scale(&self) -> Result<ScaleKind, Error> {
        self.y_axis.scale()
    }

    /// Time bucket width for a query spanning `range_ms`.
    ///
    /// An explicit positive size wins, otherwise the range is split into `x_bucket_number` buckets.
    pub fn x_bucket_size_ms(&self, range_ms: f64) -> f64 {
        let number = self
            .x_bucket_number
            .filter(|n| *n > 0)
            .unwrap_or(X_BUCKET_NUMBER_DEFAULT);
        let by_number = (range_ms / f64::from(number)).floor();

        match self.x_bucket_size.as_ref().map(BucketSize::to_millis) {
            Some(Ok(ms)) if ms.is_finite() && ms > 0.0 => ms,
            Some(Err(err)) => {
                log::warn!("{err}, sizing time buckets by count instead");
                by_number
            }
            _ => by_number,
        }
    }

    /// Value bucket size: the split factor on log scales, a width on linear ones.
    pub fn y_bucket_size(&self, stats: &HeatmapStats, scale: ScaleKind) -> f64 {
        if let ScaleKind::Log { split_factor, .. } = scale {
            return f64::from(split_factor.filter(|s| *s > 0).unwrap_or(1));
        }

        if let Some(size) = self.y_bucket_size.filter(|s| s.is_finite() && *s > 0.0) {
            return size;
        }

        let min = self.y_axis.min.unwrap_or(stats.min);
        let max = self.y_axis.max.unwrap_or(stats.max);

        if max == min {
            if max != 0.0 { (max / 10.0).abs() } else { 0.1 }
        } else {
            let number = self
                .y_bucket_number
                .filter(|n| *n > 0)
                .unwrap_or(Y_BUCKET_NUMBER_DEFAULT);
            (max - min).abs() / f64::from(number)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(min: f64, max: f64) -> HeatmapStats {
        HeatmapStats {
            min,
            max,
            min_log: None,
        }
    }

    #[test]
    fn deserializes_with_defaults() {
        let config = Config::from_json(
            r#"{"dataFormat": "tsbuckets", "xBucketSize": "1m", "yAxis": {"logBase": 2, "splitFactor": 4}, "boundSemantics": "lower"}"#,
        )
        .unwrap();

        assert_eq!(config.data_format, DataFormat::TsBuckets);
        assert_eq!(config.x_bucket_size, Some(BucketSize::Interval("1m".to_string())));
        assert_eq!(config.bound_semantics, BoundSemantics::Lower);
        assert!(!config.hide_zero_buckets);
        assert_eq!(
            config.scale().unwrap(),
            ScaleKind::Log {
                base: 2.0,
                split_factor: Some(4)
            }
        );

        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
        assert_eq!(Config::default().y_axis.log_base, 1);
    }

    #[test]
    fn rejects_unsupported_log_base() {
        let config = Config::from_json(r#"{"yAxis": {"logBase": 3}}"#).unwrap();
        assert!(matches!(config.scale(), Err(Error::LogBase(3))));
    }

    #[test]
    fn x_bucket_size_sources() {
        let mut config = Config::default();
        assert_eq!(config.x_bucket_size_ms(60_000.0), 2_000.0);

        config.x_bucket_number = Some(7);
        assert_eq!(config.x_bucket_size_ms(100.0), 14.0);

        config.x_bucket_size = Some(BucketSize::Millis(250.0));
        assert_eq!(config.x_bucket_size_ms(100.0), 250.0);

        config.x_bucket_size = Some(BucketSize::Interval("2s".to_string()));
        assert_eq!(config.x_bucket_size_ms(100.0), 2_000.0);

        config.x_bucket_size = Some(BucketSize::Interval("500".to_string()));
        assert_eq!(config.x_bucket_size_ms(100.0), 500.0);

        config.x_bucket_size = Some(BucketSize::Interval("soon".to_string()));
        assert_eq!(config.x_bucket_size_ms(100.0), 14.0);

        config.x_bucket_size = Some(BucketSize::Millis(0.0));
        assert_eq!(config.x_bucket_size_ms(100.0), 14.0);
    }

    #[test]
    fn y_bucket_size_linear() {
        let mut config = Config::default();
        let scale = ScaleKind::Linear;

        assert_eq!(config.y_bucket_size(&stats(0.0, 100.0), scale), 10.0);
        assert_eq!(config.y_bucket_size(&stats(5.0, 5.0), scale), 0.5);
        assert_eq!(config.y_bucket_size(&stats(-5.0, -5.0), scale), 0.5);

        config.y_bucket_number = Some(4);
        config.y_axis.max = Some(20.0);
        assert_eq!(config.y_bucket_size(&stats(0.0, 100.0), scale), 5.0);

        config.y_bucket_size = Some(3.0);
        assert_eq!(config.y_bucket_size(&stats(0.0, 100.0), scale), 3.0);
    }

    #[test]
    fn y_bucket_size_log_is_split_factor() {
        let config = Config::default();
        let scale = ScaleKind::Log {
            base: 10.0,
            split_factor: Some(3),
        };
        assert_eq!(config.y_bucket_size(&stats(1.0, 1000.0), scale), 3.0);

        let whole = ScaleKind::Log {
            base: 10.0,
            split_factor: None,
        };
        assert_eq!(config.y_bucket_size(&stats(1.0, 1000.0), whole), 1.0);
    }
}
