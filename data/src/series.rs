use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::Error;

/// One sample in the compact `[value, timestampMs]` shape.
///
/// A third element carries a pre-aggregated count that replaces the usual one-per-point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DataPoint(pub Option<f64>, pub Option<f64>, pub Option<f64>);

impl<'de> Deserialize<'de> for DataPoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<Option<f64>>::deserialize(deserializer)?;

        match raw.as_slice() {
            [value, time] => Ok(Self(*value, *time, None)),
            [value, time, scale_count] => Ok(Self(*value, *time, *scale_count)),
            _ => Err(de::Error::invalid_length(
                raw.len(),
                &"a [value, time] or [value, time, count] array",
            )),
        }
    }
}

impl DataPoint {
    pub fn new(value: f64, time: f64) -> Self {
        Self(Some(value), Some(time), None)
    }

    pub fn with_scale_count(value: f64, time: f64, scale_count: f64) -> Self {
        Self(Some(value), Some(time), Some(scale_count))
    }

    pub fn value(&self) -> Option<f64> {
        self.0.filter(|v| !v.is_nan())
    }

    pub fn time(&self) -> Option<f64> {
        self.1.filter(|t| t.is_finite())
    }

    pub fn scale_count(&self) -> Option<f64> {
        self.2.filter(|c| !c.is_nan())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(from = "RawSeries")]
pub struct Series {
    pub label: String,
    pub datapoints: Vec<DataPoint>,
}

/// Series as sent by hosts, which may name it under any of `label`, `alias` and `target`.
#[derive(Deserialize)]
struct RawSeries {
    label: Option<String>,
    alias: Option<String>,
    target: Option<String>,
    #[serde(default)]
    datapoints: Vec<DataPoint>,
}

impl From<RawSeries> for Series {
    fn from(raw: RawSeries) -> Self {
        Self {
            label: raw.label.or(raw.alias).or(raw.target).unwrap_or_default(),
            datapoints: raw.datapoints,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeriesStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Smallest strictly positive value.
    pub log_min: Option<f64>,
}

impl Series {
    pub fn new(label: impl Into<String>, datapoints: Vec<DataPoint>) -> Self {
        Self {
            label: label.into(),
            datapoints,
        }
    }

    pub fn from_points(
        label: impl Into<String>,
        points: impl IntoIterator<Item = (f64, f64)>,
    ) -> Self {
        Self::new(
            label,
            points
                .into_iter()
                .map(|(value, time)| DataPoint::new(value, time))
                .collect(),
        )
    }

    pub fn list_from_json(json: &str) -> Result<Vec<Series>, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn stats(&self) -> SeriesStats {
        self.datapoints
            .iter()
            .filter_map(DataPoint::value)
            .filter(|v| v.is_finite())
            .fold(SeriesStats::default(), |acc, v| SeriesStats {
                min: Some(acc.min.map_or(v, |m| m.min(v))),
                max: Some(acc.max.map_or(v, |m| m.max(v))),
                log_min: if v > 0.0 {
                    Some(acc.log_min.map_or(v, |m| m.min(v)))
                } else {
                    acc.log_min
                },
            })
    }

    /// The bucket bound encoded in a histogram series label.
    pub fn histogram_bound(&self) -> Result<f64, Error> {
        parse_histogram_label(&self.label)
    }
}

pub fn parse_histogram_label(label: &str) -> Result<f64, Error> {
    let trimmed = label.trim();

    if trimmed == "+Inf" || trimmed == "inf" {
        return Ok(f64::INFINITY);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if !value.is_nan() => Ok(value),
        _ => Err(Error::HistogramLabel(label.to_string())),
    }
}

/// Sorts histogram series by the bound in their label, ascending.
///
/// Leaves the order untouched and returns `false` if any label is not a bound.
pub fn sort_series_by_label(series: &mut [Series]) -> bool {
    let bounds = match series
        .iter()
        .map(Series::histogram_bound)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(bounds) => bounds,
        Err(err) => {
            log::warn!("Not sorting histogram series: {err}");
            return false;
        }
    };

    let mut keyed = bounds
        .into_iter()
        .zip(series.iter_mut().map(std::mem::take))
        .collect::<Vec<_>>();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (slot, (_, sorted)) in series.iter_mut().zip(keyed) {
        *slot = sorted;
    }

    true
}

/// Turns cumulative bucket series (each holding everything at or below its bound)
/// into per-bucket counts. Series must already be ordered by bound.
pub fn cumulative_to_ordinary(series: &mut [Series]) {
    for i in (1..series.len()).rev() {
        let (lower, upper) = series.split_at_mut(i);
        let below = &lower[i - 1].datapoints;

        for (j, point) in upper[0].datapoints.iter_mut().enumerate() {
            let below_value = below.get(j).and_then(DataPoint::value).unwrap_or(0.0);

            if let Some(value) = point.0.as_mut() {
                *value -= below_value;
            }
        }
    }
}
