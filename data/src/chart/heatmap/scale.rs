use super::Bounds;
use crate::Error;

/// Log bases a value axis can be configured with, `1` meaning linear.
pub const LOG_BASES: [u32; 5] = [1, 2, 10, 32, 1024];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScaleKind {
    #[default]
    Linear,
    /// `split_factor` subdivides every power of `base` into that many slices.
    Log { base: f64, split_factor: Option<u32> },
}

impl ScaleKind {
    pub fn from_log_base(log_base: u32, split_factor: Option<u32>) -> Result<Self, Error> {
        match log_base {
            1 => Ok(ScaleKind::Linear),
            base if LOG_BASES.contains(&base) => Ok(ScaleKind::Log {
                base: f64::from(base),
                split_factor,
            }),
            other => Err(Error::LogBase(other)),
        }
    }

    pub fn is_log(&self) -> bool {
        matches!(self, ScaleKind::Log { .. })
    }

    pub fn log_base(&self) -> f64 {
        match self {
            ScaleKind::Linear => 1.0,
            ScaleKind::Log { base, .. } => *base,
        }
    }

    /// Whether a value can be placed in a bucket on this scale at all.
    pub fn accepts(&self, value: f64) -> bool {
        match self {
            ScaleKind::Linear => value.is_finite(),
            ScaleKind::Log { .. } => value.is_finite() && value >= 0.0,
        }
    }

    /// `bucket_size` is only read on linear scales, log buckets are sized by the split factor.
    pub fn bucket_bounds(&self, value: f64, bucket_size: f64) -> Bounds {
        match self {
            ScaleKind::Linear => linear_bucket_bounds(value, bucket_size),
            ScaleKind::Log { base, split_factor } => log_bucket_bounds(value, *split_factor, *base),
        }
    }

    /// Distance between two bounds, in base units on log scales.
    ///
    /// Zero is not a valid operand on a log scale.
    pub fn distance(&self, a: f64, b: f64) -> f64 {
        match self {
            ScaleKind::Linear => (b - a).abs(),
            ScaleKind::Log { base, .. } => logp(a.max(b) / a.min(b), *base),
        }
    }
}

pub fn logp(value: f64, base: f64) -> f64 {
    if base == 10.0 {
        value.log10()
    } else {
        value.log2() / base.log2()
    }
}

/// `bucket_size` must be positive.
pub fn linear_bucket_bounds(value: f64, bucket_size: f64) -> Bounds {
    let bottom = (value / bucket_size).floor() * bucket_size;

    Bounds {
        bottom,
        top: Some(bottom + bucket_size),
    }
}

pub fn log_bucket_bounds(value: f64, split_factor: Option<u32>, base: f64) -> Bounds {
    if value == 0.0 {
        return Bounds {
            bottom: 0.0,
            top: Some(0.0),
        };
    }

    let slices = match split_factor {
        None | Some(0) | Some(1) => 1.0,
        Some(split) => f64::from(split),
    };
    let mut slice = (logp(value, base) * slices).floor();

    // logp can land on the next power for values a few ulps below it
    if value.is_finite() {
        while base.powf(slice / slices) > value {
            slice -= 1.0;
        }
        while base.powf((slice + 1.0) / slices) <= value {
            slice += 1.0;
        }
    }

    Bounds {
        bottom: base.powf(slice / slices),
        top: Some(base.powf((slice + 1.0) / slices)),
    }
}

/// Smallest gap between consecutive bounds once sorted.
///
/// Used when a source delivers bucket bounds without a bucket width.
pub fn infer_bucket_size(bounds: &[f64], scale: ScaleKind) -> f64 {
    match bounds {
        [] => 0.0,
        [single] => *single,
        _ => {
            let mut sorted = bounds.to_vec();
            sorted.sort_by(f64::total_cmp);

            sorted
                .windows(2)
                .map(|pair| scale.distance(pair[1], pair[0]))
                .fold(f64::INFINITY, f64::min)
        }
    }
}

/// Lowest tick of a log axis: the power of `base` at or below `min_log`, or 1.
pub fn log_axis_min(min_log: Option<f64>, base: f64) -> f64 {
    match min_log {
        Some(min_log) if min_log > 0.0 && min_log <= 1.0 => {
            base.powf(logp(min_log, base).floor())
        }
        _ => 1.0,
    }
}
