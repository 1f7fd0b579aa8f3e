use super::{Bounds, Heatmap, YBucket};

/// Folds the zero bucket of a log-scale grid into the lowest drawn bucket.
///
/// `log(0)` has no place on the axis, so zeros share a cell with the bucket starting at
/// `min_tick_value`. The merged cell is stored under key `0`, the `min_tick_value` key
/// goes away. Columns with nothing to merge are left alone.
pub fn merge_zero_buckets(heatmap: &mut Heatmap, min_tick_value: f64) {
    if min_tick_value == 0.0 {
        return;
    }

    for column in heatmap.values_mut() {
        let buckets = &mut column.buckets;

        let zero = buckets.get(0.0);
        let min = buckets.get(min_tick_value);

        // an already merged zero bucket keeps its top once the min bucket is gone
        let top = match min {
            Some(min) => min.bounds.top,
            None => zero
                .filter(|z| z.bounds.bottom == min_tick_value)
                .and_then(|z| z.bounds.top),
        }
        .unwrap_or(min_tick_value);

        let mut merged = YBucket::new(Bounds {
            bottom: min_tick_value,
            top: Some(top),
        });
        merged.y = 0.0;

        for bucket in zero.into_iter().chain(min) {
            merged.values.extend_from_slice(&bucket.values);
            merged.points.extend_from_slice(&bucket.points);
        }
        merged.count = merged.values.len() as f64;

        if merged.is_empty() {
            continue;
        }

        buckets.remove(min_tick_value);
        buckets.insert(0.0, merged);
    }
}
