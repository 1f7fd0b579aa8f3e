use super::{Bounds, Heatmap, XBucket, YBucket};
use crate::config::BoundSemantics;
use crate::series::Series;

/// Builds the grid from series that are already histogram buckets.
///
/// The bucket index is the series position, so callers sort or reverse the series
/// beforehand. Each point's value is that bucket's count at the point's timestamp.
pub fn histogram_to_heatmap(series: &[Series]) -> Heatmap {
    let mut heatmap = Heatmap::new();

    for (i, s) in series.iter().enumerate() {
        let bound = i as f64;

        for datapoint in &s.datapoints {
            let (Some(count), Some(time)) = (datapoint.value(), datapoint.time()) else {
                continue;
            };

            let column = heatmap.get_or_insert_with(time, || XBucket::new(time));
            let bucket = column.buckets.get_or_insert_with(bound, || {
                YBucket::new(Bounds {
                    bottom: bound,
                    top: None,
                })
            });

            bucket.count += count;
        }
    }

    heatmap
}

/// Axis labels for histogram buckets, in bucket order.
///
/// Labels name one edge of each bucket, so the axis needs one extra, empty label
/// on the side the labels don't cover.
pub fn bucket_labels(series: &[Series], semantics: BoundSemantics) -> Vec<String> {
    let labels = series.iter().map(|s| s.label.clone());

    match semantics {
        BoundSemantics::Upper => std::iter::once(String::new()).chain(labels).collect(),
        BoundSemantics::Lower => labels.chain(std::iter::once(String::new())).collect(),
    }
}
