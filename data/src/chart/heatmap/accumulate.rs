use std::sync::Arc;

use super::scale::{ScaleKind, linear_bucket_bounds};
use super::{BucketMap, Heatmap, Point, XBucket, YBucket};
use crate::series::Series;

/// Buckets raw series into a sparse time/value grid.
///
/// Time buckets are always linear with width `x_bucket_size`. Value buckets follow `scale`,
/// `y_bucket_size` being the width on a linear scale and the split factor on a log one.
/// Both sizes must be positive.
pub fn convert_to_heatmap(
    series: &[Series],
    y_bucket_size: f64,
    x_bucket_size: f64,
    scale: ScaleKind,
) -> Heatmap {
    let columns = push_to_x_buckets(series, x_bucket_size, scale);

    let mut heatmap = Heatmap::new();
    for (x, points) in columns.iter() {
        heatmap.insert(
            x,
            XBucket {
                x,
                buckets: convert_to_y_buckets(points, y_bucket_size, scale),
            },
        );
    }

    heatmap
}

fn push_to_x_buckets(
    series: &[Series],
    x_bucket_size: f64,
    scale: ScaleKind,
) -> BucketMap<Vec<Point>> {
    let mut columns = BucketMap::new();
    let mut skipped = 0usize;

    for s in series {
        let name: Arc<str> = Arc::from(s.label.as_str());

        for datapoint in &s.datapoints {
            let (Some(value), Some(time)) = (datapoint.value(), datapoint.time()) else {
                skipped += 1;
                continue;
            };

            if !scale.accepts(value) {
                skipped += 1;
                continue;
            }

            let x = linear_bucket_bounds(time, x_bucket_size).bottom;

            columns.get_or_insert_with(x, Vec::new).push(Point {
                value,
                time,
                series: Arc::clone(&name),
                scale_count: datapoint.scale_count(),
            });
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} points without a bucketable value or timestamp");
    }

    columns
}

fn convert_to_y_buckets(
    points: &[Point],
    y_bucket_size: f64,
    scale: ScaleKind,
) -> BucketMap<YBucket> {
    let mut buckets = BucketMap::new();

    for point in points {
        let bounds = scale.bucket_bounds(point.value, y_bucket_size);
        let bucket = buckets.get_or_insert_with(bounds.bottom, || YBucket::new(bounds));

        bucket.count += point.scale_count.unwrap_or(1.0);
        bucket.values.push(point.value);
        bucket.points.push(point.clone());
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::DataPoint;
    use proptest::prelude::*;

    const T0: f64 = 1422774000000.0;
    const T1: f64 = 1422774060000.0;

    fn three_series() -> Vec<Series> {
        vec![
            Series::from_points("1", [(1.0, T0), (1.0, T0 + 10.0), (2.0, T1)]),
            Series::from_points("2", [(2.0, T0), (2.0, T0 + 10.0), (3.0, T1)]),
            Series::from_points("3", [(5.0, T0), (3.0, T0 + 10.0), (4.0, T1)]),
        ]
    }

    fn bucket(heatmap: &Heatmap, x: f64, y: f64) -> &YBucket {
        heatmap.get(x).and_then(|col| col.buckets.get(y)).unwrap()
    }

    #[test]
    fn buckets_series_by_time_and_value() {
        let heatmap = convert_to_heatmap(&three_series(), 2.0, 60_000.0, ScaleKind::Linear);

        assert_eq!(heatmap.keys().collect::<Vec<_>>(), vec![T0, T1]);

        let cases: [(f64, f64, &[f64], f64); 5] = [
            (T0, 0.0, &[1.0, 1.0], 2.0),
            (T0, 2.0, &[2.0, 2.0, 3.0], 3.0),
            (T0, 4.0, &[5.0], 1.0),
            (T1, 2.0, &[2.0, 3.0], 2.0),
            (T1, 4.0, &[4.0], 1.0),
        ];

        for (x, y, values, count) in cases {
            let yb = bucket(&heatmap, x, y);
            assert_eq!(yb.y, y);
            assert_eq!(yb.values, values);
            assert_eq!(yb.count, count);
            assert_eq!(yb.bounds.top, Some(y + 2.0));
        }

        assert_eq!(heatmap.get(T0).unwrap().buckets.len(), 3);
        assert_eq!(heatmap.get(T1).unwrap().buckets.len(), 2);
    }

    #[test]
    fn points_remember_their_series() {
        let heatmap = convert_to_heatmap(&three_series(), 2.0, 60_000.0, ScaleKind::Linear);

        let names = bucket(&heatmap, T0, 2.0)
            .points
            .iter()
            .map(|p| p.series.as_ref())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["2", "2", "3"]);
    }

    #[test]
    fn log_scale_buckets_by_power() {
        let series = vec![Series::from_points(
            "s",
            [(1.0, T0), (3.0, T0), (4.0, T0), (10.0, T0), (0.0, T0), (-2.0, T0)],
        )];
        let scale = ScaleKind::Log {
            base: 2.0,
            split_factor: None,
        };

        let heatmap = convert_to_heatmap(&series, 1.0, 60_000.0, scale);
        let column = &heatmap.get(T0).unwrap().buckets;

        assert_eq!(column.keys().collect::<Vec<_>>(), vec![1.0, 2.0, 4.0, 8.0, 0.0]);
        assert_eq!(column.get(4.0).unwrap().bounds.top, Some(8.0));
        assert_eq!(column.get(0.0).unwrap().values, vec![0.0]);
    }

    #[test]
    fn skips_missing_and_nan_points() {
        let series = vec![Series::new(
            "s",
            vec![
                DataPoint(None, Some(T0), None),
                DataPoint(Some(f64::NAN), Some(T0), None),
                DataPoint(Some(1.0), None, None),
                DataPoint::new(1.0, T0),
            ],
        )];

        let heatmap = convert_to_heatmap(&series, 1.0, 1_000.0, ScaleKind::Linear);
        assert_eq!(heatmap.len(), 1);
        assert_eq!(bucket(&heatmap, T0, 1.0).count, 1.0);
    }

    #[test]
    fn scale_count_replaces_unit_count() {
        let series = vec![Series::new(
            "s",
            vec![
                DataPoint::with_scale_count(3.0, T0, 10.0),
                DataPoint::new(3.5, T0),
            ],
        )];

        let heatmap = convert_to_heatmap(&series, 1.0, 1_000.0, ScaleKind::Linear);
        let yb = bucket(&heatmap, T0, 3.0);
        assert_eq!(yb.count, 11.0);
        assert_eq!(yb.values, vec![3.0, 3.5]);
    }

    #[test]
    fn empty_input_is_empty_grid() {
        assert!(convert_to_heatmap(&[], 1.0, 1_000.0, ScaleKind::Linear).is_empty());
    }

    proptest! {
        #[test]
        fn count_is_conserved(
            points in prop::collection::vec((-500i32..500, 0u32..100_000), 0..200),
            y_size in 1u32..50,
            x_size in 1u32..10_000,
        ) {
            let series = vec![Series::from_points(
                "s",
                points.iter().map(|&(v, t)| (f64::from(v), f64::from(t))),
            )];

            let heatmap = convert_to_heatmap(
                &series,
                f64::from(y_size),
                f64::from(x_size),
                ScaleKind::Linear,
            );

            let total: f64 = heatmap
                .values()
                .flat_map(|col| col.buckets.values())
                .map(|yb| yb.count)
                .sum();
            prop_assert_eq!(total, points.len() as f64);

            for column in heatmap.values() {
                for (y, yb) in column.buckets.iter() {
                    prop_assert_eq!(y, yb.y);
                    prop_assert_eq!(yb.count, yb.values.len() as f64);
                    prop_assert!(yb.count > 0.0);
                }
            }
        }
    }
}
