use super::Heatmap;

/// Whether two grids hold the same values in the same cells.
///
/// Values are compared as multisets, accumulation order does not matter.
/// Only used to skip re-rendering when a recompute changed nothing.
pub fn is_heatmap_data_equal(a: &Heatmap, b: &Heatmap) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().all(|(x, column_a)| {
        let Some(column_b) = b.get(x) else {
            return false;
        };

        if column_a.buckets.len() != column_b.buckets.len() {
            return false;
        }

        column_a.buckets.iter().all(|(y, bucket_a)| {
            column_b
                .buckets
                .get(y)
                .is_some_and(|bucket_b| sorted(&bucket_a.values) == sorted(&bucket_b.values))
        })
    })
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}
