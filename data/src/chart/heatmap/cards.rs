use serde::Serialize;

use super::{Bounds, Heatmap};

/// One renderable cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub x: f64,
    pub y: f64,
    pub count: f64,
    pub values: Vec<f64>,
    pub y_bounds: Bounds,
}

/// Count extrema, for the colour and opacity scales.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CardStats {
    pub min: f64,
    pub max: f64,
}

/// Flattens the grid into cards, in column then row insertion order.
///
/// Hidden zero-count cells still take part in the extrema.
pub fn convert_to_cards(heatmap: &Heatmap, hide_zero: bool) -> (Vec<Card>, CardStats) {
    let mut cards = Vec::new();
    let mut stats: Option<CardStats> = None;

    for column in heatmap.values() {
        for bucket in column.buckets.values() {
            let count = bucket.count;

            stats = Some(match stats {
                None => CardStats {
                    min: count,
                    max: count,
                },
                Some(CardStats { min, max }) => CardStats {
                    min: if count < min { count } else { min },
                    max: if count > max { count } else { max },
                },
            });

            if hide_zero && count == 0.0 {
                continue;
            }

            cards.push(Card {
                x: column.x,
                y: bucket.y,
                count,
                values: bucket.values.clone(),
                y_bounds: bucket.bounds,
            });
        }
    }

    (cards, stats.unwrap_or_default())
}
