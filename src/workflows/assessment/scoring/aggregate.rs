use std::collections::BTreeMap;

use crate::workflows::assessment::instrument::Instrument;

use super::ScoredItem;

/// Round to the 2-decimal display precision. Internal math stays at full
/// float precision until this final step.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Dimension means and aggregate indices for one scored submission.
///
/// Every instrument dimension appears as a key; a dimension with zero
/// scorable items is `None`, never zero, so absent data stays distinguishable
/// from a neutral score. A `None` dimension is excluded from its index's
/// input set; the index itself is `None` only when that set ends up empty.
/// Indices are computed over the unrounded dimension means; rounding happens
/// once, on the returned values.
pub(crate) fn aggregate(
    instrument: &Instrument,
    items: &[ScoredItem],
) -> (BTreeMap<String, Option<f64>>, BTreeMap<String, Option<f64>>) {
    let mut raw_dimensions = BTreeMap::new();
    for dimension in &instrument.dimensions {
        let observed: Vec<f64> = items
            .iter()
            .filter(|item| item.dimension == dimension.code)
            .filter_map(|item| item.score)
            .collect();
        raw_dimensions.insert(dimension.code.clone(), mean(&observed));
    }

    let mut indices = BTreeMap::new();
    for index in &instrument.aggregate_indices {
        let available: Vec<f64> = index
            .dimensions
            .iter()
            .filter_map(|code| raw_dimensions.get(code).copied().flatten())
            .collect();
        indices.insert(index.id.clone(), mean(&available).map(round2));
    }

    let dimensions = raw_dimensions
        .into_iter()
        .map(|(code, score)| (code, score.map(round2)))
        .collect();

    (dimensions, indices)
}
