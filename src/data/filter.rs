use log::debug;

use super::model::{IncidentRecord, ParsedRow};
use crate::config::BoundingBox;

// ---------------------------------------------------------------------------
// Coordinate filter
// ---------------------------------------------------------------------------

/// Keep only rows with both coordinates present, finite and inside `bounds`.
///
/// A row is dropped when:
/// * latitude or longitude is missing (empty cell, `NaN`, `NA`, ...)
/// * either value lies outside the box (bounds are inclusive)
///
/// Surviving rows keep their relative input order.
pub fn filter_valid_coordinates(rows: Vec<ParsedRow>, bounds: &BoundingBox) -> Vec<IncidentRecord> {
    let total = rows.len();
    let mut missing = 0usize;

    let kept: Vec<IncidentRecord> = rows
        .into_iter()
        .filter_map(|row| {
            let (Some(latitude), Some(longitude)) = (row.latitude, row.longitude) else {
                missing += 1;
                return None;
            };
            if !bounds.contains(latitude, longitude) {
                return None;
            }
            Some(IncidentRecord {
                incident_date: row.incident_date,
                latitude,
                longitude,
                incident_category: row.incident_category,
                extra: row.extra,
            })
        })
        .collect();

    debug!(
        "coordinate filter: {total} rows in, {} kept, {missing} missing coordinates, {} out of bounds",
        kept.len(),
        total - kept.len() - missing
    );
    kept
}
