//! CSV export of loaded tracks

use viv_core::types::{Track, TrackField};

/// Serialize tracks as CSV, one header row of column labels then one row per
/// track in schema order
///
/// Cells are written as-is: delimiters inside titles are not quoted.
pub fn tracks_to_csv(tracks: &[Track]) -> String {
    let header = TrackField::ALL
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(",");

    let mut rows = Vec::with_capacity(tracks.len() + 1);
    rows.push(header);
    for track in tracks {
        rows.push(
            TrackField::ALL
                .iter()
                .map(|field| track.value(*field).to_string())
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    rows.join("\n")
}
