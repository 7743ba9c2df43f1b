//! Static track schema
//!
//! `TrackField` is the single ordered list of track columns. The storage layer
//! builds its column lists from it, the importer uses it to find dataset
//! columns, and the presentation layer uses it for table headers, cells and CSV.

use serde::Serialize;
use std::fmt;

/// Semantic type of a track column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// 64-bit signed integer (`INTEGER` in SQLite)
    Integer,
    /// Double precision float (`REAL` in SQLite)
    Real,
    /// UTF-8 text (`VARCHAR` in SQLite)
    Text,
}

/// One track column, in declared (presentation) order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackField {
    Idx,
    Title,
    Rating,
    Duration,
    Id,
    Class,
    Acousticness,
    Danceability,
    Energy,
    Instrumentalness,
    Key,
    Liveness,
    Loudness,
    Mode,
    NumBars,
    NumSections,
    NumSegments,
    Tempo,
    TimeSignature,
    Valence,
}

impl TrackField {
    /// Every column in declared order
    pub const ALL: [TrackField; 20] = [
        TrackField::Idx,
        TrackField::Title,
        TrackField::Rating,
        TrackField::Duration,
        TrackField::Id,
        TrackField::Class,
        TrackField::Acousticness,
        TrackField::Danceability,
        TrackField::Energy,
        TrackField::Instrumentalness,
        TrackField::Key,
        TrackField::Liveness,
        TrackField::Loudness,
        TrackField::Mode,
        TrackField::NumBars,
        TrackField::NumSections,
        TrackField::NumSegments,
        TrackField::Tempo,
        TrackField::TimeSignature,
        TrackField::Valence,
    ];

    /// Name used in the JSON representation (and therefore in patch paths)
    pub fn json_name(self) -> &'static str {
        match self {
            TrackField::Idx => "idx",
            TrackField::Title => "title",
            TrackField::Rating => "rating",
            TrackField::Duration => "duration",
            TrackField::Id => "id",
            TrackField::Class => "class",
            TrackField::Acousticness => "acousticness",
            TrackField::Danceability => "danceability",
            TrackField::Energy => "energy",
            TrackField::Instrumentalness => "instrumentalness",
            TrackField::Key => "key",
            TrackField::Liveness => "liveness",
            TrackField::Loudness => "loudness",
            TrackField::Mode => "mode",
            TrackField::NumBars => "numBars",
            TrackField::NumSections => "numSections",
            TrackField::NumSegments => "numSegments",
            TrackField::Tempo => "tempo",
            TrackField::TimeSignature => "timeSignature",
            TrackField::Valence => "valence",
        }
    }

    /// Column name in the `tracks` table
    pub fn sql_column(self) -> &'static str {
        match self {
            TrackField::Idx => "idx",
            TrackField::Rating => "rating",
            other => other
                .dataset_column()
                .unwrap_or_else(|| other.json_name()),
        }
    }

    /// Column name in the column-oriented dataset file
    ///
    /// `idx` comes from the row keys and `rating` is not part of the dataset.
    pub fn dataset_column(self) -> Option<&'static str> {
        match self {
            TrackField::Idx | TrackField::Rating => None,
            TrackField::Title => Some("title"),
            TrackField::Duration => Some("duration_ms"),
            TrackField::Id => Some("id"),
            TrackField::Class => Some("class"),
            TrackField::Acousticness => Some("acousticness"),
            TrackField::Danceability => Some("danceability"),
            TrackField::Energy => Some("energy"),
            TrackField::Instrumentalness => Some("instrumentalness"),
            TrackField::Key => Some("key"),
            TrackField::Liveness => Some("liveness"),
            TrackField::Loudness => Some("loudness"),
            TrackField::Mode => Some("mode"),
            TrackField::NumBars => Some("num_bars"),
            TrackField::NumSections => Some("num_sections"),
            TrackField::NumSegments => Some("num_segments"),
            TrackField::Tempo => Some("tempo"),
            TrackField::TimeSignature => Some("time_signature"),
            TrackField::Valence => Some("valence"),
        }
    }

    /// Human-readable label (table header, CSV header)
    pub fn label(self) -> &'static str {
        match self {
            TrackField::Idx => "Index",
            TrackField::Title => "Title",
            TrackField::Rating => "Rating",
            TrackField::Duration => "Duration",
            TrackField::Id => "ID",
            TrackField::Class => "Class",
            TrackField::Acousticness => "Acousticness",
            TrackField::Danceability => "Danceability",
            TrackField::Energy => "Energy",
            TrackField::Instrumentalness => "Instrumentalness",
            TrackField::Key => "Key",
            TrackField::Liveness => "Liveliness",
            TrackField::Loudness => "Loudness",
            TrackField::Mode => "Mode",
            TrackField::NumBars => "# of Bars",
            TrackField::NumSections => "# of Sections",
            TrackField::NumSegments => "# of Segments",
            TrackField::Tempo => "Tempo",
            TrackField::TimeSignature => "Signature",
            TrackField::Valence => "Valence",
        }
    }

    /// Semantic type of the column
    pub fn kind(self) -> FieldKind {
        match self {
            TrackField::Id | TrackField::Title => FieldKind::Text,
            TrackField::Acousticness
            | TrackField::Danceability
            | TrackField::Energy
            | TrackField::Instrumentalness
            | TrackField::Liveness
            | TrackField::Loudness
            | TrackField::Tempo
            | TrackField::Valence => FieldKind::Real,
            TrackField::Idx
            | TrackField::Rating
            | TrackField::Duration
            | TrackField::Class
            | TrackField::Key
            | TrackField::Mode
            | TrackField::NumBars
            | TrackField::NumSections
            | TrackField::NumSegments
            | TrackField::TimeSignature => FieldKind::Integer,
        }
    }

    /// Whether the column is part of the `(idx, id)` primary key
    pub fn is_key(self) -> bool {
        matches!(self, TrackField::Idx | TrackField::Id)
    }

    /// Columns that must be present in a dataset file
    pub fn dataset_columns() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().filter_map(TrackField::dataset_column)
    }

    /// Columns that can change after a track is created
    pub fn mutable() -> impl Iterator<Item = TrackField> {
        Self::ALL.into_iter().filter(|field| !field.is_key())
    }
}

impl fmt::Display for TrackField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_name())
    }
}

/// Typed value of one track cell
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl FieldValue {
    /// Kind of the value
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Real(_) => FieldKind::Real,
            FieldValue::Text(_) => FieldKind::Text,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{}", value),
            FieldValue::Real(value) => write!(f, "{}", value),
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn schema_has_unique_names() {
        let json: HashSet<_> = TrackField::ALL.iter().map(|f| f.json_name()).collect();
        let sql: HashSet<_> = TrackField::ALL.iter().map(|f| f.sql_column()).collect();
        let labels: HashSet<_> = TrackField::ALL.iter().map(|f| f.label()).collect();

        assert_eq!(json.len(), TrackField::ALL.len());
        assert_eq!(sql.len(), TrackField::ALL.len());
        assert_eq!(labels.len(), TrackField::ALL.len());
    }

    #[test]
    fn dataset_columns_cover_everything_but_idx_and_rating() {
        let columns: Vec<_> = TrackField::dataset_columns().collect();
        assert_eq!(columns.len(), 18);
        assert!(columns.contains(&"duration_ms"));
        assert!(columns.contains(&"time_signature"));
        assert!(!columns.contains(&"rating"));
        assert!(!columns.contains(&"idx"));
    }

    #[test]
    fn sql_columns_follow_dataset_names() {
        assert_eq!(TrackField::Duration.sql_column(), "duration_ms");
        assert_eq!(TrackField::NumBars.sql_column(), "num_bars");
        assert_eq!(TrackField::Idx.sql_column(), "idx");
        assert_eq!(TrackField::Rating.sql_column(), "rating");
    }

    #[test]
    fn key_fields_are_not_mutable() {
        let mutable: Vec<_> = TrackField::mutable().collect();
        assert_eq!(mutable.len(), 18);
        assert!(!mutable.contains(&TrackField::Idx));
        assert!(!mutable.contains(&TrackField::Id));
    }

    #[test]
    fn values_print_like_json_numbers() {
        assert_eq!(FieldValue::Real(1.0).to_string(), "1");
        assert_eq!(FieldValue::Real(0.5).to_string(), "0.5");
        assert_eq!(FieldValue::Integer(-1).to_string(), "-1");
        assert_eq!(FieldValue::Text("3AM".into()).to_string(), "3AM");
    }
}
