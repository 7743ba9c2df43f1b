/// Track domain type
use crate::error::{Result, VivError};
use crate::types::field::{FieldValue, TrackField};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rating of a track that nobody has rated yet
pub const RATING_UNRATED: i64 = -1;

/// One song and its audio-feature attributes
///
/// Deserialization rejects unknown fields, so a patched JSON document only
/// turns back into a `Track` when it still has exactly the track shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Track {
    /// Positional index from the source file
    pub idx: i64,

    /// External catalog identifier
    pub id: String,

    /// Track title
    pub title: String,

    /// User rating, `RATING_UNRATED` until rated
    pub rating: i64,

    pub danceability: f64,
    pub energy: f64,
    pub key: i64,
    pub loudness: f64,
    pub mode: i64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub tempo: f64,

    /// Track duration in milliseconds
    pub duration: i64,

    pub time_signature: i64,
    pub num_bars: i64,
    pub num_sections: i64,
    pub num_segments: i64,
    pub class: i64,
}

impl Track {
    /// Create an unrated track with all audio features zeroed
    pub fn unrated(idx: i64, id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            idx,
            id: id.into(),
            title: title.into(),
            rating: RATING_UNRATED,
            danceability: 0.0,
            energy: 0.0,
            key: 0,
            loudness: 0.0,
            mode: 0,
            acousticness: 0.0,
            instrumentalness: 0.0,
            liveness: 0.0,
            valence: 0.0,
            tempo: 0.0,
            duration: 0,
            time_signature: 0,
            num_bars: 0,
            num_sections: 0,
            num_segments: 0,
            class: 0,
        }
    }

    /// Composite primary key of the track
    pub fn key(&self) -> TrackKey {
        TrackKey::new(self.idx, self.id.clone())
    }

    /// Whether the track has been rated
    pub fn is_rated(&self) -> bool {
        self.rating != RATING_UNRATED
    }

    /// Read one column
    pub fn value(&self, field: TrackField) -> FieldValue {
        match field {
            TrackField::Idx => FieldValue::Integer(self.idx),
            TrackField::Id => FieldValue::Text(self.id.clone()),
            TrackField::Title => FieldValue::Text(self.title.clone()),
            TrackField::Rating => FieldValue::Integer(self.rating),
            TrackField::Danceability => FieldValue::Real(self.danceability),
            TrackField::Energy => FieldValue::Real(self.energy),
            TrackField::Key => FieldValue::Integer(self.key),
            TrackField::Loudness => FieldValue::Real(self.loudness),
            TrackField::Mode => FieldValue::Integer(self.mode),
            TrackField::Acousticness => FieldValue::Real(self.acousticness),
            TrackField::Instrumentalness => FieldValue::Real(self.instrumentalness),
            TrackField::Liveness => FieldValue::Real(self.liveness),
            TrackField::Valence => FieldValue::Real(self.valence),
            TrackField::Tempo => FieldValue::Real(self.tempo),
            TrackField::Duration => FieldValue::Integer(self.duration),
            TrackField::TimeSignature => FieldValue::Integer(self.time_signature),
            TrackField::NumBars => FieldValue::Integer(self.num_bars),
            TrackField::NumSections => FieldValue::Integer(self.num_sections),
            TrackField::NumSegments => FieldValue::Integer(self.num_segments),
            TrackField::Class => FieldValue::Integer(self.class),
        }
    }

    /// Write one column
    ///
    /// # Errors
    ///
    /// Returns `VivError::InvalidInput` when the value kind does not match the column kind.
    pub fn set(&mut self, field: TrackField, value: FieldValue) -> Result<()> {
        match (field, value) {
            (TrackField::Idx, FieldValue::Integer(v)) => self.idx = v,
            (TrackField::Id, FieldValue::Text(v)) => self.id = v,
            (TrackField::Title, FieldValue::Text(v)) => self.title = v,
            (TrackField::Rating, FieldValue::Integer(v)) => self.rating = v,
            (TrackField::Danceability, FieldValue::Real(v)) => self.danceability = v,
            (TrackField::Energy, FieldValue::Real(v)) => self.energy = v,
            (TrackField::Key, FieldValue::Integer(v)) => self.key = v,
            (TrackField::Loudness, FieldValue::Real(v)) => self.loudness = v,
            (TrackField::Mode, FieldValue::Integer(v)) => self.mode = v,
            (TrackField::Acousticness, FieldValue::Real(v)) => self.acousticness = v,
            (TrackField::Instrumentalness, FieldValue::Real(v)) => self.instrumentalness = v,
            (TrackField::Liveness, FieldValue::Real(v)) => self.liveness = v,
            (TrackField::Valence, FieldValue::Real(v)) => self.valence = v,
            (TrackField::Tempo, FieldValue::Real(v)) => self.tempo = v,
            (TrackField::Duration, FieldValue::Integer(v)) => self.duration = v,
            (TrackField::TimeSignature, FieldValue::Integer(v)) => self.time_signature = v,
            (TrackField::NumBars, FieldValue::Integer(v)) => self.num_bars = v,
            (TrackField::NumSections, FieldValue::Integer(v)) => self.num_sections = v,
            (TrackField::NumSegments, FieldValue::Integer(v)) => self.num_segments = v,
            (TrackField::Class, FieldValue::Integer(v)) => self.class = v,
            (field, value) => {
                return Err(VivError::invalid_input(format!(
                    "column `{}` expects {:?}, got {:?}",
                    field,
                    field.kind(),
                    value.kind()
                )))
            }
        }
        Ok(())
    }
}

/// Composite `(idx, id)` primary key of a track
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackKey {
    pub idx: i64,
    pub id: String,
}

impl TrackKey {
    /// Create a new track key
    pub fn new(idx: i64, id: impl Into<String>) -> Self {
        Self { idx, id: id.into() }
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.idx, self.id)
    }
}
