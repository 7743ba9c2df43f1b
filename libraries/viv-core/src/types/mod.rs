mod field;
mod track;

pub use field::{FieldKind, FieldValue, TrackField};
pub use track::{Track, TrackKey, RATING_UNRATED};
