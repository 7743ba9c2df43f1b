use crate::error::{Result, StorageError};
use sqlx::query_builder::Separated;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use viv_core::{
    storage::TrackFilter,
    types::{FieldKind, FieldValue, Track, TrackField, TrackKey},
};

/// Rows per `INSERT` statement (20 binds each, well under SQLite's bind limit)
const INSERT_BATCH_SIZE: usize = 500;

/// Quoted column list in schema order
fn column_list() -> String {
    TrackField::ALL
        .iter()
        .map(|field| format!("\"{}\"", field.sql_column()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_value<Sep: std::fmt::Display>(row: &mut Separated<'_, '_, Sqlite, Sep>, value: FieldValue) {
    match value {
        FieldValue::Integer(v) => {
            row.push_bind(v);
        }
        FieldValue::Real(v) => {
            row.push_bind(v);
        }
        FieldValue::Text(v) => {
            row.push_bind(v);
        }
    }
}

fn push_value_unseparated<Sep: std::fmt::Display>(
    row: &mut Separated<'_, '_, Sqlite, Sep>,
    value: FieldValue,
) {
    match value {
        FieldValue::Integer(v) => {
            row.push_bind_unseparated(v);
        }
        FieldValue::Real(v) => {
            row.push_bind_unseparated(v);
        }
        FieldValue::Text(v) => {
            row.push_bind_unseparated(v);
        }
    }
}

fn track_from_row(row: &SqliteRow) -> Result<Track> {
    let mut track = Track::unrated(0, String::new(), String::new());
    for field in TrackField::ALL {
        let column = field.sql_column();
        let value = match field.kind() {
            FieldKind::Integer => FieldValue::Integer(row.try_get(column)?),
            FieldKind::Real => FieldValue::Real(row.try_get(column)?),
            FieldKind::Text => FieldValue::Text(row.try_get(column)?),
        };
        track
            .set(field, value)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    }
    Ok(track)
}

/// Escape `LIKE` wildcards so the title matches literally
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Insert tracks, leaving rows whose `(idx, id)` already exists untouched
///
/// All batches run in one transaction. Returns the number of new rows.
pub async fn insert(pool: &SqlitePool, tracks: &[Track]) -> Result<u64> {
    if tracks.is_empty() {
        return Ok(0);
    }

    let columns = column_list();
    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for chunk in tracks.chunks(INSERT_BATCH_SIZE) {
        let mut builder = QueryBuilder::<Sqlite>::new("INSERT OR IGNORE INTO tracks (");
        builder.push(&columns).push(") ");
        builder.push_values(chunk, |mut row, track| {
            for field in TrackField::ALL {
                push_value(&mut row, track.value(field));
            }
        });

        inserted += builder.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;

    tracing::debug!(
        requested = tracks.len(),
        inserted,
        "Inserted tracks"
    );

    Ok(inserted)
}

/// List tracks matching the filter in insertion order
///
/// Insertion order is the dataset's file order, which need not be sorted by
/// `idx`. The title filter is a case-insensitive substring match.
pub async fn get(pool: &SqlitePool, filter: &TrackFilter) -> Result<Vec<Track>> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT ");
    builder.push(column_list()).push(" FROM tracks WHERE 1 = 1");

    if let Some(title) = &filter.title {
        builder
            .push(" AND title LIKE ")
            .push_bind(format!("%{}%", escape_like(title)))
            .push(" ESCAPE '\\'");
    }
    if let Some(offset) = filter.offset {
        builder.push(" AND idx >= ").push_bind(offset);
    }
    builder.push(" ORDER BY rowid");
    if let Some(limit) = filter.limit {
        builder.push(" LIMIT ").push_bind(limit);
    }

    let rows = builder.build().fetch_all(pool).await?;
    rows.iter().map(track_from_row).collect()
}

/// Get track by primary key
pub async fn get_by_key(pool: &SqlitePool, key: &TrackKey) -> Result<Option<Track>> {
    let sql = format!(
        "SELECT {} FROM tracks WHERE idx = ? AND id = ?",
        column_list()
    );

    let row = sqlx::query(&sql)
        .bind(key.idx)
        .bind(&key.id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(track_from_row).transpose()
}

/// Overwrite every non-key column of the track with the same `(idx, id)`
///
/// Returns `false` when no row matched.
pub async fn update(pool: &SqlitePool, track: &Track) -> Result<bool> {
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE tracks SET ");
    {
        let mut assignments = builder.separated(", ");
        for field in TrackField::mutable() {
            assignments.push(format!("\"{}\" = ", field.sql_column()));
            push_value_unseparated(&mut assignments, track.value(field));
        }
    }
    builder
        .push(" WHERE idx = ")
        .push_bind(track.idx)
        .push(" AND id = ")
        .push_bind(track.id.clone());

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Number of stored tracks
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_pure\\"), "100\\%\\_pure\\\\");
        assert_eq!(escape_like("21 Guns"), "21 Guns");
    }

    #[test]
    fn column_list_quotes_every_column() {
        let columns = column_list();
        assert!(columns.starts_with("\"idx\", \"title\""));
        assert!(columns.contains("\"key\""));
        assert_eq!(columns.split(", ").count(), TrackField::ALL.len());
    }
}
