//! Query-string validation for the tracks endpoint
//!
//! Parameters arrive as raw strings so the handlers can answer with the exact
//! client-facing message instead of a generic extractor rejection.

use crate::error::{messages, Result, ServerError};
use serde::Deserialize;
use viv_core::{storage::TrackFilter, types::TrackKey};

/// `GET` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub title: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    /// Checked in order: title, offset, limit
    pub fn into_filter(self) -> Result<TrackFilter> {
        if self.title.as_deref() == Some("") {
            return Err(ServerError::bad_request(messages::INVALID_TITLE));
        }

        let offset = self
            .offset
            .as_deref()
            .map(|raw| raw.parse::<i64>())
            .transpose()
            .map_err(|_| ServerError::bad_request(messages::INVALID_START))?;

        let limit = match self.limit.as_deref().map(str::parse::<i64>) {
            None => None,
            Some(Ok(limit)) if limit > 0 => Some(limit),
            Some(_) => return Err(ServerError::bad_request(messages::INVALID_LIMIT)),
        };

        Ok(TrackFilter {
            title: self.title,
            offset,
            limit,
        })
    }
}

/// `PATCH` query parameters identifying the track
#[derive(Debug, Default, Deserialize)]
pub struct UpdateParams {
    pub id: Option<String>,
    pub idx: Option<String>,
}

impl UpdateParams {
    pub fn into_key(self) -> Result<TrackKey> {
        let missing = || ServerError::bad_request(messages::MISSING_KEY);

        let id = self.id.filter(|id| !id.is_empty()).ok_or_else(missing)?;
        let idx = self
            .idx
            .as_deref()
            .and_then(|raw| raw.parse::<i64>().ok())
            .ok_or_else(missing)?;

        Ok(TrackKey::new(idx, id))
    }
}
