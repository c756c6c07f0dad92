//! Activity records as delivered by the training-plan backend.
//!
//! Only the fields the route views read are modeled; anything else in the
//! JSON is ignored.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::DecodeError;
use crate::polyline::Polyline;
use crate::traits::RouteSource;

/// A synced activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub activity_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Local start time, ISO-8601 without offset (`2024-05-12T08:30:00`).
    #[serde(default)]
    pub start_date_local: String,
    #[serde(default)]
    pub start_latitude: Option<f64>,
    #[serde(default)]
    pub start_longitude: Option<f64>,
    /// Encoded route summary.
    #[serde(default)]
    pub polyline: Option<String>,
    #[serde(default)]
    pub session_type: Option<String>,
}

impl Activity {
    /// Decoded route, or `Ok(None)` when the activity has no route.
    pub fn route(&self) -> Result<Option<Polyline>, DecodeError> {
        self.encoded_polyline().map(Polyline::decode).transpose()
    }
}

impl RouteSource for Activity {
    type Id = i64;

    fn id(&self) -> &i64 {
        &self.activity_id
    }

    fn encoded_polyline(&self) -> Option<&str> {
        self.polyline.as_deref().filter(|encoded| !encoded.is_empty())
    }
}

/// Errors from [`load_activities`].
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid activity JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Activity>),
    One(Box<Activity>),
}

/// Parse a JSON array of activities, or a single activity object.
pub fn parse_activities(json: &str) -> Result<Vec<Activity>, ActivityError> {
    Ok(match serde_json::from_str::<OneOrMany>(json)? {
        OneOrMany::Many(activities) => activities,
        OneOrMany::One(activity) => vec![*activity],
    })
}

/// Read activities from a JSON file. See [`parse_activities`].
pub fn load_activities(path: impl AsRef<Path>) -> Result<Vec<Activity>, ActivityError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| ActivityError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_activities(&json)
}

/// Order activities oldest first, the order the activity view pages in.
///
/// Local timestamps share one format, so they sort lexicographically.
pub fn sort_chronologically(activities: &mut [Activity]) {
    activities.sort_by(|a, b| a.start_date_local.cmp(&b.start_date_local));
}

/// Activities whose name or description contains `query`, ignoring case,
/// newest first. An empty query keeps every activity.
pub fn search(activities: &[Activity], query: &str) -> Vec<Activity> {
    let query = query.to_lowercase();
    let mut found: Vec<Activity> = activities
        .iter()
        .filter(|activity| {
            activity.name.to_lowercase().contains(&query)
                || activity
                    .description
                    .as_deref()
                    .is_some_and(|description| description.to_lowercase().contains(&query))
        })
        .cloned()
        .collect();
    found.sort_by(|a, b| b.start_date_local.cmp(&a.start_date_local));
    found
}
