use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// One logged search. Append-only, duplicates allowed.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub query: String,
    #[serde(with = "time::serde::rfc3339")]
    pub searched_at: OffsetDateTime,
}

/// A watched video, at most one row per (user, video).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WatchRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
    pub channel_title: String,
    pub duration: String,
    pub view_count: String,
    #[serde(with = "time::serde::rfc3339")]
    pub viewed_at: OffsetDateTime,
}

/// The video fields stored with a watch row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
    pub channel_title: String,
    pub duration: String,
    pub view_count: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QueryCount {
    pub query: String,
    pub count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub last_searched_at: OffsetDateTime,
}
