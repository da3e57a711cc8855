use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    history::repo_types::{QueryCount, SearchRecord, VideoRef, WatchRecord},
};

pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
pub const DEFAULT_SEARCHES_LIMIT: i64 = 12;
pub const DEFAULT_ANALYTICS_LIMIT: i64 = 12;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

/// Body of `POST /api/history`: either `{ query }` or a video reference.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryEntryRequest {
    pub query: Option<String>,
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub channel_title: Option<String>,
    pub duration: Option<String>,
    pub view_count: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewHistoryEntry {
    Search(String),
    Watch(VideoRef),
}

fn present(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

impl TryFrom<HistoryEntryRequest> for NewHistoryEntry {
    type Error = AppError;

    fn try_from(req: HistoryEntryRequest) -> Result<Self, Self::Error> {
        if let Some(video_id) = present(req.video_id) {
            let (Some(title), Some(thumbnail), Some(channel_title)) = (
                present(req.title),
                present(req.thumbnail),
                present(req.channel_title),
            ) else {
                return Err(AppError::validation("Missing required fields"));
            };
            return Ok(NewHistoryEntry::Watch(VideoRef {
                video_id,
                title,
                thumbnail,
                channel_title,
                duration: req.duration.unwrap_or_default(),
                view_count: req.view_count.unwrap_or_default(),
            }));
        }
        match present(req.query) {
            Some(query) => Ok(NewHistoryEntry::Search(query)),
            None => Err(AppError::validation("Missing required fields")),
        }
    }
}

/// What `add_entry` wrote, serialised as the `historyEntry` payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    Search(SearchRecord),
    Watch(WatchRecord),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryEnvelope {
    pub history_entry: HistoryEntry,
}

#[derive(Debug, Serialize)]
pub struct WatchHistoryEnvelope {
    pub history: Vec<WatchRecord>,
}

#[derive(Debug, Serialize)]
pub struct SearchHistoryEnvelope {
    pub history: Vec<SearchRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub analytics: Vec<QueryCount>,
    pub total_searches: i64,
    pub total_views: i64,
}
