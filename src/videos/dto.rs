use serde::{Deserialize, Serialize};

use crate::youtube::Video;

pub const DEFAULT_MAX_RESULTS: i64 = 10;
pub const MAX_MAX_RESULTS: i64 = 50;

/// `?q=&maxResults=&pageToken=`; `query` is accepted for `q`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(alias = "query")]
    pub q: Option<String>,
    pub max_results: Option<i64>,
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub videos: Vec<Video>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct VideoEnvelope {
    pub video: Video,
}
