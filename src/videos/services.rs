//! Video search and details over the upstream API.
//!
//! `search` and `get_details` only read. The `*_and_record` variants are what
//! the HTTP layer calls: they also write the caller's search or watch history.

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    history::{repo::HistoryStore, repo_types::VideoRef, services as history},
    videos::dto::{SearchResults, DEFAULT_MAX_RESULTS, MAX_MAX_RESULTS},
    youtube::{SearchRequest, Video, YoutubeApi},
};

pub fn clamp_max_results(max_results: Option<i64>) -> u32 {
    // Clamped into 1..=50, so the cast cannot truncate.
    max_results
        .unwrap_or(DEFAULT_MAX_RESULTS)
        .clamp(1, MAX_MAX_RESULTS) as u32
}

/// Two calls: `/search` for ids, then `/videos` for the details, returned in
/// search order. No ids means no second call.
pub async fn search(
    api: &dyn YoutubeApi,
    query: &str,
    max_results: Option<i64>,
    page_token: Option<String>,
) -> AppResult<SearchResults> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::validation("Search query is required"));
    }

    let request = SearchRequest {
        query: query.to_owned(),
        max_results: clamp_max_results(max_results),
        page_token: page_token.filter(|t| !t.is_empty()),
    };
    let listing = api.search(&request).await.inspect_err(|e| {
        warn!(error = %e, query, "upstream search failed");
    })?;

    let ids = listing.video_ids();
    let next_page_token = listing.next_page_token.clone();
    let total_results = listing.page_info.as_ref().and_then(|p| p.total_results);
    if ids.is_empty() {
        debug!(query, "search returned no videos");
        return Ok(SearchResults {
            videos: Vec::new(),
            next_page_token,
            total_results,
        });
    }

    let details = api.videos(&ids).await.inspect_err(|e| {
        warn!(error = %e, query, "upstream video lookup failed");
    })?;
    let mut by_id: HashMap<String, Video> = details
        .items
        .into_iter()
        .map(|item| (item.id.clone(), Video::from(item)))
        .collect();
    let videos = ids.iter().filter_map(|id| by_id.remove(id)).collect();

    Ok(SearchResults {
        videos,
        next_page_token,
        total_results,
    })
}

pub async fn get_details(api: &dyn YoutubeApi, video_id: &str) -> AppResult<Video> {
    let video_id = video_id.trim();
    if video_id.is_empty() {
        return Err(AppError::validation("Video ID is required"));
    }
    let details = api.videos(&[video_id.to_owned()]).await.inspect_err(|e| {
        warn!(error = %e, video_id, "upstream video lookup failed");
    })?;
    details
        .items
        .into_iter()
        .next()
        .map(Video::from)
        .ok_or_else(|| AppError::not_found("Video not found"))
}

/// [`search`], then appends the query to the caller's search history.
pub async fn search_and_record(
    api: &dyn YoutubeApi,
    store: &dyn HistoryStore,
    user_id: Uuid,
    query: &str,
    max_results: Option<i64>,
    page_token: Option<String>,
) -> AppResult<SearchResults> {
    let results = search(api, query, max_results, page_token).await?;
    history::record_search(store, user_id, query.trim()).await?;
    Ok(results)
}

/// [`get_details`], then bumps or inserts the video in the caller's watch history.
pub async fn view_and_record(
    api: &dyn YoutubeApi,
    store: &dyn HistoryStore,
    user_id: Uuid,
    video_id: &str,
) -> AppResult<Video> {
    let video = get_details(api, video_id).await?;
    history::record_watch(store, user_id, &watch_ref(&video)).await?;
    Ok(video)
}

fn watch_ref(video: &Video) -> VideoRef {
    VideoRef {
        video_id: video.video_id.clone(),
        title: video.title.clone(),
        thumbnail: video.thumbnail.clone(),
        channel_title: video.channel_title.clone(),
        duration: video.duration.clone().unwrap_or_default(),
        view_count: video.view_count.clone().unwrap_or_default(),
    }
}
