//! Per-user search log, watch history with upsert-by-recency, and analytics.

use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::AppResult,
    history::{
        dto::{Analytics, HistoryEntry, NewHistoryEntry, MAX_LIMIT},
        repo::HistoryStore,
        repo_types::{SearchRecord, VideoRef, WatchRecord},
    },
};

pub fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, MAX_LIMIT)
}

pub async fn record_search(
    store: &dyn HistoryStore,
    user_id: Uuid,
    query: &str,
) -> AppResult<SearchRecord> {
    let record = store.insert_search(user_id, query).await?;
    debug!(%user_id, query, "search recorded");
    Ok(record)
}

/// Find-then-update-or-insert on `(user, video)`. Not atomic: two concurrent
/// first views of the same video can both insert.
pub async fn record_watch(
    store: &dyn HistoryStore,
    user_id: Uuid,
    video: &VideoRef,
) -> AppResult<WatchRecord> {
    let now = OffsetDateTime::now_utc();
    let record = match store.find_watch(user_id, &video.video_id).await? {
        Some(existing) => {
            let touched = store.touch_watch(existing.id, now).await?;
            info!(%user_id, video_id = %video.video_id, "watch history bumped");
            touched
        }
        None => {
            let inserted = store.insert_watch(user_id, video, now).await?;
            info!(%user_id, video_id = %video.video_id, "watch history added");
            inserted
        }
    };
    Ok(record)
}

pub async fn add_entry(
    store: &dyn HistoryStore,
    user_id: Uuid,
    entry: NewHistoryEntry,
) -> AppResult<HistoryEntry> {
    match entry {
        NewHistoryEntry::Search(query) => record_search(store, user_id, &query)
            .await
            .map(HistoryEntry::Search),
        NewHistoryEntry::Watch(video) => record_watch(store, user_id, &video)
            .await
            .map(HistoryEntry::Watch),
    }
}

pub async fn list_history(
    store: &dyn HistoryStore,
    user_id: Uuid,
    limit: i64,
) -> AppResult<Vec<WatchRecord>> {
    Ok(store.list_watches(user_id, limit).await?)
}

pub async fn list_searches(
    store: &dyn HistoryStore,
    user_id: Uuid,
    limit: i64,
) -> AppResult<Vec<SearchRecord>> {
    Ok(store.list_searches(user_id, limit).await?)
}

pub async fn analytics(store: &dyn HistoryStore, user_id: Uuid, limit: i64) -> AppResult<Analytics> {
    let analytics = store.top_queries(user_id, limit).await?;
    let total_searches = store.count_searches(user_id).await?;
    let total_views = store.count_watches(user_id).await?;
    Ok(Analytics {
        analytics,
        total_searches,
        total_views,
    })
}
