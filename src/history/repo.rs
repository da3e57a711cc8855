use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::history::repo_types::{QueryCount, SearchRecord, VideoRef, WatchRecord};

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn insert_search(&self, user_id: Uuid, query: &str) -> anyhow::Result<SearchRecord>;

    async fn find_watch(&self, user_id: Uuid, video_id: &str)
        -> anyhow::Result<Option<WatchRecord>>;
    /// Moves an existing watch row to `viewed_at`, leaving its video fields as they were.
    async fn touch_watch(&self, id: Uuid, viewed_at: OffsetDateTime)
        -> anyhow::Result<WatchRecord>;
    async fn insert_watch(
        &self,
        user_id: Uuid,
        video: &VideoRef,
        viewed_at: OffsetDateTime,
    ) -> anyhow::Result<WatchRecord>;

    async fn list_watches(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<WatchRecord>>;
    async fn list_searches(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<SearchRecord>>;

    /// Queries grouped over every search row, most frequent first.
    async fn top_queries(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<QueryCount>>;
    async fn count_searches(&self, user_id: Uuid) -> anyhow::Result<i64>;
    async fn count_watches(&self, user_id: Uuid) -> anyhow::Result<i64>;
}

#[derive(Clone)]
pub struct PgHistoryStore {
    db: PgPool,
}

impl PgHistoryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn insert_search(&self, user_id: Uuid, query: &str) -> anyhow::Result<SearchRecord> {
        let row = sqlx::query_as::<_, SearchRecord>(
            r#"
            INSERT INTO search_history (user_id, query)
            VALUES ($1, $2)
            RETURNING id, user_id, query, searched_at
            "#,
        )
        .bind(user_id)
        .bind(query)
        .fetch_one(&self.db)
        .await
        .context("insert search history")?;
        Ok(row)
    }

    async fn find_watch(
        &self,
        user_id: Uuid,
        video_id: &str,
    ) -> anyhow::Result<Option<WatchRecord>> {
        let row = sqlx::query_as::<_, WatchRecord>(
            r#"
            SELECT id, user_id, video_id, title, thumbnail, channel_title,
                   duration, view_count, viewed_at
            FROM watch_history
            WHERE user_id = $1 AND video_id = $2
            ORDER BY viewed_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .fetch_optional(&self.db)
        .await
        .context("find watch history")?;
        Ok(row)
    }

    async fn touch_watch(
        &self,
        id: Uuid,
        viewed_at: OffsetDateTime,
    ) -> anyhow::Result<WatchRecord> {
        let row = sqlx::query_as::<_, WatchRecord>(
            r#"
            UPDATE watch_history
            SET viewed_at = $2
            WHERE id = $1
            RETURNING id, user_id, video_id, title, thumbnail, channel_title,
                      duration, view_count, viewed_at
            "#,
        )
        .bind(id)
        .bind(viewed_at)
        .fetch_one(&self.db)
        .await
        .context("touch watch history")?;
        Ok(row)
    }

    async fn insert_watch(
        &self,
        user_id: Uuid,
        video: &VideoRef,
        viewed_at: OffsetDateTime,
    ) -> anyhow::Result<WatchRecord> {
        let row = sqlx::query_as::<_, WatchRecord>(
            r#"
            INSERT INTO watch_history
                (user_id, video_id, title, thumbnail, channel_title, duration, view_count, viewed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, video_id, title, thumbnail, channel_title,
                      duration, view_count, viewed_at
            "#,
        )
        .bind(user_id)
        .bind(&video.video_id)
        .bind(&video.title)
        .bind(&video.thumbnail)
        .bind(&video.channel_title)
        .bind(&video.duration)
        .bind(&video.view_count)
        .bind(viewed_at)
        .fetch_one(&self.db)
        .await
        .context("insert watch history")?;
        Ok(row)
    }

    async fn list_watches(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<WatchRecord>> {
        let rows = sqlx::query_as::<_, WatchRecord>(
            r#"
            SELECT id, user_id, video_id, title, thumbnail, channel_title,
                   duration, view_count, viewed_at
            FROM watch_history
            WHERE user_id = $1
            ORDER BY viewed_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("list watch history")?;
        Ok(rows)
    }

    async fn list_searches(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<SearchRecord>> {
        let rows = sqlx::query_as::<_, SearchRecord>(
            r#"
            SELECT id, user_id, query, searched_at
            FROM search_history
            WHERE user_id = $1
            ORDER BY searched_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("list search history")?;
        Ok(rows)
    }

    async fn top_queries(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<QueryCount>> {
        let rows = sqlx::query_as::<_, QueryCount>(
            r#"
            SELECT query, COUNT(*) AS count, MAX(searched_at) AS last_searched_at
            FROM search_history
            WHERE user_id = $1
            GROUP BY query
            ORDER BY count DESC, last_searched_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("aggregate search history")?;
        Ok(rows)
    }

    async fn count_searches(&self, user_id: Uuid) -> anyhow::Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM search_history WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await
                .context("count search history")?;
        Ok(count)
    }

    async fn count_watches(&self, user_id: Uuid) -> anyhow::Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM watch_history WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await
                .context("count watch history")?;
        Ok(count)
    }
}
