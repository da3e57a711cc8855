use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::{ApiResponse, AppError, AppResult},
    history::{
        dto::{
            Analytics, HistoryEntryEnvelope, HistoryEntryRequest, LimitQuery, NewHistoryEntry,
            SearchHistoryEnvelope, WatchHistoryEnvelope, DEFAULT_ANALYTICS_LIMIT,
            DEFAULT_HISTORY_LIMIT, DEFAULT_SEARCHES_LIMIT,
        },
        services::{self, clamp_limit},
    },
    state::AppState,
};

pub fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/history", get(get_history).post(add_history))
        .route("/history/searches", get(get_searches))
        .route("/history/analytics", get(get_analytics))
        .route("/analytics", get(get_analytics))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_history(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Query(q), _): WithRejection<Query<LimitQuery>, AppError>,
) -> AppResult<Json<ApiResponse<WatchHistoryEnvelope>>> {
    let limit = clamp_limit(q.limit, DEFAULT_HISTORY_LIMIT);
    let history = services::list_history(state.history.as_ref(), user.user_id, limit).await?;
    Ok(Json(ApiResponse::ok(WatchHistoryEnvelope { history })))
}

#[instrument(skip(state, user, body), fields(user_id = %user.user_id))]
pub async fn add_history(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Json(body), _): WithRejection<Json<HistoryEntryRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<HistoryEntryEnvelope>>)> {
    let entry = NewHistoryEntry::try_from(body)?;
    let history_entry = services::add_entry(state.history.as_ref(), user.user_id, entry).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(HistoryEntryEnvelope { history_entry }).with_message("Added to history")),
    ))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_searches(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Query(q), _): WithRejection<Query<LimitQuery>, AppError>,
) -> AppResult<Json<ApiResponse<SearchHistoryEnvelope>>> {
    let limit = clamp_limit(q.limit, DEFAULT_SEARCHES_LIMIT);
    let history = services::list_searches(state.history.as_ref(), user.user_id, limit).await?;
    Ok(Json(ApiResponse::ok(SearchHistoryEnvelope { history })))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_analytics(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Query(q), _): WithRejection<Query<LimitQuery>, AppError>,
) -> AppResult<Json<ApiResponse<Analytics>>> {
    let limit = clamp_limit(q.limit, DEFAULT_ANALYTICS_LIMIT);
    let analytics = services::analytics(state.history.as_ref(), user.user_id, limit).await?;
    Ok(Json(ApiResponse::ok(analytics)))
}
