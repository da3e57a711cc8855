use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::{ApiResponse, AppError, AppResult},
    state::AppState,
    videos::{
        dto::{SearchParams, SearchResults, VideoEnvelope},
        services,
    },
};

pub fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/video/search", get(search_videos))
        .route("/video/:video_id", get(get_video))
}

#[instrument(skip(state, user, params), fields(user_id = %user.user_id, q = ?params.q))]
pub async fn search_videos(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Query(params), _): WithRejection<Query<SearchParams>, AppError>,
) -> AppResult<Json<ApiResponse<SearchResults>>> {
    let query = params.q.unwrap_or_default();
    let results = services::search_and_record(
        state.youtube.as_ref(),
        state.history.as_ref(),
        user.user_id,
        &query,
        params.max_results,
        params.page_token,
    )
    .await?;
    Ok(Json(ApiResponse::ok(results)))
}

/// Fetches details and records the view in the caller's watch history.
#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_video(
    State(state): State<AppState>,
    user: AuthUser,
    Path(video_id): Path<String>,
) -> AppResult<Json<ApiResponse<VideoEnvelope>>> {
    let video = services::view_and_record(
        state.youtube.as_ref(),
        state.history.as_ref(),
        user.user_id,
        &video_id,
    )
    .await?;
    Ok(Json(ApiResponse::ok(VideoEnvelope { video })))
}
