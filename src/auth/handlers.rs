use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use tracing::instrument;

use crate::{
    auth::{
        cookies::{self, clear_auth_cookies, set_auth_cookies},
        dto::{LoginRequest, RegisterRequest, UserEnvelope},
        extractors::AuthUser,
        services,
    },
    error::{ApiResponse, AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/profile", get(get_me))
        .route("/auth/me", get(get_me))
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> AppResult<(StatusCode, CookieJar, Json<ApiResponse<UserEnvelope>>)> {
    let session = services::register(&state, payload).await?;
    let jar = set_auth_cookies(jar, &state.cookies, &session.tokens);
    Ok((
        StatusCode::CREATED,
        jar,
        Json(
            ApiResponse::ok(UserEnvelope { user: session.user })
                .with_message("User registered successfully"),
        ),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<(CookieJar, Json<ApiResponse<UserEnvelope>>)> {
    let session = services::login(&state, payload).await?;
    let jar = set_auth_cookies(jar, &state.cookies, &session.tokens);
    Ok((
        jar,
        Json(ApiResponse::ok(UserEnvelope { user: session.user }).with_message("Login successful")),
    ))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<()>>) {
    let token = cookies::refresh_token(&jar);
    services::logout(&state, token.as_deref()).await;
    (
        clear_auth_cookies(jar, &state.cookies),
        Json(ApiResponse::message("Logout successful")),
    )
}

#[instrument(skip(state, jar))]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<ApiResponse<()>>)> {
    let token = cookies::refresh_token(&jar);
    let tokens = services::refresh(&state, token.as_deref()).await?;
    Ok((
        set_auth_cookies(jar, &state.cookies, &tokens),
        Json(ApiResponse::message("Tokens refreshed successfully")),
    ))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id, email = ?user.email))]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserEnvelope>>> {
    let user = services::get_profile(&state, user.user_id).await?;
    Ok(Json(ApiResponse::ok(UserEnvelope { user })))
}
