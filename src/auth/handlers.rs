use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        cookie::{auth_cookie, clear_auth_cookie},
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        extractors::{extract_token, AuthUser},
        repo_types::User,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/user", get(current_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let session = state.auth.register(&payload.email, &payload.password).await?;
    let cookie = auth_cookie(&session.token.token, state.config.production);
    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(AuthResponse::from(session)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    let session = state.auth.login(&payload.email, &payload.password).await?;
    let cookie = auth_cookie(&session.token.token, state.config.production);
    Ok(([(SET_COOKIE, cookie)], Json(AuthResponse::from(session))))
}

#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let token = extract_token(&headers);
    state.auth.logout(token.as_deref()).await;
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, clear_auth_cookie(state.config.production))],
    )
}

#[instrument(skip_all)]
pub async fn current_user(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
