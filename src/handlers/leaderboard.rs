// src/handlers/leaderboard.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::leaderboard::{LeaderboardQuery, ShareMessage},
    services::{identity::SessionChannel, render::PageSurface},
    state::AppState,
    utils::jwt::CurrentSession,
    view::{LoadMore, RankingView, ViewSettings, ViewStatus},
};

/// Renders the leaderboard for the signed-in user.
///
/// * Loads the most recent results and ranks them.
/// * Applies the requested time filter and sort key.
/// * Accumulates `page` pages of the list.
///
/// A failed store query still returns the page (with its error notification), as 503.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = params.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let surface = Arc::new(PageSurface::new(state.config.home_url.clone()));
    let settings = ViewSettings::from_config(&state.config)
        .with_filter(params.filter)
        .with_sort(params.sort);
    let view = RankingView::new(
        state.store.clone(),
        Arc::new(SessionChannel::new(session)),
        surface.clone(),
        settings,
    );

    let status = match view.start().await {
        ViewStatus::Unauthorized => {
            return Err(AppError::AuthError(
                "Sign in to view the leaderboard".to_string(),
            ));
        }
        ViewStatus::Failed => StatusCode::SERVICE_UNAVAILABLE,
        ViewStatus::Empty => StatusCode::OK,
        ViewStatus::Ready { .. } => {
            for _ in 1..params.page.unwrap_or(1) {
                if !matches!(view.load_more().await, LoadMore::Appended(_)) {
                    break;
                }
            }
            StatusCode::OK
        }
    };

    Ok((status, Json(surface.snapshot())))
}

/// Share text for the leaderboard.
pub async fn get_share_message(State(config): State<Config>) -> impl IntoResponse {
    Json(ShareMessage::new(&config.board_title, &config.public_origin))
}
