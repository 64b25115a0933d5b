use axum::{
    Extension, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};

use crate::{
    adapters::http::{app_state::AppState, envelope, middleware::access_check},
    app_error::{AppError, AppResult},
    application::tokens::Claims,
};

pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(app_state, access_check))
}

async fn me(
    State(app_state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<impl IntoResponse> {
    let user_id = uuid::Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;
    let user = app_state
        .repo
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(envelope::success(StatusCode::OK, "current user", user))
}
