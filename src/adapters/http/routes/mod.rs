pub mod auth;
pub mod user;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router(app_state.clone()))
        .nest("/user", user::router(app_state))
}
