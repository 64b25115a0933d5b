use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Deserialize;

use crate::{
    adapters::http::{
        app_state::AppState,
        envelope,
        extract::TOKEN_COOKIE,
        middleware::refresh_check,
    },
    app_error::{AppError, AppResult},
    application::tokens::{self, Claims, Subject, TokenKind},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignupPayload {
    full_name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct ForgotPasswordPayload {
    email: String,
}

#[derive(Deserialize)]
struct ResetPasswordPayload {
    password: String,
}

pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/verify/{token}", get(verify))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/{token}", post(reset_password))
        .merge(
            Router::new()
                .route("/refresh", post(refresh))
                .route_layer(middleware::from_fn_with_state(app_state, refresh_check)),
        )
}

async fn signup(
    State(app_state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> AppResult<impl IntoResponse> {
    if payload.password.len() < 8 {
        return Err(AppError::InvalidInput(
            "password must be at least 8 characters".into(),
        ));
    }
    let user = app_state
        .auth_use_cases
        .signup(&payload.full_name, &payload.email, &payload.password)
        .await?;
    Ok(envelope::success(
        StatusCode::CREATED,
        "user created, verification email sent",
        user,
    ))
}

async fn verify(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user = app_state.auth_use_cases.verify_email(&token).await?;
    Ok(envelope::success(
        StatusCode::OK,
        "email verified",
        user,
    ))
}

async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .auth_use_cases
        .login(&payload.email, &payload.password)
        .await?;
    let subject = user.subject();

    let config = &app_state.config;
    let access = tokens::issue(
        &subject,
        TokenKind::Access,
        &config.token_secret,
        config.access_token_ttl,
    )?;
    let refresh = tokens::issue(
        &subject,
        TokenKind::Refresh,
        &config.token_secret,
        config.refresh_token_ttl,
    )?;

    let mut headers = HeaderMap::new();
    let cookie = Cookie::build((TOKEN_COOKIE, access.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build();
    headers.insert(
        "set-cookie",
        cookie
            .to_string()
            .parse()
            .map_err(|_| AppError::Internal("invalid cookie value".into()))?,
    );

    let body = serde_json::json!({
        "user": user,
        "accessToken": access,
        "refreshToken": refresh,
    });
    Ok((
        headers,
        envelope::success(StatusCode::OK, "login successful", body),
    ))
}

/// Behind the refresh gate; the verified claims arrive through extensions.
async fn refresh(
    State(app_state): State<AppState>,
    axum::Extension(claims): axum::Extension<Claims>,
) -> AppResult<impl IntoResponse> {
    let subject = Subject {
        id: uuid::Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?,
        email: claims.email,
        first_name: claims.first_name,
    };
    let config = &app_state.config;
    let access = tokens::issue(
        &subject,
        TokenKind::Access,
        &config.token_secret,
        config.access_token_ttl,
    )?;
    Ok(envelope::success(
        StatusCode::OK,
        "token refreshed",
        serde_json::json!({ "accessToken": access }),
    ))
}

async fn forgot_password(
    State(app_state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> AppResult<impl IntoResponse> {
    app_state.auth_use_cases.forgot_password(&payload.email).await?;
    // Always accepted so the endpoint does not reveal which emails exist.
    Ok(envelope::success(
        StatusCode::ACCEPTED,
        "if the account exists, a reset email has been sent",
        serde_json::json!(null),
    ))
}

async fn reset_password(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordPayload>,
) -> AppResult<impl IntoResponse> {
    if payload.password.len() < 8 {
        return Err(AppError::InvalidInput(
            "password must be at least 8 characters".into(),
        ));
    }
    app_state
        .auth_use_cases
        .reset_password(&token, &payload.password)
        .await?;
    Ok(envelope::success(
        StatusCode::OK,
        "password updated",
        serde_json::json!(null),
    ))
}
