use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use secrecy::SecretString;
use serde::Deserialize;

use crate::{
    adapters::http::{app_state::AppState, extract},
    app_error::AppError,
    application::tokens::{self, Claims, TokenKind, VerifyError},
};

/// Result of holding an extracted token against the kind a gate requires.
/// Exactly one variant per evaluation; terminal, no retries.
#[derive(Debug)]
pub enum GateOutcome {
    Accepted(Claims),
    RejectedMissing,
    RejectedInvalid(VerifyError),
    RejectedWrongType,
}

pub fn evaluate(token: Option<&str>, required: TokenKind, secret: &SecretString) -> GateOutcome {
    let Some(token) = token else {
        return GateOutcome::RejectedMissing;
    };
    match tokens::verify(token, secret) {
        Ok(claims) if claims.kind == required => GateOutcome::Accepted(claims),
        Ok(_) => GateOutcome::RejectedWrongType,
        Err(err) => GateOutcome::RejectedInvalid(err),
    }
}

/// Guards routes that require an `access` token.
pub async fn access_check(
    State(app_state): State<AppState>,
    cookies: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate(app_state, cookies, request, next, TokenKind::Access).await
}

/// Guards the refresh flow; only `refresh` tokens pass.
pub async fn refresh_check(
    State(app_state): State<AppState>,
    cookies: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate(app_state, cookies, request, next, TokenKind::Refresh).await
}

async fn gate(
    app_state: AppState,
    cookies: CookieJar,
    request: Request,
    next: Next,
    required: TokenKind,
) -> Result<Response, AppError> {
    let (mut request, token) = locate_token(&cookies, request).await;
    match evaluate(token.as_deref(), required, &app_state.config.token_secret) {
        GateOutcome::Accepted(claims) => {
            // Downstream handlers read the subject from extensions.
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        GateOutcome::RejectedMissing => Err(AppError::MissingToken),
        GateOutcome::RejectedInvalid(_) => Err(AppError::InvalidToken),
        GateOutcome::RejectedWrongType => Err(AppError::WrongTokenType),
    }
}

/// Largest JSON body the gate will buffer when falling back to the body
/// field source.
const BODY_PEEK_LIMIT: usize = 256 * 1024;

#[derive(Deserialize)]
struct BodyToken {
    token: Option<String>,
}

/// Runs the cheap sources first; only when cookie and headers turn up
/// nothing is the body buffered, inspected, and reinstated on the request.
async fn locate_token(cookies: &CookieJar, request: Request) -> (Request, Option<String>) {
    if let Some(token) = extract::fetch_token(cookies, request.headers(), None) {
        return (request, Some(token));
    }
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, BODY_PEEK_LIMIT)
        .await
        .unwrap_or_default();
    let token = serde_json::from_slice::<BodyToken>(&bytes)
        .ok()
        .and_then(|b| b.token)
        .filter(|t| !t.is_empty());
    (Request::from_parts(parts, Body::from(bytes)), token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tokens::{Subject, issue};
    use time::Duration;
    use uuid::Uuid;

    fn secret() -> SecretString {
        SecretString::new("gate-secret".into())
    }

    fn token_of(kind: TokenKind, ttl: Duration) -> String {
        let subject = Subject {
            id: Uuid::new_v4(),
            email: "u1@example.com".to_string(),
            first_name: None,
        };
        issue(&subject, kind, &secret(), ttl).unwrap()
    }

    #[test]
    fn missing_token_is_rejected() {
        assert!(matches!(
            evaluate(None, TokenKind::Access, &secret()),
            GateOutcome::RejectedMissing
        ));
    }

    #[test]
    fn matching_kind_is_accepted_with_payload() {
        let token = token_of(TokenKind::Access, Duration::minutes(60));
        match evaluate(Some(&token), TokenKind::Access, &secret()) {
            GateOutcome::Accepted(claims) => {
                assert_eq!(claims.kind, TokenKind::Access);
                assert_eq!(claims.email, "u1@example.com");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn refresh_token_is_rejected_by_access_gate() {
        let token = token_of(TokenKind::Refresh, Duration::minutes(60));
        assert!(matches!(
            evaluate(Some(&token), TokenKind::Access, &secret()),
            GateOutcome::RejectedWrongType
        ));
    }

    #[test]
    fn access_token_is_rejected_by_refresh_gate() {
        let token = token_of(TokenKind::Access, Duration::minutes(60));
        assert!(matches!(
            evaluate(Some(&token), TokenKind::Refresh, &secret()),
            GateOutcome::RejectedWrongType
        ));
    }

    #[test]
    fn expired_token_is_rejected_as_invalid() {
        let token = token_of(TokenKind::Access, Duration::seconds(-5));
        assert!(matches!(
            evaluate(Some(&token), TokenKind::Access, &secret()),
            GateOutcome::RejectedInvalid(VerifyError::Expired)
        ));
    }

    #[test]
    fn garbage_token_is_rejected_as_invalid() {
        assert!(matches!(
            evaluate(Some("not.a.jwt"), TokenKind::Access, &secret()),
            GateOutcome::RejectedInvalid(VerifyError::Malformed)
        ));
    }
}
