use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};

/// Which gate a token is allowed through. Serialized as the `type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Subject payload carried by every token. The authority re-serializes the
/// identity fields without interpreting them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("token has expired")]
    Expired,

    #[error("token signature or structure invalid")]
    Malformed,
}

/// Identity fields handed in at issuance; `iat`/`exp` are filled in here.
#[derive(Debug, Clone)]
pub struct Subject {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
}

pub fn issue(
    subject: &Subject,
    kind: TokenKind,
    secret: &SecretString,
    ttl: Duration,
) -> AppResult<String> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let claims = Claims {
        sub: subject.id.to_string(),
        email: subject.email.clone(),
        first_name: subject.first_name.clone(),
        kind,
        iat: now,
        exp: now + ttl.whole_seconds(),
    };
    let header = Header::new(Algorithm::HS256);
    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

pub fn verify(token: &str, secret: &SecretString) -> Result<Claims, VerifyError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is exact: a token is invalid the moment now >= exp.
    validation.leeway = 0;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => VerifyError::Expired,
        _ => VerifyError::Malformed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::new("test-secret".into())
    }

    fn subject() -> Subject {
        Subject {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            first_name: Some("Ada".to_string()),
        }
    }

    #[test]
    fn issue_then_verify_round_trips_payload() {
        let sub = subject();
        let token = issue(&sub, TokenKind::Access, &secret(), Duration::minutes(60)).unwrap();

        let claims = verify(&token, &secret()).unwrap();
        assert_eq!(claims.sub, sub.id.to_string());
        assert_eq!(claims.email, sub.email);
        assert_eq!(claims.first_name.as_deref(), Some("Ada"));
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let token = issue(
            &subject(),
            TokenKind::Access,
            &secret(),
            Duration::seconds(-10),
        )
        .unwrap();

        assert_eq!(verify(&token, &secret()), Err(VerifyError::Expired));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = issue(&subject(), TokenKind::Access, &secret(), Duration::minutes(5)).unwrap();
        let other = SecretString::new("not-the-secret".into());

        assert_eq!(verify(&token, &other), Err(VerifyError::Malformed));
    }

    #[test]
    fn verify_rejects_tampered_token() {
        let token = issue(&subject(), TokenKind::Access, &secret(), Duration::minutes(5)).unwrap();

        // Flip one character in each segment; none may verify.
        for idx in [0, token.find('.').unwrap() + 1, token.rfind('.').unwrap() + 1] {
            let mut bytes = token.clone().into_bytes();
            bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == token {
                continue;
            }
            assert_eq!(verify(&tampered, &secret()), Err(VerifyError::Malformed));
        }
    }

    #[test]
    fn verify_rejects_truncated_token() {
        let token = issue(&subject(), TokenKind::Refresh, &secret(), Duration::minutes(5)).unwrap();
        assert_eq!(
            verify(&token[..token.len() - 4], &secret()),
            Err(VerifyError::Malformed)
        );
        assert_eq!(verify("", &secret()), Err(VerifyError::Malformed));
    }

    #[test]
    fn kind_serializes_as_lowercase_type_claim() {
        let token = issue(&subject(), TokenKind::Refresh, &secret(), Duration::minutes(5)).unwrap();
        let claims = verify(&token, &secret()).unwrap();
        assert_eq!(claims.kind, TokenKind::Refresh);
        assert_eq!(
            serde_json::to_value(&claims).unwrap()["type"],
            serde_json::json!("refresh")
        );
    }
}
