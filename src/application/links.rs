use secrecy::SecretString;
use time::Duration;

use crate::app_error::AppResult;
use crate::application::tokens::{self, Subject, TokenKind};

/// Scheme/host/port used only for composing outbound links.
#[derive(Debug, Clone)]
pub struct LinkBase {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

/// One-time link tokens stay valid for five minutes.
const LINK_TOKEN_TTL: Duration = Duration::minutes(5);

pub fn verification_link(
    base: &LinkBase,
    subject: &Subject,
    secret: &SecretString,
) -> AppResult<String> {
    build(base, subject, secret, "verify")
}

pub fn password_reset_link(
    base: &LinkBase,
    subject: &Subject,
    secret: &SecretString,
) -> AppResult<String> {
    build(base, subject, secret, "reset-password")
}

fn build(base: &LinkBase, subject: &Subject, secret: &SecretString, path: &str) -> AppResult<String> {
    let token = tokens::issue(subject, TokenKind::Access, secret, LINK_TOKEN_TTL)?;
    // Local development serves off a bare port; everywhere else the host is
    // reachable as-is.
    let authority = if base.host == "localhost" {
        format!("{}:{}", base.host, base.port)
    } else {
        base.host.clone()
    };
    Ok(format!(
        "{}://{}/v1.0/api/auth/{}/{}",
        base.scheme, authority, path, token
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn base() -> LinkBase {
        LinkBase {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: 3000,
        }
    }

    fn subject() -> Subject {
        Subject {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            first_name: Some("Ada".to_string()),
        }
    }

    #[test]
    fn verification_link_includes_port_for_localhost() {
        let secret = SecretString::new("s".into());
        let link = verification_link(&base(), &subject(), &secret).unwrap();
        assert!(link.starts_with("http://localhost:3000/v1.0/api/auth/verify/"));

        let token = link.rsplit('/').next().unwrap();
        let claims = tokens::verify(token, &secret).unwrap();
        assert_eq!(claims.email, "ada@example.com");
    }

    #[test]
    fn reset_link_omits_port_for_public_host() {
        let base = LinkBase {
            scheme: "https".to_string(),
            host: "api.example.com".to_string(),
            port: 443,
        };
        let secret = SecretString::new("s".into());
        let link = password_reset_link(&base, &subject(), &secret).unwrap();
        assert!(link.starts_with("https://api.example.com/v1.0/api/auth/reset-password/"));
    }
}
