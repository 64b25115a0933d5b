use std::env;
use std::net::SocketAddr;

use secrecy::SecretString;
use time::Duration;

use crate::application::links::LinkBase;

pub struct AppConfig {
    /// Process-wide signing secret. Loaded once, never mutated at runtime.
    pub token_secret: SecretString,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub database_url: String,
    pub resend_api_key: String,
    pub email_from: String,
    pub bind_addr: SocketAddr,
    /// Scheme/host/port used only for composing verification and reset links.
    pub link_base: LinkBase,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let token_secret: SecretString =
            env::var("TOKEN_SECRET").expect("TOKEN_SECRET must be set").into();

        let access_token_ttl_minutes: i64 = env::var("ACCESS_TOKEN_TTL_MINUTES")
            .unwrap_or("60".to_string())
            .parse()
            .expect("ACCESS_TOKEN_TTL_MINUTES must be a valid number");

        let refresh_token_ttl_days: i64 = env::var("REFRESH_TOKEN_TTL_DAYS")
            .unwrap_or("7".to_string())
            .parse()
            .expect("REFRESH_TOKEN_TTL_DAYS must be a valid number");

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let resend_api_key = env::var("RESEND_API_KEY").expect("RESEND_API_KEY must be set");
        let email_from = env::var("EMAIL_FROM").expect("EMAIL_FROM must be set");

        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or("127.0.0.1:3000".to_string())
            .parse()
            .expect("BIND_ADDR must be a valid socket address");

        let link_base = LinkBase {
            scheme: env::var("LINK_SCHEME").unwrap_or("http".to_string()),
            host: env::var("LINK_HOST").unwrap_or("localhost".to_string()),
            port: bind_addr.port(),
        };

        Self {
            token_secret,
            access_token_ttl: Duration::minutes(access_token_ttl_minutes),
            refresh_token_ttl: Duration::days(refresh_token_ttl_days),
            database_url,
            resend_api_key,
            email_from,
            bind_addr,
            link_base,
        }
    }
}
