use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use secrecy::SecretString;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};
use crate::application::links::{self, LinkBase};
use crate::application::tokens::{self, Subject};

#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub verified: bool,
    pub created_at: NaiveDateTime,
}

impl UserRecord {
    pub fn subject(&self) -> Subject {
        Subject {
            id: self.id,
            email: self.email.clone(),
            first_name: self.full_name.split_whitespace().next().map(str::to_owned),
        }
    }
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(
        &self,
        full_name: &str,
        email: &str,
        password_hash: &str,
    ) -> AppResult<UserRecord>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserRecord>>;
    async fn mark_verified(&self, id: Uuid) -> AppResult<()>;
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()>;
}

/// Which canned message the transport should render.
#[derive(Debug, Clone, Copy)]
pub enum MailTemplate {
    Verification,
    PasswordReset,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        to: &str,
        template: MailTemplate,
        recipient_name: &str,
        link: &str,
    ) -> AppResult<()>;
}

#[derive(Clone)]
pub struct AuthUseCases {
    repo: Arc<dyn UserRepo>,
    mailer: Arc<dyn Mailer>,
    secret: SecretString,
    link_base: LinkBase,
}

impl AuthUseCases {
    pub fn new(
        repo: Arc<dyn UserRepo>,
        mailer: Arc<dyn Mailer>,
        secret: SecretString,
        link_base: LinkBase,
    ) -> Self {
        Self {
            repo,
            mailer,
            secret,
            link_base,
        }
    }

    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> AppResult<UserRecord> {
        if self.repo.find_by_email(email).await?.is_some() {
            return Err(AppError::InvalidInput("email already registered".into()));
        }
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        let user = self.repo.create(full_name, email, &password_hash).await?;

        if !self.send_verification_email(&user).await {
            tracing::warn!(user_id = %user.id, "verification email was not delivered");
        }
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AppResult<UserRecord> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;
        if !bcrypt::verify(password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }
        Ok(user)
    }

    #[instrument(skip(self, token))]
    pub async fn verify_email(&self, token: &str) -> AppResult<UserRecord> {
        let claims = tokens::verify(token, &self.secret)?;
        let user_id = parse_subject_id(&claims.sub)?;
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        self.repo.mark_verified(user.id).await?;
        Ok(user)
    }

    /// Never reveals whether the address belongs to an account.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        if let Some(user) = self.repo.find_by_email(email).await? {
            if !self.send_password_reset_email(&user).await {
                tracing::warn!(user_id = %user.id, "password reset email was not delivered");
            }
        }
        Ok(())
    }

    #[instrument(skip(self, token, new_password))]
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()> {
        let claims = tokens::verify(token, &self.secret)?;
        let user_id = parse_subject_id(&claims.sub)?;
        let password_hash = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)?;
        self.repo.update_password(user_id, &password_hash).await
    }

    /// Delivery failure is reported as `false`, single attempt, never raised.
    pub async fn send_verification_email(&self, user: &UserRecord) -> bool {
        let subject = user.subject();
        let link = match links::verification_link(&self.link_base, &subject, &self.secret) {
            Ok(link) => link,
            Err(err) => {
                tracing::error!(error = ?err, "could not build verification link");
                return false;
            }
        };
        self.deliver(user, MailTemplate::Verification, &link).await
    }

    pub async fn send_password_reset_email(&self, user: &UserRecord) -> bool {
        let subject = user.subject();
        let link = match links::password_reset_link(&self.link_base, &subject, &self.secret) {
            Ok(link) => link,
            Err(err) => {
                tracing::error!(error = ?err, "could not build password reset link");
                return false;
            }
        };
        self.deliver(user, MailTemplate::PasswordReset, &link).await
    }

    async fn deliver(&self, user: &UserRecord, template: MailTemplate, link: &str) -> bool {
        let name = user.subject().first_name.unwrap_or_else(|| user.full_name.clone());
        match self.mailer.send(&user.email, template, &name, link).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = ?err, template = ?template, "mail delivery failed");
                false
            }
        }
    }
}

fn parse_subject_id(sub: &str) -> AppResult<Uuid> {
    Uuid::parse_str(sub).map_err(|_| AppError::InvalidToken)
}
