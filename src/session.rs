//! Explicit login session.
//!
//! A `Session` is created by `SessionManager::login` and dropped by
//! `logout`. Workflow calls take the session as an argument; nothing reads
//! the current user from shared global state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::lending::validator::Clock;
use crate::models::{Account, Role};
use crate::services::AuthService;

/// Claims read from the access token. The server verifies the signature.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    exp: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub account: Account,
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(account: Account, access_token: String) -> AppResult<Self> {
        let expires_at = token_expiry(&access_token)?;
        Ok(Self {
            account,
            access_token,
            expires_at,
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account.id
    }

    pub fn role(&self) -> Role {
        self.account.role
    }

    pub fn token(&self) -> &str {
        &self.access_token
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }

    pub fn require_requester(&self) -> AppResult<()> {
        if self.role().can_request() {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "{:?} accounts cannot open borrowing requests",
                self.role()
            )))
        }
    }

    pub fn require_approver(&self) -> AppResult<()> {
        if self.role().can_approve() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Approver role required".to_string()))
        }
    }
}

fn token_expiry(token: &str) -> AppResult<Option<DateTime<Utc>>> {
    let header = decode_header(token)?;
    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data
        .claims
        .exp
        .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0)))
}

/// Owns the single login/logout lifecycle.
pub struct SessionManager {
    auth: Arc<dyn AuthService>,
    clock: Arc<dyn Clock>,
    current: Option<Session>,
}

impl SessionManager {
    pub fn new(auth: Arc<dyn AuthService>, clock: Arc<dyn Clock>) -> Self {
        Self {
            auth,
            clock,
            current: None,
        }
    }

    /// Log in, replacing any previous session.
    pub async fn login(&mut self, email: &str, password: &str) -> AppResult<&Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "email and password are required".to_string(),
            ));
        }

        self.current = None;
        let response = self.auth.login(email, password).await?;
        let session = Session::new(response.account, response.token)?;
        tracing::info!(
            "Logged in {} as {:?}",
            session.account_id(),
            session.role()
        );
        Ok(&*self.current.insert(session))
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.current.take() {
            tracing::info!("Logged out {}", session.account_id());
        }
    }

    /// The active session, or `Unauthenticated` if none or expired.
    pub fn current(&self) -> AppResult<&Session> {
        match &self.current {
            Some(session) if !session.is_expired(self.clock.now()) => Ok(session),
            Some(_) => {
                tracing::warn!("Session expired");
                Err(AppError::Unauthenticated)
            }
            None => Err(AppError::Unauthenticated),
        }
    }
}
