use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::http_client::HttpClient;
use crate::models::Account;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub account: Account,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse>;
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

pub struct RestAuthService {
    http_client: Arc<HttpClient>,
}

impl RestAuthService {
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl AuthService for RestAuthService {
    async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        tracing::info!("Logging in as {}", email);
        self.http_client
            .post_json("auth/login", &LoginBody { email, password }, None)
            .await
    }
}
