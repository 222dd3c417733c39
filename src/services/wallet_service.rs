use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppResult;
use crate::http_client::HttpClient;
use crate::models::{Wallet, WalletTransaction};

/// Wallet balances. Holds and refunds are applied server-side.
#[async_trait]
pub trait WalletService: Send + Sync {
    async fn get_wallet(&self, token: &str, owner_id: &str) -> AppResult<Wallet>;

    async fn top_up(&self, token: &str, owner_id: &str, amount: i64) -> AppResult<()>;

    async fn list_transactions(
        &self,
        token: &str,
        owner_id: &str,
    ) -> AppResult<Vec<WalletTransaction>>;
}

#[derive(Serialize)]
struct TopUpBody {
    amount: i64,
}

pub struct RestWalletService {
    http_client: Arc<HttpClient>,
}

impl RestWalletService {
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl WalletService for RestWalletService {
    async fn get_wallet(&self, token: &str, owner_id: &str) -> AppResult<Wallet> {
        let path = format!("wallets/{}", urlencoding::encode(owner_id));
        self.http_client.get_json(&path, Some(token)).await
    }

    async fn top_up(&self, token: &str, owner_id: &str, amount: i64) -> AppResult<()> {
        let path = format!("wallets/{}/top-up", urlencoding::encode(owner_id));
        self.http_client
            .post_unit(&path, &TopUpBody { amount }, Some(token))
            .await
    }

    async fn list_transactions(
        &self,
        token: &str,
        owner_id: &str,
    ) -> AppResult<Vec<WalletTransaction>> {
        let path = format!("wallets/{}/transactions", urlencoding::encode(owner_id));
        self.http_client.get_json(&path, Some(token)).await
    }
}
