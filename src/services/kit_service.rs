use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::http_client::HttpClient;
use crate::models::Kit;

/// Kit catalog owned by the remote API.
#[async_trait]
pub trait KitDirectory: Send + Sync {
    async fn get_kit(&self, token: &str, kit_id: &str) -> AppResult<Kit>;

    async fn list_kits(&self, token: &str) -> AppResult<Vec<Kit>>;
}

pub struct RestKitDirectory {
    http_client: Arc<HttpClient>,
}

impl RestKitDirectory {
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl KitDirectory for RestKitDirectory {
    async fn get_kit(&self, token: &str, kit_id: &str) -> AppResult<Kit> {
        let path = format!("kits/{}", urlencoding::encode(kit_id));
        self.http_client.get_json(&path, Some(token)).await
    }

    async fn list_kits(&self, token: &str) -> AppResult<Vec<Kit>> {
        let kits: Vec<Kit> = self.http_client.get_json("kits", Some(token)).await?;
        tracing::debug!("Fetched {} kits", kits.len());
        Ok(kits)
    }
}
