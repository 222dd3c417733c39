use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppResult;
use crate::http_client::HttpClient;
use crate::models::Notification;

/// Delivery of human-readable status messages.
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send(&self, token: &str, recipient_id: &str, title: &str, message: &str)
        -> AppResult<()>;

    async fn list(&self, token: &str, recipient_id: &str) -> AppResult<Vec<Notification>>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendBody<'a> {
    recipient_id: &'a str,
    title: &'a str,
    message: &'a str,
}

pub struct RestNotificationService {
    http_client: Arc<HttpClient>,
}

impl RestNotificationService {
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl NotificationService for RestNotificationService {
    async fn send(
        &self,
        token: &str,
        recipient_id: &str,
        title: &str,
        message: &str,
    ) -> AppResult<()> {
        let body = SendBody {
            recipient_id,
            title,
            message,
        };
        self.http_client
            .post_unit("notifications", &body, Some(token))
            .await
    }

    async fn list(&self, token: &str, recipient_id: &str) -> AppResult<Vec<Notification>> {
        let path = format!(
            "notifications?recipientId={}",
            urlencoding::encode(recipient_id)
        );
        self.http_client.get_json(&path, Some(token)).await
    }
}
