use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::http_client::HttpClient;
use crate::models::{BorrowingRequest, CreateBorrowingRequest, RequestFilter, StatusUpdate};

/// Remote store of borrowing requests.
#[async_trait]
pub trait BorrowingRequestService: Send + Sync {
    async fn create(
        &self,
        token: &str,
        payload: &CreateBorrowingRequest,
    ) -> AppResult<BorrowingRequest>;

    async fn get(&self, token: &str, request_id: &str) -> AppResult<BorrowingRequest>;

    async fn update_status(
        &self,
        token: &str,
        request_id: &str,
        update: &StatusUpdate,
    ) -> AppResult<()>;

    async fn list(&self, token: &str, filter: &RequestFilter) -> AppResult<Vec<BorrowingRequest>>;
}

pub struct RestBorrowingRequestService {
    http_client: Arc<HttpClient>,
}

impl RestBorrowingRequestService {
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl BorrowingRequestService for RestBorrowingRequestService {
    async fn create(
        &self,
        token: &str,
        payload: &CreateBorrowingRequest,
    ) -> AppResult<BorrowingRequest> {
        self.http_client
            .post_json("borrowing-requests", payload, Some(token))
            .await
    }

    async fn get(&self, token: &str, request_id: &str) -> AppResult<BorrowingRequest> {
        let path = format!("borrowing-requests/{}", urlencoding::encode(request_id));
        self.http_client.get_json(&path, Some(token)).await
    }

    async fn update_status(
        &self,
        token: &str,
        request_id: &str,
        update: &StatusUpdate,
    ) -> AppResult<()> {
        let path = format!("borrowing-requests/{}/status", urlencoding::encode(request_id));
        self.http_client.put_unit(&path, update, Some(token)).await
    }

    async fn list(&self, token: &str, filter: &RequestFilter) -> AppResult<Vec<BorrowingRequest>> {
        let path = format!("borrowing-requests{}", filter.to_query());
        self.http_client.get_json(&path, Some(token)).await
    }
}
