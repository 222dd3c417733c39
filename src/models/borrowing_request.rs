use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lending::status::RequestStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    BorrowKit,
    BorrowComponent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowingRequest {
    pub id: String,
    pub kit_id: String,
    pub requester_id: String,
    pub request_type: RequestType,
    pub reason: String,
    pub expect_return_date: DateTime<Utc>,
    pub deposit_amount: i64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_return_date: Option<DateTime<Utc>>,
}

/// Body sent to create a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBorrowingRequest {
    pub kit_id: String,
    pub requester_id: String,
    pub request_type: RequestType,
    pub reason: String,
    pub expect_return_date: DateTime<Utc>,
    pub deposit_amount: i64,
}

/// Body sent to move a request to a new status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: RequestStatus,
    pub actor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub requester_id: Option<String>,
    pub status: Option<RequestStatus>,
}

impl RequestFilter {
    pub fn to_query(&self) -> String {
        let mut params = Vec::new();
        if let Some(requester_id) = &self.requester_id {
            params.push(format!("requesterId={}", urlencoding::encode(requester_id)));
        }
        if let Some(status) = self.status {
            params.push(format!("status={}", status.as_str()));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}
