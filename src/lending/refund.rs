use serde::{Deserialize, Serialize};

use crate::lending::status::RequestStatus;

/// Share of the deposit released when a request ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundPolicy {
    pub on_reject_percent: u8,
    pub on_return_percent: u8,
}

impl Default for RefundPolicy {
    fn default() -> Self {
        Self {
            on_reject_percent: 100,
            on_return_percent: 100,
        }
    }
}

impl RefundPolicy {
    /// Amount to release for a request that reached `status`. Zero unless terminal.
    pub fn refund_for(&self, status: RequestStatus, deposit: i64) -> i64 {
        let percent = match status {
            RequestStatus::Rejected => self.on_reject_percent,
            RequestStatus::Returned => self.on_return_percent,
            _ => return 0,
        };
        let percent = i64::from(percent.min(100));
        deposit.max(0).saturating_mul(percent) / 100
    }
}
