use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinSet;

use crate::error::{AppError, AppResult};
use crate::lending::refund::RefundPolicy;
use crate::lending::status::{next_status, RequestAction, RequestStatus};
use crate::lending::validator::{check_balance, check_kit_available, validate_request, Clock};
use crate::models::{
    BorrowingRequest, CreateBorrowingRequest, Kit, Notification, RequestFilter, RequestType,
    StatusUpdate, Wallet, WalletTransaction,
};
use crate::services::{BorrowingRequestService, KitDirectory, NotificationService, WalletService};
use crate::session::Session;

/// What a requester fills in to borrow a kit.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub kit_id: String,
    pub request_type: RequestType,
    pub return_date: String,
    pub reason: String,
}

/// Drives borrowing requests through their lifecycle against the remote API.
///
/// Every state-changing call re-fetches what it touched and returns the
/// server's copy. Local deltas are never applied.
pub struct BorrowingWorkflow {
    kits: Arc<dyn KitDirectory>,
    wallets: Arc<dyn WalletService>,
    requests: Arc<dyn BorrowingRequestService>,
    notifications: Arc<dyn NotificationService>,
    refund_policy: RefundPolicy,
    clock: Arc<dyn Clock>,
    pending_notifications: Mutex<JoinSet<()>>,
}

impl BorrowingWorkflow {
    pub fn new(
        kits: Arc<dyn KitDirectory>,
        wallets: Arc<dyn WalletService>,
        requests: Arc<dyn BorrowingRequestService>,
        notifications: Arc<dyn NotificationService>,
        refund_policy: RefundPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            kits,
            wallets,
            requests,
            notifications,
            refund_policy,
            clock,
            pending_notifications: Mutex::new(JoinSet::new()),
        }
    }

    pub async fn kits(&self, session: &Session) -> AppResult<Vec<Kit>> {
        self.kits.list_kits(session.token()).await
    }

    pub async fn wallet(&self, session: &Session) -> AppResult<Wallet> {
        self.wallets
            .get_wallet(session.token(), session.account_id())
            .await
    }

    pub async fn transactions(&self, session: &Session) -> AppResult<Vec<WalletTransaction>> {
        self.wallets
            .list_transactions(session.token(), session.account_id())
            .await
    }

    pub async fn notifications(&self, session: &Session) -> AppResult<Vec<Notification>> {
        self.notifications
            .list(session.token(), session.account_id())
            .await
    }

    /// Validate against fresh kit and wallet data, then create the request.
    pub async fn submit(
        &self,
        session: &Session,
        input: SubmitRequest,
    ) -> AppResult<BorrowingRequest> {
        session.require_requester()?;
        let token = session.token();

        let kit = self.kits.get_kit(token, &input.kit_id).await?;
        let wallet = self.wallets.get_wallet(token, session.account_id()).await?;

        let normalized = validate_request(
            &wallet,
            &kit,
            input.request_type,
            &input.return_date,
            &input.reason,
            self.clock.as_ref(),
        )?;
        check_kit_available(&kit)?;

        let payload = CreateBorrowingRequest {
            kit_id: normalized.kit_id,
            requester_id: session.account_id().to_string(),
            request_type: normalized.request_type,
            reason: normalized.reason,
            expect_return_date: normalized.expect_return_date,
            deposit_amount: normalized.deposit_amount,
        };

        let created = self.requests.create(token, &payload).await?;
        tracing::info!(
            "Borrowing request {} created for kit {} by {}",
            created.id,
            created.kit_id,
            created.requester_id
        );
        Ok(created)
    }

    pub async fn approve(
        &self,
        session: &Session,
        request_id: &str,
    ) -> AppResult<BorrowingRequest> {
        self.transition(session, request_id, RequestAction::Approve, None)
            .await
    }

    pub async fn reject(
        &self,
        session: &Session,
        request_id: &str,
        note: Option<String>,
    ) -> AppResult<BorrowingRequest> {
        self.transition(session, request_id, RequestAction::Reject, note)
            .await
    }

    pub async fn collect(
        &self,
        session: &Session,
        request_id: &str,
    ) -> AppResult<BorrowingRequest> {
        self.transition(session, request_id, RequestAction::Collect, None)
            .await
    }

    pub async fn return_kit(
        &self,
        session: &Session,
        request_id: &str,
    ) -> AppResult<BorrowingRequest> {
        self.transition(session, request_id, RequestAction::Return, None)
            .await
    }

    /// Requesters only see their own requests.
    pub async fn list_requests(
        &self,
        session: &Session,
        filter: RequestFilter,
    ) -> AppResult<Vec<BorrowingRequest>> {
        let filter = if session.role().can_approve() {
            filter
        } else {
            RequestFilter {
                requester_id: Some(session.account_id().to_string()),
                ..filter
            }
        };
        self.requests.list(session.token(), &filter).await
    }

    pub async fn top_up(&self, session: &Session, amount: i64) -> AppResult<Wallet> {
        if amount <= 0 {
            return Err(AppError::InvalidInput(
                "top-up amount must be positive".to_string(),
            ));
        }
        self.wallets
            .top_up(session.token(), session.account_id(), amount)
            .await?;
        tracing::info!("Wallet {} topped up by {}", session.account_id(), amount);
        self.wallet(session).await
    }

    async fn transition(
        &self,
        session: &Session,
        request_id: &str,
        action: RequestAction,
        note: Option<String>,
    ) -> AppResult<BorrowingRequest> {
        session.require_approver()?;
        let token = session.token();

        let request = self.requests.get(token, request_id).await?;
        let next = next_status(request.status, action)?;

        if action == RequestAction::Approve {
            let kit = self.kits.get_kit(token, &request.kit_id).await?;
            check_kit_available(&kit)?;
            let wallet = self.wallets.get_wallet(token, &request.requester_id).await?;
            check_balance(&wallet, &kit)?;
        }

        // The deposit is only held once a request has been approved.
        let deposit_held = matches!(
            request.status,
            RequestStatus::Approved | RequestStatus::Borrowed
        );
        let refund_amount = (next.is_terminal() && deposit_held)
            .then(|| self.refund_policy.refund_for(next, request.deposit_amount));

        let update = StatusUpdate {
            status: next,
            actor_id: session.account_id().to_string(),
            note,
            refund_amount,
        };
        self.requests.update_status(token, request_id, &update).await?;

        let refreshed = self.requests.get(token, request_id).await?;
        if refreshed.status != next {
            tracing::warn!(
                "Request {} is {} after {}, expected {}",
                request_id,
                refreshed.status,
                action,
                next
            );
        } else {
            tracing::info!(
                "Request {} {} --{}--> {}",
                request_id,
                request.status,
                action,
                next
            );
        }

        if let Some((title, message)) = status_message(&refreshed) {
            self.notify(session, &refreshed.requester_id, title, message);
        }
        Ok(refreshed)
    }

    /// Wait for notifications still in flight. Failures are logged only.
    pub async fn flush_notifications(&self) {
        let mut pending = {
            let mut guard = self
                .pending_notifications
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *guard)
        };
        while let Some(result) = pending.join_next().await {
            if let Err(e) = result {
                tracing::error!("Notification task failed: {}", e);
            }
        }
    }

    /// Fire-and-forget. Delivery failures are logged only; call
    /// [`Self::flush_notifications`] before shutting the runtime down.
    fn notify(
        &self,
        session: &Session,
        recipient_id: &str,
        title: &'static str,
        message: String,
    ) {
        let notifications = self.notifications.clone();
        let token = session.token().to_string();
        let recipient_id = recipient_id.to_string();

        let mut pending = self
            .pending_notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Reap finished sends so a long-lived workflow does not accumulate them.
        while pending.try_join_next().is_some() {}
        pending.spawn(async move {
            match notifications
                .send(&token, &recipient_id, title, &message)
                .await
            {
                Ok(()) => tracing::debug!("Notification sent to {}", recipient_id),
                Err(e) => tracing::error!("Failed to notify {}: {}", recipient_id, e),
            }
        });
    }
}

fn status_message(request: &BorrowingRequest) -> Option<(&'static str, String)> {
    let kit = &request.kit_id;
    match request.status {
        RequestStatus::Approved => Some((
            "Request approved",
            format!("Your request for kit {} was approved. Please collect it.", kit),
        )),
        RequestStatus::Rejected => Some((
            "Request rejected",
            format!("Your request for kit {} was rejected.", kit),
        )),
        RequestStatus::Returned => Some((
            "Kit returned",
            format!("Kit {} was checked in. Your deposit has been released.", kit),
        )),
        RequestStatus::Pending | RequestStatus::Borrowed => None,
    }
}
