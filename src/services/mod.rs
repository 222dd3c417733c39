pub mod auth_service;
pub mod borrowing_service;
pub mod kit_service;
pub mod notification_service;
pub mod wallet_service;

pub use auth_service::{AuthService, RestAuthService};
pub use borrowing_service::{BorrowingRequestService, RestBorrowingRequestService};
pub use kit_service::{KitDirectory, RestKitDirectory};
pub use notification_service::{NotificationService, RestNotificationService};
pub use wallet_service::{RestWalletService, WalletService};
