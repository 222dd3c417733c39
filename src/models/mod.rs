pub mod account;
pub mod borrowing_request;
pub mod kit;
pub mod notification;
pub mod wallet;

pub use account::*;
pub use borrowing_request::*;
pub use kit::*;
pub use notification::*;
pub use wallet::*;
