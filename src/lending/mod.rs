pub mod refund;
pub mod status;
pub mod validator;
pub mod workflow;

pub use refund::RefundPolicy;
pub use status::{next_status, RequestAction, RequestLifecycle, RequestStatus, TransitionError};
pub use validator::{
    validate_request, validate_request_now, Clock, FixedClock, NormalizedRequest, SystemClock,
    ValidationError,
};
pub use workflow::{BorrowingWorkflow, SubmitRequest};
