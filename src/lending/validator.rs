use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Kit, RequestType, Wallet};

/// Source of "now" for date checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("a reason is required")]
    MissingReason,

    #[error("a return date is required")]
    MissingReturnDate,

    #[error("return date must be DD/MM/YYYY or YYYY-MM-DD")]
    InvalidDateFormat,

    #[error("return date must be in the future")]
    DateNotFuture,

    #[error("insufficient balance: deposit {required} required, {available} available")]
    InsufficientBalance { required: i64, available: i64 },

    #[error("kit {0} has no units available")]
    KitUnavailable(String),
}

/// A request that passed validation, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRequest {
    pub kit_id: String,
    pub request_type: RequestType,
    pub reason: String,
    pub expect_return_date: DateTime<Utc>,
    /// Deposit captured from the kit when validated.
    pub deposit_amount: i64,
}

fn day_first_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid regex"))
}

fn iso_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid regex"))
}

/// Parse `DD/MM/YYYY` or `YYYY-MM-DD` into midnight UTC of that day.
pub fn parse_return_date(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::MissingReturnDate);
    }

    let (year, month, day) = if let Some(caps) = day_first_pattern().captures(input) {
        (caps[3].parse(), caps[2].parse(), caps[1].parse())
    } else if let Some(caps) = iso_pattern().captures(input) {
        (caps[1].parse(), caps[2].parse(), caps[3].parse())
    } else {
        return Err(ValidationError::InvalidDateFormat);
    };

    let date = match (year, month, day) {
        (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d),
        _ => None,
    }
    .ok_or(ValidationError::InvalidDateFormat)?;

    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or(ValidationError::InvalidDateFormat)
}

/// Reject kits with nothing left to lend.
pub fn check_kit_available(kit: &Kit) -> Result<(), ValidationError> {
    if kit.is_available() {
        Ok(())
    } else {
        Err(ValidationError::KitUnavailable(kit.id.clone()))
    }
}

/// The balance rule that must hold both at submission and at approval.
pub fn check_balance(wallet: &Wallet, kit: &Kit) -> Result<(), ValidationError> {
    if kit.deposit_amount > wallet.balance {
        return Err(ValidationError::InsufficientBalance {
            required: kit.deposit_amount,
            available: wallet.balance,
        });
    }
    Ok(())
}

/// Decide whether a rental request may be submitted.
///
/// Checks run in a fixed order and the first failure is returned: reason,
/// return date presence, date format, date in the future, then balance.
pub fn validate_request(
    wallet: &Wallet,
    kit: &Kit,
    request_type: RequestType,
    proposed_return_date: &str,
    reason: &str,
    clock: &dyn Clock,
) -> Result<NormalizedRequest, ValidationError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ValidationError::MissingReason);
    }

    let expect_return_date = parse_return_date(proposed_return_date)?;
    if expect_return_date <= clock.now() {
        return Err(ValidationError::DateNotFuture);
    }

    check_balance(wallet, kit)?;

    Ok(NormalizedRequest {
        kit_id: kit.id.clone(),
        request_type,
        reason: reason.to_string(),
        expect_return_date,
        deposit_amount: kit.deposit_amount,
    })
}

/// [`validate_request`] against the system clock.
pub fn validate_request_now(
    wallet: &Wallet,
    kit: &Kit,
    request_type: RequestType,
    proposed_return_date: &str,
    reason: &str,
) -> Result<NormalizedRequest, ValidationError> {
    validate_request(
        wallet,
        kit,
        request_type,
        proposed_return_date,
        reason,
        &SystemClock,
    )
}
