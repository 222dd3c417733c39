use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::lending::refund::RefundPolicy;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub http_timeout_secs: u64,
    pub refund_on_reject_percent: u8,
    pub refund_on_return_percent: u8,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let api_url = env::var("KIT_LENDING_API_URL")
            .map_err(|_| AppError::Config("KIT_LENDING_API_URL is not set".to_string()))?;

        Ok(Config {
            api_url: api_url.trim_end_matches('/').to_string(),
            http_timeout_secs: env::var("KIT_LENDING_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            refund_on_reject_percent: parse_percent("KIT_LENDING_REFUND_ON_REJECT_PERCENT")?,
            refund_on_return_percent: parse_percent("KIT_LENDING_REFUND_ON_RETURN_PERCENT")?,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn refund_policy(&self) -> RefundPolicy {
        RefundPolicy {
            on_reject_percent: self.refund_on_reject_percent,
            on_return_percent: self.refund_on_return_percent,
        }
    }
}

fn parse_percent(key: &str) -> AppResult<u8> {
    let raw = match env::var(key) {
        Ok(v) => v,
        Err(_) => return Ok(100),
    };
    let value: u8 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be an integer 0-100", key)))?;
    if value > 100 {
        return Err(AppError::Config(format!("{} must be at most 100", key)));
    }
    Ok(value)
}
