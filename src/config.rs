use serde::Deserialize;

/// Default reservation period, matching the payment flow contract: an
/// unsettled reservation is discarded 120 seconds after creation.
pub const DEFAULT_RESERVATION_PERIOD_SECS: u64 = 120;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub bind_address: String,
    pub ledger_url: String,
    pub reservation_period_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            ledger_url: std::env::var("LEDGER_URL")
                .unwrap_or_else(|_| "http://localhost:9090".to_string()),
            reservation_period_secs: std::env::var("RESERVATION_PERIOD_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RESERVATION_PERIOD_SECS),
        }
    }
}
