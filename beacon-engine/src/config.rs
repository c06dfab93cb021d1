use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Verbose per-sink report logging.
    pub debug: bool,
    pub database_url: String,
    /// TTL for the durable session/variant values, in days.
    pub cookie_ttl_days: u32,
    /// How long to wait for a late-arriving experiment SDK.
    pub sdk_wait_timeout_ms: u64,
    /// Poll interval while waiting for the experiment SDK.
    pub sdk_poll_interval_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            debug: env::var("BEACON_DEBUG")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            database_url: env::var("BEACON_DATABASE_URL")
                .unwrap_or_else(|_| "./.beacon/beacon.db".to_string()),
            cookie_ttl_days: env::var("BEACON_COOKIE_TTL_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("BEACON_COOKIE_TTL_DAYS must be a valid number"),
            sdk_wait_timeout_ms: env::var("BEACON_SDK_WAIT_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("BEACON_SDK_WAIT_TIMEOUT_MS must be a valid number"),
            sdk_poll_interval_ms: env::var("BEACON_SDK_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .expect("BEACON_SDK_POLL_INTERVAL_MS must be a valid number"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            database_url: "./.beacon/beacon.db".to_string(),
            cookie_ttl_days: 30,
            sdk_wait_timeout_ms: 5000,
            sdk_poll_interval_ms: 100,
        }
    }
}
