//! Small shared helpers.

use chrono::{SecondsFormat, Utc};
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Mint a session identifier: `sess_<9 base36 chars>_<epoch millis>`.
/// Random tail plus wall clock keeps collisions out of reach without
/// any central coordination.
pub fn generate_session_id() -> String {
    let mut rng = rand::thread_rng();
    let tail: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("sess_{}_{}", tail, Utc::now().timestamp_millis())
}

/// Current time as an ISO-8601 string with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
