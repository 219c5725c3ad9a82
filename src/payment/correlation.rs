use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Derives the correlation memo for a reservation from the employer id, the
/// calling account, and a nanosecond clock reading at call time.
///
/// Deterministic for identical inputs, but because the inputs include a live
/// clock reading, two calls in the same process are vanishingly unlikely to
/// collide. Collisions are not formally prevented; this is a correlation
/// key, not a guaranteed-unique token.
pub fn correlation_id(employer_id: Uuid, caller: &str) -> u64 {
    correlation_id_at(employer_id, caller, clock_nanos())
}

pub(crate) fn correlation_id_at(employer_id: Uuid, caller: &str, nanos: u128) -> u64 {
    let input = format!("{}_{}_{}", employer_id, caller, nanos);
    let digest = Sha256::digest(input.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

fn clock_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}
