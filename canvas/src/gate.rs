use chrono::{DateTime, Utc};
use tracing::debug;

use crate::token::{CooldownToken, TokenCodec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    pub allowed: bool,
    pub remaining_seconds: u64,
}

impl GateDecision {
    fn from_remaining(remaining_seconds: u64) -> GateDecision {
        GateDecision { allowed: remaining_seconds == 0, remaining_seconds }
    }
}

/// Stateless cooldown check. Everything it knows comes from the token and
/// the caller's clock, so it needs no locking.
#[derive(Debug, Clone)]
pub struct RateGate {
    cooldown_seconds: u64,
    codec: TokenCodec,
}

impl RateGate {
    pub fn new(cooldown_seconds: u64, codec: TokenCodec) -> RateGate {
        RateGate { cooldown_seconds, codec }
    }

    pub fn cooldown_seconds(&self) -> u64 {
        self.cooldown_seconds
    }

    pub fn evaluate(&self, token: Option<&CooldownToken>, now: DateTime<Utc>) -> GateDecision {
        let Some(token) = token else { return GateDecision::from_remaining(0) };
        let Some(last_paint) = self.codec.decode(token) else {
            debug!("ignoring unrecognized cooldown token");
            return GateDecision::from_remaining(0);
        };
        let elapsed = now.signed_duration_since(last_paint).num_milliseconds().div_euclid(1000);
        let cooldown = i64::try_from(self.cooldown_seconds).unwrap_or(i64::MAX);
        // tokens stamped in the future still wait at most one full cooldown
        let remaining = cooldown.saturating_sub(elapsed).clamp(0, cooldown);
        GateDecision::from_remaining(remaining.unsigned_abs())
    }

    pub fn issue(&self, now: DateTime<Utc>) -> CooldownToken {
        self.codec.encode(now)
    }
}
