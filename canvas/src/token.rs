use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use byteorder::{ByteOrder, LittleEndian};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{CanvasError, Result};

type TokenMac = Hmac<Sha256>;

const TIMESTAMP_BYTES: usize = 8;
const MAC_BYTES: usize = 16;
const TOKEN_BYTES: usize = TIMESTAMP_BYTES + MAC_BYTES;

/// Opaque value held by the client between requests. It carries the time
/// of the client's last successful paint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CooldownToken(String);

impl CooldownToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CooldownToken {
    fn from(value: String) -> CooldownToken {
        CooldownToken(value)
    }
}

impl fmt::Display for CooldownToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encodes `millis (i64 LE) || HMAC-SHA256(secret, millis)[..16]` as unpadded
/// url-safe base64. A client can still discard its token, but it cannot
/// forge or roll back one without the secret.
#[derive(Clone)]
pub struct TokenCodec {
    mac: TokenMac,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<TokenCodec> {
        let mac = TokenMac::new_from_slice(secret.as_ref())
            .map_err(|e| CanvasError::InvalidConfig(format!("unusable token secret: {e}")))?;
        Ok(TokenCodec { mac })
    }

    pub fn encode(&self, last_paint: DateTime<Utc>) -> CooldownToken {
        self.encode_millis(last_paint.timestamp_millis())
    }

    pub(crate) fn encode_millis(&self, millis: i64) -> CooldownToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        LittleEndian::write_i64(&mut bytes[..TIMESTAMP_BYTES], millis);
        let tag = self.keyed(&bytes[..TIMESTAMP_BYTES]).finalize().into_bytes();
        bytes[TIMESTAMP_BYTES..].copy_from_slice(&tag[..MAC_BYTES]);
        CooldownToken(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Returns `None` for anything this codec did not issue, and for
    /// timestamps outside the representable calendar.
    pub fn decode(&self, token: &CooldownToken) -> Option<DateTime<Utc>> {
        let bytes = URL_SAFE_NO_PAD.decode(token.as_str()).ok()?;
        if bytes.len() != TOKEN_BYTES {
            return None;
        }
        let (timestamp, tag) = bytes.split_at(TIMESTAMP_BYTES);
        self.keyed(timestamp).verify_truncated_left(tag).ok()?;
        DateTime::from_timestamp_millis(LittleEndian::read_i64(timestamp))
    }

    fn keyed(&self, timestamp: &[u8]) -> TokenMac {
        let mut mac = self.mac.clone();
        mac.update(timestamp);
        mac
    }
}
