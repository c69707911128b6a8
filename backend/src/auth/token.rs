//! Opaque API token keys

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes in a key; rendered as twice as many hex characters
pub const KEY_BYTES: usize = 20;

/// Authorization schemes accepted in front of a token key
const SCHEMES: [&str; 2] = ["Bearer", "Token"];

/// Generate a new random token key (40 lowercase hex characters)
pub fn generate_key() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Extract the key from an `Authorization` header value.
///
/// Accepts `Bearer <key>` and `Token <key>`, scheme matched case-insensitively.
/// Returns `None` for other schemes, a missing key or embedded spaces.
pub fn parse_authorization(value: &str) -> Option<&str> {
    let (scheme, key) = value.trim().split_once(' ')?;
    if !SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
        return None;
    }

    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some(key)
}
