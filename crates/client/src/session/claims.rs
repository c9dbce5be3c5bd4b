//! Unverified JWT claim decoding.
//!
//! The server signs every token it issues; the client only needs the embedded
//! claims for display and expiry checks, so the payload segment is decoded
//! without signature verification. Claims are never an authorization input -
//! the server re-checks every request.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use mercadito_core::{UserId, VendorId};

/// Claim set embedded in the tokens the store API issues.
///
/// Decoded from the refresh token for the "who is logged in" view and from
/// the access token for expiry checks. Purely a display/convenience cache.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
    /// Id of the authenticated user.
    pub user_id: UserId,
    /// Vendor id; the server issues 0 for accounts without a vendor profile.
    #[serde(default)]
    pub vendor_id: Option<i32>,
    /// Display name, when the server includes it.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Email, when the server includes it.
    #[serde(default)]
    pub email: Option<String>,
    /// Username, when the server includes it.
    #[serde(default)]
    pub username: Option<String>,
}

impl Identity {
    /// Vendor id of the authenticated user, if they have a vendor profile.
    ///
    /// The server encodes "no vendor profile" as 0.
    #[must_use]
    pub fn vendor(&self) -> Option<VendorId> {
        match self.vendor_id {
            Some(id) if id > 0 => Some(VendorId::new(id)),
            _ => None,
        }
    }
}

/// Decode the claims of a JWT without verifying its signature.
///
/// Returns `None` for anything that is not a well-formed token carrying the
/// expected claims; malformed input is never an error.
#[must_use]
pub fn decode(token: &str) -> Option<Identity> {
    let payload = token.split('.').nth(1)?;
    // Tolerate both padded and unpadded emitters.
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whether a token's `exp` claim is in the past.
///
/// Undecodable tokens are treated as expired, which forces a refresh attempt
/// on the next request rather than sending a known-bad bearer.
#[must_use]
pub fn is_expired(token: &str, now: i64) -> bool {
    decode(token).is_none_or(|claims| claims.exp < now)
}

/// Mint an unsigned token with the given payload, the way tests fake the
/// server's issuer.
#[cfg(test)]
pub(crate) fn make_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{header}.{payload}.unsigned")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_token() {
        let token = make_token(&serde_json::json!({
            "token_type": "refresh",
            "exp": 4_102_444_800_i64,
            "user_id": 12,
            "vendor_id": 3,
            "full_name": "Ana Torres",
        }));

        let identity = decode(&token).unwrap();
        assert_eq!(identity.user_id, UserId::new(12));
        assert_eq!(identity.vendor(), Some(VendorId::new(3)));
        assert_eq!(identity.full_name.as_deref(), Some("Ana Torres"));
    }

    #[test]
    fn test_decode_zero_vendor_means_no_vendor() {
        let token = make_token(&serde_json::json!({
            "exp": 4_102_444_800_i64,
            "user_id": 5,
            "vendor_id": 0,
        }));

        let identity = decode(&token).unwrap();
        assert_eq!(identity.vendor(), None);
    }

    #[test]
    fn test_decode_malformed_returns_none() {
        assert!(decode("").is_none());
        assert!(decode("not-a-token").is_none());
        assert!(decode("a.b.c").is_none());
        assert!(decode("only.two").is_none());
    }

    #[test]
    fn test_decode_padded_payload() {
        use base64::Engine as _;
        use base64::engine::general_purpose::URL_SAFE;

        // Some emitters pad the base64 segments.
        let payload = URL_SAFE.encode(br#"{"exp": 4102444800, "user_id": 9}"#);
        let token = format!("h.{payload}.s");
        assert_eq!(decode(&token).unwrap().user_id, UserId::new(9));
    }

    #[test]
    fn test_is_expired_past_exp() {
        let token = make_token(&serde_json::json!({"exp": 1_000, "user_id": 1}));
        assert!(is_expired(&token, 2_000));
        assert!(!is_expired(&token, 500));
    }

    #[test]
    fn test_is_expired_garbage_is_expired() {
        assert!(is_expired("garbage", 0));
    }
}
