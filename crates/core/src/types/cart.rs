//! Anonymous cart identifier.
//!
//! Carts are addressed by a client-generated random string so that visitors
//! without an account can build a cart before logging in. The server treats
//! the value as opaque; uniqueness is probabilistic, not guaranteed.

use serde::{Deserialize, Serialize};

/// Length of a generated cart identifier.
const CART_ID_LENGTH: usize = 30;

/// Alphabet a generated cart identifier is drawn from.
const CART_ID_CHARSET: &[u8] = b"ABCDEFGHIJKL1234567";

/// Errors that can occur when parsing a [`CartId`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum CartIdError {
    /// The input string is empty.
    #[error("cart id cannot be empty")]
    Empty,
}

/// Client-generated identifier for an anonymous shopping cart.
///
/// Generated once per storefront session and persisted until logout, so a
/// departing user's cart is never inherited by the next visitor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(String);

impl CartId {
    /// Generate a fresh random cart identifier.
    #[must_use]
    pub fn generate() -> Self {
        use rand::Rng;

        let mut rng = rand::rng();
        let id = (0..CART_ID_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..CART_ID_CHARSET.len());
                // SAFETY: idx is always within bounds since random_range returns 0..CHARSET.len()
                char::from(*CART_ID_CHARSET.get(idx).expect("idx within bounds"))
            })
            .collect();

        Self(id)
    }

    /// Parse a persisted cart identifier.
    ///
    /// The server round-trips the value opaquely, so anything non-empty is
    /// accepted (older clients may have generated different shapes).
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty.
    pub fn parse(s: &str) -> Result<Self, CartIdError> {
        if s.is_empty() {
            return Err(CartIdError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length() {
        let id = CartId::generate();
        assert_eq!(id.as_str().len(), 30);
    }

    #[test]
    fn test_generate_charset() {
        let id = CartId::generate();
        assert!(
            id.as_str()
                .bytes()
                .all(|b| CART_ID_CHARSET.contains(&b))
        );
    }

    #[test]
    fn test_generate_differs() {
        // 19^30 possibilities; two draws colliding would indicate a broken RNG.
        assert_ne!(CartId::generate(), CartId::generate());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(CartId::parse(""), Err(CartIdError::Empty)));
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = CartId::parse("ABCD1234ABCD1234ABCD1234ABCD12").unwrap();
        assert_eq!(id.as_str(), "ABCD1234ABCD1234ABCD1234ABCD12");
    }

    #[test]
    fn test_serde_transparent() {
        let id = CartId::parse("AAAA111").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"AAAA111\"");
    }
}
