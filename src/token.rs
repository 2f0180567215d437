use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Signing and verification keys for access tokens, derived once from the
/// configured secret and shared through [`crate::State`].
#[derive(Clone)]
pub struct Keys {
	encoding: EncodingKey,
	decoding: DecodingKey,
}

impl Keys {
	pub fn new(secret: &[u8]) -> Self {
		Self {
			encoding: EncodingKey::from_secret(secret),
			decoding: DecodingKey::from_secret(secret),
		}
	}
}

/// Claims carried by an access token. `sub` is the user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
	pub sub: i32,
	pub iat: i64,
	pub exp: i64,
}

/// Issues a signed access token for the user, expiring after
/// `expire_minutes`.
pub fn issue(
	keys: &Keys,
	user_id: i32,
	expire_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
	let now = Utc::now();
	let claims = Claims {
		sub: user_id,
		iat: now.timestamp(),
		exp: (now + Duration::minutes(expire_minutes)).timestamp(),
	};

	jsonwebtoken::encode(&Header::default(), &claims, &keys.encoding)
}

/// Verifies a token's signature and expiry, returning its claims.
pub fn verify(keys: &Keys, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
	jsonwebtoken::decode::<Claims>(token, &keys.decoding, &Validation::default())
		.map(|data| data.claims)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_issue_and_verify_round_trip() {
		let keys = Keys::new(b"test-secret");
		let token = issue(&keys, 42, 30).unwrap();
		let claims = verify(&keys, &token).unwrap();

		assert_eq!(claims.sub, 42);
		assert!(claims.exp > claims.iat);
	}

	#[test]
	fn test_verify_rejects_expired_token() {
		let keys = Keys::new(b"test-secret");
		// Far enough in the past to clear the default leeway.
		let token = issue(&keys, 42, -120).unwrap();

		assert!(verify(&keys, &token).is_err());
	}

	#[test]
	fn test_verify_rejects_wrong_secret() {
		let keys = Keys::new(b"test-secret");
		let other = Keys::new(b"other-secret");
		let token = issue(&keys, 42, 30).unwrap();

		assert!(verify(&other, &token).is_err());
	}

	#[test]
	fn test_verify_rejects_garbage() {
		let keys = Keys::new(b"test-secret");

		assert!(verify(&keys, "not-a-token").is_err());
	}
}
