use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};

use crate::{
	error::RouteError, openapi::SECURITY_SCHEME_BEARER, route::auth, token, Database,
};

pub const AUTHORIZATION_PREFIX: &str = "Bearer ";

/// Extracts the authenticated user from the request's bearer token.
///
/// If the `Authorization` header is absent, a [`auth::Error::NoBearerToken`]
/// is returned. A malformed, tampered or expired token, or a token whose
/// subject no longer exists, yields a [`auth::Error::InvalidToken`].
///
/// ```rust
/// async fn route(session: Session) {
///   println!("{:?}", session.user);
/// }
/// ```
#[derive(Debug)]
pub struct Session {
	pub user: auth::model::User,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
	Database: FromRef<S>,
	token::Keys: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	/// Extracts the session from the request's `Authorization` header.
	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let header = parts
			.headers
			.get(header::AUTHORIZATION)
			.ok_or(auth::Error::NoBearerToken)?;

		let slice = header.to_str().map_err(|_| auth::Error::InvalidToken)?;

		if !slice.starts_with(AUTHORIZATION_PREFIX) {
			return Err(auth::Error::InvalidToken.into());
		}

		let keys = token::Keys::from_ref(state);
		let claims = token::verify(&keys, &slice[AUTHORIZATION_PREFIX.len()..])
			.map_err(|_| auth::Error::InvalidToken)?;

		let database = Database::from_ref(state);
		let user = sqlx::query_as::<_, auth::model::User>("SELECT * FROM users WHERE id = $1")
			.bind(claims.sub)
			.fetch_optional(&database)
			.await?;

		// The token may outlive its user.
		let user = user.ok_or(auth::Error::InvalidToken)?;

		Ok(Self { user })
	}
}

impl OperationInput for Session {
	/// Operation input for the session extractor.
	///
	/// This adds a bearer token requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.extend([[(
			SECURITY_SCHEME_BEARER.to_string(),
			Vec::new(),
		)]
		.into_iter()
		.collect()]);
	}
}
