use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

/// An error that can occur during registration or authentication.
///
/// Note that the messages are presented to the client, so they should not
/// contain sensitive information. In particular, an unknown email and a wrong
/// password render identically.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid email or password")]
	InvalidCredentials,
	#[error("no bearer token")]
	NoBearerToken,
	#[error("invalid bearer token")]
	InvalidToken,
	#[error("email already taken")]
	EmailTaken,
	#[error("password hashing error")]
	Hash(argon2::password_hash::Error),
	#[error("token signing error")]
	Token(jsonwebtoken::errors::Error),
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route("/register", post_with(register, register_docs))
		.api_route("/login", post_with(login, login_docs))
		.api_route("/me", get_with(get_me, get_me_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::InvalidCredentials | Self::NoBearerToken | Self::InvalidToken => {
				StatusCode::UNAUTHORIZED
			}
			Self::EmailTaken => StatusCode::CONFLICT,
			Self::Hash(..) | Self::Token(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		vec![error::Message {
			content: self.to_string().into(),
			field: None,
			details: None,
		}]
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_register_login_me_flow(pool: Database) {
		let app = app(pool).await;

		let response = app
			.post("/auth/register")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 201);

		let user = response.json::<serde_json::Value>();

		assert_eq!(user["email"], "john@smith.com");
		assert!(user.get("password").is_none());

		let response = app
			.post("/auth/login")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 200);

		let token = response.json::<serde_json::Value>();

		assert_eq!(token["token_type"], "bearer");

		let response = app
			.get("/auth/me")
			.authorization_bearer(token["access_token"].as_str().unwrap())
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["email"], "john@smith.com");
	}

	#[sqlx::test]
	async fn test_register_duplicate_email_conflicts(pool: Database) {
		let app = app(pool).await;

		register(&app, "john@smith.com").await;

		let response = app
			.post("/auth/register")
			.json(&json!({
				"email": "john@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 409);
	}

	#[sqlx::test]
	async fn test_register_invalid_body_unprocessable(pool: Database) {
		let app = app(pool).await;

		for body in [
			json!({"email": "not an email", "password": "hunter2hunter"}),
			json!({"email": "john@smith.com", "password": "short"}),
			json!({"email": "john@smith.com"}),
		] {
			let response = app.post("/auth/register").json(&body).await;

			assert_eq!(response.status_code(), 422);
		}
	}

	#[sqlx::test]
	async fn test_login_failures_are_indistinguishable(pool: Database) {
		let app = app(pool).await;

		register(&app, "john@smith.com").await;

		let unknown = app
			.post("/auth/login")
			.json(&json!({
				"email": "jane@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		let wrong_password = app
			.post("/auth/login")
			.json(&json!({
				"email": "john@smith.com",
				"password": "wrong-password",
			}))
			.await;

		assert_eq!(unknown.status_code(), 401);
		assert_eq!(wrong_password.status_code(), 401);
		assert_eq!(unknown.text(), wrong_password.text());
	}

	#[sqlx::test]
	async fn test_me_rejects_bad_tokens(pool: Database) {
		let app = app(pool).await;

		register(&app, "john@smith.com").await;

		let missing = app.get("/auth/me").await;
		let garbage = app.get("/auth/me").authorization_bearer("not-a-token").await;

		// Signed with the right secret, but already expired.
		let keys = crate::token::Keys::new(SECRET.as_bytes());
		let expired = crate::token::issue(&keys, 1, -120).unwrap();
		let expired = app.get("/auth/me").authorization_bearer(&expired).await;

		assert_eq!(missing.status_code(), 401);
		assert_eq!(garbage.status_code(), 401);
		assert_eq!(expired.status_code(), 401);
	}
}
