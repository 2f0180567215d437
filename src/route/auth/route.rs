use aide::axum::IntoApiResponse;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Session},
	openapi::tag,
	token, AppState,
};

use super::{model, Error, RouteError};

/// Register account
/// Registers a new account with a unique email address.
#[route(tag = tag::AUTH, response(status = 201, description = "Registered successfully.", shape = "Json<model::User>"))]
pub async fn register(
	State(state): State<AppState>,
	Json(input): Json<model::RegisterInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let salt = SaltString::generate(&mut OsRng);
	let password = state
		.hasher
		.hash_password(input.password.as_bytes(), &salt)
		.map_err(Error::Hash)?
		.to_string();

	let user = sqlx::query_as::<_, model::User>(
		"INSERT INTO users (email, password, phone_number) VALUES ($1, $2, $3) RETURNING *",
	)
	.bind(&input.email)
	.bind(&password)
	.bind(&input.phone_number)
	.fetch_one(&state.database)
	.await
	.map_err(|e| match e {
		sqlx::Error::Database(ref d) => match d.constraint() {
			Some("users_email_key") => Error::EmailTaken.into(),
			_ => RouteError::from(e),
		},
		e => RouteError::from(e),
	})?;

	Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// Log in
/// Logs in to an account, returning a bearer access token.
#[route(tag = tag::AUTH, response(status = 200, description = "Logged in successfully.", shape = "Json<model::Token>"))]
pub async fn login(
	State(state): State<AppState>,
	Json(input): Json<model::LoginInput>,
) -> Result<Json<model::Token>, RouteError> {
	let user = sqlx::query_as::<_, model::User>("SELECT * FROM users WHERE email = $1")
		.bind(&input.email)
		.fetch_optional(&state.database)
		.await?;

	// Unknown email and wrong password are indistinguishable to the caller.
	let Some(user) = user else {
		return Err(Error::InvalidCredentials.into());
	};

	let hash = PasswordHash::new(&user.password).map_err(Error::Hash)?;

	if state
		.hasher
		.verify_password(input.password.as_bytes(), &hash)
		.is_err()
	{
		return Err(Error::InvalidCredentials.into());
	}

	let access_token = token::issue(&state.keys, user.id, state.config.token_expire_minutes)
		.map_err(Error::Token)?;

	Ok(Json(model::Token {
		access_token,
		token_type: "bearer",
	}))
}

/// Get user
/// Returns the authenticated user.
#[route(tag = tag::AUTH)]
pub async fn get_me(session: Session) -> Json<model::User> {
	Json(session.user)
}
