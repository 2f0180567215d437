use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A single user.
///
/// Use this when fetching from the database and returning to the client.
/// The password hash is never serialized.
#[derive(Debug, Serialize, FromRow, JsonSchema)]
pub struct User {
	/// The unique identifier of the user.
	pub id: i32,
	/// The user's primary email address, used for logging in.
	pub email: String,
	/// The argon2 hash of the password, in PHC string format.
	#[serde(skip)]
	pub password: String,
	/// An optional contact phone number.
	pub phone_number: Option<String>,
	/// The creation time of the user.
	pub created_at: DateTime<Utc>,
}

/// A successfully issued access token.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Token {
	pub access_token: String,
	pub token_type: &'static str,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct RegisterInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
	pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8, max = 128))]
	pub password: String,
}
