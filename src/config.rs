/// Immutable process configuration, read from the environment once at startup.
///
/// Shared through [`crate::State`] rather than a global so that handlers and
/// tests receive it explicitly.
#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub port: u16,
	/// HMAC secret for signing access tokens.
	pub secret_key: String,
	/// Lifetime of an issued access token.
	pub token_expire_minutes: i64,
}

impl Config {
	/// Reads the configuration from the environment.
	///
	/// `DATABASE_URL` and `SECRET_KEY` are required; `PORT` and
	/// `ACCESS_TOKEN_EXPIRE_MINUTES` fall back to defaults.
	pub fn from_env() -> Self {
		Self {
			database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
			port: std::env::var("PORT").map_or_else(
				|_| 3000,
				|port| port.parse().expect("PORT must be a number"),
			),
			secret_key: std::env::var("SECRET_KEY").expect("SECRET_KEY must be set"),
			token_expire_minutes: std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES").map_or_else(
				|_| 30,
				|minutes| {
					minutes
						.parse()
						.expect("ACCESS_TOKEN_EXPIRE_MINUTES must be a number")
				},
			),
		}
	}
}
