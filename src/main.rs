#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod migrate;
mod openapi;
mod route;
mod token;

use std::sync::Arc;

use aide::openapi::OpenApi;
use argon2::Argon2;
use axum::{Extension, ServiceExt};
use tower::Layer;
use tower_http::{cors::CorsLayer, normalize_path::NormalizePathLayer, trace::TraceLayer};

use config::Config;
pub use error::AppError;

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the database connection pool, the hash configuration and the
/// token keys (both expensive to derive per request), and the process
/// configuration.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub keys: token::Keys,
	pub config: Arc<Config>,
}

/// Builds the application router over the given state.
pub fn router(state: State) -> axum::Router {
	let mut api = OpenApi::default();

	aide::axum::ApiRouter::new()
		.nest("/auth", route::auth::routes())
		.nest("/posts", route::post::routes())
		.nest("/votes", route::vote::routes())
		.nest_api_service("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
		.with_state(state)
}

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt::init();
	dotenvy::dotenv().ok();

	let config = Arc::new(Config::from_env());

	let state = State {
		database: Database::connect(&config.database_url)
			.await
			.expect("failed to connect to database"),
		hasher: Argon2::default(),
		keys: token::Keys::new(config.secret_key.as_bytes()),
		config: Arc::clone(&config),
	};

	migrate::to_head(&state.database)
		.await
		.expect("failed to bring the schema to head");

	let app = NormalizePathLayer::trim_trailing_slash().layer(router(state));

	let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", config.port);

	axum::serve(
		listener,
		ServiceExt::<axum::extract::Request>::into_make_service(app),
	)
	.await
	.unwrap();
}
