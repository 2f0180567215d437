use std::borrow::Cow;

use aide::axum::{routing::post_with, ApiRouter};
use axum::http::StatusCode;
use serde_json::json;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(i32),
	#[error("already voted on post {0}")]
	AlreadyVoted(i32),
	#[error("no vote on post {0}")]
	VoteNotFound(i32),
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/", post_with(vote, vote_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) | Self::VoteNotFound(..) => StatusCode::NOT_FOUND,
			Self::AlreadyVoted(..) => StatusCode::CONFLICT,
		}
	}

	fn errors(&self) -> Vec<error::Message<'_>> {
		let (content, post) = match self {
			Self::UnknownPost(post) => ("unknown_post", post),
			Self::AlreadyVoted(post) => ("already_voted", post),
			Self::VoteNotFound(post) => ("vote_not_found", post),
		};

		vec![error::Message {
			content: content.into(),
			field: None,
			details: Some(Cow::Owned({
				let mut map = error::Map::new();
				map.insert("post".into(), json!(post));
				map
			})),
		}]
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_cast_and_withdraw_vote(pool: Database) {
		let app = app(pool).await;
		let (ids, _, voter) = seed_posts(&app).await;

		let cast = app
			.post("/votes")
			.authorization_bearer(&voter)
			.json(&json!({"post_id": ids[0], "dir": 1}))
			.await;

		assert_eq!(cast.status_code(), 201);

		let listed = app
			.get(&format!("/posts/{}", ids[0]))
			.authorization_bearer(&voter)
			.await;

		assert_eq!(listed.json::<serde_json::Value>()["votes"], 1);

		let withdraw = app
			.post("/votes")
			.authorization_bearer(&voter)
			.json(&json!({"post_id": ids[0], "dir": 0}))
			.await;

		assert_eq!(withdraw.status_code(), 204);

		let listed = app
			.get(&format!("/posts/{}", ids[0]))
			.authorization_bearer(&voter)
			.await;

		assert_eq!(listed.json::<serde_json::Value>()["votes"], 0);
	}

	#[sqlx::test]
	async fn test_double_cast_conflicts(pool: Database) {
		let app = app(pool).await;
		let (ids, _, voter) = seed_posts(&app).await;

		let first = app
			.post("/votes")
			.authorization_bearer(&voter)
			.json(&json!({"post_id": ids[0], "dir": 1}))
			.await;
		let second = app
			.post("/votes")
			.authorization_bearer(&voter)
			.json(&json!({"post_id": ids[0], "dir": 1}))
			.await;

		assert_eq!(first.status_code(), 201);
		assert_eq!(second.status_code(), 409);
	}

	#[sqlx::test]
	async fn test_withdraw_without_vote_not_found(pool: Database) {
		let app = app(pool).await;
		let (ids, _, voter) = seed_posts(&app).await;

		let response = app
			.post("/votes")
			.authorization_bearer(&voter)
			.json(&json!({"post_id": ids[0], "dir": 0}))
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_vote_on_unknown_post_not_found(pool: Database) {
		let app = app(pool).await;
		let (ids, _, voter) = seed_posts(&app).await;

		let response = app
			.post("/votes")
			.authorization_bearer(&voter)
			.json(&json!({"post_id": ids[3] + 100, "dir": 1}))
			.await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_vote_requires_authentication(pool: Database) {
		let app = app(pool).await;
		let (ids, _, _) = seed_posts(&app).await;

		let response = app
			.post("/votes")
			.json(&json!({"post_id": ids[0], "dir": 1}))
			.await;

		assert_eq!(response.status_code(), 401);
	}

	#[sqlx::test]
	async fn test_vote_direction_is_validated(pool: Database) {
		let app = app(pool).await;
		let (ids, _, voter) = seed_posts(&app).await;

		let response = app
			.post("/votes")
			.authorization_bearer(&voter)
			.json(&json!({"post_id": ids[0], "dir": 2}))
			.await;

		assert_eq!(response.status_code(), 422);
	}

	#[sqlx::test]
	async fn test_deleting_post_cascades_votes(pool: Database) {
		let app = app(pool.clone()).await;
		let (ids, owner, voter) = seed_posts(&app).await;

		let cast = app
			.post("/votes")
			.authorization_bearer(&voter)
			.json(&json!({"post_id": ids[0], "dir": 1}))
			.await;

		assert_eq!(cast.status_code(), 201);

		let delete = app
			.delete(&format!("/posts/{}", ids[0]))
			.authorization_bearer(&owner)
			.await;

		assert_eq!(delete.status_code(), 204);

		let votes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes")
			.fetch_one(&pool)
			.await
			.unwrap();

		assert_eq!(votes, 0);
	}
}
