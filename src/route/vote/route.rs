use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Session},
	openapi::tag,
	Database,
};

use super::{model, Error, RouteError};

/// Cast or withdraw a vote
/// Casts the authenticated user's vote on a post when `dir` is 1, and
/// withdraws it when `dir` is 0. Each user holds at most one vote per post.
#[route(
	tag = tag::VOTE,
	response(status = 201, description = "Vote cast."),
	response(status = 204, description = "Vote withdrawn.")
)]
pub async fn vote(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::VoteInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let post = sqlx::query_scalar::<_, i32>("SELECT id FROM posts WHERE id = $1")
		.bind(input.post_id)
		.fetch_optional(&database)
		.await?;

	if post.is_none() {
		return Err(Error::UnknownPost(input.post_id).into());
	}

	let existing = sqlx::query_scalar::<_, i32>(
		"SELECT post_id FROM votes WHERE user_id = $1 AND post_id = $2",
	)
	.bind(session.user.id)
	.bind(input.post_id)
	.fetch_optional(&database)
	.await?;

	if input.dir == 1 {
		if existing.is_some() {
			return Err(Error::AlreadyVoted(input.post_id).into());
		}

		sqlx::query("INSERT INTO votes (user_id, post_id) VALUES ($1, $2)")
			.bind(session.user.id)
			.bind(input.post_id)
			.execute(&database)
			.await
			.map_err(|e| match e {
				// Two concurrent casts race past the check above; the
				// composite primary key settles it.
				sqlx::Error::Database(ref d) if d.constraint() == Some("votes_pkey") => {
					Error::AlreadyVoted(input.post_id).into()
				}
				e => RouteError::from(e),
			})?;

		Ok(StatusCode::CREATED.into_response())
	} else {
		if existing.is_none() {
			return Err(Error::VoteNotFound(input.post_id).into());
		}

		sqlx::query("DELETE FROM votes WHERE user_id = $1 AND post_id = $2")
			.bind(session.user.id)
			.bind(input.post_id)
			.execute(&database)
			.await?;

		Ok(StatusCode::NO_CONTENT.into_response())
	}
}
