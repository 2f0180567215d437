use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Path, Query, Session},
	openapi::tag,
	Database,
};

use super::{model, Error, RouteError};

const POST_OUT_COLUMNS: &str = "posts.*, COUNT(votes.post_id) AS votes";

/// List posts
/// Returns posts with their vote counts, filtered by a case-sensitive
/// substring match on the title, ordered by id ascending.
#[route(tag = tag::POST)]
pub async fn list_posts(
	State(database): State<Database>,
	_session: Session,
	Query(params): Query<model::ListParams>,
) -> Result<Json<Vec<model::PostOut>>, RouteError> {
	let posts = sqlx::query_as::<_, model::PostOut>(&format!(
		"SELECT {POST_OUT_COLUMNS} FROM posts \
		 LEFT JOIN votes ON votes.post_id = posts.id \
		 WHERE posts.title LIKE '%' || $1 || '%' \
		 GROUP BY posts.id ORDER BY posts.id \
		 LIMIT $2 OFFSET $3",
	))
	.bind(&params.search)
	.bind(params.limit)
	.bind(params.skip)
	.fetch_all(&database)
	.await?;

	Ok(Json(posts))
}

/// Get single post
/// Returns a single post with its vote count by its unique id.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(database): State<Database>,
	_session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::PostOut>, RouteError> {
	let post = sqlx::query_as::<_, model::PostOut>(&format!(
		"SELECT {POST_OUT_COLUMNS} FROM posts \
		 LEFT JOIN votes ON votes.post_id = posts.id \
		 WHERE posts.id = $1 GROUP BY posts.id",
	))
	.bind(path.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(post.ok_or(Error::UnknownPost(path.id))?))
}

/// Create post
/// Creates a new post owned by the authenticated user.
#[route(tag = tag::POST, response(status = 201, description = "Created successfully.", shape = "Json<model::Post>"))]
pub async fn create_post(
	State(database): State<Database>,
	session: Session,
	Json(input): Json<model::PostInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let post = sqlx::query_as::<_, model::Post>(
		"INSERT INTO posts (title, content, published, owner_id) \
		 VALUES ($1, $2, $3, $4) RETURNING *",
	)
	.bind(&input.title)
	.bind(&input.content)
	.bind(input.published)
	.bind(session.user.id)
	.fetch_one(&database)
	.await?;

	Ok((StatusCode::CREATED, Json(post)).into_response())
}

/// Update post
/// Replaces the content of an existing post. Only the owner may update it.
#[route(tag = tag::POST)]
pub async fn update_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::PostInput>,
) -> Result<Json<model::Post>, RouteError> {
	owned_by(&database, path.id, session.user.id).await?;

	let post = sqlx::query_as::<_, model::Post>(
		"UPDATE posts SET title = $1, content = $2, published = $3 \
		 WHERE id = $4 RETURNING *",
	)
	.bind(&input.title)
	.bind(&input.content)
	.bind(input.published)
	.bind(path.id)
	.fetch_one(&database)
	.await?;

	Ok(Json(post))
}

/// Delete post
/// Deletes an existing post and its votes. Only the owner may delete it.
#[route(tag = tag::POST, response(status = 204, description = "Deleted successfully."))]
pub async fn delete_post(
	State(database): State<Database>,
	session: Session,
	Path(path): Path<model::IdInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	owned_by(&database, path.id, session.user.id).await?;

	sqlx::query("DELETE FROM posts WHERE id = $1")
		.bind(path.id)
		.execute(&database)
		.await?;

	Ok(StatusCode::NO_CONTENT.into_response())
}

/// Checks that the post exists and is owned by `user_id`. Existence is
/// checked first, so a missing post is `NotFound` rather than `Forbidden`.
async fn owned_by(database: &Database, post_id: i32, user_id: i32) -> Result<(), RouteError> {
	let owner = sqlx::query_scalar::<_, i32>("SELECT owner_id FROM posts WHERE id = $1")
		.bind(post_id)
		.fetch_optional(database)
		.await?;

	let owner = owner.ok_or(Error::UnknownPost(post_id))?;

	if owner != user_id {
		return Err(Error::NotOwner(post_id).into());
	}

	Ok(())
}
