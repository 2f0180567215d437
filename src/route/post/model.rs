pub use crate::route::model::{IdInput, ListParams};

use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn published() -> bool {
	true
}

/// A single post, created and owned by a user.
///
/// The generated [`PostInput`] carries the client-writable fields; it is
/// used both to create a post and to fully replace one on update.
#[model]
#[derive(Debug, Deserialize, Serialize, FromRow, JsonSchema, Validate)]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: i32,
	/// The user that owns the post.
	#[serde(skip_deserializing)]
	pub owner_id: i32,
	/// The title of the post.
	pub title: String,
	/// The content of the post.
	pub content: String,
	/// Whether the post is publicly visible.
	#[serde(default = "published")]
	pub published: bool,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
}

/// A post together with its vote count, as returned by the read endpoints.
#[derive(Debug, Serialize, FromRow, JsonSchema)]
pub struct PostOut {
	#[sqlx(flatten)]
	pub post: Post,
	pub votes: i64,
}

#[cfg(test)]
mod test {
	use super::PostInput;

	#[test]
	fn test_post_input_published_defaults_true() {
		let input: PostInput = serde_json::from_value(serde_json::json!({
			"title": "awesome pizza",
			"content": "this is awesome peporining",
		}))
		.unwrap();

		assert!(input.published);
	}

	#[test]
	fn test_post_input_requires_title_and_content() {
		for body in [
			serde_json::json!({"content": "this is awesome bbq"}),
			serde_json::json!({"title": "awesome pizza"}),
			serde_json::json!({"title": "awesome pizza", "content": null}),
		] {
			assert!(serde_json::from_value::<PostInput>(body).is_err());
		}
	}
}
