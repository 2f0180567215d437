use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn ten() -> i64 {
	10
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ListParams {
	/// The maximum number of items to return.
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "ten")]
	pub limit: i64,
	/// The number of items to skip over before returning any.
	#[validate(range(min = 0))]
	#[serde(default)]
	pub skip: i64,
	/// Case-sensitive substring filter on the title; empty matches all.
	#[serde(default)]
	pub search: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct IdInput {
	pub id: i32,
}
