use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

/// A vote cast or withdrawal request. `dir` is 1 to cast the requester's
/// vote on the post and 0 to withdraw it.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct VoteInput {
	pub post_id: i32,
	#[validate(range(min = 0, max = 1))]
	pub dir: i16,
}
