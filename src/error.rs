use std::borrow::Cow;

use axum::{
	body::Body,
	extract::rejection::{JsonRejection, PathRejection, QueryRejection},
	http::{Response, StatusCode},
	response::IntoResponse,
};
use axum_jsonschema::JsonSchemaRejection;
use schemars::JsonSchema;
use serde::Serialize;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message presented to the client.
///
/// `field` is set when the message concerns one input field,
/// `details` carries structured context (e.g. the offending id).
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	pub content: Cow<'a, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'a> {
	pub success: bool,
	pub errors: Vec<Message<'a>>,
}

/// Maps an error to the response status and messages sent to the client.
///
/// The messages are presented to the client, so they should not contain
/// sensitive information.
pub trait ErrorShape: std::fmt::Debug {
	fn status(&self) -> StatusCode;
	fn errors(&self) -> Vec<Message<'_>>;

	fn response(&self) -> Response<Body> {
		(
			self.status(),
			axum::Json(ErrorResponse {
				success: false,
				errors: self.errors(),
			}),
		)
			.into_response()
	}
}

/// Errors that can occur in any route: extraction, validation and database
/// failures. Route-specific errors wrap around this in [`RouteError`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] JsonRejection),
	#[error("json schema error: {0}")]
	Schema(String),
	#[error("query error: {0}")]
	Query(#[from] QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] PathRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl From<JsonSchemaRejection> for AppError {
	fn from(rejection: JsonSchemaRejection) -> Self {
		match rejection {
			JsonSchemaRejection::Json(rejection) => Self::Json(rejection),
			JsonSchemaRejection::Serde(error) => Self::Schema(error.to_string()),
			JsonSchemaRejection::Schema(..) => {
				Self::Schema("request body does not match the expected schema".into())
			}
		}
	}
}

impl ErrorShape for AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) | Self::Schema(..) | Self::Query(..)
			| Self::Path(..) => StatusCode::UNPROCESSABLE_ENTITY,
			Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn errors(&self) -> Vec<Message<'_>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors.iter().map(move |error| Message {
						content: Cow::Owned(error.to_string()),
						field: Some(Cow::Borrowed(field)),
						details: None,
					})
				})
				.collect(),
			Self::Json(rejection) => vec![Message {
				content: Cow::Owned(rejection.body_text()),
				field: None,
				details: None,
			}],
			Self::Schema(message) => vec![Message {
				content: Cow::Borrowed(message),
				field: None,
				details: None,
			}],
			Self::Query(rejection) => vec![Message {
				content: Cow::Owned(rejection.to_string()),
				field: None,
				details: None,
			}],
			Self::Path(rejection) => vec![Message {
				content: Cow::Owned(rejection.to_string()),
				field: None,
				details: None,
			}],
			// Do not leak database details to the client.
			Self::Database(..) => Vec::new(),
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		if let Self::Database(ref error) = self {
			tracing::error!(%error, "database error");
		}

		self.response()
	}
}

/// Error type for route handlers: either a route-specific error or an
/// application-level one. Both render through [`ErrorShape`].
#[derive(Debug)]
pub enum RouteError<T> {
	App(AppError),
	Route(T),
}

impl<T> From<AppError> for RouteError<T> {
	fn from(error: AppError) -> Self {
		Self::App(error)
	}
}

impl<T> From<sqlx::Error> for RouteError<T> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(AppError::Database(error))
	}
}

impl<T> From<validator::ValidationErrors> for RouteError<T> {
	fn from(errors: validator::ValidationErrors) -> Self {
		Self::App(AppError::Validation(errors))
	}
}

impl<T: ErrorShape> IntoResponse for RouteError<T> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => error.response(),
		}
	}
}

impl<T> aide::OperationOutput for RouteError<T> {
	type Inner = ();
}
