mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a new documentation function for the route, named after the original function with the suffix `_docs`.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates a new struct `XInput` for the model, holding the client-writable fields.
/// Fields with #[serde(skip_deserializing)] or #[serde(skip)] are server-assigned and
/// excluded; all other fields are included verbatim (including attributes), so the
/// same input shape serves create and full-replace update.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}
