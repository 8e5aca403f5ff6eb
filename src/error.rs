//! Crate-wide error type.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors surfaced by graph generation and the browser glue around it.
#[derive(Debug, Error)]
pub enum Error {
	#[error("no OpenAI API key has been saved")]
	MissingApiKey,

	#[error("OpenAI API error ({status}): {body}")]
	Api { status: u16, body: String },

	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("invalid model response: {0}")]
	InvalidResponse(String),

	#[error("browser error: {0}")]
	Browser(String),
}

impl From<JsValue> for Error {
	fn from(value: JsValue) -> Self {
		Self::Browser(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
