use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures that stop the tree from rendering at all.
///
/// Per-connector problems (missing cards, coincident anchors) are not errors;
/// they skip the connector and the rest of the chart keeps drawing.
#[derive(Debug, Error)]
pub enum TreeError {
	#[error("no browser window available")]
	NoWindow,
	#[error("2d rendering context unavailable")]
	ContextUnavailable,
	#[error("invalid family data: {0}")]
	Data(#[from] serde_json::Error),
	#[error("browser call failed: {0}")]
	Js(String),
}

impl TreeError {
	pub fn js(value: JsValue) -> Self {
		TreeError::Js(
			value
				.as_string()
				.unwrap_or_else(|| format!("{value:?}")),
		)
	}
}
