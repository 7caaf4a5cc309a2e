use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures acquiring or driving the browser drawing surface.
#[derive(Debug, Error)]
pub enum GraphViewError {
	#[error("no browser window available")]
	NoWindow,
	#[error("canvas has no 2d rendering context")]
	NoContext,
	#[error("DOM call failed: {0}")]
	Dom(String),
}

impl From<JsValue> for GraphViewError {
	fn from(value: JsValue) -> Self {
		Self::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
