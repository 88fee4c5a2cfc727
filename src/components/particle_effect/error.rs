//! Errors raised while wiring the effect into the page.
//!
//! None of these reach the host: the component logs them and leaves the
//! glyph without animation.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures from the browser plumbing around the engine.
#[derive(Debug, Error)]
pub enum EffectError {
	/// No `window` (not running in a browser main thread).
	#[error("no global window")]
	NoWindow,

	/// The window has no document.
	#[error("window has no document")]
	NoDocument,

	/// The canvas refused a 2d context.
	#[error("2d context unavailable")]
	NoContext,

	/// A timer was requested after its callback had been dropped.
	#[error("{0} callback already released")]
	Released(&'static str),

	/// A DOM or timer call threw.
	#[error("{call} failed: {message}")]
	Js {
		/// Name of the call that threw.
		call: &'static str,
		/// Stringified JS exception.
		message: String,
	},
}

impl EffectError {
	/// Wraps a thrown JS value, keeping the name of the call that threw.
	pub fn js(call: &'static str, value: JsValue) -> Self {
		let message = value
			.as_string()
			.unwrap_or_else(|| format!("{value:?}"));
		EffectError::Js { call, message }
	}
}
