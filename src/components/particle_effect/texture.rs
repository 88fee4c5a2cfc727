//! Pre-rendered particle sprite.
//!
//! One soft radial gradient is rasterized per engine instance and every
//! particle is a scaled blit of it, instead of building a gradient per
//! particle per frame.

use std::cell::OnceCell;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::config::TextureStyle;
use super::error::EffectError;

/// Rasterizes the gradient sprite into a detached canvas.
pub fn rasterize(
	document: &Document,
	style: &TextureStyle,
) -> Result<HtmlCanvasElement, EffectError> {
	let canvas: HtmlCanvasElement = document
		.create_element("canvas")
		.map_err(|e| EffectError::js("create_element", e))?
		.dyn_into()
		.map_err(|_| EffectError::NoContext)?;
	canvas.set_width(style.size);
	canvas.set_height(style.size);

	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(|e| EffectError::js("get_context", e))?
		.ok_or(EffectError::NoContext)?
		.dyn_into()
		.map_err(|_| EffectError::NoContext)?;

	let center = style.center();
	let gradient = ctx
		.create_radial_gradient(center, center, 0.0, center, center, style.radius)
		.map_err(|e| EffectError::js("create_radial_gradient", e))?;
	for stop in style.sorted_stops() {
		gradient
			.add_color_stop(stop.offset as f32, &style.color.with_alpha(stop.alpha).to_css())
			.map_err(|e| EffectError::js("add_color_stop", e))?;
	}

	ctx.set_fill_style_canvas_gradient(&gradient);
	let edge = style.size as f64;
	ctx.fill_rect(0.0, 0.0, edge, edge);
	Ok(canvas)
}

/// Lazily built, then reused for the lifetime of its owner. A failed build
/// is remembered so it is attempted only once.
pub struct ParticleTexture {
	document: Document,
	style: TextureStyle,
	raster: OnceCell<Option<HtmlCanvasElement>>,
}

impl ParticleTexture {
	/// Defers rasterization until the first [`get`](Self::get).
	pub fn new(document: Document, style: TextureStyle) -> Self {
		Self {
			document,
			style,
			raster: OnceCell::new(),
		}
	}

	/// The sprite, built on first use.
	pub fn get(&self) -> Option<&HtmlCanvasElement> {
		self.raster
			.get_or_init(|| match rasterize(&self.document, &self.style) {
				Ok(canvas) => {
					debug!("particle texture built ({}px)", self.style.size);
					Some(canvas)
				}
				Err(e) => {
					warn!("particle texture unavailable: {e}");
					None
				}
			})
			.as_ref()
	}
}
