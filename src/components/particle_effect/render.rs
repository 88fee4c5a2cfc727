//! Canvas drawing for the particle effect.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::config::TextureStyle;
use super::error::EffectError;
use super::simulation::Sprite;
use super::texture::ParticleTexture;

/// Drawing target for one engine instance.
pub trait Surface {
	/// Clears the whole surface.
	fn clear(&mut self);
	/// Blits the particle sprite into the square `size` around `(x, y)`.
	fn draw(&mut self, sprite: &Sprite);
}

/// Draws sprites onto an HTML canvas using the pooled texture.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	texture: ParticleTexture,
}

impl CanvasSurface {
	/// Acquires the 2d context. The texture is built lazily on first draw.
	pub fn new(canvas: HtmlCanvasElement, style: TextureStyle) -> Result<Self, EffectError> {
		let document = canvas.owner_document().ok_or(EffectError::NoDocument)?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(|e| EffectError::js("get_context", e))?
			.ok_or(EffectError::NoContext)?
			.dyn_into()
			.map_err(|_| EffectError::NoContext)?;
		Ok(Self {
			canvas,
			ctx,
			texture: ParticleTexture::new(document, style),
		})
	}
}

impl Surface for CanvasSurface {
	fn clear(&mut self) {
		self.ctx.clear_rect(
			0.0,
			0.0,
			self.canvas.width() as f64,
			self.canvas.height() as f64,
		);
	}

	fn draw(&mut self, sprite: &Sprite) {
		let Some(texture) = self.texture.get() else {
			return;
		};
		self.ctx.save();
		self.ctx.set_global_alpha(sprite.opacity);
		let _ = self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
			texture,
			sprite.x - sprite.size,
			sprite.y - sprite.size,
			sprite.size * 2.0,
			sprite.size * 2.0,
		);
		self.ctx.restore();
	}
}
