//! Layout measurement: where the tracked glyph and outline are on screen.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, Window};

use super::anchor::{AnchorMeasurement, SurfaceMapping, parse_letter_spacing};
use super::error::EffectError;
use super::types::Rect;

/// Outline target for perimeter spawning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerimeterMeasurement {
	/// Target box in viewport pixels.
	pub target: Rect,
	/// Conversion into surface pixels.
	pub mapping: SurfaceMapping,
}

/// Source of layout facts for the engine.
pub trait Layout {
	/// Tracked glyph plus surface mapping; `None` while the glyph is absent.
	fn measure_anchor(&self) -> Option<AnchorMeasurement>;
	/// Perimeter target; `None` when absent.
	fn measure_perimeter(&self) -> Option<PerimeterMeasurement>;
	/// Viewport width in CSS pixels.
	fn viewport_width(&self) -> f64;
}

/// Fixed layout, for hosts that position the effect themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticLayout {
	/// Glyph measurement, if the glyph is on the page.
	pub anchor: Option<AnchorMeasurement>,
	/// Outline measurement, if present.
	pub perimeter: Option<PerimeterMeasurement>,
	/// Viewport width in CSS pixels.
	pub viewport_width: f64,
}

impl Layout for StaticLayout {
	fn measure_anchor(&self) -> Option<AnchorMeasurement> {
		self.anchor
	}

	fn measure_perimeter(&self) -> Option<PerimeterMeasurement> {
		self.perimeter
	}

	fn viewport_width(&self) -> f64 {
		self.viewport_width
	}
}

fn element_rect(element: &Element) -> Rect {
	let r = element.get_bounding_client_rect();
	Rect::new(r.left(), r.top(), r.width(), r.height())
}

/// Measures the live document.
pub struct DomLayout {
	window: Window,
	document: Document,
	canvas: HtmlCanvasElement,
	anchor_selector: String,
	perimeter_selector: String,
}

impl DomLayout {
	/// Binds to the current window and the effect's canvas.
	pub fn new(
		canvas: HtmlCanvasElement,
		anchor_selector: impl Into<String>,
		perimeter_selector: impl Into<String>,
	) -> Result<Self, EffectError> {
		let window = web_sys::window().ok_or(EffectError::NoWindow)?;
		let document = window.document().ok_or(EffectError::NoDocument)?;
		Ok(Self {
			window,
			document,
			canvas,
			anchor_selector: anchor_selector.into(),
			perimeter_selector: perimeter_selector.into(),
		})
	}

	/// The document this layout measures.
	pub fn document(&self) -> &Document {
		&self.document
	}

	fn query(&self, selector: &str) -> Option<Element> {
		self.document.query_selector(selector).ok().flatten()
	}

	fn mapping(&self) -> Option<SurfaceMapping> {
		SurfaceMapping::new(
			element_rect(&self.canvas),
			self.canvas.width() as f64,
			self.canvas.height() as f64,
		)
	}

	/// Resizes the backing store to the canvas's CSS box.
	pub fn fit_surface(&self) {
		let rect = self.canvas.get_bounding_client_rect();
		self.canvas.set_width(rect.width().max(0.0) as u32);
		self.canvas.set_height(rect.height().max(0.0) as u32);
	}

	/// Publishes the shift as `--horizontal-shift` on the tracked glyph.
	pub fn apply_horizontal_shift(&self, shift: f64) -> Result<(), EffectError> {
		let Some(element) = self.query(&self.anchor_selector) else {
			return Ok(());
		};
		let Ok(element) = element.dyn_into::<HtmlElement>() else {
			return Ok(());
		};
		element
			.style()
			.set_property("--horizontal-shift", &format!("{shift}em"))
			.map_err(|e| EffectError::js("set_property", e))
	}

	fn letter_spacing(&self, element: &Element) -> f64 {
		self.window
			.get_computed_style(element)
			.ok()
			.flatten()
			.and_then(|style| style.get_property_value("letter-spacing").ok())
			.map_or(0.0, |value| parse_letter_spacing(&value))
	}
}

impl Layout for DomLayout {
	fn measure_anchor(&self) -> Option<AnchorMeasurement> {
		let glyph = self.query(&self.anchor_selector)?;
		Some(AnchorMeasurement {
			target: element_rect(&glyph),
			mapping: self.mapping()?,
			letter_spacing: self.letter_spacing(&glyph),
		})
	}

	fn measure_perimeter(&self) -> Option<PerimeterMeasurement> {
		let outline = self.query(&self.perimeter_selector)?;
		Some(PerimeterMeasurement {
			target: element_rect(&outline),
			mapping: self.mapping()?,
		})
	}

	fn viewport_width(&self) -> f64 {
		self.window
			.inner_width()
			.ok()
			.and_then(|w| w.as_f64())
			.unwrap_or(f64::INFINITY)
	}
}
