//! Anchor tracking: maps the tracked glyph's box into surface pixels.
//!
//! The surface is sized in CSS pixels by the page but draws into its own
//! backing store, so every viewport coordinate goes through a
//! [`SurfaceMapping`] before it reaches the engine.

use super::config::AnchorStyle;
use super::types::{Point, Rect};

/// Viewport-to-surface coordinate conversion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceMapping {
	/// Surface bounding box in viewport (CSS) pixels.
	pub bounds: Rect,
	/// Backing-store pixels per CSS pixel, horizontally.
	pub scale_x: f64,
	/// Backing-store pixels per CSS pixel, vertically.
	pub scale_y: f64,
}

impl SurfaceMapping {
	/// Builds the mapping from the surface's CSS box and backing-store size.
	/// Returns `None` while the surface has no layout box.
	pub fn new(bounds: Rect, backing_width: f64, backing_height: f64) -> Option<Self> {
		if bounds.is_empty() {
			return None;
		}
		Some(Self {
			bounds,
			scale_x: backing_width / bounds.width,
			scale_y: backing_height / bounds.height,
		})
	}

	/// Identity mapping for a surface at the viewport origin.
	pub fn identity(width: f64, height: f64) -> Self {
		Self {
			bounds: Rect::new(0.0, 0.0, width, height),
			scale_x: 1.0,
			scale_y: 1.0,
		}
	}

	/// Converts a viewport point into surface pixels.
	pub fn to_surface(&self, x: f64, y: f64) -> Point {
		Point::new(
			(x - self.bounds.left) * self.scale_x,
			(y - self.bounds.top) * self.scale_y,
		)
	}
}

/// Raw layout facts needed to place the anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorMeasurement {
	/// Tracked glyph box in viewport pixels.
	pub target: Rect,
	/// Conversion into surface pixels.
	pub mapping: SurfaceMapping,
	/// Computed `letter-spacing` of the glyph, pixels.
	pub letter_spacing: f64,
}

/// Resolved anchor point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
	/// Visual centre of the glyph in surface pixels.
	pub point: Point,
	/// Glyph height relative to the reference height.
	pub size_scale: f64,
}

impl Anchor {
	/// Anchor at `point` with unit size scale.
	pub fn at(x: f64, y: f64) -> Self {
		Self {
			point: Point::new(x, y),
			size_scale: 1.0,
		}
	}
}

/// Computes the anchor for one measurement.
///
/// Letter-spacing is rendered after the glyph, so the visual centre sits half
/// the spacing to the left of the box centre. The horizontal shift follows
/// both the surface scale and the glyph size so it stays proportional when
/// the font size changes responsively.
pub fn locate(
	measurement: &AnchorMeasurement,
	style: &AnchorStyle,
	horizontal_shift: f64,
) -> Anchor {
	let target = measurement.target;
	let mapping = measurement.mapping;

	let size_scale = if style.reference_height > 0.0 {
		target.height / style.reference_height
	} else {
		1.0
	};

	let center_x = target.left + (target.width - measurement.letter_spacing) / 2.0;
	let center_y = target.top + target.height / 2.0;
	let mut point = mapping.to_surface(center_x, center_y);
	point.x += horizontal_shift * mapping.scale_x * size_scale;

	Anchor { point, size_scale }
}

/// Parses a computed `letter-spacing` value (`"10px"`, `"normal"`, ...).
pub fn parse_letter_spacing(value: &str) -> f64 {
	let value = value.trim();
	let number_end = value
		.char_indices()
		.find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0)))
		.map_or(value.len(), |(i, _)| i);
	value[..number_end]
		.parse::<f64>()
		.ok()
		.filter(|v| v.is_finite())
		.unwrap_or(0.0)
}

/// Holds the most recent anchor for an engine instance.
#[derive(Clone, Debug)]
pub struct AnchorTracker {
	style: AnchorStyle,
	horizontal_shift: f64,
	anchor: Option<Anchor>,
}

impl AnchorTracker {
	/// Creates a tracker with no anchor yet.
	pub fn new(style: AnchorStyle, horizontal_shift: f64) -> Self {
		Self {
			style,
			horizontal_shift,
			anchor: None,
		}
	}

	/// Current anchor, if the glyph has been found at least once.
	pub fn anchor(&self) -> Option<Anchor> {
		self.anchor
	}

	/// Size scale of the current anchor (1 before the first measurement).
	pub fn size_scale(&self) -> f64 {
		self.anchor.map_or(1.0, |a| a.size_scale)
	}

	/// Replaces the anchor from a fresh measurement. A missing measurement
	/// keeps whatever was last known.
	pub fn update(&mut self, measurement: Option<AnchorMeasurement>) -> Option<Anchor> {
		if let Some(m) = measurement {
			self.anchor = Some(locate(&m, &self.style, self.horizontal_shift));
		}
		self.anchor
	}

	/// Pins the anchor to a known point, bypassing measurement.
	pub fn set(&mut self, anchor: Anchor) {
		self.anchor = Some(anchor);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn centre_accounts_for_letter_spacing() {
		let m = AnchorMeasurement {
			target: Rect::new(100.0, 50.0, 90.0, 160.0),
			mapping: SurfaceMapping::identity(1000.0, 1000.0),
			letter_spacing: 10.0,
		};
		let anchor = locate(&m, &AnchorStyle::default(), 0.0);
		assert!(close(anchor.point.x, 140.0));
		assert!(close(anchor.point.y, 130.0));
		assert!(close(anchor.size_scale, 1.0));
	}

	#[test]
	fn maps_into_backing_store_pixels() {
		let mapping =
			SurfaceMapping::new(Rect::new(-200.0, -100.0, 600.0, 300.0), 1200.0, 600.0).unwrap();
		let m = AnchorMeasurement {
			target: Rect::new(0.0, 0.0, 80.0, 80.0),
			mapping,
			letter_spacing: 0.0,
		};
		let anchor = locate(&m, &AnchorStyle::default(), 0.0);
		assert!(close(anchor.point.x, (40.0 + 200.0) * 2.0));
		assert!(close(anchor.point.y, (40.0 + 100.0) * 2.0));
		assert!(close(anchor.size_scale, 0.5));
	}

	#[test]
	fn shift_scales_with_surface_and_glyph() {
		let mapping = SurfaceMapping::new(Rect::new(0.0, 0.0, 100.0, 100.0), 200.0, 200.0).unwrap();
		let m = AnchorMeasurement {
			target: Rect::new(0.0, 0.0, 80.0, 320.0),
			mapping,
			letter_spacing: 0.0,
		};
		let unshifted = locate(&m, &AnchorStyle::default(), 0.0);
		let shifted = locate(&m, &AnchorStyle::default(), -0.075);
		assert!(close(shifted.point.x - unshifted.point.x, -0.075 * 2.0 * 2.0));
	}

	#[test]
	fn zero_area_surface_has_no_mapping() {
		assert!(SurfaceMapping::new(Rect::new(0.0, 0.0, 0.0, 100.0), 0.0, 100.0).is_none());
	}

	#[test]
	fn tracker_keeps_last_anchor_when_glyph_missing() {
		let mut tracker = AnchorTracker::new(AnchorStyle::default(), 0.0);
		assert!(tracker.update(None).is_none());
		assert_eq!(tracker.size_scale(), 1.0);

		tracker.set(Anchor::at(10.0, 20.0));
		assert_eq!(tracker.update(None), Some(Anchor::at(10.0, 20.0)));
	}

	#[test]
	fn parses_css_lengths() {
		assert_eq!(parse_letter_spacing("10px"), 10.0);
		assert_eq!(parse_letter_spacing(" -1.5px"), -1.5);
		assert_eq!(parse_letter_spacing("normal"), 0.0);
		assert_eq!(parse_letter_spacing(""), 0.0);
	}
}
