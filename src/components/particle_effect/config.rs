//! Tunable parameters for the particle effect.
//!
//! Every constant the engine uses lives here, grouped by the stage that reads
//! it. `Default` reproduces the site's look; hosts may override any subset
//! through serde (missing fields fall back to their defaults).
//!
//! # Units
//!
//! - Times on the animation clock are milliseconds, particle lifetimes are
//!   seconds.
//! - Distances and sprite sizes are surface pixels before the anchor's size
//!   scale is applied.

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	#[serde(default = "opaque")]
	/// Alpha, 0 to 1.
	pub a: f64,
}

fn opaque() -> f64 {
	1.0
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Same color with alpha `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Always emits functional notation so gradient stops keep their alpha.
	pub fn to_css(self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Spawn cadence and randomized initial kinematics.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawnStyle {
	/// Interval used until the first resample, ms.
	pub initial_interval: f64,
	/// Range the interval is re-rolled from, ms.
	pub interval_range: (f64, f64),
	/// Wall-clock period of the interval resampler, ms.
	pub resample_period: i32,
	/// Start distance range before size scaling.
	pub distance_range: (f64, f64),
	/// Sprite size multiplier at the near and far end of `distance_range`.
	pub size_range: (f64, f64),
	/// Spiral angular speed range.
	pub orbital_speed_range: (f64, f64),
	/// Lifetime range, seconds.
	pub duration_range: (f64, f64),
	/// Peak opacity range.
	pub blackness_range: (f64, f64),
	/// Viewports narrower than this count as mobile.
	pub mobile_breakpoint: f64,
	/// Distance multiplier on mobile viewports.
	pub mobile_distance_scale: f64,
}

impl Default for SpawnStyle {
	fn default() -> Self {
		Self {
			initial_interval: 3.0,
			interval_range: (10.0, 20.0),
			resample_period: 200,
			distance_range: (100.0, 200.0),
			size_range: (0.5, 2.5),
			orbital_speed_range: (5.0, 8.0),
			duration_range: (2.0, 4.0),
			blackness_range: (0.7, 1.0),
			mobile_breakpoint: 768.0,
			mobile_distance_scale: 0.5,
		}
	}
}

/// Per-frame trajectory, size and opacity shaping.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpriteStyle {
	/// Half-extent of the blit for a size multiplier of 1.
	pub base_size: f64,
	/// Scale at progress 0 and 1 for every mode but push.
	pub shrink: (f64, f64),
	/// Scale at progress 0 and 1 for push.
	pub grow: (f64, f64),
	/// Progress at which fade-in completes.
	pub fade_in_end: f64,
	/// Progress at which fade-out begins.
	pub fade_out_start: f64,
	/// Fraction of the start distance remaining at the end of a spiral.
	pub spiral_end_distance: f64,
	/// Divides `orbital_speed * duration` to give the total spiral rotation.
	pub spiral_rotation_divisor: f64,
	/// Full drift length of linear mode.
	pub drift_distance: f64,
	/// Lateral wobble amplitude of linear mode.
	pub drift_wobble: f64,
}

impl Default for SpriteStyle {
	fn default() -> Self {
		Self {
			base_size: 20.0,
			shrink: (2.0, 0.15),
			grow: (0.2, 2.0),
			fade_in_end: 0.1,
			fade_out_start: 0.85,
			spiral_end_distance: 0.05,
			spiral_rotation_divisor: 7.0,
			drift_distance: 150.0,
			drift_wobble: 30.0,
		}
	}
}

/// How the anchor point is derived from the tracked glyph.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnchorStyle {
	/// Glyph height giving a size scale of 1 (10rem at a 16px root).
	pub reference_height: f64,
	/// Extra re-measure this long after web fonts report ready, ms.
	pub relayout_delay: i32,
}

impl Default for AnchorStyle {
	fn default() -> Self {
		Self {
			reference_height: 160.0,
			relayout_delay: 100,
		}
	}
}

/// Rounded-rectangle outline used by linear mode.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PerimeterStyle {
	/// Corner radius as a fraction of the target height.
	pub corner_radius_ratio: f64,
	/// Density of corner arcs relative to straight edges.
	pub corner_weight: f64,
	/// Particles created per spawn event.
	pub batch: usize,
	/// Vertical position of the top edge line, fraction of height.
	pub top_inset: f64,
	/// Vertical position of the bottom edge line, fraction of height.
	pub bottom_inset: f64,
}

impl Default for PerimeterStyle {
	fn default() -> Self {
		Self {
			corner_radius_ratio: 0.15,
			corner_weight: 2.0,
			batch: 12,
			top_inset: 0.25,
			bottom_inset: 0.75,
		}
	}
}

/// One radial gradient stop of the particle texture.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct GradientStop {
	/// Position along the radius, 0 to 1.
	pub offset: f64,
	/// Alpha of `color` at this stop.
	pub alpha: f64,
}

impl GradientStop {
	/// Creates a stop.
	pub const fn new(offset: f64, alpha: f64) -> Self {
		Self { offset, alpha }
	}
}

/// The pre-rendered soft sprite shared by every particle.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextureStyle {
	/// Edge of the square raster, pixels.
	pub size: u32,
	/// Gradient radius, pixels.
	pub radius: f64,
	/// Base color; stops only vary its alpha.
	pub color: Color,
	/// Gradient stops, in any order.
	pub stops: Vec<GradientStop>,
}

impl Default for TextureStyle {
	fn default() -> Self {
		Self {
			size: 60,
			radius: 16.0,
			color: Color::rgb(0, 0, 0),
			stops: vec![
				GradientStop::new(0.0, 1.0),
				GradientStop::new(0.15, 1.0),
				GradientStop::new(0.35, 0.7),
				GradientStop::new(0.6, 0.3),
				GradientStop::new(0.85, 0.1),
				GradientStop::new(1.0, 0.0),
			],
		}
	}
}

impl TextureStyle {
	/// Centre of the raster, which is also the gradient centre.
	pub fn center(&self) -> f64 {
		self.size as f64 / 2.0
	}

	/// Stops clamped to `[0, 1]` and sorted by offset, as the canvas API
	/// rejects out-of-range offsets.
	pub fn sorted_stops(&self) -> Vec<GradientStop> {
		let mut stops: Vec<GradientStop> = self
			.stops
			.iter()
			.map(|s| GradientStop::new(s.offset.clamp(0.0, 1.0), s.alpha.clamp(0.0, 1.0)))
			.collect();
		stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
		stops
	}
}

/// Complete configuration for one effect instance.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
	/// Spawn cadence and draws.
	pub spawn: SpawnStyle,
	/// Trajectory, size and opacity shaping.
	pub sprite: SpriteStyle,
	/// Anchor placement.
	pub anchor: AnchorStyle,
	/// Perimeter outline for linear mode.
	pub perimeter: PerimeterStyle,
	/// Particle sprite raster.
	pub texture: TextureStyle,
}

impl EffectConfig {
	/// Parses a JSON override; absent fields keep their defaults.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let config =
			EffectConfig::from_json(r#"{ "spawn": { "mobile_breakpoint": 600 } }"#).unwrap();
		assert_eq!(config.spawn.mobile_breakpoint, 600.0);
		assert_eq!(config.spawn.interval_range, (10.0, 20.0));
		assert_eq!(config.perimeter, PerimeterStyle::default());
	}

	#[test]
	fn ranges_parse_from_arrays() {
		let config =
			EffectConfig::from_json(r#"{ "spawn": { "duration_range": [1, 1.5] } }"#).unwrap();
		assert_eq!(config.spawn.duration_range, (1.0, 1.5));
	}

	#[test]
	fn default_texture_has_smooth_falloff() {
		let style = TextureStyle::default();
		let stops = style.sorted_stops();
		assert!(stops.len() >= 5);
		assert_eq!(stops.first().map(|s| s.alpha), Some(1.0));
		assert_eq!(stops.last().map(|s| s.alpha), Some(0.0));
		assert!(stops.windows(2).all(|w| w[0].alpha >= w[1].alpha));
	}

	#[test]
	fn stops_are_clamped_and_sorted() {
		let style = TextureStyle {
			stops: vec![GradientStop::new(1.4, 0.0), GradientStop::new(-0.2, 2.0)],
			..TextureStyle::default()
		};
		assert_eq!(
			style.sorted_stops(),
			vec![GradientStop::new(0.0, 1.0), GradientStop::new(1.0, 0.0)]
		);
	}

	#[test]
	fn color_css_keeps_alpha() {
		assert_eq!(Color::rgb(0, 0, 0).with_alpha(0.3).to_css(), "rgba(0, 0, 0, 0.3)");
	}
}
