//! Value types shared by the particle engine: modes, geometry, and particles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trajectory algorithm applied to every live particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectMode {
	/// Inward vortex: particles orbit while the radius collapses to 5%.
	#[default]
	Spiral,
	/// Straight radial motion towards the anchor.
	Pull,
	/// Straight radial motion away from the anchor.
	Push,
	/// Directional drift away from the outline of the perimeter target.
	Linear,
	/// Effect disabled; no surface, no timers.
	None,
}

impl EffectMode {
	/// Whether this mode runs the engine at all.
	pub fn is_active(self) -> bool {
		self != EffectMode::None
	}

	/// Whether spawns are distributed along the perimeter target.
	pub fn uses_perimeter(self) -> bool {
		self == EffectMode::Linear
	}

	/// Stable lowercase name, matching the serde representation.
	pub fn as_str(self) -> &'static str {
		match self {
			EffectMode::Spiral => "spiral",
			EffectMode::Pull => "pull",
			EffectMode::Push => "push",
			EffectMode::Linear => "linear",
			EffectMode::None => "none",
		}
	}
}

impl fmt::Display for EffectMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Returned when parsing an unknown mode name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown particle mode `{0}`")]
pub struct UnknownMode(pub String);

impl FromStr for EffectMode {
	type Err = UnknownMode;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"spiral" => Ok(EffectMode::Spiral),
			"pull" => Ok(EffectMode::Pull),
			"push" => Ok(EffectMode::Push),
			"linear" => Ok(EffectMode::Linear),
			"none" | "off" => Ok(EffectMode::None),
			_ => Err(UnknownMode(s.to_string())),
		}
	}
}

/// Host-side mode selection: click-to-cycle plus an on/off toggle that
/// remembers the last active mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeCycle {
	current: EffectMode,
	last_active: EffectMode,
}

impl Default for ModeCycle {
	fn default() -> Self {
		Self::new(EffectMode::Spiral)
	}
}

impl ModeCycle {
	/// Starts in `initial`. An inactive initial mode remembers `Spiral`.
	pub fn new(initial: EffectMode) -> Self {
		let last_active = if initial.is_active() {
			initial
		} else {
			EffectMode::Spiral
		};
		Self {
			current: initial,
			last_active,
		}
	}

	/// Mode currently shown.
	pub fn current(&self) -> EffectMode {
		self.current
	}

	/// Advances spiral → pull → push → spiral. When off, restores the last
	/// active mode instead.
	pub fn cycle(&mut self) -> EffectMode {
		self.current = match self.current {
			EffectMode::None => self.last_active,
			EffectMode::Spiral => EffectMode::Pull,
			EffectMode::Pull => EffectMode::Push,
			EffectMode::Push | EffectMode::Linear => EffectMode::Spiral,
		};
		self.last_active = self.current;
		self.current
	}

	/// Switches the effect off, or back on to the last active mode.
	pub fn toggle(&mut self) -> EffectMode {
		if self.current.is_active() {
			self.last_active = self.current;
			self.current = EffectMode::None;
		} else {
			self.current = self.last_active;
		}
		self.current
	}
}

/// A point in surface (canvas backing-store) pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
}

impl Point {
	/// Creates a point.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Point at `distance` along `angle` (radians, canvas y-down) from `self`.
	pub fn polar_offset(self, angle: f64, distance: f64) -> Self {
		Self {
			x: self.x + angle.cos() * distance,
			y: self.y + angle.sin() * distance,
		}
	}
}

/// Axis-aligned rectangle, as reported by `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
	/// Left edge.
	pub left: f64,
	/// Top edge.
	pub top: f64,
	/// Width, never negative for a laid-out box.
	pub width: f64,
	/// Height.
	pub height: f64,
}

impl Rect {
	/// Creates a rectangle from its top-left corner and size.
	pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
		Self {
			left,
			top,
			width,
			height,
		}
	}

	/// Right edge.
	pub fn right(&self) -> f64 {
		self.left + self.width
	}

	/// Bottom edge.
	pub fn bottom(&self) -> f64 {
		self.top + self.height
	}

	/// True when the rectangle covers no area.
	pub fn is_empty(&self) -> bool {
		!(self.width > 0.0 && self.height > 0.0)
	}
}

/// Drift direction of a perimeter-spawned particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Direction {
	/// Upwards, from the top edge.
	Up,
	/// Downwards, from the bottom edge.
	Down,
	/// Leftwards, from the left edge.
	Left,
	/// Rightwards, from the right edge.
	Right,
	/// Diagonal up and left.
	UpLeft,
	/// Diagonal up and right.
	UpRight,
	/// Diagonal down and left.
	DownLeft,
	/// Diagonal down and right.
	DownRight,
	/// Radial drift away from a rounded corner. The angle is the outward
	/// normal measured counter-clockwise with y pointing up.
	Corner(f64),
}

/// Absolute spawn location used by perimeter spawning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Origin {
	/// Spawn position in surface pixels.
	pub point: Point,
	/// Drift direction.
	pub direction: Direction,
}

/// One short-lived sprite.
///
/// Records are never mutated after creation; every frame derives position,
/// size and opacity from the creation-time fields and the current clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
	/// Phase in radians (golden-angle sequence).
	pub start_angle: f64,
	/// Initial radial offset from the anchor, surface pixels.
	pub start_distance: f64,
	/// Angular speed for spiral mode, radians per normalized duration unit.
	pub orbital_speed: f64,
	/// Lifetime in seconds.
	pub duration: f64,
	/// Animation-clock timestamp at creation, milliseconds.
	pub start_time: f64,
	/// Peak opacity.
	pub blackness: f64,
	/// Multiplier on the base sprite size.
	pub size: f64,
	/// Set only for perimeter spawns.
	pub origin: Option<Origin>,
}

impl Default for Particle {
	fn default() -> Self {
		Self {
			start_angle: 0.0,
			start_distance: 0.0,
			orbital_speed: 0.0,
			duration: 1.0,
			start_time: 0.0,
			blackness: 1.0,
			size: 1.0,
			origin: None,
		}
	}
}

impl Particle {
	/// Lifetime in milliseconds.
	pub fn lifetime_ms(&self) -> f64 {
		self.duration * 1000.0
	}
}
