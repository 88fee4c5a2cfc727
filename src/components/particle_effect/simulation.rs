//! Per-frame particle kinematics.
//!
//! Everything here is a pure function of the particle record, the anchor and
//! the current clock, so a particle can be sampled at any instant without
//! replaying earlier frames.

use std::f64::consts::FRAC_1_SQRT_2;

use super::anchor::Anchor;
use super::config::SpriteStyle;
use super::types::{Direction, EffectMode, Particle, Point};

/// Derived draw parameters for one particle in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
	/// Centre in surface pixels.
	pub x: f64,
	/// Centre in surface pixels.
	pub y: f64,
	/// Half-extent of the blit square.
	pub size: f64,
	/// Global alpha for the blit.
	pub opacity: f64,
}

/// Outcome of advancing one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
	/// Still alive; draw this sprite.
	Alive(Sprite),
	/// Past its lifetime; remove.
	Expired,
}

/// Normalized age in `[0, 1]`; 1 means expired.
pub fn progress(particle: &Particle, now: f64) -> f64 {
	let lifetime = particle.lifetime_ms();
	if lifetime <= 0.0 {
		return 1.0;
	}
	((now - particle.start_time) / lifetime).clamp(0.0, 1.0)
}

/// Three-segment opacity envelope: linear fade-in, hold at `blackness`,
/// linear fade-out.
pub fn opacity(progress: f64, blackness: f64, style: &SpriteStyle) -> f64 {
	if progress < style.fade_in_end {
		blackness * progress / style.fade_in_end
	} else if progress < style.fade_out_start {
		blackness
	} else {
		let fade = (progress - style.fade_out_start) / (1.0 - style.fade_out_start);
		(blackness * (1.0 - fade)).max(0.0)
	}
}

/// Distance from the anchor for the radial modes.
pub fn radial_distance(
	mode: EffectMode,
	start_distance: f64,
	progress: f64,
	style: &SpriteStyle,
) -> f64 {
	match mode {
		EffectMode::Spiral => start_distance * (1.0 - progress * (1.0 - style.spiral_end_distance)),
		EffectMode::Push => start_distance * progress,
		_ => start_distance * (1.0 - progress),
	}
}

/// Sprite scale factor before the per-particle size and anchor scale.
pub fn sprite_scale(mode: EffectMode, progress: f64, style: &SpriteStyle) -> f64 {
	let (from, to) = if mode == EffectMode::Push {
		style.grow
	} else {
		style.shrink
	};
	from + (to - from) * progress
}

/// Position of a particle at `progress`.
pub fn position(
	particle: &Particle,
	center: Point,
	mode: EffectMode,
	progress: f64,
	style: &SpriteStyle,
) -> Point {
	match mode {
		EffectMode::Spiral => {
			let turns = particle.duration / style.spiral_rotation_divisor;
			let rotation = particle.orbital_speed * turns;
			let angle = particle.start_angle - rotation * progress;
			let distance = radial_distance(mode, particle.start_distance, progress, style);
			center.polar_offset(angle, distance)
		}
		EffectMode::Pull | EffectMode::Push => {
			let distance = radial_distance(mode, particle.start_distance, progress, style);
			center.polar_offset(particle.start_angle, distance)
		}
		EffectMode::Linear | EffectMode::None => match particle.origin {
			Some(origin) => {
				let (dx, dy) = drift(origin.direction, particle.start_angle, progress, style);
				Point::new(origin.point.x + dx, origin.point.y + dy)
			}
			None => center,
		},
	}
}

/// Linear-mode displacement. Cardinal directions wobble sideways with the
/// particle's phase; corners follow their outward normal.
fn drift(direction: Direction, phase: f64, progress: f64, style: &SpriteStyle) -> (f64, f64) {
	let amount = style.drift_distance * progress;
	let wobble = phase.sin() * style.drift_wobble * progress;
	let diagonal = amount * FRAC_1_SQRT_2;
	match direction {
		Direction::Up => (wobble, -amount),
		Direction::Down => (wobble, amount),
		Direction::Left => (-amount, wobble),
		Direction::Right => (amount, wobble),
		Direction::UpLeft => (-diagonal, -diagonal),
		Direction::UpRight => (diagonal, -diagonal),
		Direction::DownLeft => (-diagonal, diagonal),
		Direction::DownRight => (diagonal, diagonal),
		Direction::Corner(normal) => (normal.cos() * amount, -normal.sin() * amount),
	}
}

/// Advances one particle to `now`.
pub fn step(
	particle: &Particle,
	anchor: &Anchor,
	now: f64,
	mode: EffectMode,
	style: &SpriteStyle,
) -> Step {
	let p = progress(particle, now);
	if p >= 1.0 {
		return Step::Expired;
	}

	let at = position(particle, anchor.point, mode, p, style);
	let size = style.base_size * particle.size * sprite_scale(mode, p, style) * anchor.size_scale;

	Step::Alive(Sprite {
		x: at.x,
		y: at.y,
		size,
		opacity: opacity(p, particle.blackness, style),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_effect::types::Origin;
	use std::f64::consts::FRAC_PI_2;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	fn particle() -> Particle {
		Particle {
			start_angle: 0.0,
			start_distance: 100.0,
			orbital_speed: 6.0,
			duration: 2.0,
			start_time: 0.0,
			blackness: 0.8,
			size: 1.0,
			origin: None,
		}
	}

	#[test]
	fn opacity_envelope() {
		let style = SpriteStyle::default();
		let b = 0.8;
		assert!(close(opacity(0.0, b, &style), 0.0));
		assert!(close(opacity(0.05, b, &style), 0.5 * b));
		assert!(close(opacity(0.5, b, &style), b));
		assert!(close(opacity(0.925, b, &style), 0.5 * b));
		assert!(close(opacity(1.0, b, &style), 0.0));
	}

	#[test]
	fn progress_is_clamped() {
		let p = particle();
		assert_eq!(progress(&p, -500.0), 0.0);
		assert_eq!(progress(&p, 1000.0), 0.5);
		assert_eq!(progress(&p, 10_000.0), 1.0);
	}

	#[test]
	fn spiral_distance_decreases_to_five_percent() {
		let style = SpriteStyle::default();
		let mut previous = f64::INFINITY;
		for i in 0..1000 {
			let p = i as f64 / 1000.0;
			let d = radial_distance(EffectMode::Spiral, 100.0, p, &style);
			assert!(d < previous);
			previous = d;
		}
		assert!(close(radial_distance(EffectMode::Spiral, 100.0, 1.0, &style), 5.0));
	}

	#[test]
	fn spiral_rotates_clockwise_in_angle() {
		let style = SpriteStyle::default();
		let p = particle();
		let at = position(&p, Point::default(), EffectMode::Spiral, 0.5, &style);
		let expected_angle = -6.0 * (2.0 / 7.0) * 0.5;
		assert!(close(at.y.atan2(at.x), expected_angle));
		assert!(close(at.x.hypot(at.y), 100.0 * (1.0 - 0.5 * 0.95)));
	}

	#[test]
	fn pull_mirrors_push() {
		let style = SpriteStyle::default();
		for i in 0..=20 {
			let p = i as f64 / 20.0;
			let pull = radial_distance(EffectMode::Pull, 80.0, p, &style);
			let push = radial_distance(EffectMode::Push, 80.0, 1.0 - p, &style);
			assert!(close(pull, push));
		}
	}

	#[test]
	fn push_grows_while_others_shrink() {
		let style = SpriteStyle::default();
		assert!(close(sprite_scale(EffectMode::Push, 0.0, &style), 0.2));
		assert!(close(sprite_scale(EffectMode::Push, 1.0, &style), 2.0));
		assert!(close(sprite_scale(EffectMode::Pull, 0.0, &style), 2.0));
		assert!(close(sprite_scale(EffectMode::Spiral, 1.0, &style), 0.15));
	}

	#[test]
	fn linear_drift_by_direction() {
		let style = SpriteStyle::default();
		let origin = |direction| Particle {
			origin: Some(Origin {
				point: Point::new(10.0, 10.0),
				direction,
			}),
			..particle()
		};

		let linear = EffectMode::Linear;
		let up = position(&origin(Direction::Up), Point::default(), linear, 1.0, &style);
		assert!(close(up.x, 10.0));
		assert!(close(up.y, -140.0));

		let corner = position(
			&origin(Direction::Corner(FRAC_PI_2)),
			Point::default(),
			EffectMode::Linear,
			0.5,
			&style,
		);
		assert!(close(corner.x, 10.0));
		assert!(close(corner.y, 10.0 - 75.0));

		let diagonal =
			position(&origin(Direction::DownRight), Point::default(), linear, 1.0, &style);
		assert!(close(diagonal.x - 10.0, 150.0 * FRAC_1_SQRT_2));
		assert!(close(diagonal.y - 10.0, 150.0 * FRAC_1_SQRT_2));
	}

	#[test]
	fn linear_without_origin_sits_on_anchor() {
		let style = SpriteStyle::default();
		let at = position(&particle(), Point::new(3.0, 4.0), EffectMode::Linear, 0.7, &style);
		assert_eq!(at, Point::new(3.0, 4.0));
	}

	#[test]
	fn step_scales_size_with_anchor() {
		let style = SpriteStyle::default();
		let anchor = Anchor {
			point: Point::new(0.0, 0.0),
			size_scale: 0.5,
		};
		let Step::Alive(sprite) = step(&particle(), &anchor, 0.0, EffectMode::Pull, &style) else {
			panic!("particle expired at birth");
		};
		assert!(close(sprite.size, 20.0 * 2.0 * 0.5));
		assert_eq!(step(&particle(), &anchor, 2000.0, EffectMode::Pull, &style), Step::Expired);
	}
}
