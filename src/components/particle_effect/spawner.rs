//! Particle creation: spawn cadence, golden-angle phases and randomized
//! initial kinematics.

use std::f64::consts::PI;

use rand::Rng;

use super::anchor::SurfaceMapping;
use super::config::{PerimeterStyle, SpawnStyle};
use super::perimeter::RoundedPerimeter;
use super::types::{Origin, Particle};

const SQRT_5: f64 = 2.236_067_977_499_79;

/// `π(3 − √5)`: successive multiples are maximally spread around the circle.
pub const GOLDEN_ANGLE: f64 = PI * (3.0 - SQRT_5);

/// Outline to spawn along, with the mapping from its viewport coordinates
/// into surface pixels.
#[derive(Clone, Copy, Debug)]
pub struct PerimeterTarget {
	/// Outline in viewport pixels.
	pub outline: RoundedPerimeter,
	/// Viewport to surface conversion.
	pub mapping: SurfaceMapping,
}

/// Layout facts read at spawn time.
#[derive(Clone, Copy, Debug)]
pub struct SpawnContext {
	/// Anchor size scale; spawn distances follow the glyph size.
	pub size_scale: f64,
	/// Viewport width in CSS pixels.
	pub viewport_width: f64,
	/// Present only for perimeter spawning.
	pub perimeter: Option<PerimeterTarget>,
}

impl Default for SpawnContext {
	fn default() -> Self {
		Self {
			size_scale: 1.0,
			viewport_width: f64::INFINITY,
			perimeter: None,
		}
	}
}

/// Creates particles on a randomized, bursty cadence.
#[derive(Clone, Debug)]
pub struct Spawner<R> {
	rng: R,
	style: SpawnStyle,
	perimeter_style: PerimeterStyle,
	index: u64,
	last_spawn: f64,
	interval: f64,
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, (low, high): (f64, f64)) -> f64 {
	if high > low {
		rng.gen_range(low..high)
	} else {
		low
	}
}

fn lerp((from, to): (f64, f64), t: f64) -> f64 {
	from + (to - from) * t
}

impl<R: Rng> Spawner<R> {
	/// Creates a spawner whose clock starts at 0.
	pub fn new(style: SpawnStyle, perimeter_style: PerimeterStyle, rng: R) -> Self {
		Self {
			interval: style.initial_interval,
			rng,
			style,
			perimeter_style,
			index: 0,
			last_spawn: 0.0,
		}
	}

	/// Number of particles created so far.
	pub fn index(&self) -> u64 {
		self.index
	}

	/// Current spawn interval, ms.
	pub fn interval(&self) -> f64 {
		self.interval
	}

	/// Re-rolls the spawn interval. Driven by a wall-clock timer independent
	/// of the frame loop.
	pub fn resample_interval(&mut self) -> f64 {
		self.interval = uniform(&mut self.rng, self.style.interval_range);
		self.interval
	}

	/// Whether a spawn event is due at `now`.
	pub fn is_due(&self, now: f64) -> bool {
		now - self.last_spawn >= self.interval
	}

	/// Runs one spawn event if due, appending to `out`. Returns the number
	/// of particles created.
	pub fn tick(&mut self, now: f64, context: &SpawnContext, out: &mut Vec<Particle>) -> usize {
		if !self.is_due(now) {
			return 0;
		}
		self.last_spawn = now;
		self.spawn(now, context, out)
	}

	/// Unconditionally creates one spawn event: a single particle, or a
	/// perimeter batch sharing every random draw but the phase.
	pub fn spawn(&mut self, now: f64, context: &SpawnContext, out: &mut Vec<Particle>) -> usize {
		let base = self.draw(now, context);

		let Some(target) = context.perimeter else {
			out.push(base);
			self.index += 1;
			return 1;
		};

		let mut created = 0;
		for i in 0..self.perimeter_style.batch {
			let Some(point) = target.outline.sample(&mut self.rng) else {
				break;
			};
			out.push(Particle {
				start_angle: (self.index + i as u64) as f64 * GOLDEN_ANGLE,
				origin: Some(Origin {
					point: target.mapping.to_surface(point.x, point.y),
					direction: point.direction,
				}),
				..base
			});
			created += 1;
		}

		if created == 0 {
			// outline collapsed; fall back to an anchor-centred particle
			out.push(base);
			self.index += 1;
			return 1;
		}
		self.index += self.perimeter_style.batch as u64;
		created
	}

	fn draw(&mut self, now: f64, context: &SpawnContext) -> Particle {
		let style = &self.style;
		let mobile_scale = if context.viewport_width < style.mobile_breakpoint {
			style.mobile_distance_scale
		} else {
			1.0
		};

		// one draw places the particle within its range and sizes it, so
		// farther spawns are always larger
		let depth: f64 = self.rng.gen_range(0.0..1.0);
		let (near, far) = style.distance_range;
		let scaled = (near * context.size_scale, far * context.size_scale);
		let distance = lerp(scaled, depth) * mobile_scale;

		Particle {
			start_angle: self.index as f64 * GOLDEN_ANGLE,
			start_distance: distance.max(0.0),
			orbital_speed: uniform(&mut self.rng, style.orbital_speed_range),
			duration: uniform(&mut self.rng, style.duration_range),
			start_time: now,
			blackness: uniform(&mut self.rng, style.blackness_range),
			size: lerp(style.size_range, depth),
			origin: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_effect::types::{Direction, Rect};
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use std::f64::consts::TAU;

	fn spawner() -> Spawner<StdRng> {
		Spawner::new(
			SpawnStyle::default(),
			PerimeterStyle::default(),
			StdRng::seed_from_u64(42),
		)
	}

	#[test]
	fn golden_angle_value() {
		assert!((GOLDEN_ANGLE - PI * (3.0 - 5f64.sqrt())).abs() < 1e-12);
		assert!((GOLDEN_ANGLE - 2.399963).abs() < 1e-6);
	}

	#[test]
	fn first_twenty_phases_are_spread() {
		let mut s = spawner();
		let mut out = Vec::new();
		for i in 0..20 {
			s.spawn(i as f64, &SpawnContext::default(), &mut out);
		}
		let angles: Vec<f64> = out.iter().map(|p| p.start_angle.rem_euclid(TAU)).collect();
		for (i, a) in angles.iter().enumerate() {
			for b in &angles[i + 1..] {
				let gap = (a - b).abs();
				assert!(gap.min(TAU - gap) > 0.05, "phases {a} and {b} too close");
			}
		}
	}

	#[test]
	fn spawns_follow_the_interval() {
		let mut s = spawner();
		let mut out = Vec::new();
		assert_eq!(s.tick(1.0, &SpawnContext::default(), &mut out), 0);
		assert_eq!(s.tick(3.0, &SpawnContext::default(), &mut out), 1);
		// clock reset at 3.0
		assert_eq!(s.tick(5.0, &SpawnContext::default(), &mut out), 0);
		assert_eq!(s.tick(6.0, &SpawnContext::default(), &mut out), 1);
		assert_eq!(out[1].start_time, 6.0);
	}

	#[test]
	fn resampled_interval_stays_in_range() {
		let mut s = spawner();
		assert_eq!(s.interval(), 3.0);
		for _ in 0..200 {
			let interval = s.resample_interval();
			assert!((10.0..20.0).contains(&interval));
			assert_eq!(s.interval(), interval);
		}
	}

	#[test]
	fn draws_stay_in_range_and_size_tracks_distance() {
		let mut s = spawner();
		let mut out = Vec::new();
		for i in 0..500 {
			s.spawn(i as f64, &SpawnContext::default(), &mut out);
		}
		for p in &out {
			assert!((100.0..200.0).contains(&p.start_distance));
			assert!((2.0..4.0).contains(&p.duration));
			assert!((0.7..1.0).contains(&p.blackness));
			assert!((5.0..8.0).contains(&p.orbital_speed));
			let expected = 0.5 + (p.start_distance - 100.0) / 100.0 * 2.0;
			assert!((p.size - expected).abs() < 1e-9);
		}
	}

	#[test]
	fn mobile_and_glyph_scale_shrink_distance() {
		let mut s = spawner();
		let mut out = Vec::new();
		let context = SpawnContext {
			size_scale: 0.5,
			viewport_width: 400.0,
			perimeter: None,
		};
		for i in 0..200 {
			s.spawn(i as f64, &context, &mut out);
		}
		for p in &out {
			assert!((25.0..50.0).contains(&p.start_distance));
			assert!((0.5..2.5).contains(&p.size));
		}
	}

	#[test]
	fn perimeter_batch_shares_draws() {
		let mut s = spawner();
		let mut out = Vec::new();
		let context = SpawnContext {
			perimeter: Some(PerimeterTarget {
				outline: RoundedPerimeter::new(
					Rect::new(0.0, 0.0, 300.0, 80.0),
					&PerimeterStyle::default(),
				),
				mapping: SurfaceMapping::new(
					Rect::new(-100.0, -100.0, 600.0, 400.0),
					1200.0,
					800.0,
				)
				.unwrap(),
			}),
			..SpawnContext::default()
		};
		assert_eq!(s.spawn(10.0, &context, &mut out), 12);
		assert_eq!(s.index(), 12);
		for (i, p) in out.iter().enumerate() {
			assert_eq!(p.duration, out[0].duration);
			assert_eq!(p.start_time, 10.0);
			assert!((p.start_angle - i as f64 * GOLDEN_ANGLE).abs() < 1e-12);
			let origin = p.origin.unwrap();
			// viewport coordinates shifted by 100 then doubled
			assert!(origin.point.x >= 200.0 - 1e-9 && origin.point.x <= 800.0 + 1e-9);
			assert!(origin.point.y >= 200.0 - 1e-9 && origin.point.y <= 360.0 + 1e-9);
		}
	}

	#[test]
	fn corner_share_converges() {
		let mut s = spawner();
		let outline =
			RoundedPerimeter::new(Rect::new(0.0, 0.0, 500.0, 120.0), &PerimeterStyle::default());
		let context = SpawnContext {
			perimeter: Some(PerimeterTarget {
				outline,
				mapping: SurfaceMapping::identity(1000.0, 1000.0),
			}),
			..SpawnContext::default()
		};
		let mut out = Vec::new();
		for i in 0..2000 {
			s.spawn(i as f64, &context, &mut out);
		}
		let corners = out
			.iter()
			.filter(|p| p.origin.is_some_and(|o| matches!(o.direction, Direction::Corner(_))))
			.count();
		let share = corners as f64 / out.len() as f64;
		let expected = outline.corner_share();
		let weighted_arcs = 4.0 * 2.0 * outline.corner_arc_length();
		assert!((expected - weighted_arcs / outline.total_weight()).abs() < 1e-12);
		assert!((share - expected).abs() < 0.01, "share {share} vs {expected}");
	}
}
