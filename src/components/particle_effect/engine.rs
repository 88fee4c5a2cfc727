//! One effect instance: anchor, spawner and live particle set.

use rand::{Rng, SeedableRng};
use rand::rngs::SmallRng;

use super::anchor::{Anchor, AnchorTracker};
use super::config::EffectConfig;
use super::layout::Layout;
use super::perimeter::RoundedPerimeter;
use super::render::Surface;
use super::simulation::{Step, step};
use super::spawner::{PerimeterTarget, SpawnContext, Spawner};
use super::types::{EffectMode, Particle};

/// What happened during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
	/// Particles created this frame.
	pub spawned: usize,
	/// Particles drawn this frame.
	pub drawn: usize,
	/// Particles removed this frame.
	pub expired: usize,
	/// No anchor yet; nothing was spawned or drawn.
	pub idle: bool,
}

/// Particle engine bound to a single mode. A mode change builds a new one.
pub struct ParticleEngine<R = SmallRng> {
	mode: EffectMode,
	config: EffectConfig,
	spawner: Spawner<R>,
	tracker: AnchorTracker,
	particles: Vec<Particle>,
}

impl ParticleEngine<SmallRng> {
	/// Creates an engine seeded from the platform entropy source.
	pub fn new(mode: EffectMode, config: EffectConfig, horizontal_shift: f64) -> Self {
		Self::with_rng(mode, config, horizontal_shift, SmallRng::from_entropy())
	}
}

impl<R: Rng> ParticleEngine<R> {
	/// Creates an engine drawing randomness from `rng`.
	pub fn with_rng(mode: EffectMode, config: EffectConfig, horizontal_shift: f64, rng: R) -> Self {
		Self {
			mode,
			spawner: Spawner::new(config.spawn.clone(), config.perimeter.clone(), rng),
			tracker: AnchorTracker::new(config.anchor.clone(), horizontal_shift),
			particles: Vec::new(),
			config,
		}
	}

	/// Trajectory mode this engine was built for.
	pub fn mode(&self) -> EffectMode {
		self.mode
	}

	/// Configuration in use.
	pub fn config(&self) -> &EffectConfig {
		&self.config
	}

	/// Live particles, in no particular order.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Number of live particles.
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	/// Whether no particle is alive.
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Total particles ever created.
	pub fn spawned_total(&self) -> u64 {
		self.spawner.index()
	}

	/// Last known anchor, if any.
	pub fn anchor(&self) -> Option<Anchor> {
		self.tracker.anchor()
	}

	/// Re-measures the anchor. Keeps the previous one if the glyph is gone.
	pub fn relayout<L: Layout + ?Sized>(&mut self, layout: &L) -> Option<Anchor> {
		self.tracker.update(layout.measure_anchor())
	}

	/// Pins the anchor without measuring.
	pub fn set_anchor(&mut self, anchor: Anchor) {
		self.tracker.set(anchor);
	}

	/// Re-rolls the spawn interval.
	pub fn resample_interval(&mut self) -> f64 {
		self.spawner.resample_interval()
	}

	/// Inserts a particle directly, bypassing the spawner.
	pub fn push_particle(&mut self, particle: Particle) {
		self.particles.push(particle);
	}

	fn spawn_context<L: Layout + ?Sized>(&self, layout: &L) -> SpawnContext {
		let perimeter = if self.mode.uses_perimeter() {
			layout.measure_perimeter().map(|m| PerimeterTarget {
				outline: RoundedPerimeter::new(m.target, &self.config.perimeter),
				mapping: m.mapping,
			})
		} else {
			None
		};
		SpawnContext {
			size_scale: self.tracker.size_scale(),
			viewport_width: layout.viewport_width(),
			perimeter,
		}
	}

	/// Runs one frame at animation time `now` (ms): clear, spawn if due,
	/// then advance, cull and draw every particle.
	pub fn frame<L, S>(&mut self, now: f64, layout: &L, surface: &mut S) -> FrameStats
	where
		L: Layout + ?Sized,
		S: Surface + ?Sized,
	{
		surface.clear();
		let mut stats = FrameStats::default();

		let Some(anchor) = self.tracker.anchor() else {
			stats.idle = true;
			return stats;
		};

		if self.spawner.is_due(now) {
			let context = self.spawn_context(layout);
			stats.spawned = self.spawner.tick(now, &context, &mut self.particles);
		}

		let mode = self.mode;
		let sprite_style = &self.config.sprite;
		self.particles.retain(|particle| match step(particle, &anchor, now, mode, sprite_style) {
			Step::Alive(sprite) => {
				surface.draw(&sprite);
				stats.drawn += 1;
				true
			}
			Step::Expired => {
				stats.expired += 1;
				false
			}
		});

		stats
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::particle_effect::layout::StaticLayout;
	use crate::components::particle_effect::simulation::Sprite;
	use rand::rngs::StdRng;

	#[derive(Default)]
	struct Recorder {
		clears: usize,
		sprites: Vec<Sprite>,
	}

	impl Surface for Recorder {
		fn clear(&mut self) {
			self.clears += 1;
			self.sprites.clear();
		}
		fn draw(&mut self, sprite: &Sprite) {
			self.sprites.push(*sprite);
		}
	}

	fn no_layout() -> StaticLayout {
		StaticLayout {
			anchor: None,
			perimeter: None,
			viewport_width: 1280.0,
		}
	}

	fn engine(mode: EffectMode) -> ParticleEngine<StdRng> {
		ParticleEngine::with_rng(mode, EffectConfig::default(), 0.0, StdRng::seed_from_u64(7))
	}

	#[test]
	fn idle_without_anchor() {
		let mut e = engine(EffectMode::Spiral);
		let mut surface = Recorder::default();
		let stats = e.frame(100.0, &no_layout(), &mut surface);
		assert!(stats.idle);
		assert_eq!(surface.clears, 1);
		assert!(e.is_empty());
	}

	#[test]
	fn spawns_once_due() {
		let mut e = engine(EffectMode::Spiral);
		e.set_anchor(Anchor::at(400.0, 300.0));
		let mut surface = Recorder::default();

		let stats = e.frame(1.0, &no_layout(), &mut surface);
		assert_eq!(stats.spawned, 0);

		let stats = e.frame(16.0, &no_layout(), &mut surface);
		assert_eq!(stats.spawned, 1);
		assert_eq!(stats.drawn, 1);
		assert_eq!(e.spawned_total(), 1);
	}

	#[test]
	fn expired_particles_are_not_drawn() {
		let mut e = engine(EffectMode::Pull);
		e.set_anchor(Anchor::at(0.0, 0.0));
		e.push_particle(Particle {
			duration: 1.0,
			start_time: 0.0,
			..Particle::default()
		});
		let mut surface = Recorder::default();
		// spawner is due too, but its fresh particle is alive
		let stats = e.frame(1000.0, &no_layout(), &mut surface);
		assert_eq!(stats.expired, 1);
		assert!(e.particles().iter().all(|p| p.start_time == 1000.0));
	}
}
