//! Canvas particle halo anchored to a page glyph.
//!
//! A single engine instance tracks the visual centre of one glyph, spawns
//! short-lived soft sprites around it on a bursty cadence, and redraws them
//! every animation frame from one pre-rendered gradient texture:
//! - `spiral`: particles orbit inwards and shrink
//! - `pull` / `push`: straight radial motion towards or away from the glyph
//! - `linear`: batches drift outwards from a rounded outline of the logo
//!
//! The engine itself is plain Rust. Browser access is confined to the
//! [`Layout`], [`Surface`] and [`Scheduler`] implementations used by the
//! component, so everything else runs natively.
//!
//! # Example
//!
//! ```ignore
//! use glyph_particles::{EffectMode, ParticleCanvas};
//!
//! view! {
//!     <ParticleCanvas mode=EffectMode::Pull anchor_selector=".letter-o" />
//!     <h1 class="band-name">"W"<span class="letter-o">"o"</span>"en"</h1>
//! }
//! ```

pub mod anchor;
mod component;
pub mod config;
pub mod engine;
mod error;
pub mod layout;
pub mod lifecycle;
pub mod perimeter;
pub mod render;
pub mod simulation;
pub mod spawner;
mod texture;
pub mod types;

pub use anchor::{Anchor, AnchorMeasurement, AnchorTracker, SurfaceMapping};
pub use component::{DEFAULT_HORIZONTAL_SHIFT, ParticleCanvas};
pub use config::EffectConfig;
pub use engine::{FrameStats, ParticleEngine};
pub use error::EffectError;
pub use layout::{Layout, PerimeterMeasurement, StaticLayout};
pub use lifecycle::{LoopState, RenderLoop, Scheduler};
pub use render::Surface;
pub use simulation::Sprite;
pub use types::{Direction, EffectMode, ModeCycle, Particle, Point, Rect};
