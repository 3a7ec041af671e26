//! Flurry Particles - 2D emitter and particle simulation
//!
//! Provides frame-driven particle effects with:
//! - Burst, flow and flock emission modes
//! - Per-particle gravity, jitter and flock pursuit with Euler integration
//! - A shared drift cycle per emitter
//! - An `Engine` that drives emitters from a frame clock onto a `Renderer`

pub mod drift;
pub mod emitter;
pub mod engine;
pub mod particle;
pub mod rand;
pub mod render;
pub mod scene;
pub mod spawn;

pub use drift::{DriftAxis, DriftConfig, DriftCycle};
pub use emitter::{EmissionMode, Emitter, EmitterConfig, RunState};
pub use engine::{Engine, EngineConfig};
pub use particle::{Particle, ParticleSpawn};
pub use rand::ParticleRng;
pub use render::{DrawCall, ImageHandle, RecordingRenderer, Renderer, Shape};
pub use scene::SceneConfig;
pub use spawn::{SpawnPolicy, SpawnRegion};
