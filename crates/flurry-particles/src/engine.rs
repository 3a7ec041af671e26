//! The simulation scheduler: owns the emitters, the frame clock and the surface

use crate::emitter::{Emitter, EmitterConfig};
use crate::rand::ParticleRng;
use crate::render::Renderer;
use flurry_core::{EmitterId, FlurryError, IdAllocator, Result};
use flurry_runtime::{FixedStepClock, FrameClock, DEFAULT_FRAME_RATE};

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Seed for all emitter randomness; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Clock ticks per simulated second
    pub frame_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

/// Drives every emitter from one frame clock and draws them onto one surface.
///
/// Emitters update and render strictly in creation order, so later emitters
/// draw on top and all of them see the same timestamp within a frame.
pub struct Engine<R: Renderer, C: FrameClock = FixedStepClock> {
    clock: C,
    surface: Option<R>,
    emitters: Vec<Emitter>,
    ids: IdAllocator,
    rng: ParticleRng,
}

impl<R: Renderer> Engine<R, FixedStepClock> {
    pub fn from_config(config: &EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ParticleRng::new(seed),
            None => ParticleRng::from_entropy(),
        };
        Self::with_rng(FixedStepClock::with_rate(config.frame_rate), rng)
    }
}

impl<R: Renderer, C: FrameClock> Engine<R, C> {
    pub fn new(clock: C) -> Self {
        Self::with_rng(clock, ParticleRng::from_entropy())
    }

    pub fn with_rng(clock: C, rng: ParticleRng) -> Self {
        Self {
            clock,
            surface: None,
            emitters: Vec::new(),
            ids: IdAllocator::new(),
            rng,
        }
    }

    /// Acquire the drawing surface. Must succeed before the clock can start;
    /// calling it again once a surface is held does nothing.
    pub fn initialize<F>(&mut self, acquire: F) -> Result<()>
    where
        F: FnOnce() -> Result<R>,
    {
        if self.surface.is_some() {
            return Ok(());
        }
        let mut surface = acquire()?;
        let (width, height) = surface.size();
        if width <= 0.0 || height <= 0.0 {
            return Err(FlurryError::SurfaceUnavailable(format!(
                "surface has no area ({width}x{height})"
            )));
        }
        surface.clear_all();
        log::info!("engine initialized with {width}x{height} surface");
        self.surface = Some(surface);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    /// Create a stopped emitter and return its id
    pub fn create_emitter(&mut self, config: EmitterConfig) -> EmitterId {
        let id = self.ids.allocate();
        log::debug!("created emitter {id} ({})", config.mode.name());
        let emitter = Emitter::with_rng(id, config, self.rng.fork());
        self.emitters.push(emitter);
        id
    }

    pub fn get_emitter(&self, id: EmitterId) -> Option<&Emitter> {
        self.emitters.iter().find(|e| e.get_id() == id)
    }

    pub fn get_emitter_mut(&mut self, id: EmitterId) -> Option<&mut Emitter> {
        self.emitters.iter_mut().find(|e| e.get_id() == id)
    }

    /// Remove an emitter and its particles immediately. Returns whether
    /// anything was removed.
    pub fn remove_emitter(&mut self, id: EmitterId) -> bool {
        let before = self.emitters.len();
        self.emitters.retain(|e| e.get_id() != id);
        let removed = self.emitters.len() != before;
        if removed {
            log::debug!("removed emitter {id}");
        }
        removed
    }

    /// Start the frame clock
    pub fn start(&mut self) -> Result<()> {
        if self.surface.is_none() {
            return Err(FlurryError::NotInitialized);
        }
        if !self.clock.is_running() {
            log::info!("engine started with {} emitter(s)", self.emitters.len());
        }
        self.clock.start();
        Ok(())
    }

    /// Halt the frame clock, keeping all simulation state
    pub fn pause(&mut self) {
        if self.clock.is_running() {
            log::info!("engine paused at {:.1}ms", self.clock.now());
        }
        self.clock.pause();
    }

    /// Halt the frame clock, reset every emitter and clear the surface
    pub fn stop(&mut self) {
        self.clock.stop();
        for emitter in &mut self.emitters {
            emitter.reset();
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.clear_all();
        }
        log::info!("engine stopped");
    }

    /// Run one frame at `timestamp`: clear the surface, then update and
    /// render each emitter in creation order.
    pub fn update(&mut self, timestamp: f64) -> Result<()> {
        let surface = self.surface.as_mut().ok_or(FlurryError::NotInitialized)?;
        surface.clear_all();
        for emitter in &mut self.emitters {
            emitter.update(timestamp);
            emitter.render(&mut *surface);
        }
        Ok(())
    }

    /// Pump the clock once. Returns the frame's timestamp if one ran.
    pub fn tick(&mut self) -> Result<Option<f64>> {
        match self.clock.tick() {
            Some(timestamp) => {
                self.update(timestamp)?;
                Ok(Some(timestamp))
            }
            None => Ok(None),
        }
    }

    /// Pump the clock `frames` times, returning how many frames ran
    pub fn run_frames(&mut self, frames: u64) -> Result<u64> {
        let mut ran = 0;
        for _ in 0..frames {
            if self.tick()?.is_some() {
                ran += 1;
            }
        }
        Ok(ran)
    }

    /// Emitters in creation order
    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// Live particles across all emitters
    pub fn particle_count(&self) -> usize {
        self.emitters.iter().map(|e| e.particle_count()).sum()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn surface(&self) -> Option<&R> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut R> {
        self.surface.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::EmissionMode;
    use crate::render::{DrawCall, RecordingRenderer};
    use crate::spawn::SpawnRegion;
    use flurry_core::{Rect, Span};
    use flurry_runtime::ClockState;

    fn engine() -> Engine<RecordingRenderer> {
        let mut engine = Engine::with_rng(FixedStepClock::new(), ParticleRng::new(9));
        engine
            .initialize(|| Ok(RecordingRenderer::new(640.0, 480.0)))
            .unwrap();
        engine
    }

    fn steady_flow(x: f64) -> EmitterConfig {
        EmitterConfig {
            region: SpawnRegion::point(x, 100.0),
            mode: EmissionMode::Flow { quantity: 1 },
            max_particles: 0,
            frequency: Span::constant(5.0),
            particle_life: Span::constant(0.0),
            speed: Span::constant(0.0),
            size: Span::constant(4.0),
            ..Default::default()
        }
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let mut engine = engine();
        let a = engine.create_emitter(EmitterConfig::default());
        let b = engine.create_emitter(EmitterConfig::default());
        assert_eq!(a, EmitterId(1));
        assert_eq!(b, EmitterId(2));
        engine.remove_emitter(b);
        let c = engine.create_emitter(EmitterConfig::default());
        assert_eq!(c, EmitterId(3));
    }

    #[test]
    fn create_then_remove_leaves_nothing() {
        let mut engine = engine();
        let id = engine.create_emitter(EmitterConfig::default());
        assert!(engine.remove_emitter(id));
        assert_eq!(engine.emitter_count(), 0);
        assert!(engine.get_emitter(id).is_none());
    }

    #[test]
    fn unknown_ids_are_harmless() {
        let mut engine = engine();
        engine.create_emitter(EmitterConfig::default());
        assert!(engine.get_emitter(EmitterId(99)).is_none());
        assert!(!engine.remove_emitter(EmitterId(99)));
        assert_eq!(engine.emitter_count(), 1);
    }

    #[test]
    fn new_emitters_start_stopped() {
        let mut engine = engine();
        let id = engine.create_emitter(EmitterConfig::default());
        let emitter = engine.get_emitter(id).unwrap();
        assert!(!emitter.is_running());
        assert_eq!(emitter.get_id(), id);
    }

    #[test]
    fn start_requires_initialize() {
        let mut engine: Engine<RecordingRenderer> = Engine::new(FixedStepClock::new());
        assert!(matches!(engine.start(), Err(FlurryError::NotInitialized)));
        assert!(matches!(engine.update(16.0), Err(FlurryError::NotInitialized)));
        assert_eq!(engine.clock().state(), ClockState::Stopped);
    }

    #[test]
    fn initialize_fails_loudly_without_surface() {
        let mut engine: Engine<RecordingRenderer> = Engine::new(FixedStepClock::new());
        let err = engine
            .initialize(|| Err(FlurryError::SurfaceUnavailable("no canvas".into())))
            .unwrap_err();
        assert!(matches!(err, FlurryError::SurfaceUnavailable(_)));
        assert!(!engine.is_initialized());

        let err = engine
            .initialize(|| Ok(RecordingRenderer::new(0.0, 100.0)))
            .unwrap_err();
        assert!(matches!(err, FlurryError::SurfaceUnavailable(_)));
    }

    #[test]
    fn update_clears_then_renders_in_creation_order() {
        let mut engine = engine();
        let a = engine.create_emitter(steady_flow(10.0));
        let b = engine.create_emitter(steady_flow(500.0));
        engine.get_emitter_mut(a).unwrap().start();
        engine.get_emitter_mut(b).unwrap().start();

        engine.update(6.0).unwrap();
        engine.update(12.0).unwrap();

        let calls = engine.surface_mut().unwrap().take_calls();
        let last_clear = calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::Clear(_)))
            .unwrap();
        assert_eq!(calls[last_clear], DrawCall::Clear(Rect::new(0.0, 0.0, 640.0, 480.0)));

        let xs: Vec<f64> = calls[last_clear + 1..]
            .iter()
            .filter_map(|c| c.bounds())
            .map(|b| b.center().x)
            .collect();
        assert_eq!(xs.len(), 4);
        assert!(xs[..2].iter().all(|x| (*x - 10.0).abs() < 1e-9));
        assert!(xs[2..].iter().all(|x| (*x - 500.0).abs() < 1e-9));
    }

    #[test]
    fn tick_does_nothing_until_started() {
        let mut engine = engine();
        let id = engine.create_emitter(steady_flow(0.0));
        engine.get_emitter_mut(id).unwrap().start();

        assert_eq!(engine.tick().unwrap(), None);
        assert_eq!(engine.particle_count(), 0);

        engine.start().unwrap();
        assert_eq!(engine.run_frames(10).unwrap(), 10);
        assert!(engine.particle_count() > 0);
    }

    #[test]
    fn start_is_idempotent() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.run_frames(3).unwrap();
        engine.start().unwrap();
        assert!((engine.clock().now() - 3000.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn pause_while_stopped_changes_nothing() {
        let mut engine = engine();
        engine.pause();
        assert_eq!(engine.clock().state(), ClockState::Stopped);
        assert_eq!(engine.run_frames(3).unwrap(), 0);
        assert_eq!(engine.clock().now(), 0.0);
    }

    #[test]
    fn pause_keeps_particles_and_time() {
        let mut engine = engine();
        let id = engine.create_emitter(steady_flow(0.0));
        engine.get_emitter_mut(id).unwrap().start();
        engine.start().unwrap();
        engine.run_frames(5).unwrap();

        let count = engine.particle_count();
        let now = engine.clock().now();
        engine.pause();
        assert_eq!(engine.run_frames(5).unwrap(), 0);
        assert_eq!(engine.particle_count(), count);
        assert_eq!(engine.clock().now(), now);

        engine.start().unwrap();
        engine.run_frames(1).unwrap();
        assert!(engine.clock().now() > now);
    }

    #[test]
    fn stop_resets_emitters_and_clears_surface() {
        let mut engine = engine();
        let id = engine.create_emitter(steady_flow(0.0));
        engine.get_emitter_mut(id).unwrap().start();
        engine.start().unwrap();
        engine.run_frames(5).unwrap();
        assert!(engine.particle_count() > 0);

        engine.surface_mut().unwrap().take_calls();
        engine.stop();
        assert_eq!(engine.particle_count(), 0);
        assert!(!engine.get_emitter(id).unwrap().is_running());
        assert_eq!(engine.clock().now(), 0.0);
        assert_eq!(
            engine.surface().unwrap().calls(),
            &[DrawCall::Clear(Rect::new(0.0, 0.0, 640.0, 480.0))]
        );
    }

    #[test]
    fn seeded_engines_are_reproducible() {
        let run = || {
            let mut engine = Engine::from_config(&EngineConfig {
                seed: Some(1234),
                ..Default::default()
            });
            engine
                .initialize(|| Ok(RecordingRenderer::new(100.0, 100.0)))
                .unwrap();
            let id = engine.create_emitter(EmitterConfig {
                region: SpawnRegion::new(Span::new(0.0, 100.0), Span::new(0.0, 100.0)),
                ..Default::default()
            });
            engine.get_emitter_mut(id).unwrap().start();
            engine.start().unwrap();
            engine.run_frames(120).unwrap();
            engine
                .get_emitter(id)
                .unwrap()
                .particles()
                .iter()
                .map(|p| p.position())
                .collect::<Vec<_>>()
        };
        let first = run();
        assert!(!first.is_empty());
        assert_eq!(first, run());
    }
}
