//! Spawn regions, emission timing and the per-mode spawn policies

use crate::emitter::{EmissionMode, EmitterConfig};
use crate::particle::{Particle, ParticleSpawn};
use crate::rand::ParticleRng;
use flurry_core::{Rect, Span, Vec2};
use std::fmt;

/// Radius (px) added per particle when laying out a flock
pub const FLOCK_RADIUS_STEP: f64 = 2.0;

/// Extra follow delay (ms) per particle in creation order
pub const FLOCK_DELAY_STEP: f64 = 30.0;

/// Area new particles appear in
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRegion {
    pub x: Span,
    pub y: Span,
}

impl SpawnRegion {
    pub fn new(x: Span, y: Span) -> Self {
        Self { x, y }
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self::new(Span::constant(x), Span::constant(y))
    }

    /// A `width` x `height` region centered on `position`
    pub fn centered(position: Vec2, width: f64, height: f64) -> Self {
        let (hw, hh) = (width.abs() / 2.0, height.abs() / 2.0);
        Self::new(
            Span::new(position.x - hw, position.x + hw),
            Span::new(position.y - hh, position.y + hh),
        )
    }

    pub fn roll(&self, rng: &mut ParticleRng) -> Vec2 {
        Vec2::new(rng.span(&self.x), rng.span(&self.y))
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x.midpoint(), self.y.midpoint())
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x.min, self.y.min, self.x.width(), self.y.width())
    }
}

impl Default for SpawnRegion {
    fn default() -> Self {
        Self::point(0.0, 0.0)
    }
}

/// The emission gate shared by every mode: emit once more than
/// `next_emit` ms have passed since `last_emitted`.
#[derive(Debug, Clone, Default)]
pub struct EmitTimer {
    last_emitted: f64,
    next_emit: f64,
}

impl EmitTimer {
    pub fn reset(&mut self, frequency: &Span, rng: &mut ParticleRng) {
        self.last_emitted = 0.0;
        self.next_emit = rng.span(frequency);
    }

    pub fn ready(&self, timestamp: f64) -> bool {
        timestamp - self.last_emitted > self.next_emit
    }

    /// Record an emission at `timestamp` and roll the next delay
    pub fn mark(&mut self, timestamp: f64, frequency: &Span, rng: &mut ParticleRng) {
        self.last_emitted = timestamp;
        self.next_emit = rng.span(frequency);
    }

    pub fn last_emitted(&self) -> f64 {
        self.last_emitted
    }

    pub fn next_emit(&self) -> f64 {
        self.next_emit
    }
}

/// What a spawn policy may touch during one update
pub struct SpawnContext<'a> {
    pub timestamp: f64,
    pub config: &'a EmitterConfig,
    pub particles: &'a mut Vec<Particle>,
    pub rng: &'a mut ParticleRng,
}

impl SpawnContext<'_> {
    /// Roll per-particle parameters from the config for a particle at `position`
    pub fn roll_spawn(&mut self, position: Vec2) -> ParticleSpawn {
        let config = self.config;
        ParticleSpawn {
            position,
            angle: self.rng.span(&config.angle),
            speed: self.rng.span(&config.speed),
            gravity: config.gravity,
            size: self.rng.span(&config.size),
            jitter: config.jitter,
            lifespan: self.rng.span(&config.particle_life),
            drift_axis: config.drift.as_ref().map(|d| d.axis).unwrap_or_default(),
            shape: config.shape,
            image: config.image.clone(),
            flock_delay: None,
        }
    }

    pub fn push(&mut self, spawn: ParticleSpawn) {
        let particle = Particle::new(spawn, self.timestamp, self.rng);
        self.particles.push(particle);
    }

    fn frequency(&self) -> Span {
        self.config.frequency
    }
}

/// Decides when and where an emitter creates particles.
pub trait SpawnPolicy: fmt::Debug {
    /// Forget all emission history
    fn reset(&mut self, config: &EmitterConfig, rng: &mut ParticleRng);

    /// Emit for this tick. Returns a waypoint to broadcast to every live
    /// particle, if the policy produced one.
    fn advance(&mut self, cx: &mut SpawnContext<'_>) -> Option<Vec2>;

    /// Whether a finite policy has created everything it ever will
    fn all_particles_created(&self) -> bool {
        false
    }

    /// Timer driving the emission gate
    fn timer(&self) -> &EmitTimer;
}

/// Build the policy for `mode`
pub fn policy_for(mode: &EmissionMode) -> Box<dyn SpawnPolicy> {
    match mode {
        EmissionMode::Burst { repeat } => Box::new(BurstPolicy::new(*repeat)),
        EmissionMode::Flow { quantity } => Box::new(FlowPolicy::new(*quantity)),
        EmissionMode::Flock { interval } => Box::new(FlockPolicy::new(*interval)),
    }
}

/// Emits `max_particles` at one shared position every gate pass.
#[derive(Debug, Clone)]
pub struct BurstPolicy {
    timer: EmitTimer,
    repeat: bool,
    done: bool,
}

impl BurstPolicy {
    pub fn new(repeat: bool) -> Self {
        Self {
            timer: EmitTimer::default(),
            repeat,
            done: false,
        }
    }
}

impl SpawnPolicy for BurstPolicy {
    fn reset(&mut self, config: &EmitterConfig, rng: &mut ParticleRng) {
        self.timer.reset(&config.frequency, rng);
        self.done = false;
    }

    fn advance(&mut self, cx: &mut SpawnContext<'_>) -> Option<Vec2> {
        if self.done || !self.timer.ready(cx.timestamp) {
            return None;
        }
        let position = cx.config.region.roll(cx.rng);
        for _ in 0..cx.config.max_particles {
            let spawn = cx.roll_spawn(position);
            cx.push(spawn);
        }
        let frequency = cx.frequency();
        self.timer.mark(cx.timestamp, &frequency, cx.rng);
        if !self.repeat {
            self.done = true;
        }
        None
    }

    fn all_particles_created(&self) -> bool {
        self.done
    }

    fn timer(&self) -> &EmitTimer {
        &self.timer
    }
}

/// Emits `quantity` independently placed particles per gate pass, capped
/// by `max_particles` unless that is 0.
#[derive(Debug, Clone)]
pub struct FlowPolicy {
    timer: EmitTimer,
    quantity: u32,
}

impl FlowPolicy {
    pub fn new(quantity: u32) -> Self {
        Self {
            timer: EmitTimer::default(),
            quantity,
        }
    }
}

impl SpawnPolicy for FlowPolicy {
    fn reset(&mut self, config: &EmitterConfig, rng: &mut ParticleRng) {
        self.timer.reset(&config.frequency, rng);
    }

    fn advance(&mut self, cx: &mut SpawnContext<'_>) -> Option<Vec2> {
        if !self.timer.ready(cx.timestamp) {
            return None;
        }
        let quantity = self.quantity as usize;
        let room = match cx.config.max_particles {
            0 => quantity,
            max => max.saturating_sub(cx.particles.len()).min(quantity),
        };
        if room == 0 {
            // Capped: admit more as soon as a slot frees up
            return None;
        }
        for _ in 0..room {
            let position = cx.config.region.roll(cx.rng);
            let spawn = cx.roll_spawn(position);
            cx.push(spawn);
        }
        let frequency = cx.frequency();
        self.timer.mark(cx.timestamp, &frequency, cx.rng);
        None
    }

    fn timer(&self) -> &EmitTimer {
        &self.timer
    }
}

/// Spawns the whole flock once in a widening ring around the region
/// center, then broadcasts a fresh waypoint every flock interval.
#[derive(Debug, Clone)]
pub struct FlockPolicy {
    timer: EmitTimer,
    interval: Span,
    created: bool,
    last_flock: f64,
    next_flock: f64,
}

impl FlockPolicy {
    pub fn new(interval: Span) -> Self {
        Self {
            timer: EmitTimer::default(),
            interval,
            created: false,
            last_flock: 0.0,
            next_flock: 0.0,
        }
    }

    fn spawn_flock(&mut self, cx: &mut SpawnContext<'_>) {
        let origin = cx.config.region.center();
        for i in 0..cx.config.max_particles {
            let heading = cx.rng.float(0.0, 360.0);
            let offset = Vec2::from_degrees(heading) * (i as f64 * FLOCK_RADIUS_STEP);
            let mut spawn = cx.roll_spawn(origin + offset);
            spawn.angle = heading;
            spawn.flock_delay = Some(i as f64 * FLOCK_DELAY_STEP);
            cx.push(spawn);
        }
    }
}

impl SpawnPolicy for FlockPolicy {
    fn reset(&mut self, config: &EmitterConfig, rng: &mut ParticleRng) {
        self.timer.reset(&config.frequency, rng);
        self.created = false;
        self.last_flock = 0.0;
        self.next_flock = rng.span(&self.interval);
    }

    fn advance(&mut self, cx: &mut SpawnContext<'_>) -> Option<Vec2> {
        if !self.created {
            if self.timer.ready(cx.timestamp) {
                self.spawn_flock(cx);
                let frequency = cx.frequency();
                self.timer.mark(cx.timestamp, &frequency, cx.rng);
                self.created = true;
                self.last_flock = cx.timestamp;
                self.next_flock = cx.rng.span(&self.interval);
            }
            return None;
        }

        if cx.timestamp - self.last_flock > self.next_flock {
            let target = cx.rng.point_in(&cx.config.region.bounds());
            self.last_flock = cx.timestamp;
            self.next_flock = cx.rng.span(&self.interval);
            return Some(target);
        }
        None
    }

    fn all_particles_created(&self) -> bool {
        self.created
    }

    fn timer(&self) -> &EmitTimer {
        &self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>(
        timestamp: f64,
        config: &'a EmitterConfig,
        particles: &'a mut Vec<Particle>,
        rng: &'a mut ParticleRng,
    ) -> SpawnContext<'a> {
        SpawnContext {
            timestamp,
            config,
            particles,
            rng,
        }
    }

    #[test]
    fn region_centered_and_bounds() {
        let region = SpawnRegion::centered(Vec2::new(50.0, 20.0), 10.0, 4.0);
        assert_eq!(region.x, Span::new(45.0, 55.0));
        assert_eq!(region.y, Span::new(18.0, 22.0));
        assert_eq!(region.center(), Vec2::new(50.0, 20.0));
        assert_eq!(region.bounds(), Rect::new(45.0, 18.0, 10.0, 4.0));
    }

    #[test]
    fn point_region_always_rolls_the_point() {
        let mut rng = ParticleRng::new(3);
        let region = SpawnRegion::point(7.0, 9.0);
        assert_eq!(region.roll(&mut rng), Vec2::new(7.0, 9.0));
    }

    #[test]
    fn timer_gate_is_strict() {
        let mut rng = ParticleRng::new(1);
        let mut timer = EmitTimer::default();
        timer.reset(&Span::constant(100.0), &mut rng);
        assert!(!timer.ready(100.0));
        assert!(timer.ready(100.5));
        timer.mark(101.0, &Span::constant(100.0), &mut rng);
        assert!(!timer.ready(201.0));
        assert!(timer.ready(202.0));
    }

    #[test]
    fn burst_shares_one_position() {
        let config = EmitterConfig {
            region: SpawnRegion::new(Span::new(0.0, 500.0), Span::new(0.0, 500.0)),
            max_particles: 12,
            frequency: Span::constant(50.0),
            ..Default::default()
        };
        let mut rng = ParticleRng::new(5);
        let mut particles = Vec::new();
        let mut policy = BurstPolicy::new(true);
        policy.reset(&config, &mut rng);

        policy.advance(&mut context(51.0, &config, &mut particles, &mut rng));
        assert_eq!(particles.len(), 12);
        let first = particles[0].position();
        assert!(particles.iter().all(|p| p.position() == first));
    }

    #[test]
    fn one_shot_burst_stops_after_first_wave() {
        let config = EmitterConfig {
            max_particles: 4,
            frequency: Span::constant(10.0),
            ..Default::default()
        };
        let mut rng = ParticleRng::new(5);
        let mut particles = Vec::new();
        let mut policy = BurstPolicy::new(false);
        policy.reset(&config, &mut rng);

        for t in [11.0, 22.0, 33.0, 44.0] {
            policy.advance(&mut context(t, &config, &mut particles, &mut rng));
        }
        assert_eq!(particles.len(), 4);
        assert!(policy.all_particles_created());
    }

    #[test]
    fn flow_respects_quantity_and_cap() {
        let config = EmitterConfig {
            mode: EmissionMode::Flow { quantity: 3 },
            max_particles: 5,
            frequency: Span::constant(10.0),
            ..Default::default()
        };
        let mut rng = ParticleRng::new(5);
        let mut particles = Vec::new();
        let mut policy = FlowPolicy::new(3);
        policy.reset(&config, &mut rng);

        policy.advance(&mut context(11.0, &config, &mut particles, &mut rng));
        assert_eq!(particles.len(), 3);
        policy.advance(&mut context(22.0, &config, &mut particles, &mut rng));
        assert_eq!(particles.len(), 5);
        policy.advance(&mut context(33.0, &config, &mut particles, &mut rng));
        assert_eq!(particles.len(), 5);
        // Capped ticks leave the timer alone
        assert_eq!(policy.timer().last_emitted(), 22.0);
    }

    #[test]
    fn uncapped_flow_keeps_emitting() {
        let config = EmitterConfig {
            mode: EmissionMode::Flow { quantity: 2 },
            max_particles: 0,
            frequency: Span::constant(10.0),
            ..Default::default()
        };
        let mut rng = ParticleRng::new(5);
        let mut particles = Vec::new();
        let mut policy = FlowPolicy::new(2);
        policy.reset(&config, &mut rng);

        let mut t = 0.0;
        for _ in 0..100 {
            t += 11.0;
            policy.advance(&mut context(t, &config, &mut particles, &mut rng));
        }
        assert_eq!(particles.len(), 200);
    }

    #[test]
    fn flock_spawns_once_with_staggered_delays() {
        let config = EmitterConfig {
            mode: EmissionMode::Flock {
                interval: Span::constant(100.0),
            },
            region: SpawnRegion::centered(Vec2::new(100.0, 100.0), 50.0, 50.0),
            max_particles: 6,
            frequency: Span::constant(10.0),
            ..Default::default()
        };
        let mut rng = ParticleRng::new(5);
        let mut particles = Vec::new();
        let mut policy = FlockPolicy::new(Span::constant(100.0));
        policy.reset(&config, &mut rng);

        assert_eq!(policy.advance(&mut context(11.0, &config, &mut particles, &mut rng)), None);
        assert_eq!(particles.len(), 6);
        assert!(policy.all_particles_created());

        for (i, p) in particles.iter().enumerate() {
            assert_eq!(p.flock_delay(), Some(i as f64 * FLOCK_DELAY_STEP));
            let radius = p.position().distance(&Vec2::new(100.0, 100.0));
            assert!((radius - i as f64 * FLOCK_RADIUS_STEP).abs() < 1e-9);
        }

        // No second flock, and no broadcast until the interval has passed
        assert_eq!(policy.advance(&mut context(100.0, &config, &mut particles, &mut rng)), None);
        assert_eq!(particles.len(), 6);

        let waypoint = policy
            .advance(&mut context(112.0, &config, &mut particles, &mut rng))
            .expect("waypoint after interval");
        assert!(config.region.bounds().contains(waypoint));
    }
}
