//! A single simulated particle: force accumulation, aging and drawing

use crate::drift::DriftAxis;
use crate::rand::ParticleRng;
use crate::render::{ImageHandle, Renderer, Shape};
use flurry_core::{Rect, Span, Vec2};
use std::collections::VecDeque;

/// Range (ms) a particle's jitter interval is rolled from
pub const JITTER_INTERVAL: Span = Span {
    min: 100.0,
    max: 400.0,
};

/// Spawn parameters captured at birth
#[derive(Debug, Clone)]
pub struct ParticleSpawn {
    pub position: Vec2,
    /// Direction of travel in degrees, clockwise from +x
    pub angle: f64,
    pub speed: f64,
    pub gravity: f64,
    pub size: f64,
    pub jitter: f64,
    /// Milliseconds until death; 0 never dies
    pub lifespan: f64,
    pub drift_axis: DriftAxis,
    pub shape: Shape,
    pub image: Option<ImageHandle>,
    /// Follow delay (ms) for flock waypoints; `None` outside flock mode
    pub flock_delay: Option<f64>,
}

impl Default for ParticleSpawn {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            angle: 0.0,
            speed: 0.0,
            gravity: 0.0,
            size: 1.0,
            jitter: 0.0,
            lifespan: 0.0,
            drift_axis: DriftAxis::Horizontal,
            shape: Shape::Circle,
            image: None,
            flock_delay: None,
        }
    }
}

/// Oscillating sideways force. The sign flips once per interval and the
/// magnitude ramps linearly from +1 to -1 across each interval.
#[derive(Debug, Clone)]
struct Jitter {
    force: f64,
    interval: f64,
    last_flip: f64,
}

impl Jitter {
    fn force_at(&mut self, timestamp: f64) -> f64 {
        let mut elapsed = timestamp - self.last_flip;
        if elapsed >= self.interval {
            self.force = -self.force;
            self.last_flip = timestamp;
            elapsed = 0.0;
        }
        let half = self.interval / 2.0;
        let remaining = self.interval - elapsed;
        self.force * (remaining - half) / half
    }
}

#[derive(Debug, Clone, Copy)]
struct Waypoint {
    point: Vec2,
    active_at: f64,
}

#[derive(Debug, Clone)]
struct Flock {
    delay: f64,
    pending: VecDeque<Waypoint>,
    destination: Option<Vec2>,
}

#[derive(Debug, Clone)]
pub struct Particle {
    position: Vec2,
    /// Force accumulator; starts as the unit direction of travel
    force: Vec2,
    speed: f64,
    gravity: f64,
    drift: f64,
    drift_axis: DriftAxis,
    size: f64,
    jitter: Option<Jitter>,
    flock: Option<Flock>,
    shape: Shape,
    image: Option<ImageHandle>,
    birthdate: f64,
    age: f64,
    lifespan: f64,
    dead: bool,
}

impl Particle {
    /// Create a particle born at `timestamp`
    pub fn new(spawn: ParticleSpawn, timestamp: f64, rng: &mut ParticleRng) -> Self {
        let jitter = (spawn.jitter > 0.0).then(|| Jitter {
            force: spawn.jitter * rng.sign(),
            interval: rng.span(&JITTER_INTERVAL),
            last_flip: timestamp,
        });
        let flock = spawn.flock_delay.map(|delay| Flock {
            delay,
            pending: VecDeque::new(),
            destination: None,
        });

        Self {
            position: spawn.position,
            force: Vec2::from_degrees(spawn.angle),
            speed: spawn.speed.abs(),
            gravity: spawn.gravity,
            drift: 0.0,
            drift_axis: spawn.drift_axis,
            size: spawn.size,
            jitter,
            flock,
            shape: spawn.shape,
            image: spawn.image,
            birthdate: timestamp,
            age: 0.0,
            lifespan: spawn.lifespan.max(0.0),
            dead: false,
        }
    }

    /// Age the particle to `timestamp` and integrate forces over `delta_ms`
    pub fn update(&mut self, timestamp: f64, delta_ms: f64) {
        if self.dead {
            return;
        }

        self.age = timestamp - self.birthdate;
        if self.lifespan > 0.0 && self.age >= self.lifespan {
            self.dead = true;
            return;
        }

        if self.gravity != 0.0 {
            self.force.y += self.gravity * self.size;
        }

        if self.drift != 0.0 {
            match self.drift_axis {
                DriftAxis::Horizontal => self.force.x += self.drift * self.size,
                DriftAxis::Vertical => self.force.y += self.drift * self.size,
            }
        }

        if let Some(jitter) = self.jitter.as_mut() {
            let ramp = jitter.force_at(timestamp);
            if self.speed > 0.0 {
                self.force.x += ramp * self.size / self.speed;
            }
        }

        self.pursue_waypoint(timestamp);

        self.position = self.position + self.force * (self.speed * delta_ms / 1000.0);
    }

    fn pursue_waypoint(&mut self, timestamp: f64) {
        let Some(flock) = self.flock.as_mut() else {
            return;
        };

        while let Some(next) = flock.pending.front() {
            if next.active_at > timestamp {
                break;
            }
            flock.destination = Some(next.point);
            flock.pending.pop_front();
        }

        let Some(destination) = flock.destination else {
            return;
        };
        if self.position.distance(&destination) <= self.size {
            flock.destination = None;
            return;
        }
        if self.speed > 0.0 {
            let delta = destination - self.position;
            let bearing = delta.y.atan2(delta.x);
            self.force.x += bearing.cos() / self.speed;
            self.force.y += bearing.sin() / self.speed;
        }
    }

    /// Draw into `renderer`; dead particles draw nothing
    pub fn render(&self, renderer: &mut dyn Renderer) {
        if self.dead {
            return;
        }
        let bounds = Rect::centered(self.position, self.size);
        match &self.image {
            Some(image) => renderer.draw_image(image, bounds),
            None => renderer.fill_shape(self.shape, bounds),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Set the emitter's current drift magnitude
    pub fn set_drift(&mut self, drift: f64) {
        self.drift = drift;
    }

    /// Queue a flock waypoint; it becomes the destination once this
    /// particle's follow delay has passed. Ignored outside flock mode.
    pub fn push_waypoint(&mut self, point: Vec2, timestamp: f64) {
        if let Some(flock) = self.flock.as_mut() {
            flock.pending.push_back(Waypoint {
                point,
                active_at: timestamp + flock.delay,
            });
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn force(&self) -> Vec2 {
        self.force
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn drift(&self) -> f64 {
        self.drift
    }

    pub fn birthdate(&self) -> f64 {
        self.birthdate
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn lifespan(&self) -> f64 {
        self.lifespan
    }

    pub fn destination(&self) -> Option<Vec2> {
        self.flock.as_ref().and_then(|f| f.destination)
    }

    pub fn pending_waypoints(&self) -> usize {
        self.flock.as_ref().map_or(0, |f| f.pending.len())
    }

    pub fn flock_delay(&self) -> Option<f64> {
        self.flock.as_ref().map(|f| f.delay)
    }
}
