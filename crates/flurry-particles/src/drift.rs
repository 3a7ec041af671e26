//! Shared drift cycle: an emitter-wide force that switches on and off over time

use crate::rand::ParticleRng;
use flurry_core::Span;

/// Axis the drift force pushes along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriftAxis {
    #[default]
    Horizontal,
    Vertical,
}

/// Drift parameters. All three spans are rolled afresh on every cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftConfig {
    /// Force magnitude while drifting
    pub force: Span,
    /// Idle time (ms) before the next drift begins
    pub interval: Span,
    /// How long (ms) a drift lasts
    pub duration: Span,
    pub axis: DriftAxis,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            force: Span::new(-0.05, 0.05),
            interval: Span::new(2000.0, 5000.0),
            duration: Span::new(1000.0, 3000.0),
            axis: DriftAxis::Horizontal,
        }
    }
}

impl DriftConfig {
    /// A zero-magnitude drift applies no force at all
    pub fn is_enabled(&self) -> bool {
        self.force.min != 0.0 || self.force.max != 0.0
    }
}

/// Two-state machine (idle / drifting) advanced once per emitter update.
#[derive(Debug, Clone)]
pub struct DriftCycle {
    config: DriftConfig,
    value: f64,
    interval: f64,
    duration: f64,
    last_change: f64,
    drifting: bool,
}

impl DriftCycle {
    pub fn new(config: DriftConfig, rng: &mut ParticleRng) -> Self {
        let mut cycle = Self {
            config,
            value: 0.0,
            interval: 0.0,
            duration: 0.0,
            last_change: 0.0,
            drifting: false,
        };
        cycle.reset(rng);
        cycle
    }

    /// Return to idle with a freshly rolled interval and duration
    pub fn reset(&mut self, rng: &mut ParticleRng) {
        self.value = 0.0;
        self.last_change = 0.0;
        self.drifting = false;
        self.interval = rng.span(&self.config.interval);
        self.duration = rng.span(&self.config.duration);
    }

    /// Advance to `timestamp` and return the magnitude to push to particles
    pub fn advance(&mut self, timestamp: f64, rng: &mut ParticleRng) -> f64 {
        let elapsed = timestamp - self.last_change;
        if !self.drifting {
            if elapsed > self.interval {
                self.drifting = true;
                self.value = rng.span(&self.config.force);
                self.duration = rng.span(&self.config.duration);
                self.last_change = timestamp;
            }
        } else if elapsed >= self.duration {
            self.drifting = false;
            self.value = 0.0;
            self.interval = rng.span(&self.config.interval);
            self.last_change = timestamp;
        }
        self.value
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_drifting(&self) -> bool {
        self.drifting
    }
}
