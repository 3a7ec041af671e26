//! Frame clock with a fixed simulated time quantum

use std::time::Duration;

/// Nominal ticks per second
pub const DEFAULT_FRAME_RATE: f64 = 60.0;

/// Run state of a frame clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    /// Not ticking, accumulated time is zero
    Stopped,
    /// Ticking; every tick yields a new timestamp
    Running,
    /// Not ticking, accumulated time preserved for the next `start`
    Paused,
}

/// The scheduling primitive that drives the engine.
///
/// The owner pumps `tick` once per host frame. While the clock is running
/// each tick yields a strictly increasing timestamp in milliseconds; while it
/// is stopped or paused, `tick` yields nothing and the simulation holds still.
pub trait FrameClock {
    /// Begin ticking. Has no effect while already running.
    fn start(&mut self);

    /// Halt ticking, keeping accumulated time
    fn pause(&mut self);

    /// Halt ticking and reset accumulated time to zero
    fn stop(&mut self);

    fn state(&self) -> ClockState;

    /// Advance one tick, returning the new timestamp if the clock is running
    fn tick(&mut self) -> Option<f64>;

    /// Accumulated simulated time in milliseconds
    fn now(&self) -> f64;

    fn is_running(&self) -> bool {
        self.state() == ClockState::Running
    }
}

/// Advances simulated time by a fixed quantum per tick instead of measuring
/// wall-clock deltas, so a host that stalls or suspends the loop never makes
/// the simulation jump.
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    /// Total simulated time in milliseconds
    total_time: f64,
    /// Milliseconds added per tick (default: 1000/60)
    fixed_timestep: f64,
    /// Ticks since the last stop
    frame_count: u64,
    state: ClockState,
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::with_rate(DEFAULT_FRAME_RATE)
    }
}

impl FixedStepClock {
    /// Create a clock with the default 60 Hz quantum
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock ticking `hz` times per simulated second
    pub fn with_rate(hz: f64) -> Self {
        let hz = if hz > 0.0 { hz } else { DEFAULT_FRAME_RATE };
        Self {
            total_time: 0.0,
            fixed_timestep: 1000.0 / hz,
            frame_count: 0,
            state: ClockState::Stopped,
        }
    }

    /// Milliseconds of simulated time per tick
    pub fn fixed_timestep(&self) -> f64 {
        self.fixed_timestep
    }

    /// Wall-clock length of one tick, for hosts that pace the loop themselves
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(self.fixed_timestep / 1000.0)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl FrameClock for FixedStepClock {
    fn start(&mut self) {
        if self.state == ClockState::Running {
            return;
        }
        log::debug!("clock started at {:.3}ms", self.total_time);
        self.state = ClockState::Running;
    }

    fn pause(&mut self) {
        if self.state == ClockState::Running {
            log::debug!("clock paused at {:.3}ms", self.total_time);
            self.state = ClockState::Paused;
        }
    }

    fn stop(&mut self) {
        self.state = ClockState::Stopped;
        self.total_time = 0.0;
        self.frame_count = 0;
    }

    fn state(&self) -> ClockState {
        self.state
    }

    fn tick(&mut self) -> Option<f64> {
        if self.state != ClockState::Running {
            return None;
        }
        self.frame_count += 1;
        // Derived from the frame count so that rounding never accumulates
        self.total_time = self.frame_count as f64 * self.fixed_timestep;
        Some(self.total_time)
    }

    fn now(&self) -> f64 {
        self.total_time
    }
}
