//! Flurry Runtime - Frame scheduling
//!
//! Provides the clock that drives the simulation loop:
//! - `FrameClock` - start/pause/stop capability that yields one timestamp per tick
//! - `FixedStepClock` - advances simulated time by a fixed quantum (60 Hz by default)
//! - `ClockState` - the clock's run state

mod clock;

pub use clock::{ClockState, FixedStepClock, FrameClock, DEFAULT_FRAME_RATE};
