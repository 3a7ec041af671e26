//! Flurry Core - Foundational types for the Flurry particle engine
//!
//! This crate provides the core types that all other Flurry crates depend on:
//! - `EmitterId` - Sequential emitter identifiers
//! - `Span` - Inclusive numeric ranges used by every randomized parameter
//! - `Vec2`, `Rect` - 2D spatial types
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{FlurryError, Result};
pub use id::{EmitterId, IdAllocator};
pub use types::{Rect, Span, Vec2};
