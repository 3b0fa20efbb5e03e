//! Endless 2D runner for Bevy.
//!
//! The level is a chain of segments streamed just ahead of the runner:
//! see [`level::SegmentStreamer`] for the streaming rules and
//! [`level::LevelPlugin`] for how the game drives it.

pub mod config;
pub mod core;
pub mod headless;
pub mod level;
pub mod player;
#[cfg(feature = "visual_debug")]
pub mod visual_debug;
