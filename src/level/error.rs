use std::fmt;

/// Configuration problems that stop the streamer from running.
///
/// These are raised at construction, `initialize`, or reconfiguration and
/// are never retried.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamerError {
  /// `initialize` or `replace_prototypes` got an empty prototype set.
  EmptyPrototypes,
  /// `max_active_segments` was zero.
  InvalidMaxActiveSegments(usize),
  /// `spawn_trigger_distance` was zero, negative, or not finite.
  InvalidTriggerDistance(f32),
  /// `initial_segments` was zero.
  InvalidInitialSegments(usize),
  /// `SpawnPolicy::CatchUp` with `max_per_tick == 0`.
  InvalidSpawnPolicy,
  /// A prototype's right anchor lies left of its left anchor.
  BackwardsPrototype { name: String },
  /// `initialize` was called on a streamer that is already streaming.
  AlreadyInitialized,
}

impl fmt::Display for StreamerError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::EmptyPrototypes => write!(f, "segment prototype set is empty"),
      Self::InvalidMaxActiveSegments(n) => {
        write!(f, "max_active_segments must be at least 1, got {n}")
      }
      Self::InvalidTriggerDistance(d) => {
        write!(f, "spawn_trigger_distance must be finite and positive, got {d}")
      }
      Self::InvalidInitialSegments(n) => {
        write!(f, "initial_segments must be at least 1, got {n}")
      }
      Self::InvalidSpawnPolicy => write!(f, "catch-up spawn policy needs max_per_tick >= 1"),
      Self::BackwardsPrototype { name } => {
        write!(f, "prototype '{name}' has its right anchor left of its left anchor")
      }
      Self::AlreadyInitialized => write!(f, "streamer is already initialized"),
    }
  }
}

impl std::error::Error for StreamerError {}
