//! Endless level built from streamed segments.
//!
//! - [`SegmentStreamer`]: the chain of segments, free of any schedule or system
//! - [`SegmentHost`]: materializes segments, implemented for [`Commands`]
//! - [`LevelPlugin`]: drives the streamer from the runner's position

mod error;
mod host;
mod picker;
mod segment;
mod streamer;


use bevy::prelude::*;
use bevy_rapier2d::prelude::PhysicsSet;
pub use error::StreamerError;
pub use host::{LevelSegment, SegmentHost};
pub use picker::{PrototypePicker, SeededPicker, SequencePicker};
pub use segment::{SegmentBlock, SegmentId, SegmentInstance, SegmentPrototype, chained_origin};
pub use streamer::{SegmentStreamer, SpawnPolicy, StreamState, StreamerConfig, TickOutcome};

use crate::config::ConfigLoaded;
use crate::player::components::Player;
use crate::player::movement;

/// The level's streamer, created at startup from [`ConfigLoaded`].
#[derive(Resource, Deref, DerefMut)]
pub struct LevelStreamer(pub SegmentStreamer);

/// Overrides the configured RNG seed (e.g. from the command line).
#[derive(Resource, Debug, Clone, Copy)]
pub struct LevelSeed(pub u64);

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_systems(Startup, setup_level)
      .add_systems(
        FixedUpdate,
        stream_level
          .after(movement::advance_runner)
          .before(PhysicsSet::SyncBackend),
      )
      .add_systems(Update, update_streamer_on_config_change);
  }
}

/// Builds the streamer and spawns the initial run of segments.
///
/// Configuration errors abort startup through the system's `Result`.
fn setup_level(
  mut commands: Commands,
  config: Res<ConfigLoaded>,
  seed_override: Option<Res<LevelSeed>>,
) -> Result {
  let level = &config.level;
  let seed = seed_override.map(|s| s.0).or(level.seed);
  let picker = match seed {
    Some(seed) => {
      info!("Level RNG seeded with {}", seed);
      SeededPicker::new(seed)
    }
    None => SeededPicker::from_os_rng(),
  };

  let mut streamer = SegmentStreamer::new(level.streamer_config(), picker)?;
  let outcome = streamer.initialize(level.prototypes(), &mut commands)?;
  debug!(
    "Initial level: spawned {}, retired {}",
    outcome.spawned.len(),
    outcome.retired.len()
  );

  commands.insert_resource(LevelStreamer(streamer));
  Ok(())
}

/// Runs once per fixed step, after the runner's position is final.
fn stream_level(
  mut commands: Commands,
  streamer: Option<ResMut<LevelStreamer>>,
  runners: Query<&Transform, With<Player>>,
) {
  let Some(mut streamer) = streamer else {
    return;
  };
  let Ok(runner) = runners.single() else {
    return;
  };

  let outcome = streamer.tick(runner.translation, &mut commands);
  if !outcome.is_empty() {
    debug!(
      "Streamed: +{:?} -{:?} ({} active)",
      outcome.spawned,
      outcome.retired,
      streamer.len()
    );
  }
}

fn update_streamer_on_config_change(
  config: Res<ConfigLoaded>,
  streamer: Option<ResMut<LevelStreamer>>,
) {
  if !config.is_changed() {
    return;
  }
  let Some(mut streamer) = streamer else {
    return;
  };

  let level = &config.level;
  let streamer_config = level.streamer_config();
  if streamer.config() != &streamer_config {
    match streamer.reconfigure(streamer_config) {
      Ok(()) => info!("Level streaming reconfigured"),
      Err(e) => warn!("Ignoring level config change: {}", e),
    }
  }

  let prototypes = level.prototypes();
  if streamer.prototypes() != prototypes.as_slice() {
    match streamer.replace_prototypes(prototypes) {
      Ok(()) => info!("Level segments reloaded"),
      Err(e) => warn!("Ignoring level segment change: {}", e),
    }
  }
}
