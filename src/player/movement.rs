use bevy::prelude::*;

use super::components::{DistanceRun, Player, Runner};
use crate::config::ConfigLoaded;

/// Moves the runner forward. Runs in FixedUpdate; the level streamer reads
/// the resulting position in the same step.
pub fn advance_runner(
  mut runners: Query<(&Runner, &mut Transform, &mut DistanceRun), With<Player>>,
  time: Res<Time>,
) {
  for (runner, mut transform, mut distance) in &mut runners {
    let step = runner.run_speed * time.delta_secs();
    transform.translation.x += step;
    distance.0 += step;
  }
}

pub fn update_runner_on_config_change(
  config: Res<ConfigLoaded>,
  mut runners: Query<&mut Runner, With<Player>>,
) {
  if config.is_changed() {
    for mut runner in &mut runners {
      runner.run_speed = config.player.run_speed;
    }
  }
}
