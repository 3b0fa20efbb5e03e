pub mod components;
pub mod movement;
mod spawn;

#[cfg(test)]
mod tests;

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_systems(Startup, spawn::spawn_player)
      .add_systems(
        FixedUpdate,
        movement::advance_runner.before(PhysicsSet::SyncBackend),
      )
      .add_systems(Update, movement::update_runner_on_config_change);
  }
}
