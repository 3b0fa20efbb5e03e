use bevy::prelude::*;

/// The runner, also the observer the level streams around.
#[derive(Component)]
pub struct Player;

/// Constant forward motion along +x.
#[derive(Component, Debug, Clone, Copy)]
pub struct Runner {
  /// World units per second.
  pub run_speed: f32,
}

/// Distance covered since spawn.
#[derive(Component, Default, Debug)]
pub struct DistanceRun(pub f32);
