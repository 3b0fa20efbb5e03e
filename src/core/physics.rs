use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::config::ConfigLoaded;

/// Rapier with the configured length unit. Segment geometry is static and
/// the runner is kinematic, so gravity is never read.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
  fn build(&self, app: &mut App) {
    let length_unit = app
      .world()
      .get_resource::<ConfigLoaded>()
      .map(|config| config.physics.length_unit)
      .unwrap_or(50.0);

    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default().with_length_unit(length_unit));
  }
}
