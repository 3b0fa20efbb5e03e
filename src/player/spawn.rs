use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::{DistanceRun, Player, Runner};
use crate::config::ConfigLoaded;

/// Spawn the runner at the configured position.
pub fn spawn_player(mut commands: Commands, config: Res<ConfigLoaded>) {
  let player = &config.player;
  let spawn_pos = Vec3::new(player.spawn_x, player.spawn_y, 10.0);
  let [r, g, b] = player.color;

  // Rapier capsule_y uses half_height (cylinder part) and radius
  let half_height = player.collider_length / 2.0;

  info!("Spawning runner at {:?}", spawn_pos);
  commands.spawn((
    Player,
    Name::new("runner"),
    Runner {
      run_speed: player.run_speed,
    },
    DistanceRun::default(),
    Sprite {
      color: Color::srgb(r, g, b),
      custom_size: Some(Vec2::from(player.size)),
      ..default()
    },
    Transform::from_translation(spawn_pos),
    RigidBody::KinematicPositionBased,
    Collider::capsule_y(half_height, player.collider_radius),
  ));
}
