use bevy::{camera::ScalingMode, prelude::*};

use crate::config::ConfigLoaded;
use crate::player::components::Player;

/// Marker component for the game camera
#[derive(Component)]
pub struct GameCamera;

/// Simple orthographic 2D camera setup
pub fn setup_camera(mut commands: Commands, config: Res<ConfigLoaded>) {
  commands.spawn((
    GameCamera,
    Camera2d,
    Camera {
      order: 0,
      clear_color: ClearColorConfig::Custom(Color::srgb(0.08, 0.09, 0.12)),
      ..default()
    },
    Projection::Orthographic(OrthographicProjection {
      near: -1000.0,
      far: 1000.0,
      scale: 1.0,
      viewport_origin: Vec2::new(0.5, 0.5),
      scaling_mode: ScalingMode::AutoMin {
        min_width: config.camera.viewport_width,
        min_height: config.camera.viewport_height,
      },
      area: Rect::default(),
    }),
  ));
}

/// Keeps the runner centered. Runs in PostUpdate so the camera sees the
/// position written by this frame's fixed steps.
pub fn camera_follow(
  player_query: Query<&Transform, With<Player>>,
  mut camera_query: Query<&mut Transform, (With<GameCamera>, Without<Player>)>,
) {
  let Ok(player) = player_query.single() else {
    return;
  };
  let Ok(mut camera_transform) = camera_query.single_mut() else {
    return;
  };

  camera_transform.translation.x = player.translation.x;
  camera_transform.translation.y = player.translation.y;
}
