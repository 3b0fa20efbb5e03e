use bevy::prelude::*;

use crate::level::LevelStreamer;
use crate::player::components::Player;

/// Resource for frame-by-frame debug mode
#[derive(Resource, Default)]
pub struct FrameStepMode {
  pub enabled: bool,
  advance_requested: bool,
}

pub struct VisualDebugPlugin;

impl Plugin for VisualDebugPlugin {
  fn build(&self, app: &mut App) {
    app
      .init_resource::<FrameStepMode>()
      .add_systems(PreUpdate, frame_step_control)
      .add_systems(Update, draw_segment_anchors);
  }
}

/// Controls frame-by-frame stepping mode
/// F5: Toggle frame-step mode
/// Right Arrow: Advance one frame (when in frame-step mode)
fn frame_step_control(
  keyboard: Res<ButtonInput<KeyCode>>,
  mut frame_step: ResMut<FrameStepMode>,
  mut time: ResMut<Time<Virtual>>,
) {
  if keyboard.just_pressed(KeyCode::F5) {
    frame_step.enabled = !frame_step.enabled;
    if frame_step.enabled {
      time.pause();
      info!("Frame-step mode ENABLED (press Right Arrow to advance, F5 to disable)");
    } else {
      time.unpause();
      info!("Frame-step mode DISABLED");
    }
  }

  if frame_step.enabled {
    if keyboard.just_pressed(KeyCode::ArrowRight) {
      // Request advance - unpause for this frame
      frame_step.advance_requested = true;
      time.unpause();
    } else if frame_step.advance_requested {
      frame_step.advance_requested = false;
      time.pause();
    }
  }
}

/// Draws left anchors (cyan), right anchors (magenta), the chain between
/// them, and the spawn trigger radius around the frontier (yellow, red once
/// the runner is inside it).
fn draw_segment_anchors(
  mut gizmos: Gizmos,
  streamer: Option<Res<LevelStreamer>>,
  runners: Query<&Transform, With<Player>>,
) {
  const ANCHOR_RADIUS: f32 = 4.0;

  let Some(streamer) = streamer else {
    return;
  };

  for segment in streamer.active_segments() {
    let left = segment.left_anchor_world_position().truncate();
    let right = segment.right_anchor_world_position().truncate();
    gizmos.line_2d(left, right, Color::srgb(0.6, 0.6, 0.6));
    gizmos.circle_2d(
      Isometry2d::from_translation(left),
      ANCHOR_RADIUS,
      Color::srgb(0.0, 1.0, 1.0),
    );
    gizmos.circle_2d(
      Isometry2d::from_translation(right),
      ANCHOR_RADIUS,
      Color::srgb(1.0, 0.0, 1.0),
    );
  }

  let Some(frontier) = streamer.frontier() else {
    return;
  };
  let edge = frontier.right_anchor_world_position();
  let trigger = streamer.config().spawn_trigger_distance;
  let inside = runners
    .iter()
    .any(|runner| runner.translation.distance(edge) < trigger);
  let color = if inside {
    Color::srgb(1.0, 0.2, 0.2)
  } else {
    Color::srgb(1.0, 1.0, 0.0)
  };
  gizmos.circle_2d(Isometry2d::from_translation(edge.truncate()), trigger, color);
}
