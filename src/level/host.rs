//! Materialization of segments as Bevy entities.

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::segment::{SegmentId, SegmentInstance, SegmentPrototype};

/// Creates and removes the world objects behind streamed segments.
pub trait SegmentHost {
  /// Materializes `prototype` with its origin at `position`.
  fn instantiate(
    &mut self,
    id: SegmentId,
    prototype: &SegmentPrototype,
    position: Vec3,
    rotation: Quat,
  ) -> Entity;

  /// Removes a retired segment.
  ///
  /// Implementations must tolerate the entity still being read during the
  /// current frame.
  fn destroy(&mut self, instance: SegmentInstance);
}

/// Root entity of a streamed segment.
#[derive(Component, Debug, Clone, Copy)]
pub struct LevelSegment {
  pub id: SegmentId,
}

/// Segments are spawned and despawned through the command queue, so
/// removal only takes effect once Bevy applies the buffered commands.
impl SegmentHost for Commands<'_, '_> {
  fn instantiate(
    &mut self,
    id: SegmentId,
    prototype: &SegmentPrototype,
    position: Vec3,
    rotation: Quat,
  ) -> Entity {
    let [r, g, b] = prototype.color;
    let color = Color::srgb(r, g, b);
    let block_color = Color::srgb(r * 0.8, g * 0.8, b * 0.8);
    let floor = prototype.size;

    self
      .spawn((
        LevelSegment { id },
        Name::new(format!("segment {id} ({})", prototype.name)),
        Transform::from_translation(position).with_rotation(rotation),
        Visibility::default(),
      ))
      .with_children(|parent| {
        // Floor top surface sits on y = 0
        parent.spawn((
          Sprite {
            color,
            custom_size: Some(floor),
            ..default()
          },
          Transform::from_xyz(0.0, -floor.y / 2.0, 0.0),
          RigidBody::Fixed,
          Collider::cuboid(floor.x / 2.0, floor.y / 2.0),
        ));

        for block in &prototype.blocks {
          parent.spawn((
            Sprite {
              color: block_color,
              custom_size: Some(block.size),
              ..default()
            },
            Transform::from_xyz(block.offset.x, block.offset.y, 0.0),
            RigidBody::Fixed,
            Collider::cuboid(block.size.x / 2.0, block.size.y / 2.0),
          ));
        }
      })
      .id()
  }

  fn destroy(&mut self, instance: SegmentInstance) {
    // Despawn is recursive, children go with the root
    self.entity(instance.entity).despawn();
  }
}
