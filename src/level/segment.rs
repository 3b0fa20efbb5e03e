//! Segment prototypes and their placed instances.

use std::fmt;

use bevy::prelude::*;

/// Identifier handed out by the streamer for every spawned segment.
///
/// Ids are never reused within one streamer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub u64);

impl fmt::Display for SegmentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Extra static rectangle placed on top of a segment's floor.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentBlock {
  /// Center of the block, relative to the segment origin.
  pub offset: Vec2,
  pub size: Vec2,
}

/// Immutable template for a placeable level chunk.
///
/// Anchors are in the prototype's local space. The floor surface runs
/// along `y = 0` from `-size.x / 2` to `size.x / 2` unless the anchors
/// say otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPrototype {
  pub name: String,
  pub size: Vec2,
  pub left_anchor: Vec3,
  pub right_anchor: Vec3,
  pub color: [f32; 3],
  pub blocks: Vec<SegmentBlock>,
}

impl SegmentPrototype {
  /// Flat floor of the given size with anchors at the edge midpoints of
  /// its top surface.
  pub fn flat(name: impl Into<String>, size: Vec2) -> Self {
    Self {
      name: name.into(),
      size,
      left_anchor: Vec3::new(-size.x / 2.0, 0.0, 0.0),
      right_anchor: Vec3::new(size.x / 2.0, 0.0, 0.0),
      color: [0.5, 0.5, 0.5],
      blocks: Vec::new(),
    }
  }

  pub fn with_anchors(mut self, left: Vec3, right: Vec3) -> Self {
    self.left_anchor = left;
    self.right_anchor = right;
    self
  }

  pub fn with_color(mut self, color: [f32; 3]) -> Self {
    self.color = color;
    self
  }

  pub fn with_block(mut self, offset: Vec2, size: Vec2) -> Self {
    self.blocks.push(SegmentBlock { offset, size });
    self
  }

  /// Horizontal distance the chain advances when this prototype is placed.
  pub fn span(&self) -> f32 {
    self.right_anchor.x - self.left_anchor.x
  }
}

/// A prototype placed in the world and owned by the streamer.
#[derive(Debug, Clone)]
pub struct SegmentInstance {
  pub id: SegmentId,
  /// Index into the streamer's prototype set at spawn time.
  pub prototype: usize,
  /// Handle returned by the host when the segment was materialized.
  pub entity: Entity,
  pub origin: Vec3,
  pub rotation: Quat,
  left_anchor: Vec3,
  right_anchor: Vec3,
}

impl SegmentInstance {
  pub(crate) fn new(
    id: SegmentId,
    prototype_index: usize,
    prototype: &SegmentPrototype,
    entity: Entity,
    origin: Vec3,
    rotation: Quat,
  ) -> Self {
    Self {
      id,
      prototype: prototype_index,
      entity,
      origin,
      rotation,
      left_anchor: prototype.left_anchor,
      right_anchor: prototype.right_anchor,
    }
  }

  pub fn left_anchor_world_position(&self) -> Vec3 {
    self.origin + self.rotation * self.left_anchor
  }

  pub fn right_anchor_world_position(&self) -> Vec3 {
    self.origin + self.rotation * self.right_anchor
  }
}

/// Origin that puts `prototype`'s left anchor exactly on `attach_point`.
pub fn chained_origin(attach_point: Vec3, prototype: &SegmentPrototype, rotation: Quat) -> Vec3 {
  attach_point - rotation * prototype.left_anchor
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flat_prototype_anchors_sit_on_top_edge() {
    let proto = SegmentPrototype::flat("flat", Vec2::new(320.0, 32.0));
    assert_eq!(proto.left_anchor, Vec3::new(-160.0, 0.0, 0.0));
    assert_eq!(proto.right_anchor, Vec3::new(160.0, 0.0, 0.0));
    assert_eq!(proto.span(), 320.0);
  }

  #[test]
  fn chained_origin_lands_left_anchor_on_attach_point() {
    let proto = SegmentPrototype::flat("offset", Vec2::new(10.0, 2.0))
      .with_anchors(Vec3::new(-3.0, 1.0, 0.0), Vec3::new(7.0, 2.0, 0.0));
    let attach = Vec3::new(42.0, -5.0, 0.0);
    let origin = chained_origin(attach, &proto, Quat::IDENTITY);

    let instance = SegmentInstance::new(
      SegmentId(0),
      0,
      &proto,
      Entity::PLACEHOLDER,
      origin,
      Quat::IDENTITY,
    );
    assert!(instance.left_anchor_world_position().distance(attach) < 1e-5);
    assert!(
      instance
        .right_anchor_world_position()
        .distance(Vec3::new(52.0, -4.0, 0.0))
        < 1e-5
    );
  }
}
