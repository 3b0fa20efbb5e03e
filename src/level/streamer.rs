//! Just-in-time level segment streaming.
//!
//! The streamer keeps a gapless chain of segments ahead of an observer.
//! Every tick it measures the distance from the observer to the right
//! anchor of the most recent segment (the frontier) and, once that drops
//! below the trigger distance, appends a new segment whose left anchor
//! sits exactly on the frontier's right anchor. The oldest segments are
//! retired so that no more than `max_active_segments` are ever alive.

use std::collections::VecDeque;

use bevy::prelude::{Quat, Vec3};
use serde::Deserialize;

use super::error::StreamerError;
use super::host::SegmentHost;
use super::picker::PrototypePicker;
use super::segment::{SegmentId, SegmentInstance, SegmentPrototype, chained_origin};

/// How many segments a single tick may spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPolicy {
  /// At most one spawn per tick, and only when the observer is within the
  /// trigger distance of the frontier.
  #[default]
  Single,
  /// Keep spawning while a spawn is due, up to `max_per_tick` per tick.
  ///
  /// A spawn is also due when the observer has moved past the frontier's
  /// right anchor along x, which covers teleports and long frame spikes.
  CatchUp { max_per_tick: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamerConfig {
  pub spawn_trigger_distance: f32,
  pub max_active_segments: usize,
  /// Segments spawned by `initialize` before the observer moves.
  pub initial_segments: usize,
  /// World position of the very first segment's origin.
  pub origin: Vec3,
  pub spawn_policy: SpawnPolicy,
}

impl Default for StreamerConfig {
  fn default() -> Self {
    Self {
      spawn_trigger_distance: 400.0,
      max_active_segments: 6,
      initial_segments: 4,
      origin: Vec3::ZERO,
      spawn_policy: SpawnPolicy::Single,
    }
  }
}

impl StreamerConfig {
  pub fn validate(&self) -> Result<(), StreamerError> {
    if !self.spawn_trigger_distance.is_finite() || self.spawn_trigger_distance <= 0.0 {
      return Err(StreamerError::InvalidTriggerDistance(
        self.spawn_trigger_distance,
      ));
    }
    if self.max_active_segments < 1 {
      return Err(StreamerError::InvalidMaxActiveSegments(
        self.max_active_segments,
      ));
    }
    if self.initial_segments < 1 {
      return Err(StreamerError::InvalidInitialSegments(self.initial_segments));
    }
    if self.spawn_policy == (SpawnPolicy::CatchUp { max_per_tick: 0 }) {
      return Err(StreamerError::InvalidSpawnPolicy);
    }
    Ok(())
  }

  fn max_spawns_per_tick(&self) -> u32 {
    match self.spawn_policy {
      SpawnPolicy::Single => 1,
      SpawnPolicy::CatchUp { max_per_tick } => max_per_tick,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
  /// No segments yet; only `initialize` does anything.
  Uninitialized,
  Streaming,
}

/// What a single `tick` (or `initialize`) changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickOutcome {
  pub spawned: Vec<SegmentId>,
  pub retired: Vec<SegmentId>,
}

impl TickOutcome {
  pub fn is_empty(&self) -> bool {
    self.spawned.is_empty() && self.retired.is_empty()
  }
}

/// Owns the chain of active segments.
///
/// The active list is only reachable through `&self` accessors; all
/// mutation goes through [`initialize`](Self::initialize),
/// [`tick`](Self::tick), and the reconfiguration methods.
pub struct SegmentStreamer {
  config: StreamerConfig,
  state: StreamState,
  prototypes: Vec<SegmentPrototype>,
  picker: Box<dyn PrototypePicker>,
  active: VecDeque<SegmentInstance>,
  frontier: Option<SegmentId>,
  next_id: u64,
  spawned_total: u64,
  retired_total: u64,
  warned_uninitialized: bool,
}

impl SegmentStreamer {
  pub fn new(
    config: StreamerConfig,
    picker: impl PrototypePicker + 'static,
  ) -> Result<Self, StreamerError> {
    config.validate()?;
    Ok(Self {
      config,
      state: StreamState::Uninitialized,
      prototypes: Vec::new(),
      picker: Box::new(picker),
      active: VecDeque::new(),
      frontier: None,
      next_id: 0,
      spawned_total: 0,
      retired_total: 0,
      warned_uninitialized: false,
    })
  }

  /// Spawns the initial run of segments and starts streaming.
  ///
  /// The first segment is placed at `config.origin`, the rest chain off
  /// it. Retirement applies after every spawn, so an initial run longer
  /// than `max_active_segments` already retires its oldest segments.
  pub fn initialize(
    &mut self,
    prototypes: Vec<SegmentPrototype>,
    host: &mut impl SegmentHost,
  ) -> Result<TickOutcome, StreamerError> {
    if self.state == StreamState::Streaming {
      return Err(StreamerError::AlreadyInitialized);
    }
    validate_prototypes(&prototypes)?;
    self.prototypes = prototypes;

    let mut outcome = TickOutcome::default();
    for _ in 0..self.config.initial_segments {
      outcome.spawned.push(self.spawn_next(host));
      self.retire_excess(host, &mut outcome, usize::MAX);
    }

    self.state = StreamState::Streaming;
    log::info!(
      "Level streaming started: {} prototypes, {} active, frontier at {:?}",
      self.prototypes.len(),
      self.active.len(),
      self.frontier().map(|f| f.right_anchor_world_position()),
    );
    Ok(outcome)
  }

  /// Advances streaming for one simulation step.
  ///
  /// Must run after the observer's position for this step is final.
  pub fn tick(&mut self, observer: Vec3, host: &mut impl SegmentHost) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    if self.state == StreamState::Uninitialized || self.frontier().is_none() {
      if !self.warned_uninitialized {
        log::warn!("Level streamer ticked before initialize; ignoring");
        self.warned_uninitialized = true;
      }
      return outcome;
    }

    let budget = self.config.max_spawns_per_tick();
    let mut spawned = 0;
    while spawned < budget && self.spawn_due(observer) {
      outcome.spawned.push(self.spawn_next(host));
      spawned += 1;
    }

    // Under `Single` retirement is capped at one per tick too, so a lowered
    // maximum drains gradually.
    let retire_budget = match self.config.spawn_policy {
      SpawnPolicy::Single => 1,
      SpawnPolicy::CatchUp { .. } => usize::MAX,
    };
    self.retire_excess(host, &mut outcome, retire_budget);

    outcome
  }

  /// Swaps the streaming parameters. Already spawned segments stay put.
  pub fn reconfigure(&mut self, config: StreamerConfig) -> Result<(), StreamerError> {
    config.validate()?;
    self.config = config;
    Ok(())
  }

  /// Swaps the prototype set used by future spawns.
  ///
  /// Instances keep their anchors; their `prototype` index refers to the
  /// set that was current when they spawned.
  pub fn replace_prototypes(
    &mut self,
    prototypes: Vec<SegmentPrototype>,
  ) -> Result<(), StreamerError> {
    validate_prototypes(&prototypes)?;
    self.prototypes = prototypes;
    Ok(())
  }

  pub fn state(&self) -> StreamState {
    self.state
  }

  pub fn config(&self) -> &StreamerConfig {
    &self.config
  }

  pub fn prototypes(&self) -> &[SegmentPrototype] {
    &self.prototypes
  }

  /// Active segments, oldest (leftmost) first.
  pub fn active_segments(&self) -> impl ExactSizeIterator<Item = &SegmentInstance> {
    self.active.iter()
  }

  pub fn len(&self) -> usize {
    self.active.len()
  }

  pub fn is_empty(&self) -> bool {
    self.active.is_empty()
  }

  /// The most recently spawned segment.
  pub fn frontier(&self) -> Option<&SegmentInstance> {
    let id = self.frontier?;
    self.active.iter().rev().find(|s| s.id == id)
  }

  pub fn spawned_total(&self) -> u64 {
    self.spawned_total
  }

  pub fn retired_total(&self) -> u64 {
    self.retired_total
  }

  fn spawn_due(&self, observer: Vec3) -> bool {
    let Some(frontier) = self.frontier() else {
      return false;
    };
    let edge = frontier.right_anchor_world_position();
    if observer.distance(edge) < self.config.spawn_trigger_distance {
      return true;
    }
    matches!(self.config.spawn_policy, SpawnPolicy::CatchUp { .. }) && observer.x >= edge.x
  }

  fn spawn_next(&mut self, host: &mut impl SegmentHost) -> SegmentId {
    let index = self.picker.pick(self.prototypes.len());
    let prototype = &self.prototypes[index];
    let rotation = Quat::IDENTITY;

    let origin = match self.frontier() {
      Some(frontier) => {
        chained_origin(frontier.right_anchor_world_position(), prototype, rotation)
      }
      None => self.config.origin,
    };

    let id = SegmentId(self.next_id);
    self.next_id += 1;

    let entity = host.instantiate(id, prototype, origin, rotation);
    let instance = SegmentInstance::new(id, index, prototype, entity, origin, rotation);
    log::debug!(
      "Spawned segment {} '{}' at {:?}, right anchor {:?}",
      id,
      prototype.name,
      origin,
      instance.right_anchor_world_position(),
    );

    self.active.push_back(instance);
    self.frontier = Some(id);
    self.spawned_total += 1;
    id
  }

  fn retire_excess(
    &mut self,
    host: &mut impl SegmentHost,
    outcome: &mut TickOutcome,
    budget: usize,
  ) {
    let mut retired = 0;
    while retired < budget && self.active.len() > self.config.max_active_segments {
      let Some(oldest) = self.active.pop_front() else {
        break;
      };
      log::debug!("Retiring segment {}", oldest.id);
      outcome.retired.push(oldest.id);
      host.destroy(oldest);
      self.retired_total += 1;
      retired += 1;
    }
  }
}

fn validate_prototypes(prototypes: &[SegmentPrototype]) -> Result<(), StreamerError> {
  if prototypes.is_empty() {
    return Err(StreamerError::EmptyPrototypes);
  }
  if let Some(backwards) = prototypes.iter().find(|p| p.span() < 0.0) {
    return Err(StreamerError::BackwardsPrototype {
      name: backwards.name.clone(),
    });
  }
  Ok(())
}
