//! Windowless simulation used by `--headless` and the end-to-end tests.

use std::time::Duration;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::config::{ConfigLoaded, GameConfig};
use crate::level::{LevelPlugin, LevelSeed, LevelStreamer};
use crate::player::PlayerPlugin;
use crate::player::components::{DistanceRun, Player};

/// Fixed simulation rate shared with the windowed game.
pub const TICK_HZ: f64 = 60.0;

#[derive(Debug, Clone, Copy)]
pub struct HeadlessOptions {
  /// Number of frames to run; each frame advances time by one tick.
  pub ticks: u32,
  /// Overrides the configured level seed.
  pub seed: Option<u64>,
  /// Installs Bevy's log subscriber. Off in tests, which share one process.
  pub log: bool,
}

impl Default for HeadlessOptions {
  fn default() -> Self {
    Self {
      ticks: 600,
      seed: None,
      log: false,
    }
  }
}

/// Summary of a headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessReport {
  pub spawned: u64,
  pub retired: u64,
  pub active: usize,
  pub frontier_x: f32,
  pub runner_x: f32,
  pub distance_run: f32,
}

/// Builds the simulation app without running it.
///
/// Time advances by exactly one tick per `App::update`, so runs are
/// reproducible when a seed is set.
pub fn build_app(config: GameConfig, seed: Option<u64>) -> App {
  let step = Duration::from_secs_f64(1.0 / TICK_HZ);

  let mut app = App::new();
  app
    .add_plugins(MinimalPlugins)
    .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
    .insert_resource(TimeUpdateStrategy::ManualDuration(step))
    .insert_resource(ConfigLoaded::from(config))
    .add_plugins(PlayerPlugin)
    .add_plugins(LevelPlugin);

  if let Some(seed) = seed {
    app.insert_resource(LevelSeed(seed));
  }
  app
}

/// Collects the current streaming state of a headless app.
pub fn report(app: &mut App) -> Option<HeadlessReport> {
  let world = app.world_mut();
  let (runner_x, distance_run) = world
    .query_filtered::<(&Transform, &DistanceRun), With<Player>>()
    .single(world)
    .ok()
    .map(|(transform, distance)| (transform.translation.x, distance.0))?;

  let streamer = world.get_resource::<LevelStreamer>()?;
  let frontier_x = streamer.frontier()?.right_anchor_world_position().x;

  Some(HeadlessReport {
    spawned: streamer.spawned_total(),
    retired: streamer.retired_total(),
    active: streamer.len(),
    frontier_x,
    runner_x,
    distance_run,
  })
}

/// Runs the level for `options.ticks` frames and reports the result.
pub fn run(config: GameConfig, options: HeadlessOptions) -> Option<HeadlessReport> {
  let mut app = build_app(config, options.seed);
  if options.log {
    app.add_plugins(LogPlugin::default());
  }
  for _ in 0..options.ticks {
    app.update();
  }
  report(&mut app)
}
