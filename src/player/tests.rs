use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use super::components::*;
use super::{PlayerPlugin, movement};
use crate::config::{ConfigLoaded, parse_config};

const STEP: f64 = 1.0 / 60.0;

fn test_config() -> ConfigLoaded {
  let config = parse_config(include_str!("../../assets/config/game.config.toml"))
    .expect("shipped config should parse");
  ConfigLoaded::from(config)
}

fn fixed_step_app() -> App {
  let mut app = App::new();
  app
    .add_plugins(MinimalPlugins)
    .insert_resource(Time::<Fixed>::from_seconds(STEP))
    .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
      STEP,
    )));
  app
}

#[test]
fn runner_moves_right_at_run_speed() {
  let mut app = fixed_step_app();
  app.add_systems(FixedUpdate, movement::advance_runner);

  let runner = app
    .world_mut()
    .spawn((
      Player,
      Runner { run_speed: 120.0 },
      DistanceRun::default(),
      Transform::from_xyz(0.0, 24.0, 0.0),
    ))
    .id();

  let updates = 60;
  for _ in 0..updates {
    app.update();
  }

  let transform = app.world().get::<Transform>(runner).unwrap();
  let distance = app.world().get::<DistanceRun>(runner).unwrap().0;
  let per_step = 120.0 * STEP as f32;

  // Fixed steps lag the frame clock by at most a couple of steps
  assert!(
    transform.translation.x >= per_step * (updates - 2) as f32
      && transform.translation.x <= per_step * (updates + 1) as f32,
    "runner at x={} after {} updates",
    transform.translation.x,
    updates
  );
  assert_eq!(transform.translation.y, 24.0, "runner should not drift vertically");
  assert!((distance - transform.translation.x).abs() < 1e-3);
}

#[test]
fn plugin_spawns_runner_from_config() {
  let mut app = fixed_step_app();
  let config = test_config();
  let expected = Vec2::new(config.player.spawn_x, config.player.spawn_y);
  let speed = config.player.run_speed;
  app.insert_resource(config).add_plugins(PlayerPlugin);

  app.update();

  let mut runners = app
    .world_mut()
    .query_filtered::<(&Transform, &Runner), With<Player>>();
  let (transform, runner) = runners.single(app.world()).expect("one runner");
  assert!(transform.translation.truncate().distance(expected) < speed * 0.1);
  assert_eq!(runner.run_speed, speed);
}

#[test]
fn run_speed_follows_config_changes() {
  let mut app = fixed_step_app();
  app.insert_resource(test_config()).add_plugins(PlayerPlugin);
  app.update();

  app.world_mut().resource_mut::<ConfigLoaded>().player.run_speed = 999.0;
  app.update();

  let mut runners = app.world_mut().query::<&Runner>();
  let runner = runners.single(app.world()).expect("one runner");
  assert_eq!(runner.run_speed, 999.0);
}
