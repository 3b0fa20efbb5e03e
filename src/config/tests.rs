use std::io::Write;

use bevy::prelude::*;

use super::*;
use crate::level::SpawnPolicy;

const MINIMAL: &str = r##"
[window]
width = 800
height = 600
title = "test"

[camera]
viewport_width = 320.0
viewport_height = 180.0

[physics]
length_unit = 50.0

[player]
spawn_x = 0.0
spawn_y = 10.0
run_speed = 100.0
collider_radius = 5.0
collider_length = 10.0
size = [10.0, 20.0]
color = "#ff0000"

[level]
spawn_trigger_distance = 10.0
max_active_segments = 3

[[level.segments]]
name = "a"
width = 10.0
height = 2.0
color = "#00ff00"

[[level.segments]]
name = "b"
width = 5.0
height = 2.0
left_anchor = [-2.5, 1.0]
right_anchor = [2.5, 3.0]
color = "#0000ff"
blocks = [{ offset = [1.0, 1.0], size = [1.0, 2.0] }]
"##;

#[test]
fn shipped_config_parses() {
  let config = parse_config(include_str!("../../assets/config/game.config.toml"))
    .expect("shipped config should parse");

  assert!(!config.level.segments.is_empty());
  assert_eq!(config.level.spawn_policy, SpawnPolicy::Single);
  config
    .level
    .streamer_config()
    .validate()
    .expect("shipped streamer config should be valid");
  assert!(config.level.prototypes().iter().all(|p| p.span() > 0.0));
}

#[test]
fn level_defaults_apply_when_omitted() {
  let config = parse_config(MINIMAL).unwrap();
  let level = &config.level;

  assert_eq!(level.initial_segments, 4);
  assert_eq!(level.origin, [0.0, 0.0]);
  assert_eq!(level.spawn_policy, SpawnPolicy::Single);
  assert_eq!(level.seed, None);

  let streamer = level.streamer_config();
  assert_eq!(streamer.max_active_segments, 3);
  assert_eq!(streamer.origin, Vec3::ZERO);
}

#[test]
fn prototypes_use_edge_anchors_unless_overridden() {
  let config = parse_config(MINIMAL).unwrap();
  let prototypes = config.level.prototypes();

  assert_eq!(prototypes.len(), 2);
  assert_eq!(prototypes[0].left_anchor, Vec3::new(-5.0, 0.0, 0.0));
  assert_eq!(prototypes[0].right_anchor, Vec3::new(5.0, 0.0, 0.0));
  assert_eq!(prototypes[0].color, [0.0, 1.0, 0.0]);

  assert_eq!(prototypes[1].left_anchor, Vec3::new(-2.5, 1.0, 0.0));
  assert_eq!(prototypes[1].right_anchor, Vec3::new(2.5, 3.0, 0.0));
  assert_eq!(prototypes[1].blocks.len(), 1);
  assert_eq!(prototypes[1].blocks[0].size, Vec2::new(1.0, 2.0));
}

#[test]
fn catch_up_policy_parses_from_inline_table() {
  let source = MINIMAL.replace(
    "max_active_segments = 3",
    "max_active_segments = 3\nspawn_policy = { catch_up = { max_per_tick = 4 } }\nseed = 9",
  );
  let config = parse_config(&source).unwrap();

  assert_eq!(
    config.level.spawn_policy,
    SpawnPolicy::CatchUp { max_per_tick: 4 }
  );
  assert_eq!(config.level.seed, Some(9));
}

#[test]
fn bad_hex_color_is_a_parse_error() {
  let source = MINIMAL.replace("\"#ff0000\"", "\"#ff00\"");
  let err = parse_config(&source).unwrap_err();
  assert!(matches!(err, ConfigError::Parse(_)), "got {err}");
}

#[test]
fn bad_hex_color_with_multibyte_char_is_a_parse_error() {
  // 6 bytes, but 'é' straddles the first channel boundary
  let source = MINIMAL.replace("\"#ff0000\"", "\"#aé123\"");
  let err = parse_config(&source).unwrap_err();
  assert!(matches!(err, ConfigError::Parse(_)), "got {err}");
}

#[test]
fn load_config_from_reads_file() {
  let mut file = tempfile::NamedTempFile::new().unwrap();
  file.write_all(MINIMAL.as_bytes()).unwrap();

  let config = load_config_from(file.path()).unwrap();
  assert_eq!(config.window.title, "test");
}

#[test]
fn load_config_from_missing_file_is_io_error() {
  let dir = tempfile::tempdir().unwrap();
  let err = load_config_from(dir.path().join("missing.toml")).unwrap_err();
  assert!(matches!(err, ConfigError::Io(_)), "got {err}");
}
