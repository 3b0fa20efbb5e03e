mod plugin;

use std::path::Path;
use std::{fmt, io};

use bevy::{asset::Asset, prelude::*, reflect::TypePath};
pub use plugin::ConfigPlugin;
use serde::{Deserialize, Deserializer, de};

use crate::level::{SegmentPrototype, SpawnPolicy, StreamerConfig};

/// Path of the game config relative to the asset root.
pub const CONFIG_ASSET_PATH: &str = "config/game.config.toml";
/// Path of the game config relative to the working directory.
pub const CONFIG_FILE_PATH: &str = "assets/config/game.config.toml";

#[derive(Asset, TypePath, Deserialize, Debug, Clone)]
pub struct GameConfig {
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub physics: PhysicsConfig,
  pub player: PlayerConfig,
  pub level: LevelConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WindowConfig {
  pub width: u32,
  pub height: u32,
  pub title: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CameraConfig {
  pub viewport_width: f32,
  pub viewport_height: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PhysicsConfig {
  /// Rapier length unit, in world units per meter.
  pub length_unit: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlayerConfig {
  pub spawn_x: f32,
  pub spawn_y: f32,
  pub run_speed: f32,
  pub collider_radius: f32,
  pub collider_length: f32,
  pub size: [f32; 2],
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub color: [f32; 3],
}

#[derive(Deserialize, Debug, Clone)]
pub struct LevelConfig {
  pub spawn_trigger_distance: f32,
  pub max_active_segments: usize,
  #[serde(default = "default_initial_segments")]
  pub initial_segments: usize,
  #[serde(default)]
  pub origin: [f32; 2],
  #[serde(default)]
  pub spawn_policy: SpawnPolicy,
  /// Fixed RNG seed; entropy-seeded when absent.
  #[serde(default)]
  pub seed: Option<u64>,
  pub segments: Vec<SegmentConfig>,
}

fn default_initial_segments() -> usize {
  4
}

#[derive(Deserialize, Debug, Clone)]
pub struct SegmentConfig {
  pub name: String,
  pub width: f32,
  pub height: f32,
  /// Defaults to the left end of the floor's top edge.
  #[serde(default)]
  pub left_anchor: Option<[f32; 2]>,
  /// Defaults to the right end of the floor's top edge.
  #[serde(default)]
  pub right_anchor: Option<[f32; 2]>,
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub color: [f32; 3],
  #[serde(default)]
  pub blocks: Vec<BlockConfig>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockConfig {
  pub offset: [f32; 2],
  pub size: [f32; 2],
}

impl LevelConfig {
  pub fn streamer_config(&self) -> StreamerConfig {
    StreamerConfig {
      spawn_trigger_distance: self.spawn_trigger_distance,
      max_active_segments: self.max_active_segments,
      initial_segments: self.initial_segments,
      origin: Vec3::new(self.origin[0], self.origin[1], 0.0),
      spawn_policy: self.spawn_policy,
    }
  }

  pub fn prototypes(&self) -> Vec<SegmentPrototype> {
    self.segments.iter().map(SegmentConfig::to_prototype).collect()
  }
}

impl SegmentConfig {
  pub fn to_prototype(&self) -> SegmentPrototype {
    let mut proto =
      SegmentPrototype::flat(self.name.clone(), Vec2::new(self.width, self.height))
        .with_color(self.color);
    if let Some([x, y]) = self.left_anchor {
      proto.left_anchor = Vec3::new(x, y, 0.0);
    }
    if let Some([x, y]) = self.right_anchor {
      proto.right_anchor = Vec3::new(x, y, 0.0);
    }
    for block in &self.blocks {
      proto = proto.with_block(Vec2::from(block.offset), Vec2::from(block.size));
    }
    proto
  }
}

fn deserialize_hex_color<'de, D>(deserializer: D) -> Result<[f32; 3], D::Error>
where
  D: Deserializer<'de>,
{
  let s: String = Deserialize::deserialize(deserializer)?;
  let s = s.trim_start_matches('#');
  if s.len() != 6 || !s.is_ascii() {
    return Err(de::Error::custom("hex color must be 6 hex digits"));
  }
  let r = u8::from_str_radix(&s[0..2], 16).map_err(de::Error::custom)?;
  let g = u8::from_str_radix(&s[2..4], 16).map_err(de::Error::custom)?;
  let b = u8::from_str_radix(&s[4..6], 16).map_err(de::Error::custom)?;
  Ok([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

/// Error reading the game config.
#[derive(Debug)]
pub enum ConfigError {
  Io(io::Error),
  Parse(toml::de::Error),
}

impl From<io::Error> for ConfigError {
  fn from(err: io::Error) -> Self {
    Self::Io(err)
  }
}

impl From<toml::de::Error> for ConfigError {
  fn from(err: toml::de::Error) -> Self {
    Self::Parse(err)
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Io(e) => write!(f, "I/O error: {e}"),
      Self::Parse(e) => write!(f, "parse error: {e}"),
    }
  }
}

impl std::error::Error for ConfigError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io(e) => Some(e),
      Self::Parse(e) => Some(e),
    }
  }
}

pub fn parse_config(source: &str) -> Result<GameConfig, ConfigError> {
  Ok(toml::from_str(source)?)
}

pub fn load_config_from(path: impl AsRef<Path>) -> Result<GameConfig, ConfigError> {
  let source = std::fs::read_to_string(path)?;
  parse_config(&source)
}

/// Loads the game config shipped with the game.
pub fn load_config() -> Result<GameConfig, ConfigError> {
  // WASM: embed config at compile time (no filesystem access)
  #[cfg(target_family = "wasm")]
  return parse_config(include_str!("../../assets/config/game.config.toml"));
  #[cfg(not(target_family = "wasm"))]
  load_config_from(CONFIG_FILE_PATH)
}

#[derive(Resource)]
pub struct ConfigHandle(pub Handle<GameConfig>);

#[derive(Resource, Debug, Clone)]
pub struct ConfigLoaded {
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub physics: PhysicsConfig,
  pub player: PlayerConfig,
  pub level: LevelConfig,
}

impl From<GameConfig> for ConfigLoaded {
  fn from(config: GameConfig) -> Self {
    Self {
      window: config.window,
      camera: config.camera,
      physics: config.physics,
      player: config.player,
      level: config.level,
    }
  }
}

#[cfg(test)]
mod tests;
