use bevy::prelude::*;
use bevy::window::{PresentMode, WindowMode, WindowResolution};
use clap::Parser;
use runner2d::headless::{self, HeadlessOptions, TICK_HZ};
use runner2d::level::{LevelPlugin, LevelSeed};
use runner2d::{config, core, player};

#[derive(Parser, Debug)]
#[command(name = "runner2d", about = "Endless runner with streamed level segments")]
struct Args {
  /// Run the simulation without a window and print a summary
  #[arg(long)]
  headless: bool,
  /// Frames to simulate in headless mode
  #[arg(long, default_value_t = 600)]
  ticks: u32,
  /// Level RNG seed, overrides the config file
  #[arg(long)]
  seed: Option<u64>,
}

fn main() -> AppExit {
  let args = Args::parse();

  let config = match config::load_config() {
    Ok(config) => config,
    Err(e) => {
      eprintln!("Failed to load {}: {}", config::CONFIG_FILE_PATH, e);
      return AppExit::error();
    }
  };

  if args.headless {
    return run_headless(config, &args);
  }

  let mut app = App::new();

  app.insert_resource(Time::<Fixed>::from_hz(TICK_HZ));
  if let Some(seed) = args.seed {
    app.insert_resource(LevelSeed(seed));
  }

  app
    .add_plugins(
      DefaultPlugins
        .set(ImagePlugin::default_nearest())
        .set(WindowPlugin {
          primary_window: Some(Window {
            resolution: WindowResolution::new(config.window.width, config.window.height),
            title: config.window.title.clone(),
            // WASM: only Fifo (vsync) is supported on WebGL2
            #[cfg(target_family = "wasm")]
            present_mode: PresentMode::Fifo,
            #[cfg(not(target_family = "wasm"))]
            present_mode: PresentMode::AutoVsync,
            #[cfg(target_family = "wasm")]
            canvas: Some("#bevy".to_string()),
            #[cfg(target_family = "wasm")]
            fit_canvas_to_parent: true,
            mode: WindowMode::Windowed,
            ..default()
          }),
          ..default()
        })
        // Disable 3D PBR plugin - removes SSAO, atmosphere, environment map warnings on WebGL2
        .disable::<bevy::pbr::PbrPlugin>(),
    )
    .add_plugins(config::ConfigPlugin::new(config))
    .add_plugins(core::CorePlugin)
    .add_plugins(player::PlayerPlugin)
    .add_plugins(LevelPlugin);

  #[cfg(feature = "visual_debug")]
  app.add_plugins(runner2d::visual_debug::VisualDebugPlugin);

  app.run()
}

fn run_headless(config: config::GameConfig, args: &Args) -> AppExit {
  let options = HeadlessOptions {
    ticks: args.ticks,
    seed: args.seed,
    log: true,
  };

  match headless::run(config, options) {
    Some(report) => {
      info!(
        "Headless run finished after {} ticks: runner at x={:.1} ({:.1} run), frontier at x={:.1}, {} active, {} spawned, {} retired",
        args.ticks,
        report.runner_x,
        report.distance_run,
        report.frontier_x,
        report.active,
        report.spawned,
        report.retired,
      );
      AppExit::Success
    }
    None => {
      error!("Headless run ended without a runner or level");
      AppExit::error()
    }
  }
}
