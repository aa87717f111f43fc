//! Headless симуляция Nightflyer
//!
//! Запускает арену без рендера: игрок стоит, спавнер выпускает волны,
//! враги атакуют. Полезно для проверки детерминизма и баланса профилей.

use std::process::ExitCode;

use bevy::prelude::With;
use clap::Parser;
use nightflyer_simulation::logger::set_log_level;
use nightflyer_simulation::{
    create_app_from_config, init_logger, log_error, log_info, Flyer, FlyerState, Health, LogLevel, Player,
    SimulationConfig,
};

/// Headless nightflyer arena
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RON config (по умолчанию — встроенная арена)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Переопределить seed из конфига
    #[arg(short, long)]
    seed: Option<u64>,

    /// Сколько fixed тиков прогнать
    #[arg(short, long, default_value_t = 1000)]
    ticks: u32,

    /// Уровень логов: debug, info, warn, error
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger();
    set_log_level(LogLevel::parse(&args.log_level).unwrap_or(LogLevel::Info));

    let mut config = match &args.config {
        Some(path) => match SimulationConfig::load_from_path(path) {
            Ok(config) => config,
            Err(err) => {
                log_error(&format!("{}", err));
                return ExitCode::FAILURE;
            }
        },
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    log_info(&format!("Starting nightflyer headless simulation (seed: {})", config.seed));

    let mut app = create_app_from_config(&config);

    for tick in 0..args.ticks {
        app.update();

        if tick % 100 == 0 {
            let world = app.world_mut();
            let flyers = world.query_filtered::<&FlyerState, With<Flyer>>().iter(world).count();
            let player_hp = world
                .query_filtered::<&Health, With<Player>>()
                .iter(world)
                .next()
                .map(|health| health.current())
                .unwrap_or(0.0);
            log_info(&format!("Tick {}: {} flyers, player hp {:.1}", tick, flyers, player_hp));
        }
    }

    log_info("Simulation complete!");
    ExitCode::SUCCESS
}
