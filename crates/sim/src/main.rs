//! Headless simulation driver.
//!
//! Loads a scenario, hands the hero to an aggressive AI autopilot and plays
//! turns until the hero falls, the map is cleared or the turn limit is hit.
//! The in-game ticker goes to stdout; diagnostics go to stderr via `tracing`.
mod config;

use anyhow::Result;
use config::SimConfig;
use crawl_content::ContentFactory;
use crawl_core::{
    AiController, AiParameters, Faction, GameEvent, RecordingSink, TurnScheduler, WorldContext,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = SimConfig::from_env();
    let factory = config
        .content_dir
        .clone()
        .map_or_else(ContentFactory::bundled, ContentFactory::new);
    info!(
        seed = config.seed,
        turns = config.turns,
        map = %config.map,
        data = %factory.data_dir().display(),
        "starting simulation"
    );

    let game_config = factory.load_config()?;
    let mut world = factory.load_world(&config.map)?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut sink = RecordingSink::new();
    let mut scheduler = TurnScheduler::new();
    let mut autopilot = AiController::with_parameters(AiParameters {
        aggressiveness: 1.0,
        speed: 1.0,
        vision_range: game_config.player_vision as f32,
        flee_threshold: 0.2,
        ranged: false,
    });

    for _ in 0..config.turns {
        let report = {
            let mut ctx = WorldContext::new(&mut world, &mut rng, &mut sink, &game_config);
            scheduler.play_turn(&mut ctx, &mut autopilot)
        };

        for event in sink.drain() {
            if let GameEvent::Log { message, turn } = event {
                println!("[{turn:>4}] {message}");
            }
        }

        if report.game_over {
            info!(turn = report.turn, "the hero has fallen");
            break;
        }
        let hostiles = world
            .map
            .units()
            .filter(|unit| unit.faction.is_hostile_to(Faction::Player))
            .count();
        if hostiles == 0 {
            info!(turn = report.turn, "map cleared");
            break;
        }
    }

    match world.player() {
        Some(hero) => info!(
            turn = world.turn,
            level = hero.level,
            life = hero.life.current,
            revealed = world.map.revealed_count(),
            "simulation finished"
        ),
        None => info!(turn = world.turn, "simulation finished without a hero"),
    }

    Ok(())
}

/// Diagnostics to stderr, filtered by `RUST_LOG` (default `info`).
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
