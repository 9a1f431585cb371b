//! Extraction Core - headless session runner
//!
//! Activates a world for a seed, drops a scripted player into it and runs the
//! authoritative tick loop, printing what happened.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use extraction_core::catalog::ContentCatalog;
use extraction_core::combat::{CombatEvent, PatternKind};
use extraction_core::core::error::Result;
use extraction_core::core::{CoreConfig, SeededRng, Vec2};
use extraction_core::simulation::{PlayerSnapshot, Session};
use extraction_core::world::{activate_world, InMemoryRepository, WorldRepository};

/// Headless extraction session
#[derive(Parser, Debug)]
#[command(name = "extraction-sim")]
#[command(about = "Generate a seeded world and run a scripted combat session against it")]
struct Args {
    /// World seed
    #[arg(long, default_value = "alpha")]
    seed: String,

    /// Grid size: 16 skirmish, 32 standard, 64 daily
    #[arg(long, default_value_t = 16)]
    size: u32,

    /// Ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Milliseconds per tick
    #[arg(long, default_value_t = 50)]
    tick_ms: u32,

    /// TOML tuning file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Content catalog (.json or .toml)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct SessionSummary {
    seed: String,
    size: u32,
    land_chunks: usize,
    extraction_points: usize,
    mobs_at_start: usize,
    mobs_at_end: usize,
    hits: usize,
    kills: usize,
    deflects: usize,
    loot_drops: usize,
    items_picked_up: usize,
    mobs_spawned: usize,
    damage_taken: f32,
    survived: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("extraction_core=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::new(),
    };
    let catalog = match &args.catalog {
        Some(path) => ContentCatalog::load(path)?,
        None => ContentCatalog::builtin(),
    };

    let mut repo = InMemoryRepository::new();
    let instance =
        activate_world(&mut repo, &args.seed, args.size, &catalog, &config.world, now_ms())?;

    let start = instance
        .map
        .extraction_points
        .first()
        .map(|coord| {
            let half = config.world.chunk_world_size / 2.0;
            Vec2::new(
                coord.x as f32 * config.world.chunk_world_size + half,
                coord.y as f32 * config.world.chunk_world_size + half,
            )
        })
        .unwrap_or(Vec2::ZERO);

    let mut summary = SessionSummary {
        seed: args.seed.clone(),
        size: args.size,
        land_chunks: instance.map.chunks.len(),
        extraction_points: instance.map.extraction_points.len(),
        mobs_at_start: instance.map.live_mob_count(),
        ..SessionSummary::default()
    };

    let mut rng = SeededRng::new(&format!("{}:session", args.seed));
    let mut session = Session::new(instance.map.clone(), &catalog, &config, start);
    let mut player = PlayerSnapshot::at(start);
    let dt = f64::from(args.tick_ms) / 1000.0;

    for tick in 0..args.ticks {
        let now = f64::from(tick) * dt;

        // Walk a slow circle around the drop point, firing and swinging on a cadence
        let heading = (now * 0.2) as f32;
        player.facing = heading;
        player.position = start + Vec2::from_angle(heading) * 20.0;
        player.noise_level = if tick % 40 < 10 { 70.0 } else { 20.0 };

        if tick % 20 == 0 {
            session.fire(PatternKind::Nova, heading, now);
        } else if tick % 7 == 0 {
            session.fire(PatternKind::Shotgun, heading, now);
        }
        if tick % 10 == 5 {
            session.swing(heading, 2.5, now);
        }

        let report = session.tick(now, &player, &mut rng);
        for event in report.events.iter() {
            match event {
                CombatEvent::Hit { .. } => summary.hits += 1,
                CombatEvent::Kill { .. } => summary.kills += 1,
                CombatEvent::LootSpawn { .. } => summary.loot_drops += 1,
                CombatEvent::Deflect { .. } => summary.deflects += 1,
                CombatEvent::PlayerDamage { .. } => {}
            }
        }
        for item in &report.picked_up {
            repo.store_item(item)?;
        }
        summary.items_picked_up += report.picked_up.len();
        summary.mobs_spawned += report.spawned;
        summary.damage_taken += report.player_damage;

        player.health = (player.health - report.player_damage).max(0.0);
        if player.health <= 0.0 {
            tracing::info!(tick, "Player down");
            break;
        }
    }

    summary.mobs_at_end = session.map().live_mob_count();
    summary.survived = player.health > 0.0;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &SessionSummary) {
    println!("\n=== EXTRACTION SESSION ===");
    println!("World: {} ({}x{})", summary.seed, summary.size, summary.size);
    println!(
        "Land chunks: {}  Extraction points: {}",
        summary.land_chunks, summary.extraction_points
    );
    println!(
        "Mobs: {} at start, {} at end, {} spawned",
        summary.mobs_at_start, summary.mobs_at_end, summary.mobs_spawned
    );
    println!(
        "Combat: {} hits, {} kills, {} deflects",
        summary.hits, summary.kills, summary.deflects
    );
    println!(
        "Loot: {} drops, {} items picked up",
        summary.loot_drops, summary.items_picked_up
    );
    println!(
        "Damage taken: {:.1}  {}",
        summary.damage_taken,
        if summary.survived { "Extracted alive" } else { "Died" }
    );
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
