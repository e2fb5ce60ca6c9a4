//! headless — drives the rust_pedsim runtime the way a host framework would.
//!
//! Builds a small plaza with four doors, precomputes door-to-door routes (or
//! loads them from CSV), starts the headless bridge, and advances it tick by
//! tick.  Halfway through, one agent is handed to the "host", nudged, and
//! handed back with a new exit.
//!
//! ```text
//! cargo run -p headless -- [config.toml] [routes.csv]
//! RUST_LOG=debug cargo run -p headless
//! ```
//!
//! With a `routes.csv` argument that does not exist yet, the planned routes
//! are written there so the next run can load them.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ps_bridge::{AdvanceOutcome, Bridge};
use ps_core::{CrossingId, Point2, SimConfig};
use ps_engine::{EngineBuilder, Environment, ExternalAgent, SimulationEngine};
use ps_grid::{OccupancyGrid, PathFinder};
use ps_route::{BehaviorState, PrecomputedPathQueue, RouteLibrary, load_paths_csv, save_paths_csv};

// ── Constants ─────────────────────────────────────────────────────────────────

const TICKS:            u64 = 400;
const REPORT_INTERVAL:  u64 = 100;
const HANDOFF_TICK:     u64 = 200;
const HANDOFF_DURATION: u64 = 5;
const CELL_SIZE:        f32 = 1.0;

// 24 × 10 plaza; '#' cells are kiosks and planters.
const PLAZA: &str = "\
........................
........................
....###.......###.......
....###.......###.......
........................
..........####..........
..........####..........
....###.......###.......
....###.......###.......
........................
";

const DOORS: [(u32, f32, f32); 4] = [
    (0, 0.0, 4.0),  // west
    (1, 23.0, 4.0), // east
    (2, 12.0, 0.0), // north
    (3, 12.0, 9.0), // south
];

const CONFIG_TOML: &str = r#"
seed             = 42
max_agents       = 60
arrival_radius   = 0.3
pedestrian_speed = 1.4
vehicle_speed    = 4.0

[tick_length]
value = 20
unit  = "milliseconds"

[[departures]]
entrance    = 0
kind        = "pedestrian"
probability = 0.3

[[departures]]
entrance    = 1
kind        = "pedestrian"
probability = 0.3

[[departures]]
entrance    = 2
kind        = "vehicle"
probability = 0.05
"#;

// ── Routes ────────────────────────────────────────────────────────────────────

/// Plan one route for every ordered pair of distinct doors.
fn plan_routes(env: &Environment) -> Result<RouteLibrary> {
    let finder = PathFinder::new();
    let mut library = RouteLibrary::new();
    for from in env.crossings() {
        for to in env.crossings().iter().filter(|c| c.id != from.id) {
            let path = finder
                .find_path(env.graph(), from.position, to.position)
                .with_context(|| format!("no route from {} to {}", from.id, to.id))?;
            library.insert(PrecomputedPathQueue::from_path(path, BehaviorState::Move, from.id, to.id));
        }
    }
    Ok(library)
}

fn routes(env: &Environment, csv: Option<&Path>) -> Result<RouteLibrary> {
    match csv {
        Some(path) if path.exists() => {
            let library: RouteLibrary = load_paths_csv(path)?.into_iter().collect();
            println!("Loaded {} routes from {}", library.len(), path.display());
            Ok(library)
        }
        Some(path) => {
            let library = plan_routes(env)?;
            save_paths_csv(path, library.iter())?;
            println!("Planned {} routes, saved to {}", library.len(), path.display());
            Ok(library)
        }
        None => {
            let library = plan_routes(env)?;
            println!("Planned {} routes", library.len());
            Ok(library)
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = args.first().map(Path::new);
    let routes_path = args.get(1).map(Path::new);

    // 1. Configuration.
    let config = match config_path {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimConfig::from_toml_str(CONFIG_TOML)?,
    };
    println!("=== headless — rust_pedsim runtime ===");
    println!(
        "Seed: {}  |  Tick: {}  |  Max agents: {}",
        config.seed, config.tick_length, config.max_agents
    );

    // 2. Environment.
    let grid = OccupancyGrid::parse_ascii(PLAZA, CELL_SIZE)?;
    let doors = DOORS.map(|(id, x, y)| (CrossingId(id), Point2::new(x, y)));
    let env = Environment::new(&grid, doors)?;
    println!(
        "Plaza: {}×{} cells, {} nodes, {} obstacles, {} doors",
        grid.cols(),
        grid.rows(),
        env.graph().node_count(),
        env.obstacles().len(),
        env.crossings().len(),
    );

    // 3. Routes and engine.
    let library = routes(&env, routes_path)?;
    let engine = EngineBuilder::new(config, env).routes(library).headless()?;

    // 4. Drive the bridge.
    let mut bridge = Bridge::headless(engine)?;
    let mut timeouts = 0u64;
    let mut handed_off: Option<ExternalAgent> = None;
    let t0 = Instant::now();

    for tick in 1..=TICKS {
        match bridge.advance() {
            AdvanceOutcome::Completed(_) => {}
            AdvanceOutcome::TimedOut => timeouts += 1,
            AdvanceOutcome::Disconnected => break,
        }
        let publication = bridge.publish();
        if !publication.obstacles.is_empty() {
            info!(count = publication.obstacles.len(), "obstacles published");
        }

        if tick == HANDOFF_TICK {
            handed_off = publication
                .agents
                .first()
                .and_then(|a| bridge.release_ownership(&a.identifier));
            if let Some(agent) = &handed_off {
                println!("Tick {tick}: host took over {} (exit {})", agent.identifier, agent.exit);
            }
        } else if let Some(agent) = handed_off.as_mut()
            && tick < HANDOFF_TICK + HANDOFF_DURATION
        {
            // The host shuffles the agent sideways while it owns it.
            agent.position = agent.position + Point2::new(0.0, 0.2);
            bridge.add_or_update_external_agent(agent.clone());
        } else if let Some(agent) = handed_off.take() {
            match bridge.take_ownership(&agent) {
                Ok(Some(exit)) => println!("Tick {tick}: {} returned, new exit {exit}", agent.identifier),
                Ok(None) => println!("Tick {tick}: {} is gone", agent.identifier),
                Err(e) => warn!(agent = %agent.identifier, error = %e, "hand-back failed"),
            }
        }

        if tick % REPORT_INTERVAL == 0 {
            let stats = bridge.with_engine(|e| e.stats());
            println!(
                "Tick {:>4}: {:>3} published  {:>3} in store  {:>3} waiting",
                tick,
                publication.agents.len(),
                stats.population,
                stats.waiting,
            );
        }
    }
    let elapsed = t0.elapsed();

    // 5. Summary.
    let stats = bridge.with_engine(|e| e.stats());
    println!();
    println!("Completed {} ticks in {:.3} s ({timeouts} timed out)", bridge.tick_count(), elapsed.as_secs_f64());
    println!("{:<10} {:>8}", "Counter", "Value");
    println!("{}", "-".repeat(19));
    println!("{:<10} {:>8}", "spawned", stats.spawned);
    println!("{:<10} {:>8}", "retired", stats.retired);
    println!("{:<10} {:>8}", "dropped", stats.dropped);
    println!("{:<10} {:>8}", "in store", stats.population);

    bridge.shutdown()?;
    Ok(())
}
