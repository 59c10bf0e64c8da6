//! Asteroid Field headless launcher
//!
//! Loads optional JSON settings, spawns a field, flies a scripted ship for a
//! fixed number of frames and prints the final snapshot as JSON.
//!
//! Usage: `asteroid-field [settings.json] [frames] [seed]`

use asteroid_field::consts::SIM_DT;
use asteroid_field::sim::{Arena, Pose, Ship, TickInput, Turn, tick};
use asteroid_field::{Settings, SimError};

/// Frames simulated when no count is given (one minute at 60 Hz)
const DEFAULT_FRAMES: u32 = 3600;
const DEFAULT_SEED: u64 = 12345;

fn main() {
    env_logger::init();
    log::info!("Asteroid Field (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), SimError> {
    let settings = match args.first() {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| SimError::Settings(format!("{path}: {e}")))?;
            Settings::from_json(&json)?
        }
        None => Settings::default(),
    };
    let frames = parse_arg(args.get(1), DEFAULT_FRAMES)?;
    let seed = parse_arg(args.get(2), DEFAULT_SEED)?;

    let mut arena = Arena::from_settings(settings.clone())?;
    let [width, height] = settings.arena_size;
    arena.add_ship(Ship::new(
        settings.ship_size,
        Pose::new(width / 2.0, height / 2.0, 0.0),
        settings.ship_acceleration,
        settings.ship_angular_speed,
    )?)?;
    arena.spawn_field(seed)?;

    for frame in 0..frames {
        let input = scripted_input(frame);
        tick(&mut arena, &input, SIM_DT)?;
        if !settings.auto_resolve_collisions {
            arena.resolve_collisions();
        }
        arena.purge_detached();

        if arena.is_game_over() {
            log::info!("Ship destroyed after {} frames", frame + 1);
            break;
        }
        if arena.asteroid_ids().is_empty() {
            log::info!("Field cleared after {} frames", frame + 1);
            break;
        }
    }

    let snapshot = serde_json::to_string_pretty(&arena.snapshot())?;
    println!("{snapshot}");
    Ok(())
}

/// Slow circling with steady thrust pulses and a shot every half second
fn scripted_input(frame: u32) -> TickInput {
    TickInput {
        turn: if (frame / 120) % 2 == 0 { Turn::Right } else { Turn::Straight },
        thrust: frame % 90 < 20,
        fire: frame % 30 == 0,
    }
}

fn parse_arg<T: std::str::FromStr>(arg: Option<&String>, default: T) -> Result<T, SimError> {
    match arg {
        Some(raw) => raw
            .parse()
            .map_err(|_| SimError::Settings(format!("cannot parse argument '{raw}'"))),
        None => Ok(default),
    }
}
