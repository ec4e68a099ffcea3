//! Run the Monte Carlo matchup simulation from two stat-sheet JSON files and
//! print the aggregate result. Useful for tuning the scoring model without a
//! database or the rest of the pipeline.

use std::path::Path;
use std::process;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::Value;

use matchup_core::config::PipelineConfig;
use matchup_core::logging;
use matchup_core::models::TeamProfile;
use matchup_core::simulation;

fn main() {
    logging::init_structured_logging();

    let mut args = std::env::args().skip(1);
    let (home_path, away_path) = match (args.next(), args.next()) {
        (Some(home), Some(away)) => (home, away),
        _ => {
            eprintln!("usage: matchup-sim <home-stats.json> <away-stats.json>");
            process::exit(2);
        }
    };

    let home = match load_profile(&home_path) {
        Ok(profile) => profile,
        Err(message) => {
            eprintln!("{home_path}: {message}");
            process::exit(2);
        }
    };
    let away = match load_profile(&away_path) {
        Ok(profile) => profile,
        Err(message) => {
            eprintln!("{away_path}: {message}");
            process::exit(2);
        }
    };

    let config = PipelineConfig::load().unwrap_or_default();
    let seed = config.simulation_seed.unwrap_or_else(rand::random);
    tracing::info!(
        home = %home.team_name,
        away = %away.team_name,
        trials = config.num_simulations,
        seed,
        "simulating matchup"
    );

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    match simulation::run_simulations(&home, &away, config.num_simulations, &mut rng) {
        Ok(result) => {
            let rendered = serde_json::to_string_pretty(&result)
                .expect("aggregate result serializes to JSON");
            println!("{rendered}");
        }
        Err(err) => {
            eprintln!("simulation failed: {err}");
            process::exit(1);
        }
    }
}

/// Read a stat sheet file into a typed profile. The team name comes from a
/// `team_name` key when present, otherwise the file stem.
fn load_profile(path: &str) -> Result<TeamProfile, String> {
    let raw = std::fs::read_to_string(path).map_err(|err| err.to_string())?;
    let sheet: Value = serde_json::from_str(&raw).map_err(|err| err.to_string())?;

    let team_name = sheet
        .get("team_name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            Path::new(path)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Unknown".to_string())
        });

    let stats = sheet.get("team_stats").unwrap_or(&sheet);
    let profile = TeamProfile::from_stats(team_name, stats);
    profile.validate().map_err(|err| err.to_string())?;
    Ok(profile)
}
