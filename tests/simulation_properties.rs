//! Property tests over the Monte Carlo reduction: for any sane pair of
//! profiles, any trial count, and any seed, the aggregate must partition
//! trials exactly and report internally consistent percentages.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

use matchup_core::models::{MarginBucket, TeamProfile};
use matchup_core::simulation::{run_simulations, run_simulations_parallel};

fn profile(name: &str, ppg: f64, rpg: f64, fg: f64, tp: f64, to: f64) -> TeamProfile {
    TeamProfile::from_stats(
        name,
        &json!({
            "PPG": ppg,
            "REB": rpg,
            "FG%": fg,
            "3P%": tp,
            "TO": to,
            "AST": 15.0,
            "STL": 7.0,
            "BLK": 4.0,
        }),
    )
}

proptest! {
    #[test]
    fn prop_wins_partition_trials(
        seed in any::<u64>(),
        trials in 1u32..400,
        ppg_a in 50.0f64..110.0,
        ppg_b in 50.0f64..110.0,
    ) {
        let team_a = profile("A", ppg_a, 40.0, 48.0, 34.0, 11.0);
        let team_b = profile("B", ppg_b, 38.0, 46.0, 33.0, 12.0);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let result = run_simulations(&team_a, &team_b, trials, &mut rng).unwrap();

        prop_assert_eq!(result.num_simulations, trials);
        prop_assert_eq!(result.team_a_wins + result.team_b_wins, trials);
    }

    #[test]
    fn prop_bucket_counts_sum_to_trials(
        seed in any::<u64>(),
        trials in 1u32..400,
        rpg_a in 25.0f64..50.0,
        to_b in 5.0f64..20.0,
    ) {
        let team_a = profile("A", 78.0, rpg_a, 47.0, 34.0, 10.0);
        let team_b = profile("B", 76.0, 36.0, 46.0, 33.0, to_b);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let result = run_simulations(&team_a, &team_b, trials, &mut rng).unwrap();

        prop_assert_eq!(result.margin_distribution.total_count(), trials);

        let bucket_pct_sum: f64 = MarginBucket::ALL
            .iter()
            .map(|bucket| result.margin_distribution.bucket(*bucket).percentage)
            .sum();
        prop_assert!((bucket_pct_sum - 100.0).abs() <= 0.3);
    }

    #[test]
    fn prop_win_percentages_match_counts_and_sum(
        seed in any::<u64>(),
        trials in 1u32..400,
    ) {
        let team_a = profile("A", 81.0, 39.0, 49.0, 35.0, 10.0);
        let team_b = profile("B", 79.0, 38.0, 47.0, 34.0, 11.0);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let result = run_simulations(&team_a, &team_b, trials, &mut rng).unwrap();
        let n = f64::from(trials);

        let expected_a = (f64::from(result.team_a_wins) / n * 1000.0).round() / 10.0;
        prop_assert_eq!(result.team_a_win_pct, expected_a);
        prop_assert!((result.team_a_win_pct + result.team_b_win_pct - 100.0).abs() <= 0.11);
    }

    #[test]
    fn prop_notable_games_bound_all_margins(
        seed in any::<u64>(),
        trials in 1u32..200,
    ) {
        let team_a = profile("A", 84.0, 41.0, 50.0, 36.0, 9.0);
        let team_b = profile("B", 72.0, 35.0, 45.0, 31.0, 13.0);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let result = run_simulations(&team_a, &team_b, trials, &mut rng).unwrap();

        prop_assert!(result.closest_game.margin <= result.blowout_game.margin);
        prop_assert!(result.closest_game.game_number >= 1);
        prop_assert!(result.closest_game.game_number <= trials as usize);
        prop_assert!(result.blowout_game.game_number <= trials as usize);
    }

    #[test]
    fn prop_parallel_mode_upholds_the_same_invariants(
        seed in any::<u64>(),
        trials in 1u32..200,
        workers in 1usize..6,
    ) {
        let team_a = profile("A", 80.0, 40.0, 48.0, 35.0, 10.0);
        let team_b = profile("B", 77.0, 37.0, 46.0, 33.0, 12.0);

        let result = run_simulations_parallel(&team_a, &team_b, trials, workers, seed).unwrap();

        prop_assert_eq!(result.num_simulations, trials);
        prop_assert_eq!(result.team_a_wins + result.team_b_wins, trials);
        prop_assert_eq!(result.margin_distribution.total_count(), trials);
    }
}

#[test]
fn test_seeded_runs_are_fully_reproducible() {
    let team_a = profile("A", 82.5, 40.0, 49.0, 35.0, 10.0);
    let team_b = profile("B", 75.3, 36.0, 46.0, 32.0, 12.0);

    let mut rng_one = ChaCha8Rng::seed_from_u64(1234);
    let mut rng_two = ChaCha8Rng::seed_from_u64(1234);

    let first = run_simulations(&team_a, &team_b, 100, &mut rng_one).unwrap();
    let second = run_simulations(&team_a, &team_b, 100, &mut rng_two).unwrap();

    let first_json = serde_json::to_value(&first).unwrap();
    let second_json = serde_json::to_value(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn test_better_scoring_team_wins_majority_over_thousand_trials() {
    let team_a = profile("A", 80.0, 40.0, 50.0, 35.0, 10.0);
    let team_b = profile("B", 70.0, 40.0, 50.0, 35.0, 10.0);
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    let result = run_simulations(&team_a, &team_b, 1000, &mut rng).unwrap();
    assert!(result.team_a_win_pct > 50.0);
}
