//! Integration tests for the Abalone engine and environment
//!
//! Tests the full stack: variants, engine, environment, agents and runner

use abalone_core::{
    AbaloneGame, Cell, Modification, MoveType, Variant, VariantCatalog, LIVES, NUM_POSITIONS,
};
use abalone_env::{
    action_id, decode_action, AbaloneEnv, Agent, EnvConfig, EpisodeRunner, RewardConfig,
    RunSummary, ACTION_DIM,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Two white marbles facing one black marble at the left end of the middle row
fn push_setup() -> Variant {
    // 26..=28 are the first three cells of row 5; 27 and 28 push 26
    Variant::new("push", vec![vec![27, 28], vec![26, 60]])
}

// ============================================================================
// ENGINE
// ============================================================================

#[test]
fn test_ejection_updates_damage_and_counts() {
    let mut game = AbaloneGame::new(push_setup()).unwrap();
    let outcome = game.action_handler(28, 26).unwrap().unwrap();

    assert_eq!(outcome.move_type, MoveType::Ejected);
    assert_eq!(
        outcome.modifications[0],
        Modification::Eject {
            position: 26,
            owner: 1,
            damage: 0,
        }
    );
    assert_eq!(game.players_damages(), &[0, 1]);
    assert_eq!(game.marble_count(1), 1);
    assert_eq!(game.token_at(26).unwrap(), Cell::Marble(0));
    assert_eq!(game.token_at(28).unwrap(), Cell::Empty);
    assert_eq!(game.current_player(), 1);
}

#[test]
fn test_classical_game_to_completion() {
    let mut game = AbaloneGame::new(Variant::classical()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for _ in 0..2000 {
        if game.game_over() {
            break;
        }
        let Some((a, b)) = Agent::Prioritized.choose(&game, &mut rng).unwrap() else {
            break;
        };
        game.action_handler(a, b).unwrap().unwrap();
    }

    if game.game_over() {
        let winner = game.winner().unwrap();
        let loser = 1 - winner;
        assert_eq!(game.players_damages()[loser as usize], LIVES);
        assert_eq!(game.players_victories()[winner as usize], 1);
        assert_eq!(game.action_handler(0, 1).unwrap(), None);
    }
    for player in 0..2u8 {
        assert_eq!(
            game.marble_count(player) + game.players_damages()[player as usize] as usize,
            14
        );
    }
}

#[test]
fn test_grouped_moves_cover_flat_list() {
    let catalog = VariantCatalog::builtin();
    for variant in catalog.iter() {
        let game = AbaloneGame::new(variant.clone()).unwrap();
        for player in 0..variant.players {
            let mut flat = game.get_possible_moves(player).unwrap();
            let mut grouped: Vec<_> = game
                .get_possible_moves_grouped(player)
                .unwrap()
                .into_values()
                .flatten()
                .collect();
            flat.sort_unstable();
            grouped.sort_unstable();
            assert_eq!(flat, grouped, "{} player {}", variant.name, player);
        }
    }
}

// ============================================================================
// VARIANT FILES
// ============================================================================

#[test]
fn test_catalog_file_drives_environment() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("variants.json");
    let mut catalog = VariantCatalog::default();
    catalog.insert(push_setup());
    catalog.save(&path).unwrap();

    let loaded = VariantCatalog::load(&path).unwrap();
    assert_eq!(loaded.get("push"), Some(&push_setup()));

    let config = EnvConfig::default()
        .with_variant("push")
        .with_first_player(0)
        .with_seed(1);
    let mut env = AbaloneEnv::with_catalog(config, loaded).unwrap();
    let step = env.step((28, 26)).unwrap();
    assert_eq!(step.info.move_type, Some(MoveType::Ejected));
    assert_eq!(step.reward, RewardConfig::default().ejected);
}

#[test]
fn test_env_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("env.json");
    std::fs::write(
        &path,
        r#"{ "variant": "belgian_daisy", "max_turns": 30, "random_player": false, "player": 1 }"#,
    )
    .unwrap();

    let config = EnvConfig::load(&path).unwrap();
    let env = AbaloneEnv::new(config).unwrap();
    assert_eq!(env.game().variant().name, "belgian_daisy");
    assert_eq!(env.current_player(), 1);
}

// ============================================================================
// ENVIRONMENT
// ============================================================================

#[test]
fn test_env_random_actions_follow_mask() {
    let config = EnvConfig::default().with_seed(9).with_max_turns(80);
    let mut env = AbaloneEnv::new(config).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    while !env.done() {
        let mask = env.action_mask().unwrap();
        assert_eq!(mask.len(), ACTION_DIM);

        let legal: Vec<usize> = (0..ACTION_DIM).filter(|&i| mask[i]).collect();
        let Some(&id) = legal.choose(&mut rng) else {
            break;
        };
        let action = decode_action(id).unwrap();
        assert_eq!(action_id(action), id);

        let turn = env.turns();
        let step = env.step(action).unwrap();
        assert!(step.info.move_type.is_some());
        assert_eq!(env.turns(), turn + 1);
    }

    assert!(env.done());
    assert!(env.game().board().positions().len() == NUM_POSITIONS);
}

// ============================================================================
// RUNNER
// ============================================================================

#[test]
fn test_runner_over_random_variants() {
    let config = EnvConfig {
        random_pick: true,
        ..EnvConfig::default().with_seed(500).with_max_turns(40)
    };
    let outcomes = EpisodeRunner::new(config, Agent::Prioritized)
        .run_episodes(6, true)
        .unwrap();
    let summary = RunSummary::from_outcomes(&outcomes);

    assert_eq!(summary.episodes, 6);
    for outcome in &outcomes {
        assert!(VariantCatalog::builtin().get(&outcome.variant).is_some());
        assert!(outcome.turns <= 40);
        let pushes = outcome
            .move_counts
            .get(&MoveType::InlinePush)
            .copied()
            .unwrap_or(0);
        assert!(pushes <= outcome.turns);
    }
}
