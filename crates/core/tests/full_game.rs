use anyhow::Result;
use chainhunt_core::{save, Game, GameError, Phase, SaveStore};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempfile::tempdir;

fn roster(count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("Player {n}")).collect()
}

fn chain_length(game: &Game, start: &str) -> usize {
    let mut steps = 0;
    let mut current = start.to_string();
    loop {
        current = game
            .team(&current)
            .ok()
            .and_then(|team| team.target())
            .map(str::to_string)
            .expect("active teams always have a target");
        steps += 1;
        if current == start || steps > game.teams().len() {
            return steps;
        }
    }
}

#[test]
fn random_games_play_out_to_a_single_winner() -> Result<()> {
    for seed in 0..25u64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let players = 6 + (seed as usize % 17);
        let mut game = Game::from_roster(roster(players), 2, &mut rng)?;
        game.assign_targets(&mut rng)?;

        while !game.is_game_over() {
            let active = game.active_teams().len();
            for team in game.active_teams() {
                assert_eq!(chain_length(&game, team.name()), active);
            }

            let victim = game
                .active_teams()
                .choose(&mut rng)
                .map(|team| team.name().to_string())
                .expect("game is not over");
            let former_target = game.team(&victim)?.target().map(str::to_string);
            let outcome = game.eliminate_team(&victim)?;

            if active > 2 {
                assert_eq!(outcome.new_target, former_target);
            } else {
                assert_eq!(outcome.new_target, None);
            }
            assert_eq!(game.active_teams().len(), active - 1);
        }

        assert_eq!(game.phase(), Phase::Finished);
        let winner = game.winner().expect("one survivor");
        assert!(winner.target().is_none());
    }
    Ok(())
}

#[test]
fn game_resumes_from_disk_mid_hunt() -> Result<()> {
    let dir = tempdir()?;
    let store = SaveStore::new(dir.path().join(save::DEFAULT_SAVE_FILE));

    let mut rng = ChaCha8Rng::seed_from_u64(404);
    let mut game = Game::from_roster(roster(13), 3, &mut rng)?;
    game.assign_targets(&mut rng)?;
    game.eliminate_team("Team 2")?;
    store.save(&game)?;

    let mut resumed = store.load()?;
    let hunter = resumed
        .hunter_of("Team 4")
        .map(|team| team.name().to_string())
        .expect("Team 4 is hunted");
    let inherited = resumed.team("Team 4")?.target().map(str::to_string);
    resumed.eliminate_team("Team 4")?;
    assert_eq!(resumed.team(&hunter)?.target().map(str::to_string), inherited);

    let err = resumed.eliminate_team("Team 2").unwrap_err();
    assert!(matches!(err, GameError::AlreadyEliminated(_)));
    assert_eq!(resumed.active_teams().len(), 2);
    resumed.verify_cycle()?;
    Ok(())
}
