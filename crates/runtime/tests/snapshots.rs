//! Snapshot persistence and restart recovery.

use std::sync::Arc;

use game_core::{
    DiceRoll, GameConfig, GameState, PlayerActionKind, PlayerId, RollAction, TurnPhase,
    TurnState, standard_topology,
};
use runtime::{FileSnapshotRepository, Runtime, SnapshotRepository};

fn main_loop_state(seed: u64) -> GameState {
    let config = GameConfig::default();
    let mut state = GameState::new(standard_topology(seed), seed, &config);
    state.turn = TurnState {
        phase: TurnPhase::Roll,
        setup: None,
        turn_number: 1,
        ..TurnState::new()
    };
    state
}

#[test]
fn file_repository_round_trips_and_finds_the_latest() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileSnapshotRepository::new(dir.path()).unwrap();

    let state = main_loop_state(17);
    repo.save(0, &state).unwrap();
    repo.save(3, &state).unwrap();
    repo.save(11, &state).unwrap();

    assert_eq!(repo.list_nonces().unwrap(), vec![0, 3, 11]);

    let (latest, loaded) = repo.load_latest().unwrap().expect("snapshots exist");
    assert_eq!(latest, 11);
    assert_eq!(loaded, state);

    assert!(repo.load(7).unwrap().is_none());
}

#[test]
fn writes_are_atomic_replacements() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileSnapshotRepository::new(dir.path()).unwrap();

    repo.save(5, &main_loop_state(2)).unwrap();
    repo.save(5, &main_loop_state(3)).unwrap();

    // Only the final file remains; no temp leftovers.
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["state_5.bin".to_string()]);

    // The second write won.
    let loaded = repo.load(5).unwrap().unwrap();
    assert_eq!(loaded.game_seed, 3);
}

#[test]
fn delete_range_prunes_old_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileSnapshotRepository::new(dir.path()).unwrap();
    let state = main_loop_state(1);
    for nonce in 0..6 {
        repo.save(nonce, &state).unwrap();
    }

    assert_eq!(repo.delete_range(0, 3).unwrap(), 4);
    assert_eq!(repo.list_nonces().unwrap(), vec![4, 5]);
}

#[tokio::test]
async fn a_restarted_runtime_resumes_from_the_last_snapshot() {
    let dir = tempfile::tempdir().unwrap();

    // First session: one committed roll, snapshotted after the batch.
    {
        let repo = Arc::new(FileSnapshotRepository::new(dir.path()).unwrap());
        let runtime = Runtime::builder()
            .initial_state(main_loop_state(23))
            .snapshots(repo)
            .build()
            .unwrap();
        let handle = runtime.handle();

        handle
            .execute_action(PlayerActionKind::Roll(RollAction::with_dice(
                PlayerId(0),
                DiceRoll::new(2, 3),
            )))
            .await
            .expect("roll succeeds");

        drop(handle);
        runtime.shutdown().await.unwrap();
    }

    // Second session: no initial state given; the builder resumes.
    let repo = Arc::new(FileSnapshotRepository::new(dir.path()).unwrap());
    let runtime = Runtime::builder().snapshots(repo).build().unwrap();
    let handle = runtime.handle();

    let state = handle.query_state().await.unwrap();
    assert!(state.nonce() > 0, "resumed mid-game, not from scratch");
    assert_eq!(state.game_seed, 23);
    assert_eq!(state.turn.dice, Some(DiceRoll::new(2, 3)));
    assert_eq!(state.turn.phase, TurnPhase::Action);
}
