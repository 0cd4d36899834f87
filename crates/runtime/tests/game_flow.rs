//! End-to-end turn flow through the runtime.

use game_core::{
    DiceRoll, DiscardAction, EdgeId, EndTurnAction, GameConfig, GameState, PlayerActionKind,
    PlayerId, Resource, ResourceSet, RollAction, SetupPlaceAction, TurnPhase, TurnState,
    VertexId, standard_topology,
};
use runtime::{Event, GameEvent, Runtime, RuntimeError, ScriptedProvider, Topic};

/// A crafted state already past setup, in the roll phase.
fn main_loop_state(seed: u64) -> (GameState, GameConfig) {
    let config = GameConfig::default();
    let mut state = GameState::new(standard_topology(seed), seed, &config);
    state.turn = TurnState {
        phase: TurnPhase::Roll,
        setup: None,
        turn_number: 1,
        ..TurnState::new()
    };
    (state, config)
}

/// First legal setup spot: an empty, spacing-safe vertex with a free edge.
fn next_setup_spot(state: &GameState) -> (VertexId, EdgeId) {
    for v in 0..state.topology.vertex_count() {
        let vertex = VertexId(v as u8);
        if state.board.building(vertex).is_none()
            && state.board.respects_spacing(&state.topology, vertex)
        {
            for &edge in state.topology.edges_at(vertex) {
                if state.board.road(edge).is_none() {
                    return (vertex, edge);
                }
            }
        }
    }
    panic!("no legal setup spot left");
}

#[tokio::test]
async fn setup_snake_then_strict_rotation() {
    let runtime = Runtime::builder().build().expect("runtime builds");
    let handle = runtime.handle();

    // Fresh sessions start in the setup snake: P1 P2 P3 P3 P2 P1.
    for expected_seat in [0u8, 1, 2, 2, 1, 0] {
        let state = handle.query_state().await.unwrap();
        assert_eq!(state.turn.phase, TurnPhase::Setup);
        assert_eq!(state.turn.active_player, PlayerId(expected_seat));

        let (vertex, edge) = next_setup_spot(&state);
        handle
            .execute_action(PlayerActionKind::SetupPlace(SetupPlaceAction {
                actor: PlayerId(expected_seat),
                vertex,
                edge,
            }))
            .await
            .expect("setup placement is legal");
    }

    // Main loop: the pointer cycles P1 -> P2 -> P3 -> P1, never skipping.
    for expected_seat in [0u8, 1, 2, 0] {
        let state = handle.query_state().await.unwrap();
        assert_eq!(state.turn.phase, TurnPhase::Roll);
        assert_eq!(state.turn.active_player, PlayerId(expected_seat));

        let seat = PlayerId(expected_seat);
        handle
            .execute_action(PlayerActionKind::Roll(RollAction::with_dice(
                seat,
                DiceRoll::new(1, 1),
            )))
            .await
            .expect("roll succeeds");
        handle
            .execute_action(PlayerActionKind::EndTurn(EndTurnAction { actor: seat }))
            .await
            .expect("end turn succeeds");

        // Resources stayed conserved across production and the handover.
        let state = handle.query_state().await.unwrap();
        assert!(state.resources_conserved(&GameConfig::default()));
    }

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn scripted_provider_drives_the_loop() {
    let (state, _config) = main_loop_state(6);
    let script = vec![
        PlayerActionKind::Roll(RollAction::with_dice(PlayerId(0), DiceRoll::new(1, 2))),
        PlayerActionKind::EndTurn(EndTurnAction { actor: PlayerId(0) }),
        PlayerActionKind::Roll(RollAction::with_dice(PlayerId(1), DiceRoll::new(2, 2))),
        PlayerActionKind::EndTurn(EndTurnAction { actor: PlayerId(1) }),
    ];
    let mut runtime = Runtime::builder()
        .initial_state(state)
        .provider(ScriptedProvider::new(script))
        .build()
        .unwrap();

    for _ in 0..4 {
        assert!(runtime.step().await.unwrap());
    }

    let state = runtime.handle().query_state().await.unwrap();
    assert_eq!(state.turn.active_player, PlayerId(2));
    assert_eq!(state.turn.phase, TurnPhase::Roll);
    assert_eq!(state.turn.turn_number, 3);
}

#[tokio::test]
async fn acting_out_of_turn_is_rejected() {
    let (state, _config) = main_loop_state(5);
    let runtime = Runtime::builder().initial_state(state).build().unwrap();
    let handle = runtime.handle();

    let result = handle
        .execute_action(PlayerActionKind::Roll(RollAction::new(PlayerId(2))))
        .await;
    assert!(matches!(
        result,
        Err(RuntimeError::Action(game_core::ExecuteError::NotPlayersTurn { .. }))
    ));

    // The state is untouched.
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.nonce(), 0);
    assert_eq!(state.turn.phase, TurnPhase::Roll);
}

#[tokio::test]
async fn nine_card_hand_discards_exactly_four_on_a_seven() {
    let (mut state, config) = main_loop_state(7);
    let mut hand = ResourceSet::EMPTY;
    hand.add(Resource::Wood, 5);
    hand.add(Resource::Sheep, 4);
    assert!(state.bank.resources.try_remove_all(&hand));
    state.player_mut(PlayerId(1)).resources.add_all(&hand);

    let runtime = Runtime::builder().initial_state(state).build().unwrap();
    let handle = runtime.handle();

    handle
        .execute_action(PlayerActionKind::Roll(RollAction::with_dice(
            PlayerId(0),
            DiceRoll::new(3, 4),
        )))
        .await
        .expect("roll succeeds");

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.turn.phase, TurnPhase::Discard);
    assert_eq!(state.turn.owed_discards(PlayerId(1)), 4);

    // Ending the turn is blocked until the obligation clears.
    let blocked = handle
        .execute_action(PlayerActionKind::EndTurn(EndTurnAction {
            actor: PlayerId(0),
        }))
        .await;
    assert!(blocked.is_err());

    // The wrong count is refused; exactly four goes through.
    let short = handle
        .execute_action(PlayerActionKind::Discard(DiscardAction {
            actor: PlayerId(1),
            cards: ResourceSet::from_pairs(&[(Resource::Wood, 3)]),
        }))
        .await;
    assert!(short.is_err());

    handle
        .execute_action(PlayerActionKind::Discard(DiscardAction {
            actor: PlayerId(1),
            cards: ResourceSet::from_pairs(&[(Resource::Wood, 2), (Resource::Sheep, 2)]),
        }))
        .await
        .expect("exact discard succeeds");

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.turn.phase, TurnPhase::Action);
    assert_eq!(state.player(PlayerId(1)).hand_size(), 5);
    assert!(state.resources_conserved(&config));
}

#[tokio::test]
async fn empty_bank_kind_pays_nobody() {
    let (mut state, config) = main_loop_state(4);

    // Find the unique hex numbered 2 or 12 and settle two seats on it.
    let (hex_id, resource, roll) = state
        .topology
        .hexes()
        .find_map(|(id, hex)| {
            let resource = hex.terrain.resource()?;
            let roll = hex.roll_number?;
            matches!(roll, 2 | 12).then_some((id, resource, roll))
        })
        .expect("standard board has a hex numbered 2 or 12");
    let vertices = state.topology.hex(hex_id).vertices;
    for (seat, corner) in [(PlayerId(0), vertices[0]), (PlayerId(1), vertices[3])] {
        state.board.set_building(
            corner,
            game_core::Building {
                owner: seat,
                kind: game_core::BuildingKind::Settlement,
                origin: game_core::PlacementOrigin::PlayerAction,
            },
        );
    }

    // Drain the bank of that kind into the uninvolved seat.
    let stock = state.bank.resources.get(resource);
    assert!(state.bank.resources.try_remove(resource, stock));
    state.player_mut(PlayerId(2)).resources.add(resource, stock);

    let runtime = Runtime::builder().initial_state(state).build().unwrap();
    let handle = runtime.handle();

    let die_1 = (roll - 1).min(6);
    handle
        .execute_action(PlayerActionKind::Roll(RollAction::with_dice(
            PlayerId(0),
            DiceRoll::new(die_1, roll - die_1),
        )))
        .await
        .expect("roll succeeds");

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.turn.phase, TurnPhase::Action);
    assert_eq!(state.player(PlayerId(0)).resources.get(resource), 0);
    assert_eq!(state.player(PlayerId(1)).resources.get(resource), 0);
    assert_eq!(state.bank.resources.get(resource), 0);
    assert!(state.resources_conserved(&config));
}

#[tokio::test]
async fn winner_is_declared_and_the_game_locks() {
    let (mut state, _config) = main_loop_state(9);
    for _ in 0..10 {
        state
            .player_mut(PlayerId(0))
            .dev_cards
            .add(game_core::DevCard::VictoryPoint);
    }

    let runtime = Runtime::builder().initial_state(state).build().unwrap();
    let handle = runtime.handle();
    let mut game_rx = handle.subscribe(Topic::Game);

    // Any commit triggers the recomputation that finds the winner.
    handle
        .execute_action(PlayerActionKind::Roll(RollAction::with_dice(
            PlayerId(0),
            DiceRoll::new(1, 1),
        )))
        .await
        .expect("roll succeeds");

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.turn.phase, TurnPhase::Ended);

    let mut saw_winner = false;
    while let Ok(event) = game_rx.try_recv() {
        if let Event::Game(GameEvent::WinnerDeclared { player, points, .. }) = event {
            assert_eq!(player, PlayerId(0));
            assert_eq!(points, 10);
            saw_winner = true;
        }
    }
    assert!(saw_winner, "winner event was published");

    // Nothing executes after the end.
    let result = handle
        .execute_action(PlayerActionKind::EndTurn(EndTurnAction {
            actor: PlayerId(0),
        }))
        .await;
    assert!(matches!(
        result,
        Err(RuntimeError::Action(game_core::ExecuteError::GameOver))
    ));
}
