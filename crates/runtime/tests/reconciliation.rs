//! Vision reconciliation through the runtime.

use chrono::Utc;

use game_core::{
    Building, BuildingKind, EndTurnAction, GameConfig, GameState, PlacementOrigin,
    PlayerActionKind, PlayerColor, PlayerId, RoadPiece, SlotId, TurnPhase, TurnState,
    default_calibration, standard_topology,
};
use runtime::{
    CameraObservation, Event, ObservationBatch, ObservedOccupant, ReconcileOutcome,
    ReconciliationEvent, Runtime, Topic,
};

/// State in the action phase with one action-derived road for player 0,
/// anchoring reachability for vision fills.
fn state_with_road(seed: u64) -> (GameState, game_core::EdgeId, game_core::VertexId) {
    let config = GameConfig::default();
    let mut state = GameState::new(standard_topology(seed), seed, &config);
    state.turn = TurnState {
        phase: TurnPhase::Action,
        setup: None,
        turn_number: 1,
        ..TurnState::new()
    };
    let edge = game_core::EdgeId(0);
    let vertex = state.topology.edge(edge).a;
    state.board.set_road(
        edge,
        RoadPiece {
            owner: PlayerId(0),
            origin: PlacementOrigin::PlayerAction,
        },
    );
    (state, edge, vertex)
}

/// One batch with a single detection on the calibrated point of `slot`.
fn batch_for(slot: SlotId, color: PlayerColor, confidence: f32) -> ObservationBatch {
    let point = default_calibration()
        .point(slot)
        .expect("every slot is calibrated by default");
    ObservationBatch::new(
        Utc::now(),
        vec![CameraObservation::new(
            point.x,
            point.y,
            ObservedOccupant::Piece(color),
            confidence,
        )],
    )
}

#[tokio::test]
async fn a_single_observation_never_mutates_state() {
    let (state, _edge, vertex) = state_with_road(3);
    let runtime = Runtime::builder().initial_state(state).build().unwrap();
    let handle = runtime.handle();

    handle
        .submit_observations(batch_for(SlotId::Vertex(vertex), PlayerColor::Orange, 0.95))
        .await
        .unwrap();

    let outcomes = handle.reconcile().await.unwrap();
    assert!(outcomes.is_empty(), "one batch is below the debounce window");

    let state = handle.query_state().await.unwrap();
    assert!(state.board.building(vertex).is_none());
}

#[tokio::test]
async fn sustained_agreement_fills_a_gap() {
    let (state, _edge, vertex) = state_with_road(3);
    let runtime = Runtime::builder().initial_state(state).build().unwrap();
    let handle = runtime.handle();

    for _ in 0..3 {
        handle
            .submit_observations(batch_for(SlotId::Vertex(vertex), PlayerColor::Orange, 0.9))
            .await
            .unwrap();
    }

    let outcomes = handle.reconcile().await.unwrap();
    assert!(matches!(
        outcomes.as_slice(),
        [ReconcileOutcome::Applied { owner: PlayerId(0), .. }]
    ));

    let state = handle.query_state().await.unwrap();
    let building = state.board.building(vertex).expect("gap was filled");
    assert_eq!(building.owner, PlayerId(0));
    assert_eq!(building.origin, PlacementOrigin::Vision);
    // The correction went through the versioned commit path.
    assert_eq!(state.nonce(), 1);
}

#[tokio::test]
async fn low_confidence_breaks_the_streak() {
    let (state, _edge, vertex) = state_with_road(3);
    let runtime = Runtime::builder().initial_state(state).build().unwrap();
    let handle = runtime.handle();

    let slot = SlotId::Vertex(vertex);
    handle
        .submit_observations(batch_for(slot, PlayerColor::Orange, 0.9))
        .await
        .unwrap();
    handle
        .submit_observations(batch_for(slot, PlayerColor::Orange, 0.2))
        .await
        .unwrap();
    handle
        .submit_observations(batch_for(slot, PlayerColor::Orange, 0.9))
        .await
        .unwrap();

    let outcomes = handle.reconcile().await.unwrap();
    assert!(outcomes.is_empty());

    let state = handle.query_state().await.unwrap();
    assert!(state.board.building(vertex).is_none());
}

#[tokio::test]
async fn conflicting_observation_never_overwrites_action_state() {
    let (state, edge, _vertex) = state_with_road(3);
    let runtime = Runtime::builder().initial_state(state).build().unwrap();
    let handle = runtime.handle();
    let mut vision_rx = handle.subscribe(Topic::Reconciliation);

    // The camera insists the road belongs to blue; the action log says
    // orange.
    for _ in 0..3 {
        handle
            .submit_observations(batch_for(SlotId::Edge(edge), PlayerColor::Blue, 0.97))
            .await
            .unwrap();
    }

    let outcomes = handle.reconcile().await.unwrap();
    let [ReconcileOutcome::Conflict(conflict)] = outcomes.as_slice() else {
        panic!("expected exactly one conflict, got {outcomes:?}");
    };
    assert_eq!(conflict.slot, SlotId::Edge(edge));
    assert_eq!(conflict.proposed, PlayerColor::Blue);
    assert_eq!(conflict.authoritative, Some(PlayerColor::Orange));

    // The authoritative state is untouched and the conflict was published.
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.board.road(edge).unwrap().owner, PlayerId(0));
    assert_eq!(state.nonce(), 0);

    let mut saw_conflict = false;
    while let Ok(event) = vision_rx.try_recv() {
        if matches!(
            event,
            Event::Reconciliation(ReconciliationEvent::Conflict(_))
        ) {
            saw_conflict = true;
        }
    }
    assert!(saw_conflict);
}

#[tokio::test]
async fn illegal_fill_surfaces_as_conflict_not_corruption() {
    // A vertex adjacent to an existing building violates spacing, so a
    // sustained observation there must flag instead of apply.
    let (mut state, _edge, vertex) = state_with_road(3);
    let neighbor = state.topology.neighbors(vertex).next().unwrap();
    state.board.set_building(
        neighbor,
        Building {
            owner: PlayerId(1),
            kind: BuildingKind::Settlement,
            origin: PlacementOrigin::PlayerAction,
        },
    );

    let runtime = Runtime::builder().initial_state(state).build().unwrap();
    let handle = runtime.handle();

    for _ in 0..3 {
        handle
            .submit_observations(batch_for(SlotId::Vertex(vertex), PlayerColor::Orange, 0.9))
            .await
            .unwrap();
    }

    let outcomes = handle.reconcile().await.unwrap();
    let [ReconcileOutcome::Conflict(conflict)] = outcomes.as_slice() else {
        panic!("expected a conflict, got {outcomes:?}");
    };
    assert_eq!(conflict.authoritative, None);

    let state = handle.query_state().await.unwrap();
    assert!(state.board.building(vertex).is_none());
}

#[tokio::test]
async fn end_of_turn_is_a_synchronization_point() {
    let (state, _edge, vertex) = state_with_road(3);
    let runtime = Runtime::builder().initial_state(state).build().unwrap();
    let handle = runtime.handle();
    let mut vision_rx = handle.subscribe(Topic::Reconciliation);

    for _ in 0..3 {
        handle
            .submit_observations(batch_for(SlotId::Vertex(vertex), PlayerColor::Orange, 0.9))
            .await
            .unwrap();
    }

    // No explicit reconcile: ending the turn drains the queue.
    handle
        .execute_action(PlayerActionKind::EndTurn(EndTurnAction {
            actor: PlayerId(0),
        }))
        .await
        .expect("end turn succeeds");

    let state = handle.query_state().await.unwrap();
    assert!(state.board.building(vertex).is_some());

    let mut saw_applied = false;
    while let Ok(event) = vision_rx.try_recv() {
        if matches!(
            event,
            Event::Reconciliation(ReconciliationEvent::CorrectionApplied { .. })
        ) {
            saw_applied = true;
        }
    }
    assert!(saw_applied);
}
