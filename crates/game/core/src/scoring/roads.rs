//! Longest-road search.

use std::collections::{HashMap, HashSet};

use crate::board::{EdgeId, VertexId};
use crate::state::{GameState, PlayerId};

/// Length of the longest connected road path owned by `player`.
///
/// Depth-first search over the player's road edges; each edge is used at
/// most once per path. Opposing buildings cut the network: a path may reach
/// such a vertex but not continue through it.
pub fn longest_road_length(state: &GameState, player: PlayerId) -> u8 {
    let edges: Vec<EdgeId> = state.board.roads_of(player).map(|(e, _)| e).collect();
    if edges.is_empty() {
        return 0;
    }

    let mut adjacency: HashMap<VertexId, Vec<EdgeId>> = HashMap::new();
    for &edge_id in &edges {
        let edge = state.topology.edge(edge_id);
        adjacency.entry(edge.a).or_default().push(edge_id);
        adjacency.entry(edge.b).or_default().push(edge_id);
    }

    let blocked: HashSet<VertexId> = state
        .board
        .buildings()
        .filter(|(_, b)| b.owner != player)
        .map(|(v, _)| v)
        .collect();

    let mut best = 0;
    for &edge_id in &edges {
        let edge = state.topology.edge(edge_id);
        for start in [edge.a, edge.b] {
            let mut used = HashSet::from([edge_id]);
            dfs(
                state,
                &adjacency,
                &blocked,
                edge.other(start),
                &mut used,
                1,
                &mut best,
            );
        }
    }
    best
}

fn dfs(
    state: &GameState,
    adjacency: &HashMap<VertexId, Vec<EdgeId>>,
    blocked: &HashSet<VertexId>,
    vertex: VertexId,
    used: &mut HashSet<EdgeId>,
    length: u8,
    best: &mut u8,
) {
    *best = (*best).max(length);

    if blocked.contains(&vertex) {
        return;
    }

    let Some(candidates) = adjacency.get(&vertex) else {
        return;
    };
    for &edge_id in candidates {
        if used.contains(&edge_id) {
            continue;
        }
        let next = state.topology.edge(edge_id).other(vertex);
        used.insert(edge_id);
        dfs(state, adjacency, blocked, next, used, length + 1, best);
        used.remove(&edge_id);
    }
}
