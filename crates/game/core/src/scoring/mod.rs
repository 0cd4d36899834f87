//! Victory point computation.
//!
//! Victory points are always derived from the state, never stored as an
//! independent counter. The bonus holder flags are the only persisted
//! scoring artifacts; the transitions that can change road networks or the
//! army count refresh them, so a recomputation at any moment is consistent.

mod roads;

pub use roads::longest_road_length;

use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, TiePolicy};
use crate::state::{DevCard, GameState, PlayerId};

/// Points for the longest-road and largest-army bonuses.
pub const BONUS_POINTS: u8 = 2;

/// Recompute longest-road lengths and reassign the road bonus holder.
pub fn refresh_road_bonus(state: &mut GameState, config: &GameConfig) {
    let lengths: Vec<u8> = PlayerId::ALL
        .into_iter()
        .map(|p| longest_road_length(state, p))
        .collect();
    for player in PlayerId::ALL {
        state.player_mut(player).longest_road_length = lengths[player.index()];
    }

    let previous = PlayerId::ALL
        .into_iter()
        .find(|&p| state.player(p).has_longest_road);
    let holder = bonus_holder(
        &lengths,
        config.longest_road_minimum,
        previous,
        config.tie_policy,
    );
    for player in PlayerId::ALL {
        state.player_mut(player).has_longest_road = Some(player) == holder;
    }
}

/// Reassign the largest-army bonus holder from played knight counts.
pub fn refresh_army_bonus(state: &mut GameState, config: &GameConfig) {
    let counts: Vec<u8> = PlayerId::ALL
        .into_iter()
        .map(|p| state.player(p).played_knights)
        .collect();

    let previous = PlayerId::ALL
        .into_iter()
        .find(|&p| state.player(p).has_largest_army);
    let holder = bonus_holder(
        &counts,
        config.largest_army_minimum,
        previous,
        config.tie_policy,
    );
    for player in PlayerId::ALL {
        state.player_mut(player).has_largest_army = Some(player) == holder;
    }
}

/// Resolve who holds a bonus given the per-seat metric.
fn bonus_holder(
    metrics: &[u8],
    minimum: u8,
    previous: Option<PlayerId>,
    policy: TiePolicy,
) -> Option<PlayerId> {
    let max = metrics.iter().copied().max().unwrap_or(0);
    if max < minimum {
        return None;
    }
    let leaders: Vec<PlayerId> = PlayerId::ALL
        .into_iter()
        .filter(|p| metrics[p.index()] == max)
        .collect();
    match leaders.as_slice() {
        [single] => Some(*single),
        _ => match policy {
            TiePolicy::NoHolderWhileTied => None,
            TiePolicy::PreviousHolderRetains => previous.filter(|p| leaders.contains(p)),
        },
    }
}

/// Victory points of one seat, derived purely from the state.
pub fn victory_points(state: &GameState, player: PlayerId) -> u8 {
    let structures: u8 = state
        .board
        .buildings_of(player)
        .map(|(_, b)| b.kind.victory_points())
        .sum();

    let player_state = state.player(player);
    let mut points = structures + player_state.dev_cards.get(DevCard::VictoryPoint);
    if player_state.has_longest_road {
        points += BONUS_POINTS;
    }
    if player_state.has_largest_army {
        points += BONUS_POINTS;
    }
    points
}

/// Scores of all seats at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub points: [u8; PlayerId::COUNT],
}

impl Scoreboard {
    pub fn of(state: &GameState) -> Self {
        let mut points = [0; PlayerId::COUNT];
        for player in PlayerId::ALL {
            points[player.index()] = victory_points(state, player);
        }
        Self { points }
    }

    pub fn points_of(&self, player: PlayerId) -> u8 {
        self.points[player.index()]
    }
}

/// The seat at or above the target score, if any. The best score wins;
/// seat order breaks exact ties on the same recomputation.
pub fn winner(state: &GameState, config: &GameConfig) -> Option<(PlayerId, u8)> {
    let scoreboard = Scoreboard::of(state);
    PlayerId::ALL
        .into_iter()
        .map(|p| (p, scoreboard.points_of(p)))
        .max_by_key(|&(p, points)| (points, std::cmp::Reverse(p.0)))
        .filter(|&(_, points)| points >= config.target_victory_points)
}
