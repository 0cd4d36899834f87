//! Game configuration constants and tunable parameters.

use serde::{Deserialize, Serialize};

use crate::state::{DevCard, Resource, ResourceSet};

/// Policy for awarding the longest-road and largest-army bonuses when two
/// players are exactly tied at the maximum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TiePolicy {
    /// Nobody holds the bonus until a strict leader exists.
    #[default]
    NoHolderWhileTied,
    /// The current holder keeps the bonus until strictly beaten.
    PreviousHolderRetains,
}

/// Thresholds applied when merging camera observations into the game state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Consecutive agreeing observation batches required before a
    /// vision-derived correction is proposed.
    pub debounce_window: u32,
    /// Minimum detection confidence for an observation to count toward the
    /// agreement streak.
    pub min_confidence: f32,
    /// Maximum camera-space distance (pixels) between a detection and a
    /// calibrated slot; farther detections are treated as noise.
    pub max_match_distance: f32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            debounce_window: Self::DEFAULT_DEBOUNCE_WINDOW,
            min_confidence: Self::DEFAULT_MIN_CONFIDENCE,
            max_match_distance: Self::DEFAULT_MAX_MATCH_DISTANCE,
        }
    }
}

impl ReconcileConfig {
    pub const DEFAULT_DEBOUNCE_WINDOW: u32 = 3;
    pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.6;
    pub const DEFAULT_MAX_MATCH_DISTANCE: f32 = 45.0;
}

/// Rules parameters for a game session.
///
/// Everything here is fixed at setup; transitions read it but never write it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Victory points required to win.
    pub target_victory_points: u8,
    /// Units of each resource kind the bank starts with.
    pub bank_resource_count: u8,
    /// A roll of 7 forces every player whose hand exceeds this size to
    /// discard half (rounded down).
    pub discard_hand_limit: u8,
    /// Minimum connected road length before the road bonus is awarded.
    pub longest_road_minimum: u8,
    /// Minimum played knights before the army bonus is awarded.
    pub largest_army_minimum: u8,
    /// Placement rounds in the setup snake (settlement + road each).
    pub setup_rounds: u8,
    /// Bank exchange rate without any harbor.
    pub base_trade_rate: u8,
    /// Bonus tie-break behavior.
    pub tie_policy: TiePolicy,
    /// Vision reconciliation thresholds.
    pub reconcile: ReconcileConfig,
}

impl GameConfig {
    pub const DEFAULT_TARGET_VICTORY_POINTS: u8 = 10;
    pub const DEFAULT_BANK_RESOURCE_COUNT: u8 = 19;
    pub const DEFAULT_DISCARD_HAND_LIMIT: u8 = 7;
    pub const DEFAULT_LONGEST_ROAD_MINIMUM: u8 = 5;
    pub const DEFAULT_LARGEST_ARMY_MINIMUM: u8 = 3;
    pub const DEFAULT_SETUP_ROUNDS: u8 = 2;
    pub const DEFAULT_BASE_TRADE_RATE: u8 = 4;

    pub fn new() -> Self {
        Self {
            target_victory_points: Self::DEFAULT_TARGET_VICTORY_POINTS,
            bank_resource_count: Self::DEFAULT_BANK_RESOURCE_COUNT,
            discard_hand_limit: Self::DEFAULT_DISCARD_HAND_LIMIT,
            longest_road_minimum: Self::DEFAULT_LONGEST_ROAD_MINIMUM,
            largest_army_minimum: Self::DEFAULT_LARGEST_ARMY_MINIMUM,
            setup_rounds: Self::DEFAULT_SETUP_ROUNDS,
            base_trade_rate: Self::DEFAULT_BASE_TRADE_RATE,
            tie_policy: TiePolicy::default(),
            reconcile: ReconcileConfig::default(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Resource cost of a road: 1 wood + 1 brick.
pub fn road_cost() -> ResourceSet {
    ResourceSet::from_pairs(&[(Resource::Wood, 1), (Resource::Brick, 1)])
}

/// Resource cost of a settlement: 1 wood + 1 brick + 1 sheep + 1 wheat.
pub fn settlement_cost() -> ResourceSet {
    ResourceSet::from_pairs(&[
        (Resource::Wood, 1),
        (Resource::Brick, 1),
        (Resource::Sheep, 1),
        (Resource::Wheat, 1),
    ])
}

/// Resource cost of upgrading a settlement to a city: 2 wheat + 3 ore.
pub fn city_cost() -> ResourceSet {
    ResourceSet::from_pairs(&[(Resource::Wheat, 2), (Resource::Ore, 3)])
}

/// Resource cost of a development card: 1 sheep + 1 wheat + 1 ore.
pub fn dev_card_cost() -> ResourceSet {
    ResourceSet::from_pairs(&[
        (Resource::Sheep, 1),
        (Resource::Wheat, 1),
        (Resource::Ore, 1),
    ])
}

/// Development deck composition: 14 knights, 5 victory points, 2 of each
/// progress card.
pub const DECK_COMPOSITION: [(DevCard, u8); 5] = [
    (DevCard::Knight, 14),
    (DevCard::VictoryPoint, 5),
    (DevCard::RoadBuilding, 2),
    (DevCard::YearOfPlenty, 2),
    (DevCard::Monopoly, 2),
];
