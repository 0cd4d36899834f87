//! Player identity, resource hands, and development cards.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Seat index of one of the three players, in fixed turn order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Number of seats at the table. The turn pointer cycles through exactly
    /// these, in order.
    pub const COUNT: usize = 3;

    pub const ALL: [PlayerId; Self::COUNT] = [PlayerId(0), PlayerId(1), PlayerId(2)];

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat that acts after this one.
    #[inline]
    pub const fn next(self) -> PlayerId {
        PlayerId((self.0 + 1) % Self::COUNT as u8)
    }

    /// Piece color assigned to this seat.
    pub const fn color(self) -> PlayerColor {
        match self.0 {
            0 => PlayerColor::Orange,
            1 => PlayerColor::Blue,
            _ => PlayerColor::Red,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color())
    }
}

/// Physical piece colors the camera distinguishes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum PlayerColor {
    Orange,
    Blue,
    Red,
}

impl PlayerColor {
    /// Seat playing this color.
    pub fn seat(self) -> PlayerId {
        match self {
            PlayerColor::Orange => PlayerId(0),
            PlayerColor::Blue => PlayerId(1),
            PlayerColor::Red => PlayerId(2),
        }
    }
}

/// The five tradeable resource kinds.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
    Wood,
    Brick,
    Sheep,
    Wheat,
    Ore,
}

impl Resource {
    pub const COUNT: usize = 5;

    pub const ALL: [Resource; Self::COUNT] = [
        Resource::Wood,
        Resource::Brick,
        Resource::Sheep,
        Resource::Wheat,
        Resource::Ore,
    ];
}

/// Non-negative resource counts, one per kind.
///
/// Used for hands, the bank, build costs, and payout bundles. Subtraction is
/// checked: a set can never go negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSet {
    counts: [u8; Resource::COUNT],
}

impl ResourceSet {
    pub const EMPTY: ResourceSet = ResourceSet {
        counts: [0; Resource::COUNT],
    };

    /// A set with the same count for every kind.
    pub fn uniform(count: u8) -> Self {
        Self {
            counts: [count; Resource::COUNT],
        }
    }

    pub fn from_pairs(pairs: &[(Resource, u8)]) -> Self {
        let mut set = Self::EMPTY;
        for &(resource, count) in pairs {
            set.counts[resource as usize] += count;
        }
        set
    }

    #[inline]
    pub fn get(&self, resource: Resource) -> u8 {
        self.counts[resource as usize]
    }

    pub fn add(&mut self, resource: Resource, count: u8) {
        self.counts[resource as usize] += count;
    }

    /// Remove `count` of a kind. Returns false (and leaves the set
    /// untouched) if fewer are held.
    #[must_use]
    pub fn try_remove(&mut self, resource: Resource, count: u8) -> bool {
        let held = &mut self.counts[resource as usize];
        if *held < count {
            return false;
        }
        *held -= count;
        true
    }

    /// True if every count in `cost` is covered by this set.
    pub fn covers(&self, cost: &ResourceSet) -> bool {
        self.counts
            .iter()
            .zip(cost.counts.iter())
            .all(|(held, needed)| held >= needed)
    }

    /// Add every count of `other` into this set.
    pub fn add_all(&mut self, other: &ResourceSet) {
        for resource in Resource::ALL {
            self.add(resource, other.get(resource));
        }
    }

    /// Remove every count of `other`. Returns false and leaves the set
    /// untouched if any kind is short.
    #[must_use]
    pub fn try_remove_all(&mut self, other: &ResourceSet) -> bool {
        if !self.covers(other) {
            return false;
        }
        for resource in Resource::ALL {
            self.counts[resource as usize] -= other.get(resource);
        }
        true
    }

    /// Total cards in the set.
    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| c as u32).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Iterate the kinds present with their counts.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (Resource, u8)> + '_ {
        Resource::ALL
            .into_iter()
            .filter_map(|r| match self.get(r) {
                0 => None,
                n => Some((r, n)),
            })
    }
}

impl fmt::Display for ResourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (resource, count) in self.iter_nonzero() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}x{}", count, resource)?;
            first = false;
        }
        if first {
            write!(f, "nothing")?;
        }
        Ok(())
    }
}

/// Development card kinds.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum DevCard {
    Knight,
    VictoryPoint,
    RoadBuilding,
    YearOfPlenty,
    Monopoly,
}

impl DevCard {
    pub const COUNT: usize = 5;

    pub const ALL: [DevCard; Self::COUNT] = [
        DevCard::Knight,
        DevCard::VictoryPoint,
        DevCard::RoadBuilding,
        DevCard::YearOfPlenty,
        DevCard::Monopoly,
    ];
}

/// Counts of development cards held by one player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevCardSet {
    counts: [u8; DevCard::COUNT],
}

impl DevCardSet {
    #[inline]
    pub fn get(&self, card: DevCard) -> u8 {
        self.counts[card as usize]
    }

    pub fn add(&mut self, card: DevCard) {
        self.counts[card as usize] += 1;
    }

    #[must_use]
    pub fn try_remove(&mut self, card: DevCard) -> bool {
        let held = &mut self.counts[card as usize];
        if *held == 0 {
            return false;
        }
        *held -= 1;
        true
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| c as u32).sum()
    }
}

/// Everything one seat owns: hand, hidden cards, and bonus bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub color: PlayerColor,
    /// Resource hand.
    pub resources: ResourceSet,
    /// Development cards held, hidden from other players.
    pub dev_cards: DevCardSet,
    /// Knights played over the whole game (largest-army metric).
    pub played_knights: u8,
    /// Longest connected road, refreshed when roads or blocking buildings
    /// change.
    pub longest_road_length: u8,
    pub has_longest_road: bool,
    pub has_largest_army: bool,
}

impl PlayerState {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            color: id.color(),
            resources: ResourceSet::EMPTY,
            dev_cards: DevCardSet::default(),
            played_knights: 0,
            longest_road_length: 0,
            has_longest_road: false,
            has_largest_army: false,
        }
    }

    /// Number of resource cards in hand (discard-rule metric).
    pub fn hand_size(&self) -> u32 {
        self.resources.total()
    }
}
