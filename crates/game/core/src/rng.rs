//! Deterministic random number generation.
//!
//! Dice rolls and setup shuffles must be reproducible: given the same game
//! seed and action sequence, a replayed session produces the same board and
//! the same rolls. Randomness is derived on demand from
//! (game seed, nonce, context) rather than from a stateful generator that
//! would have to be persisted.

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 32-bit output from 64-bit state. Deterministic, small, and
/// statistically solid for game mechanics.
///
/// Reference: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Generate a random u32 from a seed.
    pub fn next_u32(seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }

    /// Roll a die with N sides (1-N inclusive).
    pub fn roll_die(seed: u64, sides: u32) -> u32 {
        (Self::next_u32(seed) % sides) + 1
    }
}

/// Stateful PCG stream for operations that need a sequence of values from a
/// single seed, such as the setup shuffles.
#[derive(Clone, Copy, Debug)]
pub struct PcgStream {
    state: u64,
}

impl PcgStream {
    pub fn new(seed: u64) -> Self {
        Self {
            state: PcgRng::pcg_step(seed),
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = PcgRng::pcg_step(self.state);
        PcgRng::pcg_output(self.state)
    }

    /// Fisher-Yates shuffle driven by this stream.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = (self.next_u32() as usize) % (i + 1);
            items.swap(i, j);
        }
    }
}

/// Compute a deterministic seed from game state components.
///
/// # Arguments
///
/// * `game_seed` - Base seed fixed at game start
/// * `nonce` - Committed transition count at the time of the draw
/// * `context` - Distinguishes multiple independent draws in one transition
pub fn compute_seed(game_seed: u64, nonce: u64, context: u32) -> u64 {
    let mut hash = game_seed;

    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
