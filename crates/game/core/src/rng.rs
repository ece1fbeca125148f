//! Deterministic dice for loot drops and wind traps.
//!
//! [`Dice`] keeps the dungeon seed and a running draw count. Every roll mixes
//! both with the entity it concerns and a [`Roll`] tag, then feeds the result
//! through one PCG step, so replaying the same events against the same seed
//! lands on the same outcomes.

/// What a roll decides. Distinct tags keep two rolls for one entity apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Roll {
    /// Gold or health when an enemy drops loot.
    LootKind,
    /// Blowing direction of a wind trap placed without one.
    WindDirection,
}

impl Roll {
    fn salt(self) -> u64 {
        match self {
            Roll::LootKind => 0x85eb_ca6b,
            Roll::WindDirection => 0x0b0a_ca6b_c2b2_ae35,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dice {
    seed: u64,
    draws: u64,
}

impl Dice {
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    /// Rolls made so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// `true` with `percent` percent probability. `0` never hits, `100` always does.
    pub fn chance(&mut self, entity: u32, roll: Roll, percent: u32) -> bool {
        let d100 = self.next(entity, roll) % 100 + 1;
        d100 <= percent
    }

    /// Index in `0..len`; `len` of zero or one always yields `0`.
    pub fn pick(&mut self, entity: u32, roll: Roll, len: usize) -> usize {
        let value = self.next(entity, roll);
        match u32::try_from(len) {
            Ok(0 | 1) => 0,
            Ok(n) => (value % n) as usize,
            Err(_) => value as usize,
        }
    }

    fn next(&mut self, entity: u32, roll: Roll) -> u32 {
        self.draws += 1;
        pcg32(mix(self.seed, self.draws, entity, roll))
    }
}

fn mix(seed: u64, draw: u64, entity: u32, roll: Roll) -> u64 {
    let mut h = seed
        ^ draw.wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ u64::from(entity).wrapping_mul(0x517c_c1b7_2722_0a95)
        ^ roll.salt();
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^ (h >> 33)
}

/// One PCG-XSH-RR step.
fn pcg32(state: u64) -> u32 {
    let state = state
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407);
    let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
    xorshifted.rotate_right((state >> 59) as u32)
}
