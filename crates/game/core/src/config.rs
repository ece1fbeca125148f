/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Board width in tiles.
    pub width: i32,
    /// Board height in tiles.
    pub height: i32,
    /// Toroidal board: coordinates wrap instead of reading the null sentinel.
    pub wrap_around: bool,
    /// Seconds a committed move takes to interpolate.
    pub move_delay: f64,
    /// Pixel edge of a tile, used for tween offsets.
    pub tile_size: i32,
    /// Seconds between projectile steps.
    pub particle_step: f64,
    /// Numerator of the pathfinder's hazard penalty (`penalty / health_ratio`).
    pub hazard_penalty: f64,
    /// Percent chance that a dying enemy drops gold instead of a potion.
    pub gold_drop_percent: u32,
    /// Percent of max health restored by a potion.
    pub potion_heal_percent: u32,
    /// Enemy exp/gold are divided by this when granted as rewards.
    pub reward_divisor: i32,
    /// Base seed for loot rolls and random trap directions.
    pub seed: u64,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Neighbours examined per pathfinding expansion.
    pub const MAX_NEIGHBORS: usize = 4;
    /// Upper bound on enemies accepted from a layout.
    pub const MAX_ENEMIES: usize = 128;
    /// Waypoints kept per patrol route; extra entries are dropped.
    pub const MAX_PATROL_WAYPOINTS: usize = 32;
    /// Tiles a wind trap may push its victim.
    pub const WIND_PUSH_TILES: i32 = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_WIDTH: i32 = 20;
    pub const DEFAULT_HEIGHT: i32 = 15;
    pub const DEFAULT_MOVE_DELAY: f64 = 0.1;
    pub const DEFAULT_TILE_SIZE: i32 = 32;
    pub const DEFAULT_PARTICLE_STEP: f64 = 0.1;
    pub const DEFAULT_HAZARD_PENALTY: f64 = 50.0;
    pub const DEFAULT_GOLD_DROP_PERCENT: u32 = 80;
    pub const DEFAULT_POTION_HEAL_PERCENT: u32 = 20;
    pub const DEFAULT_REWARD_DIVISOR: i32 = 10;

    pub fn new() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            wrap_around: false,
            move_delay: Self::DEFAULT_MOVE_DELAY,
            tile_size: Self::DEFAULT_TILE_SIZE,
            particle_step: Self::DEFAULT_PARTICLE_STEP,
            hazard_penalty: Self::DEFAULT_HAZARD_PENALTY,
            gold_drop_percent: Self::DEFAULT_GOLD_DROP_PERCENT,
            potion_heal_percent: Self::DEFAULT_POTION_HEAL_PERCENT,
            reward_divisor: Self::DEFAULT_REWARD_DIVISOR,
            seed: 0,
        }
    }

    pub fn with_dimensions(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn wrapping(mut self, wrap_around: bool) -> Self {
        self.wrap_around = wrap_around;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
