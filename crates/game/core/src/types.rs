//! Identifiers and grid geometry shared by every module.

use core::fmt;
use core::ops::{Add, Sub};

/// Unique identifier for any actor tracked in a dungeon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    /// Reserved identifier for damage sources that are not actors (traps, hazards).
    pub const SYSTEM: Self = Self(u32::MAX);

    #[inline]
    pub const fn is_system(self) -> bool {
        self.0 == Self::SYSTEM.0
    }

    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
///
/// `y` grows downwards, so [`Direction::Up`] is `(0, -1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position `n` tiles away in `dir`.
    pub fn step(self, dir: Direction, n: i32) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx * n, self.y + dy * n)
    }

    /// Direction from `self` to `other` when both lie on one row or column.
    ///
    /// Returns `None` for coincident or diagonal pairs.
    pub fn direction_to(self, other: Position) -> Option<Direction> {
        if self == other {
            return None;
        }
        if self.x == other.x {
            Some(if other.y > self.y {
                Direction::Down
            } else {
                Direction::Up
            })
        } else if self.y == other.y {
            Some(if other.x > self.x {
                Direction::Right
            } else {
                Direction::Left
            })
        } else {
            None
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add<Direction> for Position {
    type Output = Position;

    fn add(self, rhs: Direction) -> Position {
        self.step(rhs, 1)
    }
}

impl Sub for Position {
    type Output = (i32, i32);

    fn sub(self, rhs: Position) -> (i32, i32) {
        (self.x - rhs.x, self.y - rhs.y)
    }
}

/// The four grid directions, in the order neighbours are scanned.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Up,
    ];

    /// Unit offset `(dx, dy)`.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
        }
    }
}

/// Which tile kinds an entity may occupy.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavDomain {
    #[default]
    Ground,
    Flying,
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_to_requires_alignment() {
        let origin = Position::new(2, 2);
        assert_eq!(origin.direction_to(Position::new(2, 7)), Some(Direction::Down));
        assert_eq!(origin.direction_to(Position::new(-1, 2)), Some(Direction::Left));
        assert_eq!(origin.direction_to(Position::new(3, 3)), None);
        assert_eq!(origin.direction_to(origin), None);
    }

    #[test]
    fn directions_parse_case_insensitively() {
        assert_eq!("UP".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!("left".parse::<Direction>(), Ok(Direction::Left));
        assert!("north".parse::<Direction>().is_err());
        assert_eq!(Direction::Right.to_string(), "right");
    }

    #[test]
    fn opposite_cancels_offset() {
        for dir in Direction::ALL {
            let p = Position::new(4, 4) + dir + dir.opposite();
            assert_eq!(p, Position::new(4, 4));
        }
    }
}
