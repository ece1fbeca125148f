use bitflags::bitflags;

use crate::types::{NavDomain, Position};

/// Canonical terrain classes for board tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    #[default]
    Ground,
    Wall,
    Pit,
    Bridge,
    /// Sentinel returned for reads outside a non-wrapping board.
    Null,
}

impl TileKind {
    /// Static capability: may an entity of `domain` occupy this tile at all?
    pub const fn is_traversable(self, domain: NavDomain) -> bool {
        match self {
            TileKind::Ground | TileKind::Bridge => true,
            TileKind::Pit => !matches!(domain, NavDomain::Ground),
            TileKind::Wall | TileKind::Null => false,
        }
    }

    /// Blocks movement and line of sight.
    ///
    /// Pits are open air: they stop walkers but never block sight or shots.
    pub const fn is_obstruction(self) -> bool {
        match self {
            TileKind::Ground | TileKind::Pit => false,
            other => !other.is_traversable(NavDomain::Ground),
        }
    }

    /// Whether this tile visually joins with a neighbour of kind `other`.
    pub const fn links_to(self, other: TileKind) -> bool {
        match self {
            TileKind::Ground => matches!(other, TileKind::Ground | TileKind::Bridge),
            TileKind::Bridge => matches!(other, TileKind::Bridge | TileKind::Ground),
            TileKind::Pit => matches!(other, TileKind::Pit | TileKind::Bridge | TileKind::Null),
            TileKind::Wall => matches!(other, TileKind::Wall | TileKind::Null),
            TileKind::Null => false,
        }
    }

    /// Single-character glyph used by text layouts.
    pub const fn glyph(self) -> char {
        match self {
            TileKind::Ground => '.',
            TileKind::Wall => '#',
            TileKind::Pit => '~',
            TileKind::Bridge => '=',
            TileKind::Null => ' ',
        }
    }

    pub const fn from_glyph(glyph: char) -> Option<TileKind> {
        match glyph {
            '.' => Some(TileKind::Ground),
            '#' => Some(TileKind::Wall),
            '~' => Some(TileKind::Pit),
            '=' => Some(TileKind::Bridge),
            ' ' => Some(TileKind::Null),
            _ => None,
        }
    }
}

bitflags! {
    /// Eight-way linkage of a tile with its neighbours. Rendering only.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Links: u8 {
        const NORTH      = 1 << 0;
        const NORTH_EAST = 1 << 1;
        const EAST       = 1 << 2;
        const SOUTH_EAST = 1 << 3;
        const SOUTH      = 1 << 4;
        const SOUTH_WEST = 1 << 5;
        const WEST       = 1 << 6;
        const NORTH_WEST = 1 << 7;
    }
}

impl Links {
    /// Neighbour offsets paired with the flag on this tile and the flag the
    /// neighbour sets back towards this tile.
    pub(crate) const PAIRS: [((i32, i32), Links, Links); 8] = [
        ((0, -1), Links::NORTH, Links::SOUTH),
        ((1, -1), Links::NORTH_EAST, Links::SOUTH_WEST),
        ((1, 0), Links::EAST, Links::WEST),
        ((1, 1), Links::SOUTH_EAST, Links::NORTH_WEST),
        ((0, 1), Links::SOUTH, Links::NORTH),
        ((-1, 1), Links::SOUTH_WEST, Links::NORTH_EAST),
        ((-1, 0), Links::WEST, Links::EAST),
        ((-1, -1), Links::NORTH_WEST, Links::SOUTH_EAST),
    ];
}

/// A board cell as seen by callers: where it is, what it is, how it links.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub position: Position,
    pub kind: TileKind,
    pub links: Links,
}

impl Tile {
    pub const fn new(position: Position, kind: TileKind) -> Self {
        Self {
            position,
            kind,
            links: Links::empty(),
        }
    }

    #[inline]
    pub const fn is_traversable(&self, domain: NavDomain) -> bool {
        self.kind.is_traversable(domain)
    }

    #[inline]
    pub const fn is_obstruction(&self) -> bool {
        self.kind.is_obstruction()
    }
}
