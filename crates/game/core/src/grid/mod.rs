//! Fixed-size board of tiles with traversal, distance and sight queries.
//!
//! Reads never fail: a non-wrapping board answers out-of-range positions with a
//! [`TileKind::Null`] sentinel, and a wrapping board folds every coordinate back
//! onto the board.

mod tile;

pub use tile::{Links, Tile, TileKind};

use crate::config::GameConfig;
use crate::types::{Direction, Position};

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    wrap_around: bool,
    tiles: Vec<Tile>,
}

impl Grid {
    /// All-ground board with linkage computed.
    pub fn new(width: i32, height: i32, wrap_around: bool) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(Position::new(x, y), TileKind::Ground));
            }
        }
        let mut grid = Self {
            width,
            height,
            wrap_around,
            tiles,
        };
        grid.relink_all();
        grid
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.width, config.height, config.wrap_around)
    }

    /// Builds a board from glyph rows (see [`TileKind::glyph`]).
    ///
    /// Rows shorter than the widest row are padded with ground.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], wrap_around: bool) -> Result<Self, (usize, char)> {
        let height = rows.len() as i32;
        let width = rows
            .iter()
            .map(|row| row.as_ref().chars().count())
            .max()
            .unwrap_or(0) as i32;
        let mut grid = Self::new(width, height, wrap_around);
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.as_ref().chars().enumerate() {
                let kind = TileKind::from_glyph(glyph).ok_or((y, glyph))?;
                grid.put(Position::new(x as i32, y as i32), kind);
            }
        }
        grid.relink_all();
        Ok(grid)
    }

    /// Glyph rows, one string per board row.
    pub fn rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.kind(Position::new(x, y)).glyph())
                    .collect()
            })
            .collect()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn wraps(&self) -> bool {
        self.wrap_around
    }

    pub fn wrap_x(&self, x: i32) -> i32 {
        wrap_axis(x, self.width)
    }

    pub fn wrap_y(&self, y: i32) -> i32 {
        wrap_axis(y, self.height)
    }

    /// Canonical on-board position, or `None` when it lies off a non-wrapping board.
    pub fn normalize(&self, pos: Position) -> Option<Position> {
        if self.wrap_around {
            Some(Position::new(self.wrap_x(pos.x), self.wrap_y(pos.y)))
        } else if self.in_bounds(pos) {
            Some(pos)
        } else {
            None
        }
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.normalize(pos).is_some()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.normalize(pos)
            .map(|p| (p.y * self.width + p.x) as usize)
    }

    /// Tile at `pos`; the null sentinel when off a non-wrapping board.
    pub fn tile(&self, pos: Position) -> Tile {
        match self.index(pos) {
            Some(i) => self.tiles[i],
            None => Tile::new(pos, TileKind::Null),
        }
    }

    #[inline]
    pub fn kind(&self, pos: Position) -> TileKind {
        self.tile(pos).kind
    }

    /// Neighbouring tile one step in `dir`.
    pub fn adjacent(&self, pos: Position, dir: Direction) -> Tile {
        self.tile(pos + dir)
    }

    /// Replaces the tile kind and refreshes linkage around it.
    ///
    /// Returns `false` when `pos` is off the board.
    pub fn set_kind(&mut self, pos: Position, kind: TileKind) -> bool {
        let Some(pos) = self.normalize(pos) else {
            return false;
        };
        self.put(pos, kind);
        self.relink(pos);
        true
    }

    fn put(&mut self, pos: Position, kind: TileKind) {
        if let Some(i) = self.index(pos) {
            self.tiles[i].kind = kind;
        }
    }

    fn relink_all(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                self.relink(Position::new(x, y));
            }
        }
    }

    fn relink(&mut self, pos: Position) {
        let Some(me) = self.index(pos) else {
            return;
        };
        let kind = self.tiles[me].kind;
        for ((dx, dy), mine, theirs) in Links::PAIRS {
            let other_pos = Position::new(pos.x + dx, pos.y + dy);
            let other_kind = self.kind(other_pos);
            self.tiles[me].links.set(mine, kind.links_to(other_kind));
            if let Some(other) = self.index(other_pos) {
                self.tiles[other]
                    .links
                    .set(theirs, other_kind.links_to(kind));
            }
        }
    }

    /// A pit is drawn in shadow when a bridge spans the tile north of it.
    pub fn is_covered(&self, pos: Position) -> bool {
        self.kind(pos) == TileKind::Pit && self.kind(Position::new(pos.x, pos.y - 1)) == TileKind::Bridge
    }

    /// Euclidean distance; on a wrapping board each axis takes the shortest way round.
    pub fn measure_distance(&self, begin: Position, end: Position) -> f64 {
        let mut dx = end.x - begin.x;
        let mut dy = end.y - begin.y;
        if self.wrap_around {
            dx = shortest_delta(dx, self.width);
            dy = shortest_delta(dy, self.height);
        }
        f64::from(dx * dx + dy * dy).sqrt()
    }

    /// Rasterised line of sight from `begin` to `end`.
    ///
    /// Steps along the major axis from `begin` (inclusive) up to `end`
    /// (exclusive), interpolating the minor axis with truncation toward zero.
    /// An obstructing `end` is never visible.
    pub fn is_point_visible_from(&self, begin: Position, end: Position) -> bool {
        if self.tile(end).is_obstruction() {
            return false;
        }

        let (x0, y0) = (f64::from(begin.x), f64::from(begin.y));
        let dx = f64::from(end.x - begin.x);
        let dy = f64::from(end.y - begin.y);

        if dx.abs() < dy.abs() {
            let step = if begin.y < end.y { 1 } else { -1 };
            let mut y = begin.y;
            while y != end.y {
                let x = (dx * (f64::from(y) - y0) / dy + x0) as i32;
                if self.tile(Position::new(x, y)).is_obstruction() {
                    return false;
                }
                y += step;
            }
        } else {
            let step = if begin.x < end.x { 1 } else { -1 };
            let mut x = begin.x;
            while x != end.x {
                let y = (dy * (f64::from(x) - x0) / dx + y0) as i32;
                if self.tile(Position::new(x, y)).is_obstruction() {
                    return false;
                }
                x += step;
            }
        }
        true
    }

    /// Tiles within `range` of `pos` that are visible from it, scanned column by column.
    pub fn visible_tiles_from(&self, pos: Position, range: f64) -> Vec<Tile> {
        let sight = range.ceil() as i32;
        let mut tiles = Vec::new();
        for x in pos.x - sight..=pos.x + sight {
            for y in pos.y - sight..=pos.y + sight {
                let p = Position::new(x, y);
                if self.is_point_visible_from(pos, p) && self.measure_distance(pos, p) <= range {
                    tiles.push(self.tile(p));
                }
            }
        }
        tiles
    }

    /// Tiles on the line from `begin` toward `end`, with independent insets.
    ///
    /// The walk starts `off_start` tiles past `begin` and stops before the tile
    /// `off_end` past `end`. Empty for coincident or non-aligned endpoints, and
    /// for inverted ranges on a non-wrapping board.
    pub fn tile_range(&self, begin: Position, end: Position, off_start: i32, off_end: i32) -> Vec<Tile> {
        if begin == end {
            return Vec::new();
        }
        if begin.x == end.x {
            let step = if begin.y < end.y { 1 } else { -1 };
            self.axis_walk(begin.y + step * off_start, end.y + step * off_end, step, self.height)
                .into_iter()
                .map(|y| self.tile(Position::new(end.x, y)))
                .collect()
        } else if begin.y == end.y {
            let step = if begin.x < end.x { 1 } else { -1 };
            self.axis_walk(begin.x + step * off_start, end.x + step * off_end, step, self.width)
                .into_iter()
                .map(|x| self.tile(Position::new(x, end.y)))
                .collect()
        } else {
            Vec::new()
        }
    }

    fn axis_walk(&self, from: i32, to: i32, step: i32, extent: i32) -> Vec<i32> {
        let ordered = if step < 0 { to < from } else { from < to };
        if !ordered && !self.wrap_around {
            return Vec::new();
        }
        let to = if self.wrap_around { wrap_axis(to, extent) } else { to };

        let mut out = Vec::new();
        let mut cursor = from;
        // A wrapped walk visits every coordinate at most once before meeting `to`.
        let limit = extent as usize + 1;
        while cursor != to && out.len() <= limit {
            out.push(cursor);
            cursor = if self.wrap_around {
                wrap_axis(cursor + step, extent)
            } else {
                cursor + step
            };
        }
        out
    }

    /// Axis-aligned line between `from` and `to` with nothing obstructing strictly between.
    pub fn is_clear_shot(&self, from: Position, to: Position) -> bool {
        if from.x != to.x && from.y != to.y {
            return false;
        }
        self.tile_range(from, to, 1, 0)
            .iter()
            .all(|tile| !tile.is_obstruction())
    }

    /// Every on-board position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles.iter().map(|tile| tile.position)
    }
}

fn wrap_axis(value: i32, extent: i32) -> i32 {
    if value < 0 {
        let rem = value % extent;
        if rem == 0 { 0 } else { extent + rem }
    } else if value >= extent {
        value % extent
    } else {
        value
    }
}

fn shortest_delta(delta: i32, extent: i32) -> i32 {
    [delta, delta - extent, delta + extent]
        .into_iter()
        .min_by_key(|d| d.abs())
        .unwrap_or(delta)
}
