//! A* search over the 4-connected tile grid.
//!
//! The search is recomputed from scratch on every call; callers decide when a
//! path is stale.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::grid::Grid;
use crate::types::{Direction, NavDomain, Position};

/// Board view the pathfinder searches.
pub trait NavMap {
    fn grid(&self) -> &Grid;

    /// Traversable for `domain` and not held by a living actor.
    fn is_passable(&self, pos: Position, domain: NavDomain) -> bool;

    fn has_hazard(&self, pos: Position) -> bool;

    /// Numerator of the hazard penalty, divided by the mover's health ratio.
    fn hazard_penalty(&self) -> f64 {
        GameConfig::DEFAULT_HAZARD_PENALTY
    }
}

/// The parts of an actor the cost estimate depends on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mover {
    pub position: Position,
    pub domain: NavDomain,
    pub attack_range: i32,
    pub health_ratio: f64,
}

/// Route with the destination at the head and the next step at the tail.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    steps: Vec<Position>,
}

impl Path {
    pub fn new(steps: Vec<Position>) -> Self {
        Self { steps }
    }

    pub fn destination(&self) -> Option<Position> {
        self.steps.first().copied()
    }

    pub fn next_step(&self) -> Option<Position> {
        self.steps.last().copied()
    }

    pub fn pop_step(&mut self) -> Option<Position> {
        self.steps.pop()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.steps
    }
}

#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    f_score: f64,
    seq: u64,
    position: Position,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    // Reversed so the max-heap pops the lowest f, earliest pushed first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn estimate<M: NavMap + ?Sized>(map: &M, mover: &Mover, from: Position, goal: Position) -> f64 {
    let grid = map.grid();
    let mut dist = grid.measure_distance(from, goal);

    if mover.attack_range > 0
        && dist <= f64::from(mover.attack_range)
        && grid.is_clear_shot(from, goal)
    {
        dist -= f64::from(mover.attack_range);
    }

    if map.has_hazard(from) {
        dist += map.hazard_penalty() / mover.health_ratio;
    }
    dist
}

fn neighbors<M: NavMap + ?Sized>(
    map: &M,
    mover: &Mover,
    current: Position,
    goal: Position,
) -> ArrayVec<Position, { GameConfig::MAX_NEIGHBORS }> {
    let mut out = ArrayVec::new();
    for dir in Direction::ALL {
        let tile = map.grid().adjacent(current, dir);
        if map.is_passable(tile.position, mover.domain) || tile.position == goal {
            out.push(tile.position);
        }
    }
    out
}

/// Shortest route for `mover` to `goal`.
///
/// Neighbours are eligible when passable for the mover or when they are the
/// goal itself, so an occupied goal is still reachable. Returns an empty path
/// when there is no destination, the goal is off the board, the mover is
/// already there, or no route exists.
pub fn find_path<M: NavMap + ?Sized>(map: &M, mover: &Mover, goal: Option<Position>) -> Path {
    let Some(goal) = goal.and_then(|g| map.grid().normalize(g)) else {
        return Path::default();
    };
    let start = mover.position;

    let mut open = BinaryHeap::new();
    let mut g_score: HashMap<Position, f64> = HashMap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut closed: HashSet<Position> = HashSet::new();
    let mut seq = 0u64;

    g_score.insert(start, 0.0);
    open.push(OpenEntry {
        f_score: estimate(map, mover, start, goal),
        seq,
        position: start,
    });

    while let Some(OpenEntry { position: current, .. }) = open.pop() {
        if current == goal {
            return reconstruct(&came_from, goal);
        }
        if !closed.insert(current) {
            continue;
        }

        let current_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);
        for neighbor in neighbors(map, mover, current, goal) {
            if closed.contains(&neighbor) {
                continue;
            }
            let tentative = current_g + 1.0;
            let known = g_score.get(&neighbor).copied().unwrap_or(f64::INFINITY);
            if tentative < known {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative);
                seq += 1;
                open.push(OpenEntry {
                    f_score: tentative + estimate(map, mover, neighbor, goal),
                    seq,
                    position: neighbor,
                });
            }
        }
    }
    Path::default()
}

fn reconstruct(came_from: &HashMap<Position, Position>, goal: Position) -> Path {
    let mut steps = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        steps.push(prev);
        current = prev;
    }
    // The last entry is the tile the mover already stands on.
    steps.pop();
    Path::new(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileKind;

    struct Board {
        grid: Grid,
        occupied: Vec<Position>,
        hazards: Vec<Position>,
    }

    impl Board {
        fn open(width: i32, height: i32) -> Self {
            Self {
                grid: Grid::new(width, height, false),
                occupied: Vec::new(),
                hazards: Vec::new(),
            }
        }
    }

    impl NavMap for Board {
        fn grid(&self) -> &Grid {
            &self.grid
        }

        fn is_passable(&self, pos: Position, domain: NavDomain) -> bool {
            self.grid.tile(pos).is_traversable(domain) && !self.occupied.contains(&pos)
        }

        fn has_hazard(&self, pos: Position) -> bool {
            self.hazards.contains(&pos)
        }
    }

    fn walker(position: Position) -> Mover {
        Mover {
            position,
            domain: NavDomain::Ground,
            attack_range: 0,
            health_ratio: 1.0,
        }
    }

    #[test]
    fn corridor_path_runs_head_to_tail() {
        let board = Board::open(8, 1);
        let path = find_path(&board, &walker(Position::new(0, 0)), Some(Position::new(6, 0)));
        assert_eq!(path.len(), 6);
        assert_eq!(path.destination(), Some(Position::new(6, 0)));
        assert_eq!(path.next_step(), Some(Position::new(1, 0)));
    }

    #[test]
    fn missing_or_current_goal_is_empty() {
        let board = Board::open(4, 4);
        let mover = walker(Position::new(1, 1));
        assert!(find_path(&board, &mover, None).is_empty());
        assert!(find_path(&board, &mover, Some(Position::new(1, 1))).is_empty());
        assert!(find_path(&board, &mover, Some(Position::new(9, 9))).is_empty());
    }

    #[test]
    fn occupied_goal_is_reachable() {
        let mut board = Board::open(5, 1);
        board.occupied.push(Position::new(4, 0));
        let path = find_path(&board, &walker(Position::new(0, 0)), Some(Position::new(4, 0)));
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn walls_force_a_detour() {
        let mut board = Board::open(5, 3);
        board.grid.set_kind(Position::new(2, 0), TileKind::Wall);
        board.grid.set_kind(Position::new(2, 1), TileKind::Wall);
        let path = find_path(&board, &walker(Position::new(0, 0)), Some(Position::new(4, 0)));
        assert!(path.as_slice().contains(&Position::new(2, 2)));
        assert_eq!(path.len(), 8);
    }

    #[test]
    fn blocked_route_is_empty() {
        let mut board = Board::open(5, 1);
        board.occupied.push(Position::new(2, 0));
        let path = find_path(&board, &walker(Position::new(0, 0)), Some(Position::new(4, 0)));
        assert!(path.is_empty());
    }

    #[test]
    fn pits_only_for_flyers() {
        let mut board = Board::open(3, 1);
        board.grid.set_kind(Position::new(1, 0), TileKind::Pit);
        let goal = Some(Position::new(2, 0));
        assert!(find_path(&board, &walker(Position::new(0, 0)), goal).is_empty());

        let flyer = Mover {
            domain: NavDomain::Flying,
            ..walker(Position::new(0, 0))
        };
        assert_eq!(find_path(&board, &flyer, goal).len(), 2);
    }

    #[test]
    fn pop_step_walks_toward_head() {
        let mut path = Path::new(vec![Position::new(3, 0), Position::new(2, 0), Position::new(1, 0)]);
        assert_eq!(path.pop_step(), Some(Position::new(1, 0)));
        assert_eq!(path.next_step(), Some(Position::new(2, 0)));
        assert_eq!(path.destination(), Some(Position::new(3, 0)));
    }
}
