use crate::config::GameConfig;
use crate::pathfinding::Path;
use crate::roster::EnemyTemplate;
use crate::types::{EntityId, Position};

/// Per-enemy memory consulted by the behavior tree each turn.
///
/// The behavior state (patrolling, investigating, chasing) is never stored;
/// it is read off which of these fields are set.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyMind {
    /// Roster key this enemy was spawned from.
    pub kind: String,
    pub sight_radius: f64,
    /// Extra sight granted while already chasing.
    pub sight_bonus: f64,
    pub(crate) pursuit: Option<EntityId>,
    pub(crate) investigation: Option<Position>,
    /// Commanded destination, usually set by scripts.
    pub target: Option<Position>,
    patrol: Vec<Position>,
    patrol_index: usize,
    pub(crate) path: Path,
}

impl EnemyMind {
    pub fn new(template: &EnemyTemplate) -> Self {
        Self {
            kind: template.kind.clone(),
            sight_radius: template.sight_radius,
            sight_bonus: template.sight_bonus,
            pursuit: None,
            investigation: None,
            target: None,
            patrol: Vec::new(),
            patrol_index: 0,
            path: Path::default(),
        }
    }

    pub fn pursuit(&self) -> Option<EntityId> {
        self.pursuit
    }

    pub fn is_chasing(&self) -> bool {
        self.pursuit.is_some()
    }

    pub fn investigation_point(&self) -> Option<Position> {
        self.investigation
    }

    pub fn is_investigating(&self) -> bool {
        self.investigation.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_en_route(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn patrol(&self) -> &[Position] {
        &self.patrol
    }

    /// Replaces the patrol route and restarts it from the first waypoint.
    pub fn set_patrol(&mut self, waypoints: impl IntoIterator<Item = Position>) {
        self.patrol = waypoints
            .into_iter()
            .take(GameConfig::MAX_PATROL_WAYPOINTS)
            .collect();
        self.patrol_index = 0;
    }

    pub fn current_waypoint(&self) -> Option<Position> {
        self.patrol.get(self.patrol_index).copied()
    }

    pub(crate) fn advance_waypoint(&mut self) {
        if !self.patrol.is_empty() {
            self.patrol_index = (self.patrol_index + 1) % self.patrol.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patrol_cycles_and_resets() {
        let mut mind = EnemyMind::new(&EnemyTemplate::default());
        mind.set_patrol([Position::new(1, 1), Position::new(2, 2)]);
        mind.advance_waypoint();
        assert_eq!(mind.current_waypoint(), Some(Position::new(2, 2)));
        mind.advance_waypoint();
        assert_eq!(mind.current_waypoint(), Some(Position::new(1, 1)));

        mind.advance_waypoint();
        mind.set_patrol([Position::new(5, 5)]);
        assert_eq!(mind.current_waypoint(), Some(Position::new(5, 5)));
        mind.advance_waypoint();
        assert_eq!(mind.current_waypoint(), Some(Position::new(5, 5)));
    }

    #[test]
    fn empty_patrol_has_no_waypoint() {
        let mut mind = EnemyMind::new(&EnemyTemplate::default());
        mind.advance_waypoint();
        assert_eq!(mind.current_waypoint(), None);
    }

    #[test]
    fn long_patrols_are_capped() {
        let mut mind = EnemyMind::new(&EnemyTemplate::default());
        mind.set_patrol((0..100).map(|x| Position::new(x, 0)));
        assert_eq!(mind.patrol().len(), GameConfig::MAX_PATROL_WAYPOINTS);
    }
}
