//! End-to-end rules exercised through the public `Dungeon` API.

use game_core::{
    Actor, Direction, Dungeon, EnemyRoster, EnemyTemplate, EntityId, GameConfig, GameEvent,
    Mover, NavDomain, Outcome, PlayerClass, PlayerCommand, Position, Stats, TileKind, find_path,
};

fn enemy_with_defense(defense: f64) -> EnemyTemplate {
    EnemyTemplate {
        max_health: 100.0,
        defense,
        ..EnemyTemplate::named("Dummy")
    }
}

#[test]
fn defense_scales_incoming_damage() {
    let mut d = Dungeon::new(GameConfig::with_dimensions(5, 5));
    let cases = [(0.0, 70.0, 30.0), (100.0, 85.0, 15.0), (-100.0, 55.0, 45.0)];
    for (i, (defense, health, dealt)) in cases.into_iter().enumerate() {
        let id = d
            .place_enemy(Position::new(i as i32, 0), &enemy_with_defense(defense), None)
            .unwrap();
        assert_eq!(d.take_damage(id, 30.0, EntityId::SYSTEM), Ok(dealt));
        assert_eq!(d.actor(id).unwrap().health(), health);
    }
}

#[test]
fn sleep_merges_to_the_longest() {
    let mut d = Dungeon::new(GameConfig::with_dimensions(5, 5));
    let id = d
        .place_enemy(Position::new(1, 1), &EnemyTemplate::default(), None)
        .unwrap();
    d.sleep(id, 3).unwrap();
    d.sleep(id, 1).unwrap();
    assert_eq!(d.actor(id).unwrap().sleep_counter(), 3);
    d.sleep(id, 5).unwrap();
    assert_eq!(d.actor(id).unwrap().sleep_counter(), 5);
    let markers = d
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::FellAsleep { .. }))
        .count();
    assert_eq!(markers, 1);
}

#[test]
fn corridor_path_has_goal_at_head() {
    let n = 7;
    let d = Dungeon::new(GameConfig::with_dimensions(n + 1, 1));
    let mover = Mover {
        position: Position::new(0, 0),
        domain: NavDomain::Ground,
        attack_range: 0,
        health_ratio: 1.0,
    };
    let path = find_path(&d, &mover, Some(Position::new(n, 0)));
    assert_eq!(path.len(), n as usize);
    assert_eq!(path.destination(), Some(Position::new(n, 0)));
    assert_eq!(path.next_step(), Some(Position::new(1, 0)));
}

#[test]
fn blocked_move_onto_own_tile_still_succeeds() {
    let mut d = Dungeon::new(GameConfig::with_dimensions(5, 5));
    d.set_spawn(Position::new(2, 2)).unwrap();
    d.set_player(Actor::player(PlayerClass::Warrior, Stats::default()));
    d.set_tile(Position::new(3, 2), TileKind::Wall);

    assert!(d.try_move_to(EntityId::PLAYER, Position::new(2, 2)));
    assert!(!d.try_move_to(EntityId::PLAYER, Position::new(3, 2)));
    assert_eq!(d.player().unwrap().position, Position::new(2, 2));
}

#[test]
fn warrior_clears_a_snake_and_walks_out() {
    let mut d = Dungeon::new(GameConfig::with_dimensions(6, 1).with_seed(42));
    d.set_player(Actor::player(PlayerClass::Warrior, Stats::default()));
    let roster = EnemyRoster::standard();
    let snake = d
        .place_enemy(Position::new(3, 0), roster.get("snake").unwrap(), None)
        .unwrap();

    let mut rounds = 0;
    while !d.is_over() && rounds < 50 {
        rounds += 1;
        let ahead = d.player().map(|p| p.position.step(Direction::Right, 1));
        let facing_enemy = d.actor(snake).map(|a| a.position) == ahead;
        let command = if facing_enemy {
            PlayerCommand::Attack(Direction::Right)
        } else {
            PlayerCommand::Move(Direction::Right)
        };
        while d.player_turn(Some(command)) {
            for _ in 0..10 {
                d.update(0.05);
            }
        }
        for _ in 0..10 {
            d.update(0.05);
        }
        d.run_enemy_phase();
        for _ in 0..10 {
            d.update(0.05);
        }
        d.advance_round();
    }

    assert_eq!(d.end_state().outcome, Some(Outcome::Win));
    assert!(d.actor(snake).is_none());
    assert!(d.end_state().exp_gain >= 10);
    assert!(
        d.events()
            .iter()
            .any(|e| matches!(e, GameEvent::RoundAdvanced { .. }))
    );
}
