//! The bundled data directory loads and builds.

use game_content::{ContentFactory, LayoutLoader};
use game_core::{Direction, Position, TrapKind};

#[test]
fn bundled_crypt_builds() {
    let factory = ContentFactory::bundled();
    let config = factory.load_config().expect("config.toml");
    let enemies = factory.load_enemies().expect("enemies.ron");
    let traps = factory.load_traps().expect("traps.ron");
    let layout = factory.load_layout("crypt").expect("crypt.ron");

    assert!(enemies.get("skeleton").is_ok());
    assert_eq!(traps.get(TrapKind::Fire).unwrap().damage, 120.0);

    let dungeon = LayoutLoader::build(&layout, config, &enemies, &traps).expect("build");
    assert_eq!(dungeon.grid().width(), 20);
    assert_eq!(dungeon.grid().height(), 15);
    assert_eq!(dungeon.enemies().count(), 4);
    assert_eq!(dungeon.traps().len(), 3);
    assert_eq!(dungeon.exit(), Position::new(19, 14));

    let warden = dungeon.lookup("warden").and_then(|id| dungeon.actor(id)).unwrap();
    assert_eq!(warden.mind().unwrap().patrol().len(), 2);

    let wind = dungeon.lookup("windtrap1").and_then(|id| dungeon.trap(id)).unwrap();
    assert_eq!(wind.wind, Some(Direction::Down));
}

#[test]
fn layout_files_in_a_temp_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("layouts")).unwrap();
    std::fs::write(
        dir.path().join("layouts").join("tiny.ron"),
        r#"(rows: ["..", ".."], spawn: (x: 0, y: 0), exit: (x: 1, y: 1))"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("config.toml"), "seed = 5\n").unwrap();

    let factory = ContentFactory::new(dir.path());
    let layout = factory.load_layout("tiny").unwrap();
    let config = factory.load_config().unwrap();
    assert_eq!(config.seed, 5);
    assert_eq!(layout.rows.len(), 2);
}
