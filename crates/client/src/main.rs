//! Dungeon client binary.
//!
//! Composition root: reads the environment, installs logging, loads the
//! content pack, then plays one session with the autopilot.
//!
//! ```bash
//! DUNGEON_CLASS=mage DUNGEON_LAYOUT=crypt RUST_LOG=debug cargo run -p dungeon-client
//! ```

use anyhow::{Context, Result};
use game_content::{ContentFactory, LayoutLoader};
use game_core::{Actor, GameEvent, Stats};
use runtime::{Event, Session, SessionConfig, Topic};
use tokio::sync::broadcast::error::RecvError;

use dungeon_client::{Autopilot, ClientConfig, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    tracing::info!("Starting Dungeon client");
    tracing::info!("Layout: {}, class: {}", config.layout, config.class);

    let factory = match &config.content_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };
    tracing::debug!("Loading content from {}", factory.data_dir().display());

    let mut game_config = factory.load_config()?;
    if let Some(seed) = config.seed {
        game_config.seed = seed;
    }
    let enemies = factory.load_enemies()?;
    let traps = factory.load_traps()?;
    let layout = factory
        .load_layout(&config.layout)
        .with_context(|| format!("layout '{}'", config.layout))?;

    let mut dungeon = LayoutLoader::build(&layout, game_config, &enemies, &traps)?;
    dungeon.set_player(Actor::player(config.class, Stats::default()));

    let mut session = Session::new(dungeon, Autopilot::new())?.with_config(SessionConfig {
        frame: config.frame,
        max_rounds: config.max_rounds,
        ..SessionConfig::default()
    });

    let mut combat = session.bus().subscribe(Topic::Combat);
    let reporter = tokio::spawn(async move {
        loop {
            match combat.recv().await {
                Ok(Event::Game(GameEvent::Died { entity, position })) => {
                    tracing::info!("{:?} died at {}", entity, position);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Combat log skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let report = session.run().await?;
    drop(session);
    reporter.await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
