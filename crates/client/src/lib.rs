//! Headless dungeon client.
//!
//! The `dungeon` binary loads content, builds a session and lets the
//! [`Autopilot`] play it, printing a JSON report at the end.
pub mod autopilot;
pub mod config;
pub mod logging;

pub use autopilot::Autopilot;
pub use config::ClientConfig;
