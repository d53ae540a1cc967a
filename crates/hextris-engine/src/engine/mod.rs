//! Game logic on top of the core data structures.
//!
//! - [`Game`] - phases, tick/descend/commit, scoring, spawning, autoplay
//!   plan execution
//! - [`GameWorker`] - drop-loop thread and the handle front ends talk to
//! - [`GameStats`] - level, counters and score
//! - [`StoneGenerator`] - severity-scoped random shape selection
//! - [`GameConfig`] / [`ConfigStore`] - construction parameters and their
//!   persistence port

pub use self::{config::*, game::*, stats::*, stone_generator::*, worker::*};

mod config;
mod game;
mod stats;
mod stone_generator;
mod worker;
