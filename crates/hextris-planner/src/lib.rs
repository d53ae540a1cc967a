//! Autoplay placement search for the hex falling-block engine.
//!
//! [`AutoplayPlanner`] tries every orientation and target column through
//! the same validated move primitives the engine replays later, scores
//! each landing with a weighted feature sum ([`PlacementOutcome`]) and
//! returns the best plan.

pub use self::{outcome::*, planner::*};

mod outcome;
mod planner;
