//! Core of a hexagonal falling-block puzzle.
//!
//! The play field is a rectangular grid of hex cells; odd columns sit half
//! a cell lower than even ones, which makes six-way adjacency and 60°
//! rotations possible on plain array storage. The crate provides:
//!
//! - [`HexBoard`] - the grid, wall framing, line operations and the hex
//!   rotation transform
//! - [`Stone`] - a falling shape with validated move/rotate steps
//! - [`Game`] - the timed state machine (phases, scoring, spawning,
//!   line-clear pass, autoplay plan execution)
//! - [`GameWorker`] - the drop-loop thread plus the shared-state handle
//!   used by front ends
//!
//! Front ends render from [`GameSnapshot`] clones and never touch live
//! state. Autoplay is pluggable through [`BestMovePlanner`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
