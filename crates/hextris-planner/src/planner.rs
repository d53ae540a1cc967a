use hextris_engine::{
    core::{HexBoard, ORIENTATION_COUNT, Stone, StoneMove},
    engine::{BestMovePlanner, StonePlan},
};
use serde::{Deserialize, Serialize};

use crate::PlacementOutcome;

/// Feature weights of the placement score. Positive rewards, negative
/// penalties; the defaults strongly reward completed rows and punish
/// burying empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerWeights {
    pub cleared_rows: f32,
    pub stack_height: f32,
    pub covered_holes: f32,
}

impl Default for PlannerWeights {
    fn default() -> Self {
        Self {
            cleared_rows: 8.0,
            stack_height: -1.0,
            covered_holes: -4.0,
        }
    }
}

/// Exhaustive placement search over orientations and target columns.
///
/// Candidates are generated with the same validated rotate/move/descend
/// primitives the engine later replays, so every returned plan is
/// reachable step by step from the spawn position. Ties keep the first
/// candidate found (fewest rotations, leftmost column), which makes the
/// planner deterministic.
#[derive(Debug, Clone, Default)]
pub struct AutoplayPlanner {
    weights: PlannerWeights,
}

impl AutoplayPlanner {
    #[must_use]
    pub fn new(weights: PlannerWeights) -> Self {
        Self { weights }
    }

    fn score(&self, outcome: &PlacementOutcome) -> f32 {
        let cleared = outcome.cleared_rows() as f32;
        let height = outcome.stack_height() as f32;
        let holes = outcome.covered_holes() as f32;
        self.weights.cleared_rows * cleared
            + self.weights.stack_height * height
            + self.weights.covered_holes * holes
    }
}

impl BestMovePlanner for AutoplayPlanner {
    fn best_move(&self, board: &HexBoard, stone: &Stone) -> Option<StonePlan> {
        let mut best: Option<(f32, StonePlan)> = None;

        for rotations in 0..ORIENTATION_COUNT {
            // Replay the rotation prefix of the plan on a scratch board.
            let mut oriented_board = board.clone();
            let mut oriented = stone.clone();
            oriented.place(&mut oriented_board, true);
            let mut reachable = true;
            for _ in 0..rotations {
                if oriented.try_move(&mut oriented_board, StoneMove::RotateLeft).is_err() {
                    reachable = false;
                    break;
                }
            }
            // Orientations that lost cells to the grid edge would commit a
            // truncated stone; never plan those.
            if !reachable || oriented.cell_count() < stone.cell_count() {
                continue;
            }

            let width = i32::try_from(board.width()).expect("board width fits in i32");
            for target_x in 1..width - 1 {
                let mut sim_board = oriented_board.clone();
                let mut sim = oriented.clone();
                if !walk_to_column(&mut sim, &mut sim_board, target_x) {
                    continue;
                }
                while sim.try_move(&mut sim_board, StoneMove::MoveDown).is_ok() {}

                let outcome = PlacementOutcome::from_settled(&sim_board);
                let score = self.score(&outcome);
                if best.is_none_or(|(best_score, _)| score > best_score) {
                    best = Some((score, StonePlan { target_x, rotations }));
                }
            }
        }

        best.map(|(_, plan)| plan)
    }
}

/// Moves the stone horizontally until its anchor reaches `target_x`.
/// Returns `false` when a step is blocked before arriving.
fn walk_to_column(stone: &mut Stone, board: &mut HexBoard, target_x: i32) -> bool {
    while stone.position().x != target_x {
        let direction = if target_x > stone.position().x {
            StoneMove::MoveRight
        } else {
            StoneMove::MoveLeft
        };
        if stone.try_move(board, direction).is_err() {
            return false;
        }
    }
    true
}
