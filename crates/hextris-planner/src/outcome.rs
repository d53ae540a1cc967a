use hextris_engine::core::{HexBoard, HexPos, ScanFrom};

/// Features of a board after a candidate stone has settled on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementOutcome {
    cleared_rows: u32,
    stack_height: u32,
    covered_holes: u32,
}

impl PlacementOutcome {
    /// Measures a board that already contains the candidate stone as
    /// settled content. Runs the line-clear pass on a copy first, so the
    /// features describe the board the next stone will actually see.
    #[must_use]
    pub fn from_settled(board: &HexBoard) -> Self {
        let mut board = board.clone();
        let cleared_rows =
            u32::try_from(board.clear_full_rows()).expect("cleared row count fits in u32");

        let surface = board.surface(ScanFrom::Top);
        let floor = board.height() - 1;
        let mut stack_height = 0_u32;
        let mut covered_holes = 0_u32;
        for x in 1..board.width() - 1 {
            // The wall floor guarantees a hit in every column.
            let top = usize::try_from(surface[x]).expect("framed column has a surface");
            stack_height =
                stack_height.max(u32::try_from(floor - top).expect("board height fits in u32"));
            for y in top + 1..floor {
                let pos = HexPos::new(
                    i32::try_from(x).expect("board width fits in i32"),
                    i32::try_from(y).expect("board height fits in i32"),
                );
                if board.cell(pos).is_empty() {
                    covered_holes += 1;
                }
            }
        }

        Self {
            cleared_rows,
            stack_height,
            covered_holes,
        }
    }

    /// Rows completed by the placement.
    #[must_use]
    pub fn cleared_rows(&self) -> u32 {
        self.cleared_rows
    }

    /// Tallest interior column after the clear pass.
    #[must_use]
    pub fn stack_height(&self) -> u32 {
        self.stack_height
    }

    /// Empty cells below the surface of their column.
    #[must_use]
    pub fn covered_holes(&self) -> u32 {
        self.covered_holes
    }
}
