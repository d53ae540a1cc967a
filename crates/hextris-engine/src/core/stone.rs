use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::{Cell, ColorId, HexBoard, HexPos, MAX_STONE_CELLS, RotationDirection};

/// Shape-set difficulty. Each step adds larger shapes on top of the
/// previous set and raises the score multiplier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Beginner,
    #[default]
    Medium,
    Expert,
}

impl Severity {
    /// Score multiplier: 1 for Beginner, 2 for Medium, 3 for Expert.
    #[must_use]
    pub const fn multiplier(self) -> u32 {
        self as u32 + 1
    }

    /// Number of shapes drawn from at this severity.
    #[must_use]
    pub const fn shape_count(self) -> usize {
        match self {
            Self::Beginner => 7,
            Self::Medium => 10,
            Self::Expert => 13,
        }
    }
}

struct ShapeDef {
    cells: &'static [HexPos],
    color: ColorId,
}

const fn p(x: i32, y: i32) -> HexPos {
    HexPos::new(x, y)
}

/// Relative cell offsets per shape. All offsets keep `dy >= 1` so a stone
/// anchored one row above the visible top stamps only in-range rows.
/// Shapes `0..7` are the Beginner set, `7..10` are added for Medium and
/// `10..13` for Expert.
static SHAPES: &[ShapeDef] = &[
    // bar
    ShapeDef { cells: &[p(0, 1), p(1, 1), p(2, 1), p(3, 1)], color: ColorId::new(2) },
    // block
    ShapeDef { cells: &[p(0, 1), p(1, 1), p(0, 2), p(1, 2)], color: ColorId::new(3) },
    // rise
    ShapeDef { cells: &[p(0, 2), p(1, 2), p(1, 1), p(2, 1)], color: ColorId::new(4) },
    // drop
    ShapeDef { cells: &[p(0, 1), p(1, 1), p(1, 2), p(2, 2)], color: ColorId::new(5) },
    // fork
    ShapeDef { cells: &[p(0, 1), p(1, 1), p(2, 1), p(1, 2)], color: ColorId::new(6) },
    // hook right
    ShapeDef { cells: &[p(0, 1), p(1, 1), p(2, 1), p(2, 2)], color: ColorId::new(7) },
    // hook left
    ShapeDef { cells: &[p(0, 1), p(0, 2), p(1, 1), p(2, 1)], color: ColorId::new(8) },
    // long bar
    ShapeDef { cells: &[p(0, 1), p(1, 1), p(2, 1), p(3, 1), p(4, 1)], color: ColorId::new(9) },
    // wedge
    ShapeDef { cells: &[p(0, 1), p(0, 2), p(1, 1), p(1, 2), p(2, 1)], color: ColorId::new(10) },
    // arch
    ShapeDef { cells: &[p(0, 1), p(0, 2), p(1, 1), p(2, 1), p(2, 2)], color: ColorId::new(11) },
    // comb
    ShapeDef { cells: &[p(0, 1), p(1, 1), p(2, 1), p(3, 1), p(1, 2)], color: ColorId::new(12) },
    // wave
    ShapeDef {
        cells: &[p(0, 1), p(1, 1), p(1, 2), p(2, 1), p(2, 2), p(3, 1)],
        color: ColorId::new(13),
    },
    // spur
    ShapeDef { cells: &[p(0, 1), p(1, 1), p(2, 1), p(2, 2), p(3, 1)], color: ColorId::new(14) },
];

/// Index into the shape table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(usize);

impl ShapeId {
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        (index < SHAPES.len()).then_some(Self(index))
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One of the six discrete rotation states of a stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Orientation(u8);

pub const ORIENTATION_COUNT: u8 = 6;

impl Orientation {
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    const fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::CounterClockwise => Self((self.0 + 1) % ORIENTATION_COUNT),
            RotationDirection::Clockwise => {
                Self((self.0 + ORIENTATION_COUNT - 1) % ORIENTATION_COUNT)
            }
        }
    }
}

/// A single validated step of a stone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoneMove {
    MoveLeft,
    MoveRight,
    MoveDown,
    RotateLeft,
    RotateRight,
}

/// The requested step would overlap a wall or settled cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("stone blocked by wall or settled cells")]
pub struct StoneCollision;

/// A falling stone: a shape instance with an anchor position and the cell
/// offsets of its current orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stone {
    shape: ShapeId,
    color: ColorId,
    cells: ArrayVec<HexPos, MAX_STONE_CELLS>,
    anchor: HexPos,
    orientation: Orientation,
}

impl Stone {
    #[must_use]
    pub fn new(shape: ShapeId) -> Self {
        let def = &SHAPES[shape.0];
        Self {
            shape,
            color: def.color,
            cells: def.cells.iter().copied().collect(),
            anchor: HexPos::new(0, 0),
            orientation: Orientation::default(),
        }
    }

    #[must_use]
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    #[must_use]
    pub fn color(&self) -> ColorId {
        self.color
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn position(&self) -> HexPos {
        self.anchor
    }

    pub fn set_position(&mut self, anchor: HexPos) {
        self.anchor = anchor;
    }

    /// Number of cells in the current orientation. Rotation near an edge
    /// may truncate cells, so this can drop below the shape's size.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn absolute_cells(&self) -> impl Iterator<Item = HexPos> + '_ {
        let anchor = self.anchor;
        self.cells.iter().map(move |cell| anchor.offset(cell.x, cell.y))
    }

    /// Stamps (`draw`) or erases the stone's cells on the board.
    /// Out-of-range cells are dropped by the board.
    pub fn place(&self, board: &mut HexBoard, draw: bool) {
        let cell = if draw { Cell::Stone(self.color) } else { Cell::Empty };
        for pos in self.absolute_cells() {
            board.set_cell(pos, cell);
        }
    }

    /// Whether every cell of the current orientation reads empty with the
    /// given anchor. Walls and out-of-range cells both fail the test.
    #[must_use]
    pub fn may_place(&self, board: &HexBoard, anchor: HexPos) -> bool {
        self.cells
            .iter()
            .all(|cell| board.cell(anchor.offset(cell.x, cell.y)).is_empty())
    }

    /// Attempts one step. The stone is erased from the board, the candidate
    /// position is tested against the remaining content, and the stone is
    /// redrawn at the new position on success or the old one on failure.
    pub fn try_move(
        &mut self,
        board: &mut HexBoard,
        direction: StoneMove,
    ) -> Result<(), StoneCollision> {
        self.place(board, false);
        let result = match direction {
            StoneMove::MoveLeft => self.try_shift(board, -1, 0),
            StoneMove::MoveRight => self.try_shift(board, 1, 0),
            StoneMove::MoveDown => self.try_shift(board, 0, 1),
            StoneMove::RotateLeft => self.try_rotate(board, RotationDirection::CounterClockwise),
            StoneMove::RotateRight => self.try_rotate(board, RotationDirection::Clockwise),
        };
        self.place(board, true);
        result
    }

    fn try_shift(&mut self, board: &HexBoard, dx: i32, dy: i32) -> Result<(), StoneCollision> {
        let anchor = self.anchor.offset(dx, dy);
        if self.may_place(board, anchor) {
            self.anchor = anchor;
            Ok(())
        } else {
            Err(StoneCollision)
        }
    }

    fn try_rotate(
        &mut self,
        board: &HexBoard,
        direction: RotationDirection,
    ) -> Result<(), StoneCollision> {
        let absolute: ArrayVec<HexPos, MAX_STONE_CELLS> = self.absolute_cells().collect();
        let rotated = board.rotated_cells(&absolute, self.anchor, direction);
        if !rotated.iter().all(|&pos| board.cell(pos).is_empty()) {
            return Err(StoneCollision);
        }
        self.cells = rotated
            .iter()
            .map(|pos| HexPos::new(pos.x - self.anchor.x, pos.y - self.anchor.y))
            .collect();
        self.orientation = self.orientation.rotated(direction);
        Ok(())
    }
}
