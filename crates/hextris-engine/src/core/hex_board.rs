use arrayvec::ArrayVec;

use crate::core::MAX_STONE_CELLS;

/// Position on a hex board in packed rectangular coordinates.
///
/// Columns are packed side by side; cells in odd columns sit half a cell
/// lower than their even-column neighbors. Coordinates are signed so that
/// stones can be anchored above the visible top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexPos {
    pub x: i32,
    pub y: i32,
}

impl HexPos {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Color identifier of a settled cell. Values `0` and `1` are reserved for
/// empty and wall cells, so a color id is always `>= 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorId(u8);

impl ColorId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!(id >= 2, "color ids 0 and 1 are reserved");
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// State of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Stone(ColorId),
}

impl Cell {
    /// Stable integer projection: `0` empty, `1` wall, `>= 2` stone color.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Wall => 1,
            Self::Stone(color) => color.get(),
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Direction of a 60° rotation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Scan direction for [`HexBoard::surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFrom {
    Top,
    Bottom,
}

/// Rectangular grid of hex cells with a wall frame around the play field.
///
/// Reads outside the grid return [`Cell::Wall`] and writes outside the grid
/// are dropped, so collision tests never need a separate bounds check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexBoard {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl HexBoard {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width >= 3 && height >= 2, "board cannot hold a play field");
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Builds a board from ASCII art covering rows `0..height-1` of the
    /// interior columns. `#` is a settled stone, `.` is empty; the wall
    /// frame is added around the art.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().map(str::trim).filter(|s| !s.is_empty()).collect();
        let interior_width = lines.first().map_or(0, |line| line.len());
        assert!(
            lines.iter().all(|line| line.len() == interior_width),
            "ragged board art"
        );
        let mut board = Self::new(interior_width + 2, lines.len() + 1);
        board.reset_play_field();
        for (y, line) in lines.iter().enumerate() {
            for (i, ch) in line.chars().enumerate() {
                let pos = HexPos::new(i32::try_from(i + 1).unwrap(), i32::try_from(y).unwrap());
                match ch {
                    '#' => board.set_cell(pos, Cell::Stone(ColorId::new(2))),
                    '.' => {}
                    _ => panic!("unexpected char in board art: {ch:?}"),
                }
            }
        }
        board
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn pos_index(&self, pos: HexPos) -> Option<usize> {
        let x = usize::try_from(pos.x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(pos.y).ok().filter(|&y| y < self.height)?;
        Some(self.index(x, y))
    }

    #[must_use]
    pub fn contains(&self, pos: HexPos) -> bool {
        self.pos_index(pos).is_some()
    }

    /// Reads a cell; positions outside the grid read as wall.
    #[must_use]
    pub fn cell(&self, pos: HexPos) -> Cell {
        self.pos_index(pos).map_or(Cell::Wall, |index| self.cells[index])
    }

    /// Writes a cell; positions outside the grid are silently dropped.
    pub fn set_cell(&mut self, pos: HexPos, cell: Cell) {
        if let Some(index) = self.pos_index(pos) {
            self.cells[index] = cell;
        }
    }

    /// Frames the play field: leftmost column, rightmost column and bottom
    /// row become wall, everything in between becomes empty.
    pub fn reset_play_field(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let index = self.index(x, y);
                self.cells[index] = if x == 0 || x == self.width - 1 || y == self.height - 1 {
                    Cell::Wall
                } else {
                    Cell::Empty
                };
            }
        }
    }

    /// Whether every interior cell of row `y` is occupied.
    #[must_use]
    pub fn line_full(&self, y: usize) -> bool {
        (1..self.width - 1).all(|x| !self.cells[self.index(x, y)].is_empty())
    }

    /// Empties the interior cells of row `y`.
    pub fn clear_line(&mut self, y: usize) {
        for x in 1..self.width - 1 {
            let index = self.index(x, y);
            self.cells[index] = Cell::Empty;
        }
    }

    fn copy_line(&mut self, src_y: usize, dest_y: usize) {
        for x in 1..self.width - 1 {
            let cell = self.cells[self.index(x, src_y)];
            let index = self.index(x, dest_y);
            self.cells[index] = cell;
        }
    }

    /// Shifts every interior row above `y` down by one and empties the top
    /// interior row.
    pub fn remove_line(&mut self, y: usize) {
        for dest_y in (1..=y).rev() {
            self.copy_line(dest_y - 1, dest_y);
        }
        self.clear_line(0);
    }

    /// Clears every full interior row, shifting the rows above down. Rows
    /// are scanned bottom-up and a row is re-tested after a shift lands new
    /// content in it. Returns the number of rows cleared.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.height - 2;
        while y > 0 {
            if self.line_full(y) {
                self.clear_line(y);
                self.remove_line(y);
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Per-column index of the first occupied row, scanning from the given
    /// edge. `-1` for a column with no occupied cell.
    #[must_use]
    pub fn surface(&self, scan_from: ScanFrom) -> Vec<i32> {
        (0..self.width)
            .map(|x| {
                let hit = match scan_from {
                    ScanFrom::Top => (0..self.height).find(|&y| !self.cells[self.index(x, y)].is_empty()),
                    ScanFrom::Bottom => {
                        (0..self.height).rev().find(|&y| !self.cells[self.index(x, y)].is_empty())
                    }
                };
                hit.map_or(-1, |y| i32::try_from(y).unwrap())
            })
            .collect()
    }

    /// Rotates a set of cells 60° around `center`, dropping results that
    /// fall outside the grid.
    ///
    /// The rotation runs in axial hex coordinates: each cell's packed
    /// position is decomposed into steps along the three hex axes relative
    /// to the center (the odd-column half-step offset folds into the axial
    /// row), the path is cyclically shifted with sign flips, and the result
    /// is walked back into packed coordinates. Six same-direction steps are
    /// the identity and opposite steps are exact inverses.
    #[must_use]
    pub fn rotated_cells(
        &self,
        cells: &[HexPos],
        center: HexPos,
        direction: RotationDirection,
    ) -> ArrayVec<HexPos, MAX_STONE_CELLS> {
        let (center_q, center_r) = to_axial(center);
        let mut rotated = ArrayVec::new();
        for &cell in cells {
            let (q, r) = to_axial(cell);
            let (dq, dr) = (q - center_q, r - center_r);
            let (dq, dr) = match direction {
                RotationDirection::Clockwise => (-dr, dq + dr),
                RotationDirection::CounterClockwise => (dq + dr, -dq),
            };
            let pos = from_axial(center_q + dq, center_r + dr);
            if self.contains(pos) {
                rotated.push(pos);
            }
        }
        rotated
    }
}

/// Packed coordinates to axial: the column keeps its index, the row sheds
/// the accumulated half-step offset of the columns before it.
fn to_axial(pos: HexPos) -> (i32, i32) {
    (pos.x, pos.y - (pos.x - (pos.x & 1)) / 2)
}

fn from_axial(q: i32, r: i32) -> HexPos {
    HexPos::new(q, r + (q - (q & 1)) / 2)
}
