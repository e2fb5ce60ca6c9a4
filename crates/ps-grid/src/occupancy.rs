//! Immutable occupancy grid.
//!
//! # Indexing
//!
//! Cells are addressed `(row, col)` and stored row-major.  A cell's world
//! position is `(col * cell_size, row * cell_size)`: columns run along `x`,
//! rows along `y`.  World points are quantized back to cells with
//! `floor(coord / cell_size)` on each axis.

use ps_core::Point2;

use crate::{GridError, GridResult};

/// Row/column address of a grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular boolean walkability map plus the size of one cell in world
/// units.  Built once at startup; there are no mutating methods.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    rows:      usize,
    cols:      usize,
    walkable:  Vec<bool>,
    cell_size: f32,
}

impl OccupancyGrid {
    /// Build from nested rows (`walkable[row][col]`).
    ///
    /// # Errors
    ///
    /// [`GridError::Malformed`] if the rows differ in length,
    /// [`GridError::InvalidCellSize`] if `cell_size` is not a positive number.
    pub fn from_rows(rows: Vec<Vec<bool>>, cell_size: f32) -> GridResult<Self> {
        check_cell_size(cell_size)?;
        let cols = rows.first().map_or(0, Vec::len);
        let mut walkable = Vec::with_capacity(rows.len() * cols);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(GridError::Malformed { row: r, expected: cols, found: row.len() });
            }
            walkable.extend_from_slice(row);
        }
        Ok(Self { rows: rows.len(), cols, walkable, cell_size })
    }

    /// Build a `rows × cols` grid whose walkability is given by `f(cell)`.
    pub fn from_fn(
        rows:      usize,
        cols:      usize,
        cell_size: f32,
        mut f:     impl FnMut(Cell) -> bool,
    ) -> GridResult<Self> {
        check_cell_size(cell_size)?;
        let walkable = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Cell::new(row, col)))
            .map(&mut f)
            .collect();
        Ok(Self { rows, cols, walkable, cell_size })
    }

    /// Parse an ASCII map: `.` is walkable, `#` is blocked, one line per row.
    /// Blank lines are ignored.
    pub fn parse_ascii(text: &str, cell_size: f32) -> GridResult<Self> {
        let rows = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .enumerate()
                    .map(|(col, ch)| match ch {
                        '.' => Ok(true),
                        '#' => Ok(false),
                        _   => Err(GridError::BadMapChar { ch, row, col }),
                    })
                    .collect::<GridResult<Vec<bool>>>()
            })
            .collect::<GridResult<Vec<_>>>()?;
        Self::from_rows(rows, cell_size)
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of walkable cells.
    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|&&w| w).count()
    }

    // ── Cell queries ──────────────────────────────────────────────────────

    /// `true` if `cell` is inside the grid and walkable.
    #[inline]
    pub fn is_walkable(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols && self.walkable[self.flat(cell)]
    }

    /// Quantize a world position to the cell that contains it.
    ///
    /// Returns `None` for positions outside the grid (including negative
    /// coordinates and NaN).
    pub fn cell_at(&self, pos: Point2) -> Option<Cell> {
        let col = (pos.x / self.cell_size).floor();
        let row = (pos.y / self.cell_size).floor();
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let cell = Cell::new(row as usize, col as usize);
        (cell.row < self.rows && cell.col < self.cols).then_some(cell)
    }

    /// World position of a cell's node.
    #[inline]
    pub fn cell_position(&self, cell: Cell) -> Point2 {
        Point2::new(cell.col as f32 * self.cell_size, cell.row as f32 * self.cell_size)
    }

    /// Row-major flat index of an in-bounds cell.
    #[inline]
    pub(crate) fn flat(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }
}

fn check_cell_size(cell_size: f32) -> GridResult<()> {
    if cell_size.is_finite() && cell_size > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidCellSize(cell_size))
    }
}
