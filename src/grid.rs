use crate::direction::Direction;
use rand::Rng;
use thiserror::Error;

/// A cell of the playfield, given by the coordinates of its top-left corner.
/// Both coordinates are multiples of the grid's cell size.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Cell {
    pub(crate) x: u32,
    pub(crate) y: u32,
}

impl Cell {
    pub(crate) const fn new(x: u32, y: u32) -> Cell {
        Cell { x, y }
    }
}

/// The bounded coordinate space that the snake moves in.  Movement off one
/// edge reappears at the opposite edge.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Grid {
    width: u32,
    height: u32,
    cell_size: u32,
}

impl Grid {
    /// Create a grid `width` × `height` units in size, divided into square
    /// cells `cell_size` units on a side.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any argument is zero or if either dimension is not a
    /// multiple of `cell_size`.
    pub(crate) fn new(width: u32, height: u32, cell_size: u32) -> Result<Grid, GridError> {
        if cell_size == 0 {
            return Err(GridError::ZeroCellSize);
        }
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        if width % cell_size != 0 || height % cell_size != 0 {
            return Err(GridError::Misaligned {
                width,
                height,
                cell_size,
            });
        }
        Ok(Grid {
            width,
            height,
            cell_size,
        })
    }

    /// Create a grid with the given number of columns & rows of cells
    pub(crate) fn with_cells(columns: u32, rows: u32, cell_size: u32) -> Result<Grid, GridError> {
        let width = columns.checked_mul(cell_size).ok_or(GridError::TooLarge)?;
        let height = rows.checked_mul(cell_size).ok_or(GridError::TooLarge)?;
        Grid::new(width, height, cell_size)
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub(crate) fn columns(&self) -> u32 {
        self.width / self.cell_size
    }

    pub(crate) fn rows(&self) -> u32 {
        self.height / self.cell_size
    }

    /// Total number of cells in the grid
    pub(crate) fn cell_count(&self) -> usize {
        usize::try_from(u64::from(self.columns()) * u64::from(self.rows())).unwrap_or(usize::MAX)
    }

    /// Return the cell whose top-left corner is at `(x, y)`, or `None` if
    /// that point is out of bounds or not aligned to the cell size.
    pub(crate) fn cell_at(&self, x: u32, y: u32) -> Option<Cell> {
        (x < self.width && y < self.height && x % self.cell_size == 0 && y % self.cell_size == 0)
            .then_some(Cell { x, y })
    }

    /// Return the column & row numbers of `cell`
    pub(crate) fn column_row(&self, cell: Cell) -> (u32, u32) {
        (cell.x / self.cell_size, cell.y / self.cell_size)
    }

    /// Return the cell reached by moving one cell from `cell` in
    /// `direction`, wrapping around the edges of the grid
    pub(crate) fn wrap(&self, cell: Cell, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell {
            x: wrap_coord(cell.x, dx, self.cell_size, self.width),
            y: wrap_coord(cell.y, dy, self.cell_size, self.height),
        }
    }

    /// Iterate over every cell in the grid in row-major order
    pub(crate) fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows()).flat_map(move |row| {
            (0..self.columns()).map(move |col| Cell {
                x: col * self.cell_size,
                y: row * self.cell_size,
            })
        })
    }

    /// Pick a cell uniformly at random
    pub(crate) fn random_cell<R: Rng>(&self, rng: &mut R) -> Cell {
        let col = rng.random_range(0..self.columns());
        let row = rng.random_range(0..self.rows());
        Cell {
            x: col * self.cell_size,
            y: row * self.cell_size,
        }
    }
}

fn wrap_coord(value: u32, delta: i8, cell_size: u32, max: u32) -> u32 {
    let moved = i64::from(value) + i64::from(delta) * i64::from(cell_size);
    let wrapped = moved.rem_euclid(i64::from(max));
    // `rem_euclid()` with a positive `u32` modulus always fits in a `u32`
    u32::try_from(wrapped).unwrap_or_default()
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum GridError {
    #[error("cell size must be positive")]
    ZeroCellSize,
    #[error("grid must contain at least one cell")]
    Empty,
    #[error("grid dimensions {width}x{height} are not multiples of the cell size {cell_size}")]
    Misaligned {
        width: u32,
        height: u32,
        cell_size: u32,
    },
    #[error("grid dimensions overflow")]
    TooLarge,
}
