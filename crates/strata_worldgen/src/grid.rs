//! # World Grid
//!
//! Dense `width x height` cell storage. `(0, 0)` is the bottom-left cell;
//! `y` grows upward from the world floor.
//!
//! Public access is bounds-checked. The generator and the cave smoother use
//! the crate-internal accessors after validating coordinates themselves.

use serde::{Deserialize, Serialize};

use crate::error::{WorldGenError, WorldGenResult};

/// Block type identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Creates a block ID.
    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }
}

/// One grid position: a foreground (solid) and a background (wall) slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Solid block, `None` is open space.
    pub foreground: Option<BlockId>,
    /// Backdrop block, purely cosmetic.
    pub background: Option<BlockId>,
}

impl Cell {
    /// Both slots empty.
    pub const EMPTY: Self = Self {
        foreground: None,
        background: None,
    };

    /// A cell with both slots set.
    #[inline]
    #[must_use]
    pub const fn filled(foreground: BlockId, background: BlockId) -> Self {
        Self {
            foreground: Some(foreground),
            background: Some(background),
        }
    }

    /// Returns true if the foreground is occupied.
    #[inline]
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.foreground.is_some()
    }

    /// Returns true if both slots are empty.
    #[inline]
    #[must_use]
    pub const fn is_air(&self) -> bool {
        self.foreground.is_none() && self.background.is_none()
    }
}

/// The generated world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldGrid {
    width: i32,
    height: i32,
    /// Row-major, `y * width + x`.
    cells: Vec<Cell>,
}

impl WorldGrid {
    /// Creates an all-air grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldGenError::InvalidDimensions`] unless both dimensions
    /// are positive.
    pub fn new(width: i32, height: i32) -> WorldGenResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(WorldGenError::InvalidDimensions { width, height });
        }
        // Both positive, so the casts are lossless
        #[allow(clippy::cast_sign_loss)]
        let len = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            cells: vec![Cell::EMPTY; len],
        })
    }

    /// Grid width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Returns true if `(x, y)` is inside the grid.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Gets the cell at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldGenError::OutOfBounds`] outside the grid.
    pub fn get(&self, x: i32, y: i32) -> WorldGenResult<&Cell> {
        self.check(x, y)?;
        Ok(self.at(x, y))
    }

    /// Gets the cell at `(x, y)` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`WorldGenError::OutOfBounds`] outside the grid.
    pub fn get_mut(&mut self, x: i32, y: i32) -> WorldGenResult<&mut Cell> {
        self.check(x, y)?;
        Ok(self.at_mut(x, y))
    }

    /// Replaces the cell at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldGenError::OutOfBounds`] outside the grid.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> WorldGenResult<()> {
        *self.get_mut(x, y)? = cell;
        Ok(())
    }

    /// Counts solid cells among the 8 neighbors of `(x, y)`.
    ///
    /// Neighbors outside the grid count as solid, so a corner cell of an
    /// empty grid reports 5.
    #[must_use]
    pub fn surrounding_wall_count(&self, x: i32, y: i32) -> u8 {
        let mut walls = 0;
        for nx in x.saturating_sub(1)..=x.saturating_add(1) {
            for ny in y.saturating_sub(1)..=y.saturating_add(1) {
                if nx == x && ny == y {
                    continue;
                }
                if !self.contains(nx, ny) || self.at(nx, ny).is_solid() {
                    walls += 1;
                }
            }
        }
        walls
    }

    /// Iterates over one row, left to right.
    ///
    /// # Errors
    ///
    /// Returns [`WorldGenError::OutOfBounds`] if `y` is not a row.
    pub fn row(&self, y: i32) -> WorldGenResult<&[Cell]> {
        self.check(0, y)?;
        let start = self.index(0, y);
        Ok(&self.cells[start..start + self.width_usize()])
    }

    /// All cells, row-major from the bottom row.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn check(&self, x: i32, y: i32) -> WorldGenResult<()> {
        if self.contains(x, y) {
            Ok(())
        } else {
            Err(WorldGenError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    #[allow(clippy::cast_sign_loss)]
    const fn width_usize(&self) -> usize {
        self.width as usize
    }

    #[allow(clippy::cast_sign_loss)]
    fn index(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.contains(x, y), "({x}, {y}) outside grid");
        y as usize * self.width_usize() + x as usize
    }

    /// Unchecked-by-contract read; callers validate coordinates.
    #[inline]
    pub(crate) fn at(&self, x: i32, y: i32) -> &Cell {
        &self.cells[self.index(x, y)]
    }

    /// Unchecked-by-contract write access; callers validate coordinates.
    #[inline]
    pub(crate) fn at_mut(&mut self, x: i32, y: i32) -> &mut Cell {
        let index = self.index(x, y);
        &mut self.cells[index]
    }
}
