//! The area matrix: a grid-based record of which parts of a bounding rectangle are
//! still free.
//!
//! The matrix starts out as a single free cell covering its whole extent. Placing a
//! rectangle splits the grid's rows and columns so that the rectangle's edges land
//! exactly on grid lines, then marks every cell underneath it as occupied. Rows and
//! columns are never merged again, so the grid only ever becomes finer.
//!
//! Cells are stored once, in an arena owned by the matrix. The row-major view
//! (`rows[row][column]`) and the column-major view (`columns[column][row]`) both hold
//! [CellId]s into that arena, and every split updates both views together.
//!
//! # Example
//!
//! ```
//! use page_arrange::{AreaMatrix, PlacementMode, Pt, Rect};
//!
//! let mut matrix = AreaMatrix::new(Pt(200.0), Pt(200.0));
//! let rect = Rect::new(50.0, 75.0).with_id("logo");
//!
//! let fit = matrix.find_fit(&rect).expect("an empty matrix has room");
//! matrix
//!     .place_rect(fit.column, fit.row, &rect, PlacementMode::Strict)
//!     .expect("the fit is free");
//!
//! assert_eq!(matrix.column_count(), 2);
//! assert_eq!(matrix.row_count(), 2);
//! assert_eq!(matrix.get_allocated_size().width, Pt(50.0));
//! ```

mod cell;
mod free;

pub use cell::*;
pub use free::*;

use crate::colour::colours;
use crate::error::ArrangeError;
use crate::rect::{bounding_size, Rect, Size};
use crate::units::Pt;
use id_arena::Arena;
use std::fmt;

/// What to do when a placement runs past the last row or column of the matrix
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum PlacementMode {
    /// Stop at the edge of the grid and mark what fits. Used when arranging flat
    /// rectangle lists, where the fit has already been checked.
    #[default]
    Clip,
    /// Fail with [ArrangeError::PlacementOverflow] so the caller can retry with a
    /// larger matrix. Used when composing nested layouts.
    Strict,
}

/// Where a rectangle ended up in the grid
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Index of the placed copy in [AreaMatrix::get_rects]
    pub index: usize,
    pub first_column: usize,
    pub first_row: usize,
    pub last_column: usize,
    pub last_row: usize,
}

#[derive(Debug, Clone)]
pub struct AreaMatrix {
    width: Pt,
    height: Pt,
    cells: Arena<FreeCell>,
    row_heights: Vec<Pt>,
    column_widths: Vec<Pt>,
    rows: Vec<Vec<CellId>>,
    columns: Vec<Vec<CellId>>,
    placements: Vec<Rect>,
    next_label: usize,
}

impl AreaMatrix {
    /// Create a matrix covering `width` x `height` with one free cell
    pub fn new(width: Pt, height: Pt) -> AreaMatrix {
        let mut matrix = AreaMatrix {
            width,
            height,
            cells: Arena::new(),
            row_heights: vec![height],
            column_widths: vec![width],
            rows: Vec::new(),
            columns: Vec::new(),
            placements: Vec::new(),
            next_label: 0,
        };
        let cell = matrix.alloc_cell(None);
        matrix.rows.push(vec![cell]);
        matrix.columns.push(vec![cell]);
        matrix
    }

    fn alloc_cell(&mut self, occupant: Option<Occupant>) -> CellId {
        let label = self.next_label;
        self.next_label += 1;
        self.cells.alloc(FreeCell::new(label, occupant))
    }

    /// The nominal width the matrix was created with
    pub fn width(&self) -> Pt {
        self.width
    }

    /// The nominal height the matrix was created with
    pub fn height(&self) -> Pt {
        self.height
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_heights(&self) -> &[Pt] {
        &self.row_heights
    }

    pub fn column_widths(&self) -> &[Pt] {
        &self.column_widths
    }

    /// The row-major view of the grid, indexed `[row][column]`
    pub fn rows(&self) -> &[Vec<CellId>] {
        &self.rows
    }

    /// The column-major view of the grid, indexed `[column][row]`
    pub fn columns(&self) -> &[Vec<CellId>] {
        &self.columns
    }

    pub fn cell(&self, id: CellId) -> &FreeCell {
        &self.cells[id]
    }

    pub fn cell_at(&self, column: usize, row: usize) -> Result<&FreeCell, ArrangeError> {
        self.check_bounds(column, row)?;
        Ok(&self.cells[self.columns[column][row]])
    }

    fn check_bounds(&self, column: usize, row: usize) -> Result<(), ArrangeError> {
        if column >= self.columns.len() {
            return Err(ArrangeError::ColumnOutOfBounds {
                index: column,
                columns: self.columns.len(),
            });
        }
        if row >= self.rows.len() {
            return Err(ArrangeError::RowOutOfBounds {
                index: row,
                rows: self.rows.len(),
            });
        }
        Ok(())
    }

    /// The x-coordinate of the left edge of every column
    pub fn column_offsets(&self) -> Vec<Pt> {
        offsets(&self.column_widths)
    }

    /// The y-coordinate of the top edge of every row
    pub fn row_offsets(&self) -> Vec<Pt> {
        offsets(&self.row_heights)
    }

    /// The real coordinates of the top-left corner of a grid cell
    pub fn cell_origin(&self, column: usize, row: usize) -> Result<(Pt, Pt), ArrangeError> {
        self.check_bounds(column, row)?;
        let x = self.column_widths[..column].iter().copied().sum();
        let y = self.row_heights[..row].iter().copied().sum();
        Ok((x, y))
    }

    /// Split row `row` so that it keeps `new_height` and a new row holding the rest is
    /// inserted directly below it. Every cell of the new row copies the occupancy of
    /// the cell above it.
    pub fn split_row(&mut self, row: usize, new_height: Pt) -> Result<(), ArrangeError> {
        let old_height = *self
            .row_heights
            .get(row)
            .ok_or(ArrangeError::RowOutOfBounds {
                index: row,
                rows: self.rows.len(),
            })?;
        if !new_height.exceeds(Pt::ZERO) || !old_height.exceeds(new_height) {
            return Err(ArrangeError::InvalidSplit {
                index: row,
                at: new_height,
                extent: old_height,
            });
        }

        let mut new_row = Vec::with_capacity(self.columns.len());
        for column in 0..self.columns.len() {
            let occupant = self.cells[self.rows[row][column]].occupant;
            new_row.push(self.alloc_cell(occupant));
        }
        for (column, &cell) in new_row.iter().enumerate() {
            self.columns[column].insert(row + 1, cell);
        }

        self.row_heights[row] = new_height;
        self.row_heights.insert(row + 1, old_height - new_height);
        self.rows.insert(row + 1, new_row);

        tracing::trace!("split row {row} at {new_height} (was {old_height})");
        Ok(())
    }

    /// Split column `column` so that it keeps `new_width` and a new column holding the
    /// rest is inserted directly to its right. Every cell of the new column copies the
    /// occupancy of the cell to its left.
    pub fn split_column(&mut self, column: usize, new_width: Pt) -> Result<(), ArrangeError> {
        let old_width = *self
            .column_widths
            .get(column)
            .ok_or(ArrangeError::ColumnOutOfBounds {
                index: column,
                columns: self.columns.len(),
            })?;
        if !new_width.exceeds(Pt::ZERO) || !old_width.exceeds(new_width) {
            return Err(ArrangeError::InvalidSplit {
                index: column,
                at: new_width,
                extent: old_width,
            });
        }

        let mut new_column = Vec::with_capacity(self.rows.len());
        for row in 0..self.rows.len() {
            let occupant = self.cells[self.columns[column][row]].occupant;
            new_column.push(self.alloc_cell(occupant));
        }
        for (row, &cell) in new_column.iter().enumerate() {
            self.rows[row].insert(column + 1, cell);
        }

        self.column_widths[column] = new_width;
        self.column_widths.insert(column + 1, old_width - new_width);
        self.columns.insert(column + 1, new_column);

        tracing::trace!("split column {column} at {new_width} (was {old_width})");
        Ok(())
    }

    /// Place a copy of `rect` with its top-left corner on the top-left corner of the
    /// grid cell (`column`, `row`). The grid is split so that the rectangle's right and
    /// bottom edges fall on grid lines, then every covered cell is marked with the
    /// rectangle's colour. The copy's `x` and `y` are set to the real coordinates of
    /// the placement; `rect` itself is left untouched.
    pub fn place_rect(
        &mut self,
        column: usize,
        row: usize,
        rect: &Rect,
        mode: PlacementMode,
    ) -> Result<Placement, ArrangeError> {
        rect.validate()?;
        self.check_bounds(column, row)?;

        let (last_column, column_split) =
            measure_span(&self.column_widths, column, rect.width, mode)?;
        let (last_row, row_split) = measure_span(&self.row_heights, row, rect.height, mode)?;

        // splits only add lines after the last column/row, so the covered set of
        // cells can be checked before the grid changes
        for c in column..=last_column {
            for r in row..=last_row {
                if !self.cells[self.columns[c][r]].is_free() {
                    return Err(ArrangeError::CellOccupied { column: c, row: r });
                }
            }
        }

        if let Some(width) = column_split {
            self.split_column(last_column, width)?;
        }
        if let Some(height) = row_split {
            self.split_row(last_row, height)?;
        }

        let index = self.placements.len();
        let occupant = Occupant {
            placement: index,
            colour: rect.colour,
        };
        for c in column..=last_column {
            for r in row..=last_row {
                let cell = self.columns[c][r];
                self.cells[cell].occupant = Some(occupant);
            }
        }

        let (x, y) = self.cell_origin(column, row)?;
        let mut placed = rect.clone();
        placed.x = x;
        placed.y = y;
        tracing::trace!(
            "placed {:?} ({}x{}) at ({x}, {y}) over columns {column}..={last_column}, rows {row}..={last_row}",
            placed.id,
            placed.width,
            placed.height,
        );
        self.placements.push(placed);

        Ok(Placement {
            index,
            first_column: column,
            first_row: row,
            last_column,
            last_row,
        })
    }

    /// Place a copy of `rect` with its top-left corner at the real coordinates (`x`,
    /// `y`), splitting the containing column and row first when the point is not
    /// already on a grid line. A point within [Pt::EPSILON] of a grid line snaps onto
    /// it, so coordinates summed in a different order than the grid's own offsets
    /// still land on the line they name.
    pub fn place_rect_at(
        &mut self,
        x: Pt,
        y: Pt,
        rect: &Rect,
        mode: PlacementMode,
    ) -> Result<Placement, ArrangeError> {
        let (mut column, left) =
            locate(&self.column_widths, x).ok_or(ArrangeError::PointOutOfBounds { x, y })?;
        let (mut row, top) =
            locate(&self.row_heights, y).ok_or(ArrangeError::PointOutOfBounds { x, y })?;

        if (x - left).exceeds(Pt::ZERO) {
            self.split_column(column, x - left)?;
            column += 1;
        }
        if (y - top).exceeds(Pt::ZERO) {
            self.split_row(row, y - top)?;
            row += 1;
        }

        self.place_rect(column, row, rect, mode)
    }

    /// Replay every rectangle placed in this matrix into `dst`, offset by the origin of
    /// the destination cell (`dst_column`, `dst_row`). The destination receives
    /// independent copies; nothing of this matrix's grid structure is carried over.
    /// Replayed origins snap onto existing grid lines as in [AreaMatrix::place_rect_at].
    pub fn overlay_matrix(
        &self,
        dst_column: usize,
        dst_row: usize,
        dst: &mut AreaMatrix,
    ) -> Result<(), ArrangeError> {
        let (origin_x, origin_y) = dst.cell_origin(dst_column, dst_row)?;
        for rect in self.placements.iter() {
            let x = origin_x + rect.x;
            let y = origin_y + rect.y;
            match dst.place_rect_at(x, y, rect, PlacementMode::Strict) {
                // the sub-layout hangs off the edge of the destination
                Err(ArrangeError::PointOutOfBounds { .. }) => {
                    return Err(ArrangeError::PlacementOverflow)
                }
                result => {
                    result?;
                }
            }
        }
        tracing::trace!(
            "overlaid {} rects at column {dst_column}, row {dst_row} ({origin_x}, {origin_y})",
            self.placements.len()
        );
        Ok(())
    }

    /// Re-derive the coordinates of every placed rectangle from the grid. The grid is
    /// scanned column by column, top to bottom; the first cell found for a rectangle is
    /// its top-left cell. Calling this repeatedly without placing anything in between
    /// always yields the same coordinates.
    pub fn update_rects_xy(&mut self) {
        let xs = self.column_offsets();
        let ys = self.row_offsets();

        let mut origins: Vec<Option<(Pt, Pt)>> = vec![None; self.placements.len()];
        for (column, cells) in self.columns.iter().enumerate() {
            for (row, &cell) in cells.iter().enumerate() {
                if let Some(occupant) = self.cells[cell].occupant {
                    let origin = &mut origins[occupant.placement];
                    if origin.is_none() {
                        *origin = Some((xs[column], ys[row]));
                    }
                }
            }
        }

        for (rect, origin) in self.placements.iter_mut().zip(origins) {
            if let Some((x, y)) = origin {
                rect.x = x;
                rect.y = y;
            }
        }
    }

    /// Every rectangle placed so far, in placement order, positioned relative to this
    /// matrix's origin
    pub fn get_rects(&self) -> &[Rect] {
        &self.placements
    }

    /// The bounding box of everything placed so far. This is usually smaller than the
    /// nominal `width` x `height`, which is only the trial bound the matrix was built
    /// with.
    pub fn get_allocated_size(&self) -> Size {
        bounding_size(&self.placements)
    }

    /// A diagnostic picture of the grid: one rectangle per cell, filled with the colour
    /// of its occupant (grey when the occupant has no colour) and unfilled when free.
    pub fn snapshot(&self) -> Vec<Rect> {
        let xs = self.column_offsets();
        let ys = self.row_offsets();
        let mut rects = Vec::with_capacity(self.rows.len() * self.columns.len());
        for (row, cells) in self.rows.iter().enumerate() {
            for (column, &id) in cells.iter().enumerate() {
                let cell = &self.cells[id];
                rects.push(Rect {
                    id: Some(format!("cell.{}", cell.label)),
                    x: xs[column],
                    y: ys[row],
                    width: self.column_widths[column],
                    height: self.row_heights[row],
                    colour: cell
                        .occupant
                        .map(|o| o.colour.unwrap_or(colours::GREY)),
                    sort_group: None,
                });
            }
        }
        rects
    }
}

impl fmt::Display for AreaMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AreaMatrix(width={}, height={}, rows={}, cols={})",
            self.width,
            self.height,
            self.rows.len(),
            self.columns.len()
        )
    }
}

fn offsets(extents: &[Pt]) -> Vec<Pt> {
    let mut at = Pt::ZERO;
    extents
        .iter()
        .map(|&extent| {
            let start = at;
            at += extent;
            start
        })
        .collect()
}

/// Find the grid line containing `at`, returning its index and starting offset
fn locate(extents: &[Pt], at: Pt) -> Option<(usize, Pt)> {
    if Pt::ZERO.exceeds(at) {
        return None;
    }
    let mut start = Pt::ZERO;
    for (index, &extent) in extents.iter().enumerate() {
        let end = start + extent;
        if end.exceeds(at) {
            return Some((index, start));
        }
        start = end;
    }
    None
}

/// Walk grid lines from `first` until `length` is covered. Returns the last line
/// touched and, if the far edge falls inside that line, where to split it.
fn measure_span(
    extents: &[Pt],
    first: usize,
    length: Pt,
    mode: PlacementMode,
) -> Result<(usize, Option<Pt>), ArrangeError> {
    let mut remaining = length;
    let mut last = first;
    loop {
        let extent = extents[last];
        if remaining.exceeds(extent) {
            if last + 1 == extents.len() {
                return match mode {
                    PlacementMode::Clip => Ok((last, None)),
                    PlacementMode::Strict => Err(ArrangeError::PlacementOverflow),
                };
            }
            remaining -= extent;
            last += 1;
        } else if extent.exceeds(remaining) {
            return Ok((last, Some(remaining)));
        } else {
            return Ok((last, None));
        }
    }
}
