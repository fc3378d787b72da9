use super::Arrange;
use crate::error::ArrangeError;
use crate::matrix::{AreaMatrix, PlacementMode};
use crate::rect::Rect;
use crate::units::Pt;

/// Splits a run of items into a fixed number of columns of roughly even height,
/// keeping the items in order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EvenRectColumnFlow {
    pub column_count: usize,
}

impl EvenRectColumnFlow {
    pub fn new(column_count: usize) -> EvenRectColumnFlow {
        EvenRectColumnFlow { column_count }
    }

    /// Distribute items of the given `heights` over the columns, returning the indices
    /// that land in each column. A column is closed once it is taller than an even
    /// share of everything after the current item; the last column takes whatever is
    /// left. Columns that would stay empty are not returned.
    pub fn flow(&self, heights: &[Pt]) -> Result<Vec<Vec<usize>>, ArrangeError> {
        if self.column_count == 0 {
            return Err(ArrangeError::InvalidColumnCount);
        }

        let mut remaining: Pt = heights.iter().copied().sum();
        let mut columns: Vec<Vec<usize>> = vec![Vec::new()];
        let mut column_height = Pt::ZERO;

        for (i, &height) in heights.iter().enumerate() {
            remaining -= height;
            let columns_after = self.column_count - columns.len();
            let current_is_empty = columns.last().map_or(true, Vec::is_empty);
            if !current_is_empty
                && columns_after > 0
                && column_height.exceeds(remaining / columns_after as f64)
            {
                columns.push(Vec::new());
                column_height = Pt::ZERO;
            }
            if let Some(column) = columns.last_mut() {
                column.push(i);
            }
            column_height += height;
        }

        columns.retain(|column| !column.is_empty());
        Ok(columns)
    }
}

/// Lays rectangles out top-to-bottom in a fixed number of even-height columns, like a
/// glossary or word list. The finished block overlays into a parent like any other
/// [Arrange]able.
#[derive(Debug, Clone)]
pub struct ColumnArrangeable {
    identifier: String,
    pub column_count: usize,
    /// Horizontal space between adjacent columns
    pub column_gap: Pt,
    /// Vertical space between rectangles within a column
    pub row_gap: Pt,
    rects: Vec<Rect>,
    matrix: AreaMatrix,
}

impl ColumnArrangeable {
    pub fn new<S: ToString>(identifier: S, column_count: usize) -> ColumnArrangeable {
        ColumnArrangeable {
            identifier: identifier.to_string(),
            column_count,
            column_gap: Pt::ZERO,
            row_gap: Pt::ZERO,
            rects: Vec::new(),
            matrix: AreaMatrix::new(Pt::ZERO, Pt::ZERO),
        }
    }

    pub fn with_gaps(mut self, column_gap: Pt, row_gap: Pt) -> Self {
        self.column_gap = column_gap;
        self.row_gap = row_gap;
        self
    }

    pub fn add_rect(&mut self, rect: Rect) -> &mut Self {
        self.rects.push(rect);
        self
    }

    /// The member rectangles, positioned within the block after [Arrange::arrange]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }
}

impl Arrange for ColumnArrangeable {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn arrange(&mut self) -> Result<(), ArrangeError> {
        for rect in self.rects.iter() {
            rect.validate()?;
        }

        let heights: Vec<Pt> = self.rects.iter().map(|r| r.height).collect();
        let columns = EvenRectColumnFlow::new(self.column_count).flow(&heights)?;

        let mut x = Pt::ZERO;
        let mut block_width = Pt::ZERO;
        let mut block_height = Pt::ZERO;
        for (c, column) in columns.iter().enumerate() {
            if c > 0 {
                x += self.column_gap;
            }
            let mut y = Pt::ZERO;
            let mut column_width = Pt::ZERO;
            for (r, &i) in column.iter().enumerate() {
                if r > 0 {
                    y += self.row_gap;
                }
                self.rects[i].x = x;
                self.rects[i].y = y;
                y += self.rects[i].height;
                column_width = column_width.max(self.rects[i].width);
            }
            x += column_width;
            block_width = x;
            block_height = block_height.max(y);
        }

        tracing::debug!(
            "{}: {} rects in {} columns, block is {block_width}x{block_height}",
            self.identifier,
            self.rects.len(),
            columns.len()
        );

        let mut matrix = AreaMatrix::new(block_width, block_height);
        for rect in self.rects.iter() {
            matrix.place_rect_at(rect.x, rect.y, rect, PlacementMode::Strict)?;
        }
        matrix.update_rects_xy();
        self.matrix = matrix;
        Ok(())
    }

    fn matrix(&self) -> &AreaMatrix {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(heights: &[f64]) -> Vec<Pt> {
        heights.iter().map(|&h| Pt(h)).collect()
    }

    #[test]
    fn even_heights_split_evenly() {
        let flow = EvenRectColumnFlow::new(2);
        let columns = flow.flow(&pts(&[1.0, 1.0, 1.0, 1.0])).expect("valid");
        assert_eq!(columns, vec![vec![0, 1], vec![2, 3]]);

        let columns = EvenRectColumnFlow::new(3)
            .flow(&pts(&[2.0; 6]))
            .expect("valid");
        assert_eq!(columns, vec![vec![0, 1], vec![2, 3], vec![4, 5]]);
    }

    #[test]
    fn tall_first_item_gets_its_own_column() {
        let columns = EvenRectColumnFlow::new(2)
            .flow(&pts(&[3.0, 1.0, 1.0, 1.0]))
            .expect("valid");
        assert_eq!(columns, vec![vec![0], vec![1, 2, 3]]);
    }

    #[test]
    fn last_column_takes_the_rest() {
        let columns = EvenRectColumnFlow::new(1)
            .flow(&pts(&[5.0, 1.0, 9.0]))
            .expect("valid");
        assert_eq!(columns, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn fewer_items_than_columns() {
        let columns = EvenRectColumnFlow::new(4).flow(&pts(&[1.0])).expect("valid");
        assert_eq!(columns, vec![vec![0]]);
        let columns = EvenRectColumnFlow::new(4).flow(&[]).expect("valid");
        assert!(columns.is_empty());
    }

    #[test]
    fn zero_columns_is_an_error() {
        assert!(matches!(
            EvenRectColumnFlow::new(0).flow(&pts(&[1.0])),
            Err(ArrangeError::InvalidColumnCount)
        ));
    }

    #[test]
    fn columns_are_as_wide_as_their_widest_member() {
        let mut block = ColumnArrangeable::new("words", 2).with_gaps(Pt(5.0), Pt(2.0));
        block
            .add_rect(Rect::new(30.0, 10.0).with_id("a"))
            .add_rect(Rect::new(50.0, 10.0).with_id("b"))
            .add_rect(Rect::new(20.0, 10.0).with_id("c"))
            .add_rect(Rect::new(25.0, 10.0).with_id("d"));
        block.arrange().expect("can arrange");

        let at = |i: usize| (block.rects()[i].x, block.rects()[i].y);
        assert_eq!(at(0), (Pt(0.0), Pt(0.0)));
        assert_eq!(at(1), (Pt(0.0), Pt(12.0)));
        assert_eq!(at(2), (Pt(55.0), Pt(0.0)));
        assert_eq!(at(3), (Pt(55.0), Pt(12.0)));

        let size = block.get_allocated_size();
        assert_eq!(size.width, Pt(80.0));
        assert_eq!(size.height, Pt(22.0));
        assert_eq!(block.get_rects().len(), 4);
    }

    #[test]
    fn overlays_into_a_parent_matrix() {
        let mut block = ColumnArrangeable::new("words", 2);
        block
            .add_rect(Rect::new(10.0, 10.0))
            .add_rect(Rect::new(10.0, 10.0));
        block.arrange().expect("can arrange");

        let mut parent = AreaMatrix::new(Pt(100.0), Pt(100.0));
        parent
            .place_rect(0, 0, &Rect::new(40.0, 40.0), PlacementMode::Strict)
            .expect("fits");
        // column 1 starts at x = 40
        block
            .overlay_onto_matrix(1, 0, &mut parent)
            .expect("fits");
        let placed = parent.get_rects();
        assert_eq!(placed.len(), 3);
        assert_eq!((placed[1].x, placed[1].y), (Pt(40.0), Pt(0.0)));
        assert_eq!((placed[2].x, placed[2].y), (Pt(50.0), Pt(0.0)));
    }

    #[test]
    fn empty_block_has_no_footprint() {
        let mut block = ColumnArrangeable::new("empty", 3);
        block.arrange().expect("nothing to do");
        assert!(block.get_allocated_size().is_empty());
    }
}
