use super::AreaMatrix;
use crate::rect::Rect;
use crate::units::Pt;

/// A rectangle of free cells, anchored at a grid cell. Carries both the grid address
/// of its top-left cell (for placement) and its real coordinates (for callers).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FreeRect {
    pub column: usize,
    pub row: usize,
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub height: Pt,
}

impl FreeRect {
    /// Whether `rect` fits inside this free rectangle
    pub fn fits(&self, rect: &Rect) -> bool {
        self.width.covers(rect.width) && self.height.covers(rect.height)
    }

    pub fn to_rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            ..Rect::sized(self.width, self.height)
        }
    }
}

/// Pick where `test` should go among `candidates`: of the free rectangles large enough
/// to hold it, the topmost, and of those the leftmost. This fills the page row by row
/// from the top-left. Ties on both are resolved in favour of the earliest candidate.
pub fn select_fit<'a>(test: &Rect, candidates: &'a [FreeRect]) -> Option<&'a FreeRect> {
    candidates
        .iter()
        .filter(|candidate| candidate.fits(test))
        .min_by_key(|candidate| (candidate.row, candidate.column))
}

impl AreaMatrix {
    /// Height of the run of free cells in `column`, starting at `row` and going down
    fn column_free_height(&self, column: usize, row: usize) -> Pt {
        self.columns[column][row..]
            .iter()
            .zip(&self.row_heights[row..])
            .take_while(|(cell, _)| self.cells[**cell].is_free())
            .map(|(_, &height)| height)
            .sum()
    }

    /// Free rectangles with their top-left corner at (`column`, `row`). Walking right,
    /// the candidate's height is the smallest downward free run seen so far; each time
    /// that height drops, the narrower-but-taller rectangle before the drop is recorded.
    fn free_rects_from(
        &self,
        column: usize,
        row: usize,
        xs: &[Pt],
        ys: &[Pt],
        out: &mut Vec<FreeRect>,
    ) {
        let mut running: Option<Pt> = None;
        let mut width = Pt::ZERO;
        let mut next = column;

        while next < self.columns.len() && self.cells[self.columns[next][row]].is_free() {
            let height = self.column_free_height(next, row);
            match running {
                Some(current) if current.exceeds(height) => {
                    out.push(FreeRect {
                        column,
                        row,
                        x: xs[column],
                        y: ys[row],
                        width,
                        height: current,
                    });
                    running = Some(height);
                }
                None => running = Some(height),
                _ => {}
            }
            width += self.column_widths[next];
            next += 1;
        }

        if let Some(height) = running {
            out.push(FreeRect {
                column,
                row,
                x: xs[column],
                y: ys[row],
                width,
                height,
            });
        }
    }

    /// Every maximal free rectangle anchored at every free cell, scanning each row left to
    /// right, top to bottom. The list deliberately overlaps itself: placement only needs
    /// some rectangle that is large enough, not a minimal cover.
    pub fn list_free_rects(&self) -> Vec<FreeRect> {
        let xs = self.column_offsets();
        let ys = self.row_offsets();
        let mut free = Vec::new();
        for row in 0..self.rows.len() {
            for column in 0..self.columns.len() {
                self.free_rects_from(column, row, &xs, &ys, &mut free);
            }
        }
        free
    }

    /// Convenience for [select_fit] over [AreaMatrix::list_free_rects]
    pub fn find_fit(&self, rect: &Rect) -> Option<FreeRect> {
        let free = self.list_free_rects();
        select_fit(rect, &free).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::PlacementMode;

    fn free(column: usize, row: usize, width: f64, height: f64) -> FreeRect {
        FreeRect {
            column,
            row,
            x: Pt(column as f64),
            y: Pt(row as f64),
            width: Pt(width),
            height: Pt(height),
        }
    }

    #[test]
    fn prefers_topmost_then_leftmost() {
        let candidates = [
            free(3, 1, 100.0, 100.0),
            free(2, 0, 100.0, 100.0),
            free(0, 2, 100.0, 100.0),
            free(1, 0, 100.0, 100.0),
            free(0, 0, 5.0, 5.0),
        ];
        let test = Rect::new(50.0, 50.0);
        let selected = select_fit(&test, &candidates).expect("a candidate fits");
        assert_eq!((selected.column, selected.row), (1, 0));
    }

    #[test]
    fn nothing_fits() {
        let candidates = [free(0, 0, 10.0, 100.0), free(1, 0, 100.0, 10.0)];
        assert!(select_fit(&Rect::new(50.0, 50.0), &candidates).is_none());
        assert!(select_fit(&Rect::new(50.0, 50.0), &[]).is_none());
    }

    #[test]
    fn fresh_matrix_is_one_free_rect() {
        let matrix = AreaMatrix::new(Pt(200.0), Pt(100.0));
        let free = matrix.list_free_rects();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].width, Pt(200.0));
        assert_eq!(free[0].height, Pt(100.0));
    }

    #[test]
    fn stepped_free_space_yields_both_shapes() {
        // occupy the top-right corner so that column 0 is taller than column 1
        let mut matrix = AreaMatrix::new(Pt(100.0), Pt(100.0));
        matrix
            .place_rect_at(Pt(50.0), Pt(0.0), &Rect::new(50.0, 40.0), PlacementMode::Strict)
            .expect("placement succeeds");

        let free = matrix.list_free_rects();
        let at_origin: Vec<_> = free.iter().filter(|f| f.column == 0 && f.row == 0).collect();
        assert_eq!(at_origin.len(), 1);
        assert_eq!(at_origin[0].width, Pt(50.0));
        assert_eq!(at_origin[0].height, Pt(100.0));

        let below: Vec<_> = free.iter().filter(|f| f.column == 0 && f.row == 1).collect();
        assert_eq!(below.len(), 1);
        assert_eq!(below[0].width, Pt(100.0));
        assert_eq!(below[0].height, Pt(60.0));
    }

    #[test]
    fn narrowing_run_yields_tall_then_wide() {
        // occupy the bottom-right corner: walking right from the origin the free run
        // drops from 100 to 40, so both the tall-narrow and short-wide shapes appear
        let mut matrix = AreaMatrix::new(Pt(100.0), Pt(100.0));
        matrix
            .place_rect_at(Pt(50.0), Pt(40.0), &Rect::new(50.0, 60.0), PlacementMode::Strict)
            .expect("placement succeeds");

        let free = matrix.list_free_rects();
        let at_origin: Vec<_> = free
            .iter()
            .filter(|f| f.column == 0 && f.row == 0)
            .map(|f| (f.width, f.height))
            .collect();
        assert_eq!(
            at_origin,
            vec![(Pt(50.0), Pt(100.0)), (Pt(100.0), Pt(40.0))]
        );
    }
}
