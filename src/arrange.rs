//! The packing driver: size a trial bounding rectangle, try to place everything in a
//! fresh [AreaMatrix], and grow the trial area until an attempt succeeds.

use crate::arrangeable::Arrange;
use crate::error::ArrangeError;
use crate::matrix::{select_fit, AreaMatrix, PlacementMode};
use crate::rect::{Rect, Size};
use crate::render;
use crate::units::Pt;
use std::path::PathBuf;

/// The golden ratio, the default width / height ratio of packed layouts
pub const GOLDEN_RATIO: f64 = 1.618;

/// Computes the placement priority of a rectangle; larger keys are placed first
pub type SortKeyFn = fn(&Rect) -> f64;

/// Place larger rectangles first
pub fn default_sort_key(rect: &Rect) -> f64 {
    rect.area()
}

/// Place whole sort groups together (highest group first), and larger rectangles first
/// within a group
pub fn grouped_sort_key(rect: &Rect) -> f64 {
    const GROUP_WEIGHT: f64 = (1u64 << 28) as f64;
    rect.sort_group.unwrap_or(0) as f64 * GROUP_WEIGHT + rect.area()
}

/// Settings for a packing run
#[derive(Debug, Clone)]
pub struct ArrangeConfig {
    /// Target width / height ratio of the trial bounding rectangle
    pub ratio: f64,
    /// How much to grow the trial area by after a failed attempt, i.e. 0.1 = 10%
    pub growth: f64,
    pub sort_key: SortKeyFn,
    /// Give up after this many attempts. `None` keeps growing until everything fits,
    /// which always happens eventually.
    pub max_attempts: Option<usize>,
    /// Write an SVG picture of the final grid here after a successful arrangement
    pub snapshot_path: Option<PathBuf>,
}

impl Default for ArrangeConfig {
    fn default() -> Self {
        ArrangeConfig {
            ratio: GOLDEN_RATIO,
            growth: 0.1,
            sort_key: default_sort_key,
            max_attempts: None,
            snapshot_path: None,
        }
    }
}

impl ArrangeConfig {
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn with_sort_key(mut self, sort_key: SortKeyFn) -> Self {
        self.sort_key = sort_key;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_snapshot_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    fn validate(&self) -> Result<(), ArrangeError> {
        if !self.ratio.is_finite() || self.ratio <= 0.0 {
            return Err(ArrangeError::InvalidRatio(self.ratio));
        }
        if !self.growth.is_finite() || self.growth <= 0.0 {
            return Err(ArrangeError::InvalidGrowth(self.growth));
        }
        Ok(())
    }

    /// The smallest whole-point rectangle of the configured ratio with at least `area`.
    /// Dimensions are always rounded up: a trial bound that is too small can never
    /// succeed.
    pub fn enclosing_size(&self, area: f64) -> Size {
        let height = (area / self.ratio).sqrt();
        let width = height * self.ratio;
        Size {
            width: Pt(width.ceil()),
            height: Pt(height.ceil()),
        }
    }

    /// Indices of `rects` in placement order. The sort is stable, so rectangles with
    /// equal keys keep their input order.
    pub fn placement_order(&self, rects: &[Rect]) -> Vec<usize> {
        let keys: Vec<f64> = rects.iter().map(self.sort_key).collect();
        let mut order: Vec<usize> = (0..rects.len()).collect();
        order.sort_by(|&a, &b| keys[b].total_cmp(&keys[a]));
        order
    }

    /// Run the sizing / attempt / grow loop. `attempt` fills a fresh matrix and reports
    /// whether everything fit; recoverable placement errors count as a failed attempt.
    pub(crate) fn grow_until_fit<F>(&self, area: f64, mut attempt: F) -> Result<AreaMatrix, ArrangeError>
    where
        F: FnMut(&mut AreaMatrix) -> Result<(), ArrangeError>,
    {
        self.validate()?;

        let mut area = area;
        let mut attempts = 0;
        loop {
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    return Err(ArrangeError::AttemptsExhausted { attempts });
                }
            }
            attempts += 1;

            let size = self.enclosing_size(area);
            tracing::debug!(
                "attempt {attempts}: trial rect {}x{} for area {area:.0}",
                size.width,
                size.height
            );

            let mut matrix = AreaMatrix::new(size.width, size.height);
            match attempt(&mut matrix) {
                Ok(()) => {
                    matrix.update_rects_xy();
                    let allocated = matrix.get_allocated_size();
                    tracing::info!(
                        "found arrangement in {}x{} after {attempts} attempt(s), using {}x{}",
                        size.width,
                        size.height,
                        allocated.width,
                        allocated.height
                    );
                    if let Some(path) = &self.snapshot_path {
                        render::write_svg(path, &matrix.snapshot())?;
                    }
                    return Ok(matrix);
                }
                Err(e) if e.is_recoverable() => {
                    tracing::debug!("attempt {attempts} failed: {e}");
                }
                Err(e) => return Err(e),
            }

            area *= 1.0 + self.growth;
        }
    }
}

/// Find a slot for `rect` in `matrix`, or report that none is large enough
pub(crate) fn find_slot(matrix: &AreaMatrix, rect: &Rect) -> Result<(usize, usize), ArrangeError> {
    let free = matrix.list_free_rects();
    select_fit(rect, &free)
        .map(|slot| (slot.column, slot.row))
        .ok_or(ArrangeError::PlacementNotFound {
            width: rect.width,
            height: rect.height,
        })
}

/// Packs flat lists of rectangles, or lists of already-arranged [Arrange]ables, into a
/// bounding rectangle of a target aspect ratio.
///
/// # Example
///
/// ```
/// use page_arrange::{ArrangeRects, Rect};
///
/// let mut rects = vec![
///     Rect::new(100.0, 200.0).with_id("a"),
///     Rect::new(20.0, 20.0).with_id("b"),
///     Rect::new(75.0, 235.0).with_id("c"),
/// ];
/// let matrix = ArrangeRects::default().arrange(&mut rects).expect("can arrange");
///
/// let size = matrix.get_allocated_size();
/// for rect in rects.iter() {
///     assert!(rect.right() <= size.width && rect.bottom() <= size.height);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArrangeRects {
    pub config: ArrangeConfig,
}

impl ArrangeRects {
    pub fn new(config: ArrangeConfig) -> ArrangeRects {
        ArrangeRects { config }
    }

    /// Pack `rects`, writing each rectangle's final position back onto it. Returns the
    /// matrix of the successful attempt, whose [AreaMatrix::get_rects] holds the placed
    /// copies in placement order.
    pub fn arrange(&self, rects: &mut [Rect]) -> Result<AreaMatrix, ArrangeError> {
        for rect in rects.iter() {
            rect.validate()?;
        }

        let order = self.config.placement_order(rects);
        let area: f64 = rects.iter().map(Rect::area).sum();

        let matrix = self.config.grow_until_fit(area, |matrix| {
            for &i in order.iter() {
                let (column, row) = find_slot(matrix, &rects[i])?;
                matrix.place_rect(column, row, &rects[i], PlacementMode::Clip)?;
            }
            Ok(())
        })?;

        // placements were made in `order`, so placement k belongs to rects[order[k]]
        for (placed, &i) in matrix.get_rects().iter().zip(order.iter()) {
            rects[i].x = placed.x;
            rects[i].y = placed.y;
        }
        Ok(matrix)
    }

    /// Arrange every arrangeable on its own, then pack their footprints into one shared
    /// matrix, transplanting each sub-layout wholesale into the slot chosen for it.
    pub fn arrange_arrangeables(
        &self,
        arrangeables: &mut [Box<dyn Arrange>],
    ) -> Result<AreaMatrix, ArrangeError> {
        for arrangeable in arrangeables.iter_mut() {
            arrangeable.arrange()?;
        }

        let footprints: Vec<Rect> = arrangeables
            .iter()
            .map(|a| Rect::from(a.get_allocated_size()).with_id(a.identifier()))
            .collect();
        let order: Vec<usize> = self
            .config
            .placement_order(&footprints)
            .into_iter()
            .filter(|&i| !footprints[i].size().is_empty())
            .collect();
        let area: f64 = footprints.iter().map(Rect::area).sum();

        self.config.grow_until_fit(area, |matrix| {
            for &i in order.iter() {
                let (column, row) = find_slot(matrix, &footprints[i])?;
                tracing::debug!(
                    "overlaying {} ({}x{}) at column {column}, row {row}",
                    arrangeables[i].identifier(),
                    footprints[i].width,
                    footprints[i].height
                );
                arrangeables[i].overlay_onto_matrix(column, row, matrix)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enclosing_size_rounds_up() {
        let config = ArrangeConfig::default();
        let size = config.enclosing_size(10_000.0);
        // height = sqrt(10000 / 1.618) = 78.6..., width = 127.2...
        assert_eq!(size, Size::new(128.0, 79.0));
        assert!(size.area() >= 10_000.0);

        let square = ArrangeConfig::default().with_ratio(1.0).enclosing_size(400.0);
        assert_eq!(square, Size::new(20.0, 20.0));
    }

    #[test]
    fn default_order_is_area_descending_and_stable() {
        let rects = [
            Rect::new(9.0, 9.0).with_id("small"),
            Rect::new(20.0, 20.0).with_id("big"),
            Rect::new(5.0, 20.0).with_id("tie-1"),
            Rect::new(20.0, 5.0).with_id("tie-2"),
        ];
        let order = ArrangeConfig::default().placement_order(&rects);
        assert_eq!(order, vec![1, 2, 3, 0]);
    }

    #[test]
    fn grouped_order_keeps_groups_together() {
        let rects = [
            Rect::new(100.0, 100.0).with_group(0),
            Rect::new(1.0, 1.0).with_group(1),
            Rect::new(50.0, 50.0).with_group(0),
            Rect::new(2.0, 2.0).with_group(1),
        ];
        let order = ArrangeConfig::default()
            .with_sort_key(grouped_sort_key)
            .placement_order(&rects);
        assert_eq!(order, vec![3, 1, 0, 2]);
    }

    #[test]
    fn rejects_bad_input() {
        let mut rects = vec![Rect::new(10.0, 0.0)];
        assert!(matches!(
            ArrangeRects::default().arrange(&mut rects),
            Err(ArrangeError::InvalidSize { .. })
        ));

        let mut rects = vec![Rect::new(10.0, 10.0)];
        let arranger = ArrangeRects::new(ArrangeConfig::default().with_ratio(0.0));
        assert!(matches!(
            arranger.arrange(&mut rects),
            Err(ArrangeError::InvalidRatio(_))
        ));
    }

    #[test]
    fn hairline_rect_is_rejected_before_packing() {
        let mut rects = vec![Rect::new(0.0005, 10.0), Rect::new(10.0, 10.0)];
        assert!(matches!(
            ArrangeRects::default().arrange(&mut rects),
            Err(ArrangeError::InvalidSize { .. })
        ));
    }

    #[test]
    fn empty_input_arranges_to_nothing() {
        let mut rects: Vec<Rect> = Vec::new();
        let matrix = ArrangeRects::default().arrange(&mut rects).expect("nothing to do");
        assert!(matrix.get_rects().is_empty());
        assert_eq!(matrix.get_allocated_size(), Size::default());
    }

    #[test]
    fn single_rect_lands_at_origin() {
        let mut rects = vec![Rect::new(30.0, 40.0)];
        let matrix = ArrangeRects::default().arrange(&mut rects).expect("fits");
        assert_eq!((rects[0].x, rects[0].y), (Pt(0.0), Pt(0.0)));
        assert_eq!(matrix.get_allocated_size(), Size::new(30.0, 40.0));
    }

    #[test]
    fn attempts_can_be_bounded() {
        // a 1000x1 sliver needs many growth steps before the trial width reaches 1000
        let mut rects = vec![Rect::new(1000.0, 1.0)];
        let arranger = ArrangeRects::new(ArrangeConfig::default().with_max_attempts(2));
        assert!(matches!(
            arranger.arrange(&mut rects),
            Err(ArrangeError::AttemptsExhausted { attempts: 2 })
        ));
    }
}
