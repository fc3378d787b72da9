//! Composable packing units.
//!
//! An [Arrangeable] is a named node holding rectangles of its own and any number of
//! named children. Arranging a node arranges its children first, then packs its own
//! rectangles together with one footprint per child; when a child's footprint is
//! placed, the child's finished sub-layout is overlaid into the node's matrix. The
//! result is a tree of packing problems solved bottom-up, where each solved child is
//! an opaque block to its parent.
//!
//! # Example
//!
//! ```
//! use page_arrange::{Arrange, Arrangeable, ArrangeConfig, Rect};
//!
//! let mut glossary = Arrangeable::new("glossary", ArrangeConfig::default());
//! glossary.add_rect(Rect::new(40.0, 10.0).with_id("term-1"));
//! glossary.add_rect(Rect::new(35.0, 10.0).with_id("term-2"));
//!
//! let mut page = Arrangeable::new("page", ArrangeConfig::default());
//! page.add_rect(Rect::new(120.0, 80.0).with_id("code"));
//! page.add_child(glossary).expect("unique child name");
//!
//! page.arrange().expect("can arrange");
//! assert_eq!(page.get_rects().len(), 3);
//! ```

mod column;
pub use column::*;

use crate::arrange::{find_slot, ArrangeConfig};
use crate::error::ArrangeError;
use crate::matrix::{AreaMatrix, PlacementMode};
use crate::rect::{Rect, Size};
use crate::units::Pt;
use std::collections::BTreeMap;

/// A unit that can arrange itself and then be composed into a parent layout
pub trait Arrange {
    fn identifier(&self) -> &str;

    /// Compute this unit's layout. Must be called before the layout is read or
    /// overlaid anywhere.
    fn arrange(&mut self) -> Result<(), ArrangeError>;

    /// The matrix holding the most recent layout
    fn matrix(&self) -> &AreaMatrix;

    /// Every rectangle of the layout, flattened and positioned relative to this
    /// unit's own origin
    fn get_rects(&self) -> &[Rect] {
        self.matrix().get_rects()
    }

    /// The footprint this unit occupies once arranged
    fn get_allocated_size(&self) -> Size {
        self.matrix().get_allocated_size()
    }

    /// Transplant the finished layout into `dst` with its origin at the grid cell
    /// (`column`, `row`)
    fn overlay_onto_matrix(
        &self,
        column: usize,
        row: usize,
        dst: &mut AreaMatrix,
    ) -> Result<(), ArrangeError> {
        self.matrix().overlay_matrix(column, row, dst)
    }
}

/// What a single entry of a node's combined placement list refers to
#[derive(Debug, Clone)]
enum Entry {
    Own(usize),
    Child(String),
}

/// A named packing node owning rectangles and child [Arrange]ables, packed with the
/// grow-and-retry bin packer
pub struct Arrangeable {
    identifier: String,
    config: ArrangeConfig,
    rects: Vec<Rect>,
    children: BTreeMap<String, Box<dyn Arrange>>,
    matrix: AreaMatrix,
}

impl Arrangeable {
    pub fn new<S: ToString>(identifier: S, config: ArrangeConfig) -> Arrangeable {
        Arrangeable {
            identifier: identifier.to_string(),
            config,
            rects: Vec::new(),
            children: BTreeMap::new(),
            matrix: AreaMatrix::new(Pt::ZERO, Pt::ZERO),
        }
    }

    pub fn add_rect(&mut self, rect: Rect) -> &mut Self {
        self.rects.push(rect);
        self
    }

    /// Add a child, keyed by its identifier. Identifiers must be unique among siblings.
    pub fn add_child<A: Arrange + 'static>(&mut self, child: A) -> Result<&mut Self, ArrangeError> {
        let name = child.identifier().to_string();
        if self.children.contains_key(&name) {
            return Err(ArrangeError::DuplicateChild(name));
        }
        self.children.insert(name, Box::new(child));
        Ok(self)
    }

    /// This node's own rectangles. After [Arrange::arrange] they carry their final
    /// positions within this node.
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn child(&self, name: &str) -> Option<&dyn Arrange> {
        self.children.get(name).map(|child| child.as_ref())
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &dyn Arrange)> {
        self.children
            .iter()
            .map(|(name, child)| (name.as_str(), child.as_ref()))
    }
}

impl Arrange for Arrangeable {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn arrange(&mut self) -> Result<(), ArrangeError> {
        for child in self.children.values_mut() {
            child.arrange()?;
        }
        for rect in self.rects.iter() {
            rect.validate()?;
        }

        // own rects plus one footprint-sized placeholder per child
        let mut entries: Vec<(Entry, Rect)> = self
            .rects
            .iter()
            .enumerate()
            .map(|(i, rect)| (Entry::Own(i), rect.clone()))
            .collect();
        for (name, child) in self.children.iter() {
            let footprint = child.get_allocated_size();
            if footprint.is_empty() {
                tracing::debug!("{}: skipping empty child {name}", self.identifier);
                continue;
            }
            entries.push((Entry::Child(name.clone()), Rect::from(footprint).with_id(name)));
        }

        let placeholders: Vec<Rect> = entries.iter().map(|(_, rect)| rect.clone()).collect();
        let order = self.config.placement_order(&placeholders);
        let area: f64 = placeholders.iter().map(Rect::area).sum();

        tracing::debug!(
            "{}: arranging {} rects and {} children",
            self.identifier,
            self.rects.len(),
            self.children.len()
        );

        let children = &self.children;
        // placement index of each own rect in the successful matrix
        let mut own_placements: Vec<(usize, usize)> = Vec::with_capacity(self.rects.len());
        let matrix = self.config.grow_until_fit(area, |matrix| {
            own_placements.clear();
            for &i in order.iter() {
                let (entry, rect) = &entries[i];
                let (column, row) = find_slot(matrix, rect)?;
                match entry {
                    Entry::Own(own) => {
                        let placement = matrix.place_rect(column, row, rect, PlacementMode::Strict)?;
                        own_placements.push((*own, placement.index));
                    }
                    Entry::Child(name) => {
                        if let Some(child) = children.get(name) {
                            child.overlay_onto_matrix(column, row, matrix)?;
                        }
                    }
                }
            }
            Ok(())
        })?;

        for (own, placement) in own_placements {
            let placed = &matrix.get_rects()[placement];
            self.rects[own].x = placed.x;
            self.rects[own].y = placed.y;
        }
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
    use crate::colour::colours;

    fn assert_disjoint(rects: &[Rect]) {
        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                assert!(!a.intersects(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn leaf_arranges_like_the_flat_packer() {
        let mut leaf = Arrangeable::new("leaf", ArrangeConfig::default());
        leaf.add_rect(Rect::new(100.0, 200.0).with_id("a"))
            .add_rect(Rect::new(20.0, 20.0).with_id("b"));
        leaf.arrange().expect("can arrange");

        assert_eq!(leaf.get_rects().len(), 2);
        assert_disjoint(leaf.get_rects());
        // the larger rectangle goes first, into the top-left corner
        assert_eq!((leaf.rects()[0].x, leaf.rects()[0].y), (Pt(0.0), Pt(0.0)));
        let size = leaf.get_allocated_size();
        for rect in leaf.rects() {
            assert!(size.width.covers(rect.right()));
            assert!(size.height.covers(rect.bottom()));
        }
    }

    #[test]
    fn child_rects_keep_their_relative_offsets() {
        let mut child = Arrangeable::new("child", ArrangeConfig::default());
        child
            .add_rect(Rect::new(30.0, 30.0).with_id("c1").with_colour(colours::RED))
            .add_rect(Rect::new(10.0, 10.0).with_id("c2"));

        let mut parent = Arrangeable::new("parent", ArrangeConfig::default());
        parent.add_rect(Rect::new(200.0, 100.0).with_id("p1"));
        parent.add_child(child).expect("unique");
        parent.arrange().expect("can arrange");

        let child = parent.child("child").expect("child exists");
        let within_child: Vec<Rect> = child.get_rects().to_vec();
        let rects = parent.get_rects();
        assert_eq!(rects.len(), 3);
        assert_disjoint(rects);

        let find = |id: &str| {
            rects
                .iter()
                .find(|r| r.id.as_deref() == Some(id))
                .expect("rect is present")
        };
        let c1 = find("c1");
        let c2 = find("c2");
        let local1 = within_child.iter().find(|r| r.id.as_deref() == Some("c1")).unwrap();
        let local2 = within_child.iter().find(|r| r.id.as_deref() == Some("c2")).unwrap();

        // both child rects are shifted by the same slot origin
        let dx = c1.x - local1.x;
        let dy = c1.y - local1.y;
        assert!((c2.x - local2.x).approx_eq(dx));
        assert!((c2.y - local2.y).approx_eq(dy));
        assert_eq!(c1.colour, Some(colours::RED));
    }

    #[test]
    fn duplicate_children_are_rejected() {
        let mut parent = Arrangeable::new("parent", ArrangeConfig::default());
        parent
            .add_child(Arrangeable::new("x", ArrangeConfig::default()))
            .expect("first is fine");
        let result = parent.add_child(Arrangeable::new("x", ArrangeConfig::default()));
        assert!(matches!(result, Err(ArrangeError::DuplicateChild(name)) if name == "x"));
    }

    #[test]
    fn empty_children_are_skipped() {
        let mut parent = Arrangeable::new("parent", ArrangeConfig::default());
        parent.add_rect(Rect::new(10.0, 10.0));
        parent
            .add_child(Arrangeable::new("empty", ArrangeConfig::default()))
            .expect("unique");
        parent.arrange().expect("can arrange");
        assert_eq!(parent.get_rects().len(), 1);
        assert_eq!(parent.get_allocated_size(), Size::new(10.0, 10.0));
    }

    #[test]
    fn three_levels_deep() {
        let mut leaf = Arrangeable::new("leaf", ArrangeConfig::default());
        leaf.add_rect(Rect::new(5.0, 8.0)).add_rect(Rect::new(8.0, 5.0));
        let mut middle = Arrangeable::new("middle", ArrangeConfig::default());
        middle.add_rect(Rect::new(20.0, 12.0));
        middle.add_child(leaf).expect("unique");
        let mut root = Arrangeable::new("root", ArrangeConfig::default());
        root.add_rect(Rect::new(40.0, 30.0));
        root.add_child(middle).expect("unique");

        root.arrange().expect("can arrange");
        assert_eq!(root.get_rects().len(), 5);
        assert_disjoint(root.get_rects());
    }
}
