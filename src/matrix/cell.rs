use crate::colour::Colour;
use id_arena::Id;

/// Handle of a [FreeCell] inside an [AreaMatrix](crate::AreaMatrix)'s cell arena
pub type CellId = Id<FreeCell>;

/// Records which placed rectangle covers a cell
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Occupant {
    /// Index into the owning matrix's placements
    pub placement: usize,
    pub colour: Option<Colour>,
}

/// One intersection of a grid row and a grid column
#[derive(Debug, Clone, PartialEq)]
pub struct FreeCell {
    /// Matrix-local label, unique within the owning matrix. Only used for diagnostics.
    pub label: usize,
    pub occupant: Option<Occupant>,
}

impl FreeCell {
    pub fn new(label: usize, occupant: Option<Occupant>) -> FreeCell {
        FreeCell { label, occupant }
    }

    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn colour(&self) -> Option<Colour> {
        self.occupant.and_then(|o| o.colour)
    }
}
