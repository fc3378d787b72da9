use crate::colour::Colour;
use crate::error::ArrangeError;
use crate::units::*;

/// A width and height pair, typically the footprint of a packed layout
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Size {
    pub width: Pt,
    pub height: Pt,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Size {
        Size {
            width: Pt(width),
            height: Pt(height),
        }
    }

    pub fn area(&self) -> f64 {
        f64::from(self.width) * f64::from(self.height)
    }

    /// Whether either dimension is (approximately) zero
    pub fn is_empty(&self) -> bool {
        !self.width.exceeds(Pt::ZERO) || !self.height.exceeds(Pt::ZERO)
    }
}

/// A rectangle to be packed. Callers fill in the size (and optionally an identifier,
/// colour and sort group); the packer assigns `x` and `y` in place. The coordinate
/// system has its origin at the top-left with `y` growing downwards, as in SVG.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Rect {
    /// Caller-chosen identifier, carried through packing untouched
    pub id: Option<String>,
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub height: Pt,
    /// Fill colour used when the layout is rendered. `None` renders unfilled.
    pub colour: Option<Colour>,
    /// Optional group used by [grouped_sort_key](crate::grouped_sort_key) to keep
    /// related rectangles together in placement order
    pub sort_group: Option<u32>,
}

impl Rect {
    /// Create an unplaced rectangle of the given size
    pub fn new(width: f64, height: f64) -> Rect {
        Rect::sized(Pt(width), Pt(height))
    }

    /// Create an unplaced rectangle from lengths already expressed in points
    pub fn sized(width: Pt, height: Pt) -> Rect {
        Rect {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_id<S: ToString>(mut self, id: S) -> Rect {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_colour<C: Into<Colour>>(mut self, colour: C) -> Rect {
        self.colour = Some(colour.into());
        self
    }

    pub fn with_group(mut self, group: u32) -> Rect {
        self.sort_group = Some(group);
        self
    }

    pub fn with_origin(mut self, x: f64, y: f64) -> Rect {
        self.x = Pt(x);
        self.y = Pt(y);
        self
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn area(&self) -> f64 {
        self.size().area()
    }

    pub fn right(&self) -> Pt {
        self.x + self.width
    }

    pub fn bottom(&self) -> Pt {
        self.y + self.height
    }

    /// Whether the interiors of two rectangles overlap. Rectangles that merely
    /// share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        if !self.right().exceeds(other.x) || !other.right().exceeds(self.x) {
            return false;
        }
        if !self.bottom().exceeds(other.y) || !other.bottom().exceeds(self.y) {
            return false;
        }
        true
    }

    /// Reject sizes the packer can't make progress with. Lengths at or below
    /// [Pt::EPSILON] count as zero, since the grid can't split off a line that thin.
    pub fn validate(&self) -> Result<(), ArrangeError> {
        let usable = |length: Pt| length.is_positive() && length.exceeds(Pt::ZERO);
        if usable(self.width) && usable(self.height) {
            Ok(())
        } else {
            Err(ArrangeError::InvalidSize {
                id: self.id.clone(),
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Bounding size of a set of rectangles, measured from the origin
pub fn bounding_size(rects: &[Rect]) -> Size {
    rects.iter().fold(Size::default(), |size, r| Size {
        width: size.width.max(r.right()),
        height: size.height.max(r.bottom()),
    })
}

impl From<Size> for Rect {
    fn from(size: Size) -> Self {
        Rect::sized(size.width, size.height)
    }
}
