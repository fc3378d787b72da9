use derive_more::{Add, AddAssign, Deref, Display, Div, From, Into, Mul, Sub, SubAssign, Sum};

/// A length in points (1/72 of an inch). All layout geometry is expressed in points so
/// that packed layouts can be handed directly to the SVG and PDF renderers.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    Mul,
    Div,
    Deref,
    Display,
    From,
    Into,
)]
#[display("{_0}")]
pub struct Pt(pub f64);

impl Pt {
    /// Lengths closer together than this are treated as equal by the area matrix.
    /// Splitting a row or column closer than this to one of its edges is refused.
    pub const EPSILON: f64 = 1e-3;

    pub const ZERO: Pt = Pt(0.0);

    /// Whether two lengths are equal within [Pt::EPSILON]
    pub fn approx_eq(self, other: Pt) -> bool {
        (self.0 - other.0).abs() < Self::EPSILON
    }

    /// Whether `self` is meaningfully larger than `other`, ignoring float noise
    pub fn exceeds(self, other: Pt) -> bool {
        self.0 - other.0 >= Self::EPSILON
    }

    /// Whether `self` can hold `other`, ignoring float noise
    pub fn covers(self, other: Pt) -> bool {
        !other.exceeds(self)
    }

    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    pub fn ceil(self) -> Pt {
        Pt(self.0.ceil())
    }

    /// Whether the length is finite and strictly positive
    pub fn is_positive(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

/// A length in inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Mul, Div, From)]
pub struct In(pub f64);

impl From<In> for Pt {
    fn from(i: In) -> Self {
        Pt(i.0 * 72.0)
    }
}

/// A length in millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Mul, Div, From)]
pub struct Mm(pub f64);

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        Pt(mm.0 * 72.0 / 25.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_noise_is_ignored() {
        let a = Pt(0.1) + Pt(0.2);
        assert!(a.approx_eq(Pt(0.3)));
        assert!(!a.exceeds(Pt(0.3)));
        assert!(Pt(0.3).covers(a));
    }

    #[test]
    fn converts_from_physical_units() {
        assert!(Pt::from(In(1.0)).approx_eq(Pt(72.0)));
        assert!(Pt::from(Mm(25.4)).approx_eq(Pt(72.0)));
    }

    #[test]
    fn scalar_arithmetic() {
        let p = Pt(10.0) * 2.0_f64 / 4.0_f64;
        assert!(p.approx_eq(Pt(5.0)));
        let total: Pt = [Pt(1.0), Pt(2.0), Pt(3.5)].into_iter().sum();
        assert!(total.approx_eq(Pt(6.5)));
    }
}
