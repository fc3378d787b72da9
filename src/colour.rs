use std::fmt;

/// The colour tag carried by a rectangle, expressed in the same colour spaces a PDF
/// content stream understands. The packer treats colours as opaque labels: they are
/// copied onto grid cells when a rectangle is placed and read back by the renderers.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the Gray space, g ranges from 0.0 to 1.0
    pub fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    /// Convert to 8-bit RGB components. CMYK is converted naively (no colour profile),
    /// which is good enough for previews.
    pub fn to_rgb_bytes(&self) -> (u8, u8, u8) {
        let (r, g, b) = match *self {
            Colour::RGB { r, g, b } => (r, g, b),
            Colour::CMYK { c, m, y, k } => {
                ((1.0 - c) * (1.0 - k), (1.0 - m) * (1.0 - k), (1.0 - y) * (1.0 - k))
            }
            Colour::Grey { g } => (g, g, g),
        };
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (byte(r), byte(g), byte(b))
    }

    /// The colour as a CSS colour value, i.e. `rgb(255,0,255)`
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.to_rgb_bytes();
        write!(f, "rgb({r},{g},{b})")
    }
}

impl From<(u8, u8, u8)> for Colour {
    fn from(c: (u8, u8, u8)) -> Self {
        Colour::new_rgb_bytes(c.0, c.1, c.2)
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    pub const GREY: Colour = Colour::Grey { g: 0.5 };
    pub const RED: Colour = Colour::RGB {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };
    pub const GREEN: Colour = Colour::RGB {
        r: 0.0,
        g: 1.0,
        b: 0.0,
    };
    pub const BLUE: Colour = Colour::RGB {
        r: 0.0,
        g: 0.0,
        b: 1.0,
    };
    /// Opaque magenta
    pub const PINK: Colour = Colour::RGB {
        r: 1.0,
        g: 0.0,
        b: 1.0,
    };
    /// Default background of content blocks
    pub const PANEL: Colour = Colour::RGB {
        r: 236.0 / 255.0,
        g: 236.0 / 255.0,
        b: 236.0 / 255.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_strings() {
        assert_eq!(colours::RED.to_css(), "rgb(255,0,0)");
        assert_eq!(colours::PANEL.to_css(), "rgb(236,236,236)");
        assert_eq!(colours::PINK.to_css(), "rgb(255,0,255)");
        assert_eq!(Colour::new_grey(0.5).to_css(), "rgb(128,128,128)");
        let cyan = Colour::CMYK {
            c: 1.0,
            m: 0.0,
            y: 0.0,
            k: 0.0,
        };
        assert_eq!(cyan.to_css(), "rgb(0,255,255)");
    }
}
