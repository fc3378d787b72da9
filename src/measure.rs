//! Sizing rectangles from text, so that blocks of text can be packed like any other box

use crate::error::ArrangeError;
use crate::rect::Rect;
use crate::units::Pt;
use id_arena::{Arena, Id};
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use std::collections::HashMap;

/// Which font to measure with, and at what size
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub size: Pt,
    pub bold: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            family: "sans-serif".to_string(),
            size: Pt(12.0),
            bold: false,
        }
    }
}

impl TextStyle {
    pub fn new<S: ToString>(family: S, size: Pt) -> TextStyle {
        TextStyle {
            family: family.to_string(),
            size,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Measurements of a single run of text
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct TextMetrics {
    /// How far the pen moves while drawing the text
    pub advance_width: Pt,
    /// Ascent minus descent
    pub height: Pt,
    pub ascent: Pt,
    /// Usually negative
    pub descent: Pt,
    /// How far apart successive baselines are
    pub line_height: Pt,
}

/// Something that can measure text
pub trait Measure {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextMetrics, ArrangeError>;
}

/// A parsed TTF or OTF font face
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, returning an error if the font could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, ArrangeError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / self.face.as_face_ref().units_per_em() as f64
    }

    /// Distance from the baseline to the top of the font at the given size
    pub fn ascent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().ascender() as f64
    }

    /// Distance from the baseline to the bottom of the font. Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().descender() as f64
    }

    pub fn leading(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().line_gap() as f64
    }

    pub fn line_height(&self, size: Pt) -> Pt {
        self.leading(size) + self.ascent(size) - self.descent(size)
    }

    /// Horizontal advance of `text` at the given size. Characters missing from the font
    /// advance by one em.
    pub fn advance_width(&self, text: &str, size: Pt) -> Pt {
        let face = self.face.as_face_ref();
        let units: u32 = text
            .chars()
            .map(|ch| {
                face.glyph_index(ch)
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .map(u32::from)
                    .unwrap_or_else(|| u32::from(face.units_per_em()))
            })
            .sum();
        self.scaling(size) * units as f64
    }

    pub fn metrics(&self, text: &str, size: Pt) -> TextMetrics {
        let ascent = self.ascent(size);
        let descent = self.descent(size);
        TextMetrics {
            advance_width: self.advance_width(text, size),
            height: ascent - descent,
            ascent,
            descent,
            line_height: self.line_height(size),
        }
    }
}

/// A set of fonts addressed by family name and weight
#[derive(Default)]
pub struct FontBook {
    fonts: Arena<Font>,
    index: HashMap<(String, bool), Id<Font>>,
}

impl FontBook {
    pub fn new() -> FontBook {
        FontBook::default()
    }

    /// Register a font under `family`, replacing any font previously registered with the
    /// same family and weight
    pub fn add_font<S: ToString>(&mut self, family: S, bold: bool, font: Font) -> Id<Font> {
        let id = self.fonts.alloc(font);
        self.index.insert((family.to_string(), bold), id);
        id
    }

    pub fn font(&self, family: &str, bold: bool) -> Option<&Font> {
        self.index
            .get(&(family.to_string(), bold))
            .map(|&id| &self.fonts[id])
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Measure for FontBook {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextMetrics, ArrangeError> {
        let font = self
            .font(&style.family, style.bold)
            .ok_or_else(|| ArrangeError::UnknownFont {
                family: style.family.clone(),
                bold: style.bold,
            })?;
        Ok(font.metrics(text, style.size))
    }
}

/// Lines of text in a single style, sized into a packable rectangle
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub id: Option<String>,
    pub lines: Vec<String>,
    pub style: TextStyle,
    /// Space added on every side of the text
    pub padding: Pt,
}

impl TextBlock {
    /// Split `text` into lines. Tabs are expanded to four spaces.
    pub fn new(text: &str, style: TextStyle) -> TextBlock {
        const TABSIZE: usize = 4;
        let lines = text
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .split('\n')
            .map(|line| line.replace('\t', &" ".repeat(TABSIZE)))
            .collect();
        TextBlock {
            id: None,
            lines,
            style,
            padding: Pt::ZERO,
        }
    }

    pub fn with_id<S: ToString>(mut self, id: S) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_padding(mut self, padding: Pt) -> Self {
        self.padding = padding;
        self
    }

    /// A rectangle as wide as the widest line and as tall as all lines together, plus
    /// padding, rounded up to whole points
    pub fn to_rect<M: Measure + ?Sized>(&self, measure: &M) -> Result<Rect, ArrangeError> {
        let mut width = Pt::ZERO;
        let mut height = Pt::ZERO;
        for line in self.lines.iter() {
            let metrics = measure.measure(line, &self.style)?;
            width = width.max(metrics.advance_width);
            height += metrics.line_height;
        }

        let padding = self.padding + self.padding;
        let mut rect = Rect::sized((width + padding).ceil(), (height + padding).ceil());
        rect.id = self.id.clone();
        Ok(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is half an em wide; lines are 1.25 em apart
    struct FixedPitch;

    impl Measure for FixedPitch {
        fn measure(&self, text: &str, style: &TextStyle) -> Result<TextMetrics, ArrangeError> {
            if style.family != "fixed" {
                return Err(ArrangeError::UnknownFont {
                    family: style.family.clone(),
                    bold: style.bold,
                });
            }
            let ascent = style.size * 0.75_f64;
            let descent = style.size * -0.25_f64;
            Ok(TextMetrics {
                advance_width: style.size * (0.5 * text.chars().count() as f64),
                height: ascent - descent,
                ascent,
                descent,
                line_height: style.size * 1.25_f64,
            })
        }
    }

    #[test]
    fn block_is_sized_by_widest_line() {
        let block = TextBlock::new("ab\nabcd\na", TextStyle::new("fixed", Pt(10.0)))
            .with_id("codelet");
        let rect = block.to_rect(&FixedPitch).expect("font is known");
        assert_eq!(rect.id.as_deref(), Some("codelet"));
        assert_eq!(rect.width, Pt(20.0));
        // three lines of 12.5, rounded up
        assert_eq!(rect.height, Pt(38.0));
    }

    #[test]
    fn padding_goes_on_every_side() {
        let block = TextBlock::new("abc", TextStyle::new("fixed", Pt(10.0))).with_padding(Pt(2.0));
        let rect = block.to_rect(&FixedPitch).expect("font is known");
        // 15 + 4 wide, 12.5 + 4 tall
        assert_eq!(rect.width, Pt(19.0));
        assert_eq!(rect.height, Pt(17.0));
    }

    #[test]
    fn tabs_and_line_endings_are_normalised() {
        let block = TextBlock::new("a\r\n\tb\rc", TextStyle::default());
        assert_eq!(block.lines, vec!["a", "    b", "c"]);
    }

    #[test]
    fn unknown_fonts_are_reported() {
        let block = TextBlock::new("x", TextStyle::new("serif", Pt(10.0)).bold());
        assert!(matches!(
            block.to_rect(&FixedPitch),
            Err(ArrangeError::UnknownFont { bold: true, .. })
        ));

        let book = FontBook::new();
        assert!(book.is_empty());
        assert!(matches!(
            book.measure("x", &TextStyle::default()),
            Err(ArrangeError::UnknownFont { .. })
        ));
    }

    #[test]
    fn garbage_is_not_a_font() {
        assert!(matches!(
            Font::load(vec![0, 1, 2, 3]),
            Err(ArrangeError::FaceParsingError(_))
        ));
    }
}
