use crate::colour::{colours, Colour};
use crate::error::ArrangeError;
use crate::rect::{bounding_size, Rect};
use crate::refs::{ObjectReferences, RefType};
use crate::units::Pt;
use pdf_writer::{Date as PDate, Finish, Pdf, TextStr};
use std::io::Write;

/// How to draw a layout into a PDF
#[derive(Debug, Clone)]
pub struct PdfOptions {
    /// Blank space around the layout on every side
    pub margin: Pt,
    pub title: Option<String>,
    pub author: Option<String>,
    /// Outline colour for every box. `None` draws fills only.
    pub stroke: Option<Colour>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        PdfOptions {
            margin: Pt(36.0),
            title: None,
            author: None,
            stroke: Some(colours::BLACK),
        }
    }
}

impl PdfOptions {
    pub fn with_title<S: ToString>(mut self, title: S) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_author<S: ToString>(mut self, author: S) -> Self {
        self.author = Some(author.to_string());
        self
    }

    fn write_info(&self, refs: &mut ObjectReferences, writer: &mut Pdf) {
        let mut info = writer.document_info(refs.id(RefType::Info));
        if let Some(title) = &self.title {
            info.title(TextStr(title.as_str()));
        }
        if let Some(author) = &self.author {
            info.author(TextStr(author.as_str()));
        }
        info.creator(TextStr(concat!(
            env!("CARGO_PKG_NAME"),
            " v",
            env!("CARGO_PKG_VERSION")
        )));
        info.creation_date(pdf_date(&chrono::Local::now()));
    }
}

/// A timestamp as a PDF date, keeping its offset from UTC
fn pdf_date<Tz: chrono::TimeZone>(at: &chrono::DateTime<Tz>) -> PDate {
    use chrono::{Datelike, Offset, Timelike};
    let offset_minutes = at.offset().fix().local_minus_utc() / 60;
    PDate::new(at.year() as u16)
        .month(at.month() as u8)
        .day(at.day() as u8)
        .hour(at.hour() as u8)
        .minute(at.minute() as u8)
        .second(at.second() as u8)
        .utc_offset_hour((offset_minutes / 60) as i8)
        .utc_offset_minute((offset_minutes % 60).unsigned_abs() as u8)
}

#[allow(clippy::write_with_newline)]
fn write_fill(content: &mut Vec<u8>, colour: Colour) -> Result<(), std::io::Error> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} rg\n"),
        Colour::CMYK { c, m, y, k } => write!(content, "{c} {m} {y} {k} k\n"),
        Colour::Grey { g } => write!(content, "{g} g\n"),
    }
}

#[allow(clippy::write_with_newline)]
fn write_stroke(content: &mut Vec<u8>, colour: Colour) -> Result<(), std::io::Error> {
    match colour {
        Colour::RGB { r, g, b } => write!(content, "{r} {g} {b} RG\n"),
        Colour::CMYK { c, m, y, k } => write!(content, "{c} {m} {y} {k} K\n"),
        Colour::Grey { g } => write!(content, "{g} G\n"),
    }
}

/// Content stream drawing `rects` on a page `page_height` tall. Layout coordinates grow
/// downwards from the top-left; PDF coordinates grow upwards from the bottom-left.
#[allow(clippy::write_with_newline)]
fn render_rects(
    rects: &[Rect],
    options: &PdfOptions,
    page_height: Pt,
) -> Result<Vec<u8>, std::io::Error> {
    let mut content: Vec<u8> = Vec::default();
    if let Some(stroke) = options.stroke {
        write_stroke(&mut content, stroke)?;
        write!(&mut content, "1 w\n")?;
    }

    for rect in rects.iter() {
        let x = options.margin + rect.x;
        let y = page_height - options.margin - rect.bottom();
        write!(&mut content, "q\n")?;
        if let Some(fill) = rect.colour {
            write_fill(&mut content, fill)?;
        }
        write!(&mut content, "{x} {y} {} {} re\n", rect.width, rect.height)?;
        let op = match (rect.colour.is_some(), options.stroke.is_some()) {
            (true, true) => "B",
            (true, false) => "f",
            (false, true) => "S",
            (false, false) => "n",
        };
        write!(&mut content, "{op}\n")?;
        write!(&mut content, "Q\n")?;
    }
    Ok(content)
}

/// Draw `rects` onto a single PDF page sized to the layout plus the margin, and write
/// the document to `w`
pub fn write_pdf<W: Write>(rects: &[Rect], options: &PdfOptions, mut w: W) -> Result<(), ArrangeError> {
    let size = bounding_size(rects);
    let page_width = size.width + options.margin + options.margin;
    let page_height = size.height + options.margin + options.margin;

    let mut refs = ObjectReferences::new();
    let mut writer = Pdf::new();
    writer
        .catalog(refs.id(RefType::Catalog))
        .pages(refs.id(RefType::PageTree));
    options.write_info(&mut refs, &mut writer);

    let page_id = refs.id(RefType::Page);
    writer
        .pages(refs.id(RefType::PageTree))
        .count(1)
        .kids([page_id]);

    let mut page = writer.page(page_id);
    page.media_box(pdf_writer::Rect {
        x1: 0.0,
        y1: 0.0,
        x2: *page_width as f32,
        y2: *page_height as f32,
    });
    page.parent(refs.id(RefType::PageTree));
    page.contents(refs.id(RefType::Content));
    page.finish();

    let rendered = render_rects(rects, options, page_height)?;
    writer.stream(refs.id(RefType::Content), rendered.as_slice());

    tracing::debug!(
        "writing {} rects to a {page_width}x{page_height} page",
        rects.len()
    );
    w.write_all(writer.finish().as_slice()).map_err(Into::into)
}
