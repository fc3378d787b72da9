use crate::colour::colours;
use crate::error::ArrangeError;
use crate::markup::{Element, StyleBuilder};
use crate::rect::{bounding_size, Rect};
use std::path::Path;

/// Draw every rectangle as an SVG `<rect>`, filled with its colour (or unfilled) and
/// outlined in black. The document is sized to the bounding box of the rectangles.
pub fn rects_to_svg(rects: &[Rect]) -> Element {
    let size = bounding_size(rects);
    let mut svg = Element::new("svg")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("version", "1.1")
        .attr("width", size.width)
        .attr("height", size.height)
        .attr("viewBox", format!("0 0 {} {}", size.width, size.height));

    let group = svg.add_child(Element::new("g"));
    for rect in rects.iter() {
        let fill = rect
            .colour
            .map(|c| c.to_css())
            .unwrap_or_else(|| "none".to_string());
        let style = StyleBuilder::new()
            .set("fill", fill)
            .set("stroke", colours::BLACK.to_css())
            .set("stroke-width", "1px");

        let mut el = Element::new("rect");
        if let Some(id) = &rect.id {
            el.set_attr("id", id);
        }
        el.set_attr("x", rect.x)
            .set_attr("y", rect.y)
            .set_attr("width", rect.width)
            .set_attr("height", rect.height)
            .set_attr("style", style);
        group.add_child(el);
    }
    svg
}

/// Write [rects_to_svg] to `path`
pub fn write_svg<P: AsRef<Path>>(path: P, rects: &[Rect]) -> Result<(), ArrangeError> {
    let path = path.as_ref();
    std::fs::write(path, rects_to_svg(rects).to_string())?;
    tracing::debug!("wrote {} rects to {}", rects.len(), path.display());
    Ok(())
}
