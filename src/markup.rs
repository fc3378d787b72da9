//! A tiny SVG / HTML element tree, just enough to serialise packed layouts

use std::fmt;

/// A markup element with ordered attributes, child elements and text content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    pub fn new<S: ToString>(name: S) -> Element {
        Element {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Set an attribute, replacing any previous value but keeping its position
    pub fn set_attr<N: ToString, V: ToString>(&mut self, name: N, value: V) -> &mut Self {
        let name = name.to_string();
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    /// Builder form of [Element::set_attr]
    pub fn attr<N: ToString, V: ToString>(mut self, name: N, value: V) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append a child, returning a handle to it for further building
    pub fn add_child(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn set_text<S: ToString>(&mut self, text: S) -> &mut Self {
        self.text = text.to_string();
        self
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

fn escape(s: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for ch in s.chars() {
        match ch {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' => f.write_str("&quot;")?,
            '\'' => f.write_str("&#39;")?,
            _ => write!(f, "{ch}")?,
        }
    }
    Ok(())
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in self.attributes.iter() {
            write!(f, " {name}=\"")?;
            escape(value, f)?;
            f.write_str("\"")?;
        }
        if self.children.is_empty() && self.text.is_empty() {
            return f.write_str("/>");
        }
        f.write_str(">")?;
        for child in self.children.iter() {
            writeln!(f)?;
            write!(f, "{child}")?;
        }
        if !self.children.is_empty() {
            writeln!(f)?;
        }
        escape(&self.text, f)?;
        write!(f, "</{}>", self.name)
    }
}

/// Builds `style` attribute values of the form `name:value;name:value`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleBuilder {
    styles: Vec<(String, String)>,
}

impl StyleBuilder {
    pub fn new() -> StyleBuilder {
        StyleBuilder::default()
    }

    pub fn set<N: ToString, V: ToString>(mut self, name: N, value: V) -> Self {
        let name = name.to_string();
        let value = value.to_string();
        match self.styles.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.styles.push((name, value)),
        }
        self
    }
}

impl fmt::Display for StyleBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.styles.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{name}:{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_elements_self_close() {
        let rect = Element::new("rect").attr("x", 0).attr("width", 10.5);
        assert_eq!(rect.to_string(), r#"<rect x="0" width="10.5"/>"#);
    }

    #[test]
    fn attributes_and_text_are_escaped() {
        let mut text = Element::new("text");
        text.set_attr("id", "a\"b<c>").set_text("x & y < z");
        assert_eq!(
            text.to_string(),
            r#"<text id="a&quot;b&lt;c&gt;">x &amp; y &lt; z</text>"#
        );
    }

    #[test]
    fn setting_an_attribute_twice_keeps_its_position() {
        let el = Element::new("g").attr("a", 1).attr("b", 2).attr("a", 3);
        assert_eq!(el.get_attr("a"), Some("3"));
        assert_eq!(el.to_string(), r#"<g a="3" b="2"/>"#);
    }

    #[test]
    fn children_nest_on_their_own_lines() {
        let mut svg = Element::new("svg");
        svg.add_child(Element::new("g")).add_child(Element::new("rect"));
        assert_eq!(svg.children().len(), 1);
        assert_eq!(svg.to_string(), "<svg>\n<g>\n<rect/>\n</g>\n</svg>");
    }

    #[test]
    fn styles_join_with_semicolons() {
        let style = StyleBuilder::new()
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", "1px");
        assert_eq!(style.to_string(), "fill:none;stroke:black;stroke-width:1px");
        assert_eq!(StyleBuilder::new().to_string(), "");
    }
}
