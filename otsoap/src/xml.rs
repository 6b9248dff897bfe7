//! Small helpers over `xmltree` elements shared by the builders and parsers

use xmltree::{Element, XMLNode};

/// Builds `<name>text</name>`
pub fn text_element(name: &str, text: &str) -> Element {
    let mut elem = Element::new(name);
    elem.children.push(XMLNode::Text(text.to_string()));
    elem
}

/// Iterates over the direct child elements, skipping text and comments
pub fn child_elements(parent: &Element) -> impl Iterator<Item = &Element> {
    parent.children.iter().filter_map(|node| node.as_element())
}

/// First direct child whose local name is `name`, whatever its namespace
pub fn find_child<'a>(parent: &'a Element, name: &str) -> Option<&'a Element> {
    child_elements(parent).find(|elem| local_name(elem) == name)
}

/// First element with local name `name` among the descendants of `root`,
/// in document order. `root` itself is not considered.
pub fn find_descendant<'a>(root: &'a Element, name: &str) -> Option<&'a Element> {
    descendants(root).find(|elem| local_name(elem) == name)
}

/// Name of `elem` without its prefix
///
/// Parsed elements already carry a bare name; elements built in code may
/// carry a `prefix:name` string.
pub fn local_name(elem: &Element) -> &str {
    elem.name.rsplit(':').next().unwrap_or(&elem.name)
}

/// Prefix of `elem`, from `elem.prefix` or from a `prefix:name` string
fn prefix(elem: &Element) -> Option<&str> {
    elem.prefix
        .as_deref()
        .or_else(|| elem.name.split_once(':').map(|(prefix, _)| prefix))
}

/// Namespace URI of `elem`: the resolved namespace of a parsed element, or
/// the declaration matching its prefix (`xmlns:p`, or `xmlns` when
/// unprefixed) on a built one. Empty when there is none.
pub fn namespace_uri(elem: &Element) -> &str {
    if let Some(namespace) = elem.namespace.as_deref() {
        return namespace;
    }

    let attribute = match prefix(elem) {
        Some(prefix) => format!("xmlns:{prefix}"),
        None => "xmlns".to_string(),
    };
    elem.attributes
        .get(&attribute)
        .map(String::as_str)
        .or_else(|| {
            let namespaces = elem.namespaces.as_ref()?;
            namespaces.get(prefix(elem).unwrap_or(""))
        })
        .unwrap_or("")
}

/// Concatenated text content of an element and all its descendants
pub fn inner_text(elem: &Element) -> String {
    let mut out = String::new();
    collect_text(elem, &mut out);
    out
}

fn collect_text(elem: &Element, out: &mut String) {
    for node in &elem.children {
        match node {
            XMLNode::Text(text) | XMLNode::CData(text) => out.push_str(text),
            XMLNode::Element(child) => collect_text(child, out),
            _ => {}
        }
    }
}

/// Pre-order, depth-first walk over every element below `root`
pub fn descendants(root: &Element) -> Descendants<'_> {
    Descendants {
        stack: vec![root.children.iter()],
    }
}

/// Iterator returned by [`descendants`]
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, XMLNode>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        while let Some(iter) = self.stack.last_mut() {
            match iter.next() {
                Some(XMLNode::Element(elem)) => {
                    self.stack.push(elem.children.iter());
                    return Some(elem);
                }
                Some(_) => continue,
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descendants_are_visited_in_document_order() {
        let xml = r#"<a><b><c/><d/></b><e><f/></e></a>"#;
        let root = Element::parse(xml.as_bytes()).unwrap();

        let names: Vec<&str> = descendants(&root).map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "d", "e", "f"]);
    }

    #[test]
    fn inner_text_concatenates_nested_text() {
        let xml = r#"<a>one<b>two</b><c><![CDATA[three]]></c></a>"#;
        let root = Element::parse(xml.as_bytes()).unwrap();

        assert_eq!(inner_text(&root), "onetwothree");
    }

    #[test]
    fn names_of_built_and_parsed_elements() {
        let mut built = Element::new("ot:PartAdd");
        built
            .attributes
            .insert("xmlns".to_string(), "opentrack.dealertrack.com".to_string());
        assert_eq!(local_name(&built), "PartAdd");
        assert_eq!(namespace_uri(&built), "opentrack.dealertrack.com");

        let parsed = Element::parse(r#"<Lookup xmlns="urn:x"/>"#.as_bytes()).unwrap();
        assert_eq!(local_name(&parsed), "Lookup");
        assert_eq!(namespace_uri(&parsed), "urn:x");

        assert_eq!(namespace_uri(&Element::new("Bare")), "");
    }

    #[test]
    fn prefixed_built_element_resolves_its_declaration() {
        let mut built = Element::new("ot:Lookup");
        built
            .attributes
            .insert("xmlns:ot".to_string(), "urn:x".to_string());
        built
            .attributes
            .insert("xmlns".to_string(), "urn:default".to_string());

        assert_eq!(local_name(&built), "Lookup");
        assert_eq!(namespace_uri(&built), "urn:x");
    }

    #[test]
    fn lookups_match_local_names_of_built_elements() {
        let mut root = Element::new("Root");
        let mut status = Element::new("a:Status");
        status.children.push(XMLNode::Element(Element::new("b:Error")));
        root.children.push(XMLNode::Element(status));

        assert!(find_child(&root, "Status").is_some());
        assert_eq!(find_descendant(&root, "Error").unwrap().name, "b:Error");
    }

    #[test]
    fn find_child_ignores_namespace_prefix() {
        let xml = r#"<s:Envelope xmlns:s="urn:s"><s:Body/></s:Envelope>"#;
        let root = Element::parse(xml.as_bytes()).unwrap();

        assert!(find_child(&root, "Body").is_some());
        assert!(find_child(&root, "Header").is_none());
    }
}
