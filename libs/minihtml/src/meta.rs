//! Per-tag information needed for serialization.

use std::collections::HashSet;

use lazy_static::lazy_static;

// https://developer.mozilla.org/en-US/docs/Glossary/Void_element
// Void elements can't have any child nodes and are written without
// an end tag.
const VOID_ELEMENT_NAMES: &[&str] = &[
    "area",
    "base",
    "br",
    "col",
    "embed",
    "hr",
    "img",
    "input",
    "link",
    "meta",
    "param", // Deprecated
    "source",
    "track",
    "wbr",
];

lazy_static!{
    static ref VOID_ELEMENTS: HashSet<&'static str> =
        VOID_ELEMENT_NAMES.iter().cloned().collect();
}

/// Whether the HTML standard lists `tag_name` as a void element.
pub fn is_void_tag(tag_name: &str) -> bool {
    VOID_ELEMENTS.contains(tag_name)
}

/// What a tag is called and whether it is printed without body and
/// closing tag. Doubles as the factory for elements of that tag,
/// see `el`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementMeta {
    pub tag_name: &'static str,
    pub is_void: bool,
}

/// Make a reusable element factory for the given tag.
pub const fn create(tag_name: &'static str, is_void: bool) -> ElementMeta {
    ElementMeta { tag_name, is_void }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_is_void_tag() {
        assert!(is_void_tag("meta"));
        assert!(is_void_tag("input"));
        assert!(!is_void_tag("div"));
        assert!(!is_void_tag("textarea"));
        // case matters, we only ever write lower case tags
        assert!(!is_void_tag("META"));
    }
}
