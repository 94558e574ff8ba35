//! The element catalog, plus the few constructors that do more than
//! set attributes.

use crate::{Att, AttValue, Element, Node, att, meta::{ElementMeta, create}};

pub const HTML: ElementMeta = create("html", false);
pub const HEAD: ElementMeta = create("head", false);
pub const BODY: ElementMeta = create("body", false);
pub const META: ElementMeta = create("meta", true);
pub const LINK: ElementMeta = create("link", true);
pub const STYLE: ElementMeta = create("style", false);
pub const SCRIPT: ElementMeta = create("script", false);
pub const TITLE: ElementMeta = create("title", false);

pub const DIV: ElementMeta = create("div", false);
pub const SPAN: ElementMeta = create("span", false);
pub const H1: ElementMeta = create("h1", false);
pub const P: ElementMeta = create("p", false);
pub const PRE: ElementMeta = create("pre", false);
pub const A: ElementMeta = create("a", false);
pub const NAV: ElementMeta = create("nav", false);
pub const UL: ElementMeta = create("ul", false);
pub const LI: ElementMeta = create("li", false);

pub const FORM: ElementMeta = create("form", false);
pub const LABEL: ElementMeta = create("label", false);
pub const INPUT: ElementMeta = create("input", true);
pub const BUTTON: ElementMeta = create("button", false);
pub const TEXTAREA: ElementMeta = create("textarea", false);
pub const SELECT: ElementMeta = create("select", false);
pub const OPTION: ElementMeta = create("option", false);

/// All of the above, e.g. for checking them against the standard.
pub const CATALOG: &[ElementMeta] = &[
    HTML, HEAD, BODY, META, LINK, STYLE, SCRIPT, TITLE,
    DIV, SPAN, H1, P, PRE, A, NAV, UL, LI,
    FORM, LABEL, INPUT, BUTTON, TEXTAREA, SELECT, OPTION,
];


/// A `div` whose `class` attribute is `class_names`, regardless of
/// what `atts` says; `None` leaves it out. The class comes first.
pub fn div(class_names: Option<&str>, atts: impl IntoIterator<Item = Att>) -> Element {
    let class = match class_names {
        Some(s) => AttValue::from(s),
        None => AttValue::Absent
    };
    DIV.el(std::iter::once(att("class", class))
           .chain(atts.into_iter().filter(|(k, _)| k.as_str() != "class")))
}

/// A `form` posting multipart data to the current location, unless
/// `atts` says otherwise.
pub fn form(atts: impl IntoIterator<Item = Att>) -> Element {
    let mut e = FORM.el(atts);
    e.set_default_att("method", "post");
    e.set_default_att("action", "#");
    e.set_default_att("enctype", "multipart/form-data");
    e
}

/// A `select` with one `option` per `(value, display text)` pair; the
/// option(s) whose value equals `selected` are marked as such.
pub fn select<'o>(
    atts: impl IntoIterator<Item = Att>,
    options: impl IntoIterator<Item = (&'o str, &'o str)>,
    selected: &str,
) -> Element {
    SELECT.el(atts).with_children(
        options.into_iter().map(|(value, text)| -> Node {
            OPTION.el([att("value", value),
                       att("selected", value == selected)])
                .with_children([Node::from(text)])
                .into()
        }))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Print, is_void_tag, nodes};

    #[test]
    fn t_catalog_matches_standard() {
        for meta in CATALOG {
            assert_eq!(meta.is_void, is_void_tag(meta.tag_name), "{meta:?}");
        }
    }

    #[test]
    fn t_div_forces_class() {
        assert_eq!(div(Some("row"), [att("class", "ignored"), att("id", "r")])
                   .to_html_string(),
                   "<div class=\"row\" id=\"r\"></div>");
        assert_eq!(div(Some("tab-pane"), [att("id", "p"), att("role", "tabpanel")])
                   .to_html_string(),
                   "<div class=\"tab-pane\" id=\"p\" role=\"tabpanel\"></div>");
        assert_eq!(div(None, [att("id", "preview")]).to_html_string(),
                   "<div id=\"preview\"></div>");
        assert_eq!(div(Some("col-12"), []).with_children(nodes!["x"]).to_html_string(),
                   "<div class=\"col-12\">x</div>");
    }

    #[test]
    fn t_form_defaults() {
        assert_eq!(form([]).to_html_string(),
                   "<form method=\"post\" action=\"#\" \
                    enctype=\"multipart/form-data\"></form>");
        assert_eq!(form([att("action", "/save"), att("id", "f")]).to_html_string(),
                   "<form action=\"/save\" id=\"f\" method=\"post\" \
                    enctype=\"multipart/form-data\"></form>");
    }

    #[test]
    fn t_select() {
        let s = select([att("name", "library:JQuery")],
                       [("", "disabled"), ("3.2.1", "3.2.1"), ("3.3.1", "3.3.1")],
                       "3.3.1");
        assert_eq!(s.to_html_string(),
                   "<select name=\"library:JQuery\">\
                    <option value=\"\">disabled</option>\
                    <option value=\"3.2.1\">3.2.1</option>\
                    <option value=\"3.3.1\" selected>3.3.1</option>\
                    </select>");
    }

    #[test]
    fn t_select_nothing_selected() {
        let s = select([], [("a", "A")], "b");
        assert_eq!(s.to_html_string(),
                   "<select><option value=\"a\">A</option></select>");
    }
}
