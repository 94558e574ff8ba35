//! Html element trees made of owned values.
//!
//! Nothing is ever HTML-escaped: text children and attribute values
//! are written out exactly as given. That's what lets a user's raw
//! markup pass through into a page (and e.g. `&lt;` stay `&lt;`
//! inside a textarea). Callers who need escaping have to do it
//! themselves before handing over the strings.

pub mod meta;
pub mod elements;

use kstring::KString;

pub use meta::{ElementMeta, create, is_void_tag};
pub use elements::*;

pub const DOCTYPE: &str = "<!DOCTYPE html>\n";


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttValue {
    /// Printed as `name="value"`, verbatim.
    Text(KString),
    /// `true` prints the bare attribute name, `false` omits it.
    Flag(bool),
    /// Omitted.
    Absent,
}

impl AttValue {
    pub fn is_printed(&self) -> bool {
        match self {
            AttValue::Text(_) => true,
            AttValue::Flag(b) => *b,
            AttValue::Absent => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttValue::Text(s) => Some(s.as_str()),
            _ => None
        }
    }
}

impl From<&str> for AttValue {
    fn from(s: &str) -> Self {
        AttValue::Text(KString::from_ref(s))
    }
}
impl From<String> for AttValue {
    fn from(s: String) -> Self {
        AttValue::Text(KString::from_string(s))
    }
}
impl From<&String> for AttValue {
    fn from(s: &String) -> Self {
        AttValue::Text(KString::from_ref(s))
    }
}
impl From<KString> for AttValue {
    fn from(s: KString) -> Self {
        AttValue::Text(s)
    }
}
impl From<bool> for AttValue {
    fn from(b: bool) -> Self {
        AttValue::Flag(b)
    }
}
impl From<u32> for AttValue {
    fn from(n: u32) -> Self {
        AttValue::Text(KString::from_string(n.to_string()))
    }
}

pub type Att = (KString, AttValue);

pub fn att(key: &str, val: impl Into<AttValue>) -> Att {
    (KString::from_ref(key), val.into())
}

/// An attribute that is only printed if `val` is present.
pub fn opt_att<V: Into<AttValue>>(key: &str, val: Option<V>) -> Att {
    (KString::from_ref(key),
     match val {
         Some(v) => v.into(),
         None => AttValue::Absent
     })
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Inserted verbatim.
    Text(KString),
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}
impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(KString::from_ref(s))
    }
}
impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(KString::from_string(s))
    }
}
impl From<&String> for Node {
    fn from(s: &String) -> Self {
        Node::Text(KString::from_ref(s))
    }
}
impl From<KString> for Node {
    fn from(s: KString) -> Self {
        Node::Text(s)
    }
}

/// Build a `Vec<Node>` from elements and strings mixed.
#[macro_export]
macro_rules! nodes {
    ($($e:expr),* $(,)?) => {
        vec![$($crate::Node::from($e)),*]
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    meta: ElementMeta,
    // Insertion order is printing order.
    atts: Vec<Att>,
    children: Vec<Node>,
}

impl ElementMeta {
    /// A new element of this tag with the given attributes and no
    /// children.
    pub fn el(&self, atts: impl IntoIterator<Item = Att>) -> Element {
        let mut e = Element {
            meta: *self,
            atts: Vec::new(),
            children: Vec::new(),
        };
        for (key, val) in atts {
            e.set_att(&key, val);
        }
        e
    }
}

impl Element {
    pub fn tag_name(&self) -> &'static str { self.meta.tag_name }

    /// Replaces the children (any previous ones are dropped).
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    pub fn att(&self, key: &str) -> Option<&AttValue> {
        self.atts.iter().find(|(k, _)| k.as_str() == key).map(|(_, v)| v)
    }

    /// Overwrites an existing attribute in its place, or appends it.
    pub fn set_att(&mut self, key: &str, val: impl Into<AttValue>) {
        let val = val.into();
        if let Some(slot) = self.atts.iter_mut().find(|(k, _)| k.as_str() == key) {
            slot.1 = val;
        } else {
            self.atts.push((KString::from_ref(key), val));
        }
    }

    /// Sets the attribute only if the key isn't there yet (even an
    /// `Absent` value counts as being there).
    pub fn set_default_att(&mut self, key: &str, val: impl Into<AttValue>) {
        if self.att(key).is_none() {
            self.atts.push((KString::from_ref(key), val.into()));
        }
    }

    fn class_list(&self) -> Vec<&str> {
        match self.att("class") {
            Some(AttValue::Text(s)) => s.split_whitespace().collect(),
            _ => Vec::new()
        }
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.class_list().iter().any(|c| *c == name)
    }

    pub fn add_class(&mut self, name: &str) {
        let mut classes = self.class_list();
        if !classes.contains(&name) {
            classes.push(name);
        }
        let joined = classes.join(" ");
        self.set_att("class", joined);
    }

    /// Leaves a missing class attribute missing, otherwise rewrites
    /// it with single spaces between the remaining names.
    pub fn remove_class(&mut self, name: &str) {
        if self.att("class").is_none() {
            return
        }
        let joined = self.class_list().into_iter()
            .filter(|c| *c != name)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_att("class", joined);
    }
}


pub trait Print {
    /// Append serialized HTML.
    fn print_html(&self, out: &mut String);

    fn to_html_string(&self) -> String {
        let mut s = String::new();
        self.print_html(&mut s);
        s
    }
}

impl Print for Att {
    fn print_html(&self, out: &mut String) {
        let (key, val) = self;
        if !val.is_printed() {
            return
        }
        match val {
            AttValue::Text(s) => {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(s); // no escaping, see module docs
                out.push('"');
            }
            // Flag(true)
            AttValue::Flag(_) | AttValue::Absent => {
                out.push(' ');
                out.push_str(key);
            }
        }
    }
}

impl Print for Node {
    fn print_html(&self, out: &mut String) {
        match self {
            Node::Element(e) => e.print_html(out),
            Node::Text(s) => out.push_str(s),
        }
    }
}

impl Print for Element {
    fn print_html(&self, out: &mut String) {
        let tag = self.meta.tag_name;
        out.push('<');
        out.push_str(tag);
        for att in &self.atts {
            att.print_html(out);
        }
        if self.meta.is_void {
            out.push_str(" />");
        } else {
            out.push('>');
            for child in &self.children {
                child.print_html(out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

impl<T: Print> Print for [T] {
    fn print_html(&self, out: &mut String) {
        for item in self {
            item.print_html(out);
        }
    }
}

/// Serialize each item and concatenate the results.
pub fn join<'t, T: Print + 't>(items: impl IntoIterator<Item = &'t T>) -> String {
    let mut s = String::new();
    for item in items {
        item.print_html(&mut s);
    }
    s
}

/// Doctype line followed by the serialized root.
pub fn to_html_document(root: &Element) -> String {
    let mut s = String::from(DOCTYPE);
    root.print_html(&mut s);
    s
}
