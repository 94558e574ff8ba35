//! The editor page: snippets in tabbed text areas, library version
//! selection, and the live preview.

use anyhow::{Result, anyhow};
use encoding_rs::Encoding;
use minihtml::{Element, Node, att, opt_att, nodes, div, form, select, join,
               to_html_document,
               HTML, HEAD, BODY, META, LINK, STYLE, SCRIPT, TITLE, H1, A, NAV, UL, LI,
               PRE, SPAN, LABEL, BUTTON, TEXTAREA};

use crate::assets::{LAYOUT_CSS, TRYME_JS, CONSOLE_CSS_PATH, CONSOLE_JS_PATH,
                    CONSOLE_PANEL_ID};
use crate::library::{LibraryEntry, LibraryRegistry, FIELD_PREFIX};
use crate::snippets::{SnippetKind, SnippetSet};
use crate::store::ProjectStore;

const TITLE_TEXT: &str = "Try Me";
const HEADING_TEXT: &str = "TryMe Code Preview Machine";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Any WHATWG encoding label. Goes into the meta element and
    /// selects the encoding of the document bytes.
    pub charset: String,
    pub textarea_rows: u32,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        DocumentOptions {
            charset: "utf-8".into(),
            textarea_rows: 20,
        }
    }
}

impl DocumentOptions {
    /// The encoding the document bytes are written in. Labels for
    /// decode-only encodings (UTF-16, replacement) give UTF-8.
    pub fn encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.charset.trim().as_bytes())
            .map(Encoding::output_encoding)
            .ok_or_else(|| anyhow!("unknown charset {:?}", self.charset))
    }

    pub fn check(&self) -> Result<()> {
        self.encoding().map(|_| ())
    }
}


fn head(registry: &LibraryRegistry, options: &DocumentOptions) -> Element {
    let mut children = nodes![
        META.el([att("charset", &options.charset)]),
        META.el([att("name", "viewport"),
                 att("content", "width=device-width, initial-scale=1, shrink-to-fit=no")]),
        TITLE.el([]).with_children(nodes![TITLE_TEXT]),
    ];
    children.extend(registry.enabled_css_urls().map(
        |url| Node::from(LINK.el([att("rel", "stylesheet"), att("href", url)]))));
    children.push(LINK.el([att("rel", "stylesheet"), att("href", CONSOLE_CSS_PATH)]).into());
    children.push(STYLE.el([att("type", "text/css")]).with_children(nodes![LAYOUT_CSS]).into());
    HEAD.el([]).with_children(children)
}

/// Tab ids are `<id>-tab`, their panes `<id>-wrapper`.
fn tab_link(id: &str, label: &str, active: bool) -> Node {
    A.el([att("class", if active { "nav-item nav-link active" } else { "nav-item nav-link" }),
          att("id", format!("{id}-tab")),
          att("data-toggle", "tab"),
          att("href", format!("#{id}-wrapper")),
          att("role", "tab"),
          att("aria-controls", format!("{id}-wrapper")),
          att("aria-selected", if active { "true" } else { "false" })])
        .with_children(nodes![label])
        .into()
}

fn tab_pane(id: &str, active: bool, children: Vec<Node>) -> Node {
    div(Some(if active { "form-group tab-pane fade show active" }
             else { "form-group tab-pane fade" }),
        [att("id", format!("{id}-wrapper")),
         att("role", "tabpanel"),
         att("aria-labelledby", format!("{id}-tab"))])
        .with_children(children)
        .into()
}

fn tab_label(kind: SnippetKind) -> &'static str {
    match kind {
        SnippetKind::Html => "HTML",
        SnippetKind::Css => "CSS",
        SnippetKind::Javascript => "Javascript",
    }
}

fn snippet_textarea(kind: SnippetKind, text: &str, options: &DocumentOptions) -> Node {
    TEXTAREA.el([att("id", format!("{}-input", kind.extension())),
                 att("name", kind.field_name()),
                 att("class", "form-control code-input"),
                 att("oninput", "updateTryMe();"),
                 att("rows", options.textarea_rows)])
        .with_children(nodes![text])
        .into()
}

fn library_item(entry: &LibraryEntry) -> Node {
    let mut choices: Vec<(&str, &str)> = vec![("", "disabled")];
    choices.extend(entry.versions().iter().map(|v| (v.as_str(), v.as_str())));
    if let Some(current) = entry.current_version() {
        if !entry.versions().iter().any(|v| v == current) {
            choices.push((current, current));
        }
    }
    let select_id = format!("library-{}", entry.name());
    let templates: Vec<&str> = entry.css_templates().chain(entry.js_templates()).collect();
    let mut children = nodes![
        LABEL.el([att("for", &select_id)]).with_children(nodes![entry.name()]),
        select([att("id", &select_id),
                att("name", format!("{FIELD_PREFIX}{}", entry.name())),
                att("class", "form-control form-control-sm"),
                att("data-library", entry.name()),
                opt_att("data-css", entry.css_setting()),
                opt_att("data-js", entry.js_setting())],
               choices,
               entry.current_version().unwrap_or("")),
    ];
    if !templates.is_empty() {
        children.push(PRE.el([att("class", "library-templates")])
                      .with_children(nodes![templates.join("\n")]).into());
    }
    LI.el([att("class", "form-check")]).with_children(children).into()
}

fn editor_form(snippets: &SnippetSet, registry: &LibraryRegistry, options: &DocumentOptions)
               -> Element {
    let mut links: Vec<Node> = SnippetKind::ALL.iter().enumerate().map(
        |(i, kind)| tab_link(kind.field_name(), tab_label(*kind), i == 0)).collect();
    links.push(tab_link("libraries", "Libraries", false));

    let mut panes: Vec<Node> = SnippetKind::ALL.iter().enumerate().map(
        |(i, kind)| tab_pane(kind.field_name(), i == 0,
                             vec![snippet_textarea(*kind, snippets.get(*kind), options)]))
        .collect();
    panes.push(tab_pane("libraries", false, nodes![
        UL.el([att("class", "list-unstyled")]).with_children(
            registry.entries().iter().map(library_item))
    ]));

    form([att("id", "tryme-form")]).with_children(nodes![
        NAV.el([att("class", "nav nav-tabs"), att("id", "nav-tabs"), att("role", "tablist")])
            .with_children(links),
        div(Some("tab-content"), [att("id", "tabs")]).with_children(panes),
        BUTTON.el([att("type", "submit"), att("id", "save-button"),
                   att("class", "btn btn-primary")])
            .with_children(nodes!["Save"]),
        SPAN.el([att("id", "save-status")]),
    ])
}

fn body(snippets: &SnippetSet, registry: &LibraryRegistry, options: &DocumentOptions)
        -> Element {
    let layout = div(Some("container-fluid"), []).with_children(nodes![
        div(Some("row"), []).with_children(nodes![
            div(Some("col-12"), []).with_children(nodes![
                H1.el([]).with_children(nodes![HEADING_TEXT])
            ]),
            div(Some("col-md-6"), []).with_children(nodes![
                editor_form(snippets, registry, options)
            ]),
            div(Some("col-md-6"), []).with_children(nodes![
                LABEL.el([att("for", "preview")]).with_children(nodes!["Result"]),
                div(None, [att("id", "preview")]),
                div(None, [att("id", CONSOLE_PANEL_ID)]),
            ]),
        ])
    ]);
    let mut scripts: Vec<Element> = registry.enabled_js_urls().map(
        |url| SCRIPT.el([att("src", url)])).collect();
    scripts.push(SCRIPT.el([att("src", CONSOLE_JS_PATH)]));
    scripts.push(SCRIPT.el([]).with_children(nodes![TRYME_JS]));
    // Text is not escaped, so the serialized scripts can go in as is.
    BODY.el([]).with_children(nodes![layout, join(&scripts)])
}

/// The full page, UTF-8 encoded.
pub fn render_document(
    snippets: &SnippetSet,
    registry: &LibraryRegistry,
    options: &DocumentOptions,
) -> String {
    let html = HTML.el([]).with_children(nodes![
        head(registry, options),
        body(snippets, registry, options),
    ]);
    to_html_document(&html)
}

/// The page encoded in `options.charset`. Characters the encoding
/// can't represent become numeric character references.
pub fn assemble_document(
    snippets: &SnippetSet,
    registry: &LibraryRegistry,
    options: &DocumentOptions,
) -> Result<Vec<u8>> {
    let encoding = options.encoding()?;
    let document = render_document(snippets, registry, options);
    let (bytes, _, _) = encoding.encode(&document);
    Ok(bytes.into_owned())
}

/// Load the project's current state and assemble the page for it.
/// Seeds the library configuration if there is none.
pub fn make_document(
    store: &dyn ProjectStore,
    project: &str,
    options: &DocumentOptions,
) -> Result<Vec<u8>> {
    let snippets = SnippetSet::load(store, project)?;
    let registry = LibraryRegistry::load(store, project)?;
    assemble_document(&snippets, &registry, options)
}
