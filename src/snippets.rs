//! The three editable snippets of a project.

use anyhow::{Result, Context, anyhow};

use crate::store::ProjectStore;

// Note: the HTML default is already escaped since it goes into the
// textarea verbatim.
const DEFAULT_HTML: &str = "&lt;h1 class=\"text-success\"&gt;Success&lt;/h1&gt;";
const DEFAULT_CSS: &str = ".text-success {\n  color: green;\n}";
const DEFAULT_JS: &str = "$(\"h1\").click(function () {\n  alert(\"Clicked the header\");\n})";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetKind {
    Html,
    Css,
    Javascript,
}

impl SnippetKind {
    pub const ALL: [SnippetKind; 3] = [SnippetKind::Html, SnippetKind::Css, SnippetKind::Javascript];

    /// Of the stored resource.
    pub fn extension(self) -> &'static str {
        match self {
            SnippetKind::Html => "html",
            SnippetKind::Css => "css",
            SnippetKind::Javascript => "js",
        }
    }

    /// Name of the form field (and textarea) carrying it.
    pub fn field_name(self) -> &'static str {
        match self {
            SnippetKind::Html => "html",
            SnippetKind::Css => "css",
            SnippetKind::Javascript => "javascript",
        }
    }

    pub fn default_text(self) -> &'static str {
        match self {
            SnippetKind::Html => DEFAULT_HTML,
            SnippetKind::Css => DEFAULT_CSS,
            SnippetKind::Javascript => DEFAULT_JS,
        }
    }

    pub fn from_field_name(s: &str) -> Option<Self> {
        Self::ALL.iter().cloned().find(|k| k.field_name() == s)
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetSet {
    pub html: String,
    pub css: String,
    pub javascript: String,
}

impl Default for SnippetSet {
    fn default() -> Self {
        SnippetSet {
            html: DEFAULT_HTML.into(),
            css: DEFAULT_CSS.into(),
            javascript: DEFAULT_JS.into(),
        }
    }
}

impl SnippetSet {
    /// Missing resources are replaced by the defaults, each on its own.
    pub fn load(store: &dyn ProjectStore, project: &str) -> Result<Self> {
        let load = |kind: SnippetKind| -> Result<String> {
            Ok(store.read_text(project, kind.extension())
               .with_context(|| anyhow!("loading {:?} snippet of project {project:?}",
                                        kind))?
               .unwrap_or_else(|| kind.default_text().into()))
        };
        Ok(SnippetSet {
            html: load(SnippetKind::Html)?,
            css: load(SnippetKind::Css)?,
            javascript: load(SnippetKind::Javascript)?,
        })
    }

    pub fn get(&self, kind: SnippetKind) -> &str {
        match kind {
            SnippetKind::Html => &self.html,
            SnippetKind::Css => &self.css,
            SnippetKind::Javascript => &self.javascript,
        }
    }
}

/// Overwrite the stored snippet for each snippet field among
/// `fields`; other fields are ignored. Returns how many were written.
pub fn save_snippet_fields(
    store: &dyn ProjectStore,
    project: &str,
    fields: &[(String, String)],
) -> Result<usize> {
    let mut count = 0;
    for (name, value) in fields {
        if let Some(kind) = SnippetKind::from_field_name(name) {
            store.write_text(project, kind.extension(), value)
                .with_context(|| anyhow!("saving {kind:?} snippet of project {project:?}"))?;
            count += 1;
        }
    }
    Ok(count)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn t_load_defaults() -> Result<()> {
        let store = MemoryStore::default();
        let set = SnippetSet::load(&store, "demo")?;
        assert_eq!(set, SnippetSet::default());
        assert_eq!(set.html, "&lt;h1 class=\"text-success\"&gt;Success&lt;/h1&gt;");
        Ok(())
    }

    #[test]
    fn t_load_mixed() -> Result<()> {
        let store = MemoryStore::default();
        store.write_text("demo", "css", "p {}")?;
        store.write_text("other", "html", "<p>other</p>")?;
        let set = SnippetSet::load(&store, "demo")?;
        assert_eq!(set.css, "p {}");
        assert_eq!(set.html, DEFAULT_HTML);
        assert_eq!(set.get(SnippetKind::Javascript), DEFAULT_JS);
        Ok(())
    }

    #[test]
    fn t_save_fields() -> Result<()> {
        let store = MemoryStore::default();
        let fields = vec![
            ("html".to_string(), "<p>hi</p>".to_string()),
            ("library:JQuery".to_string(), "3.2.1".to_string()),
            ("javascript".to_string(), "".to_string()),
        ];
        assert_eq!(save_snippet_fields(&store, "demo", &fields)?, 2);
        assert_eq!(store.read_text("demo", "html")?.as_deref(), Some("<p>hi</p>"));
        // an empty field still overwrites
        assert_eq!(store.read_text("demo", "js")?.as_deref(), Some(""));
        assert_eq!(store.read_text("demo", "css")?, None);
        Ok(())
    }
}
