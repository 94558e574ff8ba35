//! External CSS/JS libraries a project can pull into its preview, each
//! in one selectable version.
//!
//! Persisted as one configuration section per library, all values
//! plain strings:
//!
//! * `versions`: whitespace separated list of versions offered
//!   (`current` if missing)
//! * `enabled`: the version in use; empty means disabled, missing
//!   means the first of `versions`
//! * `css`, `js`: whitespace separated URL templates, `{version}` is
//!   replaced with the version in use

use anyhow::{Result, Context, anyhow};
use indexmap::IndexMap;

use crate::store::{ConfigSections, ProjectStore};
use crate::warn;

pub const VERSION_PLACEHOLDER: &str = "{version}";
const DEFAULT_VERSION: &str = "current";

/// Form fields selecting a library version are named with this
/// prefix followed by the library name.
pub const FIELD_PREFIX: &str = "library:";

struct DefaultLibrary {
    name: &'static str,
    version: &'static str,
    css: Option<&'static str>,
    js: Option<&'static str>,
}

// Order matters: it's the order of inclusion into the page.
const DEFAULT_LIBRARIES: &[DefaultLibrary] = &[
    DefaultLibrary {
        name: "JQuery",
        version: "3.2.1",
        css: None,
        js: Some("https://code.jquery.com/jquery-{version}.min.js"),
    },
    DefaultLibrary {
        name: "Popper",
        version: "1.12.3",
        css: None,
        js: Some("https://cdnjs.cloudflare.com/ajax/libs/popper.js/{version}/umd/popper.min.js"),
    },
    DefaultLibrary {
        name: "Bootstrap-JS",
        version: "4.0.0-beta.2",
        css: None,
        js: Some("https://maxcdn.bootstrapcdn.com/bootstrap/{version}/js/bootstrap.min.js"),
    },
    DefaultLibrary {
        name: "Bootstrap-CSS",
        version: "4.0.0-beta.2",
        css: Some("https://maxcdn.bootstrapcdn.com/bootstrap/{version}/css/bootstrap.min.css"),
        js: None,
    },
];

/// The configuration written when a project doesn't have any yet.
pub fn default_sections() -> ConfigSections {
    DEFAULT_LIBRARIES.iter().map(|lib| {
        let mut section = IndexMap::new();
        section.insert("versions".to_string(), lib.version.to_string());
        if let Some(css) = lib.css {
            section.insert("css".to_string(), css.to_string());
        }
        if let Some(js) = lib.js {
            section.insert("js".to_string(), js.to_string());
        }
        (lib.name.to_string(), section)
    }).collect()
}

pub fn expand_template(template: &str, version: &str) -> String {
    template.replace(VERSION_PLACEHOLDER, version)
}

fn nonempty_trimmed(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    name: String,
    // never empty
    versions: Vec<String>,
    // None = disabled; does not need to be one of `versions`
    enabled: Option<String>,
    css: Option<String>,
    js: Option<String>,
    // Keys we don't know, written back unchanged.
    other: IndexMap<String, String>,
}

impl LibraryEntry {
    /// Fills in the defaults for missing `versions` and `enabled`.
    pub fn from_section(name: &str, section: &IndexMap<String, String>) -> Self {
        let mut versions: Vec<String> = section.get("versions")
            .map(|s| s.split_whitespace().map(String::from).collect())
            .unwrap_or_default();
        if versions.is_empty() {
            versions.push(DEFAULT_VERSION.into());
        }
        let enabled = match section.get("enabled") {
            None => Some(versions[0].clone()),
            Some(s) => nonempty_trimmed(Some(s.as_str())),
        };
        let other = section.iter()
            .filter(|(k, _)| !matches!(k.as_str(), "versions" | "enabled" | "css" | "js"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        LibraryEntry {
            name: name.into(),
            versions,
            enabled,
            css: nonempty_trimmed(section.get("css").map(String::as_str)),
            js: nonempty_trimmed(section.get("js").map(String::as_str)),
            other,
        }
    }

    pub fn to_section(&self) -> IndexMap<String, String> {
        let mut section = IndexMap::new();
        section.insert("versions".to_string(), self.versions.join(" "));
        section.insert("enabled".to_string(), self.enabled.clone().unwrap_or_default());
        if let Some(css) = &self.css {
            section.insert("css".to_string(), css.clone());
        }
        if let Some(js) = &self.js {
            section.insert("js".to_string(), js.clone());
        }
        for (k, v) in &self.other {
            section.insert(k.clone(), v.clone());
        }
        section
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn versions(&self) -> &[String] { &self.versions }

    /// None if the library is disabled.
    pub fn current_version(&self) -> Option<&str> {
        self.enabled.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.is_some()
    }

    /// An empty (or blank) version disables the library.
    pub fn set_enabled(&mut self, version: &str) {
        self.enabled = nonempty_trimmed(Some(version));
    }

    /// The version URLs are made for: the current one, or the first
    /// offered one if disabled.
    pub fn url_version(&self) -> &str {
        self.enabled.as_deref().unwrap_or(&self.versions[0])
    }

    pub fn css_templates(&self) -> impl Iterator<Item = &str> + '_ {
        self.css.iter().flat_map(|s| s.split_whitespace())
    }

    pub fn js_templates(&self) -> impl Iterator<Item = &str> + '_ {
        self.js.iter().flat_map(|s| s.split_whitespace())
    }

    /// Computed anew on every call.
    pub fn css_urls(&self) -> impl Iterator<Item = String> + '_ {
        let version = self.url_version();
        self.css_templates().map(move |t| expand_template(t, version))
    }

    /// Computed anew on every call.
    pub fn js_urls(&self) -> impl Iterator<Item = String> + '_ {
        let version = self.url_version();
        self.js_templates().map(move |t| expand_template(t, version))
    }

    /// The raw `css` setting, if any.
    pub fn css_setting(&self) -> Option<&str> { self.css.as_deref() }

    /// The raw `js` setting, if any.
    pub fn js_setting(&self) -> Option<&str> { self.js.as_deref() }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRegistry {
    entries: Vec<LibraryEntry>,
}

impl LibraryRegistry {
    /// Seeds and immediately stores the default libraries if the
    /// project has no library configuration at all.
    pub fn load(store: &dyn ProjectStore, project: &str) -> Result<Self> {
        let mut sections = store.read_config(project).with_context(
            || anyhow!("loading library configuration of project {project:?}"))?;
        if sections.is_empty() {
            sections = default_sections();
            store.write_config(project, &sections).with_context(
                || anyhow!("storing default library configuration of project {project:?}"))?;
        }
        Ok(Self::from_sections(&sections))
    }

    pub fn from_sections(sections: &ConfigSections) -> Self {
        LibraryRegistry {
            entries: sections.iter()
                .map(|(name, section)| LibraryEntry::from_section(name, section))
                .collect()
        }
    }

    pub fn to_sections(&self) -> ConfigSections {
        self.entries.iter()
            .map(|e| (e.name.clone(), e.to_section()))
            .collect()
    }

    pub fn save(&self, store: &dyn ProjectStore, project: &str) -> Result<()> {
        store.write_config(project, &self.to_sections()).with_context(
            || anyhow!("saving library configuration of project {project:?}"))
    }

    pub fn entries(&self) -> &[LibraryEntry] { &self.entries }

    pub fn get(&self, name: &str) -> Option<&LibraryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Take over the version selections among form `fields`; returns
    /// how many were applied. Selections for unknown libraries are
    /// ignored.
    pub fn apply_selections(&mut self, fields: &[(String, String)]) -> usize {
        let mut count = 0;
        for (field, value) in fields {
            if let Some(name) = field.strip_prefix(FIELD_PREFIX) {
                if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
                    entry.set_enabled(value);
                    count += 1;
                } else {
                    warn!("ignoring version selection for unknown library {name:?}");
                }
            }
        }
        count
    }

    /// CSS URLs of all enabled libraries, in registry then template
    /// order.
    pub fn enabled_css_urls(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().filter(|e| e.is_enabled()).flat_map(|e| e.css_urls())
    }

    /// JS URLs of all enabled libraries, in registry then template
    /// order.
    pub fn enabled_js_urls(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().filter(|e| e.is_enabled()).flat_map(|e| e.js_urls())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn section(kvs: &[(&str, &str)]) -> IndexMap<String, String> {
        kvs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn t_current_version_defaults_to_first() {
        let e = LibraryEntry::from_section("X", &section(&[("versions", "1.0 2.0")]));
        assert_eq!(e.versions(), &["1.0".to_string(), "2.0".to_string()]);
        assert_eq!(e.current_version(), Some("1.0"));
        // and that's what gets written back
        assert_eq!(e.to_section().get("enabled").map(String::as_str), Some("1.0"));
    }

    #[test]
    fn t_versions_default() {
        let e = LibraryEntry::from_section("X", &section(&[]));
        assert_eq!(e.versions(), &["current".to_string()]);
        assert_eq!(e.current_version(), Some("current"));
        let e = LibraryEntry::from_section("X", &section(&[("versions", "  ")]));
        assert_eq!(e.versions(), &["current".to_string()]);
    }

    #[test]
    fn t_disabled_and_custom() {
        let e = LibraryEntry::from_section(
            "X", &section(&[("versions", "1.0 2.0"), ("enabled", "")]));
        assert_eq!(e.current_version(), None);
        assert!(!e.is_enabled());
        assert_eq!(e.url_version(), "1.0");

        let e = LibraryEntry::from_section(
            "X", &section(&[("versions", "1.0 2.0"), ("enabled", "3.0-rc1")]));
        assert_eq!(e.current_version(), Some("3.0-rc1"));
    }

    #[test]
    fn t_css_urls() {
        let e = LibraryEntry::from_section(
            "X", &section(&[("versions", "1.0 2.0"), ("enabled", "2.0"),
                            ("css", "https://x/{version}/a.css")]));
        assert_eq!(e.css_urls().collect::<Vec<_>>(), vec!["https://x/2.0/a.css"]);
        // restartable
        assert_eq!(e.css_urls().count(), 1);
        assert_eq!(e.js_urls().count(), 0);
    }

    #[test]
    fn t_multiple_templates_follow_selection() {
        let mut e = LibraryEntry::from_section(
            "X", &section(&[("versions", "1 2"),
                            ("js", "https://x/{version}/a.js\n  https://y/b-{version}.js")]));
        assert_eq!(e.js_urls().collect::<Vec<_>>(),
                   vec!["https://x/1/a.js", "https://y/b-1.js"]);
        e.set_enabled("2");
        assert_eq!(e.js_urls().collect::<Vec<_>>(),
                   vec!["https://x/2/a.js", "https://y/b-2.js"]);
        e.set_enabled("");
        assert_eq!(e.js_urls().collect::<Vec<_>>(),
                   vec!["https://x/1/a.js", "https://y/b-1.js"]);
    }

    #[test]
    fn t_to_section_keeps_unknown_keys() {
        let s = section(&[("homepage", "https://jquery.com"), ("versions", "1"),
                          ("enabled", "")]);
        let e = LibraryEntry::from_section("X", &s);
        let back = e.to_section();
        assert_eq!(back.keys().collect::<Vec<_>>(),
                   vec!["versions", "enabled", "homepage"]);
        assert_eq!(back.get("enabled").map(String::as_str), Some(""));
    }

    #[test]
    fn t_load_seeds_defaults_once() -> Result<()> {
        let store = MemoryStore::default();
        let registry = LibraryRegistry::load(&store, "demo")?;
        assert_eq!(store.config_writes(), 1);
        let stored = store.read_config("demo")?;
        assert_eq!(stored.keys().collect::<Vec<_>>(),
                   vec!["JQuery", "Popper", "Bootstrap-JS", "Bootstrap-CSS"]);
        let versions: Vec<&str> = stored.values()
            .map(|s| s.get("versions").map(String::as_str).unwrap_or(""))
            .collect();
        assert_eq!(versions, vec!["3.2.1", "1.12.3", "4.0.0-beta.2", "4.0.0-beta.2"]);

        assert_eq!(registry.entries().len(), 4);
        let _ = LibraryRegistry::load(&store, "demo")?;
        assert_eq!(store.config_writes(), 1);
        Ok(())
    }

    #[test]
    fn t_enabled_urls_in_order() -> Result<()> {
        let store = MemoryStore::default();
        let mut registry = LibraryRegistry::load(&store, "demo")?;
        assert_eq!(registry.enabled_css_urls().collect::<Vec<_>>(),
                   vec!["https://maxcdn.bootstrapcdn.com/bootstrap/4.0.0-beta.2/css/bootstrap.min.css"]);
        assert_eq!(registry.enabled_js_urls().collect::<Vec<_>>(),
                   vec!["https://code.jquery.com/jquery-3.2.1.min.js",
                        "https://cdnjs.cloudflare.com/ajax/libs/popper.js/1.12.3/umd/popper.min.js",
                        "https://maxcdn.bootstrapcdn.com/bootstrap/4.0.0-beta.2/js/bootstrap.min.js"]);

        let fields = vec![("library:Popper".to_string(), "".to_string()),
                          ("library:JQuery".to_string(), "3.3.1".to_string()),
                          ("library:Nope".to_string(), "1".to_string()),
                          ("html".to_string(), "x".to_string())];
        assert_eq!(registry.apply_selections(&fields), 2);
        assert_eq!(registry.enabled_js_urls().collect::<Vec<_>>(),
                   vec!["https://code.jquery.com/jquery-3.3.1.min.js",
                        "https://maxcdn.bootstrapcdn.com/bootstrap/4.0.0-beta.2/js/bootstrap.min.js"]);

        registry.save(&store, "demo")?;
        let reloaded = LibraryRegistry::load(&store, "demo")?;
        assert_eq!(reloaded, registry);
        assert_eq!(reloaded.get("Popper").and_then(|e| e.current_version()), None);
        Ok(())
    }
}
