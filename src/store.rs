//! Persistence of a project's snippets and library configuration.

use std::{fs, io::{ErrorKind, Write}, path::{Path, PathBuf}};

use indexmap::IndexMap;
use thiserror::Error;

/// Library configuration: named sections of string keys and values,
/// both in file order.
pub type ConfigSections = IndexMap<String, IndexMap<String, String>>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed library configuration in {path:?}: {source}")]
    MalformedConfig {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("can't serialize library configuration for {path:?}: {source}")]
    SerializeConfig {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Where the text resources and the configuration of projects live,
/// keyed by project name.
pub trait ProjectStore: Send + Sync {
    /// `Ok(None)` if there's no such resource (yet).
    fn read_text(&self, project: &str, extension: &str)
                 -> Result<Option<String>, StoreError>;

    fn write_text(&self, project: &str, extension: &str, content: &str)
                  -> Result<(), StoreError>;

    /// Empty if nothing was stored yet.
    fn read_config(&self, project: &str) -> Result<ConfigSections, StoreError>;

    fn write_config(&self, project: &str, sections: &ConfigSections)
                    -> Result<(), StoreError>;
}


/// Files `<project>.<extension>` and `<project>.toml` in one
/// directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    basedir: PathBuf,
}

impl DirStore {
    pub fn new(basedir: impl Into<PathBuf>) -> DirStore {
        DirStore {
            basedir: basedir.into()
        }
    }

    pub fn text_path(&self, project: &str, extension: &str) -> PathBuf {
        self.basedir.join(format!("{project}.{extension}"))
    }

    pub fn config_path(&self, project: &str) -> PathBuf {
        self.basedir.join(format!("{project}.toml"))
    }
}

fn read_optional(path: PathBuf) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(&path) {
        Ok(s) => Ok(Some(s)),
        Err(e) => match e.kind() {
            ErrorKind::NotFound => Ok(None),
            _ => Err(StoreError::Io { path, source: e })
        }
    }
}

/// Readers see either the old or the new content, never a partially
/// written file.
fn write(path: PathBuf, content: &str) -> Result<(), StoreError> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let written = tempfile::NamedTempFile::new_in(dir).and_then(|mut tmp| {
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        Ok(tmp)
    });
    match written {
        Ok(tmp) => tmp.persist(&path).map(|_| ()).map_err(
            |e| StoreError::Io { path, source: e.error }),
        Err(source) => Err(StoreError::Io { path, source })
    }
}

impl ProjectStore for DirStore {
    fn read_text(&self, project: &str, extension: &str)
                 -> Result<Option<String>, StoreError> {
        read_optional(self.text_path(project, extension))
    }

    fn write_text(&self, project: &str, extension: &str, content: &str)
                  -> Result<(), StoreError> {
        write(self.text_path(project, extension), content)
    }

    fn read_config(&self, project: &str) -> Result<ConfigSections, StoreError> {
        let path = self.config_path(project);
        match read_optional(path.clone())? {
            None => Ok(ConfigSections::new()),
            Some(s) => toml::from_str(&s).map_err(
                |source| StoreError::MalformedConfig { path, source })
        }
    }

    fn write_config(&self, project: &str, sections: &ConfigSections)
                    -> Result<(), StoreError> {
        let path = self.config_path(project);
        let s = toml::to_string(sections).map_err(
            |source| StoreError::SerializeConfig { path: path.clone(), source })?;
        write(path, &s)
    }
}


#[cfg(test)]
pub mod memory {
    //! A store keeping everything in memory, counting config writes.

    use std::{collections::HashMap, sync::Mutex};

    use super::*;

    #[derive(Debug, Default)]
    pub struct MemoryStore {
        texts: Mutex<HashMap<(String, String), String>>,
        configs: Mutex<HashMap<String, ConfigSections>>,
        config_writes: Mutex<usize>,
    }

    impl MemoryStore {
        pub fn config_writes(&self) -> usize {
            *self.config_writes.lock().expect("not poisoned")
        }
    }

    impl ProjectStore for MemoryStore {
        fn read_text(&self, project: &str, extension: &str)
                     -> Result<Option<String>, StoreError> {
            Ok(self.texts.lock().expect("not poisoned")
               .get(&(project.into(), extension.into())).cloned())
        }

        fn write_text(&self, project: &str, extension: &str, content: &str)
                      -> Result<(), StoreError> {
            self.texts.lock().expect("not poisoned")
                .insert((project.into(), extension.into()), content.into());
            Ok(())
        }

        fn read_config(&self, project: &str) -> Result<ConfigSections, StoreError> {
            Ok(self.configs.lock().expect("not poisoned")
               .get(project).cloned().unwrap_or_default())
        }

        fn write_config(&self, project: &str, sections: &ConfigSections)
                        -> Result<(), StoreError> {
            *self.config_writes.lock().expect("not poisoned") += 1;
            self.configs.lock().expect("not poisoned")
                .insert(project.into(), sections.clone());
            Ok(())
        }
    }
}
