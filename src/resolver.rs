//! Module specifier resolution: alias substitution, then extension probing.

use crate::error::TransformError;
use crate::fs::FileSystem;
use indexmap::IndexMap;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Ordered alias prefix -> base path mapping. The first matching alias wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: IndexMap<String, PathBuf>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or override an alias. An overridden alias keeps its position.
    pub fn insert(&mut self, alias: impl Into<String>, base: impl Into<PathBuf>) {
        self.entries.insert(alias.into(), base.into());
    }

    pub fn get(&self, alias: &str) -> Option<&Path> {
        self.entries.get(alias).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(alias, base)| (alias.as_str(), base.as_path()))
    }

    /// Rewrite `specifier` through the first alias it starts with as a whole
    /// path segment (`alias/`).
    pub fn substitute(&self, specifier: &str) -> Option<PathBuf> {
        self.entries.iter().find_map(|(alias, base)| {
            specifier
                .strip_prefix(alias.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .map(|rest| base.join(rest))
        })
    }
}

impl<K: Into<String>, V: Into<PathBuf>> FromIterator<(K, V)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (alias, base) in iter {
            table.insert(alias, base);
        }
        table
    }
}

pub struct ModuleResolver<'a> {
    aliases: &'a AliasTable,
    extensions: &'a [String],
    fs: &'a dyn FileSystem,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(aliases: &'a AliasTable, extensions: &'a [String], fs: &'a dyn FileSystem) -> Self {
        Self { aliases, extensions, fs }
    }

    /// Resolve `specifier` to an existing file.
    ///
    /// Relative specifiers resolve against `from_dir`. Every extension is
    /// appended to the resulting base path in order and the first existing
    /// file wins.
    pub fn resolve(&self, specifier: &str, from_dir: &Path) -> Result<PathBuf, TransformError> {
        let base = match self.aliases.substitute(specifier) {
            Some(substituted) => {
                log::debug!("Alias rewrote '{specifier}' to {}", substituted.display());
                normalize_path(&substituted)
            }
            None => normalize_path(&from_dir.join(specifier)),
        };

        let mut probed = Vec::with_capacity(self.extensions.len());
        for extension in self.extensions {
            let candidate = append_suffix(&base, extension);
            if self.fs.is_file(&candidate) {
                log::debug!("Resolved '{specifier}' to {}", candidate.display());
                return Ok(candidate);
            }
            probed.push(candidate);
        }

        Err(TransformError::Resolution {
            specifier: specifier.to_string(),
            probed,
        })
    }
}

/// `base` with `suffix` appended to its last component as plain text.
fn append_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}

/// Lexically remove `.` and `..` components. `..` never climbs above the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
