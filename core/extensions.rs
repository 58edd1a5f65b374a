use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// Lower-cased, dot-prefixed file extensions selected for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    inner: BTreeSet<String>,
}

impl ExtensionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an extension, folding case and supplying the leading dot if missing.
    /// Blank input is ignored.
    pub fn insert(&mut self, ext: &str) -> bool {
        match normalize_extension(ext) {
            Some(normalized) => self.inner.insert(normalized),
            None => false,
        }
    }

    pub fn contains(&self, ext: &str) -> bool {
        normalize_extension(ext).is_some_and(|e| self.inner.contains(&e))
    }

    /// True if the path's final extension (e.g. `.gz` for `a.tar.gz`) is in the set.
    /// Dotfiles such as `.env` have no extension and never match.
    pub fn matches_path(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|e| self.inner.contains(&e))
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ExtensionSet::new();
        for ext in iter {
            set.insert(ext.as_ref());
        }
        set
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}

/// Lower-cased, dot-prefixed extension of `path`, if it has one.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
}

fn normalize_extension(ext: &str) -> Option<String> {
    let trimmed = ext.trim();
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        Some(lower)
    } else {
        Some(format!(".{}", lower))
    }
}
