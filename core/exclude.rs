//! Exclusion patterns and the matcher that applies them to paths under a base directory.
//!
//! A pattern's kind is decided once, when the matcher is built:
//!
//! * `*<suffix>` matches any path whose final name ends with `<suffix>`.
//! * Anything else first matches by name, i.e. when it equals one of the
//!   path's components relative to the base. Failing that it falls back to
//!   a substring check against the relative path's string form.
//!
//! The substring fallback is broad: excluding `test` also excludes
//! `contest.py`.

use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExcludePattern {
    /// `*.log`, stored without the leading `*`.
    Suffix(String),
    /// Exact component name, with substring-of-relative-path fallback.
    Name(String),
}

impl ExcludePattern {
    /// Classifies a raw pattern string, kept verbatim. Blank strings yield
    /// `None`, since an empty substring would match every path.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        match raw.strip_prefix('*') {
            Some(suffix) => Some(ExcludePattern::Suffix(suffix.to_string())),
            None => Some(ExcludePattern::Name(raw.to_string())),
        }
    }

    fn matches(&self, components: &[&str], file_name: &str, relative: &str) -> bool {
        match self {
            ExcludePattern::Suffix(suffix) => file_name.ends_with(suffix.as_str()),
            ExcludePattern::Name(name) => {
                components.iter().any(|c| c == name) || relative.contains(name.as_str())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    base: PathBuf,
    patterns: Vec<ExcludePattern>,
    exact_paths: Vec<PathBuf>,
}

impl ExclusionMatcher {
    pub fn new<S: AsRef<str>>(base: &Path, patterns: &[S]) -> Self {
        let patterns: Vec<ExcludePattern> = patterns
            .iter()
            .filter_map(|p| {
                let parsed = ExcludePattern::parse(p.as_ref());
                if parsed.is_none() {
                    log::trace!("Ignoring blank exclude pattern");
                }
                parsed
            })
            .collect();
        log::debug!(
            "Exclusion matcher built with {} patterns for base {}",
            patterns.len(),
            base.display()
        );
        Self {
            base: base.to_path_buf(),
            patterns,
            exact_paths: Vec::new(),
        }
    }

    /// Also excludes exactly `relative` (relative to the base), with no
    /// name or substring matching.
    pub fn with_exact_path(mut self, relative: impl Into<PathBuf>) -> Self {
        self.exact_paths.push(relative.into());
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn patterns(&self) -> &[ExcludePattern] {
        &self.patterns
    }

    /// Returns true if any pattern matches `path`.
    ///
    /// `path` is expected to be the base itself or one of its descendants.
    /// The base and paths outside it are never excluded.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.base) else {
            log::trace!("Path outside base, not excluded: {}", path.display());
            return false;
        };

        let components: Vec<&str> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => name.to_str(),
                _ => None,
            })
            .collect();
        let Some(file_name) = components.last().copied() else {
            return false;
        };
        if self.exact_paths.iter().any(|p| p.as_path() == relative) {
            log::trace!("Excluded exact path {}", relative.display());
            return true;
        }
        let relative_str = relative.to_string_lossy();

        let excluded = self
            .patterns
            .iter()
            .find(|p| p.matches(&components, file_name, &relative_str));
        if let Some(pattern) = excluded {
            log::trace!("Excluded {} by {:?}", relative.display(), pattern);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn matcher(patterns: &[&str]) -> ExclusionMatcher {
        ExclusionMatcher::new(Path::new("/project"), patterns)
    }

    #[rstest]
    #[case::suffix_on_file(&["*.log"], "app.log", true)]
    #[case::suffix_nested(&["*.log"], "logs/deep/app.log", true)]
    #[case::suffix_only_checks_final_name(&["*.egg-info"], "pkg.egg-info/setup.py", false)]
    #[case::suffix_with_other_patterns(&["dist", "*.log", "vendor"], "app.log", true)]
    #[case::exact_dir_component(&["node_modules"], "node_modules/x.js", true)]
    #[case::exact_nested_component(&["node_modules"], "web/node_modules/lib/x.js", true)]
    #[case::exact_file_name(&["Thumbs.db"], "img/Thumbs.db", true)]
    #[case::substring_of_relative_path(&["src/gen"], "src/gen/out.py", true)]
    #[case::substring_sharp_edge(&["test"], "contest.py", true)]
    #[case::no_match(&["node_modules", "*.log"], "src/main.py", false)]
    #[case::empty_list(&[], "src/main.py", false)]
    fn test_is_excluded(#[case] patterns: &[&str], #[case] rel: &str, #[case] expected: bool) {
        let m = matcher(patterns);
        assert_eq!(m.is_excluded(&Path::new("/project").join(rel)), expected);
    }

    #[test]
    fn test_base_path_is_never_excluded() {
        let m = matcher(&["project", "*", "/"]);
        assert!(!m.is_excluded(Path::new("/project")));
    }

    #[test]
    fn test_blank_patterns_are_discarded() {
        let m = matcher(&["", "   ", "dist"]);
        assert_eq!(m.patterns(), &[ExcludePattern::Name("dist".to_string())]);
        assert!(!m.is_excluded(Path::new("/project/src/main.py")));
    }

    #[test]
    fn test_path_outside_base_is_not_excluded() {
        let m = matcher(&["etc"]);
        assert!(!m.is_excluded(Path::new("/etc/passwd")));
    }

    #[test]
    fn test_parse_classifies_once() {
        assert_eq!(
            ExcludePattern::parse("*.swp"),
            Some(ExcludePattern::Suffix(".swp".to_string()))
        );
        assert_eq!(
            ExcludePattern::parse(" build "),
            Some(ExcludePattern::Name(" build ".to_string()))
        );
        assert_eq!(ExcludePattern::parse(""), None);
    }

    #[test]
    fn test_patterns_match_verbatim() {
        let m = matcher(&[" build "]);
        assert!(!m.is_excluded(Path::new("/project/build/out.py")));
    }

    #[test]
    fn test_exact_path_has_no_substring_fallback() {
        let m = matcher(&[]).with_exact_path("x.md");
        assert!(m.is_excluded(Path::new("/project/x.md")));
        assert!(!m.is_excluded(Path::new("/project/index.md")));
        assert!(!m.is_excluded(Path::new("/project/docs/x.md")));
    }

    #[test]
    fn test_base_name_is_not_a_component() {
        // Components are relative to the base, so the base's own name never matches.
        let m = matcher(&["project"]);
        assert!(!m.is_excluded(Path::new("/project/src/main.py")));
    }
}
