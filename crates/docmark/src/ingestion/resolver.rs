//! Expansion of user-supplied path entries into a deduplicated work list
//!
//! Each entry is one of:
//! - a wildcard pattern (`*`, `?`); `**` makes the match recursive
//! - an existing regular file, kept verbatim
//! - an existing directory, expanded (non-recursively) to supported files
//!
//! Anything else is dropped without error.

use globset::{GlobBuilder, GlobMatcher};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{is_separator, Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessingConfig;

/// Does this entry need glob expansion
pub fn contains_wildcard(entry: &str) -> bool {
    entry.contains(['*', '?'])
}

/// Outcome of resolving one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Concrete files, first occurrence order, no duplicates
    pub resolved: Vec<PathBuf>,
    /// Trimmed entries that produced no file at all
    pub unresolved: Vec<String>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

/// Turns raw path strings into files eligible for conversion
#[derive(Debug, Clone)]
pub struct PathResolver {
    supported_extensions: Vec<String>,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::from_config(&ProcessingConfig::default())
    }
}

impl PathResolver {
    /// Create a resolver picking up the given extensions in directories
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let supported_extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self {
            supported_extensions,
        }
    }

    pub fn from_config(config: &ProcessingConfig) -> Self {
        Self::new(&config.supported_extensions)
    }

    /// Extension check used for directory expansion (case-insensitive)
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.supported_extensions.iter().any(|s| *s == ext)
            })
            .unwrap_or(false)
    }

    /// Resolve a batch of raw entries
    pub fn resolve<S: AsRef<str>>(&self, raw_paths: &[S]) -> Resolution {
        let mut seen = HashSet::new();
        let mut resolution = Resolution::default();

        for raw in raw_paths {
            let entry = raw.as_ref().trim();
            if entry.is_empty() {
                continue;
            }

            let matches = self.expand_entry(entry);
            if matches.is_empty() {
                tracing::warn!("No convertible files matched '{}'", entry);
                resolution.unresolved.push(entry.to_string());
                continue;
            }

            for path in matches {
                if seen.insert(path.clone()) {
                    resolution.resolved.push(path);
                }
            }
        }

        resolution
    }

    fn expand_entry(&self, entry: &str) -> Vec<PathBuf> {
        if contains_wildcard(entry) {
            return expand_pattern(entry);
        }

        let path = Path::new(entry);
        if path.is_file() {
            vec![path.to_path_buf()]
        } else if path.is_dir() {
            self.expand_directory(path)
        } else {
            Vec::new()
        }
    }

    fn expand_directory(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| !is_hidden(entry.file_name()))
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file() && self.is_supported(path))
            .collect()
    }
}

/// Dotfiles are left out unless a pattern asks for them
fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Literal leading directory of a pattern and the wildcard remainder
struct PatternParts {
    base: Option<PathBuf>,
    rest: String,
    depth: usize,
}

fn split_pattern(pattern: &str) -> PatternParts {
    let components: Vec<&str> = pattern.split(is_separator).collect();
    let first_wild = components
        .iter()
        .position(|c| contains_wildcard(c))
        .unwrap_or(components.len());

    let literal = &components[..first_wild];
    let base = if literal.is_empty() {
        None
    } else if literal.iter().all(|c| c.is_empty()) {
        // pattern starts at the filesystem root
        Some(PathBuf::from(&pattern[..1]))
    } else {
        Some(PathBuf::from(literal.join("/")))
    };

    let rest: Vec<&str> = components[first_wild..]
        .iter()
        .copied()
        .filter(|c| !c.is_empty())
        .collect();

    PatternParts {
        base,
        depth: rest.len(),
        rest: rest.join("/"),
    }
}

fn build_matcher(pattern: &str) -> Option<GlobMatcher> {
    match GlobBuilder::new(pattern).literal_separator(true).build() {
        Ok(glob) => Some(glob.compile_matcher()),
        Err(e) => {
            tracing::warn!("Ignoring invalid pattern '{}': {}", pattern, e);
            None
        }
    }
}

fn expand_pattern(pattern: &str) -> Vec<PathBuf> {
    let recursive = pattern.contains("**");
    let parts = split_pattern(pattern);
    if parts.rest.is_empty() {
        return Vec::new();
    }
    let Some(matcher) = build_matcher(&parts.rest) else {
        return Vec::new();
    };

    let root = parts.base.clone().unwrap_or_else(|| PathBuf::from("."));
    let max_depth = if recursive { usize::MAX } else { parts.depth };
    let allow_hidden = parts.rest.split('/').any(|c| c.starts_with('.'));

    WalkDir::new(&root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| allow_hidden || !is_hidden(entry.file_name()))
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(&root).ok()?.to_path_buf();
            if !matcher.is_match(&relative) || !entry.path().is_file() {
                return None;
            }
            Some(match &parts.base {
                Some(base) => base.join(relative),
                None => relative,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"content").unwrap();
        path
    }

    fn as_string(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_existing_file_deduplicated() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.pdf");
        let missing = dir.path().join("missing.pdf");

        let resolver = PathResolver::default();
        let result = resolver.resolve(&[as_string(&a), as_string(&a), as_string(&missing)]);

        assert_eq!(result.resolved, vec![a]);
        assert_eq!(result.unresolved, vec![as_string(&missing)]);
    }

    #[test]
    fn test_blank_entries_skipped_and_trimmed() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.docx");

        let resolver = PathResolver::default();
        let padded = format!("   {}\t", as_string(&a));
        let result = resolver.resolve(&["", "   ", padded.as_str()]);

        assert_eq!(result.resolved, vec![a]);
        assert!(result.unresolved.is_empty());
    }

    #[test]
    fn test_literal_file_kept_regardless_of_extension() {
        let dir = TempDir::new().unwrap();
        let notes = touch(dir.path(), "notes.txt");

        let result = PathResolver::default().resolve(&[as_string(&notes)]);
        assert_eq!(result.resolved, vec![notes]);
    }

    #[test]
    fn test_directory_expands_supported_files_non_recursively() {
        let dir = TempDir::new().unwrap();
        let pdf = touch(dir.path(), "b.pdf");
        let docx = touch(dir.path(), "a.docx");
        let upper = touch(dir.path(), "c.PPTX");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "nested/deep.pdf");

        let result = PathResolver::default().resolve(&[as_string(dir.path())]);

        assert_eq!(result.resolved, vec![docx, pdf, upper]);
    }

    #[test]
    fn test_directory_skips_hidden_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".hidden.pdf");
        let visible = touch(dir.path(), "visible.pdf");

        let result = PathResolver::default().resolve(&[as_string(dir.path())]);
        assert_eq!(result.resolved, vec![visible]);

        let pattern = as_string(&dir.path().join("*.pdf"));
        let result = PathResolver::default().resolve(&[pattern]);
        assert_eq!(result.resolved.len(), 1);
    }

    #[test]
    fn test_directory_with_only_hidden_files_is_unresolved() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".hidden.pdf");

        let result = PathResolver::default().resolve(&[as_string(dir.path())]);
        assert!(result.is_empty());
        assert_eq!(result.unresolved, vec![as_string(dir.path())]);
    }

    #[test]
    fn test_empty_directory_is_unresolved() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "readme.md");

        let result = PathResolver::default().resolve(&[as_string(dir.path())]);
        assert!(result.is_empty());
        assert_eq!(result.unresolved.len(), 1);
    }

    #[test]
    fn test_single_level_wildcard() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.pdf");
        let b = touch(dir.path(), "b.pdf");
        touch(dir.path(), "c.docx");
        touch(dir.path(), "sub/d.pdf");

        let pattern = as_string(&dir.path().join("*.pdf"));
        let result = PathResolver::default().resolve(&[pattern]);

        assert_eq!(result.resolved, vec![a, b]);
    }

    #[test]
    fn test_question_mark_wildcard() {
        let dir = TempDir::new().unwrap();
        let a1 = touch(dir.path(), "a1.pdf");
        touch(dir.path(), "a10.pdf");

        let pattern = as_string(&dir.path().join("a?.pdf"));
        let result = PathResolver::default().resolve(&[pattern]);

        assert_eq!(result.resolved, vec![a1]);
    }

    #[test]
    fn test_recursive_wildcard_traverses_subdirectories() {
        let dir = TempDir::new().unwrap();
        let top = touch(dir.path(), "top.pdf");
        let mid = touch(dir.path(), "one/mid.pdf");
        let deep = touch(dir.path(), "one/two/deep.pdf");
        touch(dir.path(), "one/two/skip.docx");

        let pattern = as_string(&dir.path().join("**").join("*.pdf"));
        let result = PathResolver::default().resolve(&[pattern]);

        let mut resolved = result.resolved.clone();
        resolved.sort();
        let mut expected = vec![top, mid, deep];
        expected.sort();
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_wildcard_in_directory_component() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "2023/report.pdf");
        let b = touch(dir.path(), "2024/report.pdf");
        touch(dir.path(), "2024/inner/report.pdf");

        let pattern = as_string(&dir.path().join("20*").join("report.pdf"));
        let result = PathResolver::default().resolve(&[pattern]);

        assert_eq!(result.resolved, vec![a, b]);
    }

    #[test]
    fn test_wildcard_matching_nothing_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let pattern = as_string(&dir.path().join("*.pdf"));
        let result = PathResolver::default().resolve(&[pattern.clone()]);

        assert!(result.is_empty());
        assert_eq!(result.unresolved, vec![pattern]);
    }

    #[test]
    fn test_overlapping_entries_keep_first_occurrence_order() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.pdf");
        let b = touch(dir.path(), "b.pdf");

        let pattern = as_string(&dir.path().join("*.pdf"));
        let result = PathResolver::default().resolve(&[as_string(&b), pattern, as_string(dir.path())]);

        assert_eq!(result.resolved, vec![b, a]);
        assert!(result.unresolved.is_empty());
    }

    #[test]
    fn test_split_pattern() {
        let parts = split_pattern("docs/**/*.pdf");
        assert_eq!(parts.base, Some(PathBuf::from("docs")));
        assert_eq!(parts.rest, "**/*.pdf");

        let parts = split_pattern("*.pdf");
        assert_eq!(parts.base, None);
        assert_eq!(parts.depth, 1);

        let parts = split_pattern("/*.pdf");
        assert_eq!(parts.base, Some(PathBuf::from("/")));
    }

    #[test]
    fn test_custom_extensions_normalized() {
        let resolver = PathResolver::new([".PDF", " odt "]);
        assert!(resolver.is_supported(Path::new("x.pdf")));
        assert!(resolver.is_supported(Path::new("x.ODT")));
        assert!(!resolver.is_supported(Path::new("x.docx")));
        assert!(!resolver.is_supported(Path::new("noext")));
    }
}
