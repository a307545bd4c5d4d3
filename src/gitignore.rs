//! A client of [`crate::match_glob_simple`]: loads `.gitignore`-style files
//! along a directory chain and evaluates them with git's own precedence rules
//! (deeper file wins within a file; later line wins within a file; `!`-negation
//! re-includes a path an earlier pattern excluded).

use std::fs;
use std::path::{Path, PathBuf};

use crate::pathmatch::match_glob_simple;

#[derive(Clone, Debug)]
struct IgnoreRule {
    pattern: String,
    negated: bool,
    anchored: bool,
    dir_only: bool,
}

impl IgnoreRule {
    fn parse(line: &str) -> Option<IgnoreRule> {
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (negated, line) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let dir_only = line.ends_with('/');
        let line = line.strip_suffix('/').unwrap_or(line);

        let anchored = line.contains('/');
        let pattern = if let Some(rest) = line.strip_prefix('/') {
            rest.to_string()
        } else if anchored {
            line.to_string()
        } else {
            format!("**/{line}")
        };

        Some(IgnoreRule {
            pattern,
            negated,
            anchored: anchored || pattern.starts_with("**/"),
            dir_only,
        })
    }

    fn matches(&self, relative_path: &str, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }
        match_glob_simple(&self.pattern, relative_path)
            || (self.anchored && match_glob_simple(&format!("{}/**", self.pattern), relative_path))
    }
}

/// A loaded, ordered set of ignore rules for one directory's `.gitignore`.
#[derive(Clone, Debug, Default)]
pub struct IgnoreFile {
    rules: Vec<IgnoreRule>,
}

impl IgnoreFile {
    /// Loads and parses the `.gitignore` file directly inside `dir`, if present.
    /// A missing file yields an empty, always-pass [`IgnoreFile`] rather than an
    /// error, since "no `.gitignore` here" is the overwhelmingly common case.
    pub fn load(dir: impl AsRef<Path>) -> IgnoreFile {
        let path = dir.as_ref().join(".gitignore");
        let rules = match fs::read_to_string(&path) {
            Ok(contents) => contents.lines().filter_map(IgnoreRule::parse).collect(),
            Err(_) => Vec::new(),
        };
        IgnoreFile { rules }
    }

    fn is_ignored_by_this_file(&self, relative_path: &str, is_dir: bool) -> Option<bool> {
        let mut decision = None;
        for rule in &self.rules {
            if rule.matches(relative_path, is_dir) {
                decision = Some(!rule.negated);
            }
        }
        decision
    }
}

/// A stack of [`IgnoreFile`]s from a walk root down to (and including) each queried
/// directory, evaluated file-then-ancestor with last-match-wins semantics, matching
/// git's own precedence: a deeper `.gitignore`'s last matching line wins over a
/// shallower one's.
pub struct IgnoreStack {
    root: PathBuf,
    /// Loaded files, ordered from `root` (index 0) to the deepest directory queried
    /// so far; looked up by relative directory path via linear scan, which is fine
    /// given how few directories a single walk typically nests.
    loaded: Vec<(PathBuf, IgnoreFile)>,
}

impl IgnoreStack {
    pub fn new(root: impl Into<PathBuf>) -> IgnoreStack {
        IgnoreStack {
            root: root.into(),
            loaded: Vec::new(),
        }
    }

    fn file_for(&mut self, dir: &Path) -> &IgnoreFile {
        if let Some(idx) = self.loaded.iter().position(|(d, _)| d == dir) {
            return &self.loaded[idx].1;
        }
        let file = IgnoreFile::load(dir);
        self.loaded.push((dir.to_path_buf(), file));
        &self.loaded.last().unwrap().1
    }

    /// Tests whether `path` (an absolute path under this stack's root) is ignored,
    /// consulting every `.gitignore` between the root and `path`'s parent directory,
    /// deepest file first.
    pub fn is_ignored(&mut self, path: &Path, is_dir: bool) -> bool {
        let relative = match path.strip_prefix(&self.root) {
            Ok(r) => r,
            Err(_) => return false,
        };
        let relative_str = relative.to_string_lossy();

        let mut dirs: Vec<PathBuf> = Vec::new();
        let mut current = self.root.clone();
        dirs.push(current.clone());
        if let Some(parent_rel) = relative.parent() {
            for component in parent_rel.components() {
                current.push(component);
                dirs.push(current.clone());
            }
        }

        for dir in dirs.iter().rev() {
            let dir_relative = dir
                .strip_prefix(&self.root)
                .unwrap_or(Path::new(""))
                .to_string_lossy()
                .into_owned();
            let rule_relative = if dir_relative.is_empty() {
                relative_str.to_string()
            } else {
                relative_str
                    .strip_prefix(&format!("{dir_relative}/"))
                    .unwrap_or(&relative_str)
                    .to_string()
            };
            if let Some(decision) = self.file_for(dir).is_ignored_by_this_file(&rule_relative, is_dir) {
                return decision;
            }
        }
        false
    }

    /// A predicate suitable for [`crate::IterAll::filter_entry`]: returns `true` for
    /// entries that should be descended into / yielded, i.e. that are *not* ignored.
    pub fn filter_entry<'a>(&'a mut self) -> impl FnMut(&Path) -> bool + 'a {
        move |path| !self.is_ignored(path, path.is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_rule() {
        let rule = IgnoreRule::parse("*.log").unwrap();
        assert!(!rule.negated);
        assert!(!rule.dir_only);
        assert_eq!(rule.pattern, "**/*.log");
    }

    #[test]
    fn parses_anchored_rule() {
        let rule = IgnoreRule::parse("/build").unwrap();
        assert_eq!(rule.pattern, "build");
    }

    #[test]
    fn parses_negated_rule() {
        let rule = IgnoreRule::parse("!important.log").unwrap();
        assert!(rule.negated);
    }

    #[test]
    fn parses_dir_only_rule() {
        let rule = IgnoreRule::parse("target/").unwrap();
        assert!(rule.dir_only);
    }

    #[test]
    fn comment_and_blank_lines_are_skipped() {
        assert!(IgnoreRule::parse("# comment").is_none());
        assert!(IgnoreRule::parse("").is_none());
    }

    #[test]
    fn last_match_wins_within_a_file() {
        let file = IgnoreFile {
            rules: vec![
                IgnoreRule::parse("*.log").unwrap(),
                IgnoreRule::parse("!keep.log").unwrap(),
            ],
        };
        assert_eq!(file.is_ignored_by_this_file("debug.log", false), Some(true));
        assert_eq!(file.is_ignored_by_this_file("keep.log", false), Some(false));
        assert_eq!(file.is_ignored_by_this_file("readme.md", false), None);
    }
}
