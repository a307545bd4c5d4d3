//! One-shot pattern analysis producing a [`PatternContext`] that subsequent matches
//! against the same pattern can use to skip the general backtracking matcher.

use crate::flags::Flags;
use crate::matcher;
use crate::suffix::{SingleSuffixMatcher, SuffixMatch};

/// Maximum suffix length handled by the packed-integer [`SingleSuffixMatcher`] fast
/// path; longer suffixes fall back to [`SuffixMatch`].
const SIMPLE_SUFFIX_MAX: usize = 4;

/// The result of analyzing a pattern once, used to dispatch subsequent matches to the
/// fastest applicable path.
///
/// A `PatternContext` owns a copy of the pattern it was built from, so compiled
/// patterns (see `crate::pathmatch::CompiledPattern`) can be stored and passed around
/// without threading a borrow's lifetime through every type that holds one.
pub struct PatternContext {
    pattern: Box<str>,
    flags: Flags,
    has_wildcards: bool,
    contains_extglob: bool,
    required_last_char: Option<u8>,
    simple_ext: Option<SingleSuffixMatcher>,
    simple_ext_bytes: Option<Box<[u8]>>,
    only_suffix_match: Option<SuffixMatch>,
    is_literal: bool,
}

impl PatternContext {
    /// Analyzes `pattern` once under `flags`, selecting the fastest matching strategy.
    pub fn new(pattern: &str, flags: Flags) -> PatternContext {
        let bytes = pattern.as_bytes();
        let has_wildcards = contains_wildcard(bytes);
        let contains_extglob = flags.contains(Flags::EXTGLOB) && contains_extglob_trigger(bytes);

        let mut simple_ext = None;
        let mut simple_ext_bytes = None;
        let mut only_suffix_match = None;

        if has_wildcards && !contains_extglob {
            if let Some(suffix) = extract_star_suffix(bytes) {
                if suffix.len() <= SIMPLE_SUFFIX_MAX {
                    simple_ext = SingleSuffixMatcher::new(suffix);
                    simple_ext_bytes = Some(Box::from(suffix));
                } else {
                    only_suffix_match = Some(SuffixMatch::new(suffix));
                }
            }
        }

        let required_last_char = extract_required_last_char(bytes);
        let is_literal = !has_wildcards && !contains_extglob;

        PatternContext {
            pattern: Box::from(pattern),
            flags,
            has_wildcards,
            contains_extglob,
            required_last_char,
            simple_ext,
            simple_ext_bytes,
            only_suffix_match,
            is_literal,
        }
    }

    /// The original pattern this context was built from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Tests `candidate` against this compiled context.
    ///
    /// Dispatch order: required-last-char veto, then the fastest applicable fast path,
    /// falling back to the general matcher core only when none applies.
    pub fn is_match(&self, candidate: &str) -> bool {
        let bytes = candidate.as_bytes();

        if let Some(last) = self.required_last_char {
            if bytes.last() != Some(&last) {
                return false;
            }
        }

        if self.is_literal {
            return self.pattern.as_bytes() == bytes;
        }

        if let Some(ref suffix) = self.simple_ext {
            return suffix.is_match(bytes);
        }

        if let Some(ref suffix) = self.only_suffix_match {
            return suffix.is_match(bytes);
        }

        matcher::is_match_bytes(self.pattern.as_bytes(), bytes, self.flags)
    }

    pub(crate) fn has_wildcards(&self) -> bool {
        self.has_wildcards
    }

    pub(crate) fn contains_extglob(&self) -> bool {
        self.contains_extglob
    }

    /// The literal suffix bytes for a `*<literal>` pattern short enough for
    /// [`SingleSuffixMatcher`], when this context compiled to that fast path.
    ///
    /// Used to batch several such contexts into one [`crate::suffix::UnifiedMultiSuffix`]
    /// bank instead of dispatching each candidate through `is_match` individually.
    pub(crate) fn simple_suffix(&self) -> Option<&[u8]> {
        self.simple_ext_bytes.as_deref()
    }
}

fn contains_wildcard(pattern: &[u8]) -> bool {
    let mut i = 0;
    while i < pattern.len() {
        match pattern[i] {
            b'\\' => i += 1,
            b'*' | b'?' | b'[' => return true,
            _ => {}
        }
        i += 1;
    }
    false
}

fn contains_extglob_trigger(pattern: &[u8]) -> bool {
    let mut i = 0;
    while i + 1 < pattern.len() {
        if matches!(pattern[i], b'?' | b'*' | b'+' | b'@' | b'!') && pattern[i + 1] == b'(' {
            return true;
        }
        i += 1;
    }
    false
}

/// Recognizes the shape `*<literal>` where `<literal>` contains no metacharacters,
/// no `/`, and no escape. Returns the literal suffix bytes.
fn extract_star_suffix(pattern: &[u8]) -> Option<&[u8]> {
    if pattern.first() != Some(&b'*') {
        return None;
    }
    let suffix = &pattern[1..];
    if suffix.is_empty() {
        return None;
    }
    if suffix
        .iter()
        .any(|&b| matches!(b, b'*' | b'?' | b'[' | b'\\' | b'/'))
    {
        return None;
    }
    Some(suffix)
}

/// Recognizes patterns that unconditionally require a specific trailing byte, i.e.
/// the pattern ends in a literal byte that cannot be "eaten" by a trailing wildcard
/// (a literal always ends the match region exactly).
fn extract_required_last_char(pattern: &[u8]) -> Option<u8> {
    let last = *pattern.last()?;
    if matches!(last, b'*' | b'?' | b']' | b')') {
        return None;
    }
    // an escaped trailing literal, e.g. `foo\*`, still requires that literal char
    if pattern.len() >= 2 && pattern[pattern.len() - 2] == b'\\' {
        return Some(last);
    }
    Some(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_is_exact_equality() {
        let ctx = PatternContext::new("foo.txt", Flags::empty());
        assert!(ctx.is_match("foo.txt"));
        assert!(!ctx.is_match("foo.txtx"));
    }

    #[test]
    fn simple_suffix_uses_single_suffix_matcher() {
        let ctx = PatternContext::new("*.rs", Flags::empty());
        assert!(ctx.simple_ext.is_some());
        assert!(ctx.is_match("main.rs"));
        assert!(!ctx.is_match("main.rx"));
    }

    #[test]
    fn long_suffix_uses_suffix_match() {
        let ctx = PatternContext::new("*.config.json", Flags::empty());
        assert!(ctx.only_suffix_match.is_some());
        assert!(ctx.is_match("app.config.json"));
        assert!(!ctx.is_match("app.config.jso"));
    }

    #[test]
    fn required_last_char_short_circuits() {
        let ctx = PatternContext::new("*.rs", Flags::empty());
        assert!(!ctx.is_match("main.py"));
    }

    #[test]
    fn falls_back_to_general_matcher_for_complex_patterns() {
        let ctx = PatternContext::new("a[bc]*d?e", Flags::empty());
        assert!(ctx.has_wildcards());
        assert!(ctx.is_match("abxxxdye"));
        assert!(!ctx.is_match("axxxdye"));
    }

    #[test]
    fn extglob_detection() {
        let ctx = PatternContext::new("*.!(js)", Flags::EXTGLOB);
        assert!(ctx.contains_extglob());
        assert!(ctx.is_match("foo.ts"));
        assert!(!ctx.is_match("foo.js"));
    }
}
