//! The in-memory path matcher: filters a slice of path strings against a pattern,
//! including correct handling of `**` as a zero-or-more path-component wildcard and
//! POSIX hidden-component semantics.

use std::borrow::Cow;

use smallvec::SmallVec;

use crate::brace;
use crate::context::PatternContext;
use crate::flags::Flags;
use crate::suffix;

/// Typical nesting depth for pattern segments and path components; patterns or paths
/// deeper than this spill onto the heap transparently.
const STACK_SEGMENTS: usize = 32;
const STACK_COMPONENTS: usize = 64;

enum Segment {
    DoubleStar,
    Plain { raw: Box<str>, ctx: PatternContext },
}

struct CompiledPattern {
    absolute: bool,
    segments: SmallVec<[Segment; STACK_SEGMENTS]>,
}

impl CompiledPattern {
    fn new(pattern: &str, flags: Flags) -> CompiledPattern {
        let absolute = pattern.starts_with('/');
        let body = if absolute { &pattern[1..] } else { pattern };

        let mut segments = SmallVec::new();
        for raw in split_str_segments(body) {
            if flags.contains(Flags::DOUBLESTAR_RECURSIVE) && raw == "**" {
                segments.push(Segment::DoubleStar);
            } else {
                segments.push(Segment::Plain {
                    raw: Box::from(raw),
                    ctx: PatternContext::new(raw, flags),
                });
            }
        }
        CompiledPattern { absolute, segments }
    }
}

/// Splits `s` on `/`, dropping empty components produced by leading/trailing or
/// repeated separators (the absolute/relative distinction is tracked separately).
fn split_str_segments(s: &str) -> SmallVec<[&str; STACK_SEGMENTS]> {
    s.split('/').filter(|seg| !seg.is_empty()).collect()
}

fn is_hidden_component(component: &str) -> bool {
    component.starts_with('.') && component != "." && component != ".."
}

fn segment_matches(raw: &str, ctx: &PatternContext, component: &str, flags: Flags) -> bool {
    // note: `raw` arrives as `&Box<str>` at call sites and coerces here via Deref.
    if is_hidden_component(component) && !flags.contains(Flags::PERIOD) && !raw.starts_with('.') {
        return false;
    }
    ctx.is_match(component)
}

/// Runs the segment dynamic-program described for `**`-aware path matching: a
/// boolean row over path-component boundaries, updated one pattern segment at a
/// time. A `**` segment propagates "reachable" forward across components, except
/// across a hidden component it's not allowed to cross.
fn match_segments(segments: &[Segment], components: &[&str], flags: Flags) -> bool {
    let n = components.len();
    let mut dp: SmallVec<[bool; STACK_COMPONENTS + 1]> = SmallVec::from_elem(false, n + 1);
    dp[0] = true;

    for segment in segments {
        match segment {
            Segment::DoubleStar => {
                let mut next: SmallVec<[bool; STACK_COMPONENTS + 1]> = SmallVec::from_elem(false, n + 1);
                let mut reachable = false;
                for j in 0..=n {
                    reachable = reachable || dp[j];
                    next[j] = reachable;
                    if j < n && is_hidden_component(components[j]) && !flags.contains(Flags::PERIOD) {
                        reachable = false;
                    }
                }
                dp = next;
            }
            Segment::Plain { raw, ctx } => {
                let mut next: SmallVec<[bool; STACK_COMPONENTS + 1]> = SmallVec::from_elem(false, n + 1);
                for j in (1..=n).rev() {
                    next[j] = dp[j - 1] && segment_matches(raw, ctx, components[j - 1], flags);
                }
                dp = next;
            }
        }
    }

    dp[n]
}

fn split_path_components(path: &str) -> SmallVec<[&str; STACK_COMPONENTS]> {
    let body = path.strip_prefix('/').unwrap_or(path);
    body.split('/').filter(|c| !c.is_empty()).collect()
}

fn postprocess<'a>(mut matched: Vec<Cow<'a, str>>, pattern: &str, flags: Flags) -> Vec<Cow<'a, str>> {
    if matched.is_empty() && flags.contains(Flags::NOCHECK) {
        matched.push(Cow::Owned(pattern.to_string()));
    }
    if !flags.contains(Flags::NOSORT) {
        matched.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
        matched.dedup_by(|a, b| a.as_ref() == b.as_ref());
    }
    matched
}

/// Builds a [`suffix::UnifiedMultiSuffix`] bank when every compiled alternative is a
/// single, non-absolute segment that its [`PatternContext`] recognized as a short
/// literal `*<=4-byte suffix>` pattern (e.g. the expansion of `*.{c,h,cc,hh}`).
/// Returns `None` for anything else — multi-segment patterns, `**`, brackets,
/// extglob, long suffixes, or absolute patterns — so the caller falls back to the
/// general per-path DP.
///
/// Bails out under `Flags::PERIOD` too: the bank has no notion of the
/// hidden-component veto `segment_matches` applies, so the fast path is only taken
/// when that veto is in effect (the default), where it is equivalent to the slow path.
fn unified_suffix_fast_path(compiled: &[CompiledPattern], flags: Flags) -> Option<suffix::UnifiedMultiSuffix> {
    if flags.contains(Flags::PERIOD) {
        return None;
    }
    let mut suffixes: SmallVec<[&[u8]; 32]> = SmallVec::new();
    for cp in compiled {
        if cp.absolute {
            return None;
        }
        let [Segment::Plain { raw, ctx }] = cp.segments.as_slice() else {
            return None;
        };
        if raw.starts_with('.') {
            return None;
        }
        suffixes.push(ctx.simple_suffix()?);
    }
    suffix::UnifiedMultiSuffix::new(&suffixes)
}

/// Filters `paths` against `pattern`, honoring brace expansion (if `Flags::BRACE`),
/// `**` (if `Flags::DOUBLESTAR_RECURSIVE`), hidden-component rules, and the
/// `NOCHECK`/`NOSORT` postprocessing flags.
///
/// `MARK` and `ONLYDIR` have no effect here: this matcher has no filesystem entry
/// kind to inspect, so those flags apply only to walker-driven matching.
pub fn match_paths<'a>(pattern: &str, paths: &[&'a str], flags: Flags) -> Vec<Cow<'a, str>> {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    let expanded = if flags.contains(Flags::BRACE) {
        brace::expand_braces(pattern)
    } else {
        vec![Cow::Borrowed(pattern)]
    };
    let compiled: Vec<CompiledPattern> = expanded.iter().map(|p| CompiledPattern::new(p, flags)).collect();

    let mut matched = Vec::new();
    if let Some(bank) = unified_suffix_fast_path(&compiled, flags) {
        // every alternative only ever matches a single-component path (no `/` or `**`
        // in the pattern), so a path with more than one component is vetoed before its
        // tail bytes are even decoded; the hidden-component veto is replicated exactly
        // since the bank itself has no notion of it.
        suffix::match_paths_batched(
            paths,
            |path| {
                let components = split_path_components(path);
                match components.as_slice() {
                    &[component] => !is_hidden_component(component) && bank.is_match(component.as_bytes()),
                    _ => false,
                }
            },
            &mut matched,
        );
    } else {
        for &path in paths {
            let path_is_absolute = path.starts_with('/');
            let components = split_path_components(path);
            let hit = compiled.iter().any(|cp| {
                (!cp.absolute || path_is_absolute) && match_segments(&cp.segments, &components, flags)
            });
            if hit {
                matched.push(path);
            }
        }
    }
    let matched: Vec<Cow<'a, str>> = matched.into_iter().map(Cow::Borrowed).collect();

    postprocess(matched, pattern, flags)
}

/// Like [`match_paths`], but each path in `paths` is treated as rooted under `base`:
/// only the substring after `base` and its separator is matched against `pattern`.
/// Paths that do not lie under `base` are skipped.
pub fn match_paths_at<'a>(base: &str, pattern: &str, paths: &[&'a str], flags: Flags) -> Vec<Cow<'a, str>> {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    let expanded = if flags.contains(Flags::BRACE) {
        brace::expand_braces(pattern)
    } else {
        vec![Cow::Borrowed(pattern)]
    };
    let compiled: Vec<CompiledPattern> = expanded.iter().map(|p| CompiledPattern::new(p, flags)).collect();
    let bank = unified_suffix_fast_path(&compiled, flags);

    let mut matched = Vec::new();
    for &path in paths {
        let Some(rest) = relative_to(base, path) else {
            continue;
        };
        let components = split_path_components(rest);
        let hit = match &bank {
            Some(bank) => match components.as_slice() {
                &[component] => !is_hidden_component(component) && bank.is_match(component.as_bytes()),
                _ => false,
            },
            None => compiled
                .iter()
                .any(|cp| !cp.absolute && match_segments(&cp.segments, &components, flags)),
        };
        if hit {
            matched.push(Cow::Borrowed(path));
        }
    }

    postprocess(matched, pattern, flags)
}

fn relative_to<'p>(base: &str, path: &'p str) -> Option<&'p str> {
    let base = base.trim_end_matches('/');
    if path == base {
        return Some("");
    }
    if path.len() > base.len() + 1 && path.starts_with(base) && path.as_bytes()[base.len()] == b'/' {
        Some(&path[base.len() + 1..])
    } else {
        None
    }
}

/// A compiled single pattern ready to be tested against many individual paths one at
/// a time, the shape the filesystem walker needs (as opposed to [`match_paths`],
/// which filters a whole slice at once and owns the brace-expansion step).
pub struct GlobMatcher {
    compiled: CompiledPattern,
    flags: Flags,
    case_insensitive: bool,
}

impl GlobMatcher {
    /// Compiles `pattern` under `flags`, matching case-sensitively. Does not perform
    /// brace or tilde expansion; callers that need those should expand the pattern
    /// first and build one `GlobMatcher` per expansion (see [`MultiGlobMatcher`]).
    pub fn new(pattern: &str, flags: Flags) -> GlobMatcher {
        GlobMatcher {
            compiled: CompiledPattern::new(pattern, flags),
            flags,
            case_insensitive: false,
        }
    }

    /// Compiles `pattern` under `flags` with optional ASCII case folding: both the
    /// pattern and every candidate path are lowercased (ASCII range only, matching
    /// this crate's bytewise, locale-free contract) before comparison.
    pub fn with_case_insensitive(pattern: &str, flags: Flags, case_insensitive: bool) -> GlobMatcher {
        if case_insensitive {
            let lowered = pattern.to_ascii_lowercase();
            GlobMatcher {
                compiled: CompiledPattern::new(&lowered, flags),
                flags,
                case_insensitive: true,
            }
        } else {
            GlobMatcher::new(pattern, flags)
        }
    }

    /// Tests a single path against the compiled pattern.
    pub fn is_match(&self, path: &str) -> bool {
        if self.case_insensitive {
            let lowered = path.to_ascii_lowercase();
            return self.is_match_exact(&lowered);
        }
        self.is_match_exact(path)
    }

    fn is_match_exact(&self, path: &str) -> bool {
        let path_is_absolute = path.starts_with('/');
        if self.compiled.absolute && !path_is_absolute {
            return false;
        }
        let components = split_path_components(path);
        match_segments(&self.compiled.segments, &components, self.flags)
    }
}

/// A small set of [`GlobMatcher`]s evaluated with "any matches" semantics, used for
/// the `[pattern, **/pattern]` convenience combination and for gitignore-style
/// filter lists.
pub struct MultiGlobMatcher {
    matchers: Vec<GlobMatcher>,
}

impl MultiGlobMatcher {
    pub fn new(patterns: &[&str], flags: Flags) -> MultiGlobMatcher {
        MultiGlobMatcher {
            matchers: patterns.iter().map(|p| GlobMatcher::new(p, flags)).collect(),
        }
    }

    pub fn with_case_insensitive(patterns: &[&str], flags: Flags, case_insensitive: bool) -> MultiGlobMatcher {
        MultiGlobMatcher {
            matchers: patterns
                .iter()
                .map(|p| GlobMatcher::with_case_insensitive(p, flags, case_insensitive))
                .collect(),
        }
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(path))
    }
}

/// A single-shot, context-free `**`-aware match used by the gitignore filter: no
/// brace/tilde/extglob preprocessing, no hidden-component special-casing.
pub fn match_glob_simple(pattern: &str, path: &str) -> bool {
    let flags = Flags::DOUBLESTAR_RECURSIVE;
    let compiled = CompiledPattern::new(pattern, flags);
    let path_is_absolute = path.starts_with('/');
    if compiled.absolute && !path_is_absolute {
        return false;
    }
    let components = split_path_components(path);
    match_segments_no_hidden_rules(&compiled.segments, &components)
}

fn match_segments_no_hidden_rules(segments: &[Segment], components: &[&str]) -> bool {
    let n = components.len();
    let mut dp: SmallVec<[bool; STACK_COMPONENTS + 1]> = SmallVec::from_elem(false, n + 1);
    dp[0] = true;
    for segment in segments {
        match segment {
            Segment::DoubleStar => {
                let mut next: SmallVec<[bool; STACK_COMPONENTS + 1]> = SmallVec::from_elem(false, n + 1);
                let mut reachable = false;
                for j in 0..=n {
                    reachable = reachable || dp[j];
                    next[j] = reachable;
                }
                dp = next;
            }
            Segment::Plain { ctx, .. } => {
                let mut next: SmallVec<[bool; STACK_COMPONENTS + 1]> = SmallVec::from_elem(false, n + 1);
                for j in (1..=n).rev() {
                    next[j] = dp[j - 1] && ctx.is_match(components[j - 1]);
                }
                dp = next;
            }
        }
    }
    dp[n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_matcher_single_path() {
        let m = GlobMatcher::new("**/*.rs", Flags::DOUBLESTAR_RECURSIVE);
        assert!(m.is_match("src/main.rs"));
        assert!(!m.is_match("src/main.c"));
    }

    #[test]
    fn glob_matcher_case_insensitive() {
        let m = GlobMatcher::with_case_insensitive("*.TXT", Flags::empty(), true);
        assert!(m.is_match("readme.txt"));
        assert!(m.is_match("README.TXT"));
        let m = GlobMatcher::with_case_insensitive("*.TXT", Flags::empty(), false);
        assert!(!m.is_match("readme.txt"));
    }

    #[test]
    fn multi_glob_matcher_any_semantics() {
        let m = MultiGlobMatcher::new(&["*.txt", "**/*.txt"], Flags::DOUBLESTAR_RECURSIVE);
        assert!(m.is_match("a.txt"));
        assert!(m.is_match("sub/a.txt"));
        assert!(!m.is_match("a.md"));
    }

    #[test]
    fn star_does_not_cross_path_separator() {
        let paths = ["a.txt", "b.log", "sub/c.txt"];
        let refs: Vec<&str> = paths.to_vec();
        let got = match_paths("*.txt", &refs, Flags::empty());
        assert_eq!(got, vec![Cow::Borrowed("a.txt")]);
    }

    #[test]
    fn doublestar_matches_any_depth() {
        let paths = ["src/main.c", "src/lib/x.c", "README.md"];
        let refs: Vec<&str> = paths.to_vec();
        let got = match_paths("**/*.c", &refs, Flags::DOUBLESTAR_RECURSIVE);
        assert_eq!(got, vec![Cow::Borrowed("src/lib/x.c"), Cow::Borrowed("src/main.c")]);
    }

    #[test]
    fn doublestar_in_the_middle() {
        let paths = ["src/a/test_foo.zig", "src/test_bar.zig", "lib/test_baz.zig"];
        let refs: Vec<&str> = paths.to_vec();
        let got = match_paths("src/**/test_*.zig", &refs, Flags::DOUBLESTAR_RECURSIVE);
        let got: Vec<&str> = got.iter().map(|c| c.as_ref()).collect();
        assert_eq!(got, vec!["src/a/test_foo.zig", "src/test_bar.zig"]);
    }

    #[test]
    fn brace_alternation() {
        let paths = ["a.c", "b.h", "c.cc", "d.txt"];
        let refs: Vec<&str> = paths.to_vec();
        let got = match_paths("*.{c,h,cc}", &refs, Flags::BRACE);
        let got: Vec<&str> = got.iter().map(|c| c.as_ref()).collect();
        assert_eq!(got, vec!["a.c", "b.h", "c.cc"]);
    }

    #[test]
    fn brace_alternation_with_many_paths_uses_unified_suffix_bank() {
        // seven paths exercises match_paths_batched's 4-at-a-time chunking plus a
        // one-path remainder, not just a single exact-size chunk.
        let paths = [
            "a.c", "b.h", "c.cc", "d.hh", "e.txt", "sub/f.c", ".g.c",
        ];
        let refs: Vec<&str> = paths.to_vec();
        let got = match_paths("*.{c,h,cc,hh}", &refs, Flags::BRACE);
        let got: Vec<&str> = got.iter().map(|c| c.as_ref()).collect();
        // "sub/f.c" is vetoed for having more than one path component, ".g.c" for
        // being a hidden component, matching what the general DP would also decide.
        assert_eq!(got, vec!["a.c", "b.h", "c.cc", "d.hh"]);
    }

    #[test]
    fn hidden_components_require_period_flag() {
        assert!(!match_paths("*", &[".hidden"], Flags::empty()).contains(&Cow::Borrowed(".hidden")));
        assert!(match_paths("*", &[".hidden"], Flags::PERIOD).contains(&Cow::Borrowed(".hidden")));
        assert!(match_paths(".*", &[".hidden"], Flags::empty()).contains(&Cow::Borrowed(".hidden")));
    }

    #[test]
    fn doublestar_does_not_cross_hidden_directory_by_default() {
        let paths = [".git/config", "src/main.rs"];
        let refs: Vec<&str> = paths.to_vec();
        let got = match_paths("**/*", &refs, Flags::DOUBLESTAR_RECURSIVE);
        let got: Vec<&str> = got.iter().map(|c| c.as_ref()).collect();
        assert_eq!(got, vec!["src/main.rs"]);
    }

    #[test]
    fn nocheck_returns_pattern_when_nothing_matched() {
        let got = match_paths("*.nope", &["a.txt"], Flags::NOCHECK);
        assert_eq!(got, vec![Cow::<str>::Owned("*.nope".to_string())]);
    }

    #[test]
    fn nosort_preserves_input_order() {
        let paths = ["b.txt", "a.txt"];
        let refs: Vec<&str> = paths.to_vec();
        let got = match_paths("*.txt", &refs, Flags::NOSORT);
        let got: Vec<&str> = got.iter().map(|c| c.as_ref()).collect();
        assert_eq!(got, vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn absolute_pattern_requires_absolute_path() {
        let got = match_paths("/a.txt", &["a.txt"], Flags::empty());
        assert!(got.is_empty());
    }

    #[test]
    fn match_paths_at_scopes_to_base() {
        let paths = ["/root/src/main.rs", "/other/main.rs"];
        let refs: Vec<&str> = paths.to_vec();
        let got = match_paths_at("/root", "src/*.rs", &refs, Flags::empty());
        let got: Vec<&str> = got.iter().map(|c| c.as_ref()).collect();
        assert_eq!(got, vec!["/root/src/main.rs"]);
    }

    #[test]
    fn match_glob_simple_has_no_period_special_casing() {
        assert!(match_glob_simple("*", ".hidden"));
    }
}
