//! Extended glob operators: `?(P)`, `*(P)`, `+(P)`, `@(P)`, `!(P)`.
//!
//! Invoked by the matcher core when it encounters one of the five trigger characters
//! immediately followed by `(`. Not a standalone entry point: `try_match` returns
//! `None` when the construct turns out to be malformed (no matching closing paren),
//! telling the caller to fall back to treating the trigger character as a literal.

use smallvec::SmallVec;

use crate::flags::Flags;
use crate::matcher;

/// Cap on the number of `|`-separated alternatives inside a single construct.
const MAX_ALTERNATIVES: usize = 32;
/// Cap on the number of distinct candidate offsets visited during `+`/`*` repetition.
const MAX_VISITED: usize = 1024;

/// Bit-per-candidate-offset memoization set for `+`/`*` repetition recursion, inlined
/// for the first 1024 offsets (the common case: most path components never come
/// close to that length) and spilling onto the heap for anything longer.
struct VisitedSet {
    words: SmallVec<[u64; 16]>,
    len: usize,
}

impl VisitedSet {
    fn new() -> VisitedSet {
        VisitedSet {
            words: SmallVec::new(),
            len: 0,
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    /// Marks `si` as visited. Returns `true` if it was newly inserted, `false` if it
    /// was already present.
    fn insert(&mut self, si: usize) -> bool {
        let word = si / 64;
        let bit = 1u64 << (si % 64);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let already_set = self.words[word] & bit != 0;
        if already_set {
            return false;
        }
        self.words[word] |= bit;
        self.len += 1;
        true
    }
}

/// Attempts to match the extglob construct whose operator character sits at
/// `pattern[pi]` (one of `?*+@!`, with `pattern[pi + 1] == '('`).
///
/// Returns `Some(bool)` with the final match decision for the *entire remaining
/// pattern* (the construct plus whatever follows it) if `pattern[pi..]` is a
/// well-formed construct, or `None` if it is not (no matching `)`), in which case the
/// caller treats the operator character as an ordinary literal.
pub(crate) fn try_match(pattern: &[u8], pi: usize, candidate: &[u8], si: usize, flags: Flags) -> Option<bool> {
    let op = pattern[pi];
    let open = pi + 1; // index of '('
    let close = find_matching_paren(pattern, open)?;

    let alternatives = split_alternatives(&pattern[open + 1..close]);
    if alternatives.len() > MAX_ALTERNATIVES {
        return Some(false);
    }

    let rest = &pattern[close + 1..];

    let result = match op {
        b'?' => match_optional(&alternatives, rest, candidate, si, flags),
        b'@' => match_exactly_one(&alternatives, rest, candidate, si, flags),
        b'*' => match_repeated(&alternatives, rest, candidate, si, flags, 0),
        b'+' => match_repeated(&alternatives, rest, candidate, si, flags, 1),
        b'!' => match_negated(&alternatives, rest, candidate, si, flags),
        _ => unreachable!("caller only dispatches on ?*+@!"),
    };
    Some(result)
}

/// Finds the `)` matching the `(` at `pattern[open]`, honoring nested parens (for
/// grouping within a single alternative, not nested extglob constructs) and escapes.
fn find_matching_paren(pattern: &[u8], open: usize) -> Option<usize> {
    debug_assert_eq!(pattern.get(open), Some(&b'('));
    let mut depth = 0i32;
    let mut i = open;
    while i < pattern.len() {
        match pattern[i] {
            b'\\' => i += 1, // skip the escaped byte entirely
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Splits the interior of a construct on unescaped `|` at paren depth zero.
fn split_alternatives(interior: &[u8]) -> Vec<&[u8]> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    let mut i = 0usize;
    while i < interior.len() {
        match interior[i] {
            b'\\' => i += 1,
            b'(' => depth += 1,
            b')' => depth -= 1,
            b'|' if depth == 0 => {
                out.push(&interior[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    out.push(&interior[start..]);
    out
}

/// Tries to match `alt` against a prefix `candidate[si..si + k]` for every `k`,
/// invoking `on_span(k)` for each span that matches in full. Stops at the first
/// `on_span` call that returns `true`.
fn for_each_matching_span(
    alt: &[u8],
    candidate: &[u8],
    si: usize,
    flags: Flags,
    mut on_span: impl FnMut(usize) -> bool,
) -> bool {
    for k in 0..=(candidate.len() - si) {
        if matcher::is_match_bytes(alt, &candidate[si..si + k], flags) && on_span(k) {
            return true;
        }
    }
    false
}

fn match_optional(alternatives: &[&[u8]], rest: &[u8], candidate: &[u8], si: usize, flags: Flags) -> bool {
    if matcher::match_from(rest, 0, candidate, si, flags) {
        return true;
    }
    for alt in alternatives {
        if for_each_matching_span(alt, candidate, si, flags, |k| {
            matcher::match_from(rest, 0, candidate, si + k, flags)
        }) {
            return true;
        }
    }
    false
}

fn match_exactly_one(alternatives: &[&[u8]], rest: &[u8], candidate: &[u8], si: usize, flags: Flags) -> bool {
    for alt in alternatives {
        if for_each_matching_span(alt, candidate, si, flags, |k| {
            matcher::match_from(rest, 0, candidate, si + k, flags)
        }) {
            return true;
        }
    }
    false
}

fn match_repeated(
    alternatives: &[&[u8]],
    rest: &[u8],
    candidate: &[u8],
    si: usize,
    flags: Flags,
    min_reps: usize,
) -> bool {
    if min_reps == 0 && matcher::match_from(rest, 0, candidate, si, flags) {
        return true;
    }

    let mut visited = VisitedSet::new();
    fn recurse(
        alternatives: &[&[u8]],
        rest: &[u8],
        candidate: &[u8],
        si: usize,
        flags: Flags,
        reps_so_far: usize,
        min_reps: usize,
        visited: &mut VisitedSet,
    ) -> bool {
        if reps_so_far >= min_reps && matcher::match_from(rest, 0, candidate, si, flags) {
            return true;
        }
        if visited.len() >= MAX_VISITED || !visited.insert(si) {
            return false;
        }
        for alt in alternatives {
            let hit = for_each_matching_span(alt, candidate, si, flags, |k| {
                if k == 0 {
                    // zero-length repetitions never make progress; skip to avoid looping
                    return false;
                }
                recurse(
                    alternatives,
                    rest,
                    candidate,
                    si + k,
                    flags,
                    reps_so_far + 1,
                    min_reps,
                    visited,
                )
            });
            if hit {
                return true;
            }
        }
        false
    }

    recurse(alternatives, rest, candidate, si, flags, 0, min_reps, &mut visited)
}

fn match_negated(alternatives: &[&[u8]], rest: &[u8], candidate: &[u8], si: usize, flags: Flags) -> bool {
    for k in 0..=(candidate.len() - si) {
        let span = &candidate[si..si + k];
        let excluded = alternatives
            .iter()
            .any(|alt| matcher::is_match_bytes(alt, span, flags));
        if !excluded && matcher::match_from(rest, 0, candidate, si + k, flags) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(pattern: &str, candidate: &str) -> bool {
        matcher::is_match_bytes(pattern.as_bytes(), candidate.as_bytes(), Flags::EXTGLOB)
    }

    #[test]
    fn at_exactly_one() {
        assert!(m("@(foo|bar)", "foo"));
        assert!(m("@(foo|bar)", "bar"));
        assert!(!m("@(foo|bar)", "foobar"));
        assert!(!m("@(foo|bar)", ""));
    }

    #[test]
    fn question_zero_or_one() {
        assert!(m("a?(b)c", "ac"));
        assert!(m("a?(b)c", "abc"));
        assert!(!m("a?(b)c", "abbc"));
    }

    #[test]
    fn star_zero_or_more() {
        assert!(m("a*(b)c", "ac"));
        assert!(m("a*(b)c", "abc"));
        assert!(m("a*(b)c", "abbbc"));
    }

    #[test]
    fn plus_one_or_more() {
        assert!(!m("a+(b)c", "ac"));
        assert!(m("a+(b)c", "abc"));
        assert!(m("a+(b)c", "abbbc"));
    }

    #[test]
    fn negated_excludes_alternatives() {
        assert!(m("*.!(js)", "foo.ts"));
        assert!(!m("*.!(js)", "foo.js"));
    }

    #[test]
    fn malformed_construct_degrades_to_literal() {
        // unterminated extglob falls back to literal `?` and `(`.
        assert!(matcher::is_match_bytes(b"a?(b", b"a?(b", Flags::EXTGLOB));
    }

    #[test]
    fn repeated_construct_over_long_candidate() {
        // visited offsets step by 2 (the "bb" alternative), reaching past the bitset's
        // inline 1024-bit capacity (offset ~2000) while staying under the 1024-entry
        // visited cap (~1000 distinct offsets), so this must still resolve to a match.
        let candidate = format!("a{}c", "bb".repeat(1000));
        assert!(m("a*(bb)c", &candidate));
    }

    #[test]
    fn visited_set_tracks_duplicate_offsets() {
        let mut visited = VisitedSet::new();
        assert!(visited.insert(5));
        assert!(!visited.insert(5));
        assert!(visited.insert(2000));
        assert_eq!(visited.len(), 2);
    }
}
