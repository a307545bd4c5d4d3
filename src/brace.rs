//! Brace expansion: `{a,b,c}` is expanded into one pattern per alternative before the
//! pattern ever reaches the analyzer, including nested groups and escaped braces.

use std::borrow::Cow;

use itertools::Itertools;

/// Expands all brace groups in `pattern` into the cartesian product of their
/// alternatives.
///
/// A pattern with no unescaped `{` short-circuits to a single-element, allocation-free
/// result. Malformed brace groups (unmatched `{`, e.g.) degrade to being treated as
/// literal text rather than causing an error, consistent with the rest of this crate.
pub fn expand_braces(pattern: &str) -> Vec<Cow<'_, str>> {
    if !has_unescaped_brace(pattern) {
        return vec![Cow::Borrowed(pattern)];
    }

    let parts = parse(pattern.as_bytes());
    render(&parts)
        .into_iter()
        .map(Cow::Owned)
        .collect()
}

fn has_unescaped_brace(pattern: &str) -> bool {
    let bytes = pattern.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'{' => return true,
            _ => {}
        }
        i += 1;
    }
    false
}

/// A parsed pattern fragment: either literal text, or a brace group whose
/// alternatives are themselves sequences of fragments (so nesting works).
enum Part {
    Literal(Vec<u8>),
    Group(Vec<Vec<Part>>),
}

/// Parses `input` into a sequence of [`Part`]s. On any structural error (unmatched
/// `{`), the offending `{` and everything after it up to where parsing gave up is
/// folded back into literal text.
fn parse(input: &[u8]) -> Vec<Part> {
    let (parts, rest) = parse_sequence(input, false);
    let mut parts = parts;
    if !rest.is_empty() {
        parts.push(Part::Literal(rest.to_vec()));
    }
    parts
}

/// Parses a sequence of parts until the input is exhausted or (if `in_group`) an
/// unescaped `,` or `}` is encountered at this nesting depth. Returns the parts parsed
/// plus whatever of `input` was not consumed (non-empty only on malformed input when
/// `in_group` is false and parsing must stop early).
fn parse_sequence(input: &[u8], in_group: bool) -> (Vec<Part>, &[u8]) {
    let mut parts = Vec::new();
    let mut literal = Vec::new();
    let mut i = 0;

    while i < input.len() {
        match input[i] {
            b'\\' if i + 1 < input.len() => {
                literal.push(input[i]);
                literal.push(input[i + 1]);
                i += 2;
            }
            b',' if in_group => break,
            b'}' if in_group => break,
            b'{' => {
                if let Some((group, next_i)) = parse_group(&input[i..]) {
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(group);
                    i += next_i;
                } else {
                    // unmatched '{': treat the rest of the input as literal text.
                    literal.extend_from_slice(&input[i..]);
                    i = input.len();
                }
            }
            b => {
                literal.push(b);
                i += 1;
            }
        }
    }

    if !literal.is_empty() {
        parts.push(Part::Literal(literal));
    }
    (parts, &input[i..])
}

/// Parses a brace group starting at `input[0] == '{'`. Returns the group `Part` and
/// the number of bytes consumed (including the closing `}`), or `None` if the group
/// never closes.
fn parse_group(input: &[u8]) -> Option<(Part, usize)> {
    debug_assert_eq!(input[0], b'{');
    let mut i = 1;
    let mut alternatives = Vec::new();

    loop {
        let (seq, rest) = parse_sequence(&input[i..], true);
        let consumed = input[i..].len() - rest.len();
        i += consumed;
        alternatives.push(seq);

        if i >= input.len() {
            return None; // ran out of input without a closing '}'
        }
        match input[i] {
            b',' => {
                i += 1;
                continue;
            }
            b'}' => {
                i += 1;
                break;
            }
            _ => unreachable!("parse_sequence stops only at ',' or '}' when in_group"),
        }
    }

    // a brace group needs at least one comma to be a real alternation; `{foo}` with
    // no comma is not expanded (left as literal) per common shell brace-expansion
    // convention.
    if alternatives.len() < 2 {
        let mut literal = vec![b'{'];
        for (idx, alt) in alternatives.iter().enumerate() {
            if idx > 0 {
                literal.push(b',');
            }
            literal.extend_from_slice(&render(alt)[0].as_bytes().to_vec());
        }
        literal.push(b'}');
        return Some((Part::Literal(literal), i));
    }

    Some((Part::Group(alternatives), i))
}

/// Renders a sequence of parts into the cartesian product of all concrete strings it
/// describes.
fn render(parts: &[Part]) -> Vec<String> {
    if parts.is_empty() {
        return vec![String::new()];
    }

    let per_part_options: Vec<Vec<String>> = parts
        .iter()
        .map(|part| match part {
            Part::Literal(bytes) => vec![String::from_utf8_lossy(bytes).into_owned()],
            Part::Group(alternatives) => alternatives.iter().flat_map(|seq| render(seq)).collect(),
        })
        .collect();

    per_part_options
        .into_iter()
        .multi_cartesian_product()
        .map(|fragments| fragments.concat())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(pattern: &str) -> Vec<String> {
        expand_braces(pattern).into_iter().map(|s| s.into_owned()).collect()
    }

    #[test]
    fn no_braces_short_circuits() {
        assert_eq!(expand("plain.txt"), vec!["plain.txt"]);
    }

    #[test]
    fn simple_alternation() {
        assert_eq!(expand("*.{c,h}"), vec!["*.c", "*.h"]);
    }

    #[test]
    fn nested_alternation() {
        let mut got = expand("{a,{b,c}}");
        got.sort();
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[test]
    fn multiple_groups_are_cartesian_product() {
        let mut got = expand("{a,b}-{1,2}");
        got.sort();
        assert_eq!(got, vec!["a-1", "a-2", "b-1", "b-2"]);
    }

    #[test]
    fn escaped_braces_are_literal() {
        assert_eq!(expand(r"\{a,b\}"), vec![r"\{a,b\}"]);
    }

    #[test]
    fn single_alternative_group_is_not_expanded() {
        assert_eq!(expand("{onlyone}"), vec!["{onlyone}"]);
    }

    #[test]
    fn unmatched_brace_degrades_to_literal() {
        assert_eq!(expand("a{b,c"), vec!["a{b,c"]);
    }
}
