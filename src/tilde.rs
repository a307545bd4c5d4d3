//! Tilde expansion: a leading `~` or `~user` is replaced by the corresponding home
//! directory before the pattern reaches brace expansion / the analyzer.

use std::borrow::Cow;

use crate::error::Error;
use crate::flags::Flags;

/// Expands a leading `~` or `~user` in `pattern`.
///
/// Not invoked unless `Flags::TILDE` is set. Bare `~` resolves the current process's
/// home directory. `~user` attempts to resolve another user's home directory; on
/// platforms or configurations where that cannot be done, the token is left
/// untouched in the pattern unless `Flags::TILDE_CHECK` is also set, in which case
/// resolution failure is surfaced as an error.
pub fn expand_tilde(pattern: &str, flags: Flags) -> Result<Cow<'_, str>, Error> {
    if !flags.contains(Flags::TILDE) || !pattern.starts_with('~') {
        return Ok(Cow::Borrowed(pattern));
    }

    let (user, rest) = split_tilde_token(pattern);

    let home = if user.is_empty() {
        dirs::home_dir()
    } else {
        resolve_user_home(user)
    };

    match home {
        Some(home) => {
            let mut expanded = home.to_string_lossy().into_owned();
            expanded.push_str(rest);
            Ok(Cow::Owned(expanded))
        }
        None if flags.contains(Flags::TILDE_CHECK) => Err(Error::UnresolvedTildeUser {
            user: user.to_string(),
        }),
        None => Ok(Cow::Borrowed(pattern)),
    }
}

/// Splits `pattern` (known to start with `~`) into the user name token (without the
/// leading `~`, possibly empty for a bare `~`) and the remainder of the pattern
/// starting at the next `/` (or the empty string if `~user` is the whole pattern).
fn split_tilde_token(pattern: &str) -> (&str, &str) {
    let after_tilde = &pattern[1..];
    match after_tilde.find('/') {
        Some(idx) => (&after_tilde[..idx], &after_tilde[idx..]),
        None => (after_tilde, ""),
    }
}

/// Resolves another user's home directory.
///
/// This crate has no portable way to query an arbitrary user's passwd entry without
/// pulling in a platform-specific FFI surface beyond what the rest of this crate
/// needs; on every target, `~user` is therefore left unresolved, matching the
/// `dirs` crate's own single-user-only contract.
fn resolve_user_home(_user: &str) -> Option<std::path::PathBuf> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_without_tilde_flag() {
        assert_eq!(expand_tilde("~/foo", Flags::empty()).unwrap(), "~/foo");
    }

    #[test]
    fn non_tilde_pattern_is_untouched() {
        assert_eq!(expand_tilde("foo/bar", Flags::TILDE).unwrap(), "foo/bar");
    }

    #[test]
    fn bare_tilde_expands_home() {
        let expanded = expand_tilde("~/docs/*.txt", Flags::TILDE).unwrap();
        assert!(expanded.ends_with("/docs/*.txt"));
        assert_ne!(&*expanded, "~/docs/*.txt");
    }

    #[test]
    fn unresolvable_user_left_untouched_by_default() {
        let expanded = expand_tilde("~nosuchuser/foo", Flags::TILDE).unwrap();
        assert_eq!(expanded, "~nosuchuser/foo");
    }

    #[test]
    fn unresolvable_user_fails_with_tilde_check() {
        let result = expand_tilde("~nosuchuser/foo", Flags::TILDE | Flags::TILDE_CHECK);
        assert!(result.is_err());
    }
}
