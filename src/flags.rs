//! Dialect flags controlling how patterns are compiled and matched.

use bitflags::bitflags;

bitflags! {
    /// Options controlling the glob dialect used during compilation and matching.
    ///
    /// The default value (`Flags::empty()`) matches the historical POSIX `glob()`
    /// defaults: no escape suppression, no hidden-dot matching, no brace/tilde/extglob
    /// expansion, and doublestar segments are not treated specially.
    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
    pub struct Flags: u32 {
        /// `\` is not an escape character; it is matched literally.
        const NOESCAPE             = 1 << 0;
        /// A leading `.` in a path component is matched by `*`/`?`/bracket wildcards.
        const PERIOD               = 1 << 1;
        /// If no path matches, the pattern itself is returned as the sole result.
        const NOCHECK              = 1 << 2;
        /// Skip the final lexicographic sort of results.
        const NOSORT               = 1 << 3;
        /// Append `/` to results that are directories (walker-driven matching only).
        const MARK                 = 1 << 4;
        /// Expand `{a,b,c}` before compiling the pattern.
        const BRACE                = 1 << 5;
        /// Expand a leading `~` or `~user` before compiling the pattern.
        const TILDE                = 1 << 6;
        /// Fail tilde expansion if `~user` cannot be resolved (implies `TILDE`).
        const TILDE_CHECK          = 1 << 7;
        /// Match only directory entries (walker-driven matching only).
        const ONLYDIR              = 1 << 8;
        /// Enable `?()`, `*()`, `+()`, `@()`, `!()` extended-glob constructs.
        const EXTGLOB              = 1 << 9;
        /// Treat a `**` segment as zero-or-more path components.
        const DOUBLESTAR_RECURSIVE = 1 << 10;
        /// Apply a loaded gitignore set as a secondary filter.
        const GITIGNORE            = 1 << 11;
    }
}

impl Flags {
    /// Converts the flag set to its raw bit representation, for use at FFI boundaries.
    pub fn to_bits(self) -> u32 {
        self.bits()
    }

    /// Reconstructs a flag set from a raw bit representation.
    ///
    /// Unknown bits are silently dropped rather than rejected, matching the tolerant
    /// "never fail on malformed input" philosophy of the rest of this crate.
    pub fn from_bits_truncate_pub(bits: u32) -> Flags {
        Flags::from_bits_truncate(bits)
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert_eq!(Flags::default(), Flags::empty());
    }

    #[test]
    fn bits_roundtrip() {
        let flags = Flags::BRACE | Flags::TILDE | Flags::DOUBLESTAR_RECURSIVE;
        let bits = flags.to_bits();
        assert_eq!(Flags::from_bits_truncate_pub(bits), flags);
    }

    #[test]
    fn unknown_bits_are_dropped() {
        let bits = Flags::all().bits() | (1 << 31);
        let flags = Flags::from_bits_truncate_pub(bits);
        assert_eq!(flags, Flags::all());
    }

    #[test]
    fn tilde_check_implies_tilde_is_left_to_caller() {
        // TILDE_CHECK without TILDE is representable; callers in `tilde.rs` treat this
        // as "TILDE_CHECK is a no-op unless TILDE is also set", it is not an error here.
        let flags = Flags::TILDE_CHECK;
        assert!(flags.contains(Flags::TILDE_CHECK));
        assert!(!flags.contains(Flags::TILDE));
    }
}
