//! POSIX-shaped `glob()` / `globfree()` C ABI façade, built on top of [`crate::Builder`]
//! and the walker. Feature-gated behind `capi` so consumers that only need the Rust API
//! don't pay for `#[no_mangle]` symbols or `libc` types.
//!
//! Flag constants here map one-to-one onto [`crate::Flags`] by bit position (via
//! [`crate::Flags::to_bits`]/[`crate::Flags::from_bits_truncate_pub`]); they are
//! deliberately *not* bit-compatible with the platform's own `<glob.h>` constants,
//! since this façade is a stable ABI for programs linked against this crate, not a
//! drop-in replacement for the system `glob()`.

use std::ffi::{CStr, CString};
use std::ptr;

use libc::{c_char, c_int};

use crate::{Builder, Flags};

pub const GLOB_NOESCAPE: c_int = Flags::NOESCAPE.bits() as c_int;
pub const GLOB_PERIOD: c_int = Flags::PERIOD.bits() as c_int;
pub const GLOB_NOCHECK: c_int = Flags::NOCHECK.bits() as c_int;
pub const GLOB_NOSORT: c_int = Flags::NOSORT.bits() as c_int;
pub const GLOB_MARK: c_int = Flags::MARK.bits() as c_int;
pub const GLOB_BRACE: c_int = Flags::BRACE.bits() as c_int;
pub const GLOB_TILDE: c_int = Flags::TILDE.bits() as c_int;
pub const GLOB_TILDE_CHECK: c_int = Flags::TILDE_CHECK.bits() as c_int;
pub const GLOB_ONLYDIR: c_int = Flags::ONLYDIR.bits() as c_int;
pub const GLOB_EXTGLOB: c_int = Flags::EXTGLOB.bits() as c_int;
pub const GLOB_DOUBLESTAR: c_int = Flags::DOUBLESTAR_RECURSIVE.bits() as c_int;

/// Return codes, matching the historical POSIX `glob()` contract.
pub const GLOB_NOSPACE: c_int = 1;
pub const GLOB_ABORTED: c_int = 2;
pub const GLOB_NOMATCH: c_int = 3;

/// A POSIX-shaped result set, mirroring `<glob.h>`'s `glob_t`.
///
/// `gl_pathv` is a null-terminated array of null-terminated C strings, owned by this
/// struct; free it with [`globfree`], never with `free(3)` directly, since the backing
/// allocation is a `Vec<CString>`/`Vec<*mut c_char>` pair, not a single `malloc` block.
#[repr(C)]
pub struct glob_t {
    pub gl_pathc: usize,
    pub gl_pathv: *mut *mut c_char,
    pub gl_offs: usize,
}

impl Default for glob_t {
    fn default() -> glob_t {
        glob_t {
            gl_pathc: 0,
            gl_pathv: ptr::null_mut(),
            gl_offs: 0,
        }
    }
}

/// Matches `pattern` (relative to the current working directory) and populates
/// `pglob` with the results.
///
/// `flags` is a [`crate::Flags`] bit pattern (see the `GLOB_*` constants in this
/// module). `errfunc`, if non-null, is not invoked by this implementation: every
/// walker I/O error is silently skipped, matching this crate's "matching never
/// fails" contract rather than glibc's `GLOB_ERR`-gated abort semantics.
///
/// # Safety
///
/// `pattern` must be a valid, null-terminated C string. `pglob` must point to a valid,
/// writable `glob_t`. If `flags` includes `GLOB_APPEND`-style accumulation this
/// function does not support it (unlike glibc); every call overwrites `pglob` from
/// scratch.
///
/// Returns `0` on success, or one of `GLOB_NOSPACE`/`GLOB_ABORTED`/`GLOB_NOMATCH`. On a
/// non-zero return, `*pglob` is left untouched; the caller must not pass it to
/// [`globfree`].
#[no_mangle]
pub unsafe extern "C" fn glob(
    pattern: *const c_char,
    flags: c_int,
    errfunc: Option<extern "C" fn(*const c_char, c_int) -> c_int>,
    pglob: *mut glob_t,
) -> c_int {
    let _ = errfunc;

    if pattern.is_null() || pglob.is_null() {
        return GLOB_ABORTED;
    }

    let pattern = match CStr::from_ptr(pattern).to_str() {
        Ok(p) => p,
        Err(_) => return GLOB_ABORTED,
    };

    let flags = Flags::from_bits_truncate_pub(flags as u32);

    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(_) => return GLOB_ABORTED,
    };

    let matcher = match Builder::new(pattern).flags(flags).build(&root) {
        Ok(m) => m,
        Err(_) => return GLOB_NOMATCH,
    };

    let mut matched: Vec<String> = Vec::new();
    for entry in matcher.into_iter() {
        let Ok(path) = entry else {
            continue;
        };
        let Some(path) = path.to_str() else {
            continue;
        };
        let mut path = path.to_string();
        if flags.contains(Flags::MARK) && std::path::Path::new(&path).is_dir() {
            path.push('/');
        }
        if !flags.contains(Flags::ONLYDIR) || std::path::Path::new(&path).is_dir() {
            matched.push(path);
        }
    }

    if matched.is_empty() && flags.contains(Flags::NOCHECK) {
        matched.push(pattern.to_string());
    }
    if !flags.contains(Flags::NOSORT) {
        matched.sort_unstable();
        matched.dedup();
    }

    if matched.is_empty() {
        return GLOB_NOMATCH;
    }

    match fill_glob_t(&matched, &mut *pglob) {
        Ok(()) => 0,
        Err(()) => GLOB_NOSPACE,
    }
}

fn fill_glob_t(matched: &[String], pglob: &mut glob_t) -> Result<(), ()> {
    let mut cstrings: Vec<CString> = Vec::with_capacity(matched.len());
    for path in matched {
        cstrings.push(CString::new(path.as_str()).map_err(|_| ())?);
    }

    let mut pointers: Vec<*mut c_char> = cstrings.iter().map(|s| s.as_ptr() as *mut c_char).collect();
    pointers.push(ptr::null_mut());

    // The backing `CString`s must outlive the raw pointers we're about to leak into
    // `gl_pathv`; `globfree` reconstructs both `Vec`s from `gl_pathc`/`gl_pathv` and
    // drops them together.
    let pathc = cstrings.len();
    std::mem::forget(cstrings);

    let boxed = pointers.into_boxed_slice();
    pglob.gl_pathc = pathc;
    pglob.gl_pathv = Box::into_raw(boxed) as *mut *mut c_char;
    pglob.gl_offs = 0;
    Ok(())
}

/// Frees the result set populated by [`glob`].
///
/// # Safety
///
/// `pglob` must point to a `glob_t` previously populated by [`glob`] (or a
/// zero-initialized one, in which case this is a no-op). Calling this twice on the
/// same `glob_t` without an intervening [`glob`] call is undefined behavior, matching
/// the platform `globfree(3)` contract.
#[no_mangle]
pub unsafe extern "C" fn globfree(pglob: *mut glob_t) {
    if pglob.is_null() {
        return;
    }
    let pglob = &mut *pglob;
    if pglob.gl_pathv.is_null() {
        return;
    }

    let pathc = pglob.gl_pathc;
    let pointers = Vec::from_raw_parts(pglob.gl_pathv, pathc + 1, pathc + 1);
    for ptr in pointers.iter().take(pathc) {
        if !ptr.is_null() {
            drop(CString::from_raw(*ptr));
        }
    }

    pglob.gl_pathv = ptr::null_mut();
    pglob.gl_pathc = 0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn glob_and_globfree_roundtrip() {
        let root = env!("CARGO_MANIFEST_DIR");
        std::env::set_current_dir(root).unwrap();

        let pattern = CString::new("test-files/a/a0/*.txt").unwrap();
        let mut pglob = glob_t::default();

        let ret = unsafe { glob(pattern.as_ptr(), GLOB_NOSORT, None, &mut pglob) };
        assert_eq!(ret, 0);
        assert!(pglob.gl_pathc >= 2);

        unsafe {
            for i in 0..pglob.gl_pathc {
                let p = *pglob.gl_pathv.add(i);
                assert!(!p.is_null());
            }
            globfree(&mut pglob);
        }
        assert_eq!(pglob.gl_pathc, 0);
        assert!(pglob.gl_pathv.is_null());
    }

    #[test]
    fn glob_reports_nomatch_for_empty_result() {
        let root = env!("CARGO_MANIFEST_DIR");
        std::env::set_current_dir(root).unwrap();

        let pattern = CString::new("test-files/does-not-exist/*.nope").unwrap();
        let mut pglob = glob_t::default();

        let ret = unsafe { glob(pattern.as_ptr(), 0, None, &mut pglob) };
        assert_eq!(ret, GLOB_NOMATCH);
    }

    #[test]
    fn glob_rejects_null_pattern() {
        let mut pglob = glob_t::default();
        let ret = unsafe { glob(ptr::null(), 0, None, &mut pglob) };
        assert_eq!(ret, GLOB_ABORTED);
    }
}
