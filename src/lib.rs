//! This crate provides cross platform matching for globs with relative path prefixes.
//!
//! For CLI utilities it can be a common pattern to operate on a set of files. Such a set of files
//! is either provided directly, as parameter to the tool - or via configuration files. The use of
//! a configuration file makes it easier to determine the location of a file since the path
//! can be specified relative to the configuration. Consider, e.g., the following `.json` input:
//!
//! ```ignore
//! {
//!   "globs": [
//!     "../../../some/text-files/**/*.txt",
//!     "other/inputs/*.md",
//!     "paths/from/dir[0-9]/*.*"
//!   ]
//! }
//! ```
//!
//! Specifying these paths in a dedicated configuration file allows to resolve the paths
//! independent of the invocation of the script operating on these files, the location of the
//! configuration file is used as base directory.
//!
//! This crate implements a *relative glob matcher* on top of a from-scratch matching engine
//! (see [`Flags`] for the supported dialect) and [walkdir][walkdir]:
//!
//! - A [`Builder`] is created for each glob.
//! - A [`Matcher`] is created from the [`Builder`] using [`Builder::build`]. This call resolves
//!   the relative path components within the glob by "moving" it to the specified root directory.
//! - The [`Matcher`] is then transformed into an iterator yielding `path::PathBuf`.
//!
//! For the previous example it would be sufficient to use one builder per glob and to specify
//! the root folder when building the pattern (see examples below).
//!
//! # Globs
//!
//! The supported glob dialect is controlled by [`Flags`] (brace expansion, tilde expansion,
//! extended-glob operators, `**` recursion, hidden-file handling, and the usual `glob(3)`
//! postprocessing knobs). By default a [`Builder`] only enables [`Flags::DOUBLESTAR_RECURSIVE`],
//! matching the behavior CLI users expect from `**`.
//!
//! # Example: A simple match.
//!
//! The following example uses the files stored in the `test-files` folder, we're trying to match
//! all the `.txt` files using the glob `test-files/**/*.txt` (where `test-files` is the only
//! relative path component).
//!
//! ```
//! /*
//!     Example files:
//!     globmatch/test-files/.hidden
//!     globmatch/test-files/.hidden/h_1.txt
//!     globmatch/test-files/.hidden/h_0.txt
//!     globmatch/test-files/a/a2/a2_0.txt
//!     globmatch/test-files/a/a0/a0_0.txt
//!     globmatch/test-files/a/a0/a0_1.txt
//!     globmatch/test-files/a/a0/A0_3.txt
//!     globmatch/test-files/a/a0/a0_2.md
//!     globmatch/test-files/a/a1/a1_0.txt
//!     globmatch/test-files/some_file.txt
//!     globmatch/test-files/b/b_0.txt
//!  */
//!
//! use globmatch;
//!
//! # fn example_a() -> Result<(), globmatch::Error> {
//! let builder = globmatch::Builder::new("test-files/**/*.txt")
//!     .build(env!("CARGO_MANIFEST_DIR"))?;
//!
//! let paths: Vec<_> = builder.into_iter()
//!     .flatten()
//!     .collect();
//!
//! println!(
//!     "paths:\n{}",
//!     paths
//!         .iter()
//!         .map(|p| format!("{}", p.to_string_lossy()))
//!         .collect::<Vec<_>>()
//!         .join("\n")
//! );
//!
//! assert_eq!(6 + 1, paths.len());
//! # Ok(())
//! # }
//! # example_a().unwrap();
//! ```
//!
//! # Example: Specifying options and using `.filter_entry`.
//!
//! This crate allows passing options (case sensitivity, and the dialect flags described above) to
//! the builder.
//!
//! In addition, the [`filter_entry`][filter_entry] function from [walkdir][walkdir] is accessible,
//! but only as a single call (this crate does not implement a recursive iterator). This function
//! allows filter files and folders *before* matching against the provided glob and therefore
//! to efficiently exclude files and folders, e.g., hidden folders:
//!
//! ```
//! use globmatch;
//!
//! # fn example_b() -> Result<(), globmatch::Error> {
//! let root = env!("CARGO_MANIFEST_DIR");
//! let pattern = "test-files/**/[ah]*.txt";
//!
//! let builder = globmatch::Builder::new(pattern)
//!     .case_sensitive(true)
//!     .build(root)?;
//!
//! let paths: Vec<_> = builder
//!     .into_iter()
//!     .filter_entry(|p| !globmatch::is_hidden_entry(p))
//!     .flatten()
//!     .collect();
//!
//! assert_eq!(4, paths.len());
//! # Ok(())
//! # }
//! # example_b().unwrap();
//! ```
//!
//! # Example: Filtering with `.build_glob`.
//!
//! The above examples demonstrated how to search for paths using this crate. Two more builder
//! functions are available for additional matching on the paths yielded by the iterator, e.g.,
//! to further limit the files (e.g., based on a global blacklist).
//!
//! - [`Builder::build_glob`] to create a single [`Glob`] (caution: the builder only checks
//!    that the pattern is not empty, but allows absolute paths).
//! - [`Builder::build_glob_set`] to create a [`Glob`] matcher that contains two globs
//!   `[glob, **/glob]` out of the specified `glob` parameter of [`Builder::new`]. The pattern
//!    must not be an absolute path.
//!
//! ```
//! use globmatch;
//!
//! # fn example_c() -> Result<(), globmatch::Error> {
//! let root = env!("CARGO_MANIFEST_DIR");
//! let pattern = "test-files/**/a*.*";
//!
//! let builder = globmatch::Builder::new(pattern)
//!     .case_sensitive(true)
//!     .build(root)?;
//!
//! let glob = globmatch::Builder::new("*.txt").build_glob_set()?;
//!
//! let paths: Vec<_> = builder
//!     .into_iter()
//!     .filter_entry(|p| !globmatch::is_hidden_entry(p))
//!     .flatten()
//!     .filter(|p| glob.is_match(p))
//!     .collect();
//!
//! assert_eq!(4, paths.len());
//! # Ok(())
//! # }
//! # example_c().unwrap();
//! ```
//!
//! [walkdir]: https://docs.rs/walkdir
//! [filter_entry]: #IterFilter::filter_entry

use std::borrow::Cow;
use std::path;

mod brace;
mod context;
mod error;
mod extglob;
mod flags;
mod gitignore;
mod iters;
mod matcher;
#[path = "path.rs"]
mod pathmatch;
mod suffix;
mod tilde;
mod utils;
pub mod wrappers;

#[cfg(feature = "capi")]
mod capi;

pub use crate::error::{Error, WalkErrorKind};
pub use crate::flags::Flags;
pub use crate::gitignore::{IgnoreFile, IgnoreStack};
pub use crate::iters::{IterAll, IterFilter};
pub use crate::pathmatch::{match_glob_simple, match_paths, match_paths_at};
pub use crate::utils::{is_hidden_entry, is_hidden_path};

#[cfg(feature = "capi")]
pub use crate::capi::*;

/// Splits an absolute `pattern` into its root prefix (`/`, or a drive prefix like
/// `C:\` on Windows) and the remaining relative path. Returns `(None, pattern)`
/// unchanged for a relative pattern.
///
/// Used by [`Builder::build`] to cope with `~`/`~user` expansion, which always
/// produces an absolute pattern regardless of the caller-supplied root.
fn split_absolute(pattern: &str) -> (Option<path::PathBuf>, &str) {
    let p = path::Path::new(pattern);
    if !p.is_absolute() {
        return (None, pattern);
    }

    let mut root_len = 0usize;
    for component in p.components() {
        match component {
            path::Component::Prefix(_) | path::Component::RootDir => {
                root_len += component.as_os_str().len();
            }
            _ => break,
        }
    }

    let root = path::PathBuf::from(&pattern[..root_len]);
    let rest = pattern[root_len..].trim_start_matches(['/', '\\']);
    (Some(root), rest)
}

/// A builder for a matcher or globs.
///
/// This builder can be configured to match case sensitive (default) or case insensitive, and
/// for the glob dialect options in [`Flags`] (`**` recursion is on by default, everything else
/// is opt-in).
///
/// The lifetime `'a` refers to the lifetime of the glob string.
pub struct Builder<'a> {
    glob: &'a str,
    case_sensitive: bool,
    flags: Flags,
}

impl<'a> Builder<'a> {
    /// Create a new builder for the given glob.
    ///
    /// The glob is not compiled until any of the `build` methods is called. `**` recursion is
    /// enabled by default; call [`Builder::flags`] to enable brace expansion, tilde expansion,
    /// extended-glob operators, or the `glob(3)`-style postprocessing flags.
    pub fn new(glob: &'a str) -> Builder<'a> {
        Builder {
            glob,
            case_sensitive: true,
            flags: Flags::DOUBLESTAR_RECURSIVE,
        }
    }

    /// Toggle whether the glob matches case sensitive or not.
    ///
    /// The default setting is to match case **sensitive***. Case folding, when enabled, is
    /// ASCII-only (see [`Flags`] for this crate's locale-free contract).
    pub fn case_sensitive(&mut self, yes: bool) -> &mut Builder<'a> {
        self.case_sensitive = yes;
        self
    }

    /// Replaces the dialect flags used to compile this glob.
    pub fn flags(&mut self, flags: Flags) -> &mut Builder<'a> {
        self.flags = flags;
        self
    }

    /// Builds a [`Matcher`] for the given [`Builder`] relative to `root`.
    ///
    /// Resolves the relative path prefix for the `glob` that has been provided when creating the
    /// builder for the given root directory, e.g.,
    ///
    /// For the root directory `/path/to/some/folder` and glob `../../*.txt`, this function will
    /// move the relative path components to the root folder, resulting in only `*.txt` for the
    /// glob, and `/path/to/some/folder/../../` for the root directory.
    ///
    /// Notice that the relative path components will **not** be resolved. The caller of the
    /// function can map and consolidate each path yielded by the iterator, if required.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPattern`] for an empty glob, or [`Error::InvalidRoot`] if the
    /// relative path prefix cannot be resolved against `root`.
    pub fn build<P>(&self, root: P) -> Result<Matcher<'a, path::PathBuf>, Error>
    where
        P: AsRef<path::Path>,
    {
        if self.glob.is_empty() {
            return Err(Error::EmptyPattern {
                pattern: self.glob.to_string(),
            });
        }

        let expanded = tilde::expand_tilde(self.glob, self.flags)?;

        // a `~`/`~user` expansion roots the pattern at a home directory, which is always
        // absolute; resolve_root only ever accepts a relative pattern, so an absolute
        // expansion is split into its own root/rest pair instead of being resolved
        // against the caller-supplied `root`.
        let (effective_root, effective_pattern) = split_absolute(expanded.as_ref());
        let resolve_against = effective_root.unwrap_or_else(|| root.as_ref().to_path_buf());

        let (root, rest) =
            utils::resolve_root(resolve_against, effective_pattern).map_err(|source| Error::InvalidRoot {
                pattern: self.glob.to_string(),
                source,
            })?;

        let alternatives: Vec<String> = if self.flags.contains(Flags::BRACE) {
            brace::expand_braces(rest).into_iter().map(Cow::into_owned).collect()
        } else {
            vec![rest.to_string()]
        };
        let alternative_refs: Vec<&str> = alternatives.iter().map(String::as_str).collect();
        let matcher =
            pathmatch::MultiGlobMatcher::with_case_insensitive(&alternative_refs, self.flags, !self.case_sensitive);

        Ok(Matcher {
            glob: self.glob,
            root,
            rest: Box::from(rest),
            matcher,
        })
    }

    /// Builds a [`Glob`].
    ///
    /// This [`Glob`] that can be used for filtering paths provided by a [`Matcher`] (created
    /// using the `build` function).
    pub fn build_glob(&self) -> Result<Glob<'a>, Error> {
        if self.glob.is_empty() {
            return Err(Error::EmptyPattern {
                pattern: self.glob.to_string(),
            });
        }

        let expanded = tilde::expand_tilde(self.glob, self.flags)?;
        let alternatives: Vec<String> = if self.flags.contains(Flags::BRACE) {
            brace::expand_braces(expanded.as_ref()).into_iter().map(Cow::into_owned).collect()
        } else {
            vec![expanded.into_owned()]
        };
        let alternative_refs: Vec<&str> = alternatives.iter().map(String::as_str).collect();
        let matcher =
            pathmatch::MultiGlobMatcher::with_case_insensitive(&alternative_refs, self.flags, !self.case_sensitive);
        Ok(Glob {
            glob: self.glob,
            matcher,
        })
    }

    /// Builds a combined [`GlobSet`].
    ///
    /// A globset extends the provided `pattern` to `[pattern, **/pattern]`. This is useful, e.g.,
    /// for blacklists, where only the file type is important.
    ///
    /// Yes, it would be sufficient to use the pattern `**/pattern` in the first place. This is
    /// a simple commodity function.
    pub fn build_glob_set(&self) -> Result<GlobSet<'a>, Error> {
        if self.glob.is_empty() {
            return Err(Error::EmptyPattern {
                pattern: self.glob.to_string(),
            });
        }

        if path::Path::new(self.glob).is_absolute() {
            return Err(Error::AbsolutePattern {
                pattern: self.glob.to_string(),
            });
        }

        let expanded = tilde::expand_tilde(self.glob, self.flags)?;
        let alternatives: Vec<String> = if self.flags.contains(Flags::BRACE) {
            brace::expand_braces(expanded.as_ref()).into_iter().map(Cow::into_owned).collect()
        } else {
            vec![expanded.into_owned()]
        };
        let mut patterns: Vec<String> = Vec::with_capacity(alternatives.len() * 2);
        for alt in &alternatives {
            patterns.push(format!("**/{alt}"));
            patterns.push(alt.clone());
        }
        let pattern_refs: Vec<&str> = patterns.iter().map(String::as_str).collect();
        let flags = self.flags | Flags::DOUBLESTAR_RECURSIVE;
        let matcher = pathmatch::MultiGlobMatcher::with_case_insensitive(&pattern_refs, flags, !self.case_sensitive);

        Ok(GlobSet {
            glob: self.glob,
            matcher,
        })
    }
}

/// Matcher type for transformation into an iterator.
///
/// This type exists such that [`Builder::build`] can return a result type (whereas `into_iter`
/// cannot). Notice that `iter()` is not implemented due to the use of references.
pub struct Matcher<'a, P>
where
    P: AsRef<path::Path>,
{
    glob: &'a str,
    /// Original glob-pattern
    root: P,
    /// Root path of a resolved pattern
    rest: Box<str>,
    /// Remaining pattern after root has been resolved and tilde-expanded; owned since
    /// tilde expansion can produce a pattern that doesn't borrow from `glob`.
    matcher: pathmatch::MultiGlobMatcher,
}

impl<'a, P> IntoIterator for Matcher<'a, P>
where
    P: AsRef<path::Path>,
{
    type Item = Result<path::PathBuf, Error>;
    type IntoIter = IterAll<P>;

    /// Transform the [`Matcher`] into a recursive directory iterator.
    fn into_iter(self) -> Self::IntoIter {
        let walk_root = path::PathBuf::from(self.root.as_ref());
        IterAll::new(
            self.root,
            walkdir::WalkDir::new(walk_root).into_iter(),
            self.matcher,
        )
    }
}

impl<'a, P> Matcher<'a, P>
where
    P: AsRef<path::Path>,
{
    /// Provides the original glob-pattern used to create this [`Matcher`].
    ///
    /// This is the unchanged glob, i.e., no relative path components have been resolved.
    pub fn glob(&self) -> &str {
        self.glob
    }

    /// Provides the resolved root folder used by the [`Matcher`].
    ///
    /// This directory already contains the path components from the original glob. The main
    /// intention of this function is to for debugging or logging (thus a String).
    pub fn root(&self) -> String {
        let path = path::PathBuf::from(self.root.as_ref());
        String::from(path.to_str().unwrap())
    }

    /// Provides the resolved glob used by the [`Matcher`].
    ///
    /// All relative path components have been resolved for this glob. The glob is of type &str
    /// since all globs are input parameters and specified as strings (and not paths).
    pub fn rest(&self) -> &str {
        &self.rest
    }

    /// Checks whether the provided path is a match for the stored glob.
    ///
    /// Paths that are not valid UTF-8 never match, since this crate's matching engine operates
    /// on `&str`.
    pub fn is_match(&self, p: P) -> bool {
        match p.as_ref().to_str() {
            Some(p) => self.matcher.is_match(p),
            None => false,
        }
    }
}

/// Wrapper type for glob matching.
///
/// This type is created by [`Builder::build_glob`] for a single glob on which no transformations
/// or path resolutions have been performed.
pub struct Glob<'a> {
    glob: &'a str,
    pub matcher: pathmatch::MultiGlobMatcher,
}

impl<'a> Glob<'a> {
    /// Provides the original glob-pattern used to create this [`Glob`].
    pub fn glob(&self) -> &str {
        self.glob
    }

    /// Checks whether the provided path is a match for the stored glob.
    pub fn is_match<P>(&self, p: P) -> bool
    where
        P: AsRef<path::Path>,
    {
        match p.as_ref().to_str() {
            Some(p) => self.matcher.is_match(p),
            None => false,
        }
    }
}

/// Comfort type for glob matching.
///
/// This type is created by [`Builder::build_glob_set`] (refer to the function documentation). The
/// matcher stores two globs created from the original pattern as `[**/pattern, pattern]` for
/// easy matching on multiple paths.
pub struct GlobSet<'a> {
    glob: &'a str,
    pub matcher: pathmatch::MultiGlobMatcher,
}

impl<'a> GlobSet<'a> {
    /// Provides the original glob-pattern used to create this [`GlobSet`].
    pub fn glob(&self) -> &str {
        self.glob
    }

    /// Checks whether the provided path is a match for any of the two stored globs.
    pub fn is_match<P>(&self, p: P) -> bool
    where
        P: AsRef<path::Path>,
    {
        match p.as_ref().to_str() {
            Some(p) => self.matcher.is_match(p),
            None => false,
        }
    }
}
