//! cargo bench --bench matcher
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use globmatch::{match_glob_simple, match_paths, Builder, Flags};

const PATHS: &[&str] = &[
    "src/lib.rs",
    "src/matcher.rs",
    "src/context.rs",
    "src/path.rs",
    "src/suffix.rs",
    "src/brace.rs",
    "src/tilde.rs",
    "src/extglob.rs",
    "src/gitignore.rs",
    "src/iters.rs",
    "src/utils.rs",
    "src/error.rs",
    "src/wrappers.rs",
    "src/capi.rs",
    "target/debug/deps/globmatch-0123456789abcdef.d",
    "test-files/a/a0/a0_0.txt",
    "test-files/a/a0/a0_1.txt",
    "test-files/a/a0/A0_3.txt",
    "test-files/a/a0/a0_2.md",
    "test-files/a/a1/a1_0.txt",
    "test-files/a/a2/a2_0.txt",
    "test-files/b/b_0.txt",
    "test-files/.hidden/h_0.txt",
    "test-files/.hidden/h_1.txt",
    "test-files/some_file.txt",
];

pub fn criterion_benchmark(c: &mut Criterion) {
    {
        assert!(match_glob_simple("src/*.rs", "src/lib.rs"));
        c.bench_function("match_glob_simple_star", |b| {
            b.iter(|| match_glob_simple(black_box("src/*.rs"), black_box("src/lib.rs")))
        });
    }

    {
        assert!(match_glob_simple("src/**/*.rs", "src/lib.rs"));
        c.bench_function("match_glob_simple_doublestar", |b| {
            b.iter(|| match_glob_simple(black_box("src/**/*.rs"), black_box("src/lib.rs")))
        });
    }

    {
        assert!(match_glob_simple("src/c[ao][pn]*.rs", "src/capi.rs"));
        c.bench_function("match_glob_simple_bracket", |b| {
            b.iter(|| match_glob_simple(black_box("src/c[ao][pn]*.rs"), black_box("src/capi.rs")))
        });
    }

    {
        let found = match_paths("test-files/**/*.txt", PATHS, Flags::empty());
        assert!(!found.is_empty());
        c.bench_function("match_paths_doublestar_suffix", |b| {
            b.iter(|| match_paths(black_box("test-files/**/*.txt"), black_box(PATHS), Flags::empty()))
        });
    }

    {
        let found = match_paths("test-files/{a,b}/**/*.txt", PATHS, Flags::BRACE);
        assert!(!found.is_empty());
        c.bench_function("match_paths_brace", |b| {
            b.iter(|| {
                match_paths(
                    black_box("test-files/{a,b}/**/*.txt"),
                    black_box(PATHS),
                    Flags::BRACE,
                )
            })
        });
    }

    {
        let glob = Builder::new("src/*.rs").build_glob().unwrap();
        assert!(glob.is_match("src/lib.rs"));
        c.bench_function("glob_is_match", |b| {
            b.iter(|| glob.is_match(black_box("src/lib.rs")))
        });
    }

    {
        let glob_set = Builder::new("test-files/*.txt").build_glob_set().unwrap();
        assert!(glob_set.is_match("test-files/some_file.txt"));
        c.bench_function("glob_set_is_match", |b| {
            b.iter(|| glob_set.is_match(black_box("test-files/some_file.txt")))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
