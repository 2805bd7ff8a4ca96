//! Integration tests for gitglob
//!
//! Exercise whole rule files the way a `.gitignore` is written in practice.

use gitglob::{compile_file, compile_lines, IgnoreError, RuleSet};
use tempfile::tempdir;

const REGRESSION_RULES: &[&str] = &[
    "# This is a comment in a .gitignore file!",
    "/node_modules",
    "*.swp",
    "/nonexistent",
    "!/nonexistent/foo",
    "/baz",
    "/foo/*.wat",
];

#[test]
fn test_regression_fixture_ignored_paths() {
    let rules = compile_lines(REGRESSION_RULES).unwrap();
    assert_eq!(rules.len(), 6);

    assert!(rules.matches_path("node_modules/"), "node_modules should match");
    assert!(rules.matches_path("yo.swp"), "all swp files are ignored");
    assert!(rules.matches_path("foo/bar.wat"), "wat files in foo are ignored");
    assert!(rules.matches_path("nonexistent/ignore"));
    assert!(rules.matches_path("nonexistent"), "the directory itself is ignored");
    assert!(rules.matches_path("baz/yo.txt"));
    assert!(rules.matches_path("baz"));
}

#[test]
fn test_regression_fixture_included_paths() {
    let rules = compile_lines(REGRESSION_RULES).unwrap();

    assert!(
        !rules.matches_path("nonexistent/foo/wat"),
        "files under a re-included directory stay included"
    );
    assert!(!rules.matches_path("othernonexistent/"));
    assert!(!rules.matches_path("nonexistent/foo"));
    assert!(
        !rules.matches_path("bar/foo/baz.wat"),
        "/foo/*.wat is anchored to the root"
    );
}

#[test]
fn test_wildcard_fixture() {
    let rules = compile_lines(["*.swp", "**/foo", "abc/**", "a/**b"]).unwrap();

    assert!(rules.matches_path("ayy.swp"));
    assert!(rules.matches_path("lmao/ayy.swp"));
    assert!(rules.matches_path("yo/lmao/ayy.swp"));

    assert!(rules.matches_path("/ayy/lmao/alien/foo"));
    assert!(rules.matches_path("/foo/boo"));
    assert!(rules.matches_path("koo/yo/foo/boo"));

    assert!(rules.matches_path("/abc/secret.txt"));
    assert!(rules.matches_path("/a/ab/b/hi.txt"));

    assert!(!rules.matches_path("swp"));
    assert!(!rules.matches_path("food/bar"));
}

#[test]
fn test_any_depth_directory_between_segments() {
    let rules = compile_lines(["docs/**/draft"]).unwrap();
    assert!(rules.matches_path("docs/draft"));
    assert!(rules.matches_path("docs/2024/draft"));
    assert!(rules.matches_path("docs/2024/q1/draft/notes.md"));
    assert!(!rules.matches_path("docs/drafts"));
}

#[test]
fn test_compile_file_with_crlf_line_endings() {
    let temp = tempdir().unwrap();
    let path = temp.path().join(".gitignore");
    std::fs::write(&path, "# build output\r\n/target\r\n\r\n*.swp\r\n!keep.swp\r\n").unwrap();

    let rules = compile_file(&path).unwrap();
    assert_eq!(rules.len(), 3);
    assert!(rules.matches_path("target/debug/app"));
    assert!(rules.matches_path("src/.main.rs.swp"));
    assert!(!rules.matches_path("keep.swp"));
    assert!(!rules.matches_path("src/main.rs"));
}

#[test]
fn test_compile_file_matches_compile_lines() {
    let temp = tempdir().unwrap();
    let path = temp.path().join(".gitignore");
    std::fs::write(&path, REGRESSION_RULES.join("\n")).unwrap();

    let from_file = RuleSet::compile_file(&path).unwrap();
    let from_lines = RuleSet::compile_lines(REGRESSION_RULES).unwrap();
    assert_eq!(from_file.len(), from_lines.len());
    for path in ["node_modules", "a.swp", "nonexistent/foo", "baz/x", "foo/a.wat", "x"] {
        assert_eq!(from_file.matches_path(path), from_lines.matches_path(path), "{path}");
    }
}

#[test]
fn test_compile_file_tolerates_invalid_utf8() {
    let temp = tempdir().unwrap();
    let path = temp.path().join(".gitignore");
    std::fs::write(&path, b"caf\xe9/\n*.bak\n").unwrap();

    let rules = compile_file(&path).unwrap();
    assert_eq!(rules.len(), 2);
    assert!(rules.matches_path("old/file.bak"));
}

#[test]
fn test_compile_file_missing() {
    let temp = tempdir().unwrap();
    let err = compile_file(temp.path().join("missing")).unwrap_err();
    assert!(matches!(err, IgnoreError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
}

#[test]
fn test_bad_line_does_not_abort_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join(".gitignore");
    std::fs::write(&path, "*.log\n[unclosed\n/out\n").unwrap();

    let rules = compile_file(&path).unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules.diagnostics().len(), 1);
    assert_eq!(rules.diagnostics()[0].line, 2);
    assert!(rules.matches_path("a.log"));
    assert!(rules.matches_path("out/bin"));
}

#[test]
fn test_brace_names_are_kept_as_literals() {
    let rules = compile_lines(["foo{bar}", "{{slug}}/", "/cache{1}"]).unwrap();
    assert_eq!(rules.len(), 3);
    assert!(rules.diagnostics().is_empty());

    assert!(rules.matches_path("foo{bar}"));
    assert!(rules.matches_path("templates/{{slug}}/index.html"));
    assert!(rules.matches_path("cache"));
    assert!(!rules.matches_path("foobar"));
}
