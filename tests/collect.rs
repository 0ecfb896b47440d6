// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: calchash
// File: collect.rs
// Author: calchash maintainers

use calchash::chash::collect::expand_pattern;
use calchash::{collect_files, HashError};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(path: &Path, contents: &str) {
	std::fs::create_dir_all(path.parent().unwrap()).unwrap();
	std::fs::write(path, contents).unwrap();
}

fn pattern(root: &Path, tail: &str) -> String {
	format!("{}/{}", root.display(), tail)
}

fn relative(root: &Path, files: &[PathBuf]) -> Vec<PathBuf> {
	files
		.iter()
		.map(|f| f.strip_prefix(root).unwrap().to_path_buf())
		.collect()
}

#[test]
fn single_star_stays_in_one_directory() {
	let tmp = tempdir().unwrap();
	let root = tmp.path();
	write(&root.join("b.txt"), "b");
	write(&root.join("a.txt"), "a");
	write(&root.join("c.md"), "c");
	write(&root.join("nested/d.txt"), "d");

	let files = collect_files(&[pattern(root, "*.txt")]).unwrap();
	assert_eq!(
		relative(root, &files),
		vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]
	);
}

#[test]
fn double_star_descends_recursively() {
	let tmp = tempdir().unwrap();
	let root = tmp.path();
	write(&root.join("a.txt"), "a");
	write(&root.join("nested/deeper/b.txt"), "b");
	write(&root.join("nested/c.bin"), "c");

	let files = collect_files(&[pattern(root, "**/*.txt")]).unwrap();
	assert_eq!(
		relative(root, &files),
		vec![
			PathBuf::from("a.txt"),
			PathBuf::from("nested/deeper/b.txt")
		]
	);
}

#[test]
fn overlapping_patterns_keep_first_occurrence() {
	let tmp = tempdir().unwrap();
	let root = tmp.path();
	write(&root.join("a.txt"), "a");
	write(&root.join("b.txt"), "b");
	write(&root.join("z.md"), "z");

	let files = collect_files(&[
		pattern(root, "z.md"),
		pattern(root, "*"),
		pattern(root, "b.txt"),
	])
	.unwrap();
	assert_eq!(
		relative(root, &files),
		vec![
			PathBuf::from("z.md"),
			PathBuf::from("a.txt"),
			PathBuf::from("b.txt")
		]
	);
}

#[test]
fn directories_never_match() {
	let tmp = tempdir().unwrap();
	let root = tmp.path();
	write(&root.join("dir.txt/inner"), "x");

	assert!(collect_files(&[pattern(root, "*.txt")])
		.unwrap()
		.is_empty());
	assert!(expand_pattern(&pattern(root, "dir.txt"))
		.unwrap()
		.is_empty());
}

#[test]
fn alternation_and_classes_are_supported() {
	let tmp = tempdir().unwrap();
	let root = tmp.path();
	for name in ["a1.rs", "a2.toml", "b1.rs", "c1.rs"] {
		write(&root.join(name), name);
	}

	let files =
		collect_files(&[pattern(root, "[ab]1.{rs,toml}")]).unwrap();
	assert_eq!(
		relative(root, &files),
		vec![PathBuf::from("a1.rs"), PathBuf::from("b1.rs")]
	);
}

#[test]
fn missing_root_matches_nothing() {
	let tmp = tempdir().unwrap();
	let files =
		collect_files(&[pattern(tmp.path(), "nope/**/*.txt")]).unwrap();
	assert!(files.is_empty());
}

#[test]
fn malformed_pattern_is_reported() {
	let tmp = tempdir().unwrap();
	let bad = pattern(tmp.path(), "{a,b");
	match collect_files(&[bad.clone()]) {
		Err(HashError::Glob { pattern, .. }) => assert_eq!(pattern, bad),
		other => panic!("expected glob error, got {:?}", other),
	}
}

#[test]
fn files_come_before_subdirectories() {
	let tmp = tempdir().unwrap();
	let root = tmp.path();
	write(&root.join("a/x.txt"), "x");
	write(&root.join("a.txt"), "a");
	write(&root.join("b/c/y.txt"), "y");
	write(&root.join("b/z.txt"), "z");

	let files = collect_files(&[pattern(root, "**/*.txt")]).unwrap();
	assert_eq!(
		relative(root, &files),
		vec![
			PathBuf::from("a.txt"),
			PathBuf::from("a/x.txt"),
			PathBuf::from("b/z.txt"),
			PathBuf::from("b/c/y.txt")
		]
	);
}

#[test]
fn current_dir_components_do_not_defeat_dedup() {
	let tmp = tempdir().unwrap();
	let root = tmp.path();
	write(&root.join("a.txt"), "a");
	write(&root.join("sub/b.txt"), "b");

	let files = collect_files(&[
		pattern(root, "*.txt"),
		pattern(root, "./a.txt"),
		pattern(root, "sub/./b.txt"),
		pattern(root, "./sub//*.txt"),
	])
	.unwrap();
	assert_eq!(
		relative(root, &files),
		vec![PathBuf::from("a.txt"), PathBuf::from("sub/b.txt")]
	);
}
