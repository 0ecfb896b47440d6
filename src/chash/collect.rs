// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: calchash
// File: collect.rs
// Author: calchash maintainers

//! Glob expansion into the ordered, de-duplicated file list that the
//! aggregator consumes.

use crate::chash::error::HashError;
use globset::{GlobBuilder, GlobMatcher};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}', '\\'];

/// Expand every pattern and concatenate the matches in pattern order,
/// keeping only the first occurrence of each path.
pub fn collect_files<S: AsRef<str>>(
	patterns: &[S],
) -> Result<Vec<PathBuf>, HashError> {
	let mut files = Vec::new();
	let mut seen = HashSet::new();
	for pattern in patterns {
		let pattern = pattern.as_ref();
		let matches = expand_pattern(pattern)?;
		info!(pattern, matches = matches.len(), "pattern expanded");
		for file in matches {
			if seen.insert(file.clone()) {
				files.push(file);
			}
		}
	}
	Ok(files)
}

/// Regular files matching one pattern. Within each directory, files
/// come first sorted by name, then subdirectories in name order.
///
/// `.` components and repeated separators are dropped, so `./a.txt` and
/// `a.txt` name the same file.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, HashError> {
	let cleaned = clean_pattern(pattern);
	let matcher = compile(pattern, &cleaned)?;
	let plan = PatternPlan::new(&cleaned);

	let Some(root) = plan.root.as_deref() else {
		let path = PathBuf::from(&cleaned);
		return Ok(if path.is_file() { vec![path] } else { Vec::new() });
	};
	if !root.exists() {
		debug!(root = %root.display(), "glob root does not exist");
		return Ok(Vec::new());
	}

	let mut files = Vec::new();
	let walker = WalkDir::new(root)
		.follow_links(true)
		.max_depth(plan.max_depth)
		.sort_by(|a, b| {
			a.file_type()
				.is_dir()
				.cmp(&b.file_type().is_dir())
				.then_with(|| a.file_name().cmp(b.file_name()))
		});
	for entry in walker {
		let entry = match entry {
			Ok(entry) => entry,
			Err(err) => {
				debug!(error = %err, "skipping unreadable entry");
				continue;
			}
		};
		if !entry.file_type().is_file() {
			continue;
		}
		let candidate = normalize(entry.path());
		if matcher.is_match(&candidate) {
			files.push(candidate);
		}
	}
	Ok(files)
}

fn compile(
	pattern: &str,
	cleaned: &str,
) -> Result<GlobMatcher, HashError> {
	GlobBuilder::new(cleaned)
		.literal_separator(true)
		.backslash_escape(true)
		.build()
		.map(|glob| glob.compile_matcher())
		.map_err(|source| HashError::Glob {
			pattern: pattern.to_string(),
			source,
		})
}

fn clean_pattern(pattern: &str) -> String {
	let parts: Vec<&str> = pattern
		.split('/')
		.filter(|part| !part.is_empty() && *part != ".")
		.collect();
	if pattern.starts_with('/') {
		format!("/{}", parts.join("/"))
	} else if parts.is_empty() {
		".".to_string()
	} else {
		parts.join("/")
	}
}

fn normalize(path: &Path) -> PathBuf {
	path.components()
		.filter(|component| *component != Component::CurDir)
		.collect()
}

fn is_literal(component: &str) -> bool {
	!component.contains(GLOB_META)
}

/// Where to start walking and how deep to go for one cleaned pattern.
struct PatternPlan {
	/// `None` when the pattern has no wildcard at all.
	root: Option<PathBuf>,
	max_depth: usize,
}

impl PatternPlan {
	fn new(pattern: &str) -> Self {
		let components: Vec<&str> = pattern.split('/').collect();
		let literal = components
			.iter()
			.take_while(|component| is_literal(component))
			.count();
		if literal == components.len() {
			return PatternPlan {
				root: None,
				max_depth: 0,
			};
		}

		let rest = &components[literal..];
		let max_depth = if rest.iter().any(|c| c.contains("**")) {
			usize::MAX
		} else {
			rest.iter().filter(|c| !c.is_empty()).count()
		};
		let prefix = components[..literal].join("/");
		let root = match (literal, prefix.as_str()) {
			(0, _) => PathBuf::from("."),
			(_, "") => PathBuf::from("/"),
			_ => PathBuf::from(&prefix),
		};
		PatternPlan {
			root: Some(root),
			max_depth,
		}
	}
}
