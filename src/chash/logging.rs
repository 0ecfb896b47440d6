// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: calchash
// File: logging.rs
// Author: calchash maintainers

use crate::chash::algorithm::{Algorithm, HexDigest};
use crate::chash::error::HashError;
use colored::Colorize;
use std::fmt;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a full `EnvFilter` directive that
/// overrides `--log-level`.
pub const LOG_ENV: &str = "CALC_HASH_LOG";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, EnumIter)]
pub enum LogLevel {
	#[default]
	Error,
	Warn,
	Info,
	Debug,
}

impl LogLevel {
	pub fn as_str(self) -> &'static str {
		match self {
			LogLevel::Error => "error",
			LogLevel::Warn => "warn",
			LogLevel::Info => "info",
			LogLevel::Debug => "debug",
		}
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LogLevel {
	type Err = HashError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let wanted = s.to_ascii_lowercase();
		LogLevel::iter()
			.find(|level| level.as_str() == wanted)
			.ok_or_else(|| HashError::InvalidLogLevel(s.to_string()))
	}
}

pub fn env_filter(level: LogLevel) -> EnvFilter {
	EnvFilter::try_from_env(LOG_ENV)
		.unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install the stderr subscriber. Later calls are no-ops.
pub fn init_logging(level: LogLevel) {
	let ansi = io::stderr().is_terminal();
	if !ansi {
		colored::control::set_override(false);
	}
	let _ = tracing_subscriber::fmt()
		.with_env_filter(env_filter(level))
		.with_writer(io::stderr)
		.with_ansi(ansi)
		.with_target(false)
		.without_time()
		.try_init();
}

/// `sha1(path) => digest`, path and digest highlighted.
pub fn digest_line(
	algorithm: Algorithm,
	path: &Path,
	digest: &HexDigest,
) -> String {
	format!(
		"{}({}) => {}",
		algorithm,
		path.display().to_string().white().bold(),
		digest.as_str().magenta().bold()
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_levels_case_insensitively() {
		assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
		assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
		assert_eq!("Info".parse::<LogLevel>().unwrap(), LogLevel::Info);
		assert_eq!(LogLevel::default(), LogLevel::Error);
	}

	#[test]
	fn rejects_unknown_levels() {
		let err = "trace".parse::<LogLevel>().unwrap_err();
		assert!(matches!(err, HashError::InvalidLogLevel(ref s) if s == "trace"));
	}

	#[test]
	fn filter_follows_level_without_override() {
		if std::env::var_os(LOG_ENV).is_some() {
			return;
		}
		let filter = format!("{:?}", env_filter(LogLevel::Debug));
		assert!(filter.contains("DEBUG") || filter.contains("debug"));
	}

	#[test]
	fn digest_line_names_algorithm_path_and_digest() {
		colored::control::set_override(false);
		let mut instance = Algorithm::Md5.hasher();
		instance.update(b"hello");
		let digest = instance.finalize();
		let line =
			digest_line(Algorithm::Md5, Path::new("a.txt"), &digest);
		assert_eq!(
			line,
			"md5(a.txt) => 5d41402abc4b2a76b9719d911017c592"
		);
	}
}
