// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: calchash
// File: app.rs
// Author: calchash maintainers

use crate::chash::aggregate::{Aggregator, ThreadStrategy};
use crate::chash::algorithm::{Algorithm, HexDigest};
use crate::chash::collect::collect_files;
use crate::chash::error::HashError;
use crate::chash::logging::{init_logging, LogLevel};
use clap::{crate_version, value_parser, Arg, ArgAction, ArgMatches};
use std::error::Error;
use tracing::{error, info, warn};

pub const BIN_NAME: &str = "calc-hash";
pub const DEFAULT_ALGORITHM: &str = "sha1";

pub const GIT_COMMIT: &str = match option_env!("CALC_HASH_GIT_COMMIT") {
	Some(commit) => commit,
	None => "HEAD",
};

pub const BUILD_TIME: &str = match option_env!("CALC_HASH_BUILD_TIME") {
	Some(time) => time,
	None => "unknown",
};

const HELP_TEMPLATE: &str = "{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

pub fn version_line() -> String {
	format!(
		"{} version: {} (gitCommit: {}, builtTime: {})",
		BIN_NAME,
		crate_version!(),
		GIT_COMMIT,
		BUILD_TIME
	)
}

pub fn build_cli() -> clap::Command {
	clap::Command::new(BIN_NAME)
		.color(clap::ColorChoice::Never)
		.help_template(HELP_TEMPLATE)
		.version(crate_version!())
		.about("Calculate one digest over every file matched by glob patterns")
		.disable_version_flag(true)
		.override_usage(format!(
			"{} [-a hashing-algorithm] glob-pattern...",
			BIN_NAME
		))
		.arg(
			Arg::new("algorithm")
				.short('a')
				.long("algorithm")
				.help(format!(
					"Hashing algorithm [{}]",
					Algorithm::selectors().join("|")
				))
				.default_value(DEFAULT_ALGORITHM),
		)
		.arg(
			Arg::new("version")
				.short('v')
				.long("version")
				.help("Show version information")
				.action(ArgAction::SetTrue),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set the log-level [debug,info,warn,error]")
				.default_value("error"),
		)
		.arg(
			Arg::new("threads")
				.short('j')
				.long("threads")
				.help("Worker threads for per-file digests (0 = one per CPU)")
				.value_parser(value_parser!(u16))
				.default_value("1"),
		)
		.arg(
			Arg::new("patterns")
				.value_name("PATTERN")
				.help("Glob patterns selecting the files to hash")
				.num_args(0..)
				.action(ArgAction::Append),
		)
}

/// Options for one hashing run, resolved from the command line.
#[derive(Clone, Debug)]
pub struct RunOptions {
	pub algorithm: String,
	pub threads: ThreadStrategy,
}

impl Default for RunOptions {
	fn default() -> Self {
		RunOptions {
			algorithm: DEFAULT_ALGORITHM.to_string(),
			threads: ThreadStrategy::Single,
		}
	}
}

impl RunOptions {
	fn from_matches(matches: &ArgMatches) -> Self {
		let mut options = RunOptions::default();
		if let Some(algorithm) = matches.get_one::<String>("algorithm") {
			options.algorithm = algorithm.clone();
		}
		if let Some(threads) = matches.get_one::<u16>("threads") {
			options.threads = ThreadStrategy::from_count(*threads);
		}
		options
	}
}

/// Resolve the algorithm, expand the patterns and aggregate.
///
/// `Ok(None)` means the patterns matched no file; nothing is hashed.
pub fn execute<S: AsRef<str>>(
	patterns: &[S],
	options: &RunOptions,
) -> Result<Option<HexDigest>, HashError> {
	let algorithm: Algorithm = options.algorithm.parse()?;
	let files = collect_files(patterns)?;
	if files.is_empty() {
		return Ok(None);
	}
	info!(files = files.len(), %algorithm, "hashing matched files");
	Aggregator::new(algorithm)
		.with_threads(options.threads)
		.run(&files)
		.map(Some)
}

fn die(err: &dyn Error) -> ! {
	error!("{}", err);
	std::process::exit(1);
}

pub fn run() -> Result<(), Box<dyn Error>> {
	let mut cli = build_cli();
	let matches = cli.get_matches_mut();

	if matches.get_flag("version") {
		println!("{}", version_line());
		return Ok(());
	}

	let level = matches
		.get_one::<String>("log-level")
		.map(|level| level.parse::<LogLevel>())
		.transpose();
	let level = match level {
		Ok(level) => level.unwrap_or_default(),
		Err(err) => {
			init_logging(LogLevel::Error);
			die(&err);
		}
	};
	init_logging(level);

	let patterns: Vec<String> = matches
		.get_many::<String>("patterns")
		.map(|values| values.cloned().collect())
		.unwrap_or_default();
	if patterns.is_empty() {
		cli.print_help()?;
		return Ok(());
	}

	let options = RunOptions::from_matches(&matches);
	match execute(&patterns, &options) {
		Ok(Some(digest)) => println!("{}", digest),
		Ok(None) => warn!(
			"The glob pattern matches empty: {}",
			patterns.join(",")
		),
		Err(err) => die(&err),
	}
	Ok(())
}
