// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: calchash
// File: error.rs
// Author: calchash maintainers

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while opening or streaming a single file.
#[derive(Debug, Error)]
pub enum FileError {
	#[error("no such file: {0}")]
	NotFound(#[source] io::Error),
	#[error("permission denied: {0}")]
	PermissionDenied(#[source] io::Error),
	#[error("{0}")]
	Other(#[source] io::Error),
}

impl FileError {
	pub fn kind(&self) -> io::ErrorKind {
		self.io_error().kind()
	}

	pub fn io_error(&self) -> &io::Error {
		match self {
			FileError::NotFound(err)
			| FileError::PermissionDenied(err)
			| FileError::Other(err) => err,
		}
	}
}

impl From<io::Error> for FileError {
	fn from(err: io::Error) -> Self {
		match err.kind() {
			io::ErrorKind::NotFound => FileError::NotFound(err),
			io::ErrorKind::PermissionDenied => {
				FileError::PermissionDenied(err)
			}
			_ => FileError::Other(err),
		}
	}
}

#[derive(Debug, Error)]
pub enum HashError {
	#[error("invalid or unknown hashing algorithm: {name}")]
	UnknownAlgorithm { name: String },
	#[error("{}: {source}", path.display())]
	FileFailed {
		path: PathBuf,
		#[source]
		source: FileError,
	},
	#[error("error occurred while pattern matching `{pattern}`: {source}")]
	Glob {
		pattern: String,
		#[source]
		source: globset::Error,
	},
	#[error("invalid log-level `{0}`, expected one of debug, info, warn, error")]
	InvalidLogLevel(String),
}

impl HashError {
	/// Path of the file that aborted an aggregation, if any.
	pub fn path(&self) -> Option<&std::path::Path> {
		match self {
			HashError::FileFailed { path, .. } => Some(path),
			_ => None,
		}
	}
}
